use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{check_commit, TemplateStore};
use crate::{
    core::utils::{ensure_dir, write_atomic},
    errors::{RecurrenceError, Result},
    ledger::{Materialization, RecurringTemplate, TransactionInstance},
};

pub const STORE_SCHEMA_VERSION: u32 = 1;
const LOCK_SUFFIX: &str = "lock";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredInstance {
    template_id: Uuid,
    instance: TransactionInstance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreDocument {
    schema_version: u32,
    #[serde(default)]
    templates: Vec<RecurringTemplate>,
    #[serde(default)]
    instances: Vec<StoredInstance>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            schema_version: STORE_SCHEMA_VERSION,
            templates: Vec::new(),
            instances: Vec::new(),
        }
    }
}

impl StoreDocument {
    fn template(&self, id: Uuid) -> Option<&RecurringTemplate> {
        self.templates.iter().find(|template| template.id == id)
    }

    fn occupied(&self, template_id: Uuid, date: NaiveDate) -> bool {
        self.instances
            .iter()
            .any(|stored| stored.template_id == template_id && stored.instance.date == date)
    }

    fn upsert(&mut self, template: &RecurringTemplate) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template.clone(),
            None => self.templates.push(template.clone()),
        }
    }

    fn record(&mut self, template_id: Uuid, instance: &TransactionInstance) -> Result<()> {
        if self.occupied(template_id, instance.date) {
            return Err(RecurrenceError::DuplicateInstance {
                template_id,
                date: instance.date,
            });
        }
        self.instances.push(StoredInstance {
            template_id,
            instance: instance.clone(),
        });
        Ok(())
    }
}

/// File-backed store keeping templates and instances in one JSON document.
///
/// Every access holds an advisory lock on a sidecar `<store>.lock` file: shared for
/// reads, exclusive for the read-modify-write of a mutation. Separate stores on the
/// same path, in this process or another, are serialized by that lock.
pub struct JsonStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut lock_name = path.as_os_str().to_owned();
        lock_name.push(".");
        lock_name.push(LOCK_SUFFIX);
        Self {
            path,
            lock_path: PathBuf::from(lock_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_file(&self) -> Result<RwLock<File>> {
        if let Some(parent) = self.lock_path.parent() {
            ensure_dir(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.lock_path)?;
        Ok(RwLock::new(file))
    }

    fn snapshot(&self) -> Result<StoreDocument> {
        let lock = self.lock_file()?;
        let _shared = lock.read()?;
        self.read()
    }

    fn read(&self) -> Result<StoreDocument> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let document: StoreDocument = serde_json::from_str(&data)?;
        if document.schema_version > STORE_SCHEMA_VERSION {
            return Err(RecurrenceError::Storage(format!(
                "store `{}` is from a newer schema version ({})",
                self.path.display(),
                document.schema_version
            )));
        }
        Ok(document)
    }

    fn write(&self, document: &StoreDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(document)?;
        write_atomic(&self.path, &json)?;
        debug!(
            path = %self.path.display(),
            templates = document.templates.len(),
            instances = document.instances.len(),
            "store written"
        );
        Ok(())
    }

    fn update<T>(&self, apply: impl FnOnce(&mut StoreDocument) -> Result<T>) -> Result<T> {
        let mut lock = self.lock_file()?;
        let _exclusive = lock.write()?;
        let mut document = self.read()?;
        let value = apply(&mut document)?;
        self.write(&document)?;
        Ok(value)
    }
}

impl TemplateStore for JsonStore {
    fn load(&self, id: Uuid) -> Result<RecurringTemplate> {
        self.snapshot()?
            .template(id)
            .cloned()
            .ok_or(RecurrenceError::TemplateNotFound(id))
    }

    fn save(&self, template: &RecurringTemplate) -> Result<()> {
        self.update(|document| {
            document.upsert(template);
            Ok(())
        })
    }

    fn insert(&self, template_id: Uuid, instance: &TransactionInstance) -> Result<()> {
        self.update(|document| document.record(template_id, instance))
    }

    fn templates(&self) -> Result<Vec<RecurringTemplate>> {
        Ok(self.snapshot()?.templates)
    }

    fn instances(&self) -> Result<Vec<TransactionInstance>> {
        Ok(self
            .snapshot()?
            .instances
            .into_iter()
            .map(|stored| stored.instance)
            .collect())
    }

    fn commit(&self, materialization: &Materialization, expected_next_due: NaiveDate) -> Result<()> {
        self.update(|document| {
            let template_id = materialization.template_id();
            check_commit(
                document.template(template_id),
                materialization,
                expected_next_due,
                |id, date| document.occupied(id, date),
            )?;
            document.record(template_id, &materialization.instance)?;
            document.upsert(&materialization.updated_template);
            Ok(())
        })
    }
}

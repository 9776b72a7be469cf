use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use chrono::NaiveDate;
use uuid::Uuid;

use super::{check_commit, TemplateStore};
use crate::{
    errors::{RecurrenceError, Result},
    ledger::{Materialization, RecurringTemplate, TransactionInstance},
};

#[derive(Default)]
struct MemoryState {
    templates: HashMap<Uuid, RecurringTemplate>,
    order: Vec<Uuid>,
    instances: Vec<TransactionInstance>,
    occurrences: HashSet<(Uuid, NaiveDate)>,
}

impl MemoryState {
    fn upsert(&mut self, template: &RecurringTemplate) {
        if self.templates.insert(template.id, template.clone()).is_none() {
            self.order.push(template.id);
        }
    }

    fn record(&mut self, template_id: Uuid, instance: &TransactionInstance) -> Result<()> {
        if !self.occurrences.insert((template_id, instance.date)) {
            return Err(RecurrenceError::DuplicateInstance {
                template_id,
                date: instance.date,
            });
        }
        self.instances.push(instance.clone());
        Ok(())
    }
}

/// In-process store guarded by a single mutex.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| RecurrenceError::Storage("memory store lock poisoned".into()))
    }
}

impl TemplateStore for MemoryStore {
    fn load(&self, id: Uuid) -> Result<RecurringTemplate> {
        self.lock()?
            .templates
            .get(&id)
            .cloned()
            .ok_or(RecurrenceError::TemplateNotFound(id))
    }

    fn save(&self, template: &RecurringTemplate) -> Result<()> {
        self.lock()?.upsert(template);
        Ok(())
    }

    fn insert(&self, template_id: Uuid, instance: &TransactionInstance) -> Result<()> {
        self.lock()?.record(template_id, instance)
    }

    fn templates(&self) -> Result<Vec<RecurringTemplate>> {
        let state = self.lock()?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.templates.get(id).cloned())
            .collect())
    }

    fn instances(&self) -> Result<Vec<TransactionInstance>> {
        Ok(self.lock()?.instances.clone())
    }

    fn commit(&self, materialization: &Materialization, expected_next_due: NaiveDate) -> Result<()> {
        let mut state = self.lock()?;
        let template_id = materialization.template_id();
        check_commit(
            state.templates.get(&template_id),
            materialization,
            expected_next_due,
            |id, date| state.occurrences.contains(&(id, date)),
        )?;
        state.record(template_id, &materialization.instance)?;
        state.upsert(&materialization.updated_template);
        Ok(())
    }
}

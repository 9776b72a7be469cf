pub mod json_backend;
pub mod memory;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::{RecurrenceError, Result},
    ledger::{Materialization, RecurringTemplate, TransactionInstance},
};

/// Persistence collaborator for templates and their materialized instances.
///
/// Implementations serialize updates per template: `commit` is a compare-and-swap on
/// `next_due_date`, and `insert` rejects a second instance for the same
/// (template id, date) pair. Together these guarantee at most one instance per due date
/// even when several schedulers evaluate the same template.
pub trait TemplateStore: Send + Sync {
    fn load(&self, id: Uuid) -> Result<RecurringTemplate>;

    /// Inserts or replaces a template.
    fn save(&self, template: &RecurringTemplate) -> Result<()>;

    fn insert(&self, template_id: Uuid, instance: &TransactionInstance) -> Result<()>;

    fn templates(&self) -> Result<Vec<RecurringTemplate>>;

    fn instances(&self) -> Result<Vec<TransactionInstance>>;

    /// Atomically stores `materialization.instance` and `materialization.updated_template`,
    /// provided the stored template still has `expected_next_due` as its next due date.
    fn commit(&self, materialization: &Materialization, expected_next_due: NaiveDate) -> Result<()>;

    /// Resolves a template by full id or unique id prefix.
    fn find(&self, needle: &str) -> Result<RecurringTemplate> {
        let needle = needle.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(RecurrenceError::Validation("template id is required".into()));
        }
        if let Ok(id) = Uuid::parse_str(&needle) {
            return self.load(id);
        }
        let mut matches: Vec<RecurringTemplate> = self
            .templates()?
            .into_iter()
            .filter(|template| {
                template.id.simple().to_string().starts_with(&needle)
                    || template.id.to_string().starts_with(&needle)
            })
            .collect();
        if matches.len() > 1 {
            return Err(RecurrenceError::Validation(format!(
                "`{}` is ambiguous ({} templates match)",
                needle,
                matches.len()
            )));
        }
        matches
            .pop()
            .ok_or_else(|| RecurrenceError::Validation(format!("no template matches `{}`", needle)))
    }
}

pub use json_backend::{JsonStore, STORE_SCHEMA_VERSION};
pub use memory::MemoryStore;

/// Checks the commit preconditions shared by every backend.
pub(crate) fn check_commit(
    stored: Option<&RecurringTemplate>,
    materialization: &Materialization,
    expected_next_due: NaiveDate,
    occupied: impl Fn(Uuid, NaiveDate) -> bool,
) -> Result<()> {
    let template_id = materialization.template_id();
    let stored = stored.ok_or(RecurrenceError::TemplateNotFound(template_id))?;
    if stored.next_due_date != expected_next_due {
        return Err(RecurrenceError::Conflict {
            template_id,
            expected: expected_next_due,
            found: stored.next_due_date,
        });
    }
    let date = materialization.instance.date;
    if occupied(template_id, date) {
        return Err(RecurrenceError::DuplicateInstance { template_id, date });
    }
    Ok(())
}

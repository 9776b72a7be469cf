use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{category::TransactionKind, frequency::Frequency};

/// Raw user input for a new recurring template.
#[derive(Debug, Clone)]
pub struct TemplateInput {
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
    /// Unparsed frequency name, validated by the engine.
    pub frequency: String,
    pub anchor_date: NaiveDate,
}

impl TemplateInput {
    pub fn new(
        title: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        kind: TransactionKind,
        frequency: impl Into<String>,
        anchor_date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            amount,
            category: category.into(),
            kind,
            frequency: frequency.into(),
            anchor_date,
        }
    }
}

/// A user-defined recurring transaction definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringTemplate {
    pub id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
    pub frequency: Frequency,
    pub anchor_date: NaiveDate,
    /// Date of the next occurrence to materialize.
    pub next_due_date: NaiveDate,
    pub icon: String,
    pub color: String,
    /// Caller-side flag; the engine never reads it.
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// A concrete, dated transaction produced from a template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionInstance {
    pub id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
    pub icon: String,
    pub color: String,
    pub date: NaiveDate,
    pub is_recurring: bool,
}

impl TransactionInstance {
    /// Signed amount: income positive, expense negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// Result of materializing one due occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Materialization {
    pub instance: TransactionInstance,
    pub updated_template: RecurringTemplate,
}

impl Materialization {
    pub fn template_id(&self) -> Uuid {
        self.updated_template.id
    }
}

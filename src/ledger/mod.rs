//! Recurring templates, materialized instances, and the date-cycle engine.

pub mod category;
pub mod frequency;
pub mod recurring;
pub mod template;

pub use category::{CategoryStyle, TransactionKind, DEFAULT_STYLE};
pub use frequency::Frequency;
pub use recurring::{CatchUp, DueStatus, RecurrenceEngine, DEFAULT_PENDING_WINDOW_DAYS};
pub use template::{Materialization, RecurringTemplate, TemplateInput, TransactionInstance};

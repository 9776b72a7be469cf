use chrono::{Days, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    category::style_for,
    frequency::Frequency,
    template::{Materialization, RecurringTemplate, TemplateInput, TransactionInstance},
};
use crate::errors::{RecurrenceError, Result};

pub const DEFAULT_PENDING_WINDOW_DAYS: i64 = 7;

/// Where a template's next due date sits relative to an evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    DueToday,
    Pending,
    Future,
}

impl DueStatus {
    pub fn classify(next_due: NaiveDate, as_of: NaiveDate, pending_window_days: i64) -> DueStatus {
        if next_due < as_of {
            return DueStatus::Overdue;
        }
        if next_due == as_of {
            return DueStatus::DueToday;
        }
        let window = Days::new(pending_window_days.max(0).unsigned_abs());
        let pending_cutoff = as_of.checked_add_days(window).unwrap_or(NaiveDate::MAX);
        if next_due <= pending_cutoff {
            DueStatus::Pending
        } else {
            DueStatus::Future
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DueStatus::Overdue => "overdue",
            DueStatus::DueToday => "due today",
            DueStatus::Pending => "pending",
            DueStatus::Future => "future",
        }
    }
}

/// Instances produced while catching a template up to an evaluation date.
#[derive(Debug, Clone)]
pub struct CatchUp {
    pub instances: Vec<TransactionInstance>,
    pub template: RecurringTemplate,
    /// True when `limit` was reached while the template was still due.
    pub capped: bool,
}

/// Stateless date-cycle rules for recurring templates.
///
/// Every operation is a pure function of its inputs. Callers own persistence and must
/// store `updated_template` before materializing again, otherwise the same due date is
/// produced twice.
pub struct RecurrenceEngine;

impl RecurrenceEngine {
    pub fn compute_next_due_date(from: NaiveDate, frequency: Frequency) -> Result<NaiveDate> {
        frequency
            .next_date(from)
            .ok_or(RecurrenceError::DateOutOfRange { from, frequency })
    }

    /// Validates `input` and builds a template whose first due date is one period
    /// after the anchor.
    pub fn create_template(input: TemplateInput) -> Result<RecurringTemplate> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(RecurrenceError::Validation("title must not be empty".into()));
        }
        if !input.amount.is_finite() || input.amount <= 0.0 {
            return Err(RecurrenceError::Validation(format!(
                "amount must be greater than zero (got {})",
                input.amount
            )));
        }
        let category = input.category.trim();
        if category.is_empty() {
            return Err(RecurrenceError::Validation(
                "category must not be empty".into(),
            ));
        }
        let frequency: Frequency = input.frequency.parse()?;
        let next_due_date = Self::compute_next_due_date(input.anchor_date, frequency)?;
        let style = style_for(category);

        let template = RecurringTemplate {
            id: Uuid::new_v4(),
            title: title.to_string(),
            amount: input.amount,
            category: category.to_string(),
            kind: input.kind,
            frequency,
            anchor_date: input.anchor_date,
            next_due_date,
            icon: style.icon.to_string(),
            color: style.color.to_string(),
            active: true,
            created_at: Utc::now(),
        };
        info!(
            template = %template.id,
            frequency = %frequency,
            next_due = %next_due_date,
            "created recurring template `{}`",
            template.title
        );
        Ok(template)
    }

    pub fn is_due(template: &RecurringTemplate, as_of: NaiveDate) -> bool {
        template.next_due_date <= as_of
    }

    /// Produces the instance for `template.next_due_date` and the template advanced by
    /// one period, or `None` when nothing is due on `as_of`.
    pub fn materialize_if_due(
        template: &RecurringTemplate,
        as_of: NaiveDate,
    ) -> Result<Option<Materialization>> {
        if !Self::is_due(template, as_of) {
            return Ok(None);
        }
        let due = template.next_due_date;
        let next_due_date = Self::compute_next_due_date(due, template.frequency)?;

        let instance = TransactionInstance {
            id: Uuid::new_v4(),
            title: template.title.clone(),
            amount: template.amount,
            category: template.category.clone(),
            kind: template.kind,
            icon: template.icon.clone(),
            color: template.color.clone(),
            date: due,
            is_recurring: false,
        };
        let updated_template = RecurringTemplate {
            next_due_date,
            ..template.clone()
        };
        debug!(
            template = %template.id,
            date = %due,
            next_due = %next_due_date,
            "materialized occurrence"
        );
        Ok(Some(Materialization {
            instance,
            updated_template,
        }))
    }

    /// Materializes every due occurrence up to `as_of`, oldest first, stopping after
    /// `limit` instances.
    pub fn materialize_through(
        template: &RecurringTemplate,
        as_of: NaiveDate,
        limit: usize,
    ) -> Result<CatchUp> {
        let mut current = template.clone();
        let mut instances = Vec::new();
        while instances.len() < limit {
            match Self::materialize_if_due(&current, as_of)? {
                Some(step) => {
                    instances.push(step.instance);
                    current = step.updated_template;
                }
                None => break,
            }
        }
        let capped = Self::is_due(&current, as_of);
        Ok(CatchUp {
            instances,
            template: current,
            capped,
        })
    }

    /// Projects the next `count` due dates without changing the template.
    pub fn upcoming(template: &RecurringTemplate, count: usize) -> Result<Vec<NaiveDate>> {
        let frequency = template.frequency;
        let dates: Vec<NaiveDate> =
            std::iter::successors(Some(template.next_due_date), |date| frequency.next_date(*date))
                .take(count)
                .collect();
        if dates.len() < count {
            let from = dates.last().copied().unwrap_or(template.next_due_date);
            return Err(RecurrenceError::DateOutOfRange { from, frequency });
        }
        Ok(dates)
    }

    pub fn status(
        template: &RecurringTemplate,
        as_of: NaiveDate,
        pending_window_days: i64,
    ) -> DueStatus {
        DueStatus::classify(template.next_due_date, as_of, pending_window_days)
    }
}

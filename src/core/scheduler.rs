use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    core::time::Clock,
    errors::{RecurrenceError, Result},
    ledger::{RecurrenceEngine, RecurringTemplate},
    storage::TemplateStore,
};

pub const DEFAULT_MAX_CATCH_UP: u32 = 366;

/// One instance written during a scheduler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedEntry {
    pub template_id: Uuid,
    pub instance_id: Uuid,
    pub date: NaiveDate,
}

/// A template the run gave up on, with the error that stopped it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFailure {
    pub template_id: Uuid,
    pub reason: String,
}

/// Outcome of evaluating every stored template once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub as_of: NaiveDate,
    pub evaluated: usize,
    pub skipped_inactive: usize,
    pub materialized: Vec<MaterializedEntry>,
    /// Templates another writer advanced while this run was working on them.
    pub conflicts: Vec<Uuid>,
    /// Templates still due after reaching the catch-up cap.
    pub capped: Vec<Uuid>,
    /// Templates that failed for reasons other than a conflict; the run kept going.
    pub failed: Vec<TemplateFailure>,
}

impl RunReport {
    fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            evaluated: 0,
            skipped_inactive: 0,
            materialized: Vec::new(),
            conflicts: Vec::new(),
            capped: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// Drives the recurrence engine over a store at a regular cadence.
pub struct Scheduler {
    store: Arc<dyn TemplateStore>,
    clock: Arc<dyn Clock>,
    max_catch_up: u32,
}

impl Scheduler {
    pub fn new(store: Arc<dyn TemplateStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            max_catch_up: DEFAULT_MAX_CATCH_UP,
        }
    }

    pub fn with_max_catch_up(mut self, max_catch_up: u32) -> Self {
        self.max_catch_up = max_catch_up.max(1);
        self
    }

    pub fn store(&self) -> &Arc<dyn TemplateStore> {
        &self.store
    }

    pub fn run_once(&self) -> Result<RunReport> {
        self.run_as_of(self.clock.today())
    }

    pub fn run_as_of(&self, as_of: NaiveDate) -> Result<RunReport> {
        let mut report = RunReport::new(as_of);
        for template in self.store.templates()? {
            if !template.active {
                report.skipped_inactive += 1;
                continue;
            }
            report.evaluated += 1;
            let template_id = template.id;
            if let Err(err) = self.catch_up(template, as_of, &mut report) {
                warn!(template = %template_id, "template failed: {}", err);
                report.failed.push(TemplateFailure {
                    template_id,
                    reason: err.to_string(),
                });
            }
        }
        info!(
            as_of = %as_of,
            evaluated = report.evaluated,
            materialized = report.materialized.len(),
            conflicts = report.conflicts.len(),
            failed = report.failed.len(),
            "scheduler run finished"
        );
        Ok(report)
    }

    fn catch_up(
        &self,
        mut template: RecurringTemplate,
        as_of: NaiveDate,
        report: &mut RunReport,
    ) -> Result<()> {
        let mut produced = 0u32;
        while produced < self.max_catch_up {
            let Some(step) = RecurrenceEngine::materialize_if_due(&template, as_of)? else {
                return Ok(());
            };
            match self.store.commit(&step, template.next_due_date) {
                Ok(()) => {}
                Err(err @ RecurrenceError::Conflict { .. })
                | Err(err @ RecurrenceError::DuplicateInstance { .. }) => {
                    warn!(template = %template.id, "skipping template: {}", err);
                    report.conflicts.push(template.id);
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
            report.materialized.push(MaterializedEntry {
                template_id: template.id,
                instance_id: step.instance.id,
                date: step.instance.date,
            });
            template = step.updated_template;
            produced += 1;
        }
        if RecurrenceEngine::is_due(&template, as_of) {
            warn!(
                template = %template.id,
                next_due = %template.next_due_date,
                "catch-up cap of {} reached",
                self.max_catch_up
            );
            report.capped.push(template.id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::time::FixedClock,
        ledger::{TemplateInput, TransactionKind},
        storage::MemoryStore,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn template(frequency: &str, anchor: NaiveDate) -> RecurringTemplate {
        RecurrenceEngine::create_template(TemplateInput::new(
            "Streaming",
            12.99,
            "entertainment",
            TransactionKind::Expense,
            frequency,
            anchor,
        ))
        .unwrap()
    }

    fn scheduler_at(store: Arc<MemoryStore>, today: NaiveDate) -> Scheduler {
        Scheduler::new(store, Arc::new(FixedClock::new(today)))
    }

    #[test]
    fn run_once_uses_clock_date() {
        let store = Arc::new(MemoryStore::new());
        let monthly = template("monthly", date(2024, 1, 15));
        store.save(&monthly).unwrap();

        let report = scheduler_at(store.clone(), date(2024, 2, 16)).run_once().unwrap();
        assert_eq!(report.as_of, date(2024, 2, 16));
        assert_eq!(report.evaluated, 1);
        assert_eq!(report.materialized.len(), 1);
        assert_eq!(report.materialized[0].date, date(2024, 2, 15));
        assert_eq!(
            store.load(monthly.id).unwrap().next_due_date,
            date(2024, 3, 15)
        );
    }

    #[test]
    fn repeated_runs_do_not_duplicate() {
        let store = Arc::new(MemoryStore::new());
        store.save(&template("daily", date(2024, 1, 1))).unwrap();
        let scheduler = scheduler_at(store.clone(), date(2024, 1, 5));

        let first = scheduler.run_once().unwrap();
        let second = scheduler.run_once().unwrap();
        assert_eq!(first.materialized.len(), 4);
        assert!(second.materialized.is_empty());
        assert_eq!(store.instances().unwrap().len(), 4);
    }

    #[test]
    fn inactive_templates_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        let mut paused = template("daily", date(2024, 1, 1));
        paused.active = false;
        store.save(&paused).unwrap();

        let report = scheduler_at(store.clone(), date(2024, 2, 1)).run_once().unwrap();
        assert_eq!(report.skipped_inactive, 1);
        assert_eq!(report.evaluated, 0);
        assert!(store.instances().unwrap().is_empty());
    }

    #[test]
    fn catch_up_cap_is_reported() {
        let store = Arc::new(MemoryStore::new());
        let daily = template("daily", date(2024, 1, 1));
        store.save(&daily).unwrap();

        let report = scheduler_at(store.clone(), date(2024, 12, 31))
            .with_max_catch_up(5)
            .run_once()
            .unwrap();
        assert_eq!(report.materialized.len(), 5);
        assert_eq!(report.capped, vec![daily.id]);
        assert_eq!(store.load(daily.id).unwrap().next_due_date, date(2024, 1, 7));
    }

    #[test]
    fn failing_template_does_not_stop_the_run() {
        let store = Arc::new(MemoryStore::new());
        let mut stuck = template("daily", date(2024, 1, 1));
        stuck.next_due_date = NaiveDate::MAX;
        store.save(&stuck).unwrap();
        let healthy = template("daily", date(2024, 1, 1));
        store.save(&healthy).unwrap();

        let report = scheduler_at(store.clone(), date(2024, 1, 1))
            .with_max_catch_up(3)
            .run_as_of(NaiveDate::MAX)
            .unwrap();
        assert_eq!(report.evaluated, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].template_id, stuck.id);
        assert_eq!(report.materialized.len(), 3);
        assert!(report
            .materialized
            .iter()
            .all(|entry| entry.template_id == healthy.id));
        assert_eq!(report.capped, vec![healthy.id]);
        assert_eq!(store.instances().unwrap().len(), 3);
    }

    #[test]
    fn stale_template_view_is_reported_as_conflict() {
        let store = Arc::new(MemoryStore::new());
        let weekly = template("weekly", date(2024, 1, 1));
        store.save(&weekly).unwrap();
        let step = RecurrenceEngine::materialize_if_due(&weekly, date(2024, 1, 8))
            .unwrap()
            .unwrap();
        store.commit(&step, weekly.next_due_date).unwrap();

        let scheduler = scheduler_at(store.clone(), date(2024, 1, 8));
        let mut report = RunReport::new(date(2024, 1, 8));
        scheduler
            .catch_up(weekly.clone(), date(2024, 1, 8), &mut report)
            .unwrap();
        assert_eq!(report.conflicts, vec![weekly.id]);
        assert!(report.materialized.is_empty());
        assert_eq!(store.instances().unwrap().len(), 1);
    }
}

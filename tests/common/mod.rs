#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use recurring_core::ledger::{RecurrenceEngine, RecurringTemplate, TemplateInput, TransactionKind};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn template(
    title: &str,
    category: &str,
    kind: TransactionKind,
    frequency: &str,
    anchor: NaiveDate,
) -> RecurringTemplate {
    RecurrenceEngine::create_template(TemplateInput::new(
        title, 25.0, category, kind, frequency, anchor,
    ))
    .expect("valid template")
}

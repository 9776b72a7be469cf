mod common;

use assert_cmd::Command;
use chrono::NaiveDate;
use common::{date, template};
use predicates::{prelude::PredicateBooleanExt, str::contains};
use recurring_core::{
    ledger::{RecurringTemplate, TransactionKind},
    storage::{JsonStore, TemplateStore},
};
use std::path::Path;
use uuid::Uuid;

const BIN_NAME: &str = "recurring_core_cli";

fn script_command(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("RECURRING_CORE_CLI_SCRIPT", "1")
        .env("RECURRING_CORE_HOME", home)
        .env("RUST_LOG", "off");
    cmd
}

/// Writes templates with fixed ids into the store a script session will open.
fn seed(home: &Path, templates: Vec<(&str, RecurringTemplate)>) {
    let store = JsonStore::new(home.join("recurring.json"));
    for (id, mut template) in templates {
        template.id = Uuid::parse_str(id).expect("valid uuid");
        store.save(&template).expect("seed template");
    }
}

fn due_on(title: &str, next_due: NaiveDate) -> RecurringTemplate {
    let mut seeded = template(title, "bills", TransactionKind::Expense, "monthly", date(2024, 1, 1));
    seeded.next_due_date = next_due;
    seeded
}

#[test]
fn help_lists_commands() {
    let home = common::temp_home();
    script_command(&home)
        .write_stdin("help\nexit\n")
        .assert()
        .success()
        .stdout(contains("Available commands").and(contains("upcoming")));
}

#[test]
fn version_prints_build_metadata() {
    let home = common::temp_home();
    script_command(&home)
        .write_stdin("version\n")
        .assert()
        .success()
        .stdout(contains("Recurring Core v").and(contains("Store schema")));
}

#[test]
fn add_then_run_materializes_due_instance() {
    let home = common::temp_home();
    script_command(&home)
        .write_stdin(
            "add Rent 1200 housing expense monthly 2024-01-15\n\
             list\n\
             run 2024-02-16\n\
             instances\n\
             exit\n",
        )
        .assert()
        .success()
        .stdout(
            contains("next due 2024-02-15")
                .and(contains("Materialized 1 instance(s) as of 2024-02-16"))
                .and(contains("-1200.00")),
        );

    let store = std::fs::read_to_string(home.join("recurring.json")).unwrap();
    assert!(store.contains("\"next_due_date\": \"2024-03-15\""));
    assert!(store.contains("\"date\": \"2024-02-15\""));
}

#[test]
fn state_persists_between_sessions() {
    let home = common::temp_home();
    script_command(&home)
        .write_stdin("add \"Gym membership\" 30 health expense weekly 2024-01-01\n")
        .assert()
        .success();
    script_command(&home)
        .write_stdin("run 2024-01-15\nrun 2024-01-15\n")
        .assert()
        .success()
        .stdout(
            contains("Materialized 2 instance(s)").and(contains("Materialized 0 instance(s)")),
        );
}

#[test]
fn invalid_frequency_is_reported() {
    let home = common::temp_home();
    script_command(&home)
        .write_stdin("add Cleaner 80 bills expense fortnightly 2024-01-01\nlist\n")
        .assert()
        .success()
        .stderr(contains("Invalid frequency `fortnightly`"))
        .stdout(contains("No recurring templates yet"));
}

#[test]
fn unknown_command_suggests_closest() {
    let home = common::temp_home();
    script_command(&home)
        .write_stdin("lst\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `lst`").and(contains("Suggestion: `list`?")));
}

#[test]
fn unknown_category_warns_but_succeeds() {
    let home = common::temp_home();
    script_command(&home)
        .write_stdin("add Mystery 5 xyz expense daily 2024-01-01\n")
        .assert()
        .success()
        .stdout(contains("not a standard expense category").and(contains("Created template")));
}

#[test]
fn paused_template_is_skipped_until_resumed() {
    let home = common::temp_home();
    seed(
        &home,
        vec![(
            "a1b2c3d4-0000-4000-8000-000000000001",
            template("Gym", "health", TransactionKind::Expense, "weekly", date(2024, 1, 1)),
        )],
    );
    script_command(&home)
        .write_stdin(
            "pause a1b2\n\
             run 2024-01-15\n\
             resume A1B2C3\n\
             run 2024-01-15\n",
        )
        .assert()
        .success()
        .stdout(
            contains("Template a1b2c3d4 `Gym` paused")
                .and(contains("Materialized 0 instance(s) as of 2024-01-15"))
                .and(contains("Template a1b2c3d4 `Gym` resumed"))
                .and(contains("Materialized 2 instance(s) as of 2024-01-15")),
        );

    let store = JsonStore::new(home.join("recurring.json"));
    let dates: Vec<_> = store.instances().unwrap().iter().map(|i| i.date).collect();
    assert_eq!(dates, vec![date(2024, 1, 8), date(2024, 1, 15)]);
}

#[test]
fn ambiguous_and_unknown_prefixes_are_rejected() {
    let home = common::temp_home();
    seed(
        &home,
        vec![
            ("abcd0000-0000-4000-8000-000000000001", due_on("Water", date(2024, 2, 1))),
            ("abcd1111-0000-4000-8000-000000000002", due_on("Power", date(2024, 2, 1))),
        ],
    );
    script_command(&home)
        .write_stdin("pause abcd\npause ffff\nupcoming abcd1 1\n")
        .assert()
        .success()
        .stderr(
            contains("`abcd` is ambiguous (2 templates match)")
                .and(contains("no template matches `ffff`")),
        )
        .stdout(contains("Upcoming: Power (Monthly)").and(contains("2024-02-01")));
}

#[test]
fn due_lists_overdue_today_and_pending_but_not_future() {
    let home = common::temp_home();
    seed(
        &home,
        vec![
            ("10000000-0000-4000-8000-000000000001", due_on("Late", date(2024, 3, 1))),
            ("20000000-0000-4000-8000-000000000002", due_on("Today", date(2024, 3, 10))),
            ("30000000-0000-4000-8000-000000000003", due_on("Soon", date(2024, 3, 14))),
            ("40000000-0000-4000-8000-000000000004", due_on("Later", date(2024, 6, 1))),
        ],
    );
    script_command(&home)
        .write_stdin("due 2024-03-10\n")
        .assert()
        .success()
        .stdout(
            contains("Due as of 2024-03-10")
                .and(contains("2024-03-01 (overdue)"))
                .and(contains("2024-03-10 (due today)"))
                .and(contains("2024-03-14 (pending)"))
                .and(contains("Later").not()),
        );
}

#[test]
fn upcoming_projects_clamped_dates_and_caps_count() {
    let home = common::temp_home();
    seed(
        &home,
        vec![(
            "bbbb0000-0000-4000-8000-000000000001",
            template("Rent", "housing", TransactionKind::Expense, "monthly", date(2024, 1, 31)),
        )],
    );
    script_command(&home)
        .write_stdin("upcoming bbbb 3\nupcoming bbbb 100000\n")
        .assert()
        .success()
        .stdout(
            contains("2024-02-29")
                .and(contains("2024-03-29"))
                .and(contains("2024-04-29"))
                .and(contains("2024-05-29").not()),
        )
        .stderr(contains("count must be at most 500"));
}

#[test]
fn categories_show_styles_and_frequencies() {
    let home = common::temp_home();
    script_command(&home)
        .write_stdin("categories\n")
        .assert()
        .success()
        .stdout(
            contains("expense categories")
                .and(contains("income categories"))
                .and(contains("#EF5350"))
                .and(contains("briefcase"))
                .and(contains("Frequencies: daily, weekly, monthly, yearly")),
        );
}

use chrono::NaiveDate;

use crate::cli::core::{parse_date, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::ledger::{DueStatus, RecurrenceEngine};

use super::short_id;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "due",
            "Show which templates are due or coming up",
            "due [YYYY-MM-DD]",
            cmd_due,
        ),
        CommandEntry::new(
            "run",
            "Materialize every due occurrence",
            "run [YYYY-MM-DD]",
            cmd_run,
        ),
        CommandEntry::new(
            "instances",
            "List materialized transactions",
            "instances",
            cmd_instances,
        ),
    ]
}

fn evaluation_date(context: &ShellContext, args: &[&str]) -> Result<NaiveDate, CommandError> {
    match args.first() {
        Some(raw) => parse_date(raw),
        None => Ok(context.today()),
    }
}

fn cmd_due(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let as_of = evaluation_date(context, args)?;
    let window = context.config.pending_window_days;
    let mut shown = 0usize;
    output::section(format!("Due as of {}", as_of));
    for template in context.store.templates()?.into_iter().filter(|t| t.active) {
        let status = RecurrenceEngine::status(&template, as_of, window);
        if status == DueStatus::Future {
            continue;
        }
        shown += 1;
        output::row(format!(
            "{}  {:<20} {} ({})",
            short_id(template.id),
            template.title,
            template.next_due_date,
            status.label()
        ));
    }
    if shown == 0 {
        output::info(format!("Nothing due within {} day(s).", window));
    }
    Ok(())
}

fn cmd_run(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let as_of = evaluation_date(context, args)?;
    let report = context.scheduler.run_as_of(as_of)?;
    for entry in &report.materialized {
        output::row(format!("{}  {}", short_id(entry.template_id), entry.date));
    }
    output::success(format!(
        "Materialized {} instance(s) as of {}",
        report.materialized.len(),
        report.as_of
    ));
    if !report.conflicts.is_empty() {
        output::warning(format!(
            "{} template(s) were updated elsewhere and skipped",
            report.conflicts.len()
        ));
    }
    for failure in &report.failed {
        output::error(format!(
            "Template {} failed: {}",
            short_id(failure.template_id),
            failure.reason
        ));
    }
    if !report.capped.is_empty() {
        output::warning(format!(
            "{} template(s) hit the catch-up limit of {}; run again to continue",
            report.capped.len(),
            context.config.max_catch_up
        ));
    }
    Ok(())
}

fn cmd_instances(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let mut instances = context.store.instances()?;
    if instances.is_empty() {
        output::info("No transactions materialized yet.");
        return Ok(());
    }
    instances.sort_by_key(|instance| instance.date);
    output::section("Transactions");
    let mut net = 0.0;
    for instance in &instances {
        net += instance.signed_amount();
        output::row(format!(
            "{}  {:<20} {:>+10.2} {:<13} {}",
            instance.date,
            instance.title,
            instance.signed_amount(),
            instance.category,
            instance.icon
        ));
    }
    output::info(format!("Net: {:+.2}", net));
    Ok(())
}

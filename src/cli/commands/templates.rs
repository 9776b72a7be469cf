use crate::cli::core::{parse_date, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::ledger::{category::is_known, RecurrenceEngine, TemplateInput, TransactionKind};

use super::{require_arg, short_id};

const ADD_USAGE: &str = "add <title> <amount> <category> <income|expense> <frequency> <YYYY-MM-DD>";
const UPCOMING_USAGE: &str = "upcoming <id> [count]";
const DEFAULT_UPCOMING: usize = 5;
const MAX_UPCOMING: usize = 500;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Create a recurring template", ADD_USAGE, cmd_add),
        CommandEntry::new("list", "List recurring templates", "list", cmd_list),
        CommandEntry::new(
            "upcoming",
            "Show the next due dates of a template",
            UPCOMING_USAGE,
            cmd_upcoming,
        ),
        CommandEntry::new("pause", "Stop scheduling a template", "pause <id>", cmd_pause),
        CommandEntry::new("resume", "Resume scheduling a template", "resume <id>", cmd_resume),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() != 6 {
        return Err(CommandError::InvalidArguments(format!("usage: {}", ADD_USAGE)));
    }
    let amount: f64 = args[1].parse().map_err(|_| {
        CommandError::InvalidArguments(format!("invalid amount `{}`", args[1]))
    })?;
    let kind: TransactionKind = args[3].parse()?;
    let anchor_date = parse_date(args[5])?;

    let template = RecurrenceEngine::create_template(TemplateInput::new(
        args[0], amount, args[2], kind, args[4], anchor_date,
    ))?;
    context.store.save(&template)?;
    if !is_known(kind, &template.category) {
        output::warning(format!(
            "`{}` is not a standard {} category",
            template.category, kind
        ));
    }
    output::success(format!(
        "Created template {} `{}`; next due {}",
        short_id(template.id),
        template.title,
        template.next_due_date
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let templates = context.store.templates()?;
    if templates.is_empty() {
        output::info("No recurring templates yet. Use `add` to create one.");
        return Ok(());
    }
    output::section("Recurring templates");
    for template in templates {
        output::row(format!(
            "{}  {:<20} {:>10.2} {:<8} {:<13} {:<8} next {}{}",
            short_id(template.id),
            template.title,
            template.amount,
            template.kind,
            template.category,
            template.frequency,
            template.next_due_date,
            if template.active { "" } else { " (paused)" }
        ));
    }
    Ok(())
}

fn cmd_upcoming(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let needle = require_arg(args, 0, UPCOMING_USAGE)?;
    let count = match args.get(1) {
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("invalid count `{}`", raw))
        })?,
        None => DEFAULT_UPCOMING,
    };
    if count > MAX_UPCOMING {
        return Err(CommandError::InvalidArguments(format!(
            "count must be at most {}",
            MAX_UPCOMING
        )));
    }
    let template = context.store.find(needle)?;
    output::section(format!(
        "Upcoming: {} ({})",
        template.title,
        template.frequency.label()
    ));
    for date in RecurrenceEngine::upcoming(&template, count)? {
        output::row(date);
    }
    Ok(())
}

fn cmd_pause(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    set_active(context, require_arg(args, 0, "pause <id>")?, false)
}

fn cmd_resume(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    set_active(context, require_arg(args, 0, "resume <id>")?, true)
}

fn set_active(context: &mut ShellContext, needle: &str, active: bool) -> CommandResult {
    let mut template = context.store.find(needle)?;
    template.active = active;
    context.store.save(&template)?;
    output::success(format!(
        "Template {} `{}` {}",
        short_id(template.id),
        template.title,
        if active { "resumed" } else { "paused" }
    ));
    Ok(())
}

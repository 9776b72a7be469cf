use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::ledger::{category::categories_for, category::style_for, Frequency, TransactionKind};
use crate::storage::STORE_SCHEMA_VERSION;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "categories",
            "List known categories and their styles",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
        CommandEntry::new("quit", "Exit the shell", "quit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(meta.summary());
    output::row(format!("Store schema : v{}", STORE_SCHEMA_VERSION));
    output::row(format!(
        "Build        : {} {} on {}",
        meta.target, meta.profile, meta.built_on
    ));
    Ok(())
}

fn cmd_categories(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    for kind in [TransactionKind::Expense, TransactionKind::Income] {
        output::section(format!("{} categories", kind));
        for name in categories_for(kind) {
            let style = style_for(name);
            output::row(format!("{:<14} {:<16} {}", name, style.icon, style.color));
        }
    }
    let frequencies: Vec<&str> = Frequency::ALL.iter().map(Frequency::as_str).collect();
    output::info(format!("Frequencies: {}", frequencies.join(", ")));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

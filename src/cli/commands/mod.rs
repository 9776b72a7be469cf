mod schedule;
mod system;
mod templates;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut entries = system::definitions();
    entries.extend(templates::definitions());
    entries.extend(schedule::definitions());
    entries
}

pub(crate) fn require_arg<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}

pub(crate) fn short_id(id: uuid::Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

//! Diagnostics journal CLI command

use crate::diagnostics::Diagnostics;
use crate::error::PantryResult;

/// Print the most recent journal entries, oldest first
pub fn handle_log_command(diagnostics: &Diagnostics, count: usize) -> PantryResult<()> {
    let Some(journal) = diagnostics.journal() else {
        println!("Diagnostics journal is disabled (logging.journal_enabled = false).");
        return Ok(());
    };

    let entries = journal.read_recent(count)?;
    if entries.is_empty() {
        println!("No diagnostic entries.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    println!();
    println!(
        "Showing {} of {} entries ({})",
        entries.len(),
        journal.entry_count()?,
        journal.path().display()
    );
    Ok(())
}

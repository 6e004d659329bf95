// entry validation module - checks a caller makes before asking for analysis

use anyhow::{Result, bail};

/// message shown when someone asks to analyse an empty entry
pub const EMPTY_ENTRY_MESSAGE: &str = "please write something before analyzing.";

/// reject empty or whitespace-only entries
///
/// the analyser itself copes with empty text; this is for the surfaces
/// (cli, node binding) that should refuse to analyse nothing.
pub fn validate_entry(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!(EMPTY_ENTRY_MESSAGE);
    }
    Ok(())
}

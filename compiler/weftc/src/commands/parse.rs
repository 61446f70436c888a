//! The `parse` command: print a document's tree as JSON.

use std::io::Write;
use std::path::Path;

use super::{load_document, report_validation, CliError};

/// Print `to_dict()` of the document root, then any validation findings.
///
/// Findings do not fail the command; only unreadable or malformed input
/// does.
pub fn parse_file(path: &Path, out: &mut dyn Write, err: &mut dyn Write) -> Result<bool, CliError> {
    let parsed = load_document(path)?;
    let json = serde_json::to_string_pretty(&parsed.root.to_dict())
        .map_err(|e| CliError::Io(e.into()))?;
    writeln!(out, "{json}")?;
    report_validation(path, &parsed, err)?;
    Ok(true)
}

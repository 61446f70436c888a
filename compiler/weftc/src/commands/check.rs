//! The `check` command: parse and validate without running.

use std::io::Write;
use std::path::Path;

use super::{load_document, report_validation, CliError};

/// Fails when the document has any validation findings.
pub fn check_file(path: &Path, out: &mut dyn Write, err: &mut dyn Write) -> Result<bool, CliError> {
    let parsed = load_document(path)?;
    if parsed.is_valid() {
        writeln!(out, "OK: {} ({})", path.display(), parsed.root.tag_name())?;
        return Ok(true);
    }
    report_validation(path, &parsed, err)?;
    writeln!(
        err,
        "{}: {} validation error(s)",
        path.display(),
        parsed.errors.len()
    )?;
    Ok(false)
}

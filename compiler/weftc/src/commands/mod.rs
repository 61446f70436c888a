//! Command handlers for the Weft CLI.
//!
//! Each submodule implements one command. Commands write their normal
//! output to `out` and diagnostics to `err`, and report success as a
//! `bool` so the binary can choose the exit code.

mod check;
mod parse;
mod run;

use std::io;
use std::path::{Path, PathBuf};

use weft_parse::{ParseError, ParseOutput};

pub use check::check_file;
pub use parse::parse_file;
pub use run::{parse_run_options, run_file, RunOptions};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{}: {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Read a source file.
pub(crate) fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a document with the built-in registry.
pub(crate) fn load_document(path: &Path) -> Result<ParseOutput, CliError> {
    let src = read_file(path)?;
    weft_parse::parse_document(&src).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write each validation finding as `path: <tag>: message`.
pub(crate) fn report_validation(
    path: &Path,
    parsed: &ParseOutput,
    err: &mut dyn io::Write,
) -> io::Result<()> {
    for finding in &parsed.errors {
        writeln!(err, "{}: {finding}", path.display())?;
    }
    Ok(())
}

use std::io;
use std::path::PathBuf;

use weft_parse::ParseError;

/// Why a component could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No candidate file exists, or the file found is not a component.
    #[error("component `{name}` not found (last tried {})", last_attempted.display())]
    NotFound {
        name: String,
        last_attempted: PathBuf,
        /// Every candidate probed, in order.
        attempted: Vec<PathBuf>,
    },

    #[error("failed to parse component `{name}` at {}: {source}", path.display())]
    Parse {
        name: String,
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound { .. })
    }

    /// Candidate paths probed before giving up. Empty for non-lookup errors.
    pub fn attempted(&self) -> &[PathBuf] {
        match self {
            ResolveError::NotFound { attempted, .. } => attempted,
            ResolveError::Parse { .. } | ResolveError::Io { .. } => &[],
        }
    }
}

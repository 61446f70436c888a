//! Resolver configuration.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the component base directory.
pub const COMPONENTS_DIR_ENV: &str = "WEFT_COMPONENTS_DIR";

/// File extension of component sources.
pub const DEFAULT_EXTENSION: &str = "wft";

/// Where components live and what their files are called.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    pub base_dir: PathBuf,
    /// Extension without the leading dot.
    pub extension: String,
}

impl ResolverConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        ResolverConfig {
            base_dir: base_dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Defaults, with the base directory taken from `WEFT_COMPONENTS_DIR`
    /// when set and non-empty.
    pub fn from_env() -> Self {
        match env::var(COMPONENTS_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => ResolverConfig::new(dir),
            _ => ResolverConfig::default(),
        }
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// `name.ext`
    pub fn file_name(&self, name: &str) -> String {
        format!("{name}.{}", self.extension)
    }
}

impl Default for ResolverConfig {
    /// `./components` under the current directory, extension `wft`.
    fn default() -> Self {
        let base_dir = env::current_dir()
            .map(|cwd| cwd.join("components"))
            .unwrap_or_else(|_| PathBuf::from("components"));
        ResolverConfig::new(base_dir)
    }
}

//! Component resolution: component names to parsed, cached component ASTs.
//!
//! A name is looked up under a base directory with a fixed extension,
//! trying a handful of spellings (see [`ComponentResolver::candidates`]).
//! Successful resolutions are cached per `(from_path, name)` until
//! [`ComponentResolver::clear_cache`]; failures are not cached.

mod config;
mod error;
mod loader;
mod naming;
mod resolver;

pub use config::{ResolverConfig, COMPONENTS_DIR_ENV, DEFAULT_EXTENSION};
pub use error::ResolveError;
pub use loader::{FsLoader, SourceLoader};
pub use naming::snake_case;
pub use resolver::{ComponentMetadata, ComponentResolver};

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

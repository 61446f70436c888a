//! Cached component lookup.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};
use weft_ir::{visitor, ComponentNode, ImportNode};

use crate::{snake_case, FsLoader, ResolveError, ResolverConfig, SourceLoader};

/// A resolved component: where it came from and what it contains.
#[derive(Clone, Debug)]
pub struct ComponentMetadata {
    /// Name as requested.
    pub name: String,
    pub path: PathBuf,
    pub ast: ComponentNode,
    /// Every import declaration in the component, in document order.
    pub imports: Vec<ImportNode>,
}

/// `(from_path, name)`
type CacheKey = (Option<String>, String);

/// Resolves component names against a base directory, caching the results.
///
/// Shareable across threads behind an `Arc`. Lookups of different keys
/// proceed in parallel; concurrent misses on the same key are single-flight:
/// one caller parses while the rest wait on that key's slot and then read the
/// cached entry.
pub struct ComponentResolver {
    config: ResolverConfig,
    loader: Box<dyn SourceLoader>,
    cache: RwLock<FxHashMap<CacheKey, Arc<ComponentMetadata>>>,
    /// Per-key locks for in-flight misses.
    slots: Mutex<FxHashMap<CacheKey, Arc<Mutex<()>>>>,
}

impl ComponentResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_loader(config, FsLoader)
    }

    pub fn with_loader(config: ResolverConfig, loader: impl SourceLoader + 'static) -> Self {
        ComponentResolver {
            config,
            loader: Box::new(loader),
            cache: RwLock::new(FxHashMap::default()),
            slots: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `name`, optionally relative to `from_path` under the base
    /// directory. Repeated calls with the same arguments return the same
    /// `Arc` without touching the loader.
    pub fn resolve(
        &self,
        name: &str,
        from_path: Option<&str>,
    ) -> Result<Arc<ComponentMetadata>, ResolveError> {
        let key: CacheKey = (from_path.map(str::to_string), name.to_string());
        if let Some(hit) = self.cached(&key) {
            trace!(name, from_path, "component cache hit");
            return Ok(hit);
        }

        let slot = Arc::clone(self.slots.lock().entry(key.clone()).or_default());
        let result = {
            let _in_flight = slot.lock();
            // Another caller may have finished while we waited.
            match self.cached(&key) {
                Some(hit) => Ok(hit),
                None => self.load(name, from_path).map(|metadata| {
                    let metadata = Arc::new(metadata);
                    self.cache.write().insert(key.clone(), Arc::clone(&metadata));
                    metadata
                }),
            }
        };
        let mut slots = self.slots.lock();
        // A later caller may have installed a fresh slot after ours was
        // released; only drop the one this call waited on.
        if slots.get(&key).is_some_and(|current| Arc::ptr_eq(current, &slot)) {
            slots.remove(&key);
        }
        drop(slots);
        result
    }

    /// Drop every cached entry.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.write();
        debug!(entries = cache.len(), "clearing component cache");
        cache.clear();
    }

    /// Resolve a batch of names ahead of time. Failures are skipped; returns
    /// how many resolved.
    pub fn preload<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> usize {
        let mut loaded = 0;
        for name in names {
            match self.resolve(name, None) {
                Ok(_) => loaded += 1,
                Err(err) => debug!(name, error = %err, "preload skipped component"),
            }
        }
        loaded
    }

    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    /// Keys with a miss currently in flight.
    #[cfg(test)]
    pub(crate) fn in_flight_len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Candidate paths for `name`, in probe order, duplicates removed:
    ///
    /// 1. `{base}/{from_path}/{name}.{ext}` when `from_path` is given
    /// 2. `{base}/{name}.{ext}`
    /// 3. `{base}/{lowercase}.{ext}`
    /// 4. `{base}/{snake_case}.{ext}`
    pub fn candidates(&self, name: &str, from_path: Option<&str>) -> Vec<PathBuf> {
        let base = &self.config.base_dir;
        let mut paths = Vec::with_capacity(4);
        if let Some(from) = from_path {
            paths.push(join_relative(base, from).join(self.config.file_name(name)));
        }
        for spelling in [name.to_string(), name.to_lowercase(), snake_case(name)] {
            paths.push(base.join(self.config.file_name(&spelling)));
        }
        let mut unique: Vec<PathBuf> = Vec::with_capacity(paths.len());
        for path in paths {
            if !unique.contains(&path) {
                unique.push(path);
            }
        }
        unique
    }

    fn cached(&self, key: &CacheKey) -> Option<Arc<ComponentMetadata>> {
        self.cache.read().get(key).cloned()
    }

    fn load(&self, name: &str, from_path: Option<&str>) -> Result<ComponentMetadata, ResolveError> {
        let mut attempted = self.candidates(name, from_path);
        let Some(found) = attempted.iter().position(|p| self.loader.exists(p)) else {
            debug!(name, from_path, candidates = attempted.len(), "component not found");
            return Err(not_found(name, attempted));
        };
        // Candidates after the existing file were never probed.
        attempted.truncate(found + 1);
        let path = attempted[found].clone();

        debug!(name, path = %path.display(), "loading component");
        let source = self.loader.read(&path).map_err(|source| ResolveError::Io {
            path: path.clone(),
            source,
        })?;
        let output = weft_parse::parse_document(&source).map_err(|source| ResolveError::Parse {
            name: name.to_string(),
            path: path.clone(),
            source,
        })?;
        for error in &output.errors {
            warn!(name, path = %path.display(), %error, "component failed validation");
        }

        let imports = visitor::imports(&output.root).into_iter().cloned().collect();
        let Some(ast) = output.root.into_component() else {
            debug!(name, path = %path.display(), "file is not a component");
            return Err(not_found(name, attempted));
        };
        Ok(ComponentMetadata {
            name: name.to_string(),
            path,
            ast,
            imports,
        })
    }
}

impl std::fmt::Debug for ComponentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentResolver")
            .field("config", &self.config)
            .field("cached", &self.cached_len())
            .finish_non_exhaustive()
    }
}

fn not_found(name: &str, attempted: Vec<PathBuf>) -> ResolveError {
    ResolveError::NotFound {
        name: name.to_string(),
        last_attempted: attempted.last().cloned().unwrap_or_default(),
        attempted,
    }
}

/// `base` joined with `rel`, dropping `.` segments so `./ui` and `ui` agree.
fn join_relative(base: &Path, rel: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for part in Path::new(rel).components() {
        match part {
            Component::CurDir => {}
            other => path.push(other),
        }
    }
    path
}

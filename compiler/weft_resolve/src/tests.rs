use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;

use super::*;

/// In-memory loader that counts reads.
#[derive(Default)]
struct CountingLoader {
    files: FxHashMap<PathBuf, String>,
    reads: Arc<AtomicUsize>,
}

impl CountingLoader {
    fn with(mut self, path: &str, src: &str) -> Self {
        self.files.insert(PathBuf::from(path), src.to_string());
        self
    }
}

impl SourceLoader for CountingLoader {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

const CARD: &str = r#"<component name="Card">
  <import component="Icon" from="./ui"/>
  <set name="x" value="1"/>
</component>"#;

fn resolver(loader: CountingLoader) -> ComponentResolver {
    ComponentResolver::with_loader(ResolverConfig::new("/base"), loader)
}

#[test]
fn test_candidate_order_with_from_path() {
    let resolver = resolver(CountingLoader::default());
    assert_eq!(
        resolver.candidates("ProductCard", Some("./ui")),
        vec![
            PathBuf::from("/base/ui/ProductCard.wft"),
            PathBuf::from("/base/ProductCard.wft"),
            PathBuf::from("/base/productcard.wft"),
            PathBuf::from("/base/product_card.wft"),
        ]
    );
}

#[test]
fn test_duplicate_candidates_probed_once() {
    let resolver = resolver(CountingLoader::default());
    assert_eq!(
        resolver.candidates("card", None),
        vec![PathBuf::from("/base/card.wft")]
    );
}

#[test]
fn test_from_path_is_checked_first() {
    let loader = CountingLoader::default()
        .with("/base/ui/Card.wft", CARD)
        .with("/base/Card.wft", "<component name=\"Other\"/>");
    let meta = resolver(loader).resolve("Card", Some("./ui")).unwrap();
    assert_eq!(meta.path, PathBuf::from("/base/ui/Card.wft"));
    assert_eq!(meta.ast.name, "Card");
}

#[test]
fn test_falls_back_to_snake_case() {
    let loader = CountingLoader::default().with("/base/product_card.wft", CARD);
    let meta = resolver(loader).resolve("ProductCard", None).unwrap();
    assert_eq!(meta.path, PathBuf::from("/base/product_card.wft"));
}

#[test]
fn test_resolution_is_cached() {
    let loader = CountingLoader::default().with("/base/Card.wft", CARD);
    let reads = Arc::clone(&loader.reads);
    let resolver = resolver(loader);

    let first = resolver.resolve("Card", None).unwrap();
    let second = resolver.resolve("Card", None).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(reads.load(Ordering::SeqCst), 1);

    // A different from_path is a different key.
    resolver.resolve("Card", Some("elsewhere")).unwrap();
    assert_eq!(reads.load(Ordering::SeqCst), 2);
    assert_eq!(resolver.cached_len(), 2);

    resolver.clear_cache();
    assert_eq!(resolver.cached_len(), 0);
    let third = resolver.resolve("Card", None).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(reads.load(Ordering::SeqCst), 3);
}

#[test]
fn test_imports_are_extracted() {
    let loader = CountingLoader::default().with("/base/Card.wft", CARD);
    let meta = resolver(loader).resolve("Card", None).unwrap();
    assert_eq!(meta.imports.len(), 1);
    assert_eq!(meta.imports[0].component, "Icon");
    assert_eq!(meta.imports[0].from.as_deref(), Some("./ui"));
}

#[test]
fn test_not_found_reports_attempts() {
    let err = resolver(CountingLoader::default())
        .resolve("Card", Some("ui"))
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.attempted().len(), 3);
    assert_eq!(err.attempted()[0], PathBuf::from("/base/ui/Card.wft"));
    assert!(err.to_string().contains("/base/card.wft"));
}

#[test]
fn test_failures_are_not_cached() {
    let resolver = resolver(CountingLoader::default());
    assert!(resolver.resolve("Card", None).is_err());
    assert_eq!(resolver.cached_len(), 0);
}

#[test]
fn test_non_component_document_is_not_found() {
    let loader = CountingLoader::default().with("/base/Card.wft", "<div/>");
    let err = resolver(loader).resolve("Card", None).unwrap_err();
    assert!(err.is_not_found());
    // The rejected file is the last path named; later candidates were
    // never probed.
    assert_eq!(err.attempted(), [PathBuf::from("/base/Card.wft")]);
    assert!(err.to_string().contains("/base/Card.wft"), "{err}");
}

#[test]
fn test_rejected_file_is_reported_after_earlier_misses() {
    let loader = CountingLoader::default().with("/base/card.wft", "<div/>");
    let err = resolver(loader).resolve("Card", Some("ui")).unwrap_err();
    assert_eq!(
        err.attempted(),
        [
            PathBuf::from("/base/ui/Card.wft"),
            PathBuf::from("/base/Card.wft"),
            PathBuf::from("/base/card.wft"),
        ]
    );
    assert!(err.to_string().contains("/base/card.wft"), "{err}");
}

#[test]
fn test_malformed_component_is_parse_error() {
    let loader = CountingLoader::default().with("/base/Card.wft", "<component>");
    let err = resolver(loader).resolve("Card", None).unwrap_err();
    assert!(matches!(err, ResolveError::Parse { .. }));
}

#[test]
fn test_preload_skips_failures() {
    let loader = CountingLoader::default().with("/base/Card.wft", CARD);
    let resolver = resolver(loader);
    assert_eq!(resolver.preload(["Card", "Missing"]), 1);
    assert_eq!(resolver.cached_len(), 1);
}

#[test]
fn test_concurrent_misses_read_once() {
    let loader = CountingLoader::default().with("/base/Card.wft", CARD);
    let reads = Arc::clone(&loader.reads);
    let resolver = Arc::new(resolver(loader));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || resolver.resolve("Card", None).unwrap())
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(reads.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|m| Arc::ptr_eq(m, &results[0])));
}

#[test]
fn test_filesystem_loader() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("ui")).unwrap();
    std::fs::write(dir.path().join("ui").join("Card.wft"), CARD).unwrap();
    std::fs::write(dir.path().join("admin_layout.wft"), "<component name=\"AdminLayout\"/>")
        .unwrap();

    let resolver = ComponentResolver::new(ResolverConfig::new(dir.path()));
    let card = resolver.resolve("Card", Some("./ui")).unwrap();
    assert_eq!(card.path, dir.path().join("ui").join("Card.wft"));
    let layout = resolver.resolve("AdminLayout", None).unwrap();
    assert_eq!(layout.ast.name, "AdminLayout");
}

#[test]
fn test_config_extension_and_file_name() {
    let config = ResolverConfig::new("/base").with_extension(".xml");
    assert_eq!(config.file_name("Card"), "Card.xml");
    assert_eq!(ResolverConfig::new("/base").extension, DEFAULT_EXTENSION);
}

#[test]
fn test_concurrent_failed_misses_release_their_slots() {
    let loader = CountingLoader::default().with("/base/Card.wft", "<div/>");
    let resolver = Arc::new(resolver(loader));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                for _ in 0..16 {
                    assert!(resolver.resolve("Card", None).is_err());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(resolver.in_flight_len(), 0);
    assert_eq!(resolver.cached_len(), 0);
}

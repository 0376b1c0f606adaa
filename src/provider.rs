//! Binding string providers.

use crate::binding::{BindingParseResult, BindingParser};
use bindpath_path::{BoundedCache, CacheStats};
use std::sync::Arc;

/// Turns a binding string into parsed bindings.
pub trait BindingExpressionProvider: Send + Sync {
    fn parse_bindings(&self, text: &str) -> Arc<BindingParseResult>;

    fn name(&self) -> &'static str {
        "binding-expression-provider"
    }
}

impl BindingExpressionProvider for BindingParser {
    fn parse_bindings(&self, text: &str) -> Arc<BindingParseResult> {
        Arc::new(self.parse(text))
    }

    fn name(&self) -> &'static str {
        "binding-parser"
    }
}

/// Memoizes another provider by raw binding text. Results with diagnostics are
/// cached too, since parsing is deterministic.
pub struct CachingBindingExpressionProvider {
    inner: Arc<dyn BindingExpressionProvider>,
    cache: BoundedCache<String, Arc<BindingParseResult>>,
}

impl std::fmt::Debug for CachingBindingExpressionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingBindingExpressionProvider")
            .field("inner", &self.inner.name())
            .field("cache", &self.cache)
            .finish()
    }
}

impl CachingBindingExpressionProvider {
    pub fn new(inner: Arc<dyn BindingExpressionProvider>, capacity: usize) -> Self {
        Self {
            inner,
            cache: BoundedCache::new(capacity),
        }
    }

    pub fn invalidate(&self) {
        log::debug!("Invalidating binding cache ({} entries)", self.cache.len());
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl BindingExpressionProvider for CachingBindingExpressionProvider {
    fn parse_bindings(&self, text: &str) -> Arc<BindingParseResult> {
        self.cache
            .get_or_insert_with(text, || self.inner.parse_bindings(text))
    }

    fn name(&self) -> &'static str {
        "caching"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    struct Counting {
        parser: BindingParser,
        calls: AtomicUsize,
    }

    impl BindingExpressionProvider for Counting {
        fn parse_bindings(&self, text: &str) -> Arc<BindingParseResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.parser.parse_bindings(text)
        }
    }

    fn counting() -> Arc<Counting> {
        Arc::new(Counting {
            parser: BindingParser::default(),
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_repeated_text_is_parsed_once() {
        let inner = counting();
        let provider = CachingBindingExpressionProvider::new(inner.clone(), 8);
        let first = provider.parse_bindings("Text Name");
        let second = provider.parse_bindings("Text Name");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.stats().hits, 1);

        provider.invalidate();
        let third = provider.parse_bindings("Text Name");
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let inner = counting();
        let provider = CachingBindingExpressionProvider::new(inner.clone(), 0);
        provider.parse_bindings("Text Name");
        provider.parse_bindings("Text Name");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(provider.stats().len, 0);
    }

    #[test]
    fn test_invalidate_during_lookups() {
        let provider = Arc::new(CachingBindingExpressionProvider::new(counting(), 4));
        let readers: Vec<_> = (0..4)
            .map(|i| {
                let provider = Arc::clone(&provider);
                thread::spawn(move || {
                    for j in 0..200 {
                        let text = format!("Text Value{}", (i + j) % 6);
                        let result = provider.parse_bindings(&text);
                        assert_eq!(result.bindings[0].source_path().unwrap(), text[5..]);
                    }
                })
            })
            .collect();
        for _ in 0..50 {
            provider.invalidate();
        }
        for reader in readers {
            reader.join().unwrap();
        }
        assert!(provider.stats().len <= 4);
    }
}

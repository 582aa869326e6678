//! Doc-comment lookup for field descriptions.
//!
//! Description text comes from a collaborator outside the compiler (a source
//! scraper, a static table, nothing at all). The compiler only depends on
//! [`DocProvider`]; tests swap in [`StaticDocs`] or [`NoDocs`], and expensive
//! lookups can be wrapped in [`CachedDocs`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Supplies human text for record fields.
///
/// Implementations must be cheap to call or internally cached: the compiler
/// consults the provider once per retained field.
pub trait DocProvider: Send + Sync {
    /// The description for `field` of `type_name` in `namespace`, if known.
    fn field_doc(&self, namespace: &str, type_name: &str, field: &str) -> Option<String>;
}

/// A provider that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocs;

impl DocProvider for NoDocs {
    fn field_doc(&self, _namespace: &str, _type_name: &str, _field: &str) -> Option<String> {
        None
    }
}

/// A provider backed by a static table, for tests and generated data.
#[derive(Debug, Default)]
pub struct StaticDocs {
    docs: HashMap<String, String>,
}

impl StaticDocs {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field description.
    #[must_use]
    pub fn field(
        mut self,
        namespace: &str,
        type_name: &str,
        field: &str,
        doc: impl Into<String>,
    ) -> Self {
        self.docs.insert(doc_key(namespace, type_name, field), doc.into());
        self
    }
}

impl DocProvider for StaticDocs {
    fn field_doc(&self, namespace: &str, type_name: &str, field: &str) -> Option<String> {
        self.docs.get(&doc_key(namespace, type_name, field)).cloned()
    }
}

fn doc_key(namespace: &str, type_name: &str, field: &str) -> String {
    format!("{namespace}::{type_name}.{field}")
}

/// Caches an expensive per-namespace lookup.
///
/// The loader is invoked at most once per namespace under normal operation
/// (double-checked under a read/write lock); loading the same namespace twice
/// from concurrent callers is harmless since population is idempotent. The
/// loader returns a `Type.field -> doc` table for the whole namespace.
pub struct CachedDocs<F> {
    load: F,
    cache: RwLock<HashMap<String, Arc<HashMap<String, String>>>>,
}

impl<F> CachedDocs<F>
where
    F: Fn(&str) -> HashMap<String, String>,
{
    /// Wrap a namespace loader.
    pub fn new(load: F) -> Self {
        Self {
            load,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn namespace_docs(&self, namespace: &str) -> Arc<HashMap<String, String>> {
        {
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(docs) = cache.get(namespace) {
                return Arc::clone(docs);
            }
        }

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        // Another caller may have populated between the read and the write.
        if let Some(docs) = cache.get(namespace) {
            return Arc::clone(docs);
        }
        let docs = Arc::new((self.load)(namespace));
        cache.insert(namespace.to_string(), Arc::clone(&docs));
        docs
    }
}

impl<F> DocProvider for CachedDocs<F>
where
    F: Fn(&str) -> HashMap<String, String> + Send + Sync,
{
    fn field_doc(&self, namespace: &str, type_name: &str, field: &str) -> Option<String> {
        self.namespace_docs(namespace)
            .get(&format!("{type_name}.{field}"))
            .cloned()
    }
}

impl<F> std::fmt::Debug for CachedDocs<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedDocs").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_no_docs() {
        assert_eq!(NoDocs.field_doc("ns", "T", "f"), None);
    }

    #[test]
    fn test_static_docs_lookup() {
        let docs = StaticDocs::new().field("models", "User", "Name", "Display name.");
        assert_eq!(
            docs.field_doc("models", "User", "Name").as_deref(),
            Some("Display name.")
        );
        assert_eq!(docs.field_doc("models", "User", "Other"), None);
        assert_eq!(docs.field_doc("other", "User", "Name"), None);
    }

    #[test]
    fn test_cached_docs_loads_namespace_once() {
        let loads = AtomicUsize::new(0);
        let provider = CachedDocs::new(|namespace: &str| {
            loads.fetch_add(1, Ordering::SeqCst);
            let mut table = HashMap::new();
            if namespace == "models" {
                table.insert("User.Name".to_string(), "Display name.".to_string());
            }
            table
        });

        assert_eq!(
            provider.field_doc("models", "User", "Name").as_deref(),
            Some("Display name.")
        );
        assert_eq!(provider.field_doc("models", "User", "Missing"), None);
        assert_eq!(provider.field_doc("models", "Other", "Name"), None);
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        assert_eq!(provider.field_doc("elsewhere", "User", "Name"), None);
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }
}

//! Named-schema registry accumulated during a compilation run.
//!
//! Every named record seen by the compiler is pre-registered provisionally;
//! an entry only survives into the final reference set once something
//! actually points at it (a cycle hit or an explicit reference request).
//! This keeps the output free of spontaneous component entries for types
//! that are only ever rendered inline.

use indexmap::IndexMap;
use schemagen_openapi::Schema;

#[derive(Debug, Clone)]
struct RegistryEntry {
    schema: Schema,
    referenced: bool,
}

/// Insertion-ordered map of canonical name to compiled schema.
#[derive(Debug, Default)]
pub(crate) struct SchemaRegistry {
    entries: IndexMap<String, RegistryEntry>,
}

impl SchemaRegistry {
    /// Record a provisional entry before descending into a named record.
    ///
    /// The placeholder is patched with the finished schema afterwards; an
    /// entry that already exists (a shared subtree compiled twice) keeps its
    /// current state.
    pub(crate) fn preregister(&mut self, name: &str) {
        if !self.entries.contains_key(name) {
            self.entries.insert(
                name.to_string(),
                RegistryEntry {
                    schema: Schema::any(),
                    referenced: false,
                },
            );
        }
    }

    /// Flag an entry as actually pointed-at by a `$ref`.
    ///
    /// Called on a recursion-guard hit before the type has finished
    /// compiling, so a missing entry gets a placeholder.
    pub(crate) fn mark_referenced(&mut self, name: &str) {
        match self.entries.get_mut(name) {
            Some(entry) => entry.referenced = true,
            None => {
                self.entries.insert(
                    name.to_string(),
                    RegistryEntry {
                        schema: Schema::any(),
                        referenced: true,
                    },
                );
            }
        }
    }

    /// Replace the placeholder for `name` with its finished schema,
    /// preserving the referenced flag.
    pub(crate) fn patch(&mut self, name: &str, schema: Schema) {
        match self.entries.get_mut(name) {
            Some(entry) => entry.schema = schema,
            None => {
                self.entries.insert(
                    name.to_string(),
                    RegistryEntry {
                        schema,
                        referenced: false,
                    },
                );
            }
        }
    }

    /// Register a schema that is definitely referenced, such as the target
    /// of a `refName` or `elemRefName` override. Overwrites any placeholder.
    pub(crate) fn register(&mut self, name: &str, schema: Schema) {
        self.entries.insert(
            name.to_string(),
            RegistryEntry {
                schema,
                referenced: true,
            },
        );
    }

    /// Drain the registry into the set of schemas something references,
    /// dropping provisional entries nothing ever pointed at.
    pub(crate) fn into_child_refs(self) -> IndexMap<String, Schema> {
        self.entries
            .into_iter()
            .filter(|(_, entry)| entry.referenced)
            .map(|(name, entry)| (name, entry.schema))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreferenced_entries_are_dropped() {
        let mut registry = SchemaRegistry::default();
        registry.preregister("api.Inline");
        registry.patch("api.Inline", Schema::string());
        let refs = registry.into_child_refs();
        assert!(refs.is_empty(), "inline-only types must not be emitted");
    }

    #[test]
    fn test_cycle_hit_promotes_entry() {
        let mut registry = SchemaRegistry::default();
        registry.preregister("api.Node");
        registry.mark_referenced("api.Node");
        registry.patch("api.Node", Schema::boolean());
        let refs = registry.into_child_refs();
        assert!(matches!(refs.get("api.Node"), Some(Schema::Primitive(_))));
    }

    #[test]
    fn test_register_overwrites_placeholder() {
        let mut registry = SchemaRegistry::default();
        registry.preregister("api.Target");
        registry.register("api.Target", Schema::integer(Some("int64")));
        let refs = registry.into_child_refs();
        assert_eq!(refs.len(), 1);
    }
}

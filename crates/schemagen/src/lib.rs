//! Reflection-driven OpenAPI schema generation.
//!
//! schemagen turns structural type descriptors into OpenAPI 3.1 schema
//! nodes:
//!
//! - **Descriptor model** — types describe themselves via [`Reflect`] or
//!   hand-built [`TypeInfo`] graphs, with deferred handles for recursion
//! - **Tag-driven shaping** — two per-field annotation namespaces control
//!   naming, exclusion, placement, overrides, and cross-references
//! - **Cycle-safe compilation** — self- and mutually-referential types
//!   compile into named `$ref` nodes, never infinite expansion
//! - **Polymorphic unions** — discriminator/member field tags synthesize
//!   `oneOf`/`anyOf`/`allOf` compositions with dispatch mappings
//! - **Namespace remapping** — ordered rewrite rules turn internal module
//!   paths into the names a published document should carry
//!
//! # Quick Start
//!
//! ```
//! use schemagen::prelude::*;
//!
//! let user = TypeInfo::record(
//!     "models",
//!     "User",
//!     vec![
//!         FieldInfo::new("ID", TypeInfo::of(TypeKind::Int64)).schema_tag(",required"),
//!         FieldInfo::new("Name", TypeInfo::of(TypeKind::String)),
//!     ],
//! );
//!
//! let mut document = Document::new("My API", "1.0.0");
//! let compiled = Compiler::default().compile_component(&TypeRef::new(user));
//! assert!(compiled.error().is_none());
//! compiled.publish_to(&mut document);
//!
//! let spec = serde_json::to_string_pretty(&document.to_openapi()).unwrap();
//! assert!(spec.contains("models.User"));
//! ```
//!
//! # Crate Structure
//!
//! - [`schemagen_reflect`] — type descriptors, field tags, doc lookup
//! - [`schemagen_openapi`] — schema nodes, document registry, rewrite rules
//! - [`schemagen_compile`] — the recursive compiler and union synthesizer

#![forbid(unsafe_code)]

// Re-export crates
pub use schemagen_compile as compile;
pub use schemagen_openapi as openapi;
pub use schemagen_reflect as reflect;

// Re-export commonly used types
pub use schemagen_compile::{
    CompileError, CompileErrors, Compiled, Compiler, CompilerConfig,
};
pub use schemagen_openapi::{
    Discriminator, Document, OpenApi, RewriteRule, SCHEMA_REF_PREFIX, Schema, SchemaError,
    rewrite_name, sanitize_name,
};
pub use schemagen_reflect::{
    CachedDocs, DocProvider, FieldInfo, NoDocs, Reflect, StaticDocs, TypeInfo, TypeKind, TypeRef,
    UnionKind, canonical_name,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Compiler, CompilerConfig, DocProvider, Document, FieldInfo, NoDocs, Reflect, RewriteRule,
        Schema, StaticDocs, TypeInfo, TypeKind, TypeRef,
    };
    pub use serde::{Deserialize, Serialize};
}

/// Compile the schema for a type implementing [`Reflect`].
///
/// Convenience wrapper over [`Compiler::compile`] with no doc provider and
/// no rewrite rules.
///
/// ```
/// use schemagen::schema_of;
///
/// let compiled = schema_of::<Vec<String>>();
/// assert!(compiled.error().is_none());
/// ```
#[must_use]
pub fn schema_of<T: Reflect>() -> Compiled {
    Compiler::default().compile(&T::type_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_of_primitive() {
        let compiled = schema_of::<i64>();
        assert!(compiled.error().is_none());
        assert_eq!(
            serde_json::to_string(&compiled.schema).unwrap(),
            r#"{"type":"integer","format":"int64"}"#
        );
    }

    #[test]
    fn test_schema_of_container() {
        let compiled = schema_of::<std::collections::HashMap<String, Vec<bool>>>();
        assert_eq!(
            serde_json::to_string(&compiled.schema).unwrap(),
            r#"{"type":"object","additionalProperties":{"type":"array","items":{"type":"boolean"}}}"#
        );
    }
}

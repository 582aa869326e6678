//! Schema node model and document registry.
//!
//! This crate provides:
//!
//! - The [`Schema`] node model (object/array/map/primitive/reference/union)
//! - Discriminator descriptors and manual union-construction helpers
//! - The [`Document`] collaborator owning the shared component registry and
//!   the namespace rewrite rules
//!
//! # Example
//!
//! ```ignore
//! use schemagen_openapi::{Document, Schema};
//!
//! let mut doc = Document::new("My API", "1.0.0")
//!     .rewrite_rule("api", "internal/models");
//! doc.register_schema("api.Item", Schema::string());
//! let json = serde_json::to_string(&doc.to_openapi())?;
//! ```

#![forbid(unsafe_code)]

mod document;
mod schema;

pub use document::{
    Components, Document, Info, OpenApi, RewriteRule, rewrite_name, sanitize_name,
};
pub use schema::{
    AnySchema, ArraySchema, ArrayType, Discriminator, MapSchema, ObjectSchema, ObjectType,
    PrimitiveSchema, RefSchema, SCHEMA_REF_PREFIX, Schema, SchemaError, SchemaType, UnionSchema,
};

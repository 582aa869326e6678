//! Structural type descriptors for schema generation.
//!
//! This crate provides:
//!
//! - A runtime descriptor graph ([`TypeInfo`], [`TypeKind`], [`FieldInfo`],
//!   [`TypeRef`]) standing in for language-native reflection
//! - The [`Reflect`] trait for describing Rust types as descriptors
//! - The field tag parser ([`parse_field`], [`FieldDescriptor`])
//! - The doc-comment provider abstraction ([`DocProvider`])
//!
//! # Example
//!
//! ```ignore
//! use schemagen_reflect::{FieldInfo, TypeInfo, TypeKind};
//!
//! let item = TypeInfo::record("models", "Item", vec![
//!     FieldInfo::new("ID", TypeInfo::of(TypeKind::Int64)),
//!     FieldInfo::new("Name", TypeInfo::of(TypeKind::String)),
//! ]);
//! ```

#![forbid(unsafe_code)]

mod docs;
mod tags;
mod types;

pub use docs::{CachedDocs, DocProvider, NoDocs, StaticDocs};
pub use tags::{
    DiscriminatorRole, FieldDescriptor, ParamLocation, UnionKind, parse_field, parse_tags,
};
pub use types::{FieldInfo, Reflect, TypeInfo, TypeKind, TypeRef, canonical_name};

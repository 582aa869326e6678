//! Reflection-driven schema compilation.
//!
//! This crate turns structural type descriptors from `schemagen-reflect`
//! into the schema nodes of `schemagen-openapi`. The [`Compiler`] performs a
//! depth-first walk of the type graph with a recursion guard that breaks
//! cycles into named references, detects tagged polymorphic unions, applies
//! namespace rewrite rules to every reference, and accumulates recoverable
//! errors instead of aborting.
//!
//! ```
//! use schemagen_compile::Compiler;
//! use schemagen_reflect::{FieldInfo, TypeInfo, TypeKind, TypeRef};
//!
//! let user = TypeInfo::record(
//!     "models",
//!     "User",
//!     vec![
//!         FieldInfo::new("ID", TypeInfo::of(TypeKind::Int64)),
//!         FieldInfo::new("Name", TypeInfo::of(TypeKind::String)),
//!     ],
//! );
//! let compiled = Compiler::default().compile(&TypeRef::new(user));
//! assert!(compiled.error().is_none());
//! ```

#![forbid(unsafe_code)]

mod compiler;
mod error;
mod primitives;
mod registry;
mod remap;
mod union;

pub use compiler::{Compiled, Compiler, CompilerConfig};
pub use error::{CompileError, CompileErrors, ErrorSink};

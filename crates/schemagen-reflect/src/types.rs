//! Runtime descriptors for structural types.
//!
//! Schema compilation walks an explicit descriptor graph instead of
//! language-native reflection. A [`TypeInfo`] describes one type; fields and
//! container elements point at further descriptors through [`TypeRef`], which
//! may be deferred so self-referential and mutually-referential graphs can be
//! described without constructing an infinite value.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// The structural kind of a described type.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Boolean.
    Bool,
    /// UTF-8 string.
    String,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 8-bit unsigned integer.
    Uint8,
    /// 16-bit unsigned integer.
    Uint16,
    /// 32-bit unsigned integer.
    Uint32,
    /// 64-bit unsigned integer.
    Uint64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// The well-known date/time value type.
    ///
    /// Recognized ahead of generic record expansion and mapped to
    /// `string`/`date-time`.
    DateTime,
    /// A record (struct) with ordered fields.
    Record(Vec<FieldInfo>),
    /// A sequence of elements. `fixed_len` is set for fixed-size arrays.
    List {
        /// Element type.
        elem: TypeRef,
        /// Fixed length, if the sequence has one.
        fixed_len: Option<usize>,
    },
    /// An associative container. Keys are assumed string-like and are not
    /// described; only the value type matters for schemas.
    Map {
        /// Value type.
        value: TypeRef,
    },
    /// Pointer/optional indirection around another type.
    Optional(TypeRef),
    /// A kind that cannot be described by a schema (function, channel, ...).
    /// The label is used in the recorded error.
    Unsupported(String),
}

impl TypeKind {
    /// A short label for error messages.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            TypeKind::Bool => "bool",
            TypeKind::String => "string",
            TypeKind::Int8 => "int8",
            TypeKind::Int16 => "int16",
            TypeKind::Int32 => "int32",
            TypeKind::Int64 => "int64",
            TypeKind::Uint8 => "uint8",
            TypeKind::Uint16 => "uint16",
            TypeKind::Uint32 => "uint32",
            TypeKind::Uint64 => "uint64",
            TypeKind::Float32 => "float32",
            TypeKind::Float64 => "float64",
            TypeKind::DateTime => "date-time",
            TypeKind::Record(_) => "record",
            TypeKind::List { .. } => "list",
            TypeKind::Map { .. } => "map",
            TypeKind::Optional(_) => "optional",
            TypeKind::Unsupported(label) => label,
        }
    }
}

/// A described type: an optional name, its origin namespace, and a kind.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    /// Type name, for named types. Anonymous types have none.
    pub name: Option<String>,
    /// Origin namespace (package/module path). May contain `/` separators;
    /// those are rewritten during the remap pass.
    pub namespace: String,
    /// Structural kind.
    pub kind: TypeKind,
}

impl TypeInfo {
    /// Create an anonymous descriptor of the given kind.
    #[must_use]
    pub fn of(kind: TypeKind) -> Self {
        Self {
            name: None,
            namespace: String::new(),
            kind,
        }
    }

    /// Create a named descriptor.
    #[must_use]
    pub fn named(namespace: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: Some(name.into()),
            namespace: namespace.into(),
            kind,
        }
    }

    /// Create a named record descriptor with fields in declaration order.
    #[must_use]
    pub fn record(
        namespace: impl Into<String>,
        name: impl Into<String>,
        fields: Vec<FieldInfo>,
    ) -> Self {
        Self::named(namespace, name, TypeKind::Record(fields))
    }

    /// Create an anonymous list descriptor.
    #[must_use]
    pub fn list(elem: impl Into<TypeRef>) -> Self {
        Self::of(TypeKind::List {
            elem: elem.into(),
            fixed_len: None,
        })
    }

    /// Create an anonymous fixed-size sequence descriptor.
    #[must_use]
    pub fn fixed_list(elem: impl Into<TypeRef>, len: usize) -> Self {
        Self::of(TypeKind::List {
            elem: elem.into(),
            fixed_len: Some(len),
        })
    }

    /// Create an anonymous map descriptor over the given value type.
    #[must_use]
    pub fn map(value: impl Into<TypeRef>) -> Self {
        Self::of(TypeKind::Map {
            value: value.into(),
        })
    }

    /// Wrap a type in pointer/optional indirection.
    #[must_use]
    pub fn optional(inner: impl Into<TypeRef>) -> Self {
        Self::of(TypeKind::Optional(inner.into()))
    }

    /// Create a descriptor for a kind no schema can express.
    #[must_use]
    pub fn unsupported(label: impl Into<String>) -> Self {
        Self::of(TypeKind::Unsupported(label.into()))
    }

    /// The canonical, namespace-qualified name used as a registry key and
    /// reference target.
    ///
    /// Named types yield `namespace.Name`. A list whose element is a named
    /// type derives `namespace.NameList`, since sequences themselves carry no
    /// name. Anonymous types yield `None`.
    #[must_use]
    pub fn canonical_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(canonical_name(&self.namespace, name));
        }
        if let TypeKind::List { elem, .. } = &self.kind {
            return elem
                .concrete()
                .canonical_name()
                .map(|elem_name| format!("{elem_name}List"));
        }
        None
    }

    /// A human-oriented description of the type for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        self.canonical_name()
            .unwrap_or_else(|| self.kind.label().to_string())
    }
}

/// Join a namespace and a type name into a canonical name.
#[must_use]
pub fn canonical_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// A shared handle to a type descriptor.
///
/// `Deferred` wraps a thunk evaluated on [`TypeRef::resolve`]; recursive type
/// graphs are expressed by deferring the back-edge. The compiler consults its
/// recursion guard before resolving, so deferral plus the guard is what keeps
/// cyclic graphs finite.
#[derive(Clone)]
pub enum TypeRef {
    /// An eagerly built descriptor.
    Built(Arc<TypeInfo>),
    /// A descriptor produced on demand.
    Deferred(Arc<dyn Fn() -> TypeInfo + Send + Sync>),
}

impl TypeRef {
    /// Wrap an already built descriptor.
    #[must_use]
    pub fn new(info: TypeInfo) -> Self {
        TypeRef::Built(Arc::new(info))
    }

    /// Defer descriptor construction until resolution.
    #[must_use]
    pub fn deferred<F>(build: F) -> Self
    where
        F: Fn() -> TypeInfo + Send + Sync + 'static,
    {
        TypeRef::Deferred(Arc::new(build))
    }

    /// Resolve the handle to a descriptor.
    ///
    /// Deferred handles rebuild on every call; construction is shallow (one
    /// level of the graph), so this stays cheap even for cyclic graphs.
    #[must_use]
    pub fn resolve(&self) -> Arc<TypeInfo> {
        match self {
            TypeRef::Built(info) => Arc::clone(info),
            TypeRef::Deferred(build) => Arc::new(build()),
        }
    }

    /// Resolve and transparently unwrap pointer/optional indirection until a
    /// concrete kind is reached.
    #[must_use]
    pub fn concrete(&self) -> Arc<TypeInfo> {
        let mut info = self.resolve();
        loop {
            let inner = match &info.kind {
                TypeKind::Optional(inner) => inner.resolve(),
                _ => return info,
            };
            info = inner;
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Built(info) => f.debug_tuple("Built").field(info).finish(),
            TypeRef::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<TypeInfo> for TypeRef {
    fn from(info: TypeInfo) -> Self {
        TypeRef::new(info)
    }
}

/// One field of a record descriptor.
///
/// Declaration order of the containing `Vec<FieldInfo>` is significant: it
/// determines output property order.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Source field name.
    pub name: String,
    /// Raw general-purpose serialization tag, if any.
    pub serde_tag: Option<String>,
    /// Raw schema-specific tag, if any.
    pub schema_tag: Option<String>,
    /// Whether the field is accessible. Unexported fields are skipped.
    pub exported: bool,
    /// Whether the field is an embedded/anonymous member whose object-shaped
    /// children are spliced into the parent.
    pub embedded: bool,
    /// Field type.
    pub ty: TypeRef,
}

impl FieldInfo {
    /// Create an exported, non-embedded field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            serde_tag: None,
            schema_tag: None,
            exported: true,
            embedded: false,
            ty: ty.into(),
        }
    }

    /// Set the serialization tag.
    #[must_use]
    pub fn serde_tag(mut self, tag: impl Into<String>) -> Self {
        self.serde_tag = Some(tag.into());
        self
    }

    /// Set the schema tag.
    #[must_use]
    pub fn schema_tag(mut self, tag: impl Into<String>) -> Self {
        self.schema_tag = Some(tag.into());
        self
    }

    /// Mark the field as embedded.
    #[must_use]
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Mark the field as unexported.
    #[must_use]
    pub fn unexported(mut self) -> Self {
        self.exported = false;
        self
    }
}

/// Trait for Rust types that can describe themselves as type descriptors.
///
/// The `'static` bound lets the default [`Reflect::type_ref`] hand
/// `Self::type_info` to a deferred thunk.
pub trait Reflect: 'static {
    /// Produce the descriptor for this type.
    fn type_info() -> TypeInfo;

    /// Produce a deferred handle to the descriptor.
    ///
    /// The default defers construction, which is what allows `impl Reflect`
    /// blocks of self-referential types to terminate.
    #[must_use]
    fn type_ref() -> TypeRef {
        TypeRef::deferred(Self::type_info)
    }
}

macro_rules! reflect_primitive {
    ($($ty:ty => $kind:expr),+ $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::of($kind)
                }
            }
        )+
    };
}

reflect_primitive! {
    bool => TypeKind::Bool,
    String => TypeKind::String,
    i8 => TypeKind::Int8,
    i16 => TypeKind::Int16,
    i32 => TypeKind::Int32,
    i64 => TypeKind::Int64,
    u8 => TypeKind::Uint8,
    u16 => TypeKind::Uint16,
    u32 => TypeKind::Uint32,
    u64 => TypeKind::Uint64,
    f32 => TypeKind::Float32,
    f64 => TypeKind::Float64,
}

impl Reflect for &'static str {
    fn type_info() -> TypeInfo {
        TypeInfo::of(TypeKind::String)
    }
}

impl Reflect for std::time::SystemTime {
    fn type_info() -> TypeInfo {
        TypeInfo::of(TypeKind::DateTime)
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::optional(T::type_ref())
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::list(T::type_ref())
    }
}

impl<V: Reflect> Reflect for HashMap<String, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::map(V::type_ref())
    }
}

impl<V: Reflect> Reflect for BTreeMap<String, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::map(V::type_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name_joins_namespace() {
        assert_eq!(canonical_name("models", "User"), "models.User");
        assert_eq!(canonical_name("", "User"), "User");
    }

    #[test]
    fn test_record_canonical_name() {
        let info = TypeInfo::record("api/models", "User", Vec::new());
        assert_eq!(info.canonical_name().as_deref(), Some("api/models.User"));
    }

    #[test]
    fn test_list_derives_suffixed_name() {
        let item = TypeInfo::record("models", "Item", Vec::new());
        let list = TypeInfo::list(item);
        assert_eq!(list.canonical_name().as_deref(), Some("models.ItemList"));
    }

    #[test]
    fn test_list_of_anonymous_has_no_name() {
        let list = TypeInfo::list(TypeInfo::of(TypeKind::String));
        assert_eq!(list.canonical_name(), None);
    }

    #[test]
    fn test_concrete_unwraps_nested_optionals() {
        let ty = TypeRef::new(TypeInfo::optional(TypeInfo::optional(TypeInfo::of(
            TypeKind::Int32,
        ))));
        let concrete = ty.concrete();
        assert!(matches!(concrete.kind, TypeKind::Int32));
    }

    #[test]
    fn test_deferred_resolution_is_shallow() {
        // A self-referential descriptor: Node { next: Optional(Node) }.
        fn node() -> TypeInfo {
            TypeInfo::record(
                "graph",
                "Node",
                vec![FieldInfo::new(
                    "next",
                    TypeInfo::optional(TypeRef::deferred(node)),
                )],
            )
        }
        let info = TypeRef::deferred(node).resolve();
        assert_eq!(info.canonical_name().as_deref(), Some("graph.Node"));
        // One further level resolves without recursing to the bottom.
        if let TypeKind::Record(fields) = &info.kind {
            let next = fields[0].ty.concrete();
            assert_eq!(next.canonical_name().as_deref(), Some("graph.Node"));
        } else {
            panic!("expected record kind");
        }
    }

    #[test]
    fn test_reflect_primitives() {
        assert!(matches!(i64::type_info().kind, TypeKind::Int64));
        assert!(matches!(u32::type_info().kind, TypeKind::Uint32));
        assert!(matches!(f32::type_info().kind, TypeKind::Float32));
        assert!(matches!(
            std::time::SystemTime::type_info().kind,
            TypeKind::DateTime
        ));
    }

    #[test]
    fn test_default_type_ref_defers() {
        // The default implementation hands `Self::type_info` to a thunk;
        // borrowed-string impls must satisfy that too.
        let ty = <&str as Reflect>::type_ref();
        assert!(matches!(ty.resolve().kind, TypeKind::String));
        let ty = <Vec<i64> as Reflect>::type_ref();
        assert!(matches!(ty.resolve().kind, TypeKind::List { .. }));
    }

    #[test]
    fn test_reflect_containers() {
        let vec_info = Vec::<String>::type_info();
        assert!(matches!(vec_info.kind, TypeKind::List { .. }));

        let map_info = HashMap::<String, bool>::type_info();
        assert!(matches!(map_info.kind, TypeKind::Map { .. }));

        let opt_info = Option::<i64>::type_info();
        assert!(matches!(opt_info.kind, TypeKind::Optional(_)));
    }
}

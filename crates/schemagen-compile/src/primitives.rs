//! Primitive kind to schema fragment mapping.

use schemagen_openapi::Schema;
use schemagen_reflect::TypeKind;

/// Map a primitive structural kind to its fixed `{type, format}` fragment.
///
/// Returns `None` for non-primitive kinds; the compiler dispatches those to
/// the container mappers or records an unsupported-type error. The exact
/// strings matter for wire compatibility: unsigned integers deliberately
/// carry no format.
pub(crate) fn schema_for(kind: &TypeKind) -> Option<Schema> {
    match kind {
        TypeKind::Bool => Some(Schema::boolean()),
        TypeKind::String => Some(Schema::string()),
        TypeKind::Int8 | TypeKind::Int16 | TypeKind::Int32 => {
            Some(Schema::integer(Some("int32")))
        }
        TypeKind::Int64 => Some(Schema::integer(Some("int64"))),
        TypeKind::Uint8 | TypeKind::Uint16 | TypeKind::Uint32 | TypeKind::Uint64 => {
            Some(Schema::integer(None))
        }
        TypeKind::Float32 => Some(Schema::number(Some("float"))),
        TypeKind::Float64 => Some(Schema::number(Some("double"))),
        TypeKind::DateTime => Some(Schema::date_time()),
        _ => None,
    }
}

/// Build the bare fragment for a `type=` override.
///
/// The override forces a primitive kind irrespective of the field's real
/// structural type. Unrecognized override names degrade to a plain string
/// fragment.
pub(crate) fn forced_schema(name: &str) -> Schema {
    match name {
        "bool" | "boolean" => Schema::boolean(),
        "int" | "integer" => Schema::integer(None),
        "int32" => Schema::integer(Some("int32")),
        "int64" => Schema::integer(Some("int64")),
        "number" => Schema::number(None),
        "float" => Schema::number(Some("float")),
        "double" => Schema::number(Some("double")),
        "date-time" => Schema::date_time(),
        _ => Schema::string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemagen_openapi::{SchemaType, Schema as S};

    fn fragment(kind: TypeKind) -> (SchemaType, Option<String>) {
        match schema_for(&kind) {
            Some(S::Primitive(p)) => (p.schema_type, p.format),
            other => panic!("expected primitive fragment, got {other:?}"),
        }
    }

    #[test]
    fn test_primitive_table() {
        assert_eq!(fragment(TypeKind::Bool), (SchemaType::Boolean, None));
        assert_eq!(fragment(TypeKind::String), (SchemaType::String, None));
        assert_eq!(
            fragment(TypeKind::Int8),
            (SchemaType::Integer, Some("int32".to_string()))
        );
        assert_eq!(
            fragment(TypeKind::Int16),
            (SchemaType::Integer, Some("int32".to_string()))
        );
        assert_eq!(
            fragment(TypeKind::Int32),
            (SchemaType::Integer, Some("int32".to_string()))
        );
        assert_eq!(
            fragment(TypeKind::Int64),
            (SchemaType::Integer, Some("int64".to_string()))
        );
        assert_eq!(fragment(TypeKind::Uint8), (SchemaType::Integer, None));
        assert_eq!(fragment(TypeKind::Uint16), (SchemaType::Integer, None));
        assert_eq!(fragment(TypeKind::Uint32), (SchemaType::Integer, None));
        assert_eq!(fragment(TypeKind::Uint64), (SchemaType::Integer, None));
        assert_eq!(
            fragment(TypeKind::Float32),
            (SchemaType::Number, Some("float".to_string()))
        );
        assert_eq!(
            fragment(TypeKind::Float64),
            (SchemaType::Number, Some("double".to_string()))
        );
        assert_eq!(
            fragment(TypeKind::DateTime),
            (SchemaType::String, Some("date-time".to_string()))
        );
    }

    #[test]
    fn test_non_primitives_are_not_mapped() {
        assert!(schema_for(&TypeKind::Record(Vec::new())).is_none());
        assert!(schema_for(&TypeKind::Unsupported("func".to_string())).is_none());
    }

    #[test]
    fn test_forced_fragments() {
        assert!(matches!(forced_schema("integer"), S::Primitive(ref p) if p.format.is_none()));
        assert!(
            matches!(forced_schema("int64"), S::Primitive(ref p) if p.format.as_deref() == Some("int64"))
        );
        // Unknown overrides degrade to a string fragment.
        assert!(
            matches!(forced_schema("uuid"), S::Primitive(ref p) if p.schema_type == SchemaType::String)
        );
    }
}

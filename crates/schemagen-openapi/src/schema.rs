//! Schema node types.
//!
//! The compiler synthesizes [`Schema`] values bottom-up: primitives first,
//! composites wrapping already-built children. Nodes are immutable once
//! returned from compilation; only the remap pass rewrites the name strings
//! inside reference targets and discriminator mappings.

use indexmap::IndexMap;
use schemagen_reflect::UnionKind;
use serde::{Deserialize, Serialize};

/// Prefix of every schema reference in a document.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// A schema node.
///
/// A reference node never carries inline structural content; it is resolved
/// by name against the document's component registry at output time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Schema {
    /// Reference to a registered schema.
    Ref(RefSchema),
    /// Discriminated composition (`oneOf`/`anyOf`/`allOf`).
    Union(UnionSchema),
    /// Sequence schema.
    Array(ArraySchema),
    /// Associative schema (`additionalProperties`).
    Map(MapSchema),
    /// Record schema with ordered properties.
    Object(ObjectSchema),
    /// Primitive type schema.
    Primitive(PrimitiveSchema),
    /// Permissive placeholder matching any value.
    Any(AnySchema),
}

impl Schema {
    /// Create a string schema.
    #[must_use]
    pub fn string() -> Self {
        Schema::Primitive(PrimitiveSchema::new(SchemaType::String, None))
    }

    /// Create an integer schema with optional format.
    #[must_use]
    pub fn integer(format: Option<&str>) -> Self {
        Schema::Primitive(PrimitiveSchema::new(SchemaType::Integer, format))
    }

    /// Create a number schema with optional format.
    #[must_use]
    pub fn number(format: Option<&str>) -> Self {
        Schema::Primitive(PrimitiveSchema::new(SchemaType::Number, format))
    }

    /// Create a boolean schema.
    #[must_use]
    pub fn boolean() -> Self {
        Schema::Primitive(PrimitiveSchema::new(SchemaType::Boolean, None))
    }

    /// Create a `string`/`date-time` schema.
    #[must_use]
    pub fn date_time() -> Self {
        Schema::Primitive(PrimitiveSchema::new(SchemaType::String, Some("date-time")))
    }

    /// Create the permissive any-type placeholder.
    #[must_use]
    pub fn any() -> Self {
        Schema::Any(AnySchema {})
    }

    /// Create a reference to a registered schema name.
    #[must_use]
    pub fn reference(name: &str) -> Self {
        Schema::Ref(RefSchema {
            reference: format!("{SCHEMA_REF_PREFIX}{name}"),
        })
    }

    /// Create an array schema.
    #[must_use]
    pub fn array(items: Schema) -> Self {
        Schema::Array(ArraySchema {
            schema_type: ArrayType::Array,
            description: None,
            items: Box::new(items),
            max_items: None,
        })
    }

    /// Create a map schema over the given value schema.
    #[must_use]
    pub fn map(value: Schema) -> Self {
        Schema::Map(MapSchema {
            schema_type: ObjectType::Object,
            description: None,
            additional_properties: Box::new(value),
        })
    }

    /// Create an object schema with ordered properties.
    #[must_use]
    pub fn object(properties: IndexMap<String, Schema>, required: Vec<String>) -> Self {
        Schema::Object(ObjectSchema {
            schema_type: ObjectType::Object,
            description: None,
            properties,
            required,
        })
    }

    /// Create a `oneOf` composition.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyUnion`] when no members are given.
    pub fn one_of(members: Vec<Schema>) -> Result<Self, SchemaError> {
        Self::union(UnionKind::OneOf, members)
    }

    /// Create an `anyOf` composition.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyUnion`] when no members are given.
    pub fn any_of(members: Vec<Schema>) -> Result<Self, SchemaError> {
        Self::union(UnionKind::AnyOf, members)
    }

    /// Create an `allOf` composition.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyUnion`] when no members are given.
    pub fn all_of(members: Vec<Schema>) -> Result<Self, SchemaError> {
        Self::union(UnionKind::AllOf, members)
    }

    fn union(kind: UnionKind, members: Vec<Schema>) -> Result<Self, SchemaError> {
        if members.is_empty() {
            return Err(SchemaError::EmptyUnion);
        }
        Ok(Schema::Union(UnionSchema::new(kind, members)))
    }

    /// Set a description on this schema, where the shape carries one.
    ///
    /// Reference and placeholder nodes have no description of their own.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.set_description(description.into());
        self
    }

    /// Set a description in place. No-op on reference/placeholder nodes.
    pub fn set_description(&mut self, description: String) {
        match self {
            Schema::Object(o) => o.description = Some(description),
            Schema::Array(a) => a.description = Some(description),
            Schema::Map(m) => m.description = Some(description),
            Schema::Primitive(p) => p.description = Some(description),
            Schema::Union(u) => u.description = Some(description),
            Schema::Ref(_) | Schema::Any(_) => {}
        }
    }
}

/// Errors from manual schema construction helpers.
///
/// These are programmer-usage errors at the builder layer, recorded hard and
/// immediately, unlike compilation's accumulate-and-continue policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A union builder was invoked with zero member schemas.
    #[error("union composition requires at least one member schema")]
    EmptyUnion,
    /// A discriminator mapping helper received an odd alias/value list.
    #[error("discriminator mapping requires alias/name pairs, got {count} values")]
    OddMappingArity {
        /// Number of values supplied.
        count: usize,
    },
}

/// Schema reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefSchema {
    /// Reference path (e.g., "#/components/schemas/Item").
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl RefSchema {
    /// The registered name this reference targets, if it uses the
    /// component-schema prefix.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.reference.strip_prefix(SCHEMA_REF_PREFIX)
    }

    /// Point the reference at a different registered name.
    pub fn set_target(&mut self, name: &str) {
        self.reference = format!("{SCHEMA_REF_PREFIX}{name}");
    }
}

/// Discriminated composition schema.
///
/// Exactly one of the three member lists is populated; which one is the
/// composition kind. The discriminator descriptor is present only when at
/// least one mapping alias or a default mapping exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnionSchema {
    /// `oneOf` members.
    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,
    /// `anyOf` members.
    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Schema>,
    /// `allOf` members.
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,
    /// Discriminator descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UnionSchema {
    /// Create a composition of the given kind.
    #[must_use]
    pub fn new(kind: UnionKind, members: Vec<Schema>) -> Self {
        let mut union = UnionSchema::default();
        match kind {
            UnionKind::OneOf => union.one_of = members,
            UnionKind::AnyOf => union.any_of = members,
            UnionKind::AllOf => union.all_of = members,
        }
        union
    }

    /// The member list, whichever composition kind is populated.
    #[must_use]
    pub fn members(&self) -> &[Schema] {
        if !self.one_of.is_empty() {
            &self.one_of
        } else if !self.any_of.is_empty() {
            &self.any_of
        } else {
            &self.all_of
        }
    }

    /// Mutable access to the populated member list.
    pub fn members_mut(&mut self) -> &mut Vec<Schema> {
        if !self.one_of.is_empty() {
            &mut self.one_of
        } else if !self.any_of.is_empty() {
            &mut self.any_of
        } else {
            &mut self.all_of
        }
    }
}

/// Discriminator descriptor for a composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    /// Output name of the field whose value selects the member.
    pub property_name: String,
    /// Alias used when a value matches no mapping entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mapping: Option<String>,
    /// Alias to reference-path dispatch table, in registration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

impl Discriminator {
    /// Create a descriptor with an empty mapping table.
    #[must_use]
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            default_mapping: None,
            mapping: IndexMap::new(),
        }
    }

    /// Set the default mapping alias.
    #[must_use]
    pub fn with_default_mapping(mut self, alias: impl Into<String>) -> Self {
        self.default_mapping = Some(alias.into());
        self
    }

    /// Add one alias to registered-name entry.
    pub fn insert(&mut self, alias: impl Into<String>, target_name: &str) {
        self.mapping
            .insert(alias.into(), format!("{SCHEMA_REF_PREFIX}{target_name}"));
    }

    /// Build a descriptor from a flat alias/name pair list.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::OddMappingArity`] when the list has an odd
    /// number of entries.
    pub fn from_pairs(
        property_name: impl Into<String>,
        pairs: &[&str],
    ) -> Result<Self, SchemaError> {
        if pairs.len() % 2 != 0 {
            return Err(SchemaError::OddMappingArity { count: pairs.len() });
        }
        let mut discriminator = Self::new(property_name);
        for pair in pairs.chunks_exact(2) {
            discriminator.insert(pair[0], pair[1]);
        }
        Ok(discriminator)
    }
}

/// Marker for the `"type": "object"` tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    /// Object type.
    #[default]
    Object,
}

/// Marker for the `"type": "array"` tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayType {
    /// Array type.
    #[default]
    Array,
}

/// Object schema.
///
/// Property insertion order is output order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectSchema {
    /// Always `object`.
    #[serde(rename = "type")]
    pub schema_type: ObjectType,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered properties.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    /// Required property names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// Associative schema: string-like keys, one value schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSchema {
    /// Always `object`.
    #[serde(rename = "type")]
    pub schema_type: ObjectType,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value schema.
    #[serde(rename = "additionalProperties")]
    pub additional_properties: Box<Schema>,
}

/// Array schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArraySchema {
    /// Always `array`.
    #[serde(rename = "type")]
    pub schema_type: ArrayType,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Item schema.
    pub items: Box<Schema>,
    /// Maximum items; set for fixed-size sequences.
    #[serde(rename = "maxItems", default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

/// Primitive type schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimitiveSchema {
    /// JSON Schema type.
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    /// Format hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PrimitiveSchema {
    /// Create a primitive schema with optional format.
    #[must_use]
    pub fn new(schema_type: SchemaType, format: Option<&str>) -> Self {
        Self {
            schema_type,
            format: format.map(String::from),
            description: None,
        }
    }
}

/// JSON Schema primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// String type.
    String,
    /// Number type (float).
    Number,
    /// Integer type.
    Integer,
    /// Boolean type.
    Boolean,
}

/// Placeholder schema matching any value; serializes to `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnySchema {}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(schema: &Schema) -> String {
        serde_json::to_string(schema).unwrap()
    }

    #[test]
    fn test_primitive_serialization() {
        assert_eq!(json(&Schema::string()), r#"{"type":"string"}"#);
        assert_eq!(
            json(&Schema::integer(Some("int64"))),
            r#"{"type":"integer","format":"int64"}"#
        );
        assert_eq!(json(&Schema::integer(None)), r#"{"type":"integer"}"#);
        assert_eq!(
            json(&Schema::date_time()),
            r#"{"type":"string","format":"date-time"}"#
        );
    }

    #[test]
    fn test_any_serializes_to_empty_object() {
        assert_eq!(json(&Schema::any()), "{}");
    }

    #[test]
    fn test_reference_serialization() {
        let schema = Schema::reference("models.User");
        assert_eq!(json(&schema), r##"{"$ref":"#/components/schemas/models.User"}"##);
        if let Schema::Ref(r) = &schema {
            assert_eq!(r.target(), Some("models.User"));
        } else {
            panic!("expected reference");
        }
    }

    #[test]
    fn test_object_preserves_property_order() {
        let mut properties = IndexMap::new();
        properties.insert("zeta".to_string(), Schema::string());
        properties.insert("alpha".to_string(), Schema::boolean());
        let schema = Schema::object(properties, vec!["zeta".to_string()]);
        assert_eq!(
            json(&schema),
            r#"{"type":"object","properties":{"zeta":{"type":"string"},"alpha":{"type":"boolean"}},"required":["zeta"]}"#
        );
    }

    #[test]
    fn test_map_serialization() {
        let schema = Schema::map(Schema::integer(None));
        assert_eq!(
            json(&schema),
            r#"{"type":"object","additionalProperties":{"type":"integer"}}"#
        );
    }

    #[test]
    fn test_array_with_max_items() {
        let mut schema = Schema::array(Schema::string());
        if let Schema::Array(a) = &mut schema {
            a.max_items = Some(4);
        }
        assert_eq!(
            json(&schema),
            r#"{"type":"array","items":{"type":"string"},"maxItems":4}"#
        );
    }

    #[test]
    fn test_union_serialization() {
        let schema = Schema::one_of(vec![Schema::string(), Schema::boolean()]).unwrap();
        assert_eq!(
            json(&schema),
            r#"{"oneOf":[{"type":"string"},{"type":"boolean"}]}"#
        );
    }

    #[test]
    fn test_empty_union_is_an_error() {
        assert!(matches!(Schema::one_of(Vec::new()), Err(SchemaError::EmptyUnion)));
        assert!(matches!(Schema::any_of(Vec::new()), Err(SchemaError::EmptyUnion)));
        assert!(matches!(Schema::all_of(Vec::new()), Err(SchemaError::EmptyUnion)));
    }

    #[test]
    fn test_discriminator_serialization() {
        let mut discriminator = Discriminator::new("kind").with_default_mapping("cat");
        discriminator.insert("cat", "models.Cat");
        let mut union =
            UnionSchema::new(UnionKind::OneOf, vec![Schema::reference("models.Cat")]);
        union.discriminator = Some(discriminator);
        assert_eq!(
            json(&Schema::Union(union)),
            r##"{"oneOf":[{"$ref":"#/components/schemas/models.Cat"}],"discriminator":{"propertyName":"kind","defaultMapping":"cat","mapping":{"cat":"#/components/schemas/models.Cat"}}}"##
        );
    }

    #[test]
    fn test_discriminator_from_pairs() {
        let discriminator =
            Discriminator::from_pairs("kind", &["cat", "models.Cat", "dog", "models.Dog"])
                .unwrap();
        assert_eq!(discriminator.mapping.len(), 2);
        assert_eq!(
            discriminator.mapping.get("dog").map(String::as_str),
            Some("#/components/schemas/models.Dog")
        );
    }

    #[test]
    fn test_discriminator_odd_arity_is_an_error() {
        let result = Discriminator::from_pairs("kind", &["cat", "models.Cat", "dog"]);
        assert!(matches!(
            result,
            Err(SchemaError::OddMappingArity { count: 3 })
        ));
    }

    #[test]
    fn test_description_setting() {
        let schema = Schema::string().with_description("A name.");
        assert_eq!(
            json(&schema),
            r#"{"type":"string","description":"A name."}"#
        );
        // References never carry inline content.
        let schema = Schema::reference("X").with_description("ignored");
        assert_eq!(json(&schema), r##"{"$ref":"#/components/schemas/X"}"##);
    }

    #[test]
    fn test_union_members_accessor() {
        let union = UnionSchema::new(UnionKind::AnyOf, vec![Schema::string()]);
        assert_eq!(union.members().len(), 1);
        assert!(union.one_of.is_empty());
        assert!(!union.any_of.is_empty());
    }
}

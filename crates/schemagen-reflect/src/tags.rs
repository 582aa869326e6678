//! Field tag parsing.
//!
//! Each field carries up to two raw annotation strings: a general-purpose
//! serialization tag (`name` plus an exclusion sentinel) and a schema tag
//! (`name,key=value,...`). Parsing is best-effort: malformed `key=value`
//! segments are skipped silently and never fail the field.

use crate::types::FieldInfo;

/// Where a field is bound on the wire.
///
/// Fields with a non-body placement belong to an operation's parameter list
/// and are skipped by body-schema compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamLocation {
    /// Request body (the default).
    #[default]
    Body,
    /// Path segment.
    Path,
    /// Query string.
    Query,
    /// Header.
    Header,
}

impl ParamLocation {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "body" => Some(ParamLocation::Body),
            "path" => Some(ParamLocation::Path),
            "query" => Some(ParamLocation::Query),
            "header" => Some(ParamLocation::Header),
            _ => None,
        }
    }
}

/// Which composition keyword a polymorphic union uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionKind {
    /// `oneOf` composition.
    OneOf,
    /// `anyOf` composition.
    AnyOf,
    /// `allOf` composition.
    AllOf,
}

/// A field's role in a polymorphic union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscriminatorRole {
    /// Ordinary field.
    #[default]
    None,
    /// The discriminator field whose value selects the member.
    Discriminator,
    /// A union member field.
    Member,
}

/// Everything tag parsing derives for one field.
///
/// Computed fresh per field during a compilation pass; not persisted.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Source field name.
    pub source_name: String,
    /// Output name after tag overrides.
    pub output_name: String,
    /// Whether the field appears in output at all.
    pub included: bool,
    /// Parameter placement.
    pub location: ParamLocation,
    /// Whether the field is required.
    pub required: bool,
    /// Forced primitive kind, ignoring the structural type.
    pub type_override: Option<String>,
    /// Requested cross-reference name for the field's own value.
    pub ref_name: Option<String>,
    /// Requested cross-reference name for the field's element type.
    /// Meaningful only on sequence-typed fields.
    pub elem_ref_name: Option<String>,
    /// Role in a polymorphic union.
    pub role: DiscriminatorRole,
    /// Composition kind, when the role is `Member`.
    pub union_kind: Option<UnionKind>,
    /// Alias used in the union's dispatch table, when the role is `Member`.
    pub mapping: Option<String>,
    /// Default mapping alias, when the role is `Discriminator`.
    pub default_mapping: Option<String>,
    /// Hint that a union member's schema should be expanded in place.
    pub inline: bool,
}

impl FieldDescriptor {
    fn new(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            output_name: source_name.to_string(),
            included: true,
            location: ParamLocation::Body,
            required: false,
            type_override: None,
            ref_name: None,
            elem_ref_name: None,
            role: DiscriminatorRole::None,
            union_kind: None,
            mapping: None,
            default_mapping: None,
            inline: false,
        }
    }
}

/// Parse a field's annotations into a [`FieldDescriptor`].
#[must_use]
pub fn parse_field(field: &FieldInfo) -> FieldDescriptor {
    parse_tags(
        &field.name,
        field.serde_tag.as_deref(),
        field.schema_tag.as_deref(),
    )
}

/// Parse the two raw annotation strings for a field.
///
/// Precedence: the schema tag's name segment wins over the serialization
/// tag's; with neither, the field's own name is used verbatim.
#[must_use]
pub fn parse_tags(
    field_name: &str,
    serde_tag: Option<&str>,
    schema_tag: Option<&str>,
) -> FieldDescriptor {
    let mut desc = FieldDescriptor::new(field_name);

    if let Some(tag) = serde_tag {
        apply_serde_tag(&mut desc, tag);
    }
    if let Some(tag) = schema_tag {
        apply_schema_tag(&mut desc, tag);
    }

    desc
}

fn apply_serde_tag(desc: &mut FieldDescriptor, tag: &str) {
    let mut segments = tag.split(',');
    let name = segments.next().unwrap_or_default();
    if name == "-" {
        desc.included = false;
        return;
    }
    if !name.is_empty() {
        desc.output_name = name.to_string();
    }
    // `name,-` also excludes.
    if segments.any(|segment| segment == "-") {
        desc.included = false;
    }
}

fn apply_schema_tag(desc: &mut FieldDescriptor, tag: &str) {
    if tag == "-" {
        desc.included = false;
        return;
    }

    let mut segments = tag.split(',');
    let name = segments.next().unwrap_or_default();
    if !name.is_empty() {
        // Schema-tag name wins over the serialization tag's.
        desc.output_name = name.to_string();
    }

    for segment in segments {
        match segment.split_once('=') {
            Some(("in", value)) => {
                if let Some(location) = ParamLocation::parse(value) {
                    desc.location = location;
                }
            }
            Some(("type", value)) => desc.type_override = Some(value.to_string()),
            Some(("refName", value)) => desc.ref_name = Some(value.to_string()),
            Some(("elemRefName", value)) => desc.elem_ref_name = Some(value.to_string()),
            Some(("defaultMapping", value)) => desc.default_mapping = Some(value.to_string()),
            Some(("mapping", value)) => desc.mapping = Some(value.to_string()),
            Some(_) => {}
            None => match segment {
                "required" => desc.required = true,
                "discriminator" => desc.role = DiscriminatorRole::Discriminator,
                "oneOf" => set_member(desc, UnionKind::OneOf),
                "anyOf" => set_member(desc, UnionKind::AnyOf),
                "allOf" => set_member(desc, UnionKind::AllOf),
                "inline" => desc.inline = true,
                // Malformed segments are dropped: parsing is best-effort.
                _ => {}
            },
        }
    }
}

fn set_member(desc: &mut FieldDescriptor, kind: UnionKind) {
    desc.role = DiscriminatorRole::Member;
    desc.union_kind = Some(kind);
}

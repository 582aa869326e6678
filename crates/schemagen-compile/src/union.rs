//! Polymorphic union detection and synthesis.
//!
//! A record qualifies as a discriminated union when exactly one field is
//! tagged as the discriminator, at least one field is tagged as a member,
//! and every member agrees on the composition kind. Anything short of that
//! is a detection failure, not an error: the record compiles as an ordinary
//! object.

use indexmap::IndexMap;
use schemagen_openapi::{Discriminator, Schema, UnionSchema};
use schemagen_reflect::{
    DiscriminatorRole, FieldDescriptor, FieldInfo, UnionKind, canonical_name,
};

use crate::compiler::{CompileState, Compiler};

/// A detected union: the discriminator field plus the member fields, with
/// the composition kind they agreed on.
pub(crate) struct UnionPlan<'a> {
    pub(crate) kind: UnionKind,
    pub(crate) discriminator: &'a FieldDescriptor,
    pub(crate) members: Vec<(&'a FieldDescriptor, &'a FieldInfo)>,
}

/// Decide whether a record's parsed fields form a polymorphic union.
pub(crate) fn detect<'a>(
    fields: &'a [(FieldDescriptor, &'a FieldInfo)],
) -> Option<UnionPlan<'a>> {
    let mut discriminator = None;
    let mut members = Vec::new();

    for (desc, field) in fields {
        match desc.role {
            DiscriminatorRole::Discriminator => {
                if discriminator.replace(desc).is_some() {
                    // Two discriminators on one record.
                    return None;
                }
            }
            DiscriminatorRole::Member => members.push((desc, *field)),
            DiscriminatorRole::None => {}
        }
    }

    let discriminator = discriminator?;
    let (first, _) = members.first()?;
    let kind = first.union_kind?;
    if members.iter().any(|(desc, _)| desc.union_kind != Some(kind)) {
        // Mixed composition kinds on one record.
        return None;
    }

    Some(UnionPlan {
        kind,
        discriminator,
        members,
    })
}

/// Build the composition node for a detected union.
///
/// Members requesting a cross-reference name compile to a registered
/// reference; `inline` members keep their compiled schema as-is; every other
/// member is nested one level under its own output name. Optional
/// indirection is unwrapped before that decision is made.
pub(crate) fn synthesize(
    compiler: &Compiler<'_>,
    plan: &UnionPlan<'_>,
    st: &mut CompileState,
) -> Schema {
    let mut member_schemas = Vec::with_capacity(plan.members.len());
    let mut discriminator = Discriminator::new(&plan.discriminator.output_name);
    let mut has_mapping = false;

    for (desc, field) in &plan.members {
        let member_info = field.ty.concrete();
        let compiled = compiler.compile_type(&field.ty, Some(&desc.source_name), st);

        let schema = if let Some(ref_name) = &desc.ref_name {
            let target = canonical_name(&member_info.namespace, ref_name);
            st.registry.register(&target, compiled);
            Schema::reference(&target)
        } else if desc.inline {
            compiled
        } else {
            let mut properties = IndexMap::new();
            properties.insert(desc.output_name.clone(), compiled);
            Schema::object(properties, Vec::new())
        };

        if let Some(alias) = &desc.mapping {
            let target = match &desc.ref_name {
                Some(ref_name) => canonical_name(&member_info.namespace, ref_name),
                None => member_info
                    .canonical_name()
                    .unwrap_or_else(|| desc.output_name.clone()),
            };
            discriminator.insert(alias.clone(), &target);
            has_mapping = true;
        }

        member_schemas.push(schema);
    }

    let mut union = UnionSchema::new(plan.kind, member_schemas);
    if let Some(default) = &plan.discriminator.default_mapping {
        discriminator.default_mapping = Some(default.clone());
        has_mapping = true;
    }
    if has_mapping {
        union.discriminator = Some(discriminator);
    }
    Schema::Union(union)
}

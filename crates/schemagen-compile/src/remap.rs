//! Reference rewriting pass.
//!
//! After compilation every reference target and discriminator mapping value
//! is rewritten through the document's rename rules. The walk visits every
//! node unconditionally; non-reference leaves are untouched, so applying the
//! pass twice yields the same result as applying it once.

use indexmap::IndexMap;
use schemagen_openapi::{RewriteRule, SCHEMA_REF_PREFIX, Schema, rewrite_name};

/// Rewrite all reference targets inside `schema` in place.
pub(crate) fn remap_schema(schema: &mut Schema, rules: &[RewriteRule]) {
    match schema {
        Schema::Ref(r) => {
            if let Some(target) = r.target() {
                let rewritten = rewrite_name(rules, target);
                r.set_target(&rewritten);
            }
        }
        Schema::Union(u) => {
            for member in u.members_mut() {
                remap_schema(member, rules);
            }
            if let Some(discriminator) = &mut u.discriminator {
                for value in discriminator.mapping.values_mut() {
                    if let Some(target) = value.strip_prefix(SCHEMA_REF_PREFIX) {
                        let rewritten = rewrite_name(rules, target);
                        *value = format!("{SCHEMA_REF_PREFIX}{rewritten}");
                    }
                }
            }
        }
        Schema::Array(a) => remap_schema(&mut a.items, rules),
        Schema::Map(m) => remap_schema(&mut m.additional_properties, rules),
        Schema::Object(o) => {
            for property in o.properties.values_mut() {
                remap_schema(property, rules);
            }
        }
        Schema::Primitive(_) | Schema::Any(_) => {}
    }
}

/// Rewrite registry keys and the references inside each registered schema.
pub(crate) fn remap_registry(
    registry: IndexMap<String, Schema>,
    rules: &[RewriteRule],
) -> IndexMap<String, Schema> {
    registry
        .into_iter()
        .map(|(name, mut schema)| {
            remap_schema(&mut schema, rules);
            (rewrite_name(rules, &name), schema)
        })
        .collect()
}

//! The recursive type compiler.
//!
//! One [`Compiler`] value holds everything shared across a compilation run:
//! the configuration, the doc-comment provider, and the active rewrite
//! rules. Each top-level compile call owns its own isolated guard stack and
//! registry, so independent calls on one compiler may run concurrently.

use indexmap::IndexMap;
use schemagen_openapi::{Document, RewriteRule, Schema, rewrite_name};
use schemagen_reflect::{
    DocProvider, FieldDescriptor, FieldInfo, NoDocs, ParamLocation, TypeInfo, TypeKind, TypeRef,
    canonical_name, parse_field,
};

use crate::error::{CompileError, CompileErrors, ErrorSink};
use crate::registry::SchemaRegistry;
use crate::{primitives, remap, union};

/// Knobs affecting a compilation run.
///
/// Threaded explicitly through the compiler rather than held in process
/// state, so two compilers with different settings can coexist.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompilerConfig {
    /// Skip doc-comment lookup entirely. Affects only `description`
    /// attributes, never structural shape.
    pub skip_docs: bool,
}

/// Per-call mutable compilation state.
///
/// The guard stack holds the canonical names of records currently being
/// expanded; hitting one again means a cycle, resolved by emitting a
/// reference to the in-progress name.
#[derive(Debug, Default)]
pub(crate) struct CompileState {
    guard: Vec<String>,
    pub(crate) registry: SchemaRegistry,
    errors: ErrorSink,
}

/// Compiles structural type descriptors into schema nodes.
pub struct Compiler<'a> {
    config: CompilerConfig,
    docs: &'a dyn DocProvider,
    rules: &'a [RewriteRule],
}

impl Default for Compiler<'_> {
    fn default() -> Self {
        Compiler::new(&NoDocs)
    }
}

impl<'a> Compiler<'a> {
    /// Create a compiler with default configuration and no rewrite rules.
    #[must_use]
    pub fn new(docs: &'a dyn DocProvider) -> Self {
        Self {
            config: CompilerConfig::default(),
            docs,
            rules: &[],
        }
    }

    /// Create a compiler bound to a document's rewrite rules.
    #[must_use]
    pub fn for_document(docs: &'a dyn DocProvider, document: &'a Document) -> Self {
        Self::new(docs).with_rules(document.rules())
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the rewrite rule list.
    #[must_use]
    pub fn with_rules(mut self, rules: &'a [RewriteRule]) -> Self {
        self.rules = rules;
        self
    }

    /// Compile a type to an inline schema.
    ///
    /// The result's child references hold every named sub-schema something
    /// actually points at; its component references are empty.
    #[must_use]
    pub fn compile(&self, ty: &TypeRef) -> Compiled {
        self.run(ty, false)
    }

    /// Compile a type and promote its own schema to a component reference.
    ///
    /// The type's canonical name moves into the component-reference map,
    /// disjoint from the child references.
    #[must_use]
    pub fn compile_component(&self, ty: &TypeRef) -> Compiled {
        self.run(ty, true)
    }

    fn run(&self, ty: &TypeRef, promote: bool) -> Compiled {
        let mut st = CompileState::default();
        let mut schema = self.compile_type(ty, None, &mut st);

        remap::remap_schema(&mut schema, self.rules);
        let mut child_refs = remap::remap_registry(st.registry.into_child_refs(), self.rules);

        let mut component_refs = IndexMap::new();
        if promote {
            if let Some(name) = ty.concrete().canonical_name() {
                let name = rewrite_name(self.rules, &name);
                child_refs.shift_remove(&name);
                component_refs.insert(name, schema.clone());
            }
        }

        Compiled {
            schema,
            child_refs,
            component_refs,
            errors: st.errors.into_vec(),
        }
    }

    /// Compile one type graph node.
    ///
    /// `field` names the field being compiled, for error attribution; `None`
    /// at the top level or inside anonymous positions.
    pub(crate) fn compile_type(
        &self,
        ty: &TypeRef,
        field: Option<&str>,
        st: &mut CompileState,
    ) -> Schema {
        let info = ty.concrete();

        // A name already on the guard stack means this expansion reached
        // itself; break the cycle with a reference to the in-progress entry.
        if let Some(name) = info.canonical_name() {
            if st.guard.contains(&name) {
                st.registry.mark_referenced(&name);
                return Schema::reference(&name);
            }
        }

        let guarded = self.enter(&info, st);

        let schema = match &info.kind {
            TypeKind::Record(fields) => self.compile_record(&info, fields, st),
            TypeKind::List { elem, fixed_len } => {
                let items = self.compile_type(elem, field, st);
                let mut schema = Schema::array(items);
                if let (Schema::Array(array), Some(len)) = (&mut schema, fixed_len) {
                    array.max_items = Some(*len);
                }
                schema
            }
            TypeKind::Map { value } => Schema::map(self.compile_type(value, field, st)),
            TypeKind::Unsupported(label) => {
                st.errors.unsupported(field, label);
                Schema::any()
            }
            other => match primitives::schema_for(other) {
                Some(schema) => schema,
                None => {
                    st.errors.unsupported(field, other.label());
                    Schema::any()
                }
            },
        };

        // Stack discipline: the guard entry comes off even when the body
        // recorded errors.
        if let Some(name) = guarded {
            st.registry.patch(&name, schema.clone());
            st.guard.pop();
        }

        schema
    }

    /// Push any type with a canonical name onto the guard stack. Records
    /// additionally pre-register a provisional entry a cycle can resolve
    /// against; for other named shapes (e.g. a self-referential named
    /// sequence) the cycle hit itself creates the placeholder. Returns the
    /// pushed name, or `None` when the type needs no guard.
    fn enter(&self, info: &TypeInfo, st: &mut CompileState) -> Option<String> {
        let name = info.canonical_name()?;
        st.guard.push(name.clone());
        if matches!(info.kind, TypeKind::Record(_)) {
            st.registry.preregister(&name);
        }
        Some(name)
    }

    fn compile_record(
        &self,
        info: &TypeInfo,
        fields: &[FieldInfo],
        st: &mut CompileState,
    ) -> Schema {
        let parsed: Vec<(FieldDescriptor, &FieldInfo)> = fields
            .iter()
            .filter(|field| field.exported)
            .map(|field| (parse_field(field), field))
            .collect();

        if let Some(plan) = union::detect(&parsed) {
            return union::synthesize(self, &plan, st);
        }

        let mut properties = IndexMap::new();
        let mut required = Vec::new();

        for (desc, field) in &parsed {
            if !desc.included || desc.location != ParamLocation::Body {
                continue;
            }

            let mut schema = if let Some(forced) = &desc.type_override {
                // The override replaces structural compilation outright.
                primitives::forced_schema(forced)
            } else if field.embedded {
                let compiled = self.compile_type(&field.ty, Some(&desc.source_name), st);
                if let Schema::Object(embedded) = compiled {
                    // Inheritance by embedding: splice the children flat.
                    for (name, property) in embedded.properties {
                        properties.insert(name, property);
                    }
                    required.extend(embedded.required);
                    continue;
                }
                compiled
            } else {
                self.compile_type(&field.ty, Some(&desc.source_name), st)
            };

            if !self.config.skip_docs {
                if let Some(type_name) = &info.name {
                    if let Some(doc) = self.docs.field_doc(&info.namespace, type_name, &field.name)
                    {
                        schema.set_description(doc);
                    }
                }
            }

            if let Some(elem_ref) = &desc.elem_ref_name {
                self.wrap_element_reference(field, elem_ref, &mut schema, st);
            }

            // The reference wrapping is orthogonal to everything above and
            // applies last, even over a forced type override.
            if let Some(ref_name) = &desc.ref_name {
                let target = canonical_name(&field.ty.concrete().namespace, ref_name);
                st.registry.register(&target, schema);
                schema = Schema::reference(&target);
            }

            if desc.required {
                required.push(desc.output_name.clone());
            }
            properties.insert(desc.output_name.clone(), schema);
        }

        Schema::object(properties, required)
    }

    /// Replace a sequence field's inline element schema with a reference
    /// registered under the requested name.
    fn wrap_element_reference(
        &self,
        field: &FieldInfo,
        elem_ref: &str,
        schema: &mut Schema,
        st: &mut CompileState,
    ) {
        let concrete = field.ty.concrete();
        let TypeKind::List { elem, .. } = &concrete.kind else {
            return;
        };
        let Schema::Array(array) = schema else {
            return;
        };
        let target = canonical_name(&elem.concrete().namespace, elem_ref);
        let items = std::mem::replace(array.items.as_mut(), Schema::any());
        st.registry.register(&target, items);
        *array.items = Schema::reference(&target);
    }
}

/// The outcome of one top-level compile call.
///
/// The schema itself is always present; on partial failure the offending
/// positions hold permissive placeholders and the errors list says what was
/// skipped. Child and component references are disjoint maps.
#[derive(Debug)]
pub struct Compiled {
    /// The compiled schema node.
    pub schema: Schema,
    /// Named sub-schemas something references, keyed by rewritten canonical
    /// name.
    pub child_refs: IndexMap<String, Schema>,
    /// Schemas promoted to document components by this call.
    pub component_refs: IndexMap<String, Schema>,
    /// Accumulated non-fatal errors.
    pub errors: Vec<CompileError>,
}

impl Compiled {
    /// The accumulated errors as a single error value, if any were recorded.
    #[must_use]
    pub fn error(&self) -> Option<CompileErrors> {
        if self.errors.is_empty() {
            None
        } else {
            Some(CompileErrors(self.errors.clone()))
        }
    }

    /// Convert into the schema, failing when any error was recorded.
    ///
    /// # Errors
    ///
    /// Returns the accumulated [`CompileErrors`] when compilation recorded
    /// at least one problem.
    pub fn into_result(self) -> Result<Schema, CompileErrors> {
        if self.errors.is_empty() {
            Ok(self.schema)
        } else {
            Err(CompileErrors(self.errors))
        }
    }

    /// Publish this result's references into a document.
    ///
    /// Component references always land in the document; child references
    /// are published as well, since a referenced schema is by definition
    /// meant to be shared.
    pub fn publish_to(&self, document: &mut Document) {
        document.merge_schemas(&self.component_refs);
        document.merge_schemas(&self.child_refs);
    }
}

//! Document collaborator: the shared schema registry and rewrite rules.
//!
//! The compiler hands its discovered schemas to an owning [`Document`], which
//! holds the shared component registry and the active namespace-rewrite rule
//! list. Rendering the result is a plain serde serialization of [`OpenApi`].

use crate::schema::Schema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One source-namespace to output-namespace rewrite rule.
///
/// Rules are tried in registration order; the first match wins.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    /// Namespace written into matching names.
    pub output: String,
    /// Source namespace prefix to match.
    pub source: String,
}

impl RewriteRule {
    /// Create a rule mapping `source` to `output`.
    #[must_use]
    pub fn new(output: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            source: source.into(),
        }
    }

    /// Apply the rule to a name, if its source namespace matches.
    ///
    /// The match is boundary-checked: the prefix must be the whole name or be
    /// followed by a separator, never a mid-identifier match.
    #[must_use]
    pub fn apply(&self, name: &str) -> Option<String> {
        let rest = name.strip_prefix(&self.source)?;
        if rest.is_empty() {
            return Some(self.output.clone());
        }
        if rest.starts_with('.') || rest.starts_with('/') {
            return Some(format!("{}{rest}", self.output));
        }
        None
    }
}

/// Rewrite a canonical name through an ordered rule list and sanitize it.
///
/// Names with no matching rule pass through unchanged apart from the
/// sanitization step. The result never matches a source namespace that the
/// rewrite just replaced, so applying the same rules again is a no-op.
#[must_use]
pub fn rewrite_name(rules: &[RewriteRule], name: &str) -> String {
    for rule in rules {
        if let Some(rewritten) = rule.apply(name) {
            return sanitize_name(&rewritten);
        }
    }
    sanitize_name(name)
}

/// Replace path separators with the neutral joining character.
///
/// Downstream reference syntax forbids `/` inside schema names.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.replace('/', ".")
}

/// The owning document: shared schema registry plus rewrite rules.
#[derive(Debug, Default)]
pub struct Document {
    info: Info,
    rules: Vec<RewriteRule>,
    schemas: IndexMap<String, Schema>,
}

impl Document {
    /// Create a document with the given title and version.
    #[must_use]
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: Info {
                title: title.into(),
                version: version.into(),
                description: None,
            },
            rules: Vec::new(),
            schemas: IndexMap::new(),
        }
    }

    /// Add a namespace rewrite rule.
    #[must_use]
    pub fn rewrite_rule(mut self, output: impl Into<String>, source: impl Into<String>) -> Self {
        self.rules.push(RewriteRule::new(output, source));
        self
    }

    /// The active rewrite rules, in registration order.
    #[must_use]
    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Register one schema in the shared registry.
    pub fn register_schema(&mut self, name: impl Into<String>, schema: Schema) {
        self.schemas.insert(name.into(), schema);
    }

    /// Merge a batch of named schemas into the shared registry.
    ///
    /// Later registrations of the same name win; compilation patches
    /// placeholders the same way.
    pub fn merge_schemas(&mut self, schemas: &IndexMap<String, Schema>) {
        for (name, schema) in schemas {
            self.schemas.insert(name.clone(), schema.clone());
        }
    }

    /// The shared schema registry.
    #[must_use]
    pub fn schemas(&self) -> &IndexMap<String, Schema> {
        &self.schemas
    }

    /// Render the document as a serializable OpenAPI carrier.
    #[must_use]
    pub fn to_openapi(&self) -> OpenApi {
        OpenApi {
            openapi: "3.1.0".to_string(),
            info: self.info.clone(),
            components: if self.schemas.is_empty() {
                None
            } else {
                Some(Components {
                    schemas: self.schemas.clone(),
                })
            },
        }
    }
}

/// OpenAPI document carrier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApi {
    /// OpenAPI version.
    pub openapi: String,
    /// API information.
    pub info: Info,
    /// Reusable components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

/// API information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// API description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Reusable components.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    /// Named schemas, in registration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Schema>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_rewrites_prefix() {
        let rule = RewriteRule::new("api", "internal/models");
        assert_eq!(
            rule.apply("internal/models.User").as_deref(),
            Some("api.User")
        );
        assert_eq!(rule.apply("internal/models").as_deref(), Some("api"));
    }

    #[test]
    fn test_rule_requires_boundary() {
        let rule = RewriteRule::new("api", "internal/models");
        // Mid-identifier prefix must not match.
        assert_eq!(rule.apply("internal/modelstore.User"), None);
        assert_eq!(rule.apply("other/models.User"), None);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            RewriteRule::new("v1", "internal"),
            RewriteRule::new("v2", "internal/models"),
        ];
        assert_eq!(rewrite_name(&rules, "internal/models.User"), "v1.models.User");
    }

    #[test]
    fn test_unmatched_names_are_sanitized() {
        let rules = vec![RewriteRule::new("api", "internal")];
        assert_eq!(rewrite_name(&rules, "vendor/pkg.Thing"), "vendor.pkg.Thing");
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let rules = vec![RewriteRule::new("api", "internal/models")];
        let once = rewrite_name(&rules, "internal/models.User");
        assert_eq!(once, "api.User");
        assert_eq!(rewrite_name(&rules, &once), once);
    }

    #[test]
    fn test_document_merges_schemas() {
        let mut doc = Document::new("Test API", "1.0.0");
        let mut batch = IndexMap::new();
        batch.insert("api.User".to_string(), Schema::string());
        doc.merge_schemas(&batch);
        doc.register_schema("api.User", Schema::boolean());
        assert_eq!(doc.schemas().len(), 1);
        // Later registration wins.
        assert!(matches!(doc.schemas()["api.User"], Schema::Primitive(_)));
    }

    #[test]
    fn test_to_openapi_serialization() {
        let mut doc = Document::new("Test API", "1.0.0");
        doc.register_schema("api.User", Schema::string());
        let json = serde_json::to_string(&doc.to_openapi()).unwrap();
        assert!(json.contains(r#""openapi":"3.1.0""#), "version: {json}");
        assert!(json.contains(r#""title":"Test API""#), "info: {json}");
        assert!(
            json.contains(r#""schemas":{"api.User":{"type":"string"}}"#),
            "components: {json}"
        );
    }

    #[test]
    fn test_empty_document_has_no_components() {
        let doc = Document::new("Test API", "1.0.0");
        let json = serde_json::to_string(&doc.to_openapi()).unwrap();
        assert!(!json.contains("components"), "{json}");
    }
}

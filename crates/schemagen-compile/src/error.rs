//! Error accumulation for schema compilation.
//!
//! Data-shape problems never abort compilation: the offending position gets a
//! permissive placeholder node, the error lands in the per-call sink, and the
//! caller inspects the accumulated list afterward. One bad field deep in a
//! large type must not cost the rest of the document.

use std::fmt;

/// A recoverable compilation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A field's structural kind cannot be mapped to any schema.
    #[error("unsupported type `{type_name}` for field `{field}`")]
    UnsupportedField {
        /// Output name of the offending field.
        field: String,
        /// Label of the unmappable kind.
        type_name: String,
    },
    /// A top-level type's structural kind cannot be mapped to any schema.
    #[error("unsupported type `{type_name}`")]
    UnsupportedType {
        /// Label of the unmappable kind.
        type_name: String,
    },
}

/// Per-call error accumulator.
#[derive(Debug, Default)]
pub struct ErrorSink {
    errors: Vec<CompileError>,
}

impl ErrorSink {
    /// Record one error.
    pub fn record(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    /// Record an unsupported-type error at an optionally named field.
    pub fn unsupported(&mut self, field: Option<&str>, type_name: &str) {
        self.record(match field {
            Some(field) => CompileError::UnsupportedField {
                field: field.to_string(),
                type_name: type_name.to_string(),
            },
            None => CompileError::UnsupportedType {
                type_name: type_name.to_string(),
            },
        });
    }

    /// Whether anything was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Drain the accumulated errors.
    #[must_use]
    pub fn into_vec(self) -> Vec<CompileError> {
        self.errors
    }
}

/// Every error from one compilation, joined for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileErrors(pub Vec<CompileError>);

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_accumulates_in_order() {
        let mut sink = ErrorSink::default();
        assert!(sink.is_empty());
        sink.unsupported(Some("Callback"), "func");
        sink.unsupported(None, "chan");
        let errors = sink.into_vec();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].to_string(),
            "unsupported type `func` for field `Callback`"
        );
        assert_eq!(errors[1].to_string(), "unsupported type `chan`");
    }

    #[test]
    fn test_joined_display() {
        let joined = CompileErrors(vec![
            CompileError::UnsupportedType {
                type_name: "func".to_string(),
            },
            CompileError::UnsupportedType {
                type_name: "chan".to_string(),
            },
        ]);
        assert_eq!(
            joined.to_string(),
            "unsupported type `func`; unsupported type `chan`"
        );
    }
}

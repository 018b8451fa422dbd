//! Error types for curriculum documents

use thiserror::Error;

/// Result type alias for curriculum model operations
pub type Result<T> = std::result::Result<T, CurriculumError>;

/// Errors raised while reading or interpreting a curriculum document
#[derive(Error, Debug)]
pub enum CurriculumError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The content is not syntactically valid JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The JSON is valid but a required field is missing or has the wrong shape
    #[error("Schema error at '{field}': {message}")]
    Schema { field: String, message: String },
}

impl CurriculumError {
    /// Create a schema error for a field
    pub fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a schema error for a required field that is absent
    pub fn missing_field(field: &str) -> Self {
        Self::schema(field, "required field is missing")
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}

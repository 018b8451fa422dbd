//! Curriculum document model
//!
//! A curriculum document is one language/level's complete lesson content,
//! authored as a `*_expanded.json` file. Only `meta.code` and `meta.level` are
//! validated. The parsed JSON is kept as it was authored, so the document store
//! receives the file unchanged, explicit `null`s included. Units and lessons
//! are read through lenient borrowed views: a field of an unexpected shape
//! reads as absent instead of rejecting the document.

use crate::error::{CurriculumError, Result};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

// ============================================================================
// Document
// ============================================================================

/// The unit of import: one language/level curriculum.
///
/// `(meta.code, meta.level)` is the composite identity of a document in the
/// destination store.
///
/// # Examples
///
/// ```rust
/// use curriculum_common::CurriculumDocument;
///
/// let doc = CurriculumDocument::from_json_str(
///     r#"{"meta": {"code": "yo", "level": "A1"}, "units": []}"#,
/// ).unwrap();
/// assert_eq!(doc.identity(), ("yo", "A1"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CurriculumDocument {
    meta: CurriculumMeta,
    source: Map<String, Value>,
}

/// Identity block of a curriculum document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurriculumMeta {
    /// Language identifier (e.g., "yo", "sw")
    pub code: String,

    /// Proficiency level (e.g., "A1")
    pub level: String,
}

/// A numbered group of lessons, borrowed from the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit<'a> {
    index: usize,
    fields: &'a Map<String, Value>,
}

/// A single lesson, borrowed from the document.
///
/// Vocabulary, dialogue and exercises are opaque JSON.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lesson<'a> {
    unit_index: usize,
    index: usize,
    fields: &'a Map<String, Value>,
}

impl CurriculumDocument {
    /// Parse a document from JSON text.
    ///
    /// Returns [`CurriculumError::Parse`] for malformed JSON and
    /// [`CurriculumError::Schema`] when the identity fields are missing.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Interpret an already-parsed JSON value as a curriculum document.
    pub fn from_value(value: Value) -> Result<Self> {
        let meta = check_identity(&value)?;
        match value {
            Value::Object(source) => Ok(Self { meta, source }),
            _ => Err(CurriculumError::schema("$", "document must be a JSON object")),
        }
    }

    /// The composite identity key `(code, level)`
    pub fn identity(&self) -> (&str, &str) {
        (&self.meta.code, &self.meta.level)
    }

    /// The document exactly as parsed
    pub fn source(&self) -> &Map<String, Value> {
        &self.source
    }

    /// Display name of the language, when the meta block carries one
    pub fn language_name(&self) -> Option<&str> {
        self.source
            .get("meta")
            .and_then(|meta| meta.get("name"))
            .and_then(Value::as_str)
    }

    /// Units in document order. A missing or non-array `units` reads as empty.
    pub fn units(&self) -> impl Iterator<Item = Unit<'_>> {
        objects(self.source.get("units"), "units").map(|(index, fields)| Unit { index, fields })
    }

    /// All lessons in document order, paired with their parent unit
    pub fn lessons(&self) -> impl Iterator<Item = (Unit<'_>, Lesson<'_>)> {
        self.units()
            .flat_map(|unit| unit.lessons().map(move |lesson| (unit, lesson)))
    }

    pub fn lesson_count(&self) -> usize {
        self.lessons().count()
    }
}

impl Serialize for CurriculumDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.source.serialize(serializer)
    }
}

impl<'a> Unit<'a> {
    /// Unit ordinal. Integral numbers and numeric strings are accepted;
    /// anything else reads as `None`.
    pub fn ordinal(&self) -> Option<i32> {
        self.fields.get("unit").and_then(integral)
    }

    pub fn lessons(&self) -> impl Iterator<Item = Lesson<'a>> {
        let unit_index = self.index;
        let scope = format!("units[{unit_index}].lessons");
        objects(self.fields.get("lessons"), &scope).map(move |(index, fields)| Lesson {
            unit_index,
            index,
            fields,
        })
    }
}

impl<'a> Lesson<'a> {
    /// Location of this lesson inside the document, e.g. `units[0].lessons[2]`
    pub fn path(&self) -> String {
        format!("units[{}].lessons[{}]", self.unit_index, self.index)
    }

    /// Lesson id as text. Numbers and booleans are rendered, other shapes
    /// read as `None`.
    pub fn id(&self) -> Option<String> {
        self.fields.get("id").and_then(scalar_text)
    }

    pub fn title(&self) -> Option<String> {
        self.fields.get("title").and_then(scalar_text)
    }

    /// Raw field value. `Some(&Value::Null)` for an explicit `null`, `None`
    /// when the key is absent.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key)
    }
}

/// Object entries of an optional array, with their positions.
///
/// A value that is not an array yields nothing. Entries that are not objects
/// are skipped with a warning.
fn objects<'a>(
    value: Option<&'a Value>,
    scope: &str,
) -> impl Iterator<Item = (usize, &'a Map<String, Value>)> {
    let items: &'a [Value] = match value {
        Some(Value::Array(items)) => items.as_slice(),
        Some(Value::Null) | None => &[],
        Some(_) => {
            warn!(field = scope, "Expected an array, reading as empty");
            &[]
        },
    };
    let scope = scope.to_string();

    items.iter().enumerate().filter_map(move |(index, item)| match item {
        Value::Object(fields) => Some((index, fields)),
        _ => {
            warn!(field = %format!("{scope}[{index}]"), "Expected an object, skipping entry");
            None
        },
    })
}

/// `1`, `1.0` and `"1"` all read as 1. Values outside `i32` read as `None`.
fn integral(value: &Value) -> Option<i32> {
    let wide = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    i32::try_from(wide).ok()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `meta.code` and `meta.level` must be present strings. Nothing else in the
/// document is required.
fn check_identity(value: &Value) -> Result<CurriculumMeta> {
    let root = value
        .as_object()
        .ok_or_else(|| CurriculumError::schema("$", "document must be a JSON object"))?;

    let meta = root
        .get("meta")
        .ok_or_else(|| CurriculumError::missing_field("meta"))?
        .as_object()
        .ok_or_else(|| CurriculumError::schema("meta", "must be an object"))?;

    let field = |key: &str| -> Result<String> {
        let path = format!("meta.{key}");
        match meta.get(key) {
            None | Some(Value::Null) => Err(CurriculumError::missing_field(&path)),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(CurriculumError::schema(path, "must be a string")),
        }
    };

    Ok(CurriculumMeta {
        code: field("code")?,
        level: field("level")?,
    })
}

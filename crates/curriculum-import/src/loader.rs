//! Curriculum file loader

use crate::error::{ImportError, Result};
use curriculum_common::{CurriculumDocument, CurriculumError};
use std::path::Path;
use tracing::debug;

/// Read one curriculum file and parse it into a [`CurriculumDocument`].
///
/// Malformed JSON and missing identity fields both come back as
/// [`ImportError::Load`] carrying the offending path.
pub fn load_document(path: &Path) -> Result<CurriculumDocument> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ImportError::load(path, CurriculumError::Io(e)))?;

    let document =
        CurriculumDocument::from_json_str(&content).map_err(|e| ImportError::load(path, e))?;

    let (code, level) = document.identity();
    debug!(
        path = %path.display(),
        code,
        level,
        units = document.units().count(),
        lessons = document.lesson_count(),
        "Loaded curriculum document"
    );

    Ok(document)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_file() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "ig_a1_expanded.json",
            r#"{"meta": {"code": "ig", "level": "A1"},
                "units": [{"unit": 1, "lessons": [{"id": "ig-1", "title": "Ndewo"}]}]}"#,
        );

        let doc = load_document(&path).unwrap();
        assert_eq!(doc.identity(), ("ig", "A1"));
        assert_eq!(doc.lesson_count(), 1);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "bad_expanded.json", "{ not json");

        let err = load_document(&path).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("bad_expanded.json"));
    }

    #[test]
    fn test_missing_code_is_schema_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "nocode_expanded.json", r#"{"meta": {"level": "A1"}}"#);

        let err = load_document(&path).unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn test_unreadable_file_is_load_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_document(&tmp.path().join("gone_expanded.json")).unwrap_err();
        assert!(matches!(
            err,
            ImportError::Load {
                source: CurriculumError::Io(_),
                ..
            }
        ));
    }
}

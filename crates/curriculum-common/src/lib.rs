//! Curriculum Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging, and error handling for the curriculum importers.
//!
//! # Overview
//!
//! - **Error Handling**: model-level error type and result alias
//! - **Types**: the curriculum document model (meta, units, lessons)
//! - **Logging**: tracing subscriber setup shared by both importers
//!
//! # Example
//!
//! ```no_run
//! use curriculum_common::{CurriculumDocument, Result};
//!
//! fn identity_of(json: &str) -> Result<(String, String)> {
//!     let doc = CurriculumDocument::from_json_str(json)?;
//!     let (code, level) = doc.identity();
//!     Ok((code.to_string(), level.to_string()))
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{CurriculumError, Result};
pub use types::{CurriculumDocument, CurriculumMeta, Lesson, Unit};

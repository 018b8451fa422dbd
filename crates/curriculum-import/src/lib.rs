//! Curriculum Import Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Loads `*_expanded.json` curriculum files from a directory tree into a
//! document store or a relational store.
//!
//! # Pipeline
//!
//! - **Discovery**: recursive walk selecting files by name suffix
//! - **Loader**: JSON parsing into [`curriculum_common::CurriculumDocument`]
//! - **Sinks**: [`sink::MongoSink`] (upsert per document) and
//!   [`sink::PostgresSink`] (flattened rows, one transaction per document)
//!
//! # Example
//!
//! ```no_run
//! use curriculum_import::{config::MongoConfig, Discovery, Importer, MongoSink};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let sink = MongoSink::connect(&MongoConfig::default()).await?;
//!     let stats = Importer::new(sink, Discovery::new("./curriculum")).run().await?;
//!     println!("imported {} documents", stats.documents_imported);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod sink;

pub use discovery::Discovery;
pub use error::{ImportError, Result};
pub use pipeline::{ImportStats, Importer};
pub use sink::{CurriculumSink, MongoSink, PostgresSink, WriteReport};

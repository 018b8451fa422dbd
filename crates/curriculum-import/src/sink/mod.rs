//! Sink adapters
//!
//! A sink turns a parsed [`CurriculumDocument`] into the destination store's
//! native write:
//!
//! - [`MongoSink`]: one upsert per document keyed by `(meta.code, meta.level)`
//! - [`PostgresSink`]: lessons flattened into rows, one transaction per document
//!
//! Sinks own their connection. [`crate::Importer`] closes the sink on every
//! exit path.

pub mod mongo;
pub mod postgres;

pub use mongo::MongoSink;
pub use postgres::{flatten_rows, CurriculumRow, PostgresSink};

use crate::error::Result;
use async_trait::async_trait;
use curriculum_common::CurriculumDocument;

/// Outcome of writing one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Records (documents or rows) written
    pub records_written: u64,

    /// Records that already existed and were replaced or removed
    pub records_replaced: u64,
}

#[async_trait]
pub trait CurriculumSink: Send {
    /// Short name used in log fields
    fn name(&self) -> &'static str;

    /// One-time setup before the first write (e.g. schema creation)
    async fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    async fn write(&mut self, document: &CurriculumDocument) -> Result<WriteReport>;

    /// Release the underlying connection
    async fn close(self) -> Result<()>
    where
        Self: Sized;
}

//! Import pipeline: prepare the sink, discover files, then load and write
//! each one in turn.
//!
//! The first error stops the run. Writes already committed by the sink stay
//! in place and no later file is touched. The sink is closed whether the run
//! succeeds or fails.

use crate::discovery::Discovery;
use crate::error::Result;
use crate::loader::load_document;
use crate::sink::CurriculumSink;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

/// Run statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub files_discovered: usize,
    pub documents_imported: usize,
    pub records_written: u64,
    pub records_replaced: u64,
    pub elapsed: Duration,
}

/// One-shot importer owning a sink for the duration of a run
pub struct Importer<S> {
    sink: S,
    discovery: Discovery,
}

impl<S: CurriculumSink> Importer<S> {
    pub fn new(sink: S, discovery: Discovery) -> Self {
        Self { sink, discovery }
    }

    /// Run the import and release the sink's connection afterwards.
    ///
    /// When both the import and the close fail, the import error is returned
    /// and the close error is logged.
    #[instrument(skip(self), fields(sink = self.sink.name(), base_dir = %self.discovery.base_dir().display()))]
    pub async fn run(mut self) -> Result<ImportStats> {
        let outcome = self.import().await;
        let closed = self.sink.close().await;

        match (outcome, closed) {
            (Ok(stats), Ok(())) => {
                info!(
                    files = stats.files_discovered,
                    documents = stats.documents_imported,
                    records = stats.records_written,
                    replaced = stats.records_replaced,
                    elapsed_ms = stats.elapsed.as_millis() as u64,
                    "Import finished"
                );
                Ok(stats)
            },
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(err), Ok(())) => {
                error!(error = %err, "Import aborted");
                Err(err)
            },
            (Err(err), Err(close_err)) => {
                error!(error = %err, "Import aborted");
                warn!(error = %close_err, "Failed to close sink after aborted import");
                Err(err)
            },
        }
    }

    async fn import(&mut self) -> Result<ImportStats> {
        let started = Instant::now();

        self.sink.prepare().await?;

        let files = self.discovery.collect_files()?;
        let mut stats = ImportStats {
            files_discovered: files.len(),
            ..Default::default()
        };

        if files.is_empty() {
            warn!(
                base_dir = %self.discovery.base_dir().display(),
                "No curriculum files found"
            );
        }

        for path in &files {
            let document = load_document(path)?;
            let report = self.sink.write(&document).await?;

            let (code, level) = document.identity();
            info!(
                path = %path.display(),
                code,
                level,
                records = report.records_written,
                "Imported curriculum"
            );

            stats.documents_imported += 1;
            stats.records_written += report.records_written;
            stats.records_replaced += report.records_replaced;
        }

        stats.elapsed = started.elapsed();
        Ok(stats)
    }
}

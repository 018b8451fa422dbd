//! Common test utilities for curriculum-import integration tests
//!
//! - On-disk fixtures for curriculum trees
//! - A recording in-memory sink for pipeline tests
//! - PostgreSQL and MongoDB containers via testcontainers (require Docker)

#![allow(dead_code)]

use anyhow::{Context, Result};
use async_trait::async_trait;
use curriculum_common::CurriculumDocument;
use curriculum_import::{CurriculumSink, ImportError, WriteReport};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use testcontainers::{core::IntoContainerPort, runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::{mongo::Mongo, postgres::Postgres};
use tracing::info;

// ============================================================================
// Fixtures
// ============================================================================

/// A curriculum document with the given lesson counts per unit
pub fn curriculum_json(code: &str, level: &str, lessons_per_unit: &[usize]) -> Value {
    let units: Vec<Value> = lessons_per_unit
        .iter()
        .enumerate()
        .map(|(u, &count)| {
            let lessons: Vec<Value> = (0..count)
                .map(|l| {
                    json!({
                        "id": format!("{code}-{level}-{}-{}", u + 1, l + 1),
                        "title": format!("Lesson {}.{}", u + 1, l + 1),
                        "vocab": [{"word": format!("w{l}"), "gloss": "example"}],
                        "dialogue": {"lines": [{"speaker": "A", "text": "..."}]},
                        "exercises": [{"type": "translate", "prompt": format!("p{l}")}]
                    })
                })
                .collect();
            json!({"unit": u + 1, "lessons": lessons})
        })
        .collect();

    json!({
        "meta": {"code": code, "level": level, "name": format!("Language {code}")},
        "units": units
    })
}

/// Write `content` to `dir/relative`, creating parent directories
pub fn write_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, content).expect("Failed to write fixture file");
    path
}

pub fn write_curriculum(dir: &Path, relative: &str, document: &Value) -> PathBuf {
    write_file(dir, relative, &document.to_string())
}

// ============================================================================
// Recording Sink
// ============================================================================

/// What a [`RecordingSink`] observed, shared with the test after the sink
/// has been consumed by the importer
#[derive(Debug, Default)]
pub struct Recorded {
    pub prepared: bool,
    pub closed: bool,
    pub written: Vec<(String, String)>,
}

/// In-memory sink that records every call
pub struct RecordingSink {
    state: Arc<Mutex<Recorded>>,
    fail_on_code: Option<String>,
    fail_on_close: bool,
}

impl RecordingSink {
    pub fn new() -> (Self, Arc<Mutex<Recorded>>) {
        let state = Arc::new(Mutex::new(Recorded::default()));
        (
            Self {
                state: Arc::clone(&state),
                fail_on_code: None,
                fail_on_close: false,
            },
            state,
        )
    }

    /// Reject writes of documents with this language code
    pub fn failing_on(mut self, code: &str) -> Self {
        self.fail_on_code = Some(code.to_string());
        self
    }

    pub fn failing_on_close(mut self) -> Self {
        self.fail_on_close = true;
        self
    }
}

#[async_trait]
impl CurriculumSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn prepare(&mut self) -> curriculum_import::Result<()> {
        self.state.lock().expect("poisoned").prepared = true;
        Ok(())
    }

    async fn write(&mut self, document: &CurriculumDocument) -> curriculum_import::Result<WriteReport> {
        let (code, level) = document.identity();
        if self.fail_on_code.as_deref() == Some(code) {
            return Err(ImportError::write(format!("rejected {code}")));
        }

        let mut state = self.state.lock().expect("poisoned");
        assert!(state.prepared, "write before prepare");
        state.written.push((code.to_string(), level.to_string()));

        Ok(WriteReport {
            records_written: document.lesson_count() as u64,
            records_replaced: 0,
        })
    }

    async fn close(self) -> curriculum_import::Result<()> {
        self.state.lock().expect("poisoned").closed = true;
        if self.fail_on_close {
            return Err(ImportError::connection("close failed"));
        }
        Ok(())
    }
}

// ============================================================================
// Containers
// ============================================================================

/// PostgreSQL test container
pub struct TestPostgres {
    _container: ContainerAsync<Postgres>,
    connection_string: String,
}

impl TestPostgres {
    pub async fn start() -> Result<Self> {
        info!("Starting PostgreSQL test container...");

        let container = Postgres::default()
            .with_tag("16-alpine")
            .start()
            .await
            .context("Failed to start PostgreSQL container")?;

        let host = container
            .get_host()
            .await
            .context("Failed to get container host")?;
        let port = container
            .get_host_port_ipv4(5432.tcp())
            .await
            .context("Failed to get container port")?;

        Ok(Self {
            _container: container,
            connection_string: format!("postgresql://postgres:postgres@{}:{}/postgres", host, port),
        })
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

/// MongoDB test container
pub struct TestMongo {
    _container: ContainerAsync<Mongo>,
    uri: String,
}

impl TestMongo {
    pub async fn start() -> Result<Self> {
        info!("Starting MongoDB test container...");

        let container = Mongo::default()
            .start()
            .await
            .context("Failed to start MongoDB container")?;

        let host = container
            .get_host()
            .await
            .context("Failed to get container host")?;
        let port = container
            .get_host_port_ipv4(27017.tcp())
            .await
            .context("Failed to get container port")?;

        Ok(Self {
            _container: container,
            uri: format!("mongodb://{}:{}", host, port),
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// Initialize tracing for tests (idempotent)
pub fn init_test_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,curriculum_import=debug,sqlx=warn,testcontainers=info")
        }))
        .with_test_writer()
        .try_init();
}

//! PostgreSQL relational sink.
//!
//! Each lesson of a document becomes one `curriculum` row carrying the
//! document's language code and level. The rows of one document are written
//! in a single transaction, so a failure mid-document leaves none of that
//! document's rows behind.
//!
//! In [`RelationalWriteMode::Append`] mode re-importing a file appends a
//! second copy of its rows. [`RelationalWriteMode::Replace`] deletes the
//! existing `(lang_code, level)` rows first.

use async_trait::async_trait;
use curriculum_common::CurriculumDocument;
use serde_json::{json, Value};
use sqlx::{types::Json, Connection, PgConnection, Postgres, QueryBuilder, Transaction};
use tracing::{debug, info};

use super::{CurriculumSink, WriteReport};
use crate::config::{redact, PostgresConfig, RelationalWriteMode};
use crate::error::{ImportError, Result};

const CREATE_LANGUAGES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS languages (
        code TEXT PRIMARY KEY,
        name TEXT
    )
"#;

const CREATE_CURRICULUM_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS curriculum (
        id SERIAL PRIMARY KEY,
        lang_code TEXT REFERENCES languages(code),
        level TEXT,
        unit INT,
        lesson_id TEXT,
        lesson_title TEXT,
        vocab JSONB,
        dialogue JSONB,
        exercises JSONB
    )
"#;

/// One flattened lesson, ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct CurriculumRow {
    pub lang_code: String,
    pub level: String,
    pub unit: Option<i32>,
    pub lesson_id: Option<String>,
    pub lesson_title: Option<String>,
    pub vocab: Value,
    pub dialogue: Value,
    pub exercises: Value,
}

/// Flatten every lesson of every unit into a row.
///
/// A missing `vocab`/`exercises` becomes `[]` and a missing `dialogue` becomes
/// `{}`. A key that is present is stored as authored, so an explicit `null`
/// lands as JSONB `null`. Unit ordinals, ids and titles that are absent or of
/// an unusable shape stay NULL.
pub fn flatten_rows(document: &CurriculumDocument) -> Vec<CurriculumRow> {
    let (code, level) = document.identity();

    document
        .lessons()
        .map(|(unit, lesson)| CurriculumRow {
            lang_code: code.to_string(),
            level: level.to_string(),
            unit: unit.ordinal(),
            lesson_id: lesson.id(),
            lesson_title: lesson.title(),
            vocab: lesson.get("vocab").cloned().unwrap_or_else(|| json!([])),
            dialogue: lesson.get("dialogue").cloned().unwrap_or_else(|| json!({})),
            exercises: lesson.get("exercises").cloned().unwrap_or_else(|| json!([])),
        })
        .collect()
}

/// Writes flattened lessons over a single dedicated connection
pub struct PostgresSink {
    conn: PgConnection,
    write_mode: RelationalWriteMode,
    insert_chunk_size: usize,
}

impl PostgresSink {
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        config.validate()?;

        let conn = PgConnection::connect(&config.dsn).await.map_err(|e| {
            ImportError::connection(format!(
                "Failed to connect to PostgreSQL at {}: {}",
                redact(&config.dsn),
                e
            ))
        })?;

        info!(
            dsn = %redact(&config.dsn),
            write_mode = %config.write_mode,
            "Connected to PostgreSQL"
        );

        Ok(Self {
            conn,
            write_mode: config.write_mode,
            insert_chunk_size: config.insert_chunk_size,
        })
    }

    /// Create `languages` and `curriculum` if they do not exist yet.
    /// Existing tables are left as they are.
    pub async fn ensure_schema(&mut self) -> Result<()> {
        let mut tx = self.begin().await?;

        for statement in [CREATE_LANGUAGES_TABLE, CREATE_CURRICULUM_TABLE] {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| ImportError::write(format!("Failed to create schema: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| ImportError::write(format!("Failed to commit schema: {}", e)))?;

        debug!("Curriculum schema ready");
        Ok(())
    }

    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    async fn begin(&mut self) -> Result<Transaction<'_, Postgres>> {
        self.conn
            .begin()
            .await
            .map_err(|e| ImportError::write(format!("Failed to begin transaction: {}", e)))
    }
}

/// The foreign key on `curriculum.lang_code` needs the language to exist.
/// A name that is already stored is never overwritten.
async fn register_language(
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
    name: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO languages (code, name)
        VALUES ($1, $2)
        ON CONFLICT (code) DO NOTHING
        "#,
    )
    .bind(code)
    .bind(name)
    .execute(&mut **tx)
    .await
    .map_err(|e| ImportError::write(format!("Failed to register language '{}': {}", code, e)))?;

    Ok(())
}

async fn delete_existing_rows(
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
    level: &str,
) -> Result<u64> {
    let result = sqlx::query("DELETE FROM curriculum WHERE lang_code = $1 AND level = $2")
        .bind(code)
        .bind(level)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            ImportError::write(format!(
                "Failed to delete existing rows for ({}, {}): {}",
                code, level, e
            ))
        })?;

    Ok(result.rows_affected())
}

async fn insert_rows(tx: &mut Transaction<'_, Postgres>, rows: &[CurriculumRow]) -> Result<u64> {
    let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"
        INSERT INTO curriculum (
            lang_code, level, unit, lesson_id, lesson_title, vocab, dialogue, exercises
        )
        "#,
    );

    query_builder.push_values(rows, |mut b, row| {
        b.push_bind(&row.lang_code)
            .push_bind(&row.level)
            .push_bind(row.unit)
            .push_bind(&row.lesson_id)
            .push_bind(&row.lesson_title)
            .push_bind(Json(&row.vocab))
            .push_bind(Json(&row.dialogue))
            .push_bind(Json(&row.exercises));
    });

    let result = query_builder
        .build()
        .execute(&mut **tx)
        .await
        .map_err(|e| ImportError::write(format!("Failed to insert curriculum rows: {}", e)))?;

    Ok(result.rows_affected())
}

#[async_trait]
impl CurriculumSink for PostgresSink {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn prepare(&mut self) -> Result<()> {
        self.ensure_schema().await
    }

    async fn write(&mut self, document: &CurriculumDocument) -> Result<WriteReport> {
        let (code, level) = document.identity();
        let rows = flatten_rows(document);
        let write_mode = self.write_mode;
        let chunk_size = self.insert_chunk_size;

        let mut tx = self.begin().await?;

        register_language(&mut tx, code, document.language_name()).await?;

        let records_replaced = match write_mode {
            RelationalWriteMode::Append => 0,
            RelationalWriteMode::Replace => delete_existing_rows(&mut tx, code, level).await?,
        };

        let mut records_written = 0;
        for chunk in rows.chunks(chunk_size) {
            records_written += insert_rows(&mut tx, chunk).await?;
        }

        tx.commit()
            .await
            .map_err(|e| ImportError::write(format!("Failed to commit ({}, {}): {}", code, level, e)))?;

        debug!(
            code,
            level,
            rows = records_written,
            replaced = records_replaced,
            "Inserted curriculum rows"
        );

        Ok(WriteReport {
            records_written,
            records_replaced,
        })
    }

    async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| ImportError::connection(format!("Failed to close PostgreSQL connection: {}", e)))
    }
}

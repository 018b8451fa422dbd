//! MongoDB document-store sink.

use async_trait::async_trait;
use curriculum_common::CurriculumDocument;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, ReplaceOptions},
    Client, Collection,
};
use tracing::{debug, info};

use super::{CurriculumSink, WriteReport};
use crate::config::{redact, MongoConfig, MONGO_APP_NAME};
use crate::error::{ImportError, Result};

/// Upserts whole curriculum documents into a collection, keyed by
/// `(meta.code, meta.level)`. Re-importing a file replaces its record.
///
/// The stored record is the parsed file as authored. Lesson fields are never
/// reinterpreted, so explicit `null`s and unusual shapes are kept.
pub struct MongoSink {
    client: Client,
    collection: Collection<Document>,
}

impl MongoSink {
    /// Connect and verify the server answers a `ping`.
    pub async fn connect(config: &MongoConfig) -> Result<Self> {
        config.validate()?;

        let mut client_options = ClientOptions::parse(&config.uri).await.map_err(|e| {
            ImportError::connection(format!(
                "Failed to parse MongoDB URI {}: {}",
                redact(&config.uri),
                e
            ))
        })?;
        client_options.app_name = Some(MONGO_APP_NAME.to_string());

        let client = Client::with_options(client_options)
            .map_err(|e| ImportError::connection(format!("Failed to create MongoDB client: {}", e)))?;

        // The driver connects lazily; ping so an unreachable server fails here.
        client
            .database(&config.database)
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                ImportError::connection(format!(
                    "MongoDB at {} is unreachable: {}",
                    redact(&config.uri),
                    e
                ))
            })?;

        info!(
            uri = %redact(&config.uri),
            database = %config.database,
            collection = %config.collection,
            "Connected to MongoDB"
        );

        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);

        Ok(Self { client, collection })
    }

    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }
}

/// Filter matching the stored record for a document's identity
pub fn identity_filter(document: &CurriculumDocument) -> Document {
    let (code, level) = document.identity();
    doc! { "meta.code": code, "meta.level": level }
}

/// The record written for a document: its parsed source, unchanged
pub fn replacement_for(document: &CurriculumDocument) -> mongodb::bson::ser::Result<Document> {
    mongodb::bson::to_document(document.source())
}

#[async_trait]
impl CurriculumSink for MongoSink {
    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn write(&mut self, document: &CurriculumDocument) -> Result<WriteReport> {
        let filter = identity_filter(document);
        let replacement = replacement_for(document)
            .map_err(|e| ImportError::write(format!("Failed to serialize document: {}", e)))?;

        let result = self
            .collection
            .replace_one(
                filter,
                replacement,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(|e| ImportError::write(format!("Failed to upsert document: {}", e)))?;

        let (code, level) = document.identity();
        debug!(
            code,
            level,
            matched = result.matched_count,
            upserted = result.upserted_id.is_some(),
            "Upserted curriculum document"
        );

        Ok(WriteReport {
            records_written: 1,
            records_replaced: result.matched_count,
        })
    }

    async fn close(self) -> Result<()> {
        self.client.shutdown().await;
        debug!("MongoDB client shut down");
        Ok(())
    }
}

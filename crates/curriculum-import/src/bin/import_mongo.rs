//! Import curriculum files into MongoDB

use anyhow::{Context, Result};
use clap::Parser;
use curriculum_import::cli::CommonArgs;
use curriculum_import::config::{MongoConfig, DEFAULT_MONGO_URI};
use curriculum_import::{Importer, MongoSink};

#[derive(Parser, Debug)]
#[command(name = "curriculum-import-mongo")]
#[command(author, version, about = "Upsert curriculum files into MongoDB")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// MongoDB connection URI
    #[arg(long, env = "MONGO_URI", default_value = DEFAULT_MONGO_URI, hide_env_values = true)]
    mongo_uri: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let _log_guard = cli.common.init_logging("curriculum-import-mongo")?;

    let sink = MongoSink::connect(&MongoConfig::new(cli.mongo_uri))
        .await
        .context("Failed to open MongoDB connection")?;

    Importer::new(sink, cli.common.discovery())
        .run()
        .await
        .context("MongoDB import failed")?;

    println!("Mongo import complete");
    Ok(())
}

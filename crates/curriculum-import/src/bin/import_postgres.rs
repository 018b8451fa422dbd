//! Import curriculum files into PostgreSQL

use anyhow::{Context, Result};
use clap::Parser;
use curriculum_import::cli::CommonArgs;
use curriculum_import::config::{PostgresConfig, RelationalWriteMode, DEFAULT_CURR_DB_DSN};
use curriculum_import::{Importer, PostgresSink};

#[derive(Parser, Debug)]
#[command(name = "curriculum-import-postgres")]
#[command(author, version, about = "Insert curriculum lessons into PostgreSQL")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// PostgreSQL connection string
    #[arg(long, env = "CURR_DB_DSN", default_value = DEFAULT_CURR_DB_DSN, hide_env_values = true)]
    dsn: String,

    /// append: add rows on every run; replace: swap out a document's existing rows
    #[arg(long, env = "CURR_DB_WRITE_MODE", value_enum, default_value_t = RelationalWriteMode::Append)]
    write_mode: RelationalWriteMode,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let _log_guard = cli.common.init_logging("curriculum-import-postgres")?;

    let config = PostgresConfig::new(cli.dsn).with_write_mode(cli.write_mode);
    let sink = PostgresSink::connect(&config)
        .await
        .context("Failed to open PostgreSQL connection")?;

    Importer::new(sink, cli.common.discovery())
        .run()
        .await
        .context("PostgreSQL import failed")?;

    println!("Import complete");
    Ok(())
}

//! Prints every stored certificate as a JSON line, omitting the image column.

use anyhow::Context;
use certificate_generator_server::{db::Database, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from_env().context("loading configuration")?;
    let filename = config
        .sqlite_database_filename
        .context("SQLITE_DATABASE_FILENAME must be set to inspect stored certificates")?;

    let database = Database::connect(&filename)
        .await
        .with_context(|| format!("opening {}", filename.display()))?;

    for record in database.list_certificates().await? {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}

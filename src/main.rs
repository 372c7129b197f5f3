use sea_orm::SqlxPostgresConnector;
use sqlx::postgres::PgPoolOptions;

use barata::config::{Config, DatabaseConfig};
use barata::ingest::{Loader, RasterLoader};
use barata::{discovery, logging, schema};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::init();

    let config_path = Config::path_from_env();
    tracing::info!("Reading configuration from {}", config_path.display());
    let config = Config::from_file(&config_path)?;
    let database = DatabaseConfig::from_env()?;

    tracing::info!(
        "Connecting to {}@{}:{}/{}",
        database.user,
        database.host,
        database.port,
        database.dbname
    );
    // One connection for the whole run; it is released on drop if anything fails.
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(database.connect_options())
        .await?;
    let db = SqlxPostgresConnector::from_sqlx_postgres_pool(pool);

    schema::create_tables(&db).await?;

    let dirs = discovery::acquisition_dirs(config.data_roots())?;
    tracing::info!("Found {} acquisition directories", dirs.len());

    let mut loader = Loader::new(&db, &config);
    if config.scenes().enabled {
        loader = loader.with_raster_loader(RasterLoader::new(config.scenes().clone(), database));
    }

    let summary = loader.run(&dirs).await?;
    tracing::info!("Loaded {}", summary);

    db.close().await?;

    Ok(())
}

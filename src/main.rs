use clubhouse::config::Config;
use clubhouse::db::PgPool;
use clubhouse::engine::Engine;
use clubhouse::error::Error;
use clubhouse::server::serve;
use clubhouse::store::{MemoryStore, PgStore, RecordStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let store = match &config.database_url {
        Some(db_uri) => {
            let PgPool(pool) = PgPool::new(db_uri, config.max_connections).await?;
            RecordStore::new(PgStore::new(pool).await?)
        }
        None => {
            tracing::warn!("no database configured, records are kept in memory");
            RecordStore::new(MemoryStore::default())
        }
    };

    let engine = Engine::new(store)?;

    serve(engine, config.bind_addr).await
}

use std::time::Duration;

use redress_db::store::PgComplaintStore;
use redress_worker::{StaleReaper, WorkerConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redress_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();
    tracing::info!(
        stale_days = config.stale_days,
        interval_secs = config.check_interval_secs,
        "Loaded worker configuration"
    );

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = redress_db::create_pool(&database_url).await?;
    redress_db::health_check(&pool).await?;
    tracing::info!("Database connection pool created");

    redress_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let reaper = StaleReaper::new(PgComplaintStore::new(pool), config.stale_days);

    let check_interval = Duration::from_secs(config.check_interval_secs);
    let cancel = CancellationToken::new();
    let loop_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        reaper.run(check_interval, loop_cancel).await;
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    cancel.cancel();
    handle.await?;

    Ok(())
}

use std::sync::Arc;

use anyhow::Context;
use common::storage::filesystem::FilesystemObjectStore;
use tracing::{Level, info};

use datodirecto::config::AppConfig;
use datodirecto::mail::{HttpMailer, LogMailer, Mailer};
use datodirecto::state::AppState;
use datodirecto::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    seed::seed_role_permissions(&db).await?;
    seed::ensure_indexes(&db).await?;
    seed::seed_bootstrap_admin(&db, &config.auth).await?;

    let images = FilesystemObjectStore::new(
        config.storage.root.clone(),
        config.storage.max_image_size,
    )
    .await
    .context("Failed to open image storage")?;

    let mailer: Arc<dyn Mailer> = if config.mail.enabled {
        Arc::new(HttpMailer::new(&config.mail)?)
    } else {
        info!("Mail disabled; contact messages will only be stored");
        Arc::new(LogMailer)
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config,
        images: Arc::new(images),
        mailer,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

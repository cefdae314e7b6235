use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daily_digest::client::ApiClient;
use daily_digest::config::Config;
use daily_digest::routes::{self, AppState};
use daily_digest::store::{start_background_refresh, StoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daily_digest=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::var("DIGEST_CONFIG").unwrap_or_else(|_| "digest.toml".to_string());
    let config = Config::load(&config_path)?.with_env_overrides();
    info!("Loaded configuration from {}", config_path);
    info!("Reading stories from {}", config.api_host);

    // Create backend client and story store
    let client = ApiClient::new(
        &config.api_host,
        Duration::from_secs(config.request_timeout),
    )?;
    let store = Arc::new(StoryStore::new(Arc::new(client)));

    // Start background refresh task
    let bg_store = store.clone();
    let refresh_interval = config.refresh_interval;
    tokio::spawn(async move {
        start_background_refresh(bg_store, refresh_interval).await;
    });

    let state = Arc::new(AppState {
        store,
        site_title: config.site_title.clone(),
    });
    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Server starting on http://{}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}

use anyhow::Context;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use millionaire_api::{
    config::Config,
    create_router,
    services::{
        game_factory::InMemoryQuestionCatalog,
        store::{InMemoryAccountStore, InMemoryGameStore},
        AppState,
    },
    utils::time::SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting Millionaire API");

    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!(
        "Configuration loaded for environment: {:?}",
        std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string())
    );

    let rules = config.game_rules().context("Invalid game rules")?;

    let catalog = match &config.question_bank_path {
        Some(path) => InMemoryQuestionCatalog::load_json(path, rules.prizes.len())?,
        None => {
            tracing::warn!("No question bank configured, games cannot be started");
            InMemoryQuestionCatalog::new()
        }
    };

    let bind_addr = config.bind_addr.clone();
    let app_state = Arc::new(AppState::new(
        config,
        rules,
        Arc::new(catalog),
        Arc::new(InMemoryGameStore::new()),
        Arc::new(InMemoryAccountStore::new()),
        Arc::new(SystemClock),
        StdRng::from_os_rng(),
    ));

    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` filters, `LOG_FORMAT=json` switches to structured output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "millionaire_api=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

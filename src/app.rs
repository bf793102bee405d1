/*
 * Responsibility
 * - Load Config → build dependencies → assemble the Router
 * - Apply middleware (CORS / request-id / trace / timeout)
 * - Start with axum::serve()
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware;
use crate::repos::drinks::{DrinkRepo, InMemoryDrinkRepo, PgDrinkRepo};
use crate::services::auth::build_authorizer;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins; ex: RUST_LOG=info,coffee_shop=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash so it gets noticed
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading config")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        issuer = %config.auth_issuer,
        jwks = %config.auth_jwks_url,
        "starting coffee shop API"
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app).await.context("serving")?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let authorizer = build_authorizer(config).context("building authorizer")?;

    let drinks: Arc<dyn DrinkRepo> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(5))
                .connect(url)
                .await
                .context("connecting to database")?;
            let repo = PgDrinkRepo::new(pool);
            repo.ensure_schema().await.context("creating drinks table")?;
            Arc::new(repo)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; drinks are kept in memory");
            Arc::new(InMemoryDrinkRepo::new())
        }
    };
    tracing::info!(backend = drinks.backend_name(), "drink store ready");

    Ok(AppState::new(authorizer, drinks))
}

/// Routes plus JSON fallbacks for unknown paths and wrong methods.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(&state))
        .fallback(|| async { AppError::NotFound })
        .method_not_allowed_fallback(|| async { AppError::MethodNotAllowed })
        .with_state(state)
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = router(state);
    let router = middleware::http::apply(router, config);
    middleware::cors::apply(router, config)
}

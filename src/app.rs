/*
 * Responsibility
 * - Config読み込み → 依存生成 (DB pool, verifier) → Router 組み立て
 * - Middleware の適用 (CORS/HTTP)
 * - axum::serve() で起動
 */
use std::{any::Any, panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppEnv, Config};
use crate::repos::user_repo::PgUserStore;
use crate::services::identity::{GoogleIdTokenVerifier, HttpCertsSource};
use crate::state::AppState;
use crate::{api, middleware};

// Overridden by RUST_LOG, e.g. RUST_LOG=info,google_login_api=debug,tower_http=debug
const DEFAULT_LOG_FILTER: &str = "info,tower_http=info,sqlx=warn";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

// Development aborts on the first panic; production logs it and keeps serving.
fn init_panic_hook(app_env: AppEnv) {
    let fallback = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(
            payload = panic_message(info.payload()),
            %location,
            "panic"
        );

        if app_env.is_production() {
            fallback(info);
        } else {
            process::abort();
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;

    init_panic_hook(config.app_env);

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    tracing::info!("listening on http://{}", config.addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// Process-level dependencies are created once here and injected into AppState.
async fn build_state(config: &Config) -> Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("connecting to the database")?;
    tracing::info!("connected to the database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("running database migrations")?;

    let certs = HttpCertsSource::new(config.google_certs_url.clone())
        .context("building certs http client")?;
    let verifier = GoogleIdTokenVerifier::new(Arc::new(certs), config.token_leeway);

    Ok(AppState::new(
        Arc::new(verifier),
        Arc::new(PgUserStore::new(pool)),
        config.client_id.as_str(),
    ))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes().with_state(state);
    let router = middleware::http::apply(router);
    middleware::cors::apply(router, config)
}

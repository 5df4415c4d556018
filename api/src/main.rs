//! HBnB API Server
//!
//! A lodging catalog of users, places, amenities and reviews with
//! ownership-based authorization. Uses hexagonal (ports & adapters)
//! architecture so storage backends can be swapped by configuration.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use app::Catalog;
use auth::{Pbkdf2PasswordHasher, TokenIssuer};
use config::{Config, StorageBackend};
use domain::ports::Repositories;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub tokens: Arc<TokenIssuer>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full router for the given state
pub fn router(state: AppState) -> Router {
    let mut login = Router::new().route("/auth/login", post(handlers::login));
    if state.config.login_rate_limit {
        // 2 req/sec sustained, burst of 5, keyed on the peer address
        match GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
        {
            Some(config) => {
                login = login.layer(GovernorLayer {
                    config: Arc::new(config),
                });
            }
            None => tracing::warn!("Invalid rate limit settings, login is not rate limited"),
        }
    }

    let public = Router::new()
        .route("/health", get(health))
        .route("/users", get(handlers::list_users))
        .route("/users/:id", get(handlers::get_user))
        .route("/users/:id/places", get(handlers::user_places))
        .route("/users/:id/reviews", get(handlers::user_reviews))
        .route("/amenities", get(handlers::list_amenities))
        .route("/amenities/:id", get(handlers::get_amenity))
        .route("/places", get(handlers::list_places))
        .route("/places/:id", get(handlers::get_place))
        .route("/places/:id/reviews", get(handlers::place_reviews))
        .route("/reviews", get(handlers::list_reviews))
        .route("/reviews/:id", get(handlers::get_review));

    let protected = Router::new()
        .route("/users/:id", put(handlers::update_user))
        .route("/amenities", post(handlers::create_amenity))
        .route("/amenities/:id", put(handlers::update_amenity))
        .route("/places", post(handlers::create_place))
        .route(
            "/places/:id",
            put(handlers::update_place).delete(handlers::delete_place),
        )
        .route("/reviews", post(handlers::create_review))
        .route(
            "/reviews/:id",
            put(handlers::update_review).delete(handlers::delete_review),
        )
        // Administrative surface
        .route("/admin/users", post(handlers::admin::create_user))
        .route("/admin/users/:id", put(handlers::admin::update_user))
        .route("/admin/amenities", post(handlers::create_amenity))
        .route("/admin/amenities/:id", put(handlers::update_amenity))
        .route(
            "/admin/places/:id",
            put(handlers::update_place).delete(handlers::delete_place),
        )
        .route(
            "/admin/reviews/:id",
            put(handlers::admin::update_review).delete(handlers::admin::delete_review),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .nest("/api/v1", public.merge(protected).merge(login))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the configured storage backend
async fn repositories(config: &Config) -> anyhow::Result<Repositories> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Ok(Repositories::in_memory())
        }
        StorageBackend::Database => {
            tracing::info!("Connecting to database...");
            let db = adapters::database::connect(&config.database_url)
                .await
                .context("Failed to connect to database")?;
            adapters::database::create_schema(&db)
                .await
                .context("Failed to create database schema")?;
            tracing::info!("Database connected");
            Ok(Repositories::database(db))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hbnb_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting HBnB API...");

    let config = Config::from_env()?;

    let repos = repositories(&config).await?;
    let hasher = Arc::new(Pbkdf2PasswordHasher::new(config.password_hash_rounds));
    let catalog = Arc::new(Catalog::new(repos, hasher));

    if let Some(admin) = &config.admin {
        catalog
            .users
            .ensure_admin(
                &admin.email,
                &admin.password,
                &admin.first_name,
                &admin.last_name,
            )
            .await
            .context("Failed to bootstrap admin user")?;
    }

    let state = AppState {
        catalog,
        tokens: Arc::new(TokenIssuer::new(
            &config.token_secret,
            config.token_ttl_seconds,
        )),
        config: config.clone(),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

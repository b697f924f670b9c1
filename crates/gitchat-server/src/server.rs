// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Main server implementation

use crate::config::ServerConfig;
use crate::dependencies::DefaultServerDependencies;
use crate::error::{ServerError, ServerResult};
use crate::handlers;
use crate::middleware::{rate_limit_middleware, RateLimitState};
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    middleware::from_fn,
    routing::{delete, get, put},
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

/// GitChat HTTP server
pub struct Server {
    config: ServerConfig,
    app: Router,
}

impl Server {
    /// Create a new server instance with default dependencies
    pub async fn new(config: ServerConfig) -> ServerResult<Self> {
        let state = DefaultServerDependencies::new(config.clone())
            .await
            .map_err(|err| ServerError::Internal(err.to_string()))?
            .into_state();
        Self::with_state(config, state)
    }

    /// Construct a server from an already-built app state (used for custom
    /// dependencies)
    pub fn with_state(config: ServerConfig, state: AppState) -> ServerResult<Self> {
        let app = Self::build_app(state, &config);
        Ok(Self { config, app })
    }

    /// Build the Axum application with routes and middleware
    fn build_app(state: AppState, config: &ServerConfig) -> Router {
        // Build middleware stack
        let middleware_stack = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(from_fn({
                let rate_limit_state =
                    std::sync::Arc::new(RateLimitState::new(config.rate_limit.clone()));
                move |req, next| {
                    let state = std::sync::Arc::clone(&rate_limit_state);
                    rate_limit_middleware(state, req, next)
                }
            }))
            .layer({
                if config.enable_cors {
                    CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
                } else {
                    CorsLayer::new()
                        .allow_origin(vec![
                            HeaderValue::from_static("http://localhost:3000"),
                            HeaderValue::from_static("http://127.0.0.1:3000"),
                        ])
                        .allow_methods([axum::http::Method::GET, axum::http::Method::PUT])
                        .allow_headers([
                            axum::http::header::AUTHORIZATION,
                            axum::http::header::CONTENT_TYPE,
                        ])
                }
            });

        // API routes
        let api_routes = Router::new()
            // Health and status endpoints
            .route("/healthz", get(handlers::health::health_check))
            .route("/readyz", get(handlers::health::readiness_check))
            .route("/version", get(handlers::health::version))
            // Repository URL validation
            .route("/validate", get(handlers::validate::validate_repository))
            // Token management
            .route("/tokens", get(handlers::tokens::token_status))
            .route("/tokens", put(handlers::tokens::put_token))
            .route("/tokens", delete(handlers::tokens::delete_token));

        // Repository flows live at the root so redirect targets match the
        // public URL shape
        Router::new()
            .nest("/api/v1", api_routes)
            .route("/:owner/:repo", get(handlers::repo::repository_root))
            .route("/:owner/:repo/branches", get(handlers::repo::branch_selection))
            .route("/:owner/:repo/tree/*branch", get(handlers::repo::tree))
            .with_state(state)
            .layer(middleware_stack)
    }

    /// Run the server
    pub async fn run(self) -> ServerResult<()> {
        let addr = self.config.bind_addr;
        info!("Starting server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Internal(format!("failed to bind {}: {}", addr, err)))?;
        axum::serve(listener, self.app)
            .await
            .map_err(|err| ServerError::Internal(format!("server error: {}", err)))?;

        Ok(())
    }

    /// Get the bind address
    pub fn addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}

//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use twilio::{TwilioOptions, TwilioService};

use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::kernel::{ServerDeps, TwilioAdapter};
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes;

/// Shared application state handed to every handler
pub type AppState = Arc<ServerDeps>;

/// Build production dependencies from configuration
pub fn build_deps(pool: PgPool, config: &Config) -> ServerDeps {
    let twilio = config.twilio.as_ref().map(|t| {
        Arc::new(TwilioService::new(TwilioOptions {
            account_sid: t.account_sid.clone(),
            auth_token: t.auth_token.clone(),
            from_number: t.phone_number.clone(),
        }))
    });

    if twilio.is_none() {
        tracing::warn!("Twilio is not configured; SMS sends will fail");
    }

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    ServerDeps::new(
        pool,
        Arc::new(TwilioAdapter::new(twilio)),
        jwt_service,
        config.public_invite_url.clone(),
    )
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Build the Axum application router
///
/// Every request passes through the JWT middleware; handlers that need a
/// caller take an `AuthUser` and reject anonymous requests with 401.
pub fn build_app(deps: ServerDeps, allowed_origins: &[String]) -> Router {
    let jwt_service = deps.jwt_service.clone();
    let state: AppState = Arc::new(deps);

    Router::new()
        .merge(routes::health::router())
        .nest("/auth", routes::auth::router())
        .nest("/invites", routes::invites::router())
        .nest("/relationships", routes::relationships::router())
        .nest("/search", routes::search::router())
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

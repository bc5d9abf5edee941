use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};

use http::{Method, header, header::HeaderName};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod state;
mod db;

mod models {
    pub mod contact;
    pub mod file;
    pub mod session;
    pub mod user;
    pub mod user_data;
}

mod repositories {
    pub mod contact;
    pub mod file;
    pub mod session;
    pub mod user;
    pub mod user_data;
}

mod services {
    pub mod auth;
    pub mod mailer;
}

mod handlers {
    pub mod auth;
    pub mod contact;
    pub mod files;
    pub mod profile;
    pub mod user_data;
}

mod middleware_layer {
    pub mod auth;
}

mod validation {
    pub mod auth;
    pub mod contact;
}

use config::Config;
use error::AppError;
use state::AppState;

/// The maximum accepted request body. Uploads arrive base64-encoded inside
/// a JSON document, so this bounds the stored file size too.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Answers requests whose method a route does not support.
async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    let state = AppState::new(&config)?;
    tracing::info!("✅ AppState initialized");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-auth-token"),
            HeaderName::from_static("x-session-token"),
        ])
        .max_age(Duration::from_secs(86400));

    let auth_routes = Router::new()
        .route(
            "/api/auth/register",
            post(handlers::auth::register).fallback(method_not_allowed),
        )
        .route(
            "/api/auth/login",
            post(handlers::auth::login).fallback(method_not_allowed),
        )
        .route(
            "/api/auth/me",
            get(handlers::auth::whoami).fallback(method_not_allowed),
        )
        .with_state(state.clone());

    let contact_public_routes = Router::new()
        .route(
            "/api/contact",
            post(handlers::contact::submit).fallback(method_not_allowed),
        )
        .with_state(state.clone());

    let contact_inbox_routes = Router::new()
        .route(
            "/api/contact/messages",
            get(handlers::contact::list_messages).fallback(method_not_allowed),
        )
        .route(
            "/api/contact/messages/{id}/read",
            put(handlers::contact::mark_read).fallback(method_not_allowed),
        )
        .route(
            "/api/contact/messages/{id}/reply",
            post(handlers::contact::reply).fallback(method_not_allowed),
        )
        .route(
            "/api/contact/messages/{id}",
            delete(handlers::contact::delete_message).fallback(method_not_allowed),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    let file_routes = Router::new()
        .route(
            "/api/files",
            get(handlers::files::list_files)
                .post(handlers::files::upload)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/files/{id}",
            get(handlers::files::get_file).fallback(method_not_allowed),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    let profile_routes = Router::new()
        .route(
            "/api/profile",
            get(handlers::profile::get_profile)
                .put(handlers::profile::update_profile)
                .delete(handlers::profile::delete_profile)
                .fallback(method_not_allowed),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_profile_session,
        ))
        .with_state(state.clone());

    let user_data_routes = Router::new()
        .route(
            "/api/user-data",
            get(handlers::user_data::get_user_data)
                .post(handlers::user_data::set_user_data)
                .put(handlers::user_data::set_user_data)
                .fallback(method_not_allowed),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_data_auth,
        ))
        .with_state(state.clone());

    let app = Router::new()
        .merge(auth_routes)
        .merge(contact_public_routes)
        .merge(contact_inbox_routes)
        .merge(file_routes)
        .merge(profile_routes)
        .merge(user_data_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

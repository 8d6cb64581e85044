use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{FromRef, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};
use axum_extra::extract::cookie::Key;
use tower_http::services::ServeDir;

use super::admin::admin_router;
use super::itdb::itdb_router;
use super::pages;
use super::user::user_router;
use crate::session::SessionStore;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: Arc<dyn SessionStore>,
    /// Key used to sign the session cookie.
    pub cookie_key: Key,
    pub asset_dir: PathBuf,
}

/// Local wrapper so `SignedCookieJar` can extract the key from
/// `Arc<AppState>` without running afoul of the orphan rule.
#[derive(Clone)]
pub struct CookieKey(pub Key);

impl FromRef<Arc<AppState>> for CookieKey {
    fn from_ref(state: &Arc<AppState>) -> CookieKey {
        CookieKey(state.cookie_key.clone())
    }
}

impl From<CookieKey> for Key {
    fn from(key: CookieKey) -> Key {
        key.0
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let asset_dir = state.asset_dir.clone();
    Router::new()
        .route("/", get(pages::page_index))
        .route("/about", get(pages::page_about))
        .route("/health", get(health))
        .nest("/user", user_router())
        .nest("/admin", admin_router())
        .nest("/itdb", itdb_router())
        .nest_service("/asset", ServeDir::new(asset_dir))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

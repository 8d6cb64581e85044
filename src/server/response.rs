use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::Result as StoreResult;

/// 302 redirect to a fixed target path. Every authentication and
/// authorization failure, and every successful mutation, funnels through
/// this; no other status codes are used for control flow.
#[must_use]
pub fn redirect(to: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, to.to_string())]).into_response()
}

/// Page-level error that converts to an HTTP response.
///
/// Store failures end up here as a 500 with a logged diagnostic; the
/// request dies, the process does not.
pub struct PageError {
    pub status: StatusCode,
    pub message: String,
}

impl PageError {
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Extension trait for converting store results to page errors with a
/// custom message.
pub trait StoreResultExt<T> {
    fn page_err(self, message: &'static str) -> Result<T, PageError>;
}

impl<T> StoreResultExt<T> for StoreResult<T> {
    fn page_err(self, message: &'static str) -> Result<T, PageError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            PageError::internal(message)
        })
    }
}

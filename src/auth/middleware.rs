use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::server::AppState;
use crate::server::response::redirect;
use crate::session::SESSION_COOKIE;
use crate::types::{Permission, Role};

/// The acting user, resolved fresh from the session store and the user
/// table on every protected request. Passed explicitly into the view layer;
/// permission checks are plain function calls on [`Role`].
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub logged_on: String,
    /// `None` when the account was deleted mid-session or carries an
    /// unrecognized usergroup; both deny every permission.
    pub role: Option<Role>,
}

impl CurrentUser {
    #[must_use]
    pub fn may(&self, permission: Permission) -> bool {
        self.role.is_some_and(|role| role.authorize(permission))
    }
}

/// Extractor that requires an authenticated session.
pub struct RequireLogin(pub CurrentUser);

/// Extractor that requires the `access_admin` permission.
pub struct RequireAdmin(pub CurrentUser);

/// Extractor that requires the `access_itdb` permission.
pub struct RequireItdb(pub CurrentUser);

#[derive(Debug)]
pub enum AuthError {
    /// No authenticated session; the visitor belongs on the landing page.
    NotLoggedIn,
    /// Authenticated but not entitled; send them back to the highest page
    /// they may see.
    NotPermitted,
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::NotLoggedIn => redirect("/"),
            AuthError::NotPermitted => redirect("/user"),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

impl FromRequestParts<Arc<AppState>> for RequireLogin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_session(parts, state)?;
        Ok(RequireLogin(user))
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_session(parts, state)?;

        if !user.may(Permission::AccessAdmin) {
            return Err(AuthError::NotPermitted);
        }

        Ok(RequireAdmin(user))
    }
}

impl FromRequestParts<Arc<AppState>> for RequireItdb {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_session(parts, state)?;

        if !user.may(Permission::AccessItdb) {
            return Err(AuthError::NotPermitted);
        }

        Ok(RequireItdb(user))
    }
}

fn resolve_session(parts: &Parts, state: &Arc<AppState>) -> Result<CurrentUser, AuthError> {
    let jar = SignedCookieJar::from_headers(&parts.headers, state.cookie_key.clone());

    let session_id = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(AuthError::NotLoggedIn)?;

    let session = state
        .sessions
        .get(&session_id)
        .filter(|session| session.authenticated)
        .ok_or(AuthError::NotLoggedIn)?;

    let role = state
        .store
        .get_user_by_username(&session.username)
        .map_err(|e| {
            tracing::error!("failed to resolve usergroup for {:?}: {e}", session.username);
            AuthError::InternalError
        })?
        .and_then(|user| Role::parse(&user.usergroup));

    Ok(CurrentUser {
        id: session.user_id,
        username: session.username,
        logged_on: session.logged_on,
        role,
    })
}

use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, State},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use chrono::Utc;
use uuid::Uuid;

use super::dto::{LoginForm, PasswordForm};
use super::render;
use super::response::{PageError, StoreResultExt, redirect};
use crate::auth::{RequireLogin, verify_login};
use crate::server::{AppState, CookieKey};
use crate::session::{SESSION_COOKIE, SessionData};
use crate::types::{Permission, User};

pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(page_user))
        .route("/login", get(login_redirect).post(login))
        .route("/account", get(page_account))
        .route("/password", get(page_password))
        .route("/password/update", axum::routing::post(update_password))
        .route("/logout", get(logout))
}

/// Login is POST-only; a stray GET goes back to the landing page.
async fn login_redirect() -> Response {
    redirect("/")
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: SignedCookieJar<CookieKey>,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let Some(user) = verify_login(state.store.as_ref(), &form.username, &form.password)
        .page_err("failed to verify login")?
    else {
        let message = urlencoding::encode("wrong username or password");
        return Ok(redirect(&format!("/?message={message}")));
    };

    let session_id = Uuid::new_v4().to_string();
    state.sessions.set(
        &session_id,
        SessionData {
            authenticated: true,
            user_id: user.id,
            username: user.username,
            logged_on: Utc::now().to_rfc2822(),
        },
    );

    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .build();

    Ok((jar.add(cookie), redirect("/user")).into_response())
}

/// Logout resets the session fields rather than deleting the record.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: SignedCookieJar<CookieKey>,
) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.set(cookie.value(), SessionData::default());
    }
    redirect("/")
}

async fn page_user(RequireLogin(user): RequireLogin) -> Response {
    render::user_home_page(&user).into_response()
}

async fn page_account(
    RequireLogin(user): RequireLogin,
    State(state): State<Arc<AppState>>,
) -> Result<Response, PageError> {
    let record = state
        .store
        .get_user_by_username(&user.username)
        .page_err("failed to read user account")?
        .unwrap_or_else(|| User {
            id: String::new(),
            username: user.username.clone(),
            email: String::new(),
            password: String::new(),
            usergroup: String::new(),
            created_at: Utc::now(),
        });

    Ok(render::account_page(&user, &record).into_response())
}

async fn page_password(RequireLogin(user): RequireLogin) -> Response {
    render::password_page(&user, None).into_response()
}

async fn update_password(
    RequireLogin(user): RequireLogin,
    State(state): State<Arc<AppState>>,
    Form(form): Form<PasswordForm>,
) -> Result<Response, PageError> {
    let target = if form.username.is_empty() {
        user.username.clone()
    } else {
        form.username.clone()
    };
    let own_account = target == user.username;

    let required = if own_account {
        Permission::UpdateOwnPassword
    } else {
        Permission::UpdateUserPassword
    };
    if !user.may(required) {
        return Ok(redirect("/user"));
    }

    let Some(record) = state
        .store
        .get_user_by_username(&target)
        .page_err("failed to look up password target")?
    else {
        let page = render::password_page(&user, Some("no user with that username exists"));
        return Ok(page.into_response());
    };

    if own_account && record.password != form.old_password {
        let page = render::password_page(&user, Some("old password is incorrect"));
        return Ok(page.into_response());
    }

    if form.new_password != form.confirm_password {
        let page = render::password_page(&user, Some("password confirmation does not match"));
        return Ok(page.into_response());
    }

    state
        .store
        .update_user_password(&record.id, &form.new_password)
        .page_err("failed to update password")?;

    Ok(redirect("/user/account"))
}

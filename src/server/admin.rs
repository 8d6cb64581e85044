use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use uuid::Uuid;

use super::dto::NewUserForm;
use super::render;
use super::response::{PageError, StoreResultExt, redirect};
use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::types::{Role, User};

pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(page_admin))
        .route("/usermanagement", get(page_user_management))
        .route("/usermanagement/newuser", get(page_new_user))
        .route("/usermanagement/newuser/submit", post(new_user_submit))
        .route("/usermanagement/deleteuser/{id}", get(delete_user))
}

async fn page_admin(
    RequireAdmin(user): RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> Result<Response, PageError> {
    let record = state
        .store
        .get_user_by_username(&user.username)
        .page_err("failed to read admin account")?
        .unwrap_or_else(|| User {
            id: user.id.clone(),
            username: user.username.clone(),
            email: String::new(),
            password: String::new(),
            usergroup: String::new(),
            created_at: Utc::now(),
        });

    Ok(render::admin_home_page(&user, &record).into_response())
}

async fn page_user_management(
    RequireAdmin(user): RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> Result<Response, PageError> {
    let users = state.store.list_users().page_err("failed to list users")?;
    Ok(render::user_management_page(&user, &users).into_response())
}

async fn page_new_user(RequireAdmin(user): RequireAdmin) -> Response {
    render::new_user_page(&user, None).into_response()
}

async fn new_user_submit(
    RequireAdmin(user): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Form(form): Form<NewUserForm>,
) -> Result<Response, PageError> {
    if form.username.trim().is_empty() {
        let page = render::new_user_page(&user, Some("username cannot be empty"));
        return Ok(page.into_response());
    }

    // Roles are a closed set; reject anything the policy does not know.
    if Role::parse(&form.usergroup).is_none() {
        let page = render::new_user_page(&user, Some("unknown usergroup"));
        return Ok(page.into_response());
    }

    // Uniqueness is a pre-check only; the table carries no constraint.
    if state
        .store
        .username_exists(&form.username)
        .page_err("failed to check username")?
    {
        let page = render::new_user_page(&user, Some("username already exists"));
        return Ok(page.into_response());
    }

    let record = User {
        id: Uuid::new_v4().to_string(),
        username: form.username,
        email: form.email,
        password: form.password,
        usergroup: form.usergroup,
        created_at: Utc::now(),
    };
    state
        .store
        .create_user(&record)
        .page_err("failed to create user")?;

    Ok(redirect("/admin/usermanagement"))
}

async fn delete_user(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    // Deleting a missing id is a no-op.
    state
        .store
        .delete_user(&id)
        .page_err("failed to delete user")?;

    Ok(redirect("/admin/usermanagement"))
}

mod admin;
pub mod dto;
mod itdb;
mod pages;
pub mod render;
pub mod response;
mod router;
mod user;

pub use admin::admin_router;
pub use itdb::itdb_router;
pub use router::{AppState, CookieKey, create_router};
pub use user::user_router;

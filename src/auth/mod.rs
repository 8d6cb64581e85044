mod credentials;
mod middleware;

pub use credentials::verify_login;
pub use middleware::{AuthError, CurrentUser, RequireAdmin, RequireItdb, RequireLogin};

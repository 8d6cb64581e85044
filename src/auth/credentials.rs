use crate::error::Result;
use crate::store::Store;
use crate::types::User;

/// Validates a login submission against the stored credential.
///
/// The submitted password is compared verbatim with the stored value; no
/// hashing scheme is applied at this layer. Returns the user record on a
/// match, `None` for an unknown username or a wrong password.
pub fn verify_login(store: &dyn Store, username: &str, password: &str) -> Result<Option<User>> {
    let Some(user) = store.get_user_by_username(username)? else {
        tracing::debug!("login failed: unknown username {username:?}");
        return Ok(None);
    };

    if user.password != password {
        tracing::debug!("login failed: wrong password for {username:?}");
        return Ok(None);
    }

    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use chrono::Utc;
    use tempfile::TempDir;

    fn store_with_user(temp: &TempDir) -> SqliteStore {
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        store
            .create_user(&User {
                id: "u1".to_string(),
                username: "alice".to_string(),
                email: String::new(),
                password: "hunter2".to_string(),
                usergroup: "normal".to_string(),
                created_at: Utc::now(),
            })
            .unwrap();
        store
    }

    #[test]
    fn test_correct_credentials() {
        let temp = TempDir::new().unwrap();
        let store = store_with_user(&temp);

        let user = verify_login(&store, "alice", "hunter2").unwrap().unwrap();
        assert_eq!(user.id, "u1");
    }

    #[test]
    fn test_wrong_password() {
        let temp = TempDir::new().unwrap();
        let store = store_with_user(&temp);

        assert!(verify_login(&store, "alice", "hunter3").unwrap().is_none());
    }

    #[test]
    fn test_unknown_username() {
        let temp = TempDir::new().unwrap();
        let store = store_with_user(&temp);

        assert!(verify_login(&store, "bob", "hunter2").unwrap().is_none());
    }
}

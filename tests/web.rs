use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_extra::extract::cookie::Key;
use chrono::Utc;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use deskreg::server::{AppState, create_router};
use deskreg::session::MemorySessionStore;
use deskreg::store::{SqliteStore, Store};
use deskreg::types::{Office, User};

struct TestApp {
    router: Router,
    store: Arc<SqliteStore>,
    _temp: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(SqliteStore::new(temp.path().join("deskreg.db")).unwrap());
        store.initialize().unwrap();

        let state = Arc::new(AppState {
            store: store.clone(),
            sessions: Arc::new(MemorySessionStore::new()),
            cookie_key: Key::generate(),
            asset_dir: temp.path().join("asset"),
        });

        TestApp {
            router: create_router(state),
            store,
            _temp: temp,
        }
    }

    fn seed_user(&self, username: &str, password: &str, usergroup: &str) -> User {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: password.to_string(),
            usergroup: usergroup.to_string(),
            created_at: Utc::now(),
        };
        self.store.create_user(&user).unwrap();
        user
    }

    async fn get(&self, path: &str, cookie: Option<&str>) -> axum::response::Response {
        let mut builder = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post(&self, path: &str, cookie: Option<&str>, body: &str) -> axum::response::Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Logs in and returns the session cookie pair to replay on later
    /// requests. Panics if the credentials are rejected.
    async fn login(&self, username: &str, password: &str) -> String {
        let body = format!("username={username}&password={password}");
        let response = self.post("/user/login", None, &body).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/user");

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("login should set the session cookie")
            .to_str()
            .unwrap();
        set_cookie
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("expected a Location header")
        .to_str()
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_anonymous_visitor_is_sent_to_landing_page() {
    let app = TestApp::new();

    for path in ["/user", "/user/account", "/admin", "/itdb", "/itdb/pc/sibu"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status(), StatusCode::FOUND, "path {path}");
        assert_eq!(location(&response), "/", "path {path}");
    }
}

#[tokio::test]
async fn test_public_pages_do_not_require_a_session() {
    let app = TestApp::new();

    assert_eq!(app.get("/", None).await.status(), StatusCode::OK);
    assert_eq!(app.get("/about", None).await.status(), StatusCode::OK);
    assert_eq!(app.get("/health", None).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_with_wrong_password_bounces_with_message() {
    let app = TestApp::new();
    app.seed_user("alice", "secret", "normal");

    let response = app
        .post("/user/login", None, "username=alice&password=nope")
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "/?message=wrong%20username%20or%20password"
    );
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    // The landing page echoes the message back.
    let page = body_text(
        app.get("/?message=wrong%20username%20or%20password", None).await,
    )
    .await;
    assert!(page.contains("wrong username or password"));
}

#[tokio::test]
async fn test_login_then_user_page_greets_by_name() {
    let app = TestApp::new();
    app.seed_user("alice", "secret", "normal");

    let cookie = app.login("alice", "secret").await;
    let response = app.get("/user", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("alice"));
}

#[tokio::test]
async fn test_normal_user_is_bounced_from_admin_and_itdb() {
    let app = TestApp::new();
    app.seed_user("alice", "secret", "normal");
    let cookie = app.login("alice", "secret").await;

    for path in ["/admin", "/admin/usermanagement", "/itdb", "/itdb/pc/sibu"] {
        let response = app.get(path, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::FOUND, "path {path}");
        assert_eq!(location(&response), "/user", "path {path}");
    }
}

#[tokio::test]
async fn test_admin_reaches_admin_and_itdb_pages() {
    let app = TestApp::new();
    app.seed_user("root", "secret", "admin");
    let cookie = app.login("root", "secret").await;

    for path in ["/admin", "/admin/usermanagement", "/itdb", "/itdb/pc/sibu"] {
        let response = app.get(path, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
    }
}

#[tokio::test]
async fn test_logout_invalidates_the_session() {
    let app = TestApp::new();
    app.seed_user("alice", "secret", "normal");
    let cookie = app.login("alice", "secret").await;

    let response = app.get("/user/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");

    // The old cookie no longer grants access.
    let response = app.get("/user", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_admin_creates_and_deletes_a_user() {
    let app = TestApp::new();
    app.seed_user("root", "secret", "admin");
    let cookie = app.login("root", "secret").await;

    let response = app
        .post(
            "/admin/usermanagement/newuser/submit",
            Some(&cookie),
            "username=bob&email=bob%40example.com&password=pw&usergroup=normal",
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/admin/usermanagement");

    let bob = app
        .store
        .get_user_by_username("bob")
        .unwrap()
        .expect("bob should exist");
    assert_eq!(bob.usergroup, "normal");

    // A duplicate username re-renders the form with an explanation.
    let response = app
        .post(
            "/admin/usermanagement/newuser/submit",
            Some(&cookie),
            "username=bob&email=&password=pw&usergroup=normal",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("username already exists"));

    // An unrecognized usergroup is rejected outright.
    let response = app
        .post(
            "/admin/usermanagement/newuser/submit",
            Some(&cookie),
            "username=carol&email=&password=pw&usergroup=master",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("unknown usergroup"));
    assert!(app.store.get_user_by_username("carol").unwrap().is_none());

    let response = app
        .get(
            &format!("/admin/usermanagement/deleteuser/{}", bob.id),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(app.store.get_user_by_username("bob").unwrap().is_none());

    // Deleting a vanished id is a quiet no-op.
    let response = app
        .get(
            &format!("/admin/usermanagement/deleteuser/{}", bob.id),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_user_changes_own_password() {
    let app = TestApp::new();
    app.seed_user("alice", "secret", "normal");
    let cookie = app.login("alice", "secret").await;

    // Confirmation mismatch re-renders the form.
    let response = app
        .post(
            "/user/password/update",
            Some(&cookie),
            "old_password=secret&new_password=next&confirm_password=other",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        body_text(response)
            .await
            .contains("password confirmation does not match")
    );

    // Wrong old password re-renders the form.
    let response = app
        .post(
            "/user/password/update",
            Some(&cookie),
            "old_password=wrong&new_password=next&confirm_password=next",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("old password is incorrect"));

    let response = app
        .post(
            "/user/password/update",
            Some(&cookie),
            "old_password=secret&new_password=next&confirm_password=next",
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/user/account");

    let record = app.store.get_user_by_username("alice").unwrap().unwrap();
    assert_eq!(record.password, "next");
}

#[tokio::test]
async fn test_admin_changes_another_users_password_without_the_old_one() {
    let app = TestApp::new();
    app.seed_user("root", "secret", "admin");
    app.seed_user("alice", "secret", "normal");
    let cookie = app.login("root", "secret").await;

    let response = app
        .post(
            "/user/password/update",
            Some(&cookie),
            "username=alice&new_password=reset&confirm_password=reset",
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let record = app.store.get_user_by_username("alice").unwrap().unwrap();
    assert_eq!(record.password, "reset");

    // An unknown target re-renders the form.
    let response = app
        .post(
            "/user/password/update",
            Some(&cookie),
            "username=nobody&new_password=x&confirm_password=x",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        body_text(response)
            .await
            .contains("no user with that username exists")
    );
}

#[tokio::test]
async fn test_normal_user_cannot_change_another_users_password() {
    let app = TestApp::new();
    app.seed_user("alice", "secret", "normal");
    app.seed_user("bob", "secret", "normal");
    let cookie = app.login("alice", "secret").await;

    let response = app
        .post(
            "/user/password/update",
            Some(&cookie),
            "username=bob&new_password=taken&confirm_password=taken",
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/user");

    let record = app.store.get_user_by_username("bob").unwrap().unwrap();
    assert_eq!(record.password, "secret");
}

#[tokio::test]
async fn test_unknown_office_lists_nothing_and_mutates_nothing() {
    let app = TestApp::new();
    app.seed_user("root", "secret", "admin");
    let cookie = app.login("root", "secret").await;

    let response = app.get("/itdb/pc/mukah", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post(
            "/itdb/pc/mukah/add/submit",
            Some(&cookie),
            "hostname=ghost&ip=10.0.0.9",
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/itdb");

    for office in Office::ALL {
        assert!(app.store.list_pcs(office).unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_pc_crud_keeps_printer_hosts_in_step() {
    let app = TestApp::new();
    app.seed_user("root", "secret", "admin");
    let cookie = app.login("root", "secret").await;

    for body in [
        "model=LaserJet&serial_no=L1&printer_type=laser&nickname=front",
        "model=DeskJet&serial_no=D1&printer_type=inkjet&nickname=back",
    ] {
        let response = app
            .post("/itdb/printer/sibu/add/submit", Some(&cookie), body)
            .await;
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    let printers = app.store.list_printers(Office::Sibu).unwrap();
    assert_eq!(printers.len(), 2);
    let (first, second) = (printers[0].rowid, printers[1].rowid);

    let response = app
        .post(
            "/itdb/pc/sibu/add/submit",
            Some(&cookie),
            &format!(
                "hostname=ws01&ip=10.0.0.5&user=alice&department=accounts&printer={first}%20{second}"
            ),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/itdb/pc/sibu");

    let pcs = app.store.list_pcs(Office::Sibu).unwrap();
    assert_eq!(pcs.len(), 1);
    let pc = &pcs[0];
    assert_eq!(pc.printer_rowids(), vec![first, second]);

    for printer in app.store.list_printers(Office::Sibu).unwrap() {
        assert_eq!(printer.host, Some(pc.id));
    }

    // Dropping one printer from the linkage clears its host.
    let response = app
        .post(
            &format!("/itdb/pc/sibu/edit/{}/submit", pc.id),
            Some(&cookie),
            &format!("hostname=ws01&ip=10.0.0.5&user=alice&department=accounts&printer={first}"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    assert_eq!(
        app.store.get_printer(Office::Sibu, first).unwrap().unwrap().host,
        Some(pc.id)
    );
    assert_eq!(
        app.store.get_printer(Office::Sibu, second).unwrap().unwrap().host,
        None
    );

    let page = body_text(app.get(&format!("/itdb/pc/sibu/view/{}", pc.id), Some(&cookie)).await).await;
    assert!(page.contains("ws01"));
    assert!(page.contains("LaserJet"));
    assert!(!page.contains("DeskJet"));

    // Deleting the PC frees the remaining printer.
    let response = app
        .get(&format!("/itdb/pc/sibu/delete/{}", pc.id), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(app.store.list_pcs(Office::Sibu).unwrap().is_empty());
    assert_eq!(
        app.store.get_printer(Office::Sibu, first).unwrap().unwrap().host,
        None
    );
}

#[tokio::test]
async fn test_printer_host_edit_rewrites_pc_linkage() {
    let app = TestApp::new();
    app.seed_user("root", "secret", "admin");
    let cookie = app.login("root", "secret").await;

    for body in ["hostname=ws01&ip=10.0.0.5", "hostname=ws02&ip=10.0.0.6"] {
        let response = app
            .post("/itdb/pc/kapit/add/submit", Some(&cookie), body)
            .await;
        assert_eq!(response.status(), StatusCode::FOUND);
    }
    let pcs = app.store.list_pcs(Office::Kapit).unwrap();
    let (ws01, ws02) = (pcs[0].id, pcs[1].id);

    // Adding a printer with a host id links it to that PC.
    let response = app
        .post(
            "/itdb/printer/kapit/add/submit",
            Some(&cookie),
            &format!("model=LaserJet&serial_no=L1&printer_type=laser&nickname=front&host={ws01}"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let printer = &app.store.list_printers(Office::Kapit).unwrap()[0];
    assert_eq!(printer.host, Some(ws01));
    let pc = app.store.get_pc(Office::Kapit, ws01).unwrap().unwrap();
    assert_eq!(pc.printer_rowids(), vec![printer.rowid]);

    // Moving the printer to the other PC rewrites both linkage fields.
    let response = app
        .post(
            &format!("/itdb/printer/kapit/edit/{}/submit", printer.rowid),
            Some(&cookie),
            &format!("model=LaserJet&serial_no=L1&printer_type=laser&nickname=front&host={ws02}"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let old_host = app.store.get_pc(Office::Kapit, ws01).unwrap().unwrap();
    assert!(old_host.printer_rowids().is_empty());
    let new_host = app.store.get_pc(Office::Kapit, ws02).unwrap().unwrap();
    assert_eq!(new_host.printer_rowids(), vec![printer.rowid]);
    assert_eq!(
        app.store
            .get_printer(Office::Kapit, printer.rowid)
            .unwrap()
            .unwrap()
            .host,
        Some(ws02)
    );
}

#[tokio::test]
async fn test_edit_submit_for_a_deleted_row_is_a_quiet_redirect() {
    let app = TestApp::new();
    app.seed_user("root", "secret", "admin");
    let cookie = app.login("root", "secret").await;

    let response = app
        .post(
            "/itdb/pc/sibu/edit/999/submit",
            Some(&cookie),
            "hostname=ghost&ip=10.0.0.9",
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/itdb/pc/sibu");
    assert!(app.store.list_pcs(Office::Sibu).unwrap().is_empty());

    let response = app
        .post(
            "/itdb/printer/sibu/edit/999/submit",
            Some(&cookie),
            "model=Ghost&serial_no=G1&printer_type=laser&nickname=gone",
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/itdb/printer/sibu");
    assert!(app.store.list_printers(Office::Sibu).unwrap().is_empty());
}

#[tokio::test]
async fn test_offices_are_isolated_from_each_other() {
    let app = TestApp::new();
    app.seed_user("root", "secret", "admin");
    let cookie = app.login("root", "secret").await;

    let response = app
        .post(
            "/itdb/pc/sibu/add/submit",
            Some(&cookie),
            "hostname=ws01&ip=10.0.0.5",
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    assert_eq!(app.store.list_pcs(Office::Sibu).unwrap().len(), 1);
    assert!(app.store.list_pcs(Office::Kapit).unwrap().is_empty());

    let page = body_text(app.get("/itdb/pc/kapit", Some(&cookie)).await).await;
    assert!(!page.contains("ws01"));
}

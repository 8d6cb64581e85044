//! # Deskreg
//!
//! An internal asset and user management server, usable both as a standalone
//! binary and as a library.
//!
//! Accounts live behind a session-based login; the "IT database" module
//! tracks PCs and printers per office. Access to each page is decided by a
//! small role policy ([`types::Role`] x [`types::Permission`]).
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::PathBuf;
//! use axum_extra::extract::cookie::Key;
//! use deskreg::server::{AppState, create_router};
//! use deskreg::session::MemorySessionStore;
//! use deskreg::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new(&PathBuf::from("./data/deskreg.db")).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState {
//!     store: Arc::new(store),
//!     sessions: Arc::new(MemorySessionStore::new()),
//!     cookie_key: Key::generate(),
//!     asset_dir: PathBuf::from("./asset"),
//! });
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Pulls in the binary's CLI dependencies. Disable with
//!   `default-features = false` for library use.

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod session;
pub mod store;
pub mod types;

mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::{NewPc, NewPrinter, Office, Pc, Printer, User};

/// Store defines the database interface.
///
/// Every method is a direct single-table read or write; office-scoped
/// operations take the [`Office`] selector that picks the parallel table
/// pair to operate on.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    fn username_exists(&self, username: &str) -> Result<bool>;
    fn list_users(&self) -> Result<Vec<User>>;
    fn update_user_password(&self, id: &str, password: &str) -> Result<()>;
    /// Deletes by id. Returns false when no such row existed; deleting a
    /// missing id is a no-op, not an error.
    fn delete_user(&self, id: &str) -> Result<bool>;
    fn has_admin_user(&self) -> Result<bool>;

    // PC operations (per office)
    fn list_pcs(&self, office: Office) -> Result<Vec<Pc>>;
    fn get_pc(&self, office: Office, id: i64) -> Result<Option<Pc>>;
    fn insert_pc(&self, office: Office, pc: &NewPc) -> Result<i64>;
    fn update_pc(&self, office: Office, id: i64, pc: &NewPc) -> Result<()>;
    fn delete_pc(&self, office: Office, id: i64) -> Result<bool>;
    /// Rewrites only the printer linkage field of a PC row.
    fn set_pc_printer_field(&self, office: Office, id: i64, printer: &str) -> Result<()>;

    // Printer operations (per office)
    fn list_printers(&self, office: Office) -> Result<Vec<Printer>>;
    fn list_printers_without_host(&self, office: Office) -> Result<Vec<Printer>>;
    fn get_printer(&self, office: Office, rowid: i64) -> Result<Option<Printer>>;
    fn insert_printer(&self, office: Office, printer: &NewPrinter) -> Result<i64>;
    fn update_printer(&self, office: Office, rowid: i64, printer: &NewPrinter) -> Result<()>;
    fn set_printer_host(&self, office: Office, rowid: i64, host: Option<i64>) -> Result<()>;

    /// Re-points the host back-references for one PC: every listed printer
    /// gets `host = pc_id`, and printers previously hosted by this PC but no
    /// longer listed have their host cleared. Runs as independent statements;
    /// concurrent edits of the same linkage can race.
    fn sync_pc_printers(&self, office: Office, pc_id: i64, printer_rowids: &[i64]) -> Result<()>;

    fn close(&self) -> Result<()>;
}

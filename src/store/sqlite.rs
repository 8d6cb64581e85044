use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::{NewPc, NewPrinter, Office, Pc, Printer, User};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        usergroup: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

// Office PC rows predate NOT NULL discipline; read every attribute as
// nullable and fall back to the empty string.
fn pc_from_row(row: &Row<'_>) -> rusqlite::Result<Pc> {
    let text = |i: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(i)?.unwrap_or_default())
    };
    Ok(Pc {
        id: row.get(0)?,
        hostname: text(1)?,
        ip: text(2)?,
        cpu_model: text(3)?,
        cpu_no: text(4)?,
        monitor_model: text(5)?,
        monitor_no: text(6)?,
        printer: text(7)?,
        user: text(8)?,
        department: text(9)?,
        notes: text(10)?,
    })
}

fn printer_from_row(row: &Row<'_>) -> rusqlite::Result<Printer> {
    let text = |i: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(i)?.unwrap_or_default())
    };
    Ok(Printer {
        rowid: row.get(0)?,
        model: text(1)?,
        serial_no: text(2)?,
        printer_type: text(3)?,
        notes: row.get(4)?,
        host: row.get(5)?,
        nickname: text(6)?,
    })
}

const USER_COLUMNS: &str = "id, username, email, password, usergroup, created_at";
const PC_COLUMNS: &str =
    "id, hostname, ip, cpu_model, cpu_no, monitor_model, monitor_no, printer, user, department, notes";
const PRINTER_COLUMNS: &str = "rowid, model, serial_no, printer_type, notes, host, nickname";

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, user: &User) -> Result<()> {
        self.conn().execute(
            "INSERT INTO users (id, username, email, password, usergroup, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id,
                user.username,
                user.email,
                user.password,
                user.usergroup,
                format_datetime(&user.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn username_exists(&self, username: &str) -> Result<bool> {
        let conn = self.conn();
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY username"))?;

        let rows = stmt.query_map([], user_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_user_password(&self, id: &str, password: &str) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET password = ?1 WHERE id = ?2",
            params![password, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_user(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn has_admin_user(&self) -> Result<bool> {
        let conn = self.conn();
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE usergroup = 'admin'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // PC operations

    fn list_pcs(&self, office: Office) -> Result<Vec<Pc>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PC_COLUMNS} FROM {} ORDER BY id",
            office.pc_table()
        ))?;

        let rows = stmt.query_map([], pc_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn get_pc(&self, office: Office, id: i64) -> Result<Option<Pc>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PC_COLUMNS} FROM {} WHERE id = ?1", office.pc_table()),
            params![id],
            pc_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn insert_pc(&self, office: Office, pc: &NewPc) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            &format!(
                "INSERT INTO {} (hostname, ip, cpu_model, cpu_no, monitor_model, monitor_no, printer, user, department, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                office.pc_table()
            ),
            params![
                pc.hostname,
                pc.ip,
                pc.cpu_model,
                pc.cpu_no,
                pc.monitor_model,
                pc.monitor_no,
                pc.printer,
                pc.user,
                pc.department,
                pc.notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_pc(&self, office: Office, id: i64, pc: &NewPc) -> Result<()> {
        let rows = self.conn().execute(
            &format!(
                "UPDATE {} SET hostname = ?1, ip = ?2, cpu_model = ?3, cpu_no = ?4,
                 monitor_model = ?5, monitor_no = ?6, printer = ?7, user = ?8,
                 department = ?9, notes = ?10 WHERE id = ?11",
                office.pc_table()
            ),
            params![
                pc.hostname,
                pc.ip,
                pc.cpu_model,
                pc.cpu_no,
                pc.monitor_model,
                pc.monitor_no,
                pc.printer,
                pc.user,
                pc.department,
                pc.notes,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_pc(&self, office: Office, id: i64) -> Result<bool> {
        let rows = self.conn().execute(
            &format!("DELETE FROM {} WHERE id = ?1", office.pc_table()),
            params![id],
        )?;
        Ok(rows > 0)
    }

    fn set_pc_printer_field(&self, office: Office, id: i64, printer: &str) -> Result<()> {
        let rows = self.conn().execute(
            &format!("UPDATE {} SET printer = ?1 WHERE id = ?2", office.pc_table()),
            params![printer, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Printer operations

    fn list_printers(&self, office: Office) -> Result<Vec<Printer>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PRINTER_COLUMNS} FROM {} ORDER BY rowid",
            office.printer_table()
        ))?;

        let rows = stmt.query_map([], printer_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_printers_without_host(&self, office: Office) -> Result<Vec<Printer>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PRINTER_COLUMNS} FROM {} WHERE host IS NULL ORDER BY rowid",
            office.printer_table()
        ))?;

        let rows = stmt.query_map([], printer_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn get_printer(&self, office: Office, rowid: i64) -> Result<Option<Printer>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {PRINTER_COLUMNS} FROM {} WHERE rowid = ?1",
                office.printer_table()
            ),
            params![rowid],
            printer_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn insert_printer(&self, office: Office, printer: &NewPrinter) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            &format!(
                "INSERT INTO {} (model, serial_no, printer_type, notes, host, nickname)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                office.printer_table()
            ),
            params![
                printer.model,
                printer.serial_no,
                printer.printer_type,
                printer.notes,
                printer.host,
                printer.nickname,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_printer(&self, office: Office, rowid: i64, printer: &NewPrinter) -> Result<()> {
        let rows = self.conn().execute(
            &format!(
                "UPDATE {} SET model = ?1, serial_no = ?2, printer_type = ?3, notes = ?4,
                 host = ?5, nickname = ?6 WHERE rowid = ?7",
                office.printer_table()
            ),
            params![
                printer.model,
                printer.serial_no,
                printer.printer_type,
                printer.notes,
                printer.host,
                printer.nickname,
                rowid,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn set_printer_host(&self, office: Office, rowid: i64, host: Option<i64>) -> Result<()> {
        let rows = self.conn().execute(
            &format!("UPDATE {} SET host = ?1 WHERE rowid = ?2", office.printer_table()),
            params![host, rowid],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn sync_pc_printers(&self, office: Office, pc_id: i64, printer_rowids: &[i64]) -> Result<()> {
        let conn = self.conn();
        let table = office.printer_table();

        // Clear every printer currently pointing at this PC, then re-point
        // the listed ones. Independent statements; a concurrent edit of the
        // same linkage can interleave between them.
        conn.execute(
            &format!("UPDATE {table} SET host = NULL WHERE host = ?1"),
            params![pc_id],
        )?;

        for rowid in printer_rowids {
            conn.execute(
                &format!("UPDATE {table} SET host = ?1 WHERE rowid = ?2"),
                params![pc_id, rowid],
            )?;
        }

        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

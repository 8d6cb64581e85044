pub const SCHEMA: &str = r#"
-- Accounts. Username uniqueness is pre-checked by the admin handlers, not
-- enforced here; usergroup is validated by the role policy, not the storage
-- layer.
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL,
    email TEXT NOT NULL DEFAULT '',
    password TEXT NOT NULL,
    usergroup TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Per-office PC tables. The printer column holds a space-separated list of
-- printer rowids from the matching printer table.
CREATE TABLE IF NOT EXISTS pc_sibu (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hostname TEXT,
    ip TEXT,
    cpu_model TEXT,
    cpu_no TEXT,
    monitor_model TEXT,
    monitor_no TEXT,
    printer TEXT,
    user TEXT,
    department TEXT,
    notes TEXT
);

CREATE TABLE IF NOT EXISTS pc_kapit (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hostname TEXT,
    ip TEXT,
    cpu_model TEXT,
    cpu_no TEXT,
    monitor_model TEXT,
    monitor_no TEXT,
    printer TEXT,
    user TEXT,
    department TEXT,
    notes TEXT
);

-- Per-office printer tables, addressed by SQLite rowid. host is the id of
-- the PC the printer is plugged into; NULL means unassigned.
CREATE TABLE IF NOT EXISTS printer_sibu (
    model TEXT,
    serial_no TEXT,
    printer_type TEXT,
    notes TEXT,
    host INTEGER,
    nickname TEXT
);

CREATE TABLE IF NOT EXISTS printer_kapit (
    model TEXT,
    serial_no TEXT,
    printer_type TEXT,
    notes TEXT,
    host INTEGER,
    nickname TEXT
);
"#;

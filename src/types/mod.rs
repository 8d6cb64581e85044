mod models;
mod office;
mod role;

pub use models::{NewPc, NewPrinter, Pc, Printer, User, parse_printer_field};
pub use office::Office;
pub use role::{Permission, Role, authorize};

//! Spreadsheet input: sheet reader and the in-memory table it produces

pub mod reader;
pub mod table;

pub use reader::read_xlsx;
pub use table::{ColumnDef, ColumnType, SourceTable, SqlValue};

//! Data model types for parsed export tables.

mod diagnostics;
mod table;

pub use diagnostics::Diagnostic;
pub use table::{RawTable, Table, LOGICAL_LINE_OFFSET};

//! ODBC-level definitions shared by the catalog layer.

pub mod constants;
pub mod convert;
pub mod types;

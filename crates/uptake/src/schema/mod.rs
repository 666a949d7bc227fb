//! Column type inference.

mod types;

pub use types::ColumnType;

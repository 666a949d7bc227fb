//! Input parsing and the in-memory table abstraction.

mod parser;
mod source;
mod value;

pub use parser::{Parser, ParserConfig};
pub use source::{DataTable, RowView, SourceMetadata};
pub use value::Value;

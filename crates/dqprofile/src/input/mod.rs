//! Input parsing and in-memory datasets.

mod parser;
mod source;
mod value;

pub use parser::{is_null_value, Parser, ParserConfig};
pub use source::{Column, Dataset, SourceMetadata};
pub use value::{StorageKind, Value};
pub(crate) use value::ValueKey;

//! Page sources, HTML table discovery, and candidate tables.

mod parser;
mod source;
mod table;

pub use parser::{Parser, ParserConfig};
pub use source::{
    ByteSource, LETTER_PLACEHOLDER, LocalFileSource, Page, PageMetadata, RemoteSource,
    SourceChain,
};
pub use table::DataTable;

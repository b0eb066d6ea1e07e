//! Reference documents that ground a translation
//!
//! [`select_context`] picks a topic document for a source file by keyword;
//! [`ReferenceExtractor`] turns that document into plain text for the prompt.

pub mod extractor;
pub mod selector;

pub use extractor::{DocumentParser, PagedTextParser, PdfParser, ReferenceError, ReferenceExtractor};
pub use selector::select_context;

mod document;
mod query_result;
mod record;

pub use document::Document;
pub use query_result::{QueryResult, ScoredSpan};
pub use record::Record;

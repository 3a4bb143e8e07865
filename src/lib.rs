// fsquery - SQL-like queries over filesystem directory listings

pub mod common;
pub mod fs;
pub mod query;

// Re-export key items for convenient access
pub use fs::access::{FileSystemAccess, OsFileSystem};
pub use fs::entry::{EntryKind, FileSystemEntry};
pub use query::executor::engine::QueryEvaluation;
pub use query::executor::result::{QueryError, QueryEvaluationResult, QueryResult};
pub use query::executor::value::Value;
pub use query::parser::parse;

// Filesystem Adapter
//
// The engine is generic over where rows come from; this module provides the
// filesystem data source: entries, the directory-listing capability and the
// attribute schema.

pub mod access;
pub mod attributes;
pub mod entry;

pub use access::{FileSystemAccess, OsFileSystem};
pub use attributes::{EntryRow, FileSystemAttributes};
pub use entry::{EntryKind, FileSystemEntry};

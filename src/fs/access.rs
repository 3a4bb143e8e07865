// Filesystem Access
//
// The capability the engine consumes to enumerate one directory. The OS
// implementation lists files before directories; traversal across
// directories is the pipeline's job, not the adapter's.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::fs::entry::{EntryKind, FileSystemEntry};
use crate::query::executor::result::QueryResult;

/// Lists the entries of a single directory.
pub trait FileSystemAccess {
    fn entries(&self, directory_path: &str) -> QueryResult<Vec<FileSystemEntry>>;
}

/// The real-filesystem adapter backed by `std::fs`. Symlinks are followed,
/// so a symlinked directory is reported as a directory; recursive traversal
/// over a symlink cycle will not terminate.
pub struct OsFileSystem;

impl FileSystemAccess for OsFileSystem {
    fn entries(&self, directory_path: &str) -> QueryResult<Vec<FileSystemEntry>> {
        let mut files = Vec::new();
        let mut directories = Vec::new();

        for dir_entry in fs::read_dir(directory_path)? {
            let dir_entry = dir_entry?;
            let path = dir_entry.path();
            let metadata = fs::metadata(&path)?;

            let kind = if metadata.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };

            let mut entry = FileSystemEntry::new(path.to_string_lossy(), kind);
            entry.size = metadata.len();
            entry.access_time = to_local_time(metadata.accessed().ok());
            entry.create_time = to_local_time(metadata.created().ok());
            entry.modify_time = to_local_time(metadata.modified().ok());

            match kind {
                EntryKind::File => files.push(entry),
                EntryKind::Directory => directories.push(entry),
            }
        }

        files.extend(directories);
        Ok(files)
    }
}

fn to_local_time(time: Option<std::time::SystemTime>) -> Option<DateTime<Local>> {
    time.map(DateTime::<Local>::from)
}

/// Join a child name onto a directory path with a forward slash, used by
/// tests and fakes; the OS adapter gets absolute paths from `read_dir`.
pub fn join_path(directory_path: &str, name: &str) -> String {
    let trimmed = directory_path.trim_end_matches(['/', '\\']);
    if Path::new(name).is_absolute() {
        name.to_string()
    } else {
        format!("{}/{}", trimmed, name)
    }
}

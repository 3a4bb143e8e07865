// Filesystem Entries
//
// The data shape the engine consumes from the adapter: a kind tag, an
// absolute path, a size and the three timestamps. Timestamps a platform
// cannot report stay empty and surface as null attribute values.

use std::fmt;

use chrono::{DateTime, Local};

/// Container/leaf kind of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "File"),
            EntryKind::Directory => write!(f, "Directory"),
        }
    }
}

/// One directory entry as reported by a [`super::access::FileSystemAccess`]
/// implementation.
#[derive(Debug, Clone)]
pub struct FileSystemEntry {
    pub kind: EntryKind,
    pub absolute_path: String,
    pub size: u64,
    pub access_time: Option<DateTime<Local>>,
    pub create_time: Option<DateTime<Local>>,
    pub modify_time: Option<DateTime<Local>>,
}

impl FileSystemEntry {
    /// Create an entry with no size or timestamps. Trailing path separators
    /// are trimmed so `file_name` works on directory paths too.
    pub fn new(path: impl Into<String>, kind: EntryKind) -> Self {
        let path = path.into();
        let absolute_path = path.trim_end_matches(['/', '\\']).to_string();
        FileSystemEntry {
            kind,
            absolute_path,
            size: 0,
            access_time: None,
            create_time: None,
            modify_time: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// The last path component.
    pub fn file_name(&self) -> &str {
        self.absolute_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.absolute_path)
    }

    /// The extension including its leading dot, or an empty string when the
    /// name has none. A name that is nothing but a leading dot counts as an
    /// extension; a trailing dot does not.
    pub fn extension(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(index) if index + 1 < name.len() => &name[index..],
            _ => "",
        }
    }
}

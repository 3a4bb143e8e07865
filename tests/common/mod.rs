use std::collections::HashMap;

use chrono::{DateTime, Local};

use fsquery::fs::access::{join_path, FileSystemAccess};
use fsquery::query::executor::result::QueryResult;
use fsquery::{EntryKind, FileSystemEntry};

/// An in-memory filesystem for tests, keyed by directory path. Entries are
/// listed in insertion order.
pub struct FakeFileSystem {
    directories: HashMap<String, Vec<FileSystemEntry>>,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        FakeFileSystem {
            directories: HashMap::new(),
        }
    }

    /// Add files of one size under a directory.
    pub fn with_files(mut self, directory: &str, size: u64, names: &[&str]) -> Self {
        let entries = self.directories.entry(directory.to_string()).or_default();
        for name in names {
            entries.push(
                FileSystemEntry::new(join_path(directory, name), EntryKind::File).with_size(size),
            );
        }
        self
    }

    /// Add one file with an explicit modify time.
    pub fn with_timed_file(
        mut self,
        directory: &str,
        name: &str,
        size: u64,
        modify_time: DateTime<Local>,
    ) -> Self {
        let mut entry =
            FileSystemEntry::new(join_path(directory, name), EntryKind::File).with_size(size);
        entry.modify_time = Some(modify_time);
        self.directories
            .entry(directory.to_string())
            .or_default()
            .push(entry);
        self
    }

    /// Add a subdirectory entry under `parent` and register it as a
    /// listable directory of its own.
    pub fn with_directory(mut self, parent: &str, name: &str) -> Self {
        let path = join_path(parent, name);
        self.directories
            .entry(parent.to_string())
            .or_default()
            .push(FileSystemEntry::new(path.clone(), EntryKind::Directory));
        self.directories.entry(path).or_default();
        self
    }
}

impl FileSystemAccess for FakeFileSystem {
    fn entries(&self, directory_path: &str) -> QueryResult<Vec<FileSystemEntry>> {
        Ok(self
            .directories
            .get(directory_path)
            .cloned()
            .unwrap_or_default())
    }
}

/// The fixture most end-to-end tests share: nine files under /home in three
/// size classes.
pub fn home_fixture() -> FakeFileSystem {
    FakeFileSystem::new()
        .with_files("/home", 1024, &["a1.txt", "a2.jpg", "a3.mov"])
        .with_files("/home", 2048, &["b1.txt", "b2.jpg", "b3.mov"])
        .with_files("/home", 4096, &["AAA", "aaa1", "ZZZ"])
}

/// Flatten one result column into display text for compact assertions.
pub fn column_text(result: &fsquery::QueryEvaluationResult, index: usize) -> Vec<String> {
    result
        .rows
        .iter()
        .map(|row| row[index].to_text())
        .collect()
}

// Filesystem Attribute Schema
//
// Maps the fixed attribute identifiers of the filesystem source onto entry
// values. The engine itself is only interested in the attribute list (for
// wildcard expansion) and the lookup function.

use crate::common::types::Identifier;
use crate::fs::entry::{EntryKind, FileSystemEntry};
use crate::query::executor::context::Row;
use crate::query::executor::result::{QueryError, QueryResult};
use crate::query::executor::value::Value;

const NAME: &str = "name";
const EXTENSION: &str = "extension";
const TYPE: &str = "type";
const SIZE: &str = "size";
const ACCESS_TIME: &str = "access_time";
const CREATE_TIME: &str = "create_time";
const MODIFY_TIME: &str = "modify_time";
const ABSOLUTE_PATH: &str = "absolute_path";

/// The attribute set every filesystem entry exposes.
pub struct FileSystemAttributes;

impl FileSystemAttributes {
    /// All attributes, in the order `*` expands to.
    pub fn attributes() -> Vec<Identifier> {
        [
            NAME,
            EXTENSION,
            TYPE,
            SIZE,
            ACCESS_TIME,
            CREATE_TIME,
            MODIFY_TIME,
            ABSOLUTE_PATH,
        ]
        .iter()
        .map(|name| Identifier::new(*name))
        .collect()
    }

    pub fn get(attribute: &Identifier, entry: &FileSystemEntry) -> QueryResult<Value> {
        match attribute.key() {
            NAME => Ok(Value::String(entry.file_name().to_string())),
            EXTENSION => Ok(extension_value(entry)),
            TYPE => Ok(Value::String(entry.kind.to_string())),
            SIZE => Ok(Value::Number(entry.size as f64)),
            ACCESS_TIME => Ok(time_value(entry.access_time)),
            CREATE_TIME => Ok(time_value(entry.create_time)),
            MODIFY_TIME => Ok(time_value(entry.modify_time)),
            ABSOLUTE_PATH => Ok(Value::String(entry.absolute_path.clone())),
            _ => Err(QueryError::UnknownAttribute(attribute.name().to_string())),
        }
    }
}

// Directories have no extension attribute at all, not an empty one.
fn extension_value(entry: &FileSystemEntry) -> Value {
    match entry.kind {
        EntryKind::File => Value::String(entry.extension().to_string()),
        EntryKind::Directory => Value::Null,
    }
}

fn time_value(time: Option<chrono::DateTime<chrono::Local>>) -> Value {
    match time {
        Some(datetime) => Value::DateTime(datetime),
        None => Value::Null,
    }
}

/// A [`Row`] backed by one filesystem entry.
pub struct EntryRow {
    entry: FileSystemEntry,
}

impl EntryRow {
    pub fn new(entry: FileSystemEntry) -> Self {
        EntryRow { entry }
    }
}

impl Row for EntryRow {
    fn get(&self, attribute: &Identifier) -> QueryResult<Value> {
        FileSystemAttributes::get(attribute, &self.entry)
    }
}

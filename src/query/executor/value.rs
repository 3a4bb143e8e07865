// Runtime Value Model
//
// This module defines the closed set of runtime values an expression can
// evaluate to, together with their display, truthiness, equality and
// ordering rules.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Local};

use crate::query::executor::result::{QueryError, QueryResult};

/// The variant of a [`Value`], used in error messages and type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Null,
    String,
    Number,
    DateTime,
    Boolean,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Null => "Null",
            ValueType::String => "String",
            ValueType::Number => "Number",
            ValueType::DateTime => "DateTime",
            ValueType::Boolean => "Boolean",
        };
        write!(f, "{}", name)
    }
}

/// A runtime value produced by evaluating an expression against a row or a
/// group context.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Value {
    Null,
    String(String),
    Number(f64),
    DateTime(DateTime<Local>),
    Boolean(bool),
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0.hash(state),
            Value::String(s) => {
                1.hash(state);
                s.hash(state);
            }
            Value::Number(n) => {
                2.hash(state);
                n.to_bits().hash(state);
            }
            Value::DateTime(dt) => {
                3.hash(state);
                dt.hash(state);
            }
            Value::Boolean(b) => {
                4.hash(state);
                b.hash(state);
            }
        }
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::String(_) => ValueType::String,
            Value::Number(_) => ValueType::Number,
            Value::DateTime(_) => ValueType::DateTime,
            Value::Boolean(_) => ValueType::Boolean,
        }
    }

    /// Lossless display form. Booleans render as `T`/`F` and nulls as
    /// `null`; date-times use `YYYY-MM-DD HH:MM:SS`.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::String(s) => s.clone(),
            Value::Number(n) => format!("{}", n),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Boolean(b) => if *b { "T" } else { "F" }.to_string(),
        }
    }

    /// Truthiness as used by WHERE: non-empty strings, non-zero numbers,
    /// any date-time and `true` pass; null never does.
    pub fn evaluates_to_true(&self) -> bool {
        match self {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => *n != 0.0,
            Value::DateTime(_) => true,
            Value::Boolean(b) => *b,
        }
    }

    /// Ordering used by ORDER BY and the relational operators.
    ///
    /// Same-variant pairs compare naturally (strings ordinally, numbers by
    /// IEEE order, date-times chronologically, false before true). A null
    /// compares greater than any non-null value so that nulls sort last in
    /// ascending order; two nulls are equal. Two non-null values of
    /// different variants cannot be ordered and produce a cast error.
    pub fn compare(&self, other: &Self) -> QueryResult<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Ok(Ordering::Equal),
            (Value::Null, _) => Ok(Ordering::Greater),
            (_, Value::Null) => Ok(Ordering::Less),
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            (Value::Number(a), Value::Number(b)) => {
                Ok(a.partial_cmp(b).unwrap_or(Ordering::Equal))
            }
            (Value::DateTime(a), Value::DateTime(b)) => Ok(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
            (a, b) => Err(QueryError::Cast(format!(
                "Cannot compare values of types <{}> and <{}>.",
                a.value_type(),
                b.value_type()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

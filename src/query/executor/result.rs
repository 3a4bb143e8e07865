// Query Errors and Result Shapes
//
// This module defines the error taxonomy shared by the evaluator, the
// contexts and the function registry, plus the tabular result returned by a
// successful evaluation.

use thiserror::Error;

use crate::query::executor::value::{Value, ValueType};

/// Errors raised while evaluating a query. All of them abort the current
/// evaluation; nothing is caught and retried inside the engine.
#[derive(Error, Debug)]
pub enum QueryError {
    /// An expression compared or combined values of incompatible variants
    /// where no null-propagation rule applies.
    #[error("Cast error: {0}")]
    Cast(String),
    /// SELECT or ORDER BY referenced an attribute under GROUP BY that is
    /// neither the grouping key nor wrapped in an aggregate function.
    #[error("'{0}' is not an aggregate attribute.")]
    AggregateAttribute(String),
    /// An aggregate function received something other than a plain
    /// attribute reference as an argument.
    #[error("Aggregate function arguments must be attribute references, received '{0}'.")]
    AggregateArgument(String),
    /// A function received the wrong number of arguments.
    #[error("Function has received a wrong number of arguments. Expected {expected}, received {actual}.")]
    ArgumentCount { expected: usize, actual: usize },
    /// A function received an argument of the wrong type.
    #[error("Function has received a wrong argument. Expected <{expected}>, received <{actual}>.")]
    ArgumentType {
        expected: ValueType,
        actual: ValueType,
    },
    /// An identifier in function-call position matches no registry entry.
    #[error("Cannot evaluate '{0}': function not found.")]
    FunctionNotFound(String),
    /// A row was asked for an attribute the data source does not expose.
    #[error("Unknown attribute: {0}.")]
    UnknownAttribute(String),
    /// The filesystem adapter failed to list a directory.
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for query evaluation operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// The tabular outcome of evaluating one query: one column name per expanded
/// SELECT attribute and one value row per surviving context, in SELECT order.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct QueryEvaluationResult {
    pub attribute_names: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

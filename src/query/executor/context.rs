// Execution Contexts
//
// Expressions resolve identifiers and function calls through a context.
// There are two peer flavors: one wrapping a single row, one wrapping a
// whole group produced by GROUP BY. Under grouping, plain attributes are
// only legal when they are the grouping key; everything else must go
// through an aggregate function.

use std::collections::HashMap;
use std::sync::Arc;

use crate::common::types::Identifier;
use crate::query::executor::functions::FunctionRegistry;
use crate::query::executor::result::{QueryError, QueryResult};
use crate::query::executor::value::Value;
use crate::query::parser::ast::Expression;

/// One entry of the data source, exposed as an attribute resolver.
pub trait Row {
    fn get(&self, attribute: &Identifier) -> QueryResult<Value>;
}

/// The resolution surface expressions evaluate against.
pub trait ExpressionContext {
    fn get(&self, identifier: &Identifier) -> QueryResult<Value>;

    fn evaluate_function(
        &self,
        name: &Identifier,
        arguments: &[Expression],
    ) -> QueryResult<Value>;

    /// A previously computed value for this exact expression, if the
    /// context keeps one. Only the aggregate context does (its group key).
    fn try_get_cached(&self, expression: &Expression) -> Option<Value>;
}

/// Context for one ungrouped row.
pub struct SingleRowContext {
    row: Box<dyn Row>,
    functions: Arc<FunctionRegistry>,
}

impl SingleRowContext {
    pub fn new(row: Box<dyn Row>, functions: Arc<FunctionRegistry>) -> Self {
        SingleRowContext { row, functions }
    }
}

impl ExpressionContext for SingleRowContext {
    fn get(&self, identifier: &Identifier) -> QueryResult<Value> {
        self.row.get(identifier)
    }

    fn evaluate_function(
        &self,
        name: &Identifier,
        arguments: &[Expression],
    ) -> QueryResult<Value> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(argument.evaluate(self)?);
        }
        match self.functions.scalar(name) {
            Some(function) => function.evaluate(&values),
            None => Err(QueryError::FunctionNotFound(name.name().to_string())),
        }
    }

    fn try_get_cached(&self, _expression: &Expression) -> Option<Value> {
        None
    }
}

/// One group produced by GROUP BY: the key expression, its evaluated value
/// and the member rows' contexts for aggregate-function access.
pub struct RowAggregate {
    rows: Vec<SingleRowContext>,
    key: Expression,
    key_value: Value,
}

impl RowAggregate {
    pub fn new(rows: Vec<SingleRowContext>, key: Expression, key_value: Value) -> Self {
        RowAggregate { rows, key, key_value }
    }

    pub fn key(&self) -> &Expression {
        &self.key
    }

    pub fn key_value(&self) -> &Value {
        &self.key_value
    }

    /// The group key's value, legal only for the key expression itself.
    pub fn aggregated(&self, attribute: &Expression) -> QueryResult<Value> {
        if *attribute != self.key {
            return Err(QueryError::AggregateAttribute(attribute.to_string()));
        }
        Ok(self.key_value.clone())
    }

    /// All per-row values of an attribute across the group, in member order.
    pub fn column(&self, attribute: &Identifier) -> QueryResult<Vec<Value>> {
        self.rows.iter().map(|row| row.get(attribute)).collect()
    }
}

/// Context for one group. Construction seeds a one-entry cache mapping the
/// key expression to its already-evaluated value, so SELECT and ORDER BY
/// can reuse the key without tripping the aggregate-attribute check.
pub struct AggregateContext {
    aggregate: RowAggregate,
    functions: Arc<FunctionRegistry>,
    cache: HashMap<Expression, Value>,
}

impl AggregateContext {
    pub fn new(aggregate: RowAggregate, functions: Arc<FunctionRegistry>) -> Self {
        let mut cache = HashMap::new();
        cache.insert(aggregate.key().clone(), aggregate.key_value().clone());
        AggregateContext { aggregate, functions, cache }
    }
}

impl ExpressionContext for AggregateContext {
    fn get(&self, identifier: &Identifier) -> QueryResult<Value> {
        self.aggregate
            .aggregated(&Expression::Identifier(identifier.clone()))
    }

    fn evaluate_function(
        &self,
        name: &Identifier,
        arguments: &[Expression],
    ) -> QueryResult<Value> {
        if let Some(function) = self.functions.aggregate(name) {
            // Aggregate arguments must be bare attribute references; this
            // is a runtime constraint, not a grammar rule.
            let mut columns = Vec::with_capacity(arguments.len());
            for argument in arguments {
                let Expression::Identifier(attribute) = argument else {
                    return Err(QueryError::AggregateArgument(argument.to_string()));
                };
                columns.push(self.aggregate.column(attribute)?);
            }
            return function.evaluate(&columns);
        }

        if let Some(function) = self.functions.scalar(name) {
            let mut values = Vec::with_capacity(arguments.len());
            for argument in arguments {
                values.push(argument.evaluate(self)?);
            }
            return function.evaluate(&values);
        }

        Err(QueryError::FunctionNotFound(name.name().to_string()))
    }

    fn try_get_cached(&self, expression: &Expression) -> Option<Value> {
        self.cache.get(expression).cloned()
    }
}

// Function Registry
//
// Scalar functions operate on already-evaluated argument values; aggregate
// functions operate on whole per-group columns. Both registries are
// immutable maps built once and shared read-only between evaluations.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::common::types::Identifier;
use crate::query::executor::result::{QueryError, QueryResult};
use crate::query::executor::value::{Value, ValueType};

/// A scalar function: fixed arity, each argument individually type-checked.
pub trait ScalarFunction: Send + Sync {
    fn evaluate(&self, arguments: &[Value]) -> QueryResult<Value>;
}

/// An aggregate function: receives one full per-group column per argument.
pub trait AggregateFunction: Send + Sync {
    fn evaluate(&self, arguments: &[Vec<Value>]) -> QueryResult<Value>;
}

/// The immutable lookup tables for scalar and aggregate functions.
pub struct FunctionRegistry {
    scalar: HashMap<Identifier, Box<dyn ScalarFunction>>,
    aggregate: HashMap<Identifier, Box<dyn AggregateFunction>>,
}

static STANDARD: Lazy<Arc<FunctionRegistry>> =
    Lazy::new(|| Arc::new(FunctionRegistry::standard()));

impl FunctionRegistry {
    /// The built-in functions of the query language.
    pub fn standard() -> Self {
        let mut scalar: HashMap<Identifier, Box<dyn ScalarFunction>> = HashMap::new();
        scalar.insert(Identifier::new("lower"), Box::new(Lower));
        scalar.insert(Identifier::new("upper"), Box::new(Upper));
        scalar.insert(Identifier::new("trim"), Box::new(Trim));
        scalar.insert(Identifier::new("length"), Box::new(Length));
        scalar.insert(Identifier::new("concat"), Box::new(Concat));
        scalar.insert(Identifier::new("human"), Box::new(Human));

        let mut aggregate: HashMap<Identifier, Box<dyn AggregateFunction>> = HashMap::new();
        aggregate.insert(Identifier::new("count"), Box::new(Count));

        FunctionRegistry { scalar, aggregate }
    }

    /// The shared standard registry. Registries are read-only, so one
    /// instance serves every evaluation.
    pub fn shared() -> Arc<FunctionRegistry> {
        Arc::clone(&STANDARD)
    }

    pub fn scalar(&self, name: &Identifier) -> Option<&dyn ScalarFunction> {
        self.scalar.get(name).map(|function| function.as_ref())
    }

    pub fn aggregate(&self, name: &Identifier) -> Option<&dyn AggregateFunction> {
        self.aggregate.get(name).map(|function| function.as_ref())
    }
}

fn assert_argument_count(expected: usize, arguments: &[Value]) -> QueryResult<()> {
    if arguments.len() != expected {
        return Err(QueryError::ArgumentCount {
            expected,
            actual: arguments.len(),
        });
    }
    Ok(())
}

/// Extract a string argument or signal an argument-type error.
fn require_string(argument: &Value) -> QueryResult<&str> {
    match argument {
        Value::String(s) => Ok(s),
        other => Err(QueryError::ArgumentType {
            expected: ValueType::String,
            actual: other.value_type(),
        }),
    }
}

/// Extract a numeric argument or signal an argument-type error.
fn require_number(argument: &Value) -> QueryResult<f64> {
    match argument {
        Value::Number(n) => Ok(*n),
        other => Err(QueryError::ArgumentType {
            expected: ValueType::Number,
            actual: other.value_type(),
        }),
    }
}

struct Lower;

impl ScalarFunction for Lower {
    fn evaluate(&self, arguments: &[Value]) -> QueryResult<Value> {
        assert_argument_count(1, arguments)?;
        let text = require_string(&arguments[0])?;
        Ok(Value::String(text.to_lowercase()))
    }
}

struct Upper;

impl ScalarFunction for Upper {
    fn evaluate(&self, arguments: &[Value]) -> QueryResult<Value> {
        assert_argument_count(1, arguments)?;
        let text = require_string(&arguments[0])?;
        Ok(Value::String(text.to_uppercase()))
    }
}

struct Trim;

impl ScalarFunction for Trim {
    fn evaluate(&self, arguments: &[Value]) -> QueryResult<Value> {
        assert_argument_count(1, arguments)?;
        let text = require_string(&arguments[0])?;
        Ok(Value::String(text.trim().to_string()))
    }
}

struct Length;

impl ScalarFunction for Length {
    fn evaluate(&self, arguments: &[Value]) -> QueryResult<Value> {
        assert_argument_count(1, arguments)?;
        let text = require_string(&arguments[0])?;
        Ok(Value::Number(text.chars().count() as f64))
    }
}

/// Variadic concatenation; every argument must be a string.
struct Concat;

impl ScalarFunction for Concat {
    fn evaluate(&self, arguments: &[Value]) -> QueryResult<Value> {
        let mut result = String::new();
        for argument in arguments {
            result.push_str(require_string(argument)?);
        }
        Ok(Value::String(result))
    }
}

/// Render a byte count in 1024-based units: `""`, `k`, `M`, `G`, `T`.
/// Values below ten in a non-byte unit keep one decimal place; anything
/// larger rounds to a whole number. Past the last unit the result is `inf`.
struct Human;

const KILO: f64 = 1024.0;
const UNITS: [&str; 5] = ["", "k", "M", "G", "T"];

impl ScalarFunction for Human {
    fn evaluate(&self, arguments: &[Value]) -> QueryResult<Value> {
        assert_argument_count(1, arguments)?;
        let mut value = require_number(&arguments[0])?;

        for unit in UNITS {
            if value < KILO {
                let text = if value >= 10.0 || unit.is_empty() {
                    format!("{:.0}{}", value, unit)
                } else {
                    format!("{:.1}{}", value, unit)
                };
                return Ok(Value::String(text));
            }
            value /= KILO;
        }
        Ok(Value::String("inf".to_string()))
    }
}

/// Count the rows of a group. Takes exactly one column and counts every
/// entry in it, nulls included.
struct Count;

impl AggregateFunction for Count {
    fn evaluate(&self, arguments: &[Vec<Value>]) -> QueryResult<Value> {
        if arguments.len() != 1 {
            return Err(QueryError::ArgumentCount {
                expected: 1,
                actual: arguments.len(),
            });
        }
        Ok(Value::Number(arguments[0].len() as f64))
    }
}

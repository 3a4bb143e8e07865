// Expression Evaluation
//
// Each AST node owns its evaluation rule. Comparisons degrade to null when
// either operand is null and only raise a cast error for mixed non-null
// variants; the logical operators implement three-valued truth tables over
// boolean-or-null operands.

use regex::Regex;

use crate::query::executor::context::ExpressionContext;
use crate::query::executor::result::{QueryError, QueryResult};
use crate::query::executor::value::Value;
use crate::query::parser::ast::{CompareOp, Expression};

impl Expression {
    /// Evaluate this expression against an execution context. Expressions
    /// are side-effect-free and safe to re-evaluate; only the aggregate
    /// context memoizes anything (its group key).
    pub fn evaluate(&self, context: &dyn ExpressionContext) -> QueryResult<Value> {
        match self {
            Expression::Constant(value) => Ok(value.clone()),
            Expression::Identifier(identifier) => context.get(identifier),
            Expression::FunctionCall { name, arguments } => {
                context.evaluate_function(name, arguments)
            }
            Expression::Comparison { op, left, right } => {
                evaluate_comparison(*op, left, right, context)
            }
            Expression::And(left, right) => {
                let left_value = boolean_operand(left.evaluate(context)?)?;
                // A false left side decides the outcome; a null one does not.
                if left_value == Some(false) {
                    return Ok(Value::Boolean(false));
                }
                let right_value = boolean_operand(right.evaluate(context)?)?;
                Ok(match (left_value, right_value) {
                    (_, Some(false)) => Value::Boolean(false),
                    (None, _) | (_, None) => Value::Null,
                    _ => Value::Boolean(true),
                })
            }
            Expression::Or(left, right) => {
                let left_value = boolean_operand(left.evaluate(context)?)?;
                if left_value == Some(true) {
                    return Ok(Value::Boolean(true));
                }
                let right_value = boolean_operand(right.evaluate(context)?)?;
                Ok(match (left_value, right_value) {
                    (_, Some(true)) => Value::Boolean(true),
                    (None, _) | (_, None) => Value::Null,
                    _ => Value::Boolean(false),
                })
            }
            Expression::Like { input, pattern, negated } => {
                let input_value = string_operand(input.evaluate(context)?, "input")?;
                let pattern_value = string_operand(pattern.evaluate(context)?, "pattern")?;
                match (input_value, pattern_value) {
                    (Some(input_text), Some(pattern_text)) => {
                        let matched = like_matches(&input_text, &pattern_text)?;
                        Ok(Value::Boolean(if *negated { !matched } else { matched }))
                    }
                    _ => Ok(Value::Null),
                }
            }
        }
    }
}

fn evaluate_comparison(
    op: CompareOp,
    left: &Expression,
    right: &Expression,
    context: &dyn ExpressionContext,
) -> QueryResult<Value> {
    use std::cmp::Ordering;

    let left_value = left.evaluate(context)?;
    let right_value = right.evaluate(context)?;

    if left_value == Value::Null || right_value == Value::Null {
        return Ok(Value::Null);
    }

    let result = match op {
        CompareOp::Equals => left_value == right_value,
        CompareOp::NotEqual => left_value != right_value,
        CompareOp::LessThan => left_value.compare(&right_value)? == Ordering::Less,
        CompareOp::GreaterThan => left_value.compare(&right_value)? == Ordering::Greater,
        CompareOp::LessOrEqual => left_value.compare(&right_value)? != Ordering::Greater,
        CompareOp::GreaterOrEqual => left_value.compare(&right_value)? != Ordering::Less,
    };
    Ok(Value::Boolean(result))
}

/// Logical operands must be boolean or null; anything else is a hard error
/// regardless of short-circuiting.
fn boolean_operand(value: Value) -> QueryResult<Option<bool>> {
    match value {
        Value::Boolean(b) => Ok(Some(b)),
        Value::Null => Ok(None),
        other => Err(QueryError::Cast(format!(
            "Logical operator expected <Boolean> or <Null>, received <{}>.",
            other.value_type()
        ))),
    }
}

fn string_operand(value: Value, role: &str) -> QueryResult<Option<String>> {
    match value {
        Value::String(s) => Ok(Some(s)),
        Value::Null => Ok(None),
        other => Err(QueryError::Cast(format!(
            "LIKE: invalid {} type: expected <String> or <Null>, received <{}>.",
            role,
            other.value_type()
        ))),
    }
}

/// Translate a SQL pattern into an anchored regular expression: every regex
/// metacharacter in the pattern text is escaped, then `%` becomes "any
/// sequence" and `_` "exactly one character". Matching is case-sensitive and
/// covers the whole input.
fn like_matches(input: &str, pattern: &str) -> QueryResult<bool> {
    let translated = regex::escape(pattern).replace('%', ".*").replace('_', ".");
    let matcher = Regex::new(&format!("^{}$", translated))
        .map_err(|error| QueryError::Cast(format!("LIKE: invalid pattern '{}': {}.", pattern, error)))?;
    Ok(matcher.is_match(input))
}

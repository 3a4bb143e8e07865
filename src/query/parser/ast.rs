// Query AST
//
// This module defines the AST produced by the parser and consumed by the
// evaluation pipeline. Expressions carry structural equality and hashing so
// a group's key expression can be used as a cache key by the aggregate
// context.

use std::fmt;

use crate::common::types::Identifier;
use crate::query::executor::value::Value;

/// A parsed query: projection list, source clause and the optional
/// filtering, grouping and ordering clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub selected_attributes: Vec<Expression>,
    pub from: FromClause,
    pub where_clause: Option<Expression>,
    pub group_by: GroupByClause,
    pub order_by: OrderByClause,
}

/// The source of rows: a directory path, listed flat or walked recursively.
#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub path: String,
    pub recursive: bool,
}

/// Grouping clause. The language supports at most one grouping key; an
/// empty attribute list means no grouping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupByClause {
    pub attributes: Vec<Expression>,
}

impl GroupByClause {
    pub fn no_grouping() -> Self {
        GroupByClause { attributes: Vec::new() }
    }

    pub fn by(key: Expression) -> Self {
        GroupByClause { attributes: vec![key] }
    }

    /// The single grouping key, if grouping was requested.
    pub fn key(&self) -> Option<&Expression> {
        self.attributes.first()
    }
}

/// Ordering clause. The language supports at most one ordering condition;
/// an empty condition list means no ordering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderByClause {
    pub conditions: Vec<OrderCondition>,
}

impl OrderByClause {
    pub fn no_ordering() -> Self {
        OrderByClause { conditions: Vec::new() }
    }

    pub fn by(expression: Expression, ascending: bool) -> Self {
        OrderByClause {
            conditions: vec![OrderCondition { expression, ascending }],
        }
    }

    /// The single ordering condition, if ordering was requested.
    pub fn condition(&self) -> Option<&OrderCondition> {
        self.conditions.first()
    }
}

/// One ordering key and its direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCondition {
    pub expression: Expression,
    pub ascending: bool,
}

/// Relational operators. Equality operators delegate to structural value
/// equality; the ordering operators delegate to value comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Equals,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CompareOp::Equals => "=",
            CompareOp::NotEqual => "!=",
            CompareOp::GreaterThan => ">",
            CompareOp::LessThan => "<",
            CompareOp::GreaterOrEqual => ">=",
            CompareOp::LessOrEqual => "<=",
        };
        write!(f, "{}", symbol)
    }
}

/// An expression tree node. Evaluation rules live in
/// `query::executor::expression`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    /// A literal value.
    Constant(Value),
    /// An attribute reference resolved through the execution context.
    Identifier(Identifier),
    /// A scalar or aggregate function call; which one is decided by the
    /// context at evaluation time.
    FunctionCall {
        name: Identifier,
        arguments: Vec<Expression>,
    },
    /// A relational comparison with three-valued null propagation.
    Comparison {
        op: CompareOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    /// SQL LIKE / NOT LIKE pattern match (`%` any run, `_` one character).
    Like {
        input: Box<Expression>,
        pattern: Box<Expression>,
        negated: bool,
    },
}

impl Expression {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(Identifier::new(name))
    }

    pub fn number(value: f64) -> Self {
        Expression::Constant(Value::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::Constant(Value::String(value.into()))
    }

    pub fn comparison(op: CompareOp, left: Expression, right: Expression) -> Self {
        Expression::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(value) => write!(f, "{}", value.to_text()),
            Expression::Identifier(identifier) => write!(f, "{}", identifier),
            Expression::FunctionCall { name, arguments } => {
                write!(f, "{}(", name)?;
                for (index, argument) in arguments.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
            Expression::Comparison { op, left, right } => {
                write!(f, "{} {} {}", left, op, right)
            }
            Expression::And(left, right) => write!(f, "{} AND {}", left, right),
            Expression::Or(left, right) => write!(f, "{} OR {}", left, right),
            Expression::Like { input, pattern, negated } => {
                let keyword = if *negated { "NOT LIKE" } else { "LIKE" };
                write!(f, "{} {} {}", input, keyword, pattern)
            }
        }
    }
}

// Query Parser
//
// Recursive-descent parser for the query language:
//
//   SELECT terms FROM path [RECURSIVE] [WHERE expr]
//     [GROUP BY term] [ORDER BY term [ASC|DESC]]
//
// Operator precedence, lowest first: OR, AND, relational/LIKE. The
// relational operators do not associate; `a < b < c` is a parse error.

use std::mem;

use thiserror::Error;

use crate::common::types::Identifier;
use crate::query::executor::value::Value;
use crate::query::parser::ast::{
    CompareOp, Expression, FromClause, GroupByClause, OrderByClause, Query,
};
use crate::query::parser::lexer::{Lexer, Token, TokenType};
use crate::query::parser::number::parse_number;

/// Query parsing errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token: {0}.")]
    UnexpectedToken(String),
    #[error("Expected {expected}, found {found}.")]
    ExpectedToken { expected: String, found: String },
    #[error("Invalid number literal: '{0}'.")]
    InvalidNumber(String),
    #[error("Unsupported number multiplier: '{0}'. Supported multipliers: k, m, g, t.")]
    UnsupportedMultiplier(char),
    #[error("Unexpected end of input.")]
    EndOfInput,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse one query.
pub fn parse(input: &str) -> ParseResult<Query> {
    Parser::new(input).parse()
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Parser {
            tokens: Lexer::new(input).tokenize(),
            position: 0,
        }
    }

    pub fn parse(&mut self) -> ParseResult<Query> {
        self.expect(TokenType::Select)?;
        let selected_attributes = self.parse_select_list()?;

        self.expect(TokenType::From)?;
        let path = self.parse_path()?;
        let recursive = self.consume_if(&TokenType::Recursive);

        let where_clause = if self.consume_if(&TokenType::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let group_by = if self.consume_if(&TokenType::Group) {
            self.expect(TokenType::By)?;
            GroupByClause::by(self.parse_expression()?)
        } else {
            GroupByClause::no_grouping()
        };

        let order_by = if self.consume_if(&TokenType::Order) {
            self.expect(TokenType::By)?;
            let expression = self.parse_expression()?;
            let ascending = if self.consume_if(&TokenType::Asc) {
                true
            } else {
                !self.consume_if(&TokenType::Desc)
            };
            OrderByClause::by(expression, ascending)
        } else {
            OrderByClause::no_ordering()
        };

        self.expect(TokenType::Eof)?;

        Ok(Query {
            selected_attributes,
            from: FromClause { path, recursive },
            where_clause,
            group_by,
            order_by,
        })
    }

    fn parse_select_list(&mut self) -> ParseResult<Vec<Expression>> {
        let mut attributes = Vec::new();
        loop {
            if self.consume_if(&TokenType::Wildcard) {
                attributes.push(Expression::Identifier(Identifier::wildcard()));
            } else {
                attributes.push(self.parse_expression()?);
            }
            if !self.consume_if(&TokenType::Comma) {
                return Ok(attributes);
            }
        }
    }

    /// FROM accepts a bare path token, a plain identifier or a quoted
    /// string.
    fn parse_path(&mut self) -> ParseResult<String> {
        match self.current().token_type.clone() {
            TokenType::Path(path) => {
                self.advance();
                Ok(path)
            }
            TokenType::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            TokenType::String(text) => {
                self.advance();
                Ok(text)
            }
            other => Err(ParseError::ExpectedToken {
                expected: "a path".to_string(),
                found: format!("{:?}", other),
            }),
        }
    }

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_and()?;
        while self.consume_if(&TokenType::Or) {
            let right = self.parse_and()?;
            left = Expression::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_relational()?;
        while self.consume_if(&TokenType::And) {
            let right = self.parse_relational()?;
            left = Expression::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> ParseResult<Expression> {
        let left = self.parse_primary()?;

        let op = match self.current().token_type {
            TokenType::Equals => Some(CompareOp::Equals),
            TokenType::NotEqual => Some(CompareOp::NotEqual),
            TokenType::LessThan => Some(CompareOp::LessThan),
            TokenType::GreaterThan => Some(CompareOp::GreaterThan),
            TokenType::LessEqual => Some(CompareOp::LessOrEqual),
            TokenType::GreaterEqual => Some(CompareOp::GreaterOrEqual),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let right = self.parse_primary()?;
            return Ok(Expression::comparison(op, left, right));
        }

        if self.consume_if(&TokenType::Like) {
            let pattern = self.parse_primary()?;
            return Ok(Expression::Like {
                input: Box::new(left),
                pattern: Box::new(pattern),
                negated: false,
            });
        }
        if self.consume_if(&TokenType::Not) {
            self.expect(TokenType::Like)?;
            let pattern = self.parse_primary()?;
            return Ok(Expression::Like {
                input: Box::new(left),
                pattern: Box::new(pattern),
                negated: true,
            });
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        match self.current().token_type.clone() {
            TokenType::LeftParen => {
                self.advance();
                let expression = self.parse_expression()?;
                self.expect(TokenType::RightParen)?;
                Ok(expression)
            }
            TokenType::Number(raw) => {
                self.advance();
                Ok(Expression::Constant(Value::Number(parse_number(&raw)?)))
            }
            TokenType::String(text) => {
                self.advance();
                Ok(Expression::Constant(Value::String(text)))
            }
            TokenType::Identifier(name) => {
                self.advance();
                if self.consume_if(&TokenType::LeftParen) {
                    let arguments = self.parse_arguments()?;
                    Ok(Expression::FunctionCall {
                        name: Identifier::new(name),
                        arguments,
                    })
                } else {
                    Ok(Expression::Identifier(Identifier::new(name)))
                }
            }
            TokenType::Eof => Err(ParseError::EndOfInput),
            other => Err(ParseError::UnexpectedToken(format!("{:?}", other))),
        }
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        let mut arguments = Vec::new();
        if self.consume_if(&TokenType::RightParen) {
            return Ok(arguments);
        }
        loop {
            arguments.push(self.parse_expression()?);
            if !self.consume_if(&TokenType::Comma) {
                self.expect(TokenType::RightParen)?;
                return Ok(arguments);
            }
        }
    }

    fn current(&self) -> &Token {
        // The token stream always ends with Eof, which is never consumed.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    /// Advance past the current token when it matches the expected variant.
    fn consume_if(&mut self, expected: &TokenType) -> bool {
        if mem::discriminant(&self.current().token_type) == mem::discriminant(expected) {
            self.advance();
            return true;
        }
        false
    }

    fn expect(&mut self, expected: TokenType) -> ParseResult<()> {
        if self.consume_if(&expected) {
            return Ok(());
        }
        let found = &self.current().token_type;
        if *found == TokenType::Eof {
            return Err(ParseError::EndOfInput);
        }
        Err(ParseError::ExpectedToken {
            expected: format!("{:?}", expected),
            found: format!("{:?}", found),
        })
    }
}

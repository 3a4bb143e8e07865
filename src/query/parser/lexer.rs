// Query Lexer
//
// Tokenizes query text. Besides the usual SQL-ish fare (keywords,
// identifiers, quoted strings, numbers, operators) the language has two
// oddities: bare path tokens (anything starting with `.`, `/`, `\` or a
// drive letter) and numbers with trailing unit multipliers (`2k`), which
// are kept as raw text for the parser to interpret.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Token types of the query language.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    // Keywords
    Select,
    From,
    Where,
    Group,
    Order,
    By,
    Asc,
    Desc,
    And,
    Or,
    Not,
    Like,
    Recursive,

    // Literals
    String(String),
    /// Raw numeric text, including any trailing unit multiplier.
    Number(String),
    /// A bare filesystem path token.
    Path(String),

    Identifier(String),
    Wildcard,

    // Operators and punctuation
    Equals,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    Comma,
    LeftParen,
    RightParen,

    Eof,
    Illegal(String),
}

/// A lexical unit together with its position in the input.
#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub position: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.token_type)
    }
}

/// Lexer for breaking a query string into tokens.
pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
            position: 0,
        }
    }

    /// Tokenize the whole input, ending with an `Eof` token.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.token_type == TokenType::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.next();
        if ch.is_some() {
            self.position += 1;
        }
        ch
    }

    fn peek_char(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.read_char();
            } else {
                break;
            }
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let position = self.position;

        let Some(ch) = self.peek_char() else {
            return Token { token_type: TokenType::Eof, position };
        };

        let token_type = match ch {
            ',' => self.single(TokenType::Comma),
            '(' => self.single(TokenType::LeftParen),
            ')' => self.single(TokenType::RightParen),
            '*' => self.single(TokenType::Wildcard),
            '=' => self.single(TokenType::Equals),
            '!' => {
                self.read_char();
                if self.peek_char() == Some('=') {
                    self.read_char();
                    TokenType::NotEqual
                } else {
                    TokenType::Illegal("!".to_string())
                }
            }
            '<' => {
                self.read_char();
                match self.peek_char() {
                    Some('=') => {
                        self.read_char();
                        TokenType::LessEqual
                    }
                    Some('>') => {
                        self.read_char();
                        TokenType::NotEqual
                    }
                    _ => TokenType::LessThan,
                }
            }
            '>' => {
                self.read_char();
                if self.peek_char() == Some('=') {
                    self.read_char();
                    TokenType::GreaterEqual
                } else {
                    TokenType::GreaterThan
                }
            }
            '\'' | '"' => self.read_string(ch),
            '.' | '/' | '\\' => self.read_path(String::new()),
            ch if ch.is_ascii_digit() => self.read_number(),
            '-' => {
                // A minus only makes sense as a numeric sign here.
                self.read_char();
                match self.peek_char() {
                    Some(next) if next.is_ascii_digit() => match self.read_number() {
                        TokenType::Number(digits) => TokenType::Number(format!("-{}", digits)),
                        other => other,
                    },
                    _ => TokenType::Illegal("-".to_string()),
                }
            }
            ch if is_identifier_start(ch) => self.read_word(),
            other => {
                self.read_char();
                TokenType::Illegal(other.to_string())
            }
        };

        Token { token_type, position }
    }

    fn single(&mut self, token_type: TokenType) -> TokenType {
        self.read_char();
        token_type
    }

    /// Read a quoted string. No escape sequences; the closing quote must
    /// match the opening one.
    fn read_string(&mut self, quote: char) -> TokenType {
        self.read_char();
        let mut text = String::new();
        loop {
            match self.read_char() {
                Some(ch) if ch == quote => return TokenType::String(text),
                Some(ch) => text.push(ch),
                None => return TokenType::Illegal(format!("{}{}", quote, text)),
            }
        }
    }

    /// Read a path token: everything up to the next whitespace.
    fn read_path(&mut self, mut path: String) -> TokenType {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                break;
            }
            path.push(ch);
            self.read_char();
        }
        TokenType::Path(path)
    }

    /// Read a number: digits, an optional fraction, and an optional
    /// trailing letter run kept for the unit-multiplier rule.
    fn read_number(&mut self) -> TokenType {
        let mut number = String::new();
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() || ch == '.' || ch.is_ascii_alphabetic() {
                number.push(ch);
                self.read_char();
            } else {
                break;
            }
        }
        TokenType::Number(number)
    }

    /// Read an identifier or keyword. A single letter directly followed by
    /// a colon is a drive-qualified path instead.
    fn read_word(&mut self) -> TokenType {
        let mut word = String::new();
        while let Some(ch) = self.peek_char() {
            if is_identifier_start(ch) || ch.is_ascii_digit() {
                word.push(ch);
                self.read_char();
            } else {
                break;
            }
        }

        if word.len() == 1 && self.peek_char() == Some(':') {
            return self.read_path(word);
        }

        keyword(&word).unwrap_or(TokenType::Identifier(word))
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn keyword(word: &str) -> Option<TokenType> {
    match word.to_lowercase().as_str() {
        "select" => Some(TokenType::Select),
        "from" => Some(TokenType::From),
        "where" => Some(TokenType::Where),
        "group" => Some(TokenType::Group),
        "order" => Some(TokenType::Order),
        "by" => Some(TokenType::By),
        "asc" => Some(TokenType::Asc),
        "desc" => Some(TokenType::Desc),
        "and" => Some(TokenType::And),
        "or" => Some(TokenType::Or),
        "not" => Some(TokenType::Not),
        "like" => Some(TokenType::Like),
        "recursive" => Some(TokenType::Recursive),
        _ => None,
    }
}

//! Recursive-descent parser for the literal-array grammar.
//!
//! ```text
//! expr  := ('-' | '+') expr | number | list | tuple | '(' expr ')' | call
//! list  := '[' [expr (',' expr)* [',']] ']'
//! tuple := '(' ')' | '(' expr ',' [expr (',' expr)* [',']] ')'
//! call  := dotted '(' expr [',' 'dtype' '=' dtype] [','] ')'
//! ```

use std::num::IntErrorKind;

use nbweights_core::errors::LiteralError;

use super::ast::{Constructor, DType, Expr, Number};
use super::lexer::{tokenize, Token, TokenKind};

const VALUE: &str = "a number, list, tuple or array";

/// Deepest expression nesting accepted. Keeps evaluation off the end of the
/// stack and the written JSON within what serde_json reads back (128).
pub const MAX_DEPTH: usize = 100;

/// Magnitude of `i64::MIN`, only representable under a unary minus.
const I64_MIN_MAGNITUDE: u128 = 1 << 63;

/// Parse one stripped source line into an expression tree.
pub fn parse_expression(text: &str) -> Result<Expr, LiteralError> {
    let mut parser = Parser {
        tokens: tokenize(text)?,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    if let Some(token) = parser.peek() {
        return Err(LiteralError::TrailingInput {
            column: token.column,
        });
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn next(&mut self, expected: &'static str) -> Result<Token, LiteralError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(LiteralError::UnexpectedEnd { expected })?;
        self.pos += 1;
        Ok(token)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind_at(0) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<(), LiteralError> {
        let token = self.next(expected)?;
        if &token.kind == kind {
            Ok(())
        } else {
            Err(unexpected(&token, expected))
        }
    }

    fn expr(&mut self) -> Result<Expr, LiteralError> {
        let token = self.next(VALUE)?;
        if self.depth == MAX_DEPTH {
            return Err(LiteralError::TooDeep {
                limit: MAX_DEPTH,
                column: token.column,
            });
        }
        self.depth += 1;
        let expr = self.operand(token);
        self.depth -= 1;
        expr
    }

    fn operand(&mut self, token: Token) -> Result<Expr, LiteralError> {
        match token.kind {
            TokenKind::Minus if self.next_is_i64_min_magnitude() => {
                self.pos += 1;
                Ok(Expr::Number(Number::Int(i64::MIN)))
            }
            TokenKind::Minus | TokenKind::Plus => {
                let op = if token.kind == TokenKind::Minus { '-' } else { '+' };
                Ok(Expr::Unary {
                    op,
                    operand: Box::new(self.expr()?),
                    column: token.column,
                })
            }
            TokenKind::Number(ref text) => parse_number(text, token.column).map(Expr::Number),
            TokenKind::LBracket => {
                self.items(&TokenKind::RBracket, "`,` or `]`").map(Expr::List)
            }
            TokenKind::LParen => self.paren_or_tuple(),
            TokenKind::Name(ref first) => self.call(first.clone(), token.column),
            _ => Err(unexpected(&token, VALUE)),
        }
    }

    /// Comma-separated expressions up to `close`, trailing comma allowed.
    fn items(&mut self, close: &TokenKind, expected: &'static str) -> Result<Vec<Expr>, LiteralError> {
        let mut items = Vec::new();
        loop {
            if self.eat(close) {
                return Ok(items);
            }
            items.push(self.expr()?);
            if self.eat(close) {
                return Ok(items);
            }
            self.expect(&TokenKind::Comma, expected)?;
        }
    }

    fn paren_or_tuple(&mut self) -> Result<Expr, LiteralError> {
        if self.eat(&TokenKind::RParen) {
            return Ok(Expr::Tuple(Vec::new()));
        }
        let first = self.expr()?;
        if self.eat(&TokenKind::RParen) {
            return Ok(first);
        }
        self.expect(&TokenKind::Comma, "`,` or `)`")?;
        let mut items = vec![first];
        items.extend(self.items(&TokenKind::RParen, "`,` or `)`")?);
        Ok(Expr::Tuple(items))
    }

    fn next_is_i64_min_magnitude(&self) -> bool {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Number(text),
                column,
            }) => {
                matches!(
                    parse_number(text, *column),
                    Err(LiteralError::NumberOutOfRange { .. })
                ) && int_magnitude(text) == Some(I64_MIN_MAGNITUDE)
            }
            _ => false,
        }
    }

    fn dotted_name(&mut self, first: String) -> Result<String, LiteralError> {
        let mut name = first;
        while self.eat(&TokenKind::Dot) {
            let token = self.next("an attribute name")?;
            match token.kind {
                TokenKind::Name(ref part) => {
                    name.push('.');
                    name.push_str(part);
                }
                _ => return Err(unexpected(&token, "an attribute name")),
            }
        }
        Ok(name)
    }

    fn call(&mut self, first: String, column: usize) -> Result<Expr, LiteralError> {
        let name = self.dotted_name(first)?;
        if !self.eat(&TokenKind::LParen) {
            return Err(LiteralError::UnknownName { name, column });
        }
        let constructor = Constructor::resolve(&name).ok_or_else(|| LiteralError::UnsupportedCall {
            callee: name.clone(),
            column,
        })?;

        let mut args = Vec::new();
        let mut dtype = None;
        loop {
            if self.eat(&TokenKind::RParen) {
                break;
            }
            let keyword = matches!(self.peek_kind_at(0), Some(TokenKind::Name(_)))
                && self.peek_kind_at(1) == Some(&TokenKind::Equals);
            if keyword {
                let token = self.next("a keyword")?;
                if token.kind != TokenKind::Name("dtype".into()) {
                    return Err(unexpected(&token, "the `dtype` keyword"));
                }
                self.pos += 1;
                dtype = Some(self.dtype()?);
            } else if dtype.is_some() {
                let token = self.next("`)`")?;
                return Err(unexpected(&token, "`)`"));
            } else {
                args.push(self.expr()?);
            }
            if self.eat(&TokenKind::RParen) {
                break;
            }
            self.expect(&TokenKind::Comma, "`,` or `)`")?;
        }

        if args.len() != 1 {
            return Err(LiteralError::BadArguments {
                callee: name,
                message: format!("expected exactly one positional argument, got {}", args.len()),
                column,
            });
        }
        if matches!(constructor, Constructor::Scalar(_)) && dtype.is_some() {
            return Err(LiteralError::BadArguments {
                callee: name,
                message: "scalar constructors take no dtype".to_string(),
                column,
            });
        }

        Ok(Expr::Call {
            name,
            constructor,
            arg: Box::new(args.remove(0)),
            dtype,
            column,
        })
    }

    fn dtype(&mut self) -> Result<DType, LiteralError> {
        let token = self.next("a dtype")?;
        let spelled = match token.kind {
            TokenKind::Str(ref s) => s.clone(),
            TokenKind::Name(ref first) => self.dotted_name(first.clone())?,
            _ => return Err(unexpected(&token, "a dtype")),
        };
        DType::parse(&spelled).ok_or(LiteralError::UnsupportedDtype { dtype: spelled })
    }
}

fn unexpected(token: &Token, expected: &'static str) -> LiteralError {
    LiteralError::UnexpectedToken {
        found: token.kind.describe(),
        expected,
        column: token.column,
    }
}

/// Integer value of a literal too large for `i64`, if it fits in `u128`.
fn int_magnitude(text: &str) -> Option<u128> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let (radix, body) = match digits.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => (16, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        _ => (10, digits.as_str()),
    };
    u128::from_str_radix(body, radix).ok()
}

/// Validate and convert Python numeric literal text.
pub fn parse_number(text: &str, column: usize) -> Result<Number, LiteralError> {
    let invalid = || LiteralError::InvalidNumber {
        text: text.to_string(),
        column,
    };
    let out_of_range = || LiteralError::NumberOutOfRange {
        text: text.to_string(),
        column,
    };

    let chars: Vec<char> = text.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            let before = i > 0 && chars[i - 1].is_ascii_alphanumeric();
            let after = chars.get(i + 1).is_some_and(char::is_ascii_alphanumeric);
            if !before || !after {
                return Err(invalid());
            }
        }
    }
    let digits: String = text.chars().filter(|&c| c != '_').collect();

    let radix = match digits.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return match i64::from_str_radix(&digits[2..], radix) {
            Ok(v) => Ok(Number::Int(v)),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(out_of_range()),
            Err(_) => Err(invalid()),
        };
    }

    if digits.chars().all(|c| c.is_ascii_digit()) {
        // Python rejects leading zeros on non-zero decimals.
        if digits.len() > 1 && digits.starts_with('0') && digits.chars().any(|c| c != '0') {
            return Err(invalid());
        }
        return match digits.parse::<i64>() {
            Ok(v) => Ok(Number::Int(v)),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(out_of_range()),
            Err(_) => Err(invalid()),
        };
    }

    let valid_float_chars = digits
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !valid_float_chars {
        return Err(invalid());
    }
    let value: f64 = digits.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(out_of_range());
    }
    Ok(Number::Float(value))
}

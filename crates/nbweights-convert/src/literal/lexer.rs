//! Tokenizer for weight literals.

use nbweights_core::errors::LiteralError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Dot,
    Equals,
    Minus,
    Plus,
    /// Raw number text; validated by the parser.
    Number(String),
    Name(String),
    Str(String),
}

impl TokenKind {
    /// Source-like rendering for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::LBracket => "[".into(),
            Self::RBracket => "]".into(),
            Self::LParen => "(".into(),
            Self::RParen => ")".into(),
            Self::Comma => ",".into(),
            Self::Dot => ".".into(),
            Self::Equals => "=".into(),
            Self::Minus => "-".into(),
            Self::Plus => "+".into(),
            Self::Number(s) | Self::Name(s) => s.clone(),
            Self::Str(s) => format!("'{s}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based character column.
    pub column: usize,
}

/// Split `text` into tokens. A `#` outside a string ends the input.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LiteralError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let column = i + 1;
        let simple = match c {
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ',' => Some(TokenKind::Comma),
            '=' => Some(TokenKind::Equals),
            '-' => Some(TokenKind::Minus),
            '+' => Some(TokenKind::Plus),
            '.' if !chars.get(i + 1).is_some_and(char::is_ascii_digit) => Some(TokenKind::Dot),
            _ => None,
        };
        if let Some(kind) = simple {
            tokens.push(Token { kind, column });
            i += 1;
            continue;
        }

        if c == '#' {
            break;
        }
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let start = i;
            i += 1;
            while i < chars.len() {
                let ch = chars[i];
                let after_exponent = matches!(ch, '+' | '-')
                    && matches!(chars[i - 1], 'e' | 'E')
                    && !is_radix_literal(&chars[start..i]);
                if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' || after_exponent {
                    i += 1;
                } else {
                    break;
                }
            }
            tokens.push(Token {
                kind: TokenKind::Number(chars[start..i].iter().collect()),
                column,
            });
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Name(chars[start..i].iter().collect()),
                column,
            });
            continue;
        }

        if c == '\'' || c == '"' {
            let start = i + 1;
            let end = chars[start..]
                .iter()
                .position(|&ch| ch == c)
                .map(|offset| start + offset)
                .ok_or(LiteralError::UnexpectedEnd {
                    expected: "closing quote",
                })?;
            tokens.push(Token {
                kind: TokenKind::Str(chars[start..end].iter().collect()),
                column,
            });
            i = end + 1;
            continue;
        }

        return Err(LiteralError::UnexpectedToken {
            found: c.to_string(),
            expected: "a literal",
            column,
        });
    }

    Ok(tokens)
}

fn is_radix_literal(text: &[char]) -> bool {
    text.len() >= 2 && text[0] == '0' && matches!(text[1], 'x' | 'X' | 'o' | 'O' | 'b' | 'B')
}

//! Tokenizer for the rule grammar.
//!
//! Keywords are not distinguished here: every bare word is a `Word` and the
//! parser matches keywords case-insensitively, so a field may share a name
//! with a keyword in identifier position.

use std::fmt;

use crate::ast::CompareOp;
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare word: keyword, identifier or the `NxM` marker.
    Word(String),
    /// `"..."` identifier, used for field names containing spaces.
    QuotedIdent(String),
    /// `'...'` literal with `''` as an escaped quote.
    Str(String),
    Op(CompareOp),
    Assign,
    LParen,
    RParen,
    LBracket,
    RBracket,
}

impl Token {
    /// Whether this is the bare word `keyword`, ignoring case.
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Self::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(w) => f.write_str(w),
            Self::QuotedIdent(s) => write!(f, "\"{s}\""),
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Op(op) => f.write_str(op.as_str()),
            Self::Assign => f.write_str("="),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::LBracket => f.write_str("["),
            Self::RBracket => f.write_str("]"),
        }
    }
}

/// A token with the byte offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '[' | ']' | '\'' | '"' | '=' | '!' | '<' | '>')
}

/// Split `input` into tokens.
///
/// # Errors
///
/// Returns `ParseError::Unterminated` for an unclosed string or quoted
/// identifier and `ParseError::UnexpectedChar` for a lone `!`.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match c {
            '(' | ')' | '[' | ']' => {
                chars.next();
                match c {
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '[' => Token::LBracket,
                    _ => Token::RBracket,
                }
            }
            '=' => {
                chars.next();
                if chars.next_if(|&(_, n)| n == '=').is_some() {
                    Token::Op(CompareOp::Eq)
                } else {
                    Token::Assign
                }
            }
            '!' => {
                chars.next();
                if chars.next_if(|&(_, n)| n == '=').is_some() {
                    Token::Op(CompareOp::Ne)
                } else {
                    return Err(ParseError::UnexpectedChar { ch: '!', position });
                }
            }
            '>' => {
                chars.next();
                Token::Op(CompareOp::Gt)
            }
            '<' => {
                chars.next();
                Token::Op(CompareOp::Lt)
            }
            '\'' => {
                chars.next();
                Token::Str(read_quoted(&mut chars, '\'', position, "string")?)
            }
            '"' => {
                chars.next();
                Token::QuotedIdent(read_quoted(&mut chars, '"', position, "quoted identifier")?)
            }
            _ => {
                let mut word = String::new();
                while let Some((_, n)) = chars.next_if(|&(_, n)| is_word_char(n)) {
                    word.push(n);
                }
                Token::Word(word)
            }
        };

        tokens.push(Spanned { token, position });
    }

    Ok(tokens)
}

/// Read up to the closing `quote`; a doubled quote stands for one literal quote.
fn read_quoted(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    quote: char,
    start: usize,
    what: &'static str,
) -> Result<String, ParseError> {
    let mut value = String::new();
    loop {
        match chars.next() {
            Some((_, c)) if c == quote => {
                if chars.next_if(|&(_, n)| n == quote).is_some() {
                    value.push(quote);
                } else {
                    return Ok(value);
                }
            }
            Some((_, c)) => value.push(c),
            None => {
                return Err(ParseError::Unterminated {
                    what,
                    position: start,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn simple_rule() {
        assert_eq!(
            kinds("IF (Site == '1000') THEN MODIFY Plant = '1000'"),
            vec![
                Token::Word("IF".into()),
                Token::LParen,
                Token::Word("Site".into()),
                Token::Op(CompareOp::Eq),
                Token::Str("1000".into()),
                Token::RParen,
                Token::Word("THEN".into()),
                Token::Word("MODIFY".into()),
                Token::Word("Plant".into()),
                Token::Assign,
                Token::Str("1000".into()),
            ]
        );
    }

    #[test]
    fn operators_without_spaces() {
        assert_eq!(
            kinds("a!='1'"),
            vec![
                Token::Word("a".into()),
                Token::Op(CompareOp::Ne),
                Token::Str("1".into()),
            ]
        );
        assert_eq!(
            kinds("w>'5'"),
            vec![
                Token::Word("w".into()),
                Token::Op(CompareOp::Gt),
                Token::Str("5".into()),
            ]
        );
    }

    #[test]
    fn escaped_quote_and_quoted_ident() {
        assert_eq!(
            kinds(r#""Old Mat No" == 'O''Brien'"#),
            vec![
                Token::QuotedIdent("Old Mat No".into()),
                Token::Op(CompareOp::Eq),
                Token::Str("O'Brien".into()),
            ]
        );
    }

    #[test]
    fn empty_string_literal() {
        assert_eq!(kinds("''"), vec![Token::Str(String::new())]);
    }

    #[test]
    fn positions_are_byte_offsets() {
        let tokens = tokenize("IF  (x").unwrap();
        assert_eq!(tokens[1].position, 4);
        assert_eq!(tokens[2].position, 5);
    }

    #[test]
    fn unterminated_string() {
        assert_eq!(
            tokenize("IF (a == 'oops").unwrap_err(),
            ParseError::Unterminated {
                what: "string",
                position: 9
            }
        );
    }

    #[test]
    fn lone_bang() {
        assert!(matches!(
            tokenize("a ! b"),
            Err(ParseError::UnexpectedChar { ch: '!', position: 2 })
        ));
    }
}

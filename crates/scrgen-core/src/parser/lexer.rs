//! Tokenization of the Service-Component header value using `nom`.
//!
//! Produces a stream of [`Token`]s for the clause parser to consume.
//! Whitespace between tokens is discarded; quoted values may contain the
//! clause and attribute delimiters.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    combinator::value,
};
use scrgen_common::error::{Result, ScrError};

/// A token in the header grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An unquoted run of text: clause name, attribute key, or value.
    Text(String),
    /// A double-quoted value with escapes resolved.
    QuotedText(String),
    /// `;` attribute separator.
    Semicolon,
    /// `,` clause separator.
    Comma,
    /// `=` attribute assignment.
    Equals,
    /// `:=` directive assignment.
    DirectiveEquals,
}

/// Characters that terminate an unquoted text run.
const fn is_text_char(c: char) -> bool {
    !matches!(c, ';' | ',' | '=' | ':' | '"') && !c.is_whitespace()
}

/// Parses a double-quoted value with `\"` and `\\` escape support.
fn quoted_text(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('"')(input)?;
    let mut result = String::new();
    let mut chars = input.char_indices();
    loop {
        match chars.next() {
            Some((idx, '"')) => {
                let remaining = &input[idx + 1..];
                return Ok((remaining, Token::QuotedText(result)));
            }
            Some((_, '\\')) => match chars.next() {
                Some((_, '"')) => result.push('"'),
                Some((_, '\\')) => result.push('\\'),
                Some((_, c)) => {
                    result.push('\\');
                    result.push(c);
                }
                None => {
                    return Err(nom::Err::Failure(nom::error::Error::new(
                        input,
                        nom::error::ErrorKind::Char,
                    )));
                }
            },
            Some((_, c)) => result.push(c),
            None => {
                return Err(nom::Err::Failure(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Char,
                )));
            }
        }
    }
}

/// Parses an unquoted text run.
fn text(input: &str) -> IResult<&str, Token> {
    let (input, run) = take_while1(is_text_char)(input)?;
    Ok((input, Token::Text(run.to_owned())))
}

/// Parses a delimiter token. `:=` must be tried before a lone `:` can be
/// rejected as unexpected.
fn symbol(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::DirectiveEquals, tag(":=")),
        value(Token::Semicolon, char(';')),
        value(Token::Comma, char(',')),
        value(Token::Equals, char('=')),
    ))
    .parse(input)
}

fn single_token(input: &str) -> IResult<&str, Token> {
    alt((quoted_text, symbol, text)).parse(input)
}

/// Tokenizes a Service-Component header value.
///
/// # Errors
///
/// Returns [`ScrError::Parse`] on an unterminated quote or a character that
/// cannot begin a token (for example a stray `:` that is not part of `:=`).
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) =
            multispace0::<&str, nom::error::Error<&str>>(remaining).map_err(|e| {
                ScrError::Parse {
                    message: format!("lexer error skipping whitespace: {e}"),
                }
            })?;
        remaining = rest;

        if remaining.is_empty() {
            break;
        }

        let (rest, token) = single_token(remaining).map_err(|e| ScrError::Parse {
            message: format!(
                "unexpected input at: \"{}\" ({e})",
                remaining.chars().take(20).collect::<String>()
            ),
        })?;
        tokens.push(token);
        remaining = rest;
    }

    Ok(tokens)
}

//! Service-Component header parser.
//!
//! Transforms the raw header value into an ordered list of
//! [`ComponentClause`]s through lexing and recursive-descent clause parsing.
//! Syntax errors are fatal to the whole header; there is no partial
//! recovery at this stage.

pub mod ast;
pub mod lexer;

use scrgen_common::error::{Result, ScrError};

use self::ast::{AttrMap, ComponentClause};
use self::lexer::Token;

/// Cursor into a token stream for recursive-descent parsing.
struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Consumes a text or quoted-text token and returns its content.
    fn expect_text(&mut self) -> Result<String> {
        match self.advance() {
            Some(Token::Text(s) | Token::QuotedText(s)) => Ok(s.clone()),
            other => Err(parse_err(format!("expected a name or value, got {other:?}"))),
        }
    }

    /// Consumes a value if one follows; an immediately following delimiter
    /// yields the empty value.
    fn optional_value(&mut self) -> String {
        match self.peek() {
            Some(Token::Text(s) | Token::QuotedText(s)) => {
                let value = s.clone();
                self.pos += 1;
                value
            }
            _ => String::new(),
        }
    }

    const fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

const fn parse_err(message: String) -> ScrError {
    ScrError::Parse { message }
}

/// Parses a Service-Component header value into ordered component clauses.
///
/// Duplicate clause keys are disambiguated with a trailing `~` so that
/// output-resource names stay unique. An empty or whitespace-only header
/// parses to an empty clause list.
///
/// # Errors
///
/// Returns [`ScrError::Parse`] on unterminated quotes or malformed clause
/// syntax.
pub fn parse_header(header: &str) -> Result<Vec<ComponentClause>> {
    tracing::debug!("parsing Service-Component header");
    let tokens = lexer::tokenize(header)?;
    let mut cursor = TokenCursor::new(&tokens);
    let mut clauses: Vec<ComponentClause> = Vec::new();

    while !cursor.at_end() {
        let clause = parse_clause(&mut cursor)?;
        let mut key = clause.key;
        while clauses.iter().any(|c| c.key == key) {
            key.push('~');
        }
        clauses.push(ComponentClause {
            key,
            attrs: clause.attrs,
        });

        match cursor.advance().cloned() {
            Some(Token::Comma) => {
                if cursor.at_end() {
                    return Err(parse_err("trailing ',' at end of header".into()));
                }
            }
            None => break,
            other => {
                return Err(parse_err(format!(
                    "expected ',' between clauses, got {other:?}"
                )));
            }
        }
    }

    Ok(clauses)
}

fn parse_clause(cursor: &mut TokenCursor<'_>) -> Result<ComponentClause> {
    let key = cursor.expect_text()?;
    let mut attrs = AttrMap::new();

    while cursor.peek() == Some(&Token::Semicolon) {
        let _ = cursor.advance();
        parse_attr(cursor, &mut attrs)?;
    }

    Ok(ComponentClause { key, attrs })
}

fn parse_attr(cursor: &mut TokenCursor<'_>, attrs: &mut AttrMap) -> Result<()> {
    let key = cursor.expect_text()?;
    match cursor.peek() {
        Some(Token::Equals) => {
            let _ = cursor.advance();
            attrs.insert(key, cursor.optional_value());
        }
        Some(Token::DirectiveEquals) => {
            let _ = cursor.advance();
            attrs.insert(format!("{key}:"), cursor.optional_value());
        }
        // Bare key: boolean-style directive.
        Some(Token::Semicolon | Token::Comma) | None => {
            attrs.insert(format!("{key}:"), "true");
        }
        other => {
            return Err(parse_err(format!(
                "expected '=', ':=', ';' or ',' after \"{key}\", got {other:?}"
            )));
        }
    }
    Ok(())
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| matches!(c, ';' | ',' | '=' | ':' | '"') || c.is_whitespace())
}

fn append_value(out: &mut String, value: &str) {
    if needs_quoting(value) {
        out.push('"');
        for c in value.chars() {
            if matches!(c, '"' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
    } else {
        out.push_str(value);
    }
}

/// Renders clauses back into header syntax.
///
/// Directive keys (trailing `:`) print as `key:=value`, plain attributes as
/// `key=value`; values containing delimiters are quoted. Attribute order is
/// preserved.
#[must_use]
pub fn print_clauses(clauses: &[ComponentClause]) -> String {
    let mut out = String::new();
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        append_value(&mut out, &clause.key);
        for (key, value) in clause.attrs.iter() {
            out.push(';');
            if let Some(directive) = key.strip_suffix(':') {
                out.push_str(directive);
                out.push_str(":=");
            } else {
                out.push_str(key);
                out.push('=');
            }
            append_value(&mut out, value);
        }
    }
    out
}

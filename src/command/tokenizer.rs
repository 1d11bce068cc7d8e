//! Split a raw input line into tokens
//!
//! Whitespace separates tokens outside quotes. A single- or double-quoted
//! span keeps its whitespace and loses its quotes; adjacent quoted and bare
//! segments join into one token. Inside a quoted span a backslash only stops
//! the next character from closing the span; both characters are kept as-is.

use crate::core::error::{Result, TerminalError};
use nom::{
    branch::alt,
    bytes::complete::{escaped, is_not, take_while1},
    character::complete::{anychar, char, multispace0, multispace1},
    combinator::{map, opt},
    multi::{many1, separated_list0},
    sequence::delimited,
    IResult, Parser,
};

fn bare(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != '"' && c != '\'').parse(input)
}

fn double_quoted(input: &str) -> IResult<&str, &str> {
    map(
        delimited(
            char('"'),
            opt(escaped(is_not("\\\""), '\\', anychar)),
            char('"'),
        ),
        |body: Option<&str>| body.unwrap_or(""),
    )
    .parse(input)
}

fn single_quoted(input: &str) -> IResult<&str, &str> {
    map(
        delimited(
            char('\''),
            opt(escaped(is_not("\\'"), '\\', anychar)),
            char('\''),
        ),
        |body: Option<&str>| body.unwrap_or(""),
    )
    .parse(input)
}

fn token(input: &str) -> IResult<&str, String> {
    map(
        many1(alt((double_quoted, single_quoted, bare))),
        |segments: Vec<&str>| segments.concat(),
    )
    .parse(input)
}

fn token_list(input: &str) -> IResult<&str, Vec<String>> {
    delimited(multispace0, separated_list0(multispace1, token), multispace0).parse(input)
}

/// Tokenize a raw input line
///
/// Returns an empty vector for empty or all-whitespace input. Fails with
/// `TerminalError::Syntax` when a quote is never closed.
pub fn tokenize(raw: &str) -> Result<Vec<String>> {
    let (rest, tokens) = token_list(raw).map_err(|e| TerminalError::Syntax {
        message: format!("could not tokenize input: {}", e),
        offset: 0,
    })?;

    if let Some(quote) = rest.chars().next() {
        // Every other character is consumed by `bare`, so leftovers always
        // start at a quote that was never closed
        return Err(TerminalError::Syntax {
            message: format!("unterminated {} quote", quote_name(quote)),
            offset: raw.len() - rest.len(),
        });
    }

    Ok(tokens)
}

fn quote_name(quote: char) -> &'static str {
    match quote {
        '\'' => "single",
        '"' => "double",
        _ => "unknown",
    }
}

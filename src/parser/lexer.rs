// Lexical helpers shared by the command parsers

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag},
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::{map, opt, recognize, value, verify},
    multi::many0_count,
    sequence::{delimited, pair},
    IResult,
};

/// Wrap a parser so it ignores surrounding whitespace.
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0_count(alt((alphanumeric1, tag("_")))),
        )),
        |s: &str| s.to_string(),
    )(input)
}

/// Double-quoted string with `\"` and `\\` escapes.
pub fn string_literal(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(
                is_not("\\\""),
                '\\',
                alt((value("\\", tag("\\")), value("\"", tag("\"")))),
            )),
            Option::unwrap_or_default,
        ),
        char('"'),
    )(input)
}

/// Unquoted text up to the next `|`, trimmed. Never empty.
pub fn bare_text(input: &str) -> IResult<&str, String> {
    map(
        verify(is_not("|"), |s: &str| !s.trim().is_empty()),
        |s: &str| s.trim().to_string(),
    )(input)
}

/// Quoted or bare argument.
pub fn argument(input: &str) -> IResult<&str, String> {
    alt((string_literal, bare_text))(input)
}

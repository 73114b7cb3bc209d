// Command parser for dashboard sessions

use super::ast::Command;
use super::lexer::{argument, identifier, ws};
use crate::options::Category;
use anyhow::{anyhow, Result};
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::char,
    combinator::{eof, map, map_res, value},
    multi::separated_list1,
    sequence::preceded,
    IResult,
};

/// Parse a category command
/// Format: category Boxplot
pub fn parse_category(input: &str) -> IResult<&str, Command> {
    map(
        preceded(
            ws(tag_no_case("category")),
            map_res(ws(identifier), |name| name.parse::<Category>()),
        ),
        Command::Category,
    )(input)
}

/// Parse a chart command
/// Format: chart "Health vs. age" or chart Health vs. age
pub fn parse_chart(input: &str) -> IResult<&str, Command> {
    map(preceded(ws(tag_no_case("chart")), ws(argument)), Command::Chart)(input)
}

/// Parse a save command
/// Format: save "out.png"
pub fn parse_save(input: &str) -> IResult<&str, Command> {
    map(preceded(ws(tag_no_case("save")), ws(argument)), Command::Save)(input)
}

fn parse_keyword(input: &str) -> IResult<&str, Command> {
    alt((
        value(Command::Options, ws(tag_no_case("options"))),
        value(Command::Show, ws(tag_no_case("show"))),
        value(Command::Help, ws(tag_no_case("help"))),
        value(Command::Quit, ws(alt((tag_no_case("quit"), tag_no_case("exit"))))),
    ))(input)
}

/// Parse any command
pub fn parse_command(input: &str) -> IResult<&str, Command> {
    alt((parse_category, parse_chart, parse_save, parse_keyword))(input)
}

/// Parse a full line: command | command | ...
pub fn parse_line(input: &str) -> IResult<&str, Vec<Command>> {
    let (input, commands) = separated_list1(ws(char('|')), parse_command)(input)?;
    let (input, _) = ws(eof)(input)?;
    Ok((input, commands))
}

/// [`parse_line`] with the error flattened for display.
pub fn parse_session_line(line: &str) -> Result<Vec<Command>> {
    parse_line(line)
        .map(|(_, commands)| commands)
        .map_err(|e| anyhow!("Parse error: {:?}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        let (_, cmd) = parse_category("category boxplot").unwrap();
        assert_eq!(cmd, Command::Category(Category::Boxplot));
        assert!(parse_category("category scatter").is_err());
    }

    #[test]
    fn test_parse_chart_quoted_and_bare() {
        let (_, quoted) = parse_chart(r#"chart "Skin colour + employ""#).unwrap();
        assert_eq!(quoted, Command::Chart("Skin colour + employ".to_string()));

        let (rest, bare) = parse_chart("chart Health vs. age | show").unwrap();
        assert_eq!(bare, Command::Chart("Health vs. age".to_string()));
        assert_eq!(rest, "| show");
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_command("  SHOW ").unwrap().1, Command::Show);
        assert_eq!(parse_command("exit").unwrap().1, Command::Quit);
        assert_eq!(parse_command("options").unwrap().1, Command::Options);
    }

    #[test]
    fn test_parse_pipeline() {
        let commands =
            parse_session_line(r#"category Boxplot | chart "Work status vs. age" | save "out.png""#)
                .unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Category(Category::Boxplot),
                Command::Chart("Work status vs. age".to_string()),
                Command::Save("out.png".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_error() {
        let err = parse_session_line("plot everything").unwrap_err();
        assert!(err.to_string().starts_with("Parse error"));
        assert!(parse_session_line("show | ").is_err());
    }
}

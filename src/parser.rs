//! This module provides the tokenizer and validator for rule files, utilizing the `pest` crate.
//! Each line of a rule file is tokenized with the grammar in `grammar.pest` and validated into
//! a [`Transition`]; [`parse`] folds a whole file into a [`TransitionTable`].

use crate::{
    table::{TableBuilder, TransitionTable},
    types::{
        Direction, NextState, StateMatch, SymbolMatch, Transition, TuringMachineError, Write,
        WILDCARD,
    },
};
use pest::Parser as PestParser;
use pest_derive::Parser as PestParser;

/// Number of fields in a rule line.
pub const FIELD_COUNT: usize = 5;

/// Derives a `PestParser` for the rule-line grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct RuleLineParser;

/// Parses a whole rule file into a frozen [`TransitionTable`].
///
/// Lines are numbered from 1. Parsing stops at the first malformed or duplicate rule.
///
/// # Returns
///
/// * `Ok(TransitionTable)` if every line is blank, a comment or a valid rule.
/// * `Err(TuringMachineError::Syntax)` if a line is malformed.
/// * `Err(TuringMachineError::DuplicateTransition)` if two rules share a key.
pub fn parse(input: &str) -> Result<TransitionTable, TuringMachineError> {
    parse_lines(input.lines())
}

/// Parses a sequence of raw lines into a frozen [`TransitionTable`].
pub fn parse_lines<I, S>(lines: I) -> Result<TransitionTable, TuringMachineError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = TableBuilder::new();

    for (index, line) in lines.into_iter().enumerate() {
        if let Some(transition) = parse_line(index + 1, line.as_ref())? {
            builder.insert(transition)?;
        }
    }

    Ok(builder.build())
}

/// Splits a raw line into its fields, dropping the comment and surrounding whitespace.
///
/// A blank or comment-only line yields no tokens.
pub fn tokenize(line: &str) -> Result<Vec<&str>, Box<pest::error::Error<Rule>>> {
    let root = RuleLineParser::parse(Rule::line, line)?;

    Ok(root
        .flatten()
        .filter(|pair| pair.as_rule() == Rule::token)
        .map(|pair| pair.as_str())
        .collect())
}

/// Validates a single raw line.
///
/// # Returns
///
/// * `Ok(None)` for blank and comment-only lines.
/// * `Ok(Some(Transition))` for a well-formed rule.
/// * `Err(TuringMachineError::Syntax)` otherwise.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Transition>, TuringMachineError> {
    let tokens = tokenize(line).map_err(|e| syntax_error(line_no, e.variant.message()))?;

    if tokens.is_empty() {
        return Ok(None);
    }

    let [state, read, write, direction, next] = tokens.as_slice() else {
        return Err(syntax_error(
            line_no,
            format!(
                "expected {FIELD_COUNT} fields, found {} in \"{}\"",
                tokens.len(),
                line.trim()
            ),
        ));
    };

    Ok(Some(Transition {
        state: parse_state(state),
        read: match parse_symbol_or_wildcard(line_no, read)? {
            Some(c) => SymbolMatch::Symbol(c),
            None => SymbolMatch::Any,
        },
        write: match parse_symbol_or_wildcard(line_no, write)? {
            Some(c) => Write::Symbol(c),
            None => Write::Keep,
        },
        direction: parse_direction(line_no, direction)?,
        next_state: match parse_state(next) {
            StateMatch::State(s) => NextState::State(s),
            StateMatch::Any => NextState::Same,
        },
        line: line_no,
    }))
}

/// Parses a state field; `*` is the wildcard.
fn parse_state(token: &str) -> StateMatch {
    if is_wildcard(token) {
        StateMatch::Any
    } else {
        StateMatch::State(token.to_string())
    }
}

/// Parses a symbol field. Returns `None` for the wildcard.
fn parse_symbol_or_wildcard(line_no: usize, token: &str) -> Result<Option<char>, TuringMachineError> {
    let mut chars = token.chars();

    match (chars.next(), chars.next()) {
        (Some(WILDCARD), None) => Ok(None),
        (Some(c), None) => Ok(Some(c)),
        _ => Err(syntax_error(
            line_no,
            format!("symbol \"{token}\" must be a single character"),
        )),
    }
}

/// Parses a direction field: `l`, `r` or `*`.
fn parse_direction(line_no: usize, token: &str) -> Result<Direction, TuringMachineError> {
    Direction::from_token(token).ok_or_else(|| {
        syntax_error(
            line_no,
            format!("unsupported direction \"{token}\" (expected l, r or *)"),
        )
    })
}

fn is_wildcard(token: &str) -> bool {
    token.len() == 1 && token.starts_with(WILDCARD)
}

fn syntax_error(line: usize, message: impl Into<String>) -> TuringMachineError {
    TuringMachineError::Syntax {
        line,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_plain_rule() {
        assert_eq!(tokenize("0 1 1 r 0").unwrap(), vec!["0", "1", "1", "r", "0"]);
    }

    #[test]
    fn test_tokenize_strips_comment_before_splitting() {
        assert_eq!(
            tokenize("0 1 1 r 0;no space before comment").unwrap(),
            vec!["0", "1", "1", "r", "0"]
        );
        assert_eq!(
            tokenize("  0 1 1 r 0   ; trailing").unwrap(),
            vec!["0", "1", "1", "r", "0"]
        );
        assert_eq!(tokenize("0 a;b c").unwrap(), vec!["0", "a"]);
    }

    #[test]
    fn test_tokenize_blank_and_comment_lines() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \t ").unwrap().is_empty());
        assert!(tokenize("; just a comment").unwrap().is_empty());
        assert!(tokenize("   ;indented comment").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_handles_crlf() {
        assert_eq!(tokenize("0 1 1 r 0\r").unwrap(), vec!["0", "1", "1", "r", "0"]);
    }

    #[test]
    fn test_parse_line_skips_comments() {
        assert_eq!(parse_line(1, "; comment").unwrap(), None);
        assert_eq!(parse_line(2, "").unwrap(), None);
    }

    #[test]
    fn test_parse_line_exact_rule() {
        let transition = parse_line(3, "q1 a b l q2").unwrap().unwrap();

        assert_eq!(transition.state, StateMatch::State("q1".into()));
        assert_eq!(transition.read, SymbolMatch::Symbol('a'));
        assert_eq!(transition.write, Write::Symbol('b'));
        assert_eq!(transition.direction, Direction::Left);
        assert_eq!(transition.next_state, NextState::State("q2".into()));
        assert_eq!(transition.line, 3);
    }

    #[test]
    fn test_parse_line_wildcards() {
        let transition = parse_line(1, "0 * * * *").unwrap().unwrap();

        assert_eq!(transition.read, SymbolMatch::Any);
        assert_eq!(transition.write, Write::Keep);
        assert_eq!(transition.direction, Direction::Stay);
        assert_eq!(transition.next_state, NextState::Same);

        let transition = parse_line(1, "* _ 1 r halt").unwrap().unwrap();
        assert_eq!(transition.state, StateMatch::Any);
        assert_eq!(transition.read, SymbolMatch::Symbol('_'));
    }

    #[test]
    fn test_parse_line_wrong_field_count() {
        for line in ["0 1 1 r", "0 1 1 r 0 extra", "0"] {
            let error = parse_line(7, line).unwrap_err();
            assert!(matches!(error, TuringMachineError::Syntax { line: 7, .. }));
            assert!(error.to_string().contains("expected 5 fields"));
        }
    }

    #[test]
    fn test_parse_line_multi_character_symbol() {
        let error = parse_line(1, "0 ab 1 r 0").unwrap_err();
        assert!(matches!(error, TuringMachineError::Syntax { .. }));
        assert!(error.to_string().contains("\"ab\""));
    }

    #[test]
    fn test_parse_line_unsupported_direction() {
        let error = parse_line(4, "0 1 1 R 0").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Syntax error on line 4: unsupported direction \"R\" (expected l, r or *)"
        );
    }

    #[test]
    fn test_parse_multi_character_states() {
        let transition = parse_line(1, "state10 x y r halt-accept").unwrap().unwrap();
        assert_eq!(transition.state, StateMatch::State("state10".into()));
        assert_eq!(
            transition.next_state,
            NextState::State("halt-accept".into())
        );
    }

    #[test]
    fn test_parse_table() {
        let table = parse("; increment\n0 0 1 * halt\n\n0 1 0 l 0\n").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_parse_reports_failing_line_number() {
        let error = parse("0 0 1 * halt\n; ok\n0 1 0 l\n").unwrap_err();
        assert!(matches!(error, TuringMachineError::Syntax { line: 3, .. }));
    }
}

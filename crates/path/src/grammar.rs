//! A `nom` grammar for splitting raw path text into segments.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::is_not,
    character::complete::char,
    combinator::{opt, recognize},
    multi::many0,
    sequence::{delimited, pair},
};

// --- Combinators ---

/// `[...]`, with nested brackets balanced so `[a[0].b]` stays one indexer.
fn indexer(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('['),
        many0(alt((is_not("[]"), indexer))),
        char(']'),
    ))
    .parse(input)
}

fn name(input: &str) -> IResult<&str, &str> {
    is_not(".[").parse(input)
}

/// One dot-separated piece: an optional name followed by its indexers.
fn piece(input: &str) -> IResult<&str, (Option<&str>, Vec<&str>)> {
    pair(opt(name), many0(indexer)).parse(input)
}

// --- Public entry point ---

/// Splits `raw` into member and indexer segments. Never fails: text the
/// grammar cannot make progress on becomes one trailing segment.
pub(crate) fn split_segments(raw: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut input = raw;
    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix('.') {
            input = rest;
            continue;
        }
        match piece(input) {
            Ok((rest, (name, indexers))) if rest.len() < input.len() => {
                segments.extend(name.map(str::to_string));
                segments.extend(indexers.into_iter().map(str::to_string));
                input = rest;
            }
            _ => {
                log::trace!("Unbalanced member path text '{}' kept as one segment", input);
                segments.push(input.to_string());
                break;
            }
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_members_and_indexers() {
        assert_eq!(split_segments("Items[0].Name"), vec!["Items", "[0]", "Name"]);
        assert_eq!(split_segments("[0][1].X"), vec!["[0]", "[1]", "X"]);
        assert_eq!(split_segments("a..b."), vec!["a", "b"]);
    }

    #[test]
    fn test_nested_brackets_keep_dots() {
        assert_eq!(split_segments("Map[a.b].X"), vec!["Map", "[a.b]", "X"]);
        assert_eq!(split_segments("M[a[0].b]"), vec!["M", "[a[0].b]"]);
        assert_eq!(split_segments("Map[\"k.1\"]"), vec!["Map", "[\"k.1\"]"]);
    }

    #[test]
    fn test_unbalanced_indexer_is_lenient() {
        assert_eq!(split_segments("Items[0"), vec!["Items", "[0"]);
    }
}

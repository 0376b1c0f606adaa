//! A borrowed, typed view over one raw segment.

/// One hop of a [`crate::MemberPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Member(&'a str),
    /// Trimmed indexer arguments, quotes kept: `["k", 0]` -> `["\"k\"", "0"]`.
    Indexer(Vec<&'a str>),
}

impl<'a> PathSegment<'a> {
    pub fn from_raw(raw: &'a str) -> Self {
        match indexer_arguments(raw) {
            Some(args) => PathSegment::Indexer(args),
            None => PathSegment::Member(raw),
        }
    }

    pub fn is_indexer(&self) -> bool {
        matches!(self, PathSegment::Indexer(_))
    }

    pub fn as_member(&self) -> Option<&'a str> {
        match self {
            PathSegment::Member(name) => Some(name),
            PathSegment::Indexer(_) => None,
        }
    }
}

pub fn is_indexer(segment: &str) -> bool {
    segment.len() >= 2 && segment.starts_with('[') && segment.ends_with(']')
}

/// Splits the arguments of an indexer segment on top-level commas. Commas
/// inside quotes or nested brackets do not split.
pub fn indexer_arguments(segment: &str) -> Option<Vec<&str>> {
    if !is_indexer(segment) {
        return None;
    }
    let inner = &segment[1..segment.len() - 1];
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(inner[start..].trim());
    Some(args)
}

use crate::grammar::split_segments;
use crate::segment::PathSegment;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

static EMPTY: Lazy<Arc<MemberPath>> = Lazy::new(|| {
    Arc::new(MemberPath {
        raw: String::new(),
        segments: Vec::new(),
    })
});

/// Path shape, which selects the observer variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    Empty,
    Single,
    Multi,
}

/// Raw path text plus its hops. Indexer hops keep their brackets (`[0]`).
///
/// Equal raw text always yields equal segments, so paths are cached by text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberPath {
    raw: String,
    segments: Vec<String>,
}

impl MemberPath {
    pub fn parse(raw: &str) -> Arc<MemberPath> {
        if raw.is_empty() {
            return Self::empty();
        }
        let segments = if raw.contains(['.', '[']) {
            split_segments(raw)
        } else {
            vec![raw.to_string()]
        };
        log::trace!("Member path '{}' -> {:?}", raw, segments);
        Arc::new(MemberPath {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The shared zero-segment path.
    pub fn empty() -> Arc<MemberPath> {
        Arc::clone(&EMPTY)
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn kind(&self) -> PathKind {
        match self.segments.len() {
            0 => PathKind::Empty,
            1 => PathKind::Single,
            _ => PathKind::Multi,
        }
    }

    pub fn is_single_segment(&self) -> bool {
        self.kind() == PathKind::Single
    }

    pub fn segment(&self, index: usize) -> Option<PathSegment<'_>> {
        self.segments
            .get(index)
            .map(|s| PathSegment::from_raw(s.as_str()))
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

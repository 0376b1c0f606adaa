//! Parse diagnostics collected without unwinding.

use std::fmt;

/// One parse failure: a message plus the character offset it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub message: String,
    pub position: usize,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at position {})", self.message, self.position)
    }
}

/// An ordered error sink shared by every component during one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<ParseDiagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, position: usize) {
        let message = message.into();
        log::trace!("parse diagnostic at {}: {}", position, message);
        self.0.push(ParseDiagnostic { message, position });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseDiagnostic> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ParseDiagnostic> {
        self.0
    }

    /// Returns `true` if any message contains `fragment`.
    pub fn contains(&self, fragment: &str) -> bool {
        self.0.iter().any(|d| d.message.contains(fragment))
    }
}

impl From<Vec<ParseDiagnostic>> for Diagnostics {
    fn from(v: Vec<ParseDiagnostic>) -> Self {
        Self(v)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a ParseDiagnostic;
    type IntoIter = std::slice::Iter<'a, ParseDiagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

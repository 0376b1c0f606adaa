//! Token parser pipeline for binding expressions.
//!
//! A [`ParserContext`] is a backtracking cursor over the source text. An ordered
//! set of [`TokenParser`] components each try to extend the current partial
//! expression; the driver feeds every result back in until no component can
//! extend it further.
//!
//! # Example
//!
//! ```ignore
//! let parser = ExpressionParser::default();
//! let result = parser.parse("Items[SelectedIndex].Name");
//! assert!(result.diagnostics.is_empty());
//! ```

pub mod component;
pub mod components;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod parser;

pub use component::{TokenParser, priority};
pub use context::ParserContext;
pub use diagnostics::{Diagnostics, ParseDiagnostic};
pub use error::ParseError;
pub use parser::{ExpressionParser, ParseResult};

//! The grammar-rule interface implemented by every token parser.

use crate::context::ParserContext;
use bindpath_expr::ExprRef;
use std::fmt::Debug;

/// One grammar rule.
///
/// `try_parse` receives the partial expression built so far (or `None` at the
/// start of an operand) and returns a longer expression, or `None` when the
/// rule does not apply. On `None` the cursor must be back where it started.
/// Errors are only recorded when the rule positively recognised the start of
/// its construct and could not complete it.
pub trait TokenParser: Send + Sync + Debug {
    /// Higher runs earlier and, for operand filtering, binds tighter.
    fn priority(&self) -> i32;

    /// A short name used in logs.
    fn name(&self) -> &'static str;

    fn try_parse(&self, ctx: &mut ParserContext<'_>, expression: Option<&ExprRef>)
    -> Option<ExprRef>;
}

/// Priorities of the built-in components.
pub mod priority {
    pub const CONSTANT: i32 = 1000;
    pub const DIGIT: i32 = 990;
    pub const STRING: i32 = 980;
    pub const LAMBDA: i32 = 975;
    pub const PARENTHESIS: i32 = 970;
    pub const METHOD_CALL: i32 = 960;
    pub const MEMBER: i32 = 950;
    pub const INDEXER: i32 = 940;
    pub const NULL_CONDITIONAL: i32 = 930;
    pub const UNARY: i32 = 900;
    pub const BINARY: i32 = 500;
    pub const CONDITIONAL: i32 = 200;
    pub const ASSIGNMENT: i32 = 100;
}

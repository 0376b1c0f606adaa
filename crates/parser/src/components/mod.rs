//! The built-in grammar rules.

mod assignment;
mod binary;
mod conditional;
mod constant;
mod digit;
mod indexer;
mod lambda;
mod member;
mod method_call;
mod null_conditional;
mod parenthesis;
mod string;
mod unary;

pub use assignment::AssignmentTokenParser;
pub use binary::BinaryTokenParser;
pub use conditional::ConditionalTokenParser;
pub use constant::ConstantTokenParser;
pub use digit::DigitTokenParser;
pub use indexer::IndexerTokenParser;
pub use lambda::LambdaTokenParser;
pub use member::MemberTokenParser;
pub use method_call::MethodCallTokenParser;
pub use null_conditional::NullConditionalTokenParser;
pub use parenthesis::ParenthesisTokenParser;
pub use string::StringTokenParser;
pub use unary::UnaryTokenParser;

use crate::component::TokenParser;
use crate::context::ParserContext;
use bindpath_expr::ExprRef;
use std::sync::Arc;

/// Every built-in component, in no particular order.
pub fn builtin() -> Vec<Arc<dyn TokenParser>> {
    vec![
        Arc::new(ConstantTokenParser),
        Arc::new(DigitTokenParser),
        Arc::new(StringTokenParser),
        Arc::new(LambdaTokenParser),
        Arc::new(ParenthesisTokenParser),
        Arc::new(MethodCallTokenParser),
        Arc::new(MemberTokenParser),
        Arc::new(IndexerTokenParser),
        Arc::new(NullConditionalTokenParser),
        Arc::new(UnaryTokenParser),
        Arc::new(BinaryTokenParser),
        Arc::new(ConditionalTokenParser),
        Arc::new(AssignmentTokenParser),
    ]
}

/// Parses a comma-separated argument list; the opening bracket is already
/// consumed and `close` is consumed on success. Errors are recorded here, the
/// caller restores the cursor.
pub(crate) fn parse_arguments(ctx: &mut ParserContext<'_>, close: char) -> Option<Vec<ExprRef>> {
    let mut args = Vec::new();
    ctx.skip_whitespaces();
    if ctx.current() == Some(close) {
        ctx.move_next(1);
        return Some(args);
    }
    loop {
        let Some(arg) = ctx.parse_expression() else {
            ctx.add_error(format!("Expected argument before '{}'", ctx.remaining()));
            return None;
        };
        args.push(arg);
        ctx.skip_whitespaces();
        match ctx.current() {
            Some(',') => ctx.move_next(1),
            Some(c) if c == close => {
                ctx.move_next(1);
                return Some(args);
            }
            _ => {
                ctx.add_error(format!("Expected ',' or '{}' in argument list", close));
                return None;
            }
        }
    }
}

use crate::component::{TokenParser, priority};
use crate::context::ParserContext;
use bindpath_expr::ExprRef;

/// `( expression )`. Grouping is structural only; the inner node is returned.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParenthesisTokenParser;

impl TokenParser for ParenthesisTokenParser {
    fn priority(&self) -> i32 {
        priority::PARENTHESIS
    }

    fn name(&self) -> &'static str {
        "parenthesis"
    }

    fn try_parse(
        &self,
        ctx: &mut ParserContext<'_>,
        expression: Option<&ExprRef>,
    ) -> Option<ExprRef> {
        if expression.is_some() {
            return None;
        }
        let start = ctx.position();
        ctx.skip_whitespaces();
        if !ctx.is_token("(") {
            ctx.set_position(start);
            return None;
        }
        let open = ctx.position();
        ctx.move_next(1);
        ctx.skip_whitespaces();
        if ctx.is_token(")") {
            ctx.add_error_at("Empty parenthesized expression", open);
            ctx.set_position(start);
            return None;
        }

        let Some(inner) = ctx.parse_expression() else {
            ctx.add_error_at("Expected expression after '('", open);
            ctx.set_position(start);
            return None;
        };
        ctx.skip_whitespaces();
        if !ctx.is_token(")") {
            ctx.add_error(format!("Expected ')' after '{}'", inner));
            ctx.set_position(start);
            return None;
        }
        ctx.move_next(1);
        Some(inner)
    }
}

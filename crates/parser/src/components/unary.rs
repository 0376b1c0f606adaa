use crate::component::{TokenParser, priority};
use crate::context::ParserContext;
use bindpath_expr::{ExprRef, Expression, UnaryOperator};

/// Prefix operators, including the `$` / `$$` resource macros. The operand is
/// parsed at unary priority or higher, so `-!x` composes.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnaryTokenParser;

impl TokenParser for UnaryTokenParser {
    fn priority(&self) -> i32 {
        priority::UNARY
    }

    fn name(&self) -> &'static str {
        "unary"
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
        let Some(op) = UnaryOperator::MATCH_ORDER
            .into_iter()
            .find(|op| ctx.is_token(op.token()))
        else {
            ctx.set_position(start);
            return None;
        };
        let at = ctx.position();
        ctx.move_next(op.token().len());

        match ctx.try_parse_while_not_null(None, &|c| c.priority() >= priority::UNARY) {
            Some(operand) => Some(Expression::unary(op, operand)),
            None => {
                ctx.add_error_at(format!("Expected operand after unary '{}'", op), at);
                ctx.set_position(start);
                None
            }
        }
    }
}

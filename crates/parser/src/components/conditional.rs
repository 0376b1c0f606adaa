use crate::component::{TokenParser, priority};
use crate::context::ParserContext;
use bindpath_expr::{ExprRef, Expression};

/// `condition ? if_true : if_false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConditionalTokenParser;

impl TokenParser for ConditionalTokenParser {
    fn priority(&self) -> i32 {
        priority::CONDITIONAL
    }

    fn name(&self) -> &'static str {
        "conditional"
    }

    fn try_parse(
        &self,
        ctx: &mut ParserContext<'_>,
        expression: Option<&ExprRef>,
    ) -> Option<ExprRef> {
        let condition = expression?;
        let start = ctx.position();
        ctx.skip_whitespaces();
        let at = ctx.position();
        let is_other_token = ctx.is_token("??")
            || ctx.is_token("?[")
            || (ctx.is_token("?.") && !ctx.is_digit(at + 2));
        if !ctx.is_token("?") || is_other_token {
            ctx.set_position(start);
            return None;
        }
        ctx.move_next(1);

        let Some(if_true) = ctx.parse_expression() else {
            ctx.add_error_at(
                format!("Expected expression after '?' in conditional on '{}'", condition),
                at,
            );
            ctx.set_position(start);
            return None;
        };

        ctx.skip_whitespaces();
        if !ctx.is_token(":") {
            ctx.add_error(format!(
                "Expected ':' in conditional expression after '{}'",
                if_true
            ));
            ctx.set_position(start);
            return None;
        }
        ctx.move_next(1);

        let Some(if_false) = ctx.parse_expression() else {
            ctx.add_error(format!(
                "Expected false branch in conditional expression after '{} :'",
                if_true
            ));
            ctx.set_position(start);
            return None;
        };

        Some(Expression::conditional(condition.clone(), if_true, if_false))
    }
}

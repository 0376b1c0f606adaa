use crate::component::{TokenParser, priority};
use crate::context::ParserContext;
use bindpath_expr::{BinaryOperator, ExprRef, Expression};

/// `target = value`, right-associative and lowest priority.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssignmentTokenParser;

impl TokenParser for AssignmentTokenParser {
    fn priority(&self) -> i32 {
        priority::ASSIGNMENT
    }

    fn name(&self) -> &'static str {
        "assignment"
    }

    fn try_parse(
        &self,
        ctx: &mut ParserContext<'_>,
        expression: Option<&ExprRef>,
    ) -> Option<ExprRef> {
        let left = expression?;
        let start = ctx.position();
        ctx.skip_whitespaces();
        let at = ctx.position();
        if !ctx.is_token("=") || matches!(ctx.char_at(at + 1), Some('=' | '>')) {
            ctx.set_position(start);
            return None;
        }
        ctx.move_next(1);

        match ctx.parse_expression() {
            Some(right) => Some(Expression::binary(left.clone(), BinaryOperator::Assign, right)),
            None => {
                ctx.add_error_at(format!("Expected expression after '{} ='", left), at);
                ctx.set_position(start);
                None
            }
        }
    }
}

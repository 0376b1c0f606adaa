use crate::component::{TokenParser, priority};
use crate::context::ParserContext;
use bindpath_expr::{ExprRef, Expression};

/// `Name` on the data context (or a lambda parameter in scope), or `.Name`
/// after a preceding expression.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemberTokenParser;

impl TokenParser for MemberTokenParser {
    fn priority(&self) -> i32 {
        priority::MEMBER
    }

    fn name(&self) -> &'static str {
        "member"
    }

    fn try_parse(
        &self,
        ctx: &mut ParserContext<'_>,
        expression: Option<&ExprRef>,
    ) -> Option<ExprRef> {
        let start = ctx.position();
        ctx.skip_whitespaces();

        let Some(target) = expression else {
            let Some(name) = ctx.read_identifier() else {
                ctx.set_position(start);
                return None;
            };
            if ctx.has_parameter(&name) {
                return Some(Expression::parameter(name));
            }
            return Some(Expression::root_member(name));
        };

        if !ctx.is_token(".") || ctx.is_digit(ctx.position() + 1) {
            ctx.set_position(start);
            return None;
        }
        let dot = ctx.position();
        ctx.move_next(1);
        ctx.skip_whitespaces();
        match ctx.read_identifier() {
            Some(name) => Some(Expression::member(Some(target.clone()), name)),
            None => {
                ctx.add_error_at(format!("Expected member name after '{}.'", target), dot);
                ctx.set_position(start);
                None
            }
        }
    }
}

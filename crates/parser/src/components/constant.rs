use crate::component::{TokenParser, priority};
use crate::context::ParserContext;
use bindpath_expr::{ConstantValue, ExprRef, Expression};

/// `null`, `true`, `false` and the built-in type keywords.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstantTokenParser;

impl TokenParser for ConstantTokenParser {
    fn priority(&self) -> i32 {
        priority::CONSTANT
    }

    fn name(&self) -> &'static str {
        "constant"
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
        let begin = ctx.position();
        let Some(end) = ctx.identifier_end(begin) else {
            ctx.set_position(start);
            return None;
        };
        let word = ctx.slice(begin, end);
        let constant = match word.as_str() {
            "null" => Expression::null(),
            "true" => Expression::boolean(true),
            "false" => Expression::boolean(false),
            w if ConstantValue::is_type_keyword(w) => {
                Expression::constant(ConstantValue::Type(w.to_string()))
            }
            _ => {
                ctx.set_position(start);
                return None;
            }
        };
        ctx.set_position(end);
        Some(constant)
    }
}

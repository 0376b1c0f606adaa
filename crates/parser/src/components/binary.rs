//! Binary operator runs and their precedence folding.

use crate::component::{TokenParser, priority};
use crate::context::{BinaryScratch, ParserContext};
use bindpath_expr::{BinaryOperator, ExprRef, Expression};

/// Collects `left op operand op operand ...` flatly, then folds the run by
/// repeatedly merging around the leftmost highest-priority operator.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryTokenParser;

impl TokenParser for BinaryTokenParser {
    fn priority(&self) -> i32 {
        priority::BINARY
    }

    fn name(&self) -> &'static str {
        "binary"
    }

    fn try_parse(
        &self,
        ctx: &mut ParserContext<'_>,
        expression: Option<&ExprRef>,
    ) -> Option<ExprRef> {
        let left = expression?;
        let start = ctx.position();
        let mut scratch = ctx.rent_scratch();
        scratch.operands.push(left.clone());

        loop {
            let before = ctx.position();
            ctx.skip_whitespaces();
            let Some(op) = match_operator(ctx) else {
                ctx.set_position(before);
                break;
            };
            let at = ctx.position();
            ctx.move_next(op.token().len());
            match ctx.try_parse_while_not_null(None, &|c| c.priority() > priority::BINARY) {
                Some(operand) => {
                    scratch.operators.push(op);
                    scratch.operands.push(operand);
                }
                None => {
                    ctx.add_error_at(format!("Expected expression after '{}'", op), at);
                    ctx.return_scratch(scratch);
                    ctx.set_position(start);
                    return None;
                }
            }
        }

        let result = if scratch.operators.is_empty() {
            None
        } else {
            fold(&mut scratch)
        };
        ctx.return_scratch(scratch);
        if result.is_none() {
            ctx.set_position(start);
        }
        result
    }
}

fn match_operator(ctx: &ParserContext<'_>) -> Option<BinaryOperator> {
    BinaryOperator::MATCH_ORDER
        .into_iter()
        .find(|op| ctx.is_token(op.token()))
}

/// Folds operands/operators into one tree. Ties go to the leftmost operator,
/// which makes every tier left-associative.
pub(crate) fn fold(scratch: &mut BinaryScratch) -> Option<ExprRef> {
    while !scratch.operators.is_empty() {
        let mut index = 0;
        for (i, op) in scratch.operators.iter().enumerate() {
            if op.priority() > scratch.operators[index].priority() {
                index = i;
            }
        }
        let op = scratch.operators.remove(index);
        let right = scratch.operands.remove(index + 1);
        let left = scratch.operands[index].clone();
        scratch.operands[index] = Expression::binary(left, op, right);
    }
    scratch.operands.pop()
}

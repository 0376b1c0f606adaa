use super::parse_arguments;
use crate::component::{TokenParser, priority};
use crate::context::ParserContext;
use bindpath_expr::{ExprRef, Expression};

/// `target[arg, ...]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexerTokenParser;

impl TokenParser for IndexerTokenParser {
    fn priority(&self) -> i32 {
        priority::INDEXER
    }

    fn name(&self) -> &'static str {
        "indexer"
    }

    fn try_parse(
        &self,
        ctx: &mut ParserContext<'_>,
        expression: Option<&ExprRef>,
    ) -> Option<ExprRef> {
        let target = expression?;
        let start = ctx.position();
        ctx.skip_whitespaces();
        if !ctx.is_token("[") {
            ctx.set_position(start);
            return None;
        }
        let open = ctx.position();
        ctx.move_next(1);

        match parse_arguments(ctx, ']') {
            Some(args) if args.is_empty() => {
                ctx.add_error_at(
                    format!("Indexer on '{}' requires at least one argument", target),
                    open,
                );
                ctx.set_position(start);
                None
            }
            Some(args) => Some(Expression::index(target.clone(), args)),
            None => {
                ctx.set_position(start);
                None
            }
        }
    }
}

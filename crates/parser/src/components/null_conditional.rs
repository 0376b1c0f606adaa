use crate::component::{TokenParser, priority};
use crate::context::ParserContext;
use bindpath_expr::{ExprRef, Expression};

/// `target?.Member`, `target?.Method()` and `target?[i]`.
///
/// Only the hop directly after `?` is guarded: `a?.b.c` is `(a?.b).c`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullConditionalTokenParser;

impl TokenParser for NullConditionalTokenParser {
    fn priority(&self) -> i32 {
        priority::NULL_CONDITIONAL
    }

    fn name(&self) -> &'static str {
        "null-conditional"
    }

    fn try_parse(
        &self,
        ctx: &mut ParserContext<'_>,
        expression: Option<&ExprRef>,
    ) -> Option<ExprRef> {
        let target = expression?;
        let start = ctx.position();
        ctx.skip_whitespaces();
        let at = ctx.position();
        let guarded_member = ctx.is_token("?.") && !ctx.is_digit(at + 2);
        if !guarded_member && !ctx.is_token("?[") {
            ctx.set_position(start);
            return None;
        }
        ctx.move_next(1);

        let guarded = Expression::null_conditional(target.clone());
        let continuation = ctx.try_parse(Some(&guarded), &|c| {
            (priority::INDEXER..=priority::METHOD_CALL).contains(&c.priority())
        });
        match continuation {
            Some(result) => Some(result),
            None => {
                ctx.add_error_at(format!("Expected member or indexer after '{}?'", target), at);
                ctx.set_position(start);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::{parse, run};

    #[test]
    fn test_single_guarded_hop() {
        let expr = parse("a?.b.c");
        assert_eq!(expr.to_string(), "a?.b.c");
        let Expression::Member { target: Some(inner), name } = expr.as_ref() else {
            panic!("expected member");
        };
        assert_eq!(name, "c");
        let Expression::Member { target: Some(guard), .. } = inner.as_ref() else {
            panic!("expected member");
        };
        assert_eq!(guard.kind(), "null-conditional");
    }

    #[test]
    fn test_guarded_indexer_and_method() {
        assert_eq!(parse("a?[0]").to_string(), "a?[0]");
        assert_eq!(parse("a?.M()").to_string(), "a?.M()");
    }

    #[test]
    fn test_declines_coalescing_and_conditional() {
        let a = Expression::root_member("a");
        for text in ["?? b", "? b : c", "?.5 : 1"] {
            let (result, ctx) = run(&NullConditionalTokenParser, text, Some(&a));
            assert!(result.is_none(), "{}", text);
            assert_eq!(ctx.position(), 0);
            assert!(!ctx.has_errors());
        }
    }

    #[test]
    fn test_missing_continuation() {
        let a = Expression::root_member("a");
        let (result, ctx) = run(&NullConditionalTokenParser, "?.+", Some(&a));
        assert!(result.is_none());
        assert_eq!(ctx.position(), 0);
        assert!(ctx.has_errors());
    }
}

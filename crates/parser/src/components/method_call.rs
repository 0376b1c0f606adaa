use super::parse_arguments;
use crate::component::{TokenParser, priority};
use crate::context::ParserContext;
use bindpath_expr::{ExprRef, Expression};

/// `Method(args)`, `target.Method(args)` and `Method<T1, T2>(args)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MethodCallTokenParser;

impl TokenParser for MethodCallTokenParser {
    fn priority(&self) -> i32 {
        priority::METHOD_CALL
    }

    fn name(&self) -> &'static str {
        "method-call"
    }

    fn try_parse(
        &self,
        ctx: &mut ParserContext<'_>,
        expression: Option<&ExprRef>,
    ) -> Option<ExprRef> {
        let start = ctx.position();
        ctx.skip_whitespaces();
        if expression.is_some() {
            if !ctx.is_token(".") {
                ctx.set_position(start);
                return None;
            }
            ctx.move_next(1);
            ctx.skip_whitespaces();
        }

        let Some(method) = ctx.read_identifier() else {
            ctx.set_position(start);
            return None;
        };
        let type_args = read_type_arguments(ctx);

        ctx.skip_whitespaces();
        if !ctx.is_token("(") {
            ctx.set_position(start);
            return None;
        }
        ctx.move_next(1);

        match parse_arguments(ctx, ')') {
            Some(args) => Some(Expression::method_call(
                expression.cloned(),
                method,
                args,
                type_args,
            )),
            None => {
                ctx.set_position(start);
                None
            }
        }
    }
}

/// Reads an optional `<A, B.C>` list. Anything that does not close cleanly is
/// left unconsumed, since `a < b` is a comparison.
fn read_type_arguments(ctx: &mut ParserContext<'_>) -> Vec<String> {
    let save = ctx.position();
    ctx.skip_whitespaces();
    if !ctx.is_token("<") {
        ctx.set_position(save);
        return Vec::new();
    }
    ctx.move_next(1);

    let mut names = Vec::new();
    loop {
        ctx.skip_whitespaces();
        let Some(name) = read_dotted_identifier(ctx) else {
            ctx.set_position(save);
            return Vec::new();
        };
        names.push(name);
        ctx.skip_whitespaces();
        match ctx.current() {
            Some(',') => ctx.move_next(1),
            Some('>') => {
                ctx.move_next(1);
                return names;
            }
            _ => {
                ctx.set_position(save);
                return Vec::new();
            }
        }
    }
}

fn read_dotted_identifier(ctx: &mut ParserContext<'_>) -> Option<String> {
    let mut name = ctx.read_identifier()?;
    while ctx.is_token(".") && ctx.is_identifier_start(ctx.position() + 1) {
        ctx.move_next(1);
        name.push('.');
        name.push_str(&ctx.read_identifier()?);
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::{parse, run};

    #[test]
    fn test_call_on_data_context() {
        let (result, ctx) = run(&MethodCallTokenParser, "Format(1, Name)", None);
        assert_eq!(result.unwrap().to_string(), "Format(1, Name)");
        assert!(ctx.is_eof());
    }

    #[test]
    fn test_call_with_target_and_type_arguments() {
        let expr = parse("Items.OfType<System.String, int>()");
        let Expression::MethodCall {
            target,
            method,
            args,
            type_args,
        } = expr.as_ref()
        else {
            panic!("expected method call, got {:?}", expr);
        };
        assert_eq!(target.as_ref().map(|t| t.to_string()).as_deref(), Some("Items"));
        assert_eq!(method, "OfType");
        assert!(args.is_empty());
        assert_eq!(type_args, &vec!["System.String".to_string(), "int".to_string()]);
    }

    #[test]
    fn test_comparison_is_not_a_type_argument_list() {
        let (result, ctx) = run(&MethodCallTokenParser, "a < b", None);
        assert!(result.is_none());
        assert_eq!(ctx.position(), 0);
        assert!(!ctx.has_errors());
    }

    #[test]
    fn test_member_without_parentheses_declines() {
        let a = Expression::root_member("a");
        let (result, ctx) = run(&MethodCallTokenParser, ".Length", Some(&a));
        assert!(result.is_none());
        assert_eq!(ctx.position(), 0);
    }

    #[test]
    fn test_unclosed_argument_list() {
        let (result, ctx) = run(&MethodCallTokenParser, "M(1 2)", None);
        assert!(result.is_none());
        assert_eq!(ctx.position(), 0);
        assert!(ctx.diagnostics().contains("Expected ','"));

        let (result, ctx) = run(&MethodCallTokenParser, "M(1,)", None);
        assert!(result.is_none());
        assert_eq!(ctx.position(), 0);
        assert!(ctx.diagnostics().contains("Expected argument"));
    }
}

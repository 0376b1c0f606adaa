use crate::component::{TokenParser, priority};
use crate::context::ParserContext;
use bindpath_expr::{ExprRef, Expression};

/// `x => body`, `() => body` and `(a, b) => body`.
///
/// The parameters are in scope while the body is parsed, so bare identifiers
/// naming them become [`Expression::Parameter`] nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct LambdaTokenParser;

impl TokenParser for LambdaTokenParser {
    fn priority(&self) -> i32 {
        priority::LAMBDA
    }

    fn name(&self) -> &'static str {
        "lambda"
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

        let Some(parameters) = read_parameters(ctx) else {
            ctx.set_position(start);
            return None;
        };

        ctx.skip_whitespaces();
        let arrow = ctx.position();
        if !ctx.is_token("=>") {
            if parameters.len() > 1 {
                ctx.add_error(format!(
                    "Expected '=>' after lambda parameters ({})",
                    parameters.join(", ")
                ));
            }
            ctx.set_position(start);
            return None;
        }
        ctx.move_next(2);

        for (i, name) in parameters.iter().enumerate() {
            if parameters[..i].contains(name) {
                ctx.add_error_at(format!("Duplicate lambda parameter '{}'", name), arrow);
                ctx.set_position(start);
                return None;
            }
        }

        match ctx.with_parameters(&parameters, |ctx| ctx.parse_expression()) {
            Some(body) => Some(Expression::lambda(parameters, body)),
            None => {
                ctx.add_error_at("Expected lambda body after '=>'", arrow);
                ctx.set_position(start);
                None
            }
        }
    }
}

/// Reads `x` or `(a, b, ...)`. Returns `None` without recording an error when
/// the text is not a parameter list.
fn read_parameters(ctx: &mut ParserContext<'_>) -> Option<Vec<String>> {
    if !ctx.is_token("(") {
        return ctx.read_identifier().map(|name| vec![name]);
    }
    ctx.move_next(1);
    ctx.skip_whitespaces();

    let mut parameters = Vec::new();
    if ctx.is_token(")") {
        ctx.move_next(1);
        return Some(parameters);
    }
    loop {
        ctx.skip_whitespaces();
        parameters.push(ctx.read_identifier()?);
        ctx.skip_whitespaces();
        match ctx.current() {
            Some(',') => ctx.move_next(1),
            Some(')') => {
                ctx.move_next(1);
                return Some(parameters);
            }
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::{parse, run};

    #[test]
    fn test_single_parameter_binds_in_body() {
        let expr = parse("Items.Where(x => x.IsActive)");
        assert_eq!(expr.to_string(), "Items.Where(((x) => x.IsActive))");
        let Expression::MethodCall { args, .. } = expr.as_ref() else {
            panic!("expected method call");
        };
        let Expression::Lambda { body, .. } = args[0].as_ref() else {
            panic!("expected lambda");
        };
        let Expression::Member { target: Some(target), .. } = body.as_ref() else {
            panic!("expected member");
        };
        assert_eq!(target.kind(), "parameter");
    }

    #[test]
    fn test_parenthesised_forms() {
        assert_eq!(parse("() => 1").to_string(), "(() => 1)");
        assert_eq!(parse("(a, b) => a + b").to_string(), "((a, b) => (a + b))");
    }

    #[test]
    fn test_scope_ends_with_body() {
        let expr = parse("M(x => x, x)");
        let Expression::MethodCall { args, .. } = expr.as_ref() else {
            panic!("expected method call");
        };
        assert_eq!(args[1].kind(), "member");
    }

    #[test]
    fn test_duplicate_parameter() {
        let (result, ctx) = run(&LambdaTokenParser, "(a, a) => a", None);
        assert!(result.is_none());
        assert_eq!(ctx.position(), 0);
        assert!(ctx.diagnostics().contains("Duplicate lambda parameter 'a'"));
    }

    #[test]
    fn test_missing_arrow() {
        let (result, ctx) = run(&LambdaTokenParser, "(a, b) a", None);
        assert!(result.is_none());
        assert_eq!(ctx.position(), 0);
        assert!(ctx.diagnostics().contains("Expected '=>'"));

        // A parenthesised expression or a plain member is not an error here.
        for text in ["(a)", "(a + b)", "a"] {
            let (result, ctx) = run(&LambdaTokenParser, text, None);
            assert!(result.is_none());
            assert_eq!(ctx.position(), 0);
            assert!(!ctx.has_errors(), "{}", text);
        }
    }

    #[test]
    fn test_missing_body() {
        let (result, ctx) = run(&LambdaTokenParser, "x => ", None);
        assert!(result.is_none());
        assert_eq!(ctx.position(), 0);
        assert!(ctx.diagnostics().contains("Expected lambda body"));
    }
}

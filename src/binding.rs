//! Binding strings: `Target Source[, Param=Value]*`, several per string
//! separated by `;`.

use crate::error::BindingError;
use bindpath_expr::{BinaryOperator, ExprRef, Expression};
use bindpath_parser::{Diagnostics, ExpressionParser, ParserContext};
use std::fmt;
use std::sync::Arc;

/// One parsed binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingExpression {
    /// The bound member of the target object, e.g. `Text`.
    pub target: ExprRef,
    /// `None` binds the target to the data context itself.
    pub source: Option<ExprRef>,
    /// `Name=Value` assignments and bare `Name` flags, in source order.
    pub parameters: Vec<ExprRef>,
}

impl BindingExpression {
    /// The value of parameter `name`. A bare flag yields `true`.
    pub fn parameter(&self, name: &str) -> Option<ExprRef> {
        self.parameters
            .iter()
            .find_map(|parameter| match parameter.as_ref() {
                Expression::Binary {
                    left,
                    op: BinaryOperator::Assign,
                    right,
                } if is_root_member(left, name) => Some(Arc::clone(right)),
                _ if is_root_member(parameter, name) => Some(Expression::boolean(true)),
                _ => None,
            })
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    /// The source as member path text, when it is a plain member chain.
    pub fn source_path(&self) -> Option<String> {
        match &self.source {
            Some(source) => source.to_member_path(),
            None => Some(String::new()),
        }
    }
}

fn is_root_member(expr: &Expression, name: &str) -> bool {
    matches!(expr, Expression::Member { target: None, name: member } if member == name)
}

impl fmt::Display for BindingExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target)?;
        if let Some(source) = &self.source {
            write!(f, " {}", source)?;
        }
        for parameter in &self.parameters {
            write!(f, ", {}", parameter)?;
        }
        Ok(())
    }
}

/// Every binding recovered from one string, plus what went wrong.
#[derive(Debug, Clone, Default)]
pub struct BindingParseResult {
    pub bindings: Vec<BindingExpression>,
    pub diagnostics: Diagnostics,
}

impl BindingParseResult {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_result(self, text: &str) -> Result<Vec<BindingExpression>, BindingError> {
        if self.diagnostics.is_empty() {
            Ok(self.bindings)
        } else {
            Err(BindingError::invalid_binding(text, self.diagnostics))
        }
    }
}

/// Splits a binding string into [`BindingExpression`]s using an
/// [`ExpressionParser`] for each part.
#[derive(Debug, Clone, Default)]
pub struct BindingParser {
    parser: ExpressionParser,
}

impl BindingParser {
    pub fn new(parser: ExpressionParser) -> Self {
        Self { parser }
    }

    pub fn expression_parser(&self) -> &ExpressionParser {
        &self.parser
    }

    pub fn parse(&self, text: &str) -> BindingParseResult {
        let mut ctx = self.parser.context(text);
        let mut bindings = Vec::new();
        loop {
            ctx.skip_whitespaces();
            if ctx.is_eof() {
                break;
            }
            if ctx.is_token(";") {
                ctx.move_next(1);
                continue;
            }
            let Some(binding) = parse_binding(&mut ctx) else {
                break;
            };
            bindings.push(binding);

            ctx.skip_whitespaces();
            if ctx.is_token(";") {
                ctx.move_next(1);
            } else if !ctx.is_eof() {
                let trailing = ctx.remaining();
                ctx.add_error(format!("Unexpected token '{}'", trailing));
                break;
            }
        }

        if bindings.is_empty() && !ctx.has_errors() {
            ctx.add_error("Binding is empty");
        }
        let diagnostics = ctx.into_diagnostics();
        if diagnostics.is_empty() {
            log::trace!("Parsed {} bindings from '{}'", bindings.len(), text);
        } else {
            log::debug!("Binding '{}' produced diagnostics: {}", text, diagnostics);
        }
        BindingParseResult {
            bindings,
            diagnostics,
        }
    }
}

fn at_binding_end(ctx: &ParserContext<'_>) -> bool {
    ctx.is_eof() || ctx.is_token(";") || ctx.is_token(",")
}

fn parse_binding(ctx: &mut ParserContext<'_>) -> Option<BindingExpression> {
    let Some(target) = ctx.parse_expression() else {
        let trailing = ctx.remaining();
        ctx.add_error(format!("Expected binding target at '{}'", trailing));
        return None;
    };

    ctx.skip_whitespaces();
    let source = if at_binding_end(ctx) {
        None
    } else {
        match ctx.parse_expression() {
            Some(source) => Some(source),
            None => {
                ctx.add_error(format!("Expected binding source after '{}'", target));
                return None;
            }
        }
    };

    let mut parameters = Vec::new();
    loop {
        ctx.skip_whitespaces();
        if !ctx.is_token(",") {
            break;
        }
        ctx.move_next(1);
        match ctx.parse_expression() {
            Some(parameter) => parameters.push(parameter),
            None => {
                ctx.add_error("Expected binding parameter after ','");
                return None;
            }
        }
    }

    Some(BindingExpression {
        target,
        source,
        parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> BindingParseResult {
        BindingParser::default().parse(text)
    }

    #[test]
    fn test_target_source_and_parameters() {
        let result = parse("Text Items[0].Name, Mode=TwoWay, Fallback='none', Delay");
        assert!(result.is_ok(), "{}", result.diagnostics);
        assert_eq!(result.bindings.len(), 1);

        let binding = &result.bindings[0];
        assert_eq!(binding.target.to_string(), "Text");
        assert_eq!(binding.source_path().as_deref(), Some("Items[0].Name"));
        assert_eq!(binding.parameters.len(), 3);
        assert_eq!(binding.parameter("Mode").unwrap().to_string(), "TwoWay");
        assert_eq!(binding.parameter("Fallback").unwrap().to_string(), "\"none\"");
        assert_eq!(*binding.parameter("Delay").unwrap(), *Expression::boolean(true));
        assert!(!binding.has_parameter("Converter"));
    }

    #[test]
    fn test_multiple_bindings() {
        let result = parse("Text Name; Visible !IsHidden ; ;Enabled");
        assert!(result.is_ok(), "{}", result.diagnostics);
        let rendered: Vec<String> = result.bindings.iter().map(|b| b.to_string()).collect();
        assert_eq!(rendered, vec!["Text Name", "Visible !IsHidden", "Enabled"]);
        assert!(result.bindings[2].source.is_none());
        assert_eq!(result.bindings[2].source_path().as_deref(), Some(""));
    }

    #[test]
    fn test_source_may_be_any_expression() {
        let result = parse("Text $\"{First} {Last}\", Mode=OneWay");
        assert!(result.is_ok(), "{}", result.diagnostics);
        let binding = &result.bindings[0];
        assert!(binding.source_path().is_none());
        assert_eq!(
            binding.source.as_ref().unwrap().to_string(),
            "string.Format(\"{0} {1}\", First, Last)"
        );
    }

    #[test]
    fn test_rendered_binding_reparses() {
        let text = "Text Count > 0 ? Title : 'empty', Mode=OneTime";
        let first = parse(text);
        assert!(first.is_ok(), "{}", first.diagnostics);
        let rendered = first.bindings[0].to_string();
        let second = parse(&rendered);
        assert!(second.is_ok(), "{}", second.diagnostics);
        assert_eq!(second.bindings, first.bindings);
    }

    #[test]
    fn test_errors_are_reported() {
        assert!(parse("").diagnostics.contains("Binding is empty"));
        assert!(parse("Text Name,").diagnostics.contains("Expected binding parameter"));
        assert!(parse("Text Name )").diagnostics.contains("Unexpected token ')'"));

        let result = parse("Text Name; Value a ? b");
        assert_eq!(result.bindings[0].to_string(), "Text Name");
        assert!(result.diagnostics.contains("Expected ':'"));
        let err = result.into_result("Text Name; Value a ? b").unwrap_err();
        assert!(err.to_string().starts_with("Binding parse error in 'Text Name; Value a ? b'"));
    }
}

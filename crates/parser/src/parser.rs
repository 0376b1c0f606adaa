//! Top-level driver: owns the ordered component set and runs whole parses.

use crate::component::TokenParser;
use crate::components;
use crate::context::ParserContext;
use crate::diagnostics::Diagnostics;
use crate::error::ParseError;
use bindpath_expr::ExprRef;
use std::sync::Arc;

/// The outcome of a lenient parse. Check `diagnostics` even when an
/// expression is present; partial recovery is not guaranteed.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub expression: Option<ExprRef>,
    pub diagnostics: Diagnostics,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.expression.is_some() && self.diagnostics.is_empty()
    }

    /// Rejects the expression on any diagnostic.
    pub fn into_result(self, text: &str) -> Result<ExprRef, ParseError> {
        match self.expression {
            Some(expression) if self.diagnostics.is_empty() => Ok(expression),
            _ => Err(ParseError::invalid(text, self.diagnostics)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionParser {
    components: Vec<Arc<dyn TokenParser>>,
}

impl Default for ExpressionParser {
    fn default() -> Self {
        Self::with_components(components::builtin())
    }
}

impl ExpressionParser {
    pub fn with_components(components: Vec<Arc<dyn TokenParser>>) -> Self {
        let mut parser = Self {
            components: Vec::with_capacity(components.len()),
        };
        for component in components {
            parser.add_component(component);
        }
        parser
    }

    /// Registers a component. Among equal priorities, earlier registrations run first.
    pub fn add_component(&mut self, component: Arc<dyn TokenParser>) {
        log::debug!(
            "Registering token parser '{}' (priority {})",
            component.name(),
            component.priority()
        );
        let at = self
            .components
            .iter()
            .position(|c| c.priority() < component.priority())
            .unwrap_or(self.components.len());
        self.components.insert(at, component);
    }

    /// Components in the order they are tried.
    pub fn components(&self) -> &[Arc<dyn TokenParser>] {
        &self.components
    }

    /// A fresh context over `text`, for callers that drive the grammar themselves.
    pub fn context<'p>(&'p self, text: &str) -> ParserContext<'p> {
        ParserContext::new(text, &self.components)
    }

    /// Parses one complete expression. Trailing text and empty input are
    /// reported as diagnostics.
    pub fn parse(&self, text: &str) -> ParseResult {
        let mut ctx = self.context(text);
        let expression = ctx.parse_expression();
        ctx.skip_whitespaces();

        if expression.is_none() && text.trim().is_empty() {
            ctx.add_error("Expression is empty");
        } else if !ctx.is_eof() {
            let trailing = ctx.remaining();
            ctx.add_error(format!("Unexpected token '{}'", trailing));
        }

        let diagnostics = ctx.into_diagnostics();
        if diagnostics.is_empty() {
            log::trace!("Parsed '{}'", text);
        } else {
            log::debug!("Parsing '{}' produced diagnostics: {}", text, diagnostics);
        }
        ParseResult {
            expression,
            diagnostics,
        }
    }

    pub fn parse_strict(&self, text: &str) -> Result<ExprRef, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        self.parse(text).into_result(text)
    }
}

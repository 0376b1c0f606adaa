//! The engine facade: parsing, path resolution and observation behind one
//! configured object.

use crate::binding::{BindingExpression, BindingParseResult, BindingParser};
use crate::config::BindingConfig;
use crate::error::BindingError;
use crate::provider::{BindingExpressionProvider, CachingBindingExpressionProvider};
use bindpath_expr::{ExprRef, Expression};
use bindpath_observer::{MemberPathObserver, ObserverOptions, PathObserverProvider};
use bindpath_parser::{ExpressionParser, ParseError};
use bindpath_path::{CachingMemberPathProvider, MemberPath, MemberPathProvider};
use bindpath_traits::{HostObject, MemberResolver};
use std::sync::Arc;

pub struct BindingEngine {
    config: BindingConfig,
    parser: Arc<BindingParser>,
    bindings: CachingBindingExpressionProvider,
    paths: CachingMemberPathProvider,
    observers: PathObserverProvider,
}

impl std::fmt::Debug for BindingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingEngine")
            .field("config", &self.config)
            .field("bindings", &self.bindings)
            .field("paths", &self.paths)
            .field("observers", &self.observers)
            .finish()
    }
}

impl BindingEngine {
    /// An engine with the built-in token parsers.
    pub fn new(config: BindingConfig, resolver: Arc<dyn MemberResolver>) -> Self {
        Self::with_parser(config, ExpressionParser::default(), resolver)
    }

    pub fn with_parser(
        config: BindingConfig,
        parser: ExpressionParser,
        resolver: Arc<dyn MemberResolver>,
    ) -> Self {
        log::debug!(
            "Creating binding engine ({} token parsers, resolver '{}')",
            parser.components().len(),
            resolver.name()
        );
        let parser = Arc::new(BindingParser::new(parser));
        let bindings = CachingBindingExpressionProvider::new(
            Arc::clone(&parser) as Arc<dyn BindingExpressionProvider>,
            config.expression_cache_capacity,
        );
        Self {
            bindings,
            paths: CachingMemberPathProvider::new(config.path_cache_capacity),
            observers: PathObserverProvider::new(resolver),
            parser,
            config,
        }
    }

    pub fn from_json_config(
        json: &str,
        resolver: Arc<dyn MemberResolver>,
    ) -> Result<Self, BindingError> {
        Ok(Self::new(BindingConfig::from_json(json)?, resolver))
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    pub fn expression_parser(&self) -> &ExpressionParser {
        self.parser.expression_parser()
    }

    /// Parses a single expression. In strict mode any diagnostic is an
    /// error; otherwise a recovered tree is returned despite diagnostics.
    pub fn parse_expression(&self, text: &str) -> Result<ExprRef, BindingError> {
        let parser = self.expression_parser();
        if self.config.strict_parsing {
            return Ok(parser.parse_strict(text)?);
        }
        let result = parser.parse(text);
        if !result.diagnostics.is_empty() {
            log::warn!("Accepting '{}' despite diagnostics: {}", text, result.diagnostics);
        }
        match result.expression {
            Some(expression) => Ok(expression),
            None if text.trim().is_empty() => Err(ParseError::Empty.into()),
            None => Err(ParseError::invalid(text, result.diagnostics).into()),
        }
    }

    /// Parses a binding string through the binding cache, without judging
    /// its diagnostics.
    pub fn binding_result(&self, text: &str) -> Arc<BindingParseResult> {
        self.bindings.parse_bindings(text)
    }

    /// Parses a binding string. In strict mode any diagnostic is an error.
    pub fn parse_bindings(&self, text: &str) -> Result<Vec<BindingExpression>, BindingError> {
        let result = self.binding_result(text);
        if self.config.strict_parsing && !result.diagnostics.is_empty() {
            return Err(BindingError::invalid_binding(text, result.diagnostics.clone()));
        }
        Ok(result.bindings.clone())
    }

    pub fn member_path(&self, path: &str) -> Result<Arc<MemberPath>, BindingError> {
        Ok(self.paths.get_member_path(path)?)
    }

    /// Registers a path provider ahead of the existing ones.
    pub fn add_path_provider(&self, provider: Arc<dyn MemberPathProvider>) {
        self.paths.add_provider(provider);
    }

    /// The observer options derived from the configuration.
    pub fn default_options(&self) -> ObserverOptions {
        self.config.observer.into()
    }

    pub fn observe(
        &self,
        target: &HostObject,
        path: &str,
    ) -> Result<Arc<dyn MemberPathObserver>, BindingError> {
        self.observe_with(target, path, self.default_options())
    }

    pub fn observe_with(
        &self,
        target: &HostObject,
        path: &str,
        options: ObserverOptions,
    ) -> Result<Arc<dyn MemberPathObserver>, BindingError> {
        let path = self.member_path(path)?;
        Ok(self.observers.observe(target, path, options))
    }

    /// Observes an expression that is a plain member chain on the data
    /// context, such as the source of a binding.
    pub fn observe_expression(
        &self,
        target: &HostObject,
        expression: &Expression,
        options: ObserverOptions,
    ) -> Result<Arc<dyn MemberPathObserver>, BindingError> {
        let path = expression
            .to_member_path()
            .ok_or_else(|| BindingError::NotMemberPath(expression.to_string()))?;
        self.observe_with(target, &path, options)
    }

    /// Drops every cached binding and member path.
    pub fn invalidate_caches(&self) {
        self.bindings.invalidate();
        self.paths.invalidate();
    }
}

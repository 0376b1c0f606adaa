//! The backtracking cursor shared by every token parser during one parse.

use crate::component::TokenParser;
use crate::diagnostics::Diagnostics;
use bindpath_expr::{BinaryOperator, ExprRef};
use std::mem;
use std::sync::Arc;

/// Flat operand/operator run collected by the binary token parser before folding.
#[derive(Debug, Default)]
pub struct BinaryScratch {
    pub operands: Vec<ExprRef>,
    pub operators: Vec<BinaryOperator>,
}

impl BinaryScratch {
    fn clear(&mut self) {
        self.operands.clear();
        self.operators.clear();
    }
}

/// Cursor, error sink and lambda scope for one expression source.
///
/// Positions are character offsets, not byte offsets.
pub struct ParserContext<'p> {
    source: Vec<char>,
    position: usize,
    components: &'p [Arc<dyn TokenParser>],
    diagnostics: Diagnostics,
    parameters: Vec<String>,
    scratch: Vec<BinaryScratch>,
    scratch_depth: usize,
}

impl<'p> ParserContext<'p> {
    /// `components` must already be ordered highest priority first.
    pub fn new(text: &str, components: &'p [Arc<dyn TokenParser>]) -> Self {
        Self {
            source: text.chars().collect(),
            position: 0,
            components,
            diagnostics: Diagnostics::new(),
            parameters: Vec::new(),
            scratch: Vec::new(),
            scratch_depth: 0,
        }
    }

    // --- Cursor ---

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.source.len());
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn current(&self) -> Option<char> {
        self.char_at(self.position)
    }

    pub fn char_at(&self, position: usize) -> Option<char> {
        self.source.get(position).copied()
    }

    /// The character `offset` places after the cursor.
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.char_at(self.position + offset)
    }

    pub fn move_next(&mut self, count: usize) {
        self.set_position(self.position + count);
    }

    pub fn skip_whitespaces(&mut self) {
        while self.current().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    pub fn is_token(&self, token: &str) -> bool {
        self.is_token_at(token, self.position)
    }

    pub fn is_token_at(&self, token: &str, position: usize) -> bool {
        let mut at = position;
        for expected in token.chars() {
            if self.char_at(at) != Some(expected) {
                return false;
            }
            at += 1;
        }
        true
    }

    pub fn is_digit(&self, position: usize) -> bool {
        self.char_at(position).is_some_and(|c| c.is_ascii_digit())
    }

    pub fn is_identifier_start(&self, position: usize) -> bool {
        self.char_at(position)
            .is_some_and(|c| c.is_alphabetic() || c == '_')
    }

    /// End offset of the identifier starting at `position`, if one starts there.
    pub fn identifier_end(&self, position: usize) -> Option<usize> {
        if !self.is_identifier_start(position) {
            return None;
        }
        let mut end = position + 1;
        while self
            .char_at(end)
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            end += 1;
        }
        Some(end)
    }

    /// Consumes and returns the identifier at the cursor.
    pub fn read_identifier(&mut self) -> Option<String> {
        let end = self.identifier_end(self.position)?;
        let name = self.slice(self.position, end);
        self.position = end;
        Some(name)
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.source.len());
        let start = start.min(end);
        self.source[start..end].iter().collect()
    }

    /// Unconsumed text from the cursor on.
    pub fn remaining(&self) -> String {
        self.slice(self.position, self.source.len())
    }

    pub fn source_text(&self) -> String {
        self.source.iter().collect()
    }

    // --- Errors ---

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.diagnostics.push(message, self.position);
    }

    pub fn add_error_at(&mut self, message: impl Into<String>, position: usize) {
        self.diagnostics.push(message, position);
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    // --- Lambda scope ---

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p == name)
    }

    /// Runs `f` with `parameters` in scope; they are popped again whatever `f` returns.
    pub fn with_parameters<R>(
        &mut self,
        parameters: &[String],
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let depth = self.parameters.len();
        self.parameters.extend(parameters.iter().cloned());
        let result = f(self);
        self.parameters.truncate(depth);
        result
    }

    // --- Binary scratch ---

    /// Takes the scratch buffer for the current nesting depth.
    pub fn rent_scratch(&mut self) -> BinaryScratch {
        let depth = self.scratch_depth;
        self.scratch_depth += 1;
        match self.scratch.get_mut(depth) {
            Some(slot) => {
                let mut buffer = mem::take(slot);
                buffer.clear();
                buffer
            }
            None => BinaryScratch::default(),
        }
    }

    pub fn return_scratch(&mut self, mut buffer: BinaryScratch) {
        self.scratch_depth = self.scratch_depth.saturating_sub(1);
        buffer.clear();
        let depth = self.scratch_depth;
        if depth < self.scratch.len() {
            self.scratch[depth] = buffer;
        } else {
            self.scratch.push(buffer);
        }
    }

    // --- Driver ---

    /// Offers `expression` to every component accepted by `filter`, highest
    /// priority first, and returns the first extension.
    pub fn try_parse(
        &mut self,
        expression: Option<&ExprRef>,
        filter: &dyn Fn(&dyn TokenParser) -> bool,
    ) -> Option<ExprRef> {
        self.skip_whitespaces();
        if self.is_eof() {
            return None;
        }
        let components = self.components;
        for component in components {
            if !filter(component.as_ref()) {
                continue;
            }
            let start = self.position;
            if let Some(result) = component.try_parse(self, expression) {
                log::trace!(
                    "{} produced {} at {}",
                    component.name(),
                    result.kind(),
                    self.position
                );
                return Some(result);
            }
            if self.position != start {
                log::warn!(
                    "Token parser '{}' did not restore the cursor ({} -> {})",
                    component.name(),
                    start,
                    self.position
                );
                self.position = start;
            }
        }
        None
    }

    /// Extends `expression` until no component accepted by `filter` applies.
    pub fn try_parse_while_not_null(
        &mut self,
        expression: Option<&ExprRef>,
        filter: &dyn Fn(&dyn TokenParser) -> bool,
    ) -> Option<ExprRef> {
        let mut current = expression.cloned();
        while let Some(next) = self.try_parse(current.as_ref(), filter) {
            current = Some(next);
        }
        current
    }

    /// Parses one complete expression with every component.
    pub fn parse_expression(&mut self) -> Option<ExprRef> {
        self.try_parse_while_not_null(None, &|_| true)
    }
}

//! Defines the expression tree produced by the token parsers.

use crate::constant::ConstantValue;
use crate::operators::{BinaryOperator, UnaryOperator};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// A shared, immutable expression node.
pub type ExprRef = Arc<Expression>;

/// One node of a parsed binding expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(ConstantValue),
    /// `target == None` is an access on the implicit data context.
    Member {
        target: Option<ExprRef>,
        name: String,
    },
    Index {
        target: ExprRef,
        args: Vec<ExprRef>,
    },
    MethodCall {
        target: Option<ExprRef>,
        method: String,
        args: Vec<ExprRef>,
        type_args: Vec<String>,
    },
    Binary {
        left: ExprRef,
        op: BinaryOperator,
        right: ExprRef,
    },
    Unary {
        op: UnaryOperator,
        operand: ExprRef,
    },
    Conditional {
        condition: ExprRef,
        if_true: ExprRef,
        if_false: ExprRef,
    },
    Lambda {
        parameters: Vec<String>,
        body: ExprRef,
    },
    Parameter {
        name: String,
    },
    /// The guarded hop of `a?.b` / `a?[i]`: evaluates to "no value" when `target` is absent.
    NullConditional {
        target: ExprRef,
    },
}

// --- Interned constants ---

static NULL: Lazy<ExprRef> = Lazy::new(|| Arc::new(Expression::Constant(ConstantValue::Null)));
static TRUE: Lazy<ExprRef> =
    Lazy::new(|| Arc::new(Expression::Constant(ConstantValue::Bool(true))));
static FALSE: Lazy<ExprRef> =
    Lazy::new(|| Arc::new(Expression::Constant(ConstantValue::Bool(false))));
static EMPTY_STRING: Lazy<ExprRef> =
    Lazy::new(|| Arc::new(Expression::Constant(ConstantValue::String(String::new()))));
static STRING_TYPE: Lazy<ExprRef> =
    Lazy::new(|| Arc::new(Expression::Constant(ConstantValue::Type("string".to_string()))));

impl Expression {
    pub fn null() -> ExprRef {
        Arc::clone(&NULL)
    }

    pub fn boolean(value: bool) -> ExprRef {
        if value {
            Arc::clone(&TRUE)
        } else {
            Arc::clone(&FALSE)
        }
    }

    pub fn empty_string() -> ExprRef {
        Arc::clone(&EMPTY_STRING)
    }

    pub fn string_type() -> ExprRef {
        Arc::clone(&STRING_TYPE)
    }

    /// Builds a constant node, reusing the interned instance for common literals.
    pub fn constant(value: impl Into<ConstantValue>) -> ExprRef {
        match value.into() {
            ConstantValue::Null => Self::null(),
            ConstantValue::Bool(b) => Self::boolean(b),
            ConstantValue::String(s) if s.is_empty() => Self::empty_string(),
            ConstantValue::Type(t) if t == "string" => Self::string_type(),
            other => Arc::new(Expression::Constant(other)),
        }
    }

    pub fn member(target: Option<ExprRef>, name: impl Into<String>) -> ExprRef {
        Arc::new(Expression::Member {
            target,
            name: name.into(),
        })
    }

    /// A member on the implicit data context.
    pub fn root_member(name: impl Into<String>) -> ExprRef {
        Self::member(None, name)
    }

    pub fn index(target: ExprRef, args: Vec<ExprRef>) -> ExprRef {
        Arc::new(Expression::Index { target, args })
    }

    pub fn method_call(
        target: Option<ExprRef>,
        method: impl Into<String>,
        args: Vec<ExprRef>,
        type_args: Vec<String>,
    ) -> ExprRef {
        Arc::new(Expression::MethodCall {
            target,
            method: method.into(),
            args,
            type_args,
        })
    }

    pub fn binary(left: ExprRef, op: BinaryOperator, right: ExprRef) -> ExprRef {
        Arc::new(Expression::Binary { left, op, right })
    }

    pub fn unary(op: UnaryOperator, operand: ExprRef) -> ExprRef {
        Arc::new(Expression::Unary { op, operand })
    }

    pub fn conditional(condition: ExprRef, if_true: ExprRef, if_false: ExprRef) -> ExprRef {
        Arc::new(Expression::Conditional {
            condition,
            if_true,
            if_false,
        })
    }

    pub fn lambda(parameters: Vec<String>, body: ExprRef) -> ExprRef {
        Arc::new(Expression::Lambda { parameters, body })
    }

    pub fn parameter(name: impl Into<String>) -> ExprRef {
        Arc::new(Expression::Parameter { name: name.into() })
    }

    pub fn null_conditional(target: ExprRef) -> ExprRef {
        Arc::new(Expression::NullConditional { target })
    }

    // --- Queries ---

    pub fn is_constant(&self) -> bool {
        matches!(self, Expression::Constant(_))
    }

    pub fn as_constant(&self) -> Option<&ConstantValue> {
        match self {
            Expression::Constant(v) => Some(v),
            _ => None,
        }
    }

    /// Short variant name, for diagnostics and logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Constant(_) => "constant",
            Expression::Member { .. } => "member",
            Expression::Index { .. } => "index",
            Expression::MethodCall { .. } => "method-call",
            Expression::Binary { .. } => "binary",
            Expression::Unary { .. } => "unary",
            Expression::Conditional { .. } => "conditional",
            Expression::Lambda { .. } => "lambda",
            Expression::Parameter { .. } => "parameter",
            Expression::NullConditional { .. } => "null-conditional",
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&ExprRef> {
        match self {
            Expression::Constant(_) | Expression::Parameter { .. } => Vec::new(),
            Expression::Member { target, .. } => target.iter().collect(),
            Expression::Index { target, args } => std::iter::once(target).chain(args).collect(),
            Expression::MethodCall { target, args, .. } => target.iter().chain(args).collect(),
            Expression::Binary { left, right, .. } => vec![left, right],
            Expression::Unary { operand, .. } => vec![operand],
            Expression::Conditional {
                condition,
                if_true,
                if_false,
            } => vec![condition, if_true, if_false],
            Expression::Lambda { body, .. } => vec![body],
            Expression::NullConditional { target } => vec![target],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_constants_are_interned() {
        assert!(Arc::ptr_eq(&Expression::null(), &Expression::constant(ConstantValue::Null)));
        assert!(Arc::ptr_eq(&Expression::boolean(true), &Expression::constant(true)));
        assert!(Arc::ptr_eq(&Expression::empty_string(), &Expression::constant("")));
        assert!(!Arc::ptr_eq(&Expression::constant(1), &Expression::constant(1)));
    }

    #[test]
    fn test_children_in_source_order() {
        let a = Expression::root_member("a");
        let one = Expression::constant(1);
        let call = Expression::method_call(Some(a.clone()), "M", vec![one.clone()], vec![]);
        let children = call.children();
        assert_eq!(children.len(), 2);
        assert!(Arc::ptr_eq(children[0], &a));
        assert!(Arc::ptr_eq(children[1], &one));
        assert_eq!(call.kind(), "method-call");
    }
}

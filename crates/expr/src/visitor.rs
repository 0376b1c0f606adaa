//! Tree rewriting.
//!
//! A visitor returns either a replacement node or `None` to keep the current
//! one. [`accept`] rebuilds only the ancestors of replaced nodes; every other
//! subtree is returned as the same `Arc`.

use crate::ast::{ExprRef, Expression};
use std::sync::Arc;

pub trait ExpressionVisitor {
    /// When `true`, children are visited before their parent.
    fn is_post_order(&self) -> bool {
        false
    }

    fn visit(&mut self, node: &ExprRef) -> Option<ExprRef>;
}

/// Runs `visitor` over the tree rooted at `node` and returns the rewritten root.
pub fn accept(node: &ExprRef, visitor: &mut dyn ExpressionVisitor) -> ExprRef {
    let post_order = visitor.is_post_order();
    if !post_order {
        if let Some(replacement) = visitor.visit(node) {
            if !Arc::ptr_eq(&replacement, node) {
                return replacement;
            }
        }
    }

    let rebuilt = accept_children(node, visitor);
    if post_order {
        if let Some(replacement) = visitor.visit(&rebuilt) {
            return replacement;
        }
    }
    rebuilt
}

fn visit_list(
    items: &[ExprRef],
    visitor: &mut dyn ExpressionVisitor,
    changed: &mut bool,
) -> Vec<ExprRef> {
    items
        .iter()
        .map(|item| visit_one(item, visitor, changed))
        .collect()
}

fn visit_one(item: &ExprRef, visitor: &mut dyn ExpressionVisitor, changed: &mut bool) -> ExprRef {
    let result = accept(item, visitor);
    if !Arc::ptr_eq(&result, item) {
        *changed = true;
    }
    result
}

fn accept_children(node: &ExprRef, visitor: &mut dyn ExpressionVisitor) -> ExprRef {
    let mut changed = false;
    let rebuilt = match node.as_ref() {
        Expression::Constant(_) | Expression::Parameter { .. } => return Arc::clone(node),
        Expression::Member { target, name } => {
            let target = target.as_ref().map(|t| visit_one(t, visitor, &mut changed));
            Expression::Member {
                target,
                name: name.clone(),
            }
        }
        Expression::Index { target, args } => {
            let target = visit_one(target, visitor, &mut changed);
            let args = visit_list(args, visitor, &mut changed);
            Expression::Index { target, args }
        }
        Expression::MethodCall {
            target,
            method,
            args,
            type_args,
        } => {
            let target = target.as_ref().map(|t| visit_one(t, visitor, &mut changed));
            let args = visit_list(args, visitor, &mut changed);
            Expression::MethodCall {
                target,
                method: method.clone(),
                args,
                type_args: type_args.clone(),
            }
        }
        Expression::Binary { left, op, right } => {
            let left = visit_one(left, visitor, &mut changed);
            let right = visit_one(right, visitor, &mut changed);
            Expression::Binary {
                left,
                op: *op,
                right,
            }
        }
        Expression::Unary { op, operand } => Expression::Unary {
            op: *op,
            operand: visit_one(operand, visitor, &mut changed),
        },
        Expression::Conditional {
            condition,
            if_true,
            if_false,
        } => {
            let condition = visit_one(condition, visitor, &mut changed);
            let if_true = visit_one(if_true, visitor, &mut changed);
            let if_false = visit_one(if_false, visitor, &mut changed);
            Expression::Conditional {
                condition,
                if_true,
                if_false,
            }
        }
        Expression::Lambda { parameters, body } => Expression::Lambda {
            parameters: parameters.clone(),
            body: visit_one(body, visitor, &mut changed),
        },
        Expression::NullConditional { target } => Expression::NullConditional {
            target: visit_one(target, visitor, &mut changed),
        },
    };

    if changed {
        Arc::new(rebuilt)
    } else {
        Arc::clone(node)
    }
}

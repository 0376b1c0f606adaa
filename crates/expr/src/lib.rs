//! Expression tree for binding expressions.
//!
//! Nodes are shared through [`ExprRef`] (`Arc<Expression>`) and never mutated
//! after construction. Rewrites go through [`visitor::accept`], which returns
//! the same `Arc` for every subtree it did not change.

pub mod analysis;
pub mod ast;
pub mod constant;
mod display;
pub mod operators;
pub mod visitor;

pub use analysis::{member_path_text, walk};
pub use ast::{ExprRef, Expression};
pub use constant::{ConstantType, ConstantValue};
pub use operators::{BinaryOperator, UnaryOperator};
pub use visitor::{ExpressionVisitor, accept};

pub use num_bigint::BigUint;

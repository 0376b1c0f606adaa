//! Canonical textual rendering.
//!
//! The output reparses to a structurally-equal tree: binary, conditional and
//! lambda nodes are always parenthesised, and numeric constants carry the
//! suffix that selects their type.

use crate::ast::Expression;
use crate::constant::ConstantValue;
use crate::operators::UnaryOperator;
use std::fmt::{self, Write};

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(value) => fmt_constant(value, f),
            Expression::Member { target, name } => {
                if let Some(target) = target {
                    fmt_target(target, f)?;
                    f.write_char('.')?;
                }
                f.write_str(name)
            }
            Expression::Index { target, args } => {
                fmt_target(target, f)?;
                f.write_char('[')?;
                fmt_list(args.iter().map(|a| a.as_ref()), f)?;
                f.write_char(']')
            }
            Expression::MethodCall {
                target,
                method,
                args,
                type_args,
            } => {
                if let Some(target) = target {
                    fmt_target(target, f)?;
                    f.write_char('.')?;
                }
                f.write_str(method)?;
                if !type_args.is_empty() {
                    write!(f, "<{}>", type_args.join(", "))?;
                }
                f.write_char('(')?;
                fmt_list(args.iter().map(|a| a.as_ref()), f)?;
                f.write_char(')')
            }
            Expression::Binary { left, op, right } => write!(f, "({} {} {})", left, op, right),
            Expression::Unary { op, operand } => match operand.as_ref() {
                // `$($x)` must not collapse into `$$x`.
                Expression::Unary { .. } => write!(f, "{}({})", op, operand),
                // `$"a"` would reparse as an interpolated string.
                Expression::Constant(ConstantValue::String(_))
                    if *op == UnaryOperator::DynamicMacro =>
                {
                    write!(f, "{}({})", op, operand)
                }
                _ => write!(f, "{}{}", op, operand),
            },
            Expression::Conditional {
                condition,
                if_true,
                if_false,
            } => write!(f, "({} ? {} : {})", condition, if_true, if_false),
            Expression::Lambda { parameters, body } => {
                write!(f, "(({}) => {})", parameters.join(", "), body)
            }
            Expression::Parameter { name } => f.write_str(name),
            Expression::NullConditional { target } => {
                fmt_target(target, f)?;
                f.write_char('?')
            }
        }
    }
}

/// Renders the left side of a postfix access; a unary target needs parentheses
/// so that `(-a).b` does not reparse as `-(a.b)`.
fn fmt_target(target: &Expression, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match target {
        Expression::Unary { .. } => write!(f, "({})", target),
        _ => write!(f, "{}", target),
    }
}

fn fmt_list<'a>(
    items: impl Iterator<Item = &'a Expression>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn fmt_constant(value: &ConstantValue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        ConstantValue::Null => f.write_str("null"),
        ConstantValue::Bool(b) => write!(f, "{}", b),
        ConstantValue::Int32(v) => write!(f, "{}", v),
        ConstantValue::Int64(v) => write!(f, "{}L", v),
        ConstantValue::UInt32(v) => write!(f, "{}U", v),
        ConstantValue::UInt64(v) => write!(f, "{}UL", v),
        ConstantValue::BigInteger(v) => write!(f, "{}", v),
        ConstantValue::Single(v) => write!(f, "{:?}F", v),
        ConstantValue::Double(v) => write!(f, "{:?}", v),
        ConstantValue::Decimal(v) => write!(f, "{}M", v),
        ConstantValue::String(s) => write_quoted(s, f),
        ConstantValue::Type(name) => f.write_str(name),
    }
}

/// Writes `s` as a regular (non-verbatim) double-quoted literal.
pub(crate) fn write_quoted(s: &str, f: &mut impl Write) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\0' => f.write_str("\\0")?,
            c if c.is_control() => write!(f, "\\u{:04X}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

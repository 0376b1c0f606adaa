use crate::component::{TokenParser, priority};
use crate::context::ParserContext;
use bindpath_expr::{BigUint, ConstantValue, ExprRef, Expression};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Numeric literals. The suffix selects the type:
///
/// | suffix      | type                                  |
/// |-------------|---------------------------------------|
/// | `f`         | 32-bit float                          |
/// | `d`         | 64-bit float                          |
/// | `m`         | decimal                               |
/// | `u`         | `u32`, or `u64` when it does not fit  |
/// | `l`         | `i64`, or `u64` when it does not fit  |
/// | `ul` / `lu` | `u64`                                 |
/// | none        | `i32 -> i64 -> u64 -> BigUint` for integers, `f64` otherwise |
#[derive(Debug, Default, Clone, Copy)]
pub struct DigitTokenParser;

struct Literal {
    text: String,
    is_real: bool,
    has_exponent: bool,
}

impl TokenParser for DigitTokenParser {
    fn priority(&self) -> i32 {
        priority::DIGIT
    }

    fn name(&self) -> &'static str {
        "digit"
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
        let begin = ctx.position();
        let leading_dot = ctx.is_token(".") && ctx.is_digit(begin + 1);
        if !ctx.is_digit(begin) && !leading_dot {
            ctx.set_position(start);
            return None;
        }

        let Some(literal) = scan(ctx, begin) else {
            ctx.set_position(start);
            return None;
        };

        let suffix_start = ctx.position();
        while ctx.current().is_some_and(|c| c.is_ascii_alphabetic()) {
            ctx.move_next(1);
        }
        let suffix = ctx.slice(suffix_start, ctx.position()).to_ascii_lowercase();

        match convert(&literal, &suffix) {
            Ok(value) => Some(Expression::constant(value)),
            Err(message) => {
                ctx.add_error_at(message, begin);
                ctx.set_position(start);
                None
            }
        }
    }
}

/// Consumes the digits, fraction and exponent starting at `begin`.
fn scan(ctx: &mut ParserContext<'_>, begin: usize) -> Option<Literal> {
    let mut is_real = false;
    let mut has_exponent = false;
    while ctx.is_digit(ctx.position()) {
        ctx.move_next(1);
    }
    // `1.ToString()` is a member access, not a fraction.
    if ctx.is_token(".") && ctx.is_digit(ctx.position() + 1) {
        is_real = true;
        ctx.move_next(1);
        while ctx.is_digit(ctx.position()) {
            ctx.move_next(1);
        }
    }
    if matches!(ctx.current(), Some('e' | 'E')) {
        let exponent_start = ctx.position();
        ctx.move_next(1);
        if matches!(ctx.current(), Some('+' | '-')) {
            ctx.move_next(1);
        }
        if !ctx.is_digit(ctx.position()) {
            let text = ctx.slice(begin, ctx.position());
            ctx.add_error_at(
                format!("Malformed exponent in numeric literal '{}'", text),
                exponent_start,
            );
            return None;
        }
        while ctx.is_digit(ctx.position()) {
            ctx.move_next(1);
        }
        is_real = true;
        has_exponent = true;
    }
    let mut text = ctx.slice(begin, ctx.position());
    if text.starts_with('.') {
        text.insert(0, '0');
    }
    Some(Literal {
        text,
        is_real,
        has_exponent,
    })
}

fn convert(literal: &Literal, suffix: &str) -> Result<ConstantValue, String> {
    let text = literal.text.as_str();
    let invalid = || format!("Invalid numeric literal '{}{}'", text, suffix);
    match suffix {
        "f" => text
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .map(ConstantValue::Single)
            .ok_or_else(invalid),
        "d" => parse_f64(text).map(ConstantValue::Double).ok_or_else(invalid),
        "m" => {
            let parsed = if literal.has_exponent {
                Decimal::from_scientific(text)
            } else {
                Decimal::from_str(text)
            };
            parsed.map(ConstantValue::Decimal).map_err(|_| invalid())
        }
        "u" | "l" | "ul" | "lu" if literal.is_real => {
            Err(format!("Suffix '{}' is not valid for the real literal '{}'", suffix, text))
        }
        "u" => {
            let value = parse_u64(text)?;
            Ok(u32::try_from(value)
                .map(ConstantValue::UInt32)
                .unwrap_or(ConstantValue::UInt64(value)))
        }
        "l" => match text.parse::<i64>() {
            Ok(value) => Ok(ConstantValue::Int64(value)),
            Err(_) => parse_u64(text).map(ConstantValue::UInt64),
        },
        "ul" | "lu" => parse_u64(text).map(ConstantValue::UInt64),
        "" if literal.is_real => parse_f64(text).map(ConstantValue::Double).ok_or_else(invalid),
        "" => {
            if let Ok(value) = text.parse::<i32>() {
                Ok(ConstantValue::Int32(value))
            } else if let Ok(value) = text.parse::<i64>() {
                Ok(ConstantValue::Int64(value))
            } else if let Ok(value) = text.parse::<u64>() {
                Ok(ConstantValue::UInt64(value))
            } else {
                BigUint::from_str(text)
                    .map(ConstantValue::BigInteger)
                    .map_err(|_| invalid())
            }
        }
        other => Err(format!("Unknown numeric suffix '{}' in '{}{}'", other, text, other)),
    }
}

/// Out-of-range reals parse to infinity; those are rejected.
fn parse_f64(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_u64(text: &str) -> Result<u64, String> {
    text.parse::<u64>()
        .map_err(|_| format!("Integral constant is too large: '{}'", text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::run;

    fn value(text: &str) -> ConstantValue {
        let (result, ctx) = run(&DigitTokenParser, text, None);
        assert!(!ctx.has_errors(), "{}", ctx.diagnostics());
        match result.as_deref() {
            Some(Expression::Constant(v)) => v.clone(),
            other => panic!("expected constant for {:?}, got {:?}", text, other),
        }
    }

    fn rejects(text: &str) -> String {
        let (result, ctx) = run(&DigitTokenParser, text, None);
        assert!(result.is_none());
        assert_eq!(ctx.position(), 0);
        ctx.diagnostics().iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_integer_promotion() {
        assert_eq!(value("42"), ConstantValue::Int32(42));
        assert_eq!(value("3000000000"), ConstantValue::Int64(3_000_000_000));
        assert_eq!(value("18446744073709551615"), ConstantValue::UInt64(u64::MAX));
        assert_eq!(
            value("18446744073709551616"),
            ConstantValue::BigInteger(BigUint::from(u64::MAX) + 1u32)
        );
        assert!(rejects("18446744073709551616UL").contains("too large"));
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(value("1.5f"), ConstantValue::Single(1.5));
        assert_eq!(value("2D"), ConstantValue::Double(2.0));
        assert_eq!(value("1.25m"), ConstantValue::Decimal(Decimal::new(125, 2)));
        assert_eq!(value("5u"), ConstantValue::UInt32(5));
        assert_eq!(value("5000000000U"), ConstantValue::UInt64(5_000_000_000));
        assert_eq!(value("5L"), ConstantValue::Int64(5));
        assert_eq!(value("7UL"), ConstantValue::UInt64(7));
        assert_eq!(value("7lu"), ConstantValue::UInt64(7));
    }

    #[test]
    fn test_reals_and_exponents() {
        assert_eq!(value("0.5"), ConstantValue::Double(0.5));
        assert_eq!(value(".5"), ConstantValue::Double(0.5));
        assert_eq!(value("1e3"), ConstantValue::Double(1000.0));
        assert_eq!(value("2.5E-1"), ConstantValue::Double(0.25));
        assert_eq!(value("1e2m"), ConstantValue::Decimal(Decimal::new(100, 0)));
    }

    #[test]
    fn test_malformed_literals_are_reported() {
        assert!(rejects("1e").contains("Malformed exponent"));
        assert!(rejects("1e+x").contains("Malformed exponent"));
        assert!(rejects("12abc").contains("Unknown numeric suffix"));
        assert!(rejects("1.5u").contains("not valid"));
    }

    #[test]
    fn test_out_of_range_reals_are_reported() {
        assert!(rejects("1e400").contains("Invalid numeric literal '1e400'"));
        assert!(rejects("1e400d").contains("Invalid numeric literal"));
        assert!(rejects("1e50f").contains("Invalid numeric literal '1e50f'"));
        assert_eq!(value("3.4e38f"), ConstantValue::Single(3.4e38));
    }

    #[test]
    fn test_dot_without_digit_is_left_for_member_access() {
        let (result, ctx) = run(&DigitTokenParser, "1.ToString()", None);
        assert_eq!(*result.unwrap(), Expression::Constant(ConstantValue::Int32(1)));
        assert_eq!(ctx.position(), 1);
    }

    #[test]
    fn test_not_a_number() {
        let (result, ctx) = run(&DigitTokenParser, "abc", None);
        assert!(result.is_none());
        assert_eq!(ctx.position(), 0);
        assert!(!ctx.has_errors());
    }
}

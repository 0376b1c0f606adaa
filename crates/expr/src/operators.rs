//! Binary and unary operators with their source tokens and folding priorities.

use std::fmt;

/// A binary operator. Higher [`BinaryOperator::priority`] binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Multiplicative
    Multiply,
    Divide,
    Remainder,
    // Additive
    Add,
    Subtract,
    // Shift
    LeftShift,
    RightShift,
    // Relational
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    // Equality
    Equal,
    NotEqual,
    // Bitwise / logical
    And,
    ExclusiveOr,
    Or,
    ConditionalAnd,
    ConditionalOr,
    NullCoalescing,
    /// Produced only by the assignment token parser.
    Assign,
}

impl BinaryOperator {
    /// Operators recognised inside a binary run, longest token first so that
    /// `<<` wins over `<` and `??` over any single-character prefix.
    pub const MATCH_ORDER: [BinaryOperator; 19] = [
        BinaryOperator::LeftShift,
        BinaryOperator::RightShift,
        BinaryOperator::LessThanOrEqual,
        BinaryOperator::GreaterThanOrEqual,
        BinaryOperator::Equal,
        BinaryOperator::NotEqual,
        BinaryOperator::ConditionalAnd,
        BinaryOperator::ConditionalOr,
        BinaryOperator::NullCoalescing,
        BinaryOperator::Multiply,
        BinaryOperator::Divide,
        BinaryOperator::Remainder,
        BinaryOperator::Add,
        BinaryOperator::Subtract,
        BinaryOperator::LessThan,
        BinaryOperator::GreaterThan,
        BinaryOperator::And,
        BinaryOperator::ExclusiveOr,
        BinaryOperator::Or,
    ];

    pub fn token(self) -> &'static str {
        match self {
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::And => "&",
            BinaryOperator::ExclusiveOr => "^",
            BinaryOperator::Or => "|",
            BinaryOperator::ConditionalAnd => "&&",
            BinaryOperator::ConditionalOr => "||",
            BinaryOperator::NullCoalescing => "??",
            BinaryOperator::Assign => "=",
        }
    }

    pub fn priority(self) -> u16 {
        match self {
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Remainder => 990,
            BinaryOperator::Add | BinaryOperator::Subtract => 980,
            BinaryOperator::LeftShift | BinaryOperator::RightShift => 970,
            BinaryOperator::LessThan
            | BinaryOperator::GreaterThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::GreaterThanOrEqual => 960,
            BinaryOperator::Equal | BinaryOperator::NotEqual => 950,
            BinaryOperator::And => 940,
            BinaryOperator::ExclusiveOr => 930,
            BinaryOperator::Or => 920,
            BinaryOperator::ConditionalAnd => 910,
            BinaryOperator::ConditionalOr => 900,
            BinaryOperator::NullCoalescing => 890,
            BinaryOperator::Assign => 10,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A prefix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Minus,
    Plus,
    LogicalNegation,
    BitwiseNegation,
    /// `$`: a dynamic resource-style macro expression.
    DynamicMacro,
    /// `$$`: a static resource-style macro expression.
    StaticMacro,
}

impl UnaryOperator {
    /// Longest token first: `$$` must be tried before `$`.
    pub const MATCH_ORDER: [UnaryOperator; 6] = [
        UnaryOperator::StaticMacro,
        UnaryOperator::DynamicMacro,
        UnaryOperator::Minus,
        UnaryOperator::Plus,
        UnaryOperator::LogicalNegation,
        UnaryOperator::BitwiseNegation,
    ];

    pub fn token(self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::LogicalNegation => "!",
            UnaryOperator::BitwiseNegation => "~",
            UnaryOperator::DynamicMacro => "$",
            UnaryOperator::StaticMacro => "$$",
        }
    }

    pub fn is_macro(self) -> bool {
        matches!(self, UnaryOperator::DynamicMacro | UnaryOperator::StaticMacro)
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

use crate::types::SqlValue;

/// Operators a `param(..)` can be compared with.
///
/// Every operator contributes a single `?` slot to the SQL text. The `LIKE` family puts its `%`
/// wildcards into the bound value, never into the SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equals,
    BiggerThan,
    SmallerThan,
    BiggerThanOrEquals,
    SmallerThanOrEquals,
    DifferentFrom,
    /// `%value`
    LikeLeft,
    /// `value%`
    LikeRight,
    /// `%value%`
    Like,
}

impl Comparison {
    /// SQL appended after the parameter name, placeholder included.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Comparison::Equals => " = ? ",
            Comparison::BiggerThan => " > ? ",
            Comparison::SmallerThan => " < ? ",
            Comparison::BiggerThanOrEquals => " >= ? ",
            Comparison::SmallerThanOrEquals => " <= ? ",
            Comparison::DifferentFrom => " <> ? ",
            Comparison::LikeLeft | Comparison::LikeRight | Comparison::Like => " LIKE ? ",
        }
    }

    /// The value that gets bound for this operator.
    #[must_use]
    pub fn wrap(self, value: SqlValue) -> SqlValue {
        match self {
            Comparison::LikeLeft => SqlValue::Text(format!("%{value}")),
            Comparison::LikeRight => SqlValue::Text(format!("{value}%")),
            Comparison::Like => SqlValue::Text(format!("%{value}%")),
            _ => value,
        }
    }
}

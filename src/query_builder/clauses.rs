use crate::driver::Connection;
use crate::types::SqlValue;

use super::{Comparison, StatementBuilder};

impl<C: Connection> StatementBuilder<C> {
    /// Append ` WHERE `.
    ///
    /// Calling it twice for the same command produces malformed SQL; the builder does not
    /// correct it.
    pub fn where_(&mut self) -> &mut Self {
        self.sql.push_str(" WHERE ");
        self
    }

    /// Append a column name and record it. No slot and no value are added; the comparison that
    /// follows supplies both.
    pub fn param(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.sql.push_str(&name);
        self.params.push(name);
        self
    }

    /// Append `comparison`'s operator and slot, and record the (possibly wrapped) value.
    pub fn compare(&mut self, comparison: Comparison, value: impl Into<SqlValue>) -> &mut Self {
        self.sql.push_str(comparison.token());
        self.values.push(comparison.wrap(value.into()));
        self
    }

    /// `= ?`
    pub fn equals_value(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.compare(Comparison::Equals, value)
    }

    /// `> ?`
    pub fn bigger_than(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.compare(Comparison::BiggerThan, value)
    }

    /// `< ?`
    pub fn smaller_than(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.compare(Comparison::SmallerThan, value)
    }

    /// `>= ?`
    pub fn bigger_than_or_equals(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.compare(Comparison::BiggerThanOrEquals, value)
    }

    /// `<= ?`
    pub fn smaller_than_or_equals(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.compare(Comparison::SmallerThanOrEquals, value)
    }

    /// `<> ?`
    pub fn different_from(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.compare(Comparison::DifferentFrom, value)
    }

    /// `LIKE ?` bound to `%value`.
    pub fn like_left(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.compare(Comparison::LikeLeft, value)
    }

    /// `LIKE ?` bound to `value%`.
    pub fn like_right(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.compare(Comparison::LikeRight, value)
    }

    /// `LIKE ?` bound to `%value%`.
    pub fn like(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.compare(Comparison::Like, value)
    }

    /// Append `AND `; the caller supplies the `param`/comparison pairs around it.
    pub fn and(&mut self) -> &mut Self {
        self.sql.push_str("AND ");
        self
    }

    /// Append `OR `.
    pub fn or(&mut self) -> &mut Self {
        self.sql.push_str("OR ");
        self
    }

    /// Append ` ORDER BY column`. Without it the row order of a fetch is whatever the database
    /// returns.
    pub fn order_by(&mut self, column: &str) -> &mut Self {
        self.sql.push_str(" ORDER BY ");
        self.sql.push_str(column);
        self
    }
}

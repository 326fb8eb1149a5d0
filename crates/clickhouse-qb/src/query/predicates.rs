//! PREWHERE / WHERE / HAVING method families.
//!
//! The three sections share one set of operations; `predicate_methods!`
//! generates them for each section so their behavior cannot drift apart.

use super::predicate::{IntoColumnOperand, Operand};
use super::{QueryBuilder, Section};
use crate::enums::{Conjunction, Operator};
use crate::ident::Expression;
use crate::value::Value;

macro_rules! predicate_methods {
    (
        $section:expr;
        base: $base:ident, $or_base:ident;
        eq: $eq:ident, $or_eq:ident;
        raw: $raw:ident, $or_raw:ident;
        membership: { $($in:ident, $or_in:ident => $in_op:ident;)+ }
        between: { $($between:ident, $or_between:ident => $between_op:ident;)+ }
        between_columns: { $($between_cols:ident, $or_between_cols:ident => $between_cols_op:ident;)+ }
        group: $group:ident, $or_group:ident;
        dict: $dict:ident, $or_dict:ident;
    ) => {
        impl QueryBuilder {
            /// Append `first <operator> second`, joined with AND.
            pub fn $base(
                self,
                first: impl IntoColumnOperand,
                operator: Operator,
                second: impl Into<Operand>,
            ) -> Self {
                self.add_compare($section, first.into_operand(), operator, second.into(), Conjunction::And)
            }

            /// Append `first <operator> second`, joined with OR.
            pub fn $or_base(
                self,
                first: impl IntoColumnOperand,
                operator: Operator,
                second: impl Into<Operand>,
            ) -> Self {
                self.add_compare($section, first.into_operand(), operator, second.into(), Conjunction::Or)
            }

            /// Append `first = second`; lists compile as `IN`.
            pub fn $eq(self, first: impl IntoColumnOperand, second: impl Into<Operand>) -> Self {
                self.add_eq($section, first.into_operand(), second.into(), Conjunction::And)
            }

            pub fn $or_eq(self, first: impl IntoColumnOperand, second: impl Into<Operand>) -> Self {
                self.add_eq($section, first.into_operand(), second.into(), Conjunction::Or)
            }

            /// Append a raw fragment.
            pub fn $raw(self, expression: impl Into<Expression>) -> Self {
                self.add_raw($section, expression.into(), Conjunction::And)
            }

            pub fn $or_raw(self, expression: impl Into<Expression>) -> Self {
                self.add_raw($section, expression.into(), Conjunction::Or)
            }

            $(
                pub fn $in(self, first: impl IntoColumnOperand, values: impl Into<Operand>) -> Self {
                    self.add_in($section, first.into_operand(), Operator::$in_op, values.into(), Conjunction::And)
                }

                pub fn $or_in(self, first: impl IntoColumnOperand, values: impl Into<Operand>) -> Self {
                    self.add_in($section, first.into_operand(), Operator::$in_op, values.into(), Conjunction::Or)
                }
            )+

            $(
                pub fn $between(
                    self,
                    first: impl IntoColumnOperand,
                    from: impl Into<Operand>,
                    to: impl Into<Operand>,
                ) -> Self {
                    self.add_between($section, first.into_operand(), Operator::$between_op, from.into(), to.into(), Conjunction::And)
                }

                pub fn $or_between(
                    self,
                    first: impl IntoColumnOperand,
                    from: impl Into<Operand>,
                    to: impl Into<Operand>,
                ) -> Self {
                    self.add_between($section, first.into_operand(), Operator::$between_op, from.into(), to.into(), Conjunction::Or)
                }
            )+

            $(
                /// Range bounds are columns, not literals.
                pub fn $between_cols(
                    self,
                    first: impl IntoColumnOperand,
                    from: impl IntoColumnOperand,
                    to: impl IntoColumnOperand,
                ) -> Self {
                    self.add_between($section, first.into_operand(), Operator::$between_cols_op, from.into_operand(), to.into_operand(), Conjunction::And)
                }

                pub fn $or_between_cols(
                    self,
                    first: impl IntoColumnOperand,
                    from: impl IntoColumnOperand,
                    to: impl IntoColumnOperand,
                ) -> Self {
                    self.add_between($section, first.into_operand(), Operator::$between_cols_op, from.into_operand(), to.into_operand(), Conjunction::Or)
                }
            )+

            /// Append a parenthesized group built by `f` on a fresh query.
            pub fn $group(self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
                self.add_group($section, f, Conjunction::And)
            }

            pub fn $or_group(self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
                self.add_group($section, f, Conjunction::Or)
            }

            /// Compare a `dictGetString` lookup.
            pub fn $dict(
                self,
                dict: &str,
                attribute: &str,
                key: impl Into<Value>,
                operator: Operator,
                value: impl Into<Operand>,
            ) -> Self {
                self.add_dict($section, dict, attribute, key.into(), operator, value.into(), Conjunction::And)
            }

            pub fn $or_dict(
                self,
                dict: &str,
                attribute: &str,
                key: impl Into<Value>,
                operator: Operator,
                value: impl Into<Operand>,
            ) -> Self {
                self.add_dict($section, dict, attribute, key.into(), operator, value.into(), Conjunction::Or)
            }
        }
    };
}

predicate_methods! {
    Section::PreWhere;
    base: pre_where, or_pre_where;
    eq: pre_where_eq, or_pre_where_eq;
    raw: pre_where_raw, or_pre_where_raw;
    membership: {
        pre_where_in, or_pre_where_in => In;
        pre_where_not_in, or_pre_where_not_in => NotIn;
        pre_where_global_in, or_pre_where_global_in => GlobalIn;
        pre_where_global_not_in, or_pre_where_global_not_in => GlobalNotIn;
    }
    between: {
        pre_where_between, or_pre_where_between => Between;
        pre_where_not_between, or_pre_where_not_between => NotBetween;
    }
    between_columns: {
        pre_where_between_columns, or_pre_where_between_columns => Between;
        pre_where_not_between_columns, or_pre_where_not_between_columns => NotBetween;
    }
    group: pre_where_group, or_pre_where_group;
    dict: pre_where_dict, or_pre_where_dict;
}

predicate_methods! {
    Section::Where;
    base: where_, or_where;
    eq: where_eq, or_where_eq;
    raw: where_raw, or_where_raw;
    membership: {
        where_in, or_where_in => In;
        where_not_in, or_where_not_in => NotIn;
        where_global_in, or_where_global_in => GlobalIn;
        where_global_not_in, or_where_global_not_in => GlobalNotIn;
    }
    between: {
        where_between, or_where_between => Between;
        where_not_between, or_where_not_between => NotBetween;
    }
    between_columns: {
        where_between_columns, or_where_between_columns => Between;
        where_not_between_columns, or_where_not_between_columns => NotBetween;
    }
    group: where_group, or_where_group;
    dict: where_dict, or_where_dict;
}

predicate_methods! {
    Section::Having;
    base: having, or_having;
    eq: having_eq, or_having_eq;
    raw: having_raw, or_having_raw;
    membership: {
        having_in, or_having_in => In;
        having_not_in, or_having_not_in => NotIn;
        having_global_in, or_having_global_in => GlobalIn;
        having_global_not_in, or_having_global_not_in => GlobalNotIn;
    }
    between: {
        having_between, or_having_between => Between;
        having_not_between, or_having_not_between => NotBetween;
    }
    between_columns: {
        having_between_columns, or_having_between_columns => Between;
        having_not_between_columns, or_having_not_between_columns => NotBetween;
    }
    group: having_group, or_having_group;
    dict: having_dict, or_having_dict;
}

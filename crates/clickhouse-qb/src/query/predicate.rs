//! Two-element logic expressions used by PREWHERE, WHERE, HAVING and JOIN ON.

use super::QueryBuilder;
use super::column::Column;
use crate::enums::{Conjunction, Operator};
use crate::ident::{Expression, Identifier};
use crate::value::{Tuple, Value};
use chrono::{NaiveDate, NaiveDateTime};

/// One side of a predicate.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Literal, identifier or raw expression.
    Value(Value),
    /// Parenthesized literal list.
    Tuple(Tuple),
    Column(Box<Column>),
    /// Parenthesized nested predicate list.
    Group(Vec<Predicate>),
    /// Nested predicate rendered without parentheses (`1 AND 2` after BETWEEN).
    Predicate(Box<Predicate>),
    /// Parenthesized sub-query.
    Query(Box<QueryBuilder>),
}

impl Operand {
    /// Literal lists (tuples and array values) as a tuple.
    pub(crate) fn into_tuple(self) -> Result<Tuple, Operand> {
        match self {
            Operand::Tuple(t) => Ok(t),
            Operand::Value(Value::Array(items)) => Ok(items.into_iter().collect()),
            other => Err(other),
        }
    }

    pub(crate) fn is_list(&self) -> bool {
        matches!(self, Operand::Tuple(_) | Operand::Value(Value::Array(_)))
    }
}

/// A relation `first <operator> second`, linked to the previous predicate by
/// its conjunction.
///
/// Without an operator the predicate degenerates to its first element, which
/// is how raw fragments are stored.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub first: Operand,
    pub operator: Option<Operator>,
    pub second: Option<Operand>,
    pub conjunction: Conjunction,
}

impl Predicate {
    pub fn new(
        first: impl IntoColumnOperand,
        operator: Option<Operator>,
        second: Option<Operand>,
        conjunction: Conjunction,
    ) -> Self {
        Self {
            first: first.into_operand(),
            operator,
            second,
            conjunction,
        }
    }

    /// `first <operator> second` joined with AND.
    pub fn and(first: impl IntoColumnOperand, operator: Operator, second: impl Into<Operand>) -> Self {
        Self::new(first, Some(operator), Some(second.into()), Conjunction::And)
    }

    /// `first <operator> second` joined with OR.
    pub fn or(first: impl IntoColumnOperand, operator: Operator, second: impl Into<Operand>) -> Self {
        Self::new(first, Some(operator), Some(second.into()), Conjunction::Or)
    }

    /// A raw SQL fragment.
    pub fn raw(expression: impl Into<Expression>, conjunction: Conjunction) -> Self {
        Self::new(expression.into(), None, None, conjunction)
    }

    /// `from AND to`, the right-hand side of BETWEEN.
    pub(crate) fn range(from: Operand, to: Operand) -> Self {
        Self {
            first: from,
            operator: Some(Operator::And),
            second: Some(to),
            conjunction: Conjunction::And,
        }
    }
}

/// Conversion for the left-hand side of a predicate.
///
/// Unlike `Into<Operand>`, strings become identifiers here.
pub trait IntoColumnOperand {
    fn into_operand(self) -> Operand;
}

impl IntoColumnOperand for &str {
    fn into_operand(self) -> Operand {
        Operand::Value(Value::Identifier(Identifier::new(self)))
    }
}

impl IntoColumnOperand for String {
    fn into_operand(self) -> Operand {
        Operand::Value(Value::Identifier(Identifier::new(self)))
    }
}

impl IntoColumnOperand for &String {
    fn into_operand(self) -> Operand {
        Operand::Value(Value::Identifier(Identifier::new(self.as_str())))
    }
}

impl IntoColumnOperand for Identifier {
    fn into_operand(self) -> Operand {
        Operand::Value(Value::Identifier(self))
    }
}

impl IntoColumnOperand for Expression {
    fn into_operand(self) -> Operand {
        Operand::Value(Value::Expression(self))
    }
}

impl IntoColumnOperand for Value {
    fn into_operand(self) -> Operand {
        Operand::Value(self)
    }
}

impl IntoColumnOperand for i64 {
    fn into_operand(self) -> Operand {
        Operand::Value(Value::Int(self))
    }
}

impl IntoColumnOperand for i32 {
    fn into_operand(self) -> Operand {
        Operand::Value(Value::Int(i64::from(self)))
    }
}

impl IntoColumnOperand for Column {
    fn into_operand(self) -> Operand {
        Operand::Column(Box::new(self))
    }
}

impl IntoColumnOperand for QueryBuilder {
    fn into_operand(self) -> Operand {
        Operand::Query(Box::new(self))
    }
}

impl IntoColumnOperand for Tuple {
    fn into_operand(self) -> Operand {
        Operand::Tuple(self)
    }
}

impl IntoColumnOperand for Predicate {
    fn into_operand(self) -> Operand {
        Operand::Predicate(Box::new(self))
    }
}

impl IntoColumnOperand for Operand {
    fn into_operand(self) -> Operand {
        self
    }
}

macro_rules! operand_from_value {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Value(Value::from(v))
                }
            }
        )+
    };
}

operand_from_value!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool,
    &str, String, &String, Identifier, Expression, NaiveDate, NaiveDateTime, uuid::Uuid
);

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Value(Value::from(v))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(v: Vec<T>) -> Self {
        Operand::Tuple(v.into_iter().collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Operand {
    fn from(v: [T; N]) -> Self {
        Operand::Tuple(v.into_iter().collect())
    }
}

impl From<Tuple> for Operand {
    fn from(v: Tuple) -> Self {
        Operand::Tuple(v)
    }
}

impl From<Column> for Operand {
    fn from(v: Column) -> Self {
        Operand::Column(Box::new(v))
    }
}

impl From<QueryBuilder> for Operand {
    fn from(v: QueryBuilder) -> Self {
        Operand::Query(Box::new(v))
    }
}

impl From<Predicate> for Operand {
    fn from(v: Predicate) -> Self {
        Operand::Predicate(Box::new(v))
    }
}

//! Selected columns and their function pipeline.

use super::{QueryBuilder, QuerySource};
use crate::enums::Operator;
use crate::ident::{Expression, Identifier};
use crate::value::Value;

/// What a column selects: a value, a nested column or a scalar sub-query.
#[derive(Debug, Clone)]
pub enum ColumnName {
    Value(Value),
    Nested(Box<Column>),
    Query(Box<QueryBuilder>),
}

impl ColumnName {
    fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            ColumnName::Value(Value::Identifier(ident)) => Some(ident),
            _ => None,
        }
    }
}

impl From<&str> for ColumnName {
    fn from(v: &str) -> Self {
        ColumnName::Value(Value::Identifier(Identifier::new(v)))
    }
}

impl From<String> for ColumnName {
    fn from(v: String) -> Self {
        ColumnName::Value(Value::Identifier(Identifier::new(v)))
    }
}

impl From<&String> for ColumnName {
    fn from(v: &String) -> Self {
        ColumnName::Value(Value::Identifier(Identifier::new(v.as_str())))
    }
}

impl From<Identifier> for ColumnName {
    fn from(v: Identifier) -> Self {
        ColumnName::Value(Value::Identifier(v))
    }
}

impl From<Expression> for ColumnName {
    fn from(v: Expression) -> Self {
        ColumnName::Value(Value::Expression(v))
    }
}

impl From<Value> for ColumnName {
    fn from(v: Value) -> Self {
        ColumnName::Value(v)
    }
}

impl From<Column> for ColumnName {
    fn from(v: Column) -> Self {
        ColumnName::Nested(Box::new(v))
    }
}

impl From<QueryBuilder> for ColumnName {
    fn from(v: QueryBuilder) -> Self {
        ColumnName::Query(Box::new(v))
    }
}

macro_rules! column_name_from_number {
    ($($t:ty),+) => {
        $(
            impl From<$t> for ColumnName {
                fn from(v: $t) -> Self {
                    ColumnName::Value(Value::from(v))
                }
            }
        )+
    };
}

column_name_from_number!(i32, i64, u32, u64, f64);

/// One step of the column function pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFunction {
    Sum,
    Round(i32),
    Plus(Value),
    Multiple(Value),
    RunningDifference,
    Count,
    Distinct,
    SumIf(Operator, Value),
}

/// A selected value: name, optional alias and ordered function wrappers.
///
/// Functions compose innermost-first: `.sum().round(2)` renders
/// `round(sum(col), 2)`.
#[derive(Debug, Clone, Default)]
pub struct Column {
    pub(crate) name: Option<ColumnName>,
    pub(crate) alias: Option<Identifier>,
    pub(crate) functions: Vec<ColumnFunction>,
}

impl Column {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `Column::new().name(name)`.
    pub fn named(name: impl Into<ColumnName>) -> Self {
        Self::new().name(name)
    }

    pub fn name(mut self, name: impl Into<ColumnName>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn as_(mut self, alias: impl Into<Identifier>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Alias of [`Column::as_`].
    pub fn alias(self, alias: impl Into<Identifier>) -> Self {
        self.as_(alias)
    }

    /// Turn the column into a scalar sub-query.
    ///
    /// A bare name set before this call becomes the alias when no alias exists.
    pub fn query(mut self, source: impl Into<QuerySource>) -> Self {
        if self.alias.is_none() {
            self.alias = self
                .name
                .as_ref()
                .and_then(ColumnName::as_identifier)
                .cloned();
        }
        self.name = Some(ColumnName::Query(Box::new(source.into().into_query())));
        self
    }

    pub fn sum(mut self) -> Self {
        self.functions.push(ColumnFunction::Sum);
        self
    }

    /// Set the name and wrap it in `sum()`.
    pub fn sum_of(self, name: impl Into<ColumnName>) -> Self {
        self.name(name).sum()
    }

    pub fn sum_if(mut self, operator: Operator, value: impl Into<Value>) -> Self {
        self.functions
            .push(ColumnFunction::SumIf(operator, value.into()));
        self
    }

    pub fn round(mut self, decimals: i32) -> Self {
        self.functions.push(ColumnFunction::Round(decimals));
        self
    }

    pub fn plus(mut self, value: impl Into<Value>) -> Self {
        self.functions.push(ColumnFunction::Plus(value.into()));
        self
    }

    pub fn multiple(mut self, value: impl Into<Value>) -> Self {
        self.functions.push(ColumnFunction::Multiple(value.into()));
        self
    }

    pub fn running_difference(mut self) -> Self {
        self.functions.push(ColumnFunction::RunningDifference);
        self
    }

    /// `count()`; ignores the column name.
    pub fn count(mut self) -> Self {
        self.functions.push(ColumnFunction::Count);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.functions.push(ColumnFunction::Distinct);
        self
    }

    pub fn column_name(&self) -> Option<&ColumnName> {
        self.name.as_ref()
    }

    pub fn alias_name(&self) -> Option<&Identifier> {
        self.alias.as_ref()
    }

    pub fn functions(&self) -> &[ColumnFunction] {
        &self.functions
    }
}

/// Input accepted by `select`, `group_by`, `order_by` and friends.
#[derive(Debug, Clone)]
pub enum SelectItem {
    /// A bare name, expression or value.
    Named(ColumnName),
    /// `name AS alias`; the alias is dropped where aliases are not allowed.
    Aliased(ColumnName, Identifier),
    /// A fully configured column.
    Configured(Column),
    /// A scalar sub-query.
    SubQuery(QueryBuilder),
}

impl SelectItem {
    pub fn named(name: impl Into<ColumnName>) -> Self {
        SelectItem::Named(name.into())
    }

    pub fn aliased(name: impl Into<ColumnName>, alias: impl Into<Identifier>) -> Self {
        SelectItem::Aliased(name.into(), alias.into())
    }

    /// Configure a fresh column.
    pub fn configured(f: impl FnOnce(Column) -> Column) -> Self {
        SelectItem::Configured(f(Column::new()))
    }

    /// Configure a column that already carries `name`.
    pub fn named_with(name: impl Into<ColumnName>, f: impl FnOnce(Column) -> Column) -> Self {
        SelectItem::Configured(f(Column::named(name)))
    }

    pub fn sub_query(query: impl Into<QuerySource>) -> Self {
        SelectItem::SubQuery(query.into().into_query())
    }

    pub(crate) fn into_column(self, with_alias: bool) -> Column {
        match self {
            SelectItem::Named(name) => Column::named(name),
            SelectItem::Aliased(name, alias) => {
                let column = Column::named(name);
                if with_alias { column.as_(alias) } else { column }
            }
            SelectItem::Configured(column) => column,
            SelectItem::SubQuery(query) => Column::new().query(query),
        }
    }
}

macro_rules! select_item_from_name {
    ($($t:ty),+) => {
        $(
            impl From<$t> for SelectItem {
                fn from(v: $t) -> Self {
                    SelectItem::Named(ColumnName::from(v))
                }
            }
        )+
    };
}

select_item_from_name!(&str, String, &String, Identifier, Expression, Value, i32, i64, u32, u64, f64);

impl From<Column> for SelectItem {
    fn from(v: Column) -> Self {
        SelectItem::Configured(v)
    }
}

impl From<QueryBuilder> for SelectItem {
    fn from(v: QueryBuilder) -> Self {
        SelectItem::SubQuery(v)
    }
}

impl From<(&str, &str)> for SelectItem {
    fn from((name, alias): (&str, &str)) -> Self {
        SelectItem::aliased(name, alias)
    }
}

impl From<(String, String)> for SelectItem {
    fn from((name, alias): (String, String)) -> Self {
        SelectItem::aliased(name, alias)
    }
}

impl From<(&str, QueryBuilder)> for SelectItem {
    fn from((alias, query): (&str, QueryBuilder)) -> Self {
        SelectItem::aliased(query, alias)
    }
}

impl<F> From<F> for SelectItem
where
    F: FnOnce(Column) -> Column,
{
    fn from(f: F) -> Self {
        SelectItem::configured(f)
    }
}

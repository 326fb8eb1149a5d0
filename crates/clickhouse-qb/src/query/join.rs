//! JOIN and ARRAY JOIN clauses.

use super::column::ColumnName;
use super::from::TableSource;
use super::predicate::Predicate;
use super::{QueryBuilder, QuerySource};
use crate::enums::{Conjunction, JoinStrict, JoinType, Operator};
use crate::ident::{Expression, Identifier};

/// One join.
///
/// Keys are either a USING list or an ON predicate list. Both or neither is
/// reported when the query is compiled, not while the clause is being built.
#[derive(Debug, Clone, Default)]
pub struct JoinClause {
    pub(crate) table: Option<TableSource>,
    pub(crate) strict: Option<JoinStrict>,
    pub(crate) kind: Option<JoinType>,
    pub(crate) alias: Option<Identifier>,
    pub(crate) global: bool,
    pub(crate) using: Vec<Identifier>,
    pub(crate) on: Vec<Predicate>,
}

impl JoinClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join a table; `table as alias` is split into both parts.
    pub fn table(mut self, table: impl Into<TableSource>) -> Self {
        let table = table.into();
        match table.as_identifier().and_then(Identifier::split_alias) {
            Some((name, alias)) => {
                self.table = Some(TableSource::Identifier(name));
                self.alias = Some(alias);
            }
            None => self.table = Some(table),
        }
        self
    }

    /// Join a sub-query.
    ///
    /// A table name set before this call becomes the alias when no alias exists.
    pub fn query(mut self, source: impl Into<QuerySource>) -> Self {
        if self.alias.is_none() {
            self.alias = self
                .table
                .as_ref()
                .and_then(TableSource::as_identifier)
                .cloned();
        }
        self.table = Some(TableSource::Query(Box::new(source.into().into_query())));
        self
    }

    /// Join a sub-query under `alias`.
    pub fn sub_query(self, alias: impl Into<Identifier>, source: impl Into<QuerySource>) -> Self {
        self.alias(alias).query(source)
    }

    pub fn alias(mut self, alias: impl Into<Identifier>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn as_(self, alias: impl Into<Identifier>) -> Self {
        self.alias(alias)
    }

    /// Replace the USING list.
    pub fn using<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        self.using = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append to the USING list.
    pub fn add_using<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        self.using.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add an ON key `first <operator> second`, joined with AND.
    pub fn on(
        mut self,
        first: impl Into<Identifier>,
        operator: Operator,
        second: impl Into<Identifier>,
    ) -> Self {
        let (first, second): (Identifier, Identifier) = (first.into(), second.into());
        self.on.push(Predicate::and(first, operator, second));
        self
    }

    /// Add an ON key joined with OR.
    pub fn or_on(
        mut self,
        first: impl Into<Identifier>,
        operator: Operator,
        second: impl Into<Identifier>,
    ) -> Self {
        let (first, second): (Identifier, Identifier) = (first.into(), second.into());
        self.on.push(Predicate::or(first, operator, second));
        self
    }

    /// Add a raw ON fragment.
    pub fn on_raw(mut self, expression: impl Into<Expression>) -> Self {
        self.on.push(Predicate::raw(expression, Conjunction::And));
        self
    }

    pub fn strict(mut self, strict: JoinStrict) -> Self {
        self.strict = Some(strict);
        self
    }

    pub fn kind(mut self, kind: JoinType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn all(self) -> Self {
        self.strict(JoinStrict::All)
    }

    pub fn any(self) -> Self {
        self.strict(JoinStrict::Any)
    }

    pub fn inner(self) -> Self {
        self.kind(JoinType::Inner)
    }

    pub fn left(self) -> Self {
        self.kind(JoinType::Left)
    }

    pub fn right(self) -> Self {
        self.kind(JoinType::Right)
    }

    pub fn full(self) -> Self {
        self.kind(JoinType::Full)
    }

    pub fn cross(self) -> Self {
        self.kind(JoinType::Cross)
    }

    pub fn asof(self) -> Self {
        self.kind(JoinType::Asof)
    }

    /// Render as a GLOBAL join.
    pub fn distributed(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    pub fn get_table(&self) -> Option<&TableSource> {
        self.table.as_ref()
    }

    pub fn get_strict(&self) -> Option<JoinStrict> {
        self.strict
    }

    pub fn get_kind(&self) -> Option<JoinType> {
        self.kind
    }

    pub fn get_alias(&self) -> Option<&Identifier> {
        self.alias.as_ref()
    }

    pub fn get_using(&self) -> &[Identifier] {
        &self.using
    }

    pub fn get_on(&self) -> &[Predicate] {
        &self.on
    }

    pub fn is_distributed(&self) -> bool {
        self.global
    }
}

/// Anything `QueryBuilder::join` accepts: a table name, a sub-query, a
/// configured clause or a closure configuring a fresh one.
#[derive(Debug, Clone)]
pub struct JoinSource(pub(crate) JoinClause);

impl From<JoinClause> for JoinSource {
    fn from(v: JoinClause) -> Self {
        JoinSource(v)
    }
}

impl From<&str> for JoinSource {
    fn from(v: &str) -> Self {
        JoinSource(JoinClause::new().table(v))
    }
}

impl From<String> for JoinSource {
    fn from(v: String) -> Self {
        JoinSource(JoinClause::new().table(v))
    }
}

impl From<Identifier> for JoinSource {
    fn from(v: Identifier) -> Self {
        JoinSource(JoinClause::new().table(v))
    }
}

impl From<Expression> for JoinSource {
    fn from(v: Expression) -> Self {
        JoinSource(JoinClause::new().table(v))
    }
}

impl From<QueryBuilder> for JoinSource {
    fn from(v: QueryBuilder) -> Self {
        JoinSource(JoinClause::new().query(v))
    }
}

impl<F> From<F> for JoinSource
where
    F: FnOnce(JoinClause) -> JoinClause,
{
    fn from(f: F) -> Self {
        JoinSource(f(JoinClause::new()))
    }
}

/// `[LEFT] ARRAY JOIN <array>`.
#[derive(Debug, Clone)]
pub struct ArrayJoinClause {
    pub(crate) array: ColumnName,
    pub(crate) left: bool,
}

impl ArrayJoinClause {
    pub fn new(array: impl Into<ColumnName>, left: bool) -> Self {
        Self {
            array: array.into(),
            left,
        }
    }

    pub fn array(&self) -> &ColumnName {
        &self.array
    }

    pub fn is_left(&self) -> bool {
        self.left
    }
}

//! Query model.
//!
//! [`QueryBuilder`] accumulates clause state through consuming fluent calls and
//! is compiled by [`Grammar`](crate::grammar::Grammar). Compilation never
//! mutates the model, so a query can be compiled any number of times.
//!
//! ```
//! use clickhouse_qb::{Operator, QueryBuilder};
//!
//! let sql = QueryBuilder::new()
//!     .select(["id", "name"])
//!     .from("users")
//!     .where_("id", Operator::Greater, 10)
//!     .limit(5)
//!     .to_sql()?;
//! assert_eq!(sql, "SELECT `id`, `name` FROM `users` WHERE `id` > 10 LIMIT 5");
//! # Ok::<(), clickhouse_qb::QbError>(())
//! ```

pub mod column;
pub mod ddl;
pub mod from;
pub mod insert;
pub mod join;
pub mod limit;
pub mod predicate;
mod predicates;


use crate::client::{CompiledQuery, Settings, TempTable};
use crate::enums::{Conjunction, Format, JoinStrict, JoinType, Operator, OrderDirection};
use crate::error::QbResult;
use crate::grammar::Grammar;
use crate::ident::{Expression, Identifier};
use crate::value::Value;
use column::{Column, ColumnName, SelectItem};
use from::{FromClause, TableSource};
use join::{ArrayJoinClause, JoinClause, JoinSource};
use limit::{Limit, Order};
use predicate::{IntoColumnOperand, Operand, Predicate};
use std::collections::BTreeMap;

/// A nested query argument: a query, a closure configuring a fresh one, or
/// nothing (`()`).
#[derive(Debug, Clone)]
pub enum QuerySource {
    Query(Box<QueryBuilder>),
    Blank,
}

impl QuerySource {
    /// The query, or a fresh one for [`QuerySource::Blank`].
    pub fn into_query(self) -> QueryBuilder {
        match self {
            QuerySource::Query(query) => *query,
            QuerySource::Blank => QueryBuilder::new(),
        }
    }
}

impl From<QueryBuilder> for QuerySource {
    fn from(v: QueryBuilder) -> Self {
        QuerySource::Query(Box::new(v))
    }
}

impl From<()> for QuerySource {
    fn from(_: ()) -> Self {
        QuerySource::Blank
    }
}

impl<F> From<F> for QuerySource
where
    F: FnOnce(QueryBuilder) -> QueryBuilder,
{
    fn from(f: F) -> Self {
        QuerySource::Query(Box::new(f(QueryBuilder::new())))
    }
}

/// Predicate list a fluent call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    PreWhere,
    Where,
    Having,
}

/// One SELECT statement and everything nested in it.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pub(crate) columns: Vec<Column>,
    pub(crate) from: Option<FromClause>,
    pub(crate) sample: Option<f64>,
    pub(crate) array_join: Option<ArrayJoinClause>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) pre_wheres: Vec<Predicate>,
    pub(crate) wheres: Vec<Predicate>,
    pub(crate) groups: Vec<Column>,
    pub(crate) havings: Vec<Predicate>,
    pub(crate) orders: Vec<Order>,
    pub(crate) limit: Option<Limit>,
    pub(crate) limit_by: Option<Limit>,
    pub(crate) unions: Vec<QueryBuilder>,
    pub(crate) format: Option<Format>,
    pub(crate) siblings: Vec<QueryBuilder>,
    pub(crate) files: BTreeMap<String, TempTable>,
    pub(crate) settings: Settings,
    pub(crate) on_cluster: Option<String>,
    /// First invalid argument seen by a fluent call; reported at compile time.
    pub(crate) build_error: Option<String>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== SELECT ====================

    /// Replace the selected columns. An empty list selects `*`.
    pub fn select<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SelectItem>,
    {
        self.columns = process_columns(columns, true);
        if self.columns.is_empty() {
            self.columns.push(Column::named("*"));
        }
        self
    }

    /// Append selected columns.
    pub fn add_select<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SelectItem>,
    {
        self.columns.extend(process_columns(columns, true));
        self
    }

    /// Append `dictGetString('dict', 'attribute', key) AS alias`.
    ///
    /// The alias defaults to the attribute name. An array key renders as `tuple(...)`.
    pub fn add_select_dict(
        mut self,
        dict: &str,
        attribute: &str,
        key: impl Into<Value>,
        alias: Option<&str>,
    ) -> Self {
        let expression = dict_get(dict, attribute, &key.into());
        self.columns
            .push(Column::named(expression).as_(alias.unwrap_or(attribute)));
        self
    }

    // ==================== FROM ====================

    /// Set the table source.
    pub fn from(mut self, table: impl Into<TableSource>) -> Self {
        self.from = Some(FromClause::new().table(table));
        self
    }

    /// Set the table source with an alias.
    pub fn from_as(mut self, table: impl Into<TableSource>, alias: impl Into<Identifier>) -> Self {
        self.from = Some(FromClause::new().table(table).alias(alias));
        self
    }

    /// Configure the FROM section through a closure.
    pub fn from_with(mut self, f: impl FnOnce(FromClause) -> FromClause) -> Self {
        self.from = Some(f(FromClause::new()));
        self
    }

    /// Alias of [`QueryBuilder::from`].
    pub fn table(self, table: impl Into<TableSource>) -> Self {
        self.from(table)
    }

    /// Set the FROM alias.
    pub fn alias(mut self, alias: impl Into<Identifier>) -> Self {
        self.from = Some(self.from.take().unwrap_or_default().alias(alias));
        self
    }

    /// Set the FROM FINAL flag.
    pub fn final_(mut self, is_final: bool) -> Self {
        self.from = Some(self.from.take().unwrap_or_default().final_(is_final));
        self
    }

    /// `SAMPLE <coefficient>`.
    pub fn sample(mut self, coefficient: f64) -> Self {
        self.sample = Some(coefficient);
        self
    }

    // ==================== JOIN ====================

    /// `ARRAY JOIN <array>`.
    pub fn array_join(mut self, array: impl Into<ColumnName>) -> Self {
        self.array_join = Some(ArrayJoinClause::new(array, false));
        self
    }

    /// `LEFT ARRAY JOIN <array>`.
    pub fn left_array_join(mut self, array: impl Into<ColumnName>) -> Self {
        self.array_join = Some(ArrayJoinClause::new(array, true));
        self
    }

    /// Append a join.
    pub fn join(mut self, source: impl Into<JoinSource>) -> Self {
        self.joins.push(source.into().0);
        self
    }

    /// Append a join with explicit strictness, type and USING keys.
    pub fn join_using<I, S>(
        self,
        source: impl Into<JoinSource>,
        strict: Option<JoinStrict>,
        kind: Option<JoinType>,
        using: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        let mut join = source.into().0;
        if let Some(strict) = strict {
            join = join.strict(strict);
        }
        if let Some(kind) = kind {
            join = join.kind(kind);
        }
        self.join(join.add_using(using))
    }

    /// `ALL LEFT JOIN`.
    pub fn left_join<I, S>(self, source: impl Into<JoinSource>, using: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        self.join_using(source, Some(JoinStrict::All), Some(JoinType::Left), using)
    }

    /// `ALL INNER JOIN`.
    pub fn inner_join<I, S>(self, source: impl Into<JoinSource>, using: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        self.join_using(source, Some(JoinStrict::All), Some(JoinType::Inner), using)
    }

    pub fn any_left_join<I, S>(self, source: impl Into<JoinSource>, using: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        self.join_using(source, Some(JoinStrict::Any), Some(JoinType::Left), using)
    }

    pub fn all_left_join<I, S>(self, source: impl Into<JoinSource>, using: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        self.join_using(source, Some(JoinStrict::All), Some(JoinType::Left), using)
    }

    pub fn any_inner_join<I, S>(self, source: impl Into<JoinSource>, using: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        self.join_using(source, Some(JoinStrict::Any), Some(JoinType::Inner), using)
    }

    pub fn all_inner_join<I, S>(self, source: impl Into<JoinSource>, using: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        self.join_using(source, Some(JoinStrict::All), Some(JoinType::Inner), using)
    }

    // ==================== GROUP BY / ORDER BY ====================

    /// Replace the GROUP BY list. Aliases are dropped; `*` suppresses the clause.
    pub fn group_by<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SelectItem>,
    {
        self.groups = process_columns(columns, false);
        if self.groups.is_empty() {
            self.groups.push(Column::named("*"));
        }
        self
    }

    /// Append to the GROUP BY list.
    pub fn add_group_by<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SelectItem>,
    {
        self.groups.extend(process_columns(columns, false));
        self
    }

    pub fn order_by(self, column: impl Into<SelectItem>, direction: OrderDirection) -> Self {
        self.push_order(column, Some(direction), None)
    }

    pub fn order_by_asc(self, column: impl Into<SelectItem>) -> Self {
        self.order_by(column, OrderDirection::Asc)
    }

    pub fn order_by_desc(self, column: impl Into<SelectItem>) -> Self {
        self.order_by(column, OrderDirection::Desc)
    }

    /// `ORDER BY <column> <direction> COLLATE '<collate>'`.
    pub fn order_by_collate(
        self,
        column: impl Into<SelectItem>,
        direction: OrderDirection,
        collate: impl Into<String>,
    ) -> Self {
        self.push_order(column, Some(direction), Some(collate.into()))
    }

    /// Raw ORDER BY entry, no direction.
    pub fn order_by_raw(self, expression: impl Into<Expression>) -> Self {
        let expression: Expression = expression.into();
        self.push_order(expression, None, None)
    }

    fn push_order(
        mut self,
        column: impl Into<SelectItem>,
        direction: Option<OrderDirection>,
        collate: Option<String>,
    ) -> Self {
        self.orders.push(Order {
            column: column.into().into_column(false),
            direction,
            collate,
        });
        self
    }

    // ==================== LIMIT ====================

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(Limit::new(limit, None));
        self
    }

    /// `LIMIT offset, limit`.
    pub fn limit_offset(mut self, limit: u64, offset: u64) -> Self {
        self.limit = Some(Limit::new(limit, Some(offset)));
        self
    }

    /// Alias of [`QueryBuilder::limit`].
    pub fn take(self, limit: u64) -> Self {
        self.limit(limit)
    }

    /// Alias of [`QueryBuilder::limit_offset`].
    pub fn take_offset(self, limit: u64, offset: u64) -> Self {
        self.limit_offset(limit, offset)
    }

    /// `LIMIT n BY columns`. Aliases are dropped.
    pub fn limit_by<I, T>(mut self, limit: u64, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SelectItem>,
    {
        self.limit_by = Some(Limit::by(limit, process_columns(columns, false)));
        self
    }

    /// Alias of [`QueryBuilder::limit_by`].
    pub fn take_by<I, T>(self, limit: u64, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SelectItem>,
    {
        self.limit_by(limit, columns)
    }

    // ==================== UNION / ASYNC ====================

    /// Append a `UNION ALL` branch.
    pub fn union_all(mut self, source: impl Into<QuerySource>) -> Self {
        match source.into() {
            QuerySource::Query(query) => self.unions.push(*query),
            QuerySource::Blank => {
                self.build_error.get_or_insert_with(|| {
                    "Argument for unionAll must be closure or builder instance.".to_string()
                });
            }
        }
        self
    }

    /// Register a sibling query dispatched together with this one.
    ///
    /// `()` registers a blank sibling.
    pub fn async_with_query(mut self, source: impl Into<QuerySource>) -> Self {
        self.siblings.push(source.into().into_query());
        self
    }

    /// This query followed by every registered sibling, depth-first.
    pub fn async_queries(&self) -> Vec<&QueryBuilder> {
        let mut queries = vec![self];
        for sibling in &self.siblings {
            queries.extend(sibling.async_queries());
        }
        queries
    }

    // ==================== misc ====================

    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Attach a file as an external table.
    pub fn add_file(mut self, file: TempTable) -> Self {
        self.files.insert(file.name().to_string(), file);
        self
    }

    /// Set one ClickHouse setting sent with the query.
    pub fn setting(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.settings.set(key, value);
        self
    }

    pub fn on_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.on_cluster = Some(cluster.into());
        self
    }

    /// Derived query counting the rows this one returns.
    ///
    /// Columns become `count() AS count`, LIMIT is cleared and ORDER BY is
    /// kept only under GROUP BY. A query with UNION ALL or LIMIT BY is
    /// counted over a sub-query instead.
    pub fn count_query(&self) -> QueryBuilder {
        self.count_query_of("*")
    }

    /// Like [`QueryBuilder::count_query`], counting non-null values of `column`.
    pub fn count_query_of(&self, column: impl Into<Identifier>) -> QueryBuilder {
        let column = column.into();
        let count = if column.as_str() == "*" {
            Column::new().count()
        } else {
            Column::named(Expression::new(format!("count({})", column.quoted())))
        }
        .as_("count");

        let mut query = self.clone();
        query.limit = None;
        query.siblings.clear();

        if query.unions.is_empty() && query.limit_by.is_none() {
            query.columns = vec![count];
            if query.groups.is_empty() {
                query.orders.clear();
            }
            return query;
        }

        query.orders.clear();
        let files = std::mem::take(&mut query.files);
        let settings = query.settings.clone();
        let format = query.format.take();
        let mut outer = QueryBuilder::new().select([count]).from(query);
        outer.files = files;
        outer.settings = settings;
        outer.format = format;
        outer
    }

    // ==================== accessors ====================

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn get_from(&self) -> Option<&FromClause> {
        self.from.as_ref()
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn pre_wheres(&self) -> &[Predicate] {
        &self.pre_wheres
    }

    pub fn wheres(&self) -> &[Predicate] {
        &self.wheres
    }

    pub fn havings(&self) -> &[Predicate] {
        &self.havings
    }

    pub fn groups(&self) -> &[Column] {
        &self.groups
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get_limit(&self) -> Option<&Limit> {
        self.limit.as_ref()
    }

    pub fn get_limit_by(&self) -> Option<&Limit> {
        self.limit_by.as_ref()
    }

    pub fn unions(&self) -> &[QueryBuilder] {
        &self.unions
    }

    pub fn get_format(&self) -> Option<Format> {
        self.format
    }

    pub fn files(&self) -> impl Iterator<Item = &TempTable> {
        self.files.values()
    }

    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    pub fn get_on_cluster(&self) -> Option<&str> {
        self.on_cluster.as_deref()
    }

    // ==================== compile ====================

    /// Compile to SQL.
    pub fn to_sql(&self) -> QbResult<String> {
        Grammar.compile_select(self)
    }

    /// Compile to SQL with attached files and settings.
    pub fn compile(&self) -> QbResult<CompiledQuery> {
        Ok(CompiledQuery {
            sql: self.to_sql()?,
            files: self.files.values().cloned().collect(),
            settings: self.settings.clone(),
        })
    }

    /// Compile this query and all its siblings, in [`async_queries`](Self::async_queries) order.
    pub fn to_async_sql(&self) -> QbResult<Vec<CompiledQuery>> {
        Grammar.compile_async(self)
    }

    // ==================== predicate plumbing ====================

    pub(crate) fn section(&self, section: Section) -> &[Predicate] {
        match section {
            Section::PreWhere => &self.pre_wheres,
            Section::Where => &self.wheres,
            Section::Having => &self.havings,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Vec<Predicate> {
        match section {
            Section::PreWhere => &mut self.pre_wheres,
            Section::Where => &mut self.wheres,
            Section::Having => &mut self.havings,
        }
    }

    fn push_predicate(mut self, section: Section, predicate: Predicate) -> Self {
        self.section_mut(section).push(predicate);
        self
    }

    /// `first <operator> second`; membership operators get the IN rules.
    pub(crate) fn add_compare(
        self,
        section: Section,
        first: Operand,
        operator: Operator,
        second: Operand,
        conjunction: Conjunction,
    ) -> Self {
        if operator.is_membership() {
            return self.add_in(section, first, operator, second, conjunction);
        }
        self.push_predicate(
            section,
            Predicate {
                first,
                operator: Some(operator),
                second: Some(second),
                conjunction,
            },
        )
    }

    /// Two-argument form: `=`, or `IN` for lists.
    pub(crate) fn add_eq(
        self,
        section: Section,
        first: Operand,
        second: Operand,
        conjunction: Conjunction,
    ) -> Self {
        let operator = if second.is_list() {
            Operator::In
        } else {
            Operator::Eq
        };
        self.add_compare(section, first, operator, second, conjunction)
    }

    /// IN-family predicate.
    ///
    /// An empty list makes IN always false and NOT IN a no-op. A string naming
    /// an attached file refers to that table.
    pub(crate) fn add_in(
        self,
        section: Section,
        first: Operand,
        operator: Operator,
        values: Operand,
        conjunction: Conjunction,
    ) -> Self {
        let values = match values.into_tuple() {
            Ok(tuple) if tuple.is_empty() => {
                if operator.is_negated() {
                    return self;
                }
                return self.push_predicate(
                    section,
                    Predicate {
                        first: Operand::Value(Value::Int(0)),
                        operator: Some(Operator::Eq),
                        second: Some(Operand::Value(Value::Int(1))),
                        conjunction,
                    },
                );
            }
            Ok(tuple) => Operand::Tuple(tuple),
            Err(other) => self.resolve_file(other),
        };
        self.push_predicate(
            section,
            Predicate {
                first,
                operator: Some(operator),
                second: Some(values),
                conjunction,
            },
        )
    }

    fn resolve_file(&self, operand: Operand) -> Operand {
        match operand {
            Operand::Value(Value::String(name)) if self.files.contains_key(&name) => {
                Operand::Value(Value::Identifier(Identifier::new(name)))
            }
            other => other,
        }
    }

    pub(crate) fn add_between(
        self,
        section: Section,
        first: Operand,
        operator: Operator,
        from: Operand,
        to: Operand,
        conjunction: Conjunction,
    ) -> Self {
        self.push_predicate(
            section,
            Predicate {
                first,
                operator: Some(operator),
                second: Some(Operand::Predicate(Box::new(Predicate::range(from, to)))),
                conjunction,
            },
        )
    }

    pub(crate) fn add_raw(
        self,
        section: Section,
        expression: Expression,
        conjunction: Conjunction,
    ) -> Self {
        self.push_predicate(section, Predicate::raw(expression, conjunction))
    }

    /// Nested predicate list built by a closure.
    ///
    /// If the closure sets FROM or columns, the result is used as a sub-query instead.
    pub(crate) fn add_group(
        self,
        section: Section,
        f: impl FnOnce(QueryBuilder) -> QueryBuilder,
        conjunction: Conjunction,
    ) -> Self {
        let nested = f(QueryBuilder::new());
        let first = if nested.from.is_none() && nested.columns.is_empty() {
            let predicates = nested.section(section).to_vec();
            if predicates.is_empty() {
                return self;
            }
            Operand::Group(predicates)
        } else {
            Operand::Query(Box::new(nested))
        };
        self.push_predicate(
            section,
            Predicate {
                first,
                operator: None,
                second: None,
                conjunction,
            },
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn add_dict(
        self,
        section: Section,
        dict: &str,
        attribute: &str,
        key: Value,
        operator: Operator,
        value: Operand,
        conjunction: Conjunction,
    ) -> Self {
        let first = dict_get(dict, attribute, &key).into_operand();
        self.add_compare(section, first, operator, value, conjunction)
    }
}

fn process_columns<I, T>(columns: I, with_alias: bool) -> Vec<Column>
where
    I: IntoIterator<Item = T>,
    T: Into<SelectItem>,
{
    columns
        .into_iter()
        .map(|item| item.into().into_column(with_alias))
        .collect()
}

fn dict_get(dict: &str, attribute: &str, key: &Value) -> Expression {
    let grammar = Grammar;
    let key = match key {
        Value::Array(parts) => format!("tuple({})", grammar.wrap_each(parts).join(", ")),
        other => grammar.wrap(other),
    };
    Expression::new(format!(
        "dictGetString({}, {}, {})",
        grammar.wrap(&Value::from(dict)),
        grammar.wrap(&Value::from(attribute)),
        key
    ))
}

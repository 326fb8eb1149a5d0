//! FROM section and table sources.

use super::{QueryBuilder, QuerySource};
use crate::grammar::Grammar;
use crate::ident::{Expression, Identifier};
use crate::value::Value;

/// A table reference: a name, a raw expression (table function) or a sub-query.
#[derive(Debug, Clone)]
pub enum TableSource {
    Identifier(Identifier),
    Expression(Expression),
    Query(Box<QueryBuilder>),
}

impl TableSource {
    pub(crate) fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            TableSource::Identifier(ident) => Some(ident),
            _ => None,
        }
    }
}

impl From<&str> for TableSource {
    fn from(v: &str) -> Self {
        TableSource::Identifier(Identifier::new(v))
    }
}

impl From<String> for TableSource {
    fn from(v: String) -> Self {
        TableSource::Identifier(Identifier::new(v))
    }
}

impl From<&String> for TableSource {
    fn from(v: &String) -> Self {
        TableSource::Identifier(Identifier::new(v.as_str()))
    }
}

impl From<Identifier> for TableSource {
    fn from(v: Identifier) -> Self {
        TableSource::Identifier(v)
    }
}

impl From<Expression> for TableSource {
    fn from(v: Expression) -> Self {
        TableSource::Expression(v)
    }
}

impl From<QueryBuilder> for TableSource {
    fn from(v: QueryBuilder) -> Self {
        TableSource::Query(Box::new(v))
    }
}

/// Table source of a statement with its alias and FINAL flag.
#[derive(Debug, Clone, Default)]
pub struct FromClause {
    pub(crate) table: Option<TableSource>,
    pub(crate) alias: Option<Identifier>,
    pub(crate) is_final: bool,
}

impl FromClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: impl Into<TableSource>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<Identifier>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Alias of [`FromClause::alias`].
    pub fn as_(self, alias: impl Into<Identifier>) -> Self {
        self.alias(alias)
    }

    pub fn final_(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    /// Select from a sub-query.
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

    /// Read from `remote('address', db, table[, user[, password]])`.
    pub fn remote(
        self,
        address: &str,
        database: &str,
        table: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Self {
        self.table(remote(address, database, table, user, password))
    }

    /// Read from `merge(db, 'regexp')`.
    pub fn merge(self, database: &str, regexp: &str) -> Self {
        self.table(merge(database, regexp))
    }

    pub fn get_table(&self) -> Option<&TableSource> {
        self.table.as_ref()
    }

    pub fn get_alias(&self) -> Option<&Identifier> {
        self.alias.as_ref()
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }
}

/// `remote('address', db, table[, user[, password]])` table function.
pub fn remote(
    address: &str,
    database: &str,
    table: &str,
    user: Option<&str>,
    password: Option<&str>,
) -> Expression {
    let grammar = Grammar;
    let mut args = vec![
        grammar.wrap(&Value::from(address)),
        database.to_string(),
        table.to_string(),
    ];
    if let Some(user) = user {
        args.push(grammar.wrap(&Value::from(user)));
        if let Some(password) = password {
            args.push(grammar.wrap(&Value::from(password)));
        }
    }
    Expression::new(format!("remote({})", args.join(", ")))
}

/// `merge(db, 'regexp')` table function.
pub fn merge(database: &str, regexp: &str) -> Expression {
    Expression::new(format!(
        "merge({}, {})",
        database,
        Grammar.wrap(&Value::from(regexp))
    ))
}

use super::Grammar;
use crate::error::{QbError, QbResult};
use crate::query::column::ColumnName;
use crate::query::from::{FromClause, TableSource};
use crate::query::join::ArrayJoinClause;

impl Grammar {
    /// `FROM <table> [AS <alias>] [FINAL]`.
    pub fn compile_from(&self, from: &FromClause) -> QbResult<String> {
        let table = from.get_table().ok_or(QbError::MissingFrom)?;

        let mut sql = format!("FROM {}", self.compile_table(table)?);
        if let Some(alias) = from.get_alias() {
            sql.push_str(" AS ");
            sql.push_str(&alias.quoted());
        }
        if from.is_final() {
            sql.push_str(" FINAL");
        }
        Ok(sql)
    }

    /// A table name, table function or parenthesized sub-query.
    pub fn compile_table(&self, table: &TableSource) -> QbResult<String> {
        Ok(match table {
            TableSource::Identifier(ident) => ident.quoted(),
            TableSource::Expression(expr) => expr.as_str().to_string(),
            TableSource::Query(query) => format!("({})", self.compile_select(query)?),
        })
    }

    /// `[LEFT] ARRAY JOIN <array>`.
    pub fn compile_array_join(&self, join: &ArrayJoinClause) -> QbResult<String> {
        let array = match join.array() {
            ColumnName::Value(value) => self.wrap(value),
            ColumnName::Nested(column) => self.compile_column(column)?,
            ColumnName::Query(query) => {
                format!("({})", self.compile_select(query)?)
            }
        };
        let prefix = if join.is_left() { "LEFT ARRAY JOIN" } else { "ARRAY JOIN" };
        Ok(format!("{prefix} {array}"))
    }
}

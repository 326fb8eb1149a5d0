use super::Grammar;
use crate::enums::Format;
use crate::error::{QbError, QbResult};
use crate::ident::Identifier;
use crate::query::QueryBuilder;
use crate::query::ddl::{CreateTable, DropTable};
use crate::query::insert::InsertRow;
use crate::value::Value;
use std::collections::BTreeSet;

impl Grammar {
    /// Compile an INSERT of `rows` into the query's FROM table.
    ///
    /// With the `Values` format (the default) values are inlined. The column
    /// list of named rows is the sorted union of their keys, and a key missing
    /// from a row renders `null`. Rows must all be named or all positional
    /// with one width. `JSONEachRow` yields only the header, the rows
    /// travel as a payload. Other formats are rejected.
    pub fn compile_insert(&self, query: &QueryBuilder, rows: &[InsertRow]) -> QbResult<String> {
        let format = query.get_format().unwrap_or(Format::Values);
        match format {
            Format::Values => {}
            Format::JsonEachRow => return self.compile_insert_header(query, &[], format),
            other => return Err(QbError::UnsupportedInsertFormat(other)),
        }

        let columns = insert_columns(rows)?;
        let header = self.compile_insert_header(query, &columns, format)?;

        let mut tuples = Vec::with_capacity(rows.len());
        for row in rows {
            let values: Vec<String> = match row {
                InsertRow::Named(map) => columns
                    .iter()
                    .map(|c| map.get(c.as_str()).map_or_else(|| self.wrap(&Value::Null), |v| self.wrap(v)))
                    .collect(),
                InsertRow::Positional(values) => values.iter().map(|v| self.wrap(v)).collect(),
            };
            tuples.push(format!("({})", values.join(", ")));
        }

        Ok(format!("{header} {}", tuples.join(", ")))
    }

    /// `INSERT INTO <table> [(<columns>)] FORMAT <format>`.
    pub fn compile_insert_header(
        &self,
        query: &QueryBuilder,
        columns: &[Identifier],
        format: Format,
    ) -> QbResult<String> {
        let table = query
            .get_from()
            .and_then(|from| from.get_table())
            .ok_or(QbError::MissingInsertTable)?;

        let mut sql = format!("INSERT INTO {}", self.compile_table(table)?);
        if !columns.is_empty() {
            let columns: Vec<String> = columns.iter().map(Identifier::quoted).collect();
            sql.push_str(&format!(" ({})", columns.join(", ")));
        }
        sql.push_str(&format!(" FORMAT {format}"));
        Ok(sql)
    }

    /// `ALTER TABLE <table> [ON CLUSTER <c>] DELETE WHERE <predicates>`.
    pub fn compile_delete(&self, query: &QueryBuilder) -> QbResult<String> {
        let table = query
            .get_from()
            .and_then(|from| from.get_table())
            .ok_or(QbError::MissingFrom)?;

        let mut sql = format!("ALTER TABLE {}", self.compile_table(table)?);
        if let Some(cluster) = query.get_on_cluster() {
            sql.push_str(&format!(" ON CLUSTER {cluster}"));
        }
        let wheres = self.compile_wheres(query)?;
        if wheres.is_empty() {
            return Err(QbError::MissingDeleteWhere);
        }
        sql.push_str(" DELETE ");
        sql.push_str(&wheres);
        Ok(sql)
    }

    /// `CREATE TABLE [IF NOT EXISTS] <table> [ON CLUSTER <c>] (<col> <type>, ...) ENGINE = <engine>`.
    pub fn compile_create_table(&self, table: &CreateTable) -> String {
        let mut sql = String::from("CREATE TABLE ");
        if table.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&table.table.quoted());
        if let Some(cluster) = &table.on_cluster {
            sql.push_str(&format!(" ON CLUSTER {cluster}"));
        }
        let structure: Vec<String> = table
            .structure
            .iter()
            .map(|(column, ty)| format!("{} {ty}", column.quoted()))
            .collect();
        sql.push_str(&format!(" ({}) ENGINE = {}", structure.join(", "), table.engine));
        sql
    }

    /// `DROP TABLE [IF EXISTS] <table> [ON CLUSTER <c>]`.
    pub fn compile_drop_table(&self, table: &DropTable) -> String {
        let mut sql = String::from("DROP TABLE ");
        if table.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&table.table.quoted());
        if let Some(cluster) = &table.on_cluster {
            sql.push_str(&format!(" ON CLUSTER {cluster}"));
        }
        sql
    }
}

/// Column list shared by every row of one INSERT. Empty for positional rows.
fn insert_columns(rows: &[InsertRow]) -> QbResult<Vec<Identifier>> {
    let first = rows
        .first()
        .ok_or_else(|| QbError::invalid_argument("No rows provided for insert"))?;

    match first {
        InsertRow::Named(_) => {
            let mut columns = BTreeSet::new();
            for row in rows {
                match row {
                    InsertRow::Named(map) => columns.extend(map.keys().map(String::as_str)),
                    InsertRow::Positional(_) => {
                        return Err(QbError::invalid_argument(
                            "Cannot mix named and positional rows in one insert",
                        ));
                    }
                }
            }
            Ok(columns.into_iter().map(Identifier::new).collect())
        }
        InsertRow::Positional(values) => {
            let width = values.len();
            for row in rows {
                match row {
                    InsertRow::Positional(values) if values.len() == width => {}
                    InsertRow::Positional(values) => {
                        return Err(QbError::invalid_argument(format!(
                            "Positional rows must have the same length: expected {width}, got {}",
                            values.len()
                        )));
                    }
                    InsertRow::Named(_) => {
                        return Err(QbError::invalid_argument(
                            "Cannot mix named and positional rows in one insert",
                        ));
                    }
                }
            }
            Ok(Vec::new())
        }
    }
}

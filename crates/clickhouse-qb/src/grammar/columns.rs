use super::Grammar;
use crate::error::QbResult;
use crate::query::column::{Column, ColumnFunction, ColumnName};

impl Grammar {
    /// Comma-separated column list; `*` when there is nothing to select.
    pub fn compile_columns(&self, columns: &[Column]) -> QbResult<String> {
        let mut rendered = Vec::with_capacity(columns.len());
        for column in columns {
            let sql = self.compile_column(column)?;
            if !sql.is_empty() {
                rendered.push(sql);
            }
        }
        if rendered.is_empty() {
            return Ok("*".to_string());
        }
        Ok(rendered.join(", "))
    }

    /// One column with its function pipeline and alias.
    pub fn compile_column(&self, column: &Column) -> QbResult<String> {
        let mut sql = self.compile_column_name(column.column_name())?;

        let mut previous: Option<&ColumnFunction> = None;
        for function in column.functions() {
            sql = self.apply_function(function, sql, previous);
            previous = Some(function);
        }

        if let Some(alias) = column.alias_name() {
            if !sql.is_empty() {
                sql = format!("{sql} AS {}", alias.quoted());
            }
        }
        Ok(sql)
    }

    fn compile_column_name(&self, name: Option<&ColumnName>) -> QbResult<String> {
        Ok(match name {
            None => String::new(),
            Some(ColumnName::Value(value)) => self.wrap(value),
            Some(ColumnName::Nested(inner)) => format!("({})", self.compile_column(inner)?),
            Some(ColumnName::Query(query)) => format!("({})", self.compile_select(query)?),
        })
    }

    fn apply_function(
        &self,
        function: &ColumnFunction,
        inner: String,
        previous: Option<&ColumnFunction>,
    ) -> String {
        match function {
            ColumnFunction::Sum => format!("sum({inner})"),
            ColumnFunction::Round(decimals) => format!("round({inner}, {decimals})"),
            ColumnFunction::Plus(value) => format!("{inner} + {}", self.wrap(value)),
            ColumnFunction::Multiple(value) => match previous {
                Some(ColumnFunction::Plus(_)) => format!("({inner}) * {}", self.wrap(value)),
                _ => format!("{inner} * {}", self.wrap(value)),
            },
            ColumnFunction::RunningDifference => format!("runningDifference({inner})"),
            ColumnFunction::Count => "count()".to_string(),
            ColumnFunction::Distinct => format!("DISTINCT {inner}"),
            ColumnFunction::SumIf(operator, value) => {
                format!("sumIf({inner}, {operator} {})", self.wrap(value))
            }
        }
    }
}

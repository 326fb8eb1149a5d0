//! SQL compiler.
//!
//! [`Grammar`] walks a [`QueryBuilder`] and renders each clause to a SQL
//! fragment. It holds no state; every method is a pure projection of its
//! input, so compiling twice yields the same string.
//!
//! Clause order of a SELECT is fixed:
//! columns, FROM, SAMPLE, ARRAY JOIN, JOIN, PREWHERE, WHERE, GROUP BY,
//! HAVING, ORDER BY, LIMIT BY, LIMIT, UNION ALL, FORMAT.

mod clauses;
mod columns;
mod from;
mod joins;
mod predicates;
mod statements;

#[cfg(test)]
mod tests;

use crate::client::CompiledQuery;
use crate::error::{QbError, QbResult};
use crate::query::QueryBuilder;
use crate::value::Value;

/// ClickHouse dialect compiler.
#[derive(Debug, Default, Clone, Copy)]
pub struct Grammar;

impl Grammar {
    /// Render a value in literal position.
    ///
    /// - strings are single-quoted with `'`, `"`, `\` and NUL backslash-escaped
    /// - identifiers are backtick-quoted (see [`Identifier::quoted`](crate::Identifier::quoted))
    /// - expressions are inserted verbatim
    /// - numbers are unquoted, `Null` is `null`
    /// - arrays render as `[a, b]`, element-wise
    pub fn wrap(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(f) => wrap_float(*f),
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(d) => d.to_string(),
            Value::String(s) => format!("'{}'", escape_string(s)),
            Value::Identifier(ident) => ident.quoted(),
            Value::Expression(expr) => expr.as_str().to_string(),
            Value::Array(items) => format!("[{}]", self.wrap_each(items).join(", ")),
        }
    }

    /// Wrap every value of a slice.
    pub fn wrap_each(&self, values: &[Value]) -> Vec<String> {
        values.iter().map(|v| self.wrap(v)).collect()
    }

    /// Compile a SELECT statement.
    pub fn compile_select(&self, query: &QueryBuilder) -> QbResult<String> {
        if let Some(message) = &query.build_error {
            return Err(QbError::invalid_argument(message.clone()));
        }

        let mut parts = vec!["SELECT".to_string(), self.compile_columns(query.columns())?];

        if let Some(from) = &query.from {
            parts.push(self.compile_from(from)?);
        }
        if let Some(sample) = query.sample {
            parts.push(format!("SAMPLE {}", wrap_float(sample)));
        }
        if let Some(array_join) = &query.array_join {
            parts.push(self.compile_array_join(array_join)?);
        }
        if !query.joins.is_empty() {
            parts.push(self.compile_joins(&query.joins)?);
        }
        if !query.pre_wheres.is_empty() {
            parts.push(keyword("PREWHERE", self.compile_predicates(&query.pre_wheres)?));
        }
        if !query.wheres.is_empty() {
            parts.push(self.compile_wheres(query)?);
        }
        if !query.groups.is_empty() {
            parts.push(self.compile_groups(&query.groups)?);
        }
        if !query.havings.is_empty() {
            parts.push(keyword("HAVING", self.compile_predicates(&query.havings)?));
        }
        if !query.orders.is_empty() {
            parts.push(self.compile_orders(&query.orders)?);
        }
        if let Some(limit_by) = &query.limit_by {
            parts.push(self.compile_limit_by(limit_by)?);
        }
        if let Some(limit) = &query.limit {
            parts.push(self.compile_limit(limit));
        }
        if !query.unions.is_empty() {
            parts.push(self.compile_unions(&query.unions)?);
        }
        if let Some(format) = query.format {
            parts.push(format!("FORMAT {format}"));
        }

        Ok(join_fragments(parts))
    }

    /// `WHERE <predicates>`.
    pub(crate) fn compile_wheres(&self, query: &QueryBuilder) -> QbResult<String> {
        Ok(keyword("WHERE", self.compile_predicates(&query.wheres)?))
    }

    /// Compile a query and its registered siblings, parent first, depth-first.
    ///
    /// Each entry carries its own files and settings; siblings share nothing.
    pub fn compile_async(&self, query: &QueryBuilder) -> QbResult<Vec<CompiledQuery>> {
        query
            .async_queries()
            .into_iter()
            .map(QueryBuilder::compile)
            .collect()
    }
}

/// Join non-empty fragments with single spaces.
pub(crate) fn join_fragments<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for part in parts {
        let part = part.as_ref().trim();
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}

/// `<keyword> <body>`, or nothing for an empty body.
fn keyword(keyword: &str, body: String) -> String {
    if body.is_empty() {
        body
    } else {
        format!("{keyword} {body}")
    }
}

fn wrap_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        if f.is_sign_positive() { "inf" } else { "-inf" }.to_string()
    } else {
        f.to_string()
    }
}

/// Backslash-escape `'`, `"`, `\` and NUL.
pub(crate) fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\'' | '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out
}

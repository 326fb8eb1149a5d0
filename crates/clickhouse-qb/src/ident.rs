//! Identifiers and raw SQL expressions.
//!
//! [`Identifier`] is a name that is backtick-quoted when rendered. The raw
//! string may carry informal structure:
//!
//! - Dotted: `db.table` renders as `` `db`.`table` ``
//! - Aliased: `col as c` (any case) renders as `` `col` AS `c` ``
//! - The lone `*` passes through unquoted
//!
//! [`Expression`] is inserted verbatim; the caller owns its safety.
//!
//! # Example
//! ```
//! use clickhouse_qb::{Expression, Identifier};
//!
//! assert_eq!(Identifier::new("db.table").quoted(), "`db`.`table`");
//! assert_eq!(Expression::new("now()").as_str(), "now()");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn alias_separator() -> &'static Regex {
    static ALIAS_RE: OnceLock<Regex> = OnceLock::new();
    ALIAS_RE.get_or_init(|| Regex::new(r"(?i)\s+as\s+").expect("invalid built-in alias regex"))
}

/// A name that requires quoting (database, table, column or alias).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split `name as alias` into its two parts, if the identifier carries an alias.
    pub fn split_alias(&self) -> Option<(Identifier, Identifier)> {
        let mut parts = alias_separator().splitn(&self.0, 2);
        let name = parts.next()?.trim();
        let alias = parts.next()?.trim();
        Some((Identifier::new(name), Identifier::new(alias)))
    }

    /// Render the identifier with backtick quoting.
    pub fn quoted(&self) -> String {
        quote(&self.0)
    }
}

fn quote(raw: &str) -> String {
    if raw.contains('.') {
        return raw
            .split('.')
            .map(|part| quote(part.trim()))
            .collect::<Vec<_>>()
            .join(".");
    }

    let mut parts = alias_separator().splitn(raw, 2);
    if let (Some(name), Some(alias)) = (parts.next(), parts.next()) {
        return format!("{} AS {}", quote_part(name.trim()), quote_part(alias.trim()));
    }

    quote_part(raw)
}

fn quote_part(part: &str) -> String {
    if part == "*" {
        return part.to_string();
    }
    format!("`{}`", part.replace('`', "``"))
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for Identifier {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

/// A literal SQL fragment inserted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression(String);

impl Expression {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Expression {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Expression {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Shorthand for [`Expression::new`].
pub fn raw(sql: impl Into<String>) -> Expression {
    Expression::new(sql)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_simple() {
        assert_eq!(Identifier::new("column").quoted(), "`column`");
        assert_eq!(Identifier::new("we`ird").quoted(), "`we``ird`");
    }

    #[test]
    fn test_quote_star() {
        assert_eq!(Identifier::new("*").quoted(), "*");
        assert_eq!(Identifier::new("t.*").quoted(), "`t`.*");
    }

    #[test]
    fn test_quote_dotted() {
        assert_eq!(Identifier::new("db.table").quoted(), "`db`.`table`");
        assert_eq!(Identifier::new("db . table").quoted(), "`db`.`table`");
    }

    #[test]
    fn test_quote_alias() {
        assert_eq!(Identifier::new("col AS alias").quoted(), "`col` AS `alias`");
        assert_eq!(Identifier::new("col as alias").quoted(), "`col` AS `alias`");
        assert_eq!(Identifier::new("db.test as a").quoted(), "`db`.`test` AS `a`");
    }

    #[test]
    fn test_alias_is_not_a_substring_match() {
        assert_eq!(Identifier::new("alias_as_name").quoted(), "`alias_as_name`");
        assert_eq!(Identifier::new("class").quoted(), "`class`");
    }

    #[test]
    fn test_split_alias() {
        let (name, alias) = Identifier::new("table AS t").split_alias().unwrap();
        assert_eq!(name.as_str(), "table");
        assert_eq!(alias.as_str(), "t");
        assert!(Identifier::new("table").split_alias().is_none());
    }

    #[test]
    fn test_raw_expression() {
        assert_eq!(raw("count()").as_str(), "count()");
        assert_eq!(raw("a + 1").to_string(), "a + 1");
    }
}

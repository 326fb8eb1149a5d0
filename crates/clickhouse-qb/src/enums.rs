//! Enumerated SQL tokens: operators, join modifiers, order directions and formats.

use crate::error::QbError;
use std::fmt;
use std::str::FromStr;

/// Generate `as_str`, `Display` and `FromStr` for a token enum.
///
/// `FromStr` matches case-insensitively.
macro_rules! sql_tokens {
    ($name:ident, $err:ident, { $($variant:ident => $token:literal),+ $(,)? }) => {
        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// SQL token for this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = QbError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| QbError::$err(s.to_string()))
            }
        }
    };
}

/// Relational and arithmetic operators usable in predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    LessOrEq,
    GreaterOrEq,
    Less,
    Greater,
    Like,
    ILike,
    NotLike,
    Between,
    NotBetween,
    In,
    NotIn,
    GlobalIn,
    GlobalNotIn,
    And,
    Or,
    Concat,
    Lambda,
    Divide,
    Modulo,
    Multiple,
    Plus,
    Minus,
}

sql_tokens!(Operator, UnknownOperator, {
    Eq => "=",
    NotEq => "!=",
    LessOrEq => "<=",
    GreaterOrEq => ">=",
    Less => "<",
    Greater => ">",
    Like => "LIKE",
    ILike => "ILIKE",
    NotLike => "NOT LIKE",
    Between => "BETWEEN",
    NotBetween => "NOT BETWEEN",
    In => "IN",
    NotIn => "NOT IN",
    GlobalIn => "GLOBAL IN",
    GlobalNotIn => "GLOBAL NOT IN",
    And => "AND",
    Or => "OR",
    Concat => "||",
    Lambda => "->",
    Divide => "/",
    Modulo => "%",
    Multiple => "*",
    Plus => "+",
    Minus => "-",
});

impl Operator {
    /// Whether the operator takes a list (tuple, sub-query or table) on the right.
    pub fn is_membership(&self) -> bool {
        matches!(
            self,
            Operator::In | Operator::NotIn | Operator::GlobalIn | Operator::GlobalNotIn
        )
    }

    /// Whether the operator excludes matches.
    pub fn is_negated(&self) -> bool {
        matches!(
            self,
            Operator::NotEq
                | Operator::NotLike
                | Operator::NotBetween
                | Operator::NotIn
                | Operator::GlobalNotIn
        )
    }
}

/// Operator linking a predicate to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinStrict {
    All,
    Any,
}

sql_tokens!(JoinStrict, UnknownOperator, {
    All => "ALL",
    Any => "ANY",
});

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
    Asof,
}

sql_tokens!(JoinType, UnknownOperator, {
    Inner => "INNER",
    Left => "LEFT",
    Right => "RIGHT",
    Full => "FULL",
    Cross => "CROSS",
    Asof => "ASOF",
});

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

sql_tokens!(OrderDirection, UnknownOperator, {
    Asc => "ASC",
    Desc => "DESC",
});

/// Input/output serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    BlockTabSeparated,
    Csv,
    CsvWithNames,
    Json,
    JsonCompact,
    JsonEachRow,
    Native,
    Null,
    Pretty,
    PrettyCompact,
    PrettyCompactMonoBlock,
    PrettyNoEscapes,
    PrettyCompactNoEscapes,
    PrettySpaceNoEscapes,
    PrettySpace,
    RowBinary,
    TabSeparated,
    TabSeparatedRaw,
    TabSeparatedWithNames,
    TabSeparatedWithNamesAndTypes,
    Tskv,
    Values,
    Vertical,
    Xml,
    Tsv,
}

sql_tokens!(Format, UnknownFormat, {
    BlockTabSeparated => "BlockTabSeparated",
    Csv => "CSV",
    CsvWithNames => "CSVWithNames",
    Json => "JSON",
    JsonCompact => "JSONCompact",
    JsonEachRow => "JSONEachRow",
    Native => "Native",
    Null => "Null",
    Pretty => "Pretty",
    PrettyCompact => "PrettyCompact",
    PrettyCompactMonoBlock => "PrettyCompactMonoBlock",
    PrettyNoEscapes => "PrettyNoEscapes",
    PrettyCompactNoEscapes => "PrettyCompactNoEscapes",
    PrettySpaceNoEscapes => "PrettySpaceNoEscapes",
    PrettySpace => "PrettySpace",
    RowBinary => "RowBinary",
    TabSeparated => "TabSeparated",
    TabSeparatedRaw => "TabSeparatedRaw",
    TabSeparatedWithNames => "TabSeparatedWithNames",
    TabSeparatedWithNamesAndTypes => "TabSeparatedWithNamesAndTypes",
    Tskv => "TSKV",
    Values => "Values",
    Vertical => "Vertical",
    Xml => "XML",
    Tsv => "TSV",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_tokens() {
        assert_eq!(Operator::Eq.to_string(), "=");
        assert_eq!(Operator::GlobalNotIn.to_string(), "GLOBAL NOT IN");
        assert_eq!("not like".parse::<Operator>().unwrap(), Operator::NotLike);
        assert!("<>".parse::<Operator>().is_err());
    }

    #[test]
    fn test_operator_membership() {
        assert!(Operator::GlobalIn.is_membership());
        assert!(!Operator::Between.is_membership());
        assert!(Operator::NotBetween.is_negated());
    }

    #[test]
    fn test_format_parse_is_case_insensitive() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!(
            "tabseparated".parse::<Format>().unwrap(),
            Format::TabSeparated
        );
        assert_eq!(Format::JsonEachRow.to_string(), "JSONEachRow");

        let err = "yaml".parse::<Format>().unwrap_err();
        assert!(matches!(err, QbError::UnknownFormat(ref f) if f == "yaml"));
    }

    #[test]
    fn test_join_tokens() {
        assert_eq!(JoinStrict::Any.to_string(), "ANY");
        assert_eq!(JoinType::Asof.to_string(), "ASOF");
        assert_eq!("left".parse::<JoinType>().unwrap(), JoinType::Left);
        assert_eq!(OrderDirection::default(), OrderDirection::Asc);
    }
}

use super::*;
use crate::enums::Operator;
use crate::ident::{Expression, Identifier};
use crate::query::column::Column;
use crate::query::ddl::{CreateTable, DropTable};
use crate::query::from::FromClause;
use crate::query::join::JoinClause;
use crate::query::predicate::Predicate;

fn wrap(value: impl Into<Value>) -> String {
    Grammar.wrap(&value.into())
}

// ==================== wrap ====================

#[test]
fn test_wrap_null_and_bool() {
    assert_eq!(Grammar.wrap(&Value::Null), "null");
    assert_eq!(wrap(Option::<i32>::None), "null");
    assert_eq!(wrap(true), "true");
    assert_eq!(wrap(false), "false");
}

#[test]
fn test_wrap_numbers() {
    assert_eq!(wrap(42), "42");
    assert_eq!(wrap(-7i64), "-7");
    assert_eq!(wrap(u64::MAX), "18446744073709551615");
    assert_eq!(wrap(0.5), "0.5");
    assert_eq!(wrap(f64::NAN), "nan");
    assert_eq!(wrap(f64::INFINITY), "inf");
    assert_eq!(wrap(f64::NEG_INFINITY), "-inf");
}

#[test]
fn test_wrap_string_escapes() {
    assert_eq!(wrap("plain"), "'plain'");
    assert_eq!(wrap("it's"), r"'it\'s'");
    assert_eq!(wrap(r"back\slash"), r"'back\\slash'");
    assert_eq!(wrap("say \"hi\""), r#"'say \"hi\"'"#);
    assert_eq!(wrap("nul\0byte"), r"'nul\0byte'");
    assert_eq!(wrap(""), "''");
}

#[test]
fn test_escape_string_roundtrip() {
    let original = r#"a'b"c\d"#;
    let escaped = escape_string(original);
    assert_eq!(escaped, r#"a\'b\"c\\d"#);

    let mut unescaped = String::new();
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            unescaped.extend(chars.next());
        } else {
            unescaped.push(c);
        }
    }
    assert_eq!(unescaped, original);
}

#[test]
fn test_wrap_identifiers() {
    assert_eq!(wrap(Identifier::new("col")), "`col`");
    assert_eq!(wrap(Identifier::new("db.table")), "`db`.`table`");
    assert_eq!(wrap(Identifier::new("col AS alias")), "`col` AS `alias`");
    assert_eq!(wrap(Identifier::new("col as alias")), "`col` AS `alias`");
    assert_eq!(wrap(Identifier::new("*")), "*");
    assert_eq!(wrap(Identifier::new("we`ird")), "`we``ird`");
}

#[test]
fn test_wrap_expression_is_verbatim() {
    assert_eq!(wrap(Expression::new("now() - INTERVAL 1 DAY")), "now() - INTERVAL 1 DAY");
}

#[test]
fn test_wrap_arrays() {
    let value = Value::Array(vec![Value::from(1), Value::from("a"), Value::Null]);
    assert_eq!(Grammar.wrap(&value), "[1, 'a', null]");

    let nested = Value::from(vec![vec![1, 2], vec![3]]);
    assert_eq!(Grammar.wrap(&nested), "[[1, 2], [3]]");
    assert_eq!(Grammar.wrap(&Value::Array(Vec::new())), "[]");
}

#[test]
fn test_wrap_dates() {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    assert_eq!(wrap(date), "'2024-03-01'");
    let datetime = date.and_hms_opt(12, 30, 5).unwrap();
    assert_eq!(wrap(datetime), "'2024-03-01 12:30:05'");
}

// ==================== fragments ====================

#[test]
fn test_join_fragments_skips_empty() {
    assert_eq!(join_fragments(["SELECT", "", "  *  ", "FROM `t`"]), "SELECT * FROM `t`");
    assert_eq!(join_fragments(Vec::<String>::new()), "");
}

#[test]
fn test_compile_from_requires_table() {
    let err = Grammar.compile_from(&FromClause::new().alias("a")).unwrap_err();
    assert!(matches!(err, QbError::MissingFrom));
    assert_eq!(err.to_string(), "Missed table or subquery for 'FROM' section.");

    let sql = Grammar
        .compile_from(&FromClause::new().table("t").alias("a").final_(true))
        .unwrap();
    assert_eq!(sql, "FROM `t` AS `a` FINAL");
}

#[test]
fn test_compile_join_reports_all_missing_segments() {
    let err = Grammar.compile_join(&JoinClause::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missed required segments for 'JOIN' section. Missed: table or subquery, using or on clauses"
    );

    let err = Grammar.compile_join(&JoinClause::new().using(["id"])).unwrap_err();
    assert!(matches!(err, QbError::WrongJoin { ref missing } if missing == &["table or subquery"]));

    let err = Grammar.compile_join(&JoinClause::new().table("b")).unwrap_err();
    assert!(matches!(err, QbError::WrongJoin { ref missing } if missing == &["using or on clauses"]));
}

#[test]
fn test_compile_join_rejects_both_keys() {
    let join = JoinClause::new()
        .table("b")
        .using(["id"])
        .on("a.id", Operator::Eq, "b.id");
    let err = Grammar.compile_join(&join).unwrap_err();
    assert!(matches!(err, QbError::AmbiguousJoinKeys));
    assert!(err.is_join_error());
}

#[test]
fn test_compile_join_splits_table_alias() {
    let join = JoinClause::new().any().left().table("users as u").using(["id"]);
    assert_eq!(
        Grammar.compile_join(&join).unwrap(),
        "ANY LEFT JOIN `users` AS `u` USING `id`"
    );
}

#[test]
fn test_compile_predicates_conjunctions() {
    let predicates = vec![
        Predicate::and("a", Operator::Eq, 1),
        Predicate::or("b", Operator::Like, "x%"),
        Predicate::raw("", crate::enums::Conjunction::And),
        Predicate::and("c", Operator::NotEq, Value::Null),
    ];
    assert_eq!(
        Grammar.compile_predicates(&predicates).unwrap(),
        "`a` = 1 OR `b` LIKE 'x%' AND `c` != null"
    );
}

#[test]
fn test_compile_not_between() {
    let range = Predicate::range(1.into(), 10.into());
    let predicate = Predicate::and("a", Operator::NotBetween, range);
    assert_eq!(
        Grammar.compile_predicates(&[predicate]).unwrap(),
        "NOT ( `a` BETWEEN 1 AND 10 )"
    );
}

#[test]
fn test_compile_column_pipeline() {
    let column = Column::named("price").plus(1).multiple(2).round(2).as_("p");
    assert_eq!(Grammar.compile_column(&column).unwrap(), "round((`price` + 1) * 2, 2) AS `p`");

    let column = Column::named("a").multiple(3);
    assert_eq!(Grammar.compile_column(&column).unwrap(), "`a` * 3");

    // Alias without anything to alias renders nothing.
    assert_eq!(Grammar.compile_column(&Column::new().as_("x")).unwrap(), "");
    assert_eq!(Grammar.compile_columns(&[Column::new().as_("x")]).unwrap(), "*");
}

#[test]
fn test_compile_groups_star_suppresses_clause() {
    let groups = vec![Column::named("a"), Column::named("*")];
    assert_eq!(Grammar.compile_groups(&groups).unwrap(), "");
    assert_eq!(Grammar.compile_groups(&[Column::named("a")]).unwrap(), "GROUP BY `a`");
}

// ==================== DDL ====================

#[test]
fn test_compile_create_table() {
    let table = CreateTable::new("t")
        .if_not_exists()
        .on_cluster("c")
        .column("id", "UInt64")
        .column("name", "String")
        .engine("MergeTree() ORDER BY id");
    assert_eq!(
        Grammar.compile_create_table(&table),
        "CREATE TABLE IF NOT EXISTS `t` ON CLUSTER c (`id` UInt64, `name` String) ENGINE = MergeTree() ORDER BY id"
    );

    let table = CreateTable::new("t").columns([("a", "UInt8")]);
    assert_eq!(table.to_sql(), "CREATE TABLE `t` (`a` UInt8) ENGINE = Memory");
}

#[test]
fn test_compile_drop_table() {
    assert_eq!(DropTable::new("t").to_sql(), "DROP TABLE `t`");
    assert_eq!(
        Grammar.compile_drop_table(&DropTable::new("db.t").if_exists().on_cluster("c")),
        "DROP TABLE IF EXISTS `db`.`t` ON CLUSTER c"
    );
}

//! End-to-end compilation through the public API.

use clickhouse_qb::{
    Column, CreateTable, DropTable, Format, Grammar, Identifier, InsertRow, JoinClause, Operator,
    OrderDirection, QbError, QueryBuilder, TempTable, Value, raw,
};

#[test]
fn daily_revenue_report() {
    let sql = QueryBuilder::new()
        .select([
            Column::named(raw("toDate(created_at)")).as_("day"),
            Column::named("amount").sum().round(2).as_("revenue"),
            Column::new().count().as_("orders"),
        ])
        .from("shop.orders")
        .final_(true)
        .pre_where_eq("status", "paid")
        .where_between("created_at", "2024-01-01 00:00:00", "2024-01-31 23:59:59")
        .where_not_in("country", Vec::<&str>::new())
        .group_by(["day"])
        .having("revenue", Operator::Greater, 0)
        .order_by("day", OrderDirection::Asc)
        .format(Format::JsonEachRow)
        .to_sql()
        .unwrap();

    assert_eq!(
        sql,
        "SELECT toDate(created_at) AS `day`, round(sum(`amount`), 2) AS `revenue`, count() AS `orders` \
         FROM `shop`.`orders` FINAL \
         PREWHERE `status` = 'paid' \
         WHERE `created_at` BETWEEN '2024-01-01 00:00:00' AND '2024-01-31 23:59:59' \
         GROUP BY `day` HAVING `revenue` > 0 ORDER BY `day` ASC FORMAT JSONEachRow"
    );
}

#[test]
fn top_visitor_per_page_with_join() {
    let visits = QueryBuilder::new()
        .select(["page_id", "user_id"])
        .add_select([Column::new().count().as_("hits")])
        .from("visits")
        .where_global_in(
            "user_id",
            QueryBuilder::new()
                .select(["id"])
                .from("users")
                .where_eq("active", true),
        )
        .group_by(["page_id", "user_id"]);

    let sql = QueryBuilder::new()
        .select(["p.title", "v.user_id", "v.hits"])
        .from_as("pages", "p")
        .join(|j: JoinClause| {
            j.all()
                .inner()
                .sub_query("v", visits)
                .on("p.id", Operator::Eq, "v.page_id")
        })
        .order_by_desc("v.hits")
        .limit_by(1, ["p.id"])
        .limit(100)
        .to_sql()
        .unwrap();

    assert_eq!(
        sql,
        "SELECT `p`.`title`, `v`.`user_id`, `v`.`hits` FROM `pages` AS `p` \
         ALL INNER JOIN (SELECT `page_id`, `user_id`, count() AS `hits` FROM `visits` \
         WHERE `user_id` GLOBAL IN (SELECT `id` FROM `users` WHERE `active` = true) \
         GROUP BY `page_id`, `user_id`) AS `v` ON `p`.`id` = `v`.`page_id` \
         ORDER BY `v`.`hits` DESC LIMIT 1 BY `p`.`id` LIMIT 100"
    );
}

#[test]
fn filter_by_attached_file() {
    let file = TempTable::new("blocked", "10\n20\n30\n")
        .with_structure([("id", "UInt64")])
        .with_format(Format::Csv);

    let query = QueryBuilder::new()
        .from("events")
        .add_file(file.clone())
        .where_not_in("user_id", "blocked")
        .setting("max_execution_time", 30);

    let compiled = query.compile().unwrap();
    assert_eq!(compiled.sql, "SELECT * FROM `events` WHERE `user_id` NOT IN `blocked`");
    assert_eq!(compiled.files, vec![file]);
    assert_eq!(compiled.settings.get("max_execution_time"), Some("30"));
}

#[test]
fn malformed_queries_fail_only_when_compiled() {
    // Building never fails; every problem surfaces at compile time.
    let query = QueryBuilder::new()
        .from("a")
        .join(JoinClause::new().using(["id"]));
    let err = query.to_sql().unwrap_err();
    assert!(err.is_structural());
    assert!(matches!(err, QbError::WrongJoin { .. }));

    // Fixing the model afterwards makes it compile.
    let query = QueryBuilder::new()
        .from("a")
        .join(JoinClause::new().table("b").using(["id"]));
    assert_eq!(query.to_sql().unwrap(), "SELECT * FROM `a` JOIN `b` USING `id`");
}

#[test]
fn batch_of_dashboard_tiles() {
    let total = QueryBuilder::new().select([Column::new().count()]).from("events");
    let batch = total
        .async_with_query(|q: QueryBuilder| {
            q.select(["kind"])
                .from("events")
                .group_by(["kind"])
                .async_with_query(|q: QueryBuilder| q.from("kinds"))
        })
        .async_with_query(QueryBuilder::new().from("errors").limit(10));

    let sql: Vec<String> = batch
        .to_async_sql()
        .unwrap()
        .into_iter()
        .map(|q| q.sql)
        .collect();
    assert_eq!(
        sql,
        vec![
            "SELECT count() FROM `events`",
            "SELECT `kind` FROM `events` GROUP BY `kind`",
            "SELECT * FROM `kinds`",
            "SELECT * FROM `errors` LIMIT 10",
        ]
    );
}

#[test]
fn insert_and_delete_statements() {
    let target = QueryBuilder::new().table("db.metrics").format(Format::Values);
    let rows = [
        InsertRow::named([("value", Value::from(1.5)), ("name", Value::from("cpu"))]),
        InsertRow::named([("name", Value::from("mem")), ("value", Value::Null)]),
    ];
    assert_eq!(
        Grammar.compile_insert(&target, &rows).unwrap(),
        "INSERT INTO `db`.`metrics` (`name`, `value`) FORMAT Values ('cpu', 1.5), ('mem', null)"
    );

    let delete = QueryBuilder::new()
        .from("db.metrics")
        .on_cluster("main")
        .where_("ts", Operator::Less, raw("now() - INTERVAL 30 DAY"));
    assert_eq!(
        Grammar.compile_delete(&delete).unwrap(),
        "ALTER TABLE `db`.`metrics` ON CLUSTER main DELETE WHERE `ts` < now() - INTERVAL 30 DAY"
    );
}

#[test]
fn ddl_statements() {
    let create = CreateTable::new("tmp_ids")
        .if_not_exists()
        .columns([("id", "UInt64"), ("tag", "LowCardinality(String)")]);
    assert_eq!(
        create.to_sql(),
        "CREATE TABLE IF NOT EXISTS `tmp_ids` (`id` UInt64, `tag` LowCardinality(String)) ENGINE = Memory"
    );
    assert_eq!(
        DropTable::new("tmp_ids").if_exists().to_sql(),
        "DROP TABLE IF EXISTS `tmp_ids`"
    );
}

#[test]
fn identifier_quoting_is_shared() {
    let grammar = Grammar;
    assert_eq!(grammar.wrap(&Identifier::new("db.table").into()), "`db`.`table`");
    assert_eq!(grammar.wrap(&Identifier::new("col AS alias").into()), "`col` AS `alias`");
    assert_eq!(grammar.wrap(&Identifier::new("*").into()), "*");
    assert_eq!(grammar.wrap(&Value::from(r"a\'b")), r"'a\\\'b'");
}

#[test]
fn format_names_parse() {
    assert_eq!("JSONEachRow".parse::<Format>().unwrap(), Format::JsonEachRow);
    assert!(matches!("Parquet2".parse::<Format>(), Err(QbError::UnknownFormat(_))));
}

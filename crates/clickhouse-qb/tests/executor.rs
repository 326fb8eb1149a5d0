//! Executor-facing operations against a recording client.

use bytes::Bytes;
use clickhouse_qb::{
    ClickhouseClient, ClientConfig, CompiledQuery, CreateTable, DataSource, Format,
    InstrumentedClient, InsertRow, QbError, QbResult, QueryBuilder, Row, RowSet, TempTable,
    into_memory_table,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Mutex;

// ── Shared recording client for tests ──

#[derive(Default)]
struct MockClient {
    /// Canned results keyed by exact SQL; anything else returns no rows.
    responses: Vec<(String, RowSet)>,
    selects: Mutex<Vec<CompiledQuery>>,
    writes: Mutex<Vec<(String, Option<DataSource>)>>,
}

impl MockClient {
    fn respond(mut self, sql: &str, rows: Vec<serde_json::Value>) -> Self {
        let rows = rows.into_iter().map(row).collect();
        self.responses.push((sql.to_string(), RowSet::new(rows)));
        self
    }

    fn selected(&self) -> Vec<String> {
        self.selects
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.sql.clone())
            .collect()
    }

    fn written(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }
}

impl ClickhouseClient for MockClient {
    async fn select(&self, query: &CompiledQuery) -> QbResult<RowSet> {
        self.selects.lock().unwrap().push(query.clone());
        Ok(self
            .responses
            .iter()
            .find(|(sql, _)| *sql == query.sql)
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }

    async fn write(&self, sql: &str, payload: Option<&DataSource>) -> QbResult<bool> {
        self.writes
            .lock()
            .unwrap()
            .push((sql.to_string(), payload.cloned()));
        Ok(true)
    }
}

fn row(value: serde_json::Value) -> Row {
    value.as_object().cloned().unwrap_or_default()
}

// ── SELECT ──

#[tokio::test]
async fn get_returns_rows() {
    let client = MockClient::default().respond(
        "SELECT `id` FROM `users`",
        vec![json!({"id": 1}), json!({"id": 2})],
    );

    let rows = QueryBuilder::new()
        .select(["id"])
        .from("users")
        .get(&client)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.rows()[1]["id"], json!(2));
    assert_eq!(client.selected(), vec!["SELECT `id` FROM `users`"]);
}

#[tokio::test]
async fn get_async_keeps_batch_order() {
    let client = MockClient::default()
        .respond("SELECT * FROM `a`", vec![json!({"n": "a"})])
        .respond("SELECT * FROM `b`", vec![json!({"n": "b"})])
        .respond("SELECT * FROM `c`", vec![json!({"n": "c"})]);

    let results = QueryBuilder::new()
        .from("a")
        .async_with_query(QueryBuilder::new().from("b").async_with_query(|q: QueryBuilder| q.from("c")))
        .get_async(&client)
        .await
        .unwrap();

    let names: Vec<&str> = results
        .iter()
        .map(|r| r.rows()[0]["n"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn get_as_deserializes_rows() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u64,
        name: String,
    }

    let client = MockClient::default().respond(
        "SELECT * FROM `users`",
        vec![json!({"id": 1, "name": "alice"})],
    );
    let users: Vec<User> = QueryBuilder::new().from("users").get_as(&client).await.unwrap();
    assert_eq!(
        users,
        vec![User {
            id: 1,
            name: "alice".to_string()
        }]
    );
}

#[tokio::test]
async fn first_limits_to_one_row() {
    let client = MockClient::default().respond(
        "SELECT * FROM `users` LIMIT 1",
        vec![json!({"id": 7})],
    );
    let query = QueryBuilder::new().from("users").limit(50);
    let first = query.first(&client).await.unwrap().unwrap();
    assert_eq!(first["id"], json!(7));

    // The original query keeps its own limit.
    assert_eq!(query.to_sql().unwrap(), "SELECT * FROM `users` LIMIT 50");

    let none = QueryBuilder::new().from("empty").first(&client).await.unwrap();
    assert!(none.is_none());
}

// ── count / paginate ──

#[tokio::test]
async fn count_reads_count_column() {
    let client = MockClient::default()
        .respond(
            "SELECT count() AS `count` FROM `t` WHERE `a` = 1",
            vec![json!({"count": "42"})],
        )
        .respond("SELECT count() AS `count` FROM `u`", vec![json!({"count": 5})]);

    let total = QueryBuilder::new()
        .from("t")
        .where_eq("a", 1)
        .order_by_asc("a")
        .count(&client)
        .await
        .unwrap();
    assert_eq!(total, 42);

    assert_eq!(QueryBuilder::new().from("u").count(&client).await.unwrap(), 5);
    assert_eq!(QueryBuilder::new().from("v").count(&client).await.unwrap(), 0);
}

#[tokio::test]
async fn count_under_group_by_counts_groups() {
    let client = MockClient::default().respond(
        "SELECT count() AS `count` FROM `t` GROUP BY `kind`",
        vec![json!({"count": 3}), json!({"count": 9})],
    );
    let groups = QueryBuilder::new()
        .from("t")
        .group_by(["kind"])
        .count(&client)
        .await
        .unwrap();
    assert_eq!(groups, 2);
}

#[tokio::test]
async fn count_covers_every_union_branch() {
    let client = MockClient::default().respond(
        "SELECT count() AS `count` FROM (SELECT * FROM `t` UNION ALL SELECT * FROM `u`)",
        vec![json!({"count": "7"})],
    );
    let total = QueryBuilder::new()
        .from("t")
        .union_all(QueryBuilder::new().from("u"))
        .count(&client)
        .await
        .unwrap();
    assert_eq!(total, 7);
}

#[tokio::test]
async fn count_of_grouped_limit_by_reads_wrapped_total() {
    let client = MockClient::default().respond(
        "SELECT count() AS `count` FROM (SELECT * FROM `t` GROUP BY `kind` LIMIT 1 BY `kind`)",
        vec![json!({"count": 4})],
    );
    let total = QueryBuilder::new()
        .from("t")
        .group_by(["kind"])
        .limit_by(1, ["kind"])
        .count(&client)
        .await
        .unwrap();
    assert_eq!(total, 4);
}

#[tokio::test]
async fn count_rejects_non_numeric_values() {
    let client = MockClient::default().respond(
        "SELECT count() AS `count` FROM `t`",
        vec![json!({"count": "many"})],
    );
    let err = QueryBuilder::new().from("t").count(&client).await.unwrap_err();
    assert!(matches!(err, QbError::Decode(_)));
}

#[tokio::test]
async fn paginate_computes_pages() {
    let client = MockClient::default()
        .respond("SELECT count() AS `count` FROM `t`", vec![json!({"count": 25})])
        .respond(
            "SELECT * FROM `t` ORDER BY `id` ASC LIMIT 10, 10",
            vec![json!({"id": 11}), json!({"id": 12})],
        );

    let page = QueryBuilder::new()
        .from("t")
        .order_by_asc("id")
        .paginate(&client, 2, 10)
        .await
        .unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.last_page, 3);
    assert_eq!(page.items.len(), 2);
    assert!(page.has_more());

    assert_eq!(
        client.selected(),
        vec![
            "SELECT count() AS `count` FROM `t`",
            "SELECT * FROM `t` ORDER BY `id` ASC LIMIT 10, 10",
        ]
    );
}

#[tokio::test]
async fn paginate_clamps_page_and_rejects_zero_size() {
    let client = MockClient::default();

    let page = QueryBuilder::new().from("t").paginate(&client, 0, 20).await.unwrap();
    assert_eq!(page.current_page, 1);
    assert_eq!(page.last_page, 1);
    assert!(!page.has_more());
    assert_eq!(client.selected()[1], "SELECT * FROM `t` LIMIT 0, 20");

    let err = QueryBuilder::new().from("t").paginate(&client, 1, 0).await.unwrap_err();
    assert!(matches!(err, QbError::InvalidArgument(_)));
}

#[tokio::test]
async fn paginate_rejects_out_of_range_page() {
    let client = MockClient::default();
    let err = QueryBuilder::new()
        .from("t")
        .paginate(&client, u64::MAX, 15)
        .await
        .unwrap_err();
    assert!(matches!(err, QbError::InvalidArgument(_)));
    assert!(client.selected().is_empty());
}

// ── writes ──

#[tokio::test]
async fn insert_without_rows_is_skipped() {
    let client = MockClient::default();
    let inserted = QueryBuilder::new()
        .table("t")
        .insert(&client, Vec::<InsertRow>::new())
        .await
        .unwrap();
    assert!(!inserted);
    assert!(client.written().is_empty());
}

#[tokio::test]
async fn insert_inlines_values() {
    let client = MockClient::default();
    let inserted = QueryBuilder::new()
        .table("t")
        .insert(&client, [InsertRow::named([("b", 2), ("a", 1)])])
        .await
        .unwrap();
    assert!(inserted);

    let writes = client.writes.lock().unwrap();
    assert_eq!(writes[0].0, "INSERT INTO `t` (`a`, `b`) FORMAT Values (1, 2)");
    assert!(writes[0].1.is_none());
}

#[tokio::test]
async fn insert_json_each_row_sends_payload() {
    let client = MockClient::default();
    QueryBuilder::new()
        .table("t")
        .format(Format::JsonEachRow)
        .insert(
            &client,
            [
                InsertRow::named([("a", 1), ("b", 2)]),
                InsertRow::named([("a", 3), ("b", 4)]),
            ],
        )
        .await
        .unwrap();

    let writes = client.writes.lock().unwrap();
    assert_eq!(writes[0].0, "INSERT INTO `t` FORMAT JSONEachRow");
    assert_eq!(
        writes[0].1,
        Some(DataSource::Memory(Bytes::from_static(
            b"{\"a\":1,\"b\":2}\n{\"a\":3,\"b\":4}\n"
        )))
    );
}

#[tokio::test]
async fn insert_files_keeps_order() {
    let client = MockClient::default();
    let results = QueryBuilder::new()
        .table("t")
        .insert_files(&client, &["a", "b"], ["1,2\n", "3,4\n", "5,6\n"], Format::Csv, 2)
        .await
        .unwrap();
    assert_eq!(results, vec![true, true, true]);

    let writes = client.writes.lock().unwrap();
    assert_eq!(writes.len(), 3);
    assert!(writes.iter().all(|(sql, _)| sql == "INSERT INTO `t` (`a`, `b`) FORMAT CSV"));
    let payloads: Vec<Option<DataSource>> = writes.iter().map(|(_, p)| p.clone()).collect();
    assert_eq!(
        payloads,
        vec![
            Some(DataSource::from("1,2\n")),
            Some(DataSource::from("3,4\n")),
            Some(DataSource::from("5,6\n")),
        ]
    );
}

#[tokio::test]
async fn delete_and_ddl_execute() {
    let client = MockClient::default();
    QueryBuilder::new()
        .from("t")
        .where_eq("id", 1)
        .delete(&client)
        .await
        .unwrap();
    CreateTable::new("t").column("id", "UInt64").execute(&client).await.unwrap();

    assert_eq!(
        client.written(),
        vec![
            "ALTER TABLE `t` DELETE WHERE `id` = 1",
            "CREATE TABLE `t` (`id` UInt64) ENGINE = Memory",
        ]
    );

    let err = QueryBuilder::new().from("t").delete(&client).await.unwrap_err();
    assert!(matches!(err, QbError::MissingDeleteWhere));
    assert_eq!(client.written().len(), 2);
}

#[tokio::test]
async fn memory_table_from_file() {
    let client = MockClient::default();
    let file = TempTable::new("ids", "1\n2\n").with_structure([("id", "UInt64")]);
    assert!(into_memory_table(&client, &file).await.unwrap());

    assert_eq!(
        client.written(),
        vec![
            "DROP TABLE IF EXISTS `ids`",
            "CREATE TABLE `ids` (`id` UInt64) ENGINE = Memory",
            "INSERT INTO `ids` FORMAT CSV",
        ]
    );
}

#[tokio::test]
async fn memory_table_requires_structure() {
    let client = MockClient::default();
    let file = TempTable::new("ids", "1\n");
    let err = into_memory_table(&client, &file).await.unwrap_err();
    assert!(matches!(err, QbError::NoTableStructure));
    assert!(client.written().is_empty());
}

// ── instrumentation ──

#[tokio::test]
async fn instrumented_client_merges_settings() {
    let client = InstrumentedClient::new(MockClient::default())
        .with_config(ClientConfig::new().with_setting("max_threads", 4));

    QueryBuilder::new()
        .from("t")
        .setting("readonly", 1)
        .get(&client)
        .await
        .unwrap();

    let selects = client.inner().selects.lock().unwrap();
    assert_eq!(selects[0].settings.get("max_threads"), Some("4"));
    assert_eq!(selects[0].settings.get("readonly"), Some("1"));
}

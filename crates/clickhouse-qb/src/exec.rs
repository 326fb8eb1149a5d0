//! Executor-facing operations.
//!
//! These bind a compiled statement to a [`ClickhouseClient`] and do the
//! little post-processing ClickHouse results need (count extraction,
//! pagination). Everything else is passed through unchanged.

use crate::client::{ClickhouseClient, DataSource, Row, RowSet, TempTable};
use crate::enums::Format;
use crate::error::{QbError, QbResult};
use crate::grammar::Grammar;
use crate::ident::Identifier;
use crate::query::QueryBuilder;
use crate::query::ddl::{CreateTable, DropTable};
use crate::query::insert::InsertRow;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;

/// One page of results with the total row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Row>,
    pub total: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub last_page: u64,
}

impl Page {
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

impl QueryBuilder {
    /// Execute the query and return its rows.
    pub async fn get(&self, client: &impl ClickhouseClient) -> QbResult<RowSet> {
        let query = self.compile()?;
        client.select(&query).await
    }

    /// Execute the query and all its siblings as one batch.
    ///
    /// Results follow [`QueryBuilder::async_queries`] order.
    pub async fn get_async(&self, client: &impl ClickhouseClient) -> QbResult<Vec<RowSet>> {
        let queries = self.to_async_sql()?;
        client.select_batch(&queries).await
    }

    /// Execute the query and deserialize every row into `T`.
    pub async fn get_as<T: DeserializeOwned>(&self, client: &impl ClickhouseClient) -> QbResult<Vec<T>> {
        self.get(client).await?.deserialize()
    }

    /// Execute the query with `LIMIT 1` and return the row, if any.
    pub async fn first(&self, client: &impl ClickhouseClient) -> QbResult<Option<Row>> {
        let rows = self.clone().limit(1).get(client).await?;
        Ok(rows.into_rows().into_iter().next())
    }

    /// Number of rows the query returns.
    ///
    /// Under GROUP BY this is the number of groups, otherwise the `count`
    /// column of the first row.
    pub async fn count(&self, client: &impl ClickhouseClient) -> QbResult<u64> {
        let query = self.count_query();
        let rows = query.get(client).await?;
        if !query.groups.is_empty() {
            return Ok(rows.len() as u64);
        }
        match rows.first().and_then(|row| row.get("count")) {
            None => Ok(0),
            Some(value) => parse_count(value),
        }
    }

    /// Fetch page `page` (1-based) of `per_page` rows together with the total.
    pub async fn paginate(
        &self,
        client: &impl ClickhouseClient,
        page: u64,
        per_page: u64,
    ) -> QbResult<Page> {
        if per_page == 0 {
            return Err(QbError::invalid_argument("per_page must be greater than zero"));
        }
        let page = page.max(1);
        let offset = per_page
            .checked_mul(page - 1)
            .ok_or_else(|| QbError::invalid_argument(format!("page {page} is out of range")))?;
        let total = self.count(client).await?;
        let items = self
            .clone()
            .limit_offset(per_page, offset)
            .get(client)
            .await?
            .into_rows();

        Ok(Page {
            items,
            total,
            per_page,
            current_page: page,
            last_page: total.div_ceil(per_page).max(1),
        })
    }

    /// Insert rows into the FROM table.
    ///
    /// Returns `Ok(false)` without calling the client when `rows` is empty.
    /// With `JSONEachRow` format the rows are sent as a payload.
    pub async fn insert<I, R>(&self, client: &impl ClickhouseClient, rows: I) -> QbResult<bool>
    where
        I: IntoIterator<Item = R>,
        R: Into<InsertRow>,
    {
        let rows: Vec<InsertRow> = rows.into_iter().map(Into::into).collect();
        if rows.is_empty() {
            return Ok(false);
        }

        let sql = Grammar.compile_insert(self, &rows)?;
        match self.format {
            Some(Format::JsonEachRow) => {
                let payload = DataSource::Memory(InsertRow::json_lines(&rows)?);
                client.write(&sql, Some(&payload)).await
            }
            _ => client.write(&sql, None).await,
        }
    }

    /// Insert one file into the FROM table.
    pub async fn insert_file(
        &self,
        client: &impl ClickhouseClient,
        columns: &[&str],
        file: impl Into<DataSource>,
        format: Format,
    ) -> QbResult<bool> {
        let results = self.insert_files(client, columns, [file], format, 1).await?;
        Ok(results.into_iter().all(|ok| ok))
    }

    /// Insert files into the FROM table, at most `concurrency` at a time.
    ///
    /// Results keep the input order.
    pub async fn insert_files<I, D>(
        &self,
        client: &impl ClickhouseClient,
        columns: &[&str],
        files: I,
        format: Format,
        concurrency: usize,
    ) -> QbResult<Vec<bool>>
    where
        I: IntoIterator<Item = D>,
        D: Into<DataSource>,
    {
        let columns: Vec<Identifier> = columns.iter().copied().map(Identifier::new).collect();
        let sql = Grammar.compile_insert_header(self, &columns, format)?;
        let sources: Vec<DataSource> = files.into_iter().map(Into::into).collect();

        stream::iter(sources.iter())
            .map(|source| client.write(&sql, Some(source)))
            .buffered(concurrency.max(1))
            .try_collect()
            .await
    }

    /// `ALTER TABLE ... DELETE WHERE ...`.
    pub async fn delete(&self, client: &impl ClickhouseClient) -> QbResult<bool> {
        let sql = Grammar.compile_delete(self)?;
        client.write(&sql, None).await
    }
}

/// Generate `execute` for statements compiled by an infallible `to_sql`.
macro_rules! impl_statement_exec {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $ty {
                /// Compile and execute the statement.
                pub async fn execute(&self, client: &impl ClickhouseClient) -> QbResult<bool> {
                    client.write(&self.to_sql(), None).await
                }
            }
        )+
    };
}

impl_statement_exec!(CreateTable, DropTable);

/// Load an attached file into a `Memory` table named after it.
///
/// Drops any existing table of that name, creates it from the file's
/// structure and inserts the file (CSV unless the file names a format).
pub async fn into_memory_table(client: &impl ClickhouseClient, file: &TempTable) -> QbResult<bool> {
    if file.structure().is_empty() {
        return Err(QbError::NoTableStructure);
    }

    DropTable::new(file.name()).if_exists().execute(client).await?;
    CreateTable::new(file.name())
        .engine("Memory")
        .columns(file.structure().iter().map(|(n, t)| (n.as_str(), t.as_str())))
        .execute(client)
        .await?;

    QueryBuilder::new()
        .table(file.name())
        .insert_file(client, &[], file.source().clone(), file.format().unwrap_or(Format::Csv))
        .await
}

fn parse_count(value: &serde_json::Value) -> QbResult<u64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| QbError::decode(format!("count is not an unsigned integer: {n}"))),
        // UInt64 is quoted in ClickHouse JSON output.
        serde_json::Value::String(s) => s
            .parse()
            .map_err(|_| QbError::decode(format!("count is not numeric: {s:?}"))),
        other => Err(QbError::decode(format!("unexpected count value: {other}"))),
    }
}

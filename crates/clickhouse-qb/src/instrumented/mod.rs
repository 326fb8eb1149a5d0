//! Executor wrapper adding timeouts, default settings and SQL logging.
//!
//! # Example
//!
//! ```rust,ignore
//! use clickhouse_qb::{ClientConfig, InstrumentedClient};
//! use std::time::Duration;
//!
//! let config = ClientConfig::new()
//!     .with_query_timeout(Duration::from_secs(30))
//!     .with_setting("max_execution_time", 30);
//!
//! let client = InstrumentedClient::new(http_client).with_config(config);
//! ```

mod config;


pub use config::ClientConfig;

use crate::client::{ClickhouseClient, CompiledQuery, DataSource, RowSet};
use crate::error::{QbError, QbResult};
use std::time::{Duration, Instant};

/// A [`ClickhouseClient`] wrapped with [`ClientConfig`] behavior.
#[derive(Debug, Clone)]
pub struct InstrumentedClient<C> {
    client: C,
    config: ClientConfig,
}

impl<C: ClickhouseClient> InstrumentedClient<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            config: ClientConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.config.query_timeout = Some(timeout);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    pub fn inner(&self) -> &C {
        &self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }

    /// Default settings overlaid with the query's own.
    fn with_defaults(&self, query: &CompiledQuery) -> CompiledQuery {
        let mut settings = self.config.default_settings.clone();
        settings.merge(&query.settings);
        CompiledQuery {
            sql: query.sql.clone(),
            files: query.files.clone(),
            settings,
        }
    }

    async fn execute_with_timeout<T, F>(&self, future: F) -> QbResult<T>
    where
        F: std::future::Future<Output = QbResult<T>> + Send,
    {
        match self.config.query_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, future).await {
                Ok(result) => result,
                Err(_) => Err(QbError::Timeout(timeout)),
            },
            None => future.await,
        }
    }

    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    fn truncate_sql(&self, sql: &str) -> String {
        match self.config.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    #[cfg(feature = "tracing")]
    fn log<T>(&self, kind: &'static str, sql: &str, files: usize, elapsed: Duration, result: &QbResult<T>) {
        use tracing::Level;

        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        if !self.config.logging_enabled {
            return;
        }
        let sql = self.truncate_sql(sql);
        match result {
            Err(QbError::Timeout(timeout)) => tracing::warn!(
                target: "clickhouse_qb.sql",
                kind,
                sql = %sql,
                files,
                timeout = ?timeout,
                "query timed out",
            ),
            Err(error) => emit_at_level!(
                self.config.log_level,
                target: "clickhouse_qb.sql",
                kind,
                sql = %sql,
                files,
                elapsed = ?elapsed,
                error = %error,
            ),
            Ok(_) => emit_at_level!(
                self.config.log_level,
                target: "clickhouse_qb.sql",
                kind,
                sql = %sql,
                files,
                elapsed = ?elapsed,
            ),
        }
    }

    #[cfg(not(feature = "tracing"))]
    fn log<T>(&self, _: &'static str, _: &str, _: usize, _: Duration, _: &QbResult<T>) {}
}

impl<C: ClickhouseClient> ClickhouseClient for InstrumentedClient<C> {
    async fn select(&self, query: &CompiledQuery) -> QbResult<RowSet> {
        let query = self.with_defaults(query);

        let start = Instant::now();
        let result = self.execute_with_timeout(self.client.select(&query)).await;
        self.log("select", &query.sql, query.files.len(), start.elapsed(), &result);
        result
    }

    async fn select_batch(&self, queries: &[CompiledQuery]) -> QbResult<Vec<RowSet>> {
        let queries: Vec<CompiledQuery> = queries.iter().map(|q| self.with_defaults(q)).collect();

        let start = Instant::now();
        let result = self
            .execute_with_timeout(self.client.select_batch(&queries))
            .await;
        let sql = queries
            .iter()
            .map(|q| q.sql.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let files = queries.iter().map(|q| q.files.len()).sum();
        self.log("batch", &sql, files, start.elapsed(), &result);
        result
    }

    async fn write(&self, sql: &str, payload: Option<&DataSource>) -> QbResult<bool> {
        let start = Instant::now();
        let result = self.execute_with_timeout(self.client.write(sql, payload)).await;
        self.log("write", sql, usize::from(payload.is_some()), start.elapsed(), &result);
        result
    }
}

/// Cut `sql` to at most `max_bytes`, backing off to a char boundary.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

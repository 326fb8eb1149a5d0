//! # clickhouse-qb
//!
//! A fluent query builder for ClickHouse that compiles to SQL text.
//!
//! ## Features
//!
//! - **Dialect-aware**: PREWHERE, SAMPLE, ARRAY JOIN, LIMIT BY, GLOBAL joins, FORMAT, ON CLUSTER
//! - **Pure compiler**: building and compiling never touches the network; `to_sql()` is repeatable
//! - **Lazy validation**: malformed queries are reported by the compiler, not by fluent calls
//! - **Batches**: sibling queries registered with `async_with_query` compile to one ordered list
//! - **Bring your transport**: execution goes through the `ClickhouseClient` trait
//! - **Instrumentation**: timeouts, default settings and `tracing` SQL logs via `InstrumentedClient`
//!
//! ## Query Builder
//!
//! ```
//! use clickhouse_qb::{Column, OrderDirection, QueryBuilder};
//!
//! let sql = QueryBuilder::new()
//!     .select([Column::named("amount").sum().as_("total")])
//!     .add_select(["user_id"])
//!     .from("payments")
//!     .pre_where_eq("status", "paid")
//!     .where_between("created_at", "2024-01-01", "2024-02-01")
//!     .group_by(["user_id"])
//!     .order_by("total", OrderDirection::Desc)
//!     .limit(10)
//!     .to_sql()?;
//!
//! assert_eq!(
//!     sql,
//!     "SELECT sum(`amount`) AS `total`, `user_id` FROM `payments` \
//!      PREWHERE `status` = 'paid' \
//!      WHERE `created_at` BETWEEN '2024-01-01' AND '2024-02-01' \
//!      GROUP BY `user_id` ORDER BY `total` DESC LIMIT 10"
//! );
//! # Ok::<(), clickhouse_qb::QbError>(())
//! ```
//!
//! ## Execution
//!
//! ```ignore
//! let rows = QueryBuilder::new()
//!     .from("events")
//!     .where_("ts", Operator::Greater, "2024-01-01")
//!     .get(&client)
//!     .await?;
//!
//! QueryBuilder::new()
//!     .table("events")
//!     .insert(&client, [InsertRow::named([("id", 1), ("kind", 2)])])
//!     .await?;
//! ```

pub mod client;
pub mod enums;
pub mod error;
pub mod exec;
pub mod grammar;
pub mod ident;
pub mod instrumented;
pub mod query;
pub mod value;

pub use client::{
    ClickhouseClient, CompiledQuery, DataSource, Row, RowSet, Settings, TempTable,
};
pub use enums::{Conjunction, Format, JoinStrict, JoinType, Operator, OrderDirection};
pub use error::{QbError, QbResult};
pub use exec::{Page, into_memory_table};
pub use grammar::Grammar;
pub use ident::{Expression, Identifier, raw};
pub use instrumented::{ClientConfig, InstrumentedClient};
pub use value::{Tuple, Value};

// Re-export the query model for easy access
pub use query::column::{Column, ColumnFunction, ColumnName, SelectItem};
pub use query::ddl::{CreateTable, DropTable};
pub use query::from::{FromClause, TableSource, merge, remote};
pub use query::insert::InsertRow;
pub use query::join::{ArrayJoinClause, JoinClause, JoinSource};
pub use query::limit::{Limit, Order};
pub use query::predicate::{IntoColumnOperand, Operand, Predicate};
pub use query::{QueryBuilder, QuerySource};

//! CREATE TABLE / DROP TABLE statements.

use crate::grammar::Grammar;
use crate::ident::Identifier;

/// `CREATE TABLE [IF NOT EXISTS] name [ON CLUSTER c] (col type, ...) ENGINE = engine`.
#[derive(Debug, Clone)]
pub struct CreateTable {
    pub(crate) table: Identifier,
    pub(crate) engine: String,
    pub(crate) structure: Vec<(Identifier, String)>,
    pub(crate) if_not_exists: bool,
    pub(crate) on_cluster: Option<String>,
}

impl CreateTable {
    /// A new table definition with the `Memory` engine.
    pub fn new(table: impl Into<Identifier>) -> Self {
        Self {
            table: table.into(),
            engine: "Memory".to_string(),
            structure: Vec::new(),
            if_not_exists: false,
            on_cluster: None,
        }
    }

    /// Engine clause, inserted verbatim (`MergeTree() ORDER BY id`).
    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Append a column; the type is inserted verbatim.
    pub fn column(mut self, name: impl Into<Identifier>, ty: impl Into<String>) -> Self {
        self.structure.push((name.into(), ty.into()));
        self
    }

    /// Append several `(name, type)` columns.
    pub fn columns<I, N, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<Identifier>,
        T: Into<String>,
    {
        self.structure
            .extend(columns.into_iter().map(|(n, t)| (n.into(), t.into())));
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn on_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.on_cluster = Some(cluster.into());
        self
    }

    pub fn to_sql(&self) -> String {
        Grammar.compile_create_table(self)
    }
}

/// `DROP TABLE [IF EXISTS] name [ON CLUSTER c]`.
#[derive(Debug, Clone)]
pub struct DropTable {
    pub(crate) table: Identifier,
    pub(crate) if_exists: bool,
    pub(crate) on_cluster: Option<String>,
}

impl DropTable {
    pub fn new(table: impl Into<Identifier>) -> Self {
        Self {
            table: table.into(),
            if_exists: false,
            on_cluster: None,
        }
    }

    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    pub fn on_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.on_cluster = Some(cluster.into());
        self
    }

    pub fn to_sql(&self) -> String {
        Grammar.compile_drop_table(self)
    }
}

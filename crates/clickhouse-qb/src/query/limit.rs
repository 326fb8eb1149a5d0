//! LIMIT, LIMIT BY and ORDER BY state.

use super::column::Column;
use crate::enums::OrderDirection;

/// Row window: `LIMIT [offset, ]limit [BY columns]`.
#[derive(Debug, Clone)]
pub struct Limit {
    pub limit: u64,
    pub offset: Option<u64>,
    /// Non-empty only for LIMIT BY.
    pub by: Vec<Column>,
}

impl Limit {
    pub fn new(limit: u64, offset: Option<u64>) -> Self {
        Self {
            limit,
            offset,
            by: Vec::new(),
        }
    }

    pub fn by(limit: u64, columns: Vec<Column>) -> Self {
        Self {
            limit,
            offset: None,
            by: columns,
        }
    }
}

/// One ORDER BY entry.
#[derive(Debug, Clone)]
pub struct Order {
    pub column: Column,
    /// `None` for raw entries.
    pub direction: Option<OrderDirection>,
    pub collate: Option<String>,
}

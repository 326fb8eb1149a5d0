use super::Grammar;
use crate::error::QbResult;
use crate::query::QueryBuilder;
use crate::query::column::Column;
use crate::query::limit::{Limit, Order};
use crate::value::Value;

impl Grammar {
    /// `GROUP BY <columns>`, or nothing when the list contains `*`.
    pub fn compile_groups(&self, groups: &[Column]) -> QbResult<String> {
        let mut rendered = Vec::with_capacity(groups.len());
        for column in groups {
            let sql = self.compile_column(column)?;
            if sql == "*" {
                return Ok(String::new());
            }
            if !sql.is_empty() {
                rendered.push(sql);
            }
        }
        if rendered.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("GROUP BY {}", rendered.join(", ")))
    }

    /// `ORDER BY <column> [direction] [COLLATE 'x'], ...`.
    pub fn compile_orders(&self, orders: &[Order]) -> QbResult<String> {
        let mut rendered = Vec::with_capacity(orders.len());
        for order in orders {
            let mut sql = self.compile_column(&order.column)?;
            if let Some(direction) = order.direction {
                sql.push(' ');
                sql.push_str(direction.as_str());
            }
            if let Some(collate) = &order.collate {
                sql.push_str(" COLLATE ");
                sql.push_str(&self.wrap(&Value::from(collate)));
            }
            rendered.push(sql);
        }
        Ok(format!("ORDER BY {}", rendered.join(", ")))
    }

    /// `LIMIT [offset, ]limit`.
    pub fn compile_limit(&self, limit: &Limit) -> String {
        match limit.offset {
            Some(offset) => format!("LIMIT {offset}, {}", limit.limit),
            None => format!("LIMIT {}", limit.limit),
        }
    }

    /// `LIMIT n BY <columns>`.
    pub fn compile_limit_by(&self, limit: &Limit) -> QbResult<String> {
        let mut columns = Vec::with_capacity(limit.by.len());
        for column in &limit.by {
            columns.push(self.compile_column(column)?);
        }
        Ok(format!("{} BY {}", self.compile_limit(limit), columns.join(", ")))
    }

    /// `UNION ALL <q1> [UNION ALL <q2> ...]`.
    pub fn compile_unions(&self, unions: &[QueryBuilder]) -> QbResult<String> {
        let mut rendered = Vec::with_capacity(unions.len());
        for query in unions {
            rendered.push(format!("UNION ALL {}", self.compile_select(query)?));
        }
        Ok(rendered.join(" "))
    }
}

use super::{Grammar, join_fragments};
use crate::error::{QbError, QbResult};
use crate::query::join::JoinClause;

impl Grammar {
    /// Every join in order, separated by single spaces.
    pub fn compile_joins(&self, joins: &[JoinClause]) -> QbResult<String> {
        let mut rendered = Vec::with_capacity(joins.len());
        for join in joins {
            rendered.push(self.compile_join(join)?);
        }
        Ok(rendered.join(" "))
    }

    /// `[GLOBAL] [ALL|ANY] [type] JOIN <table> [AS <alias>] USING <cols> | ON <predicates>`.
    pub fn compile_join(&self, join: &JoinClause) -> QbResult<String> {
        verify_join(join)?;

        let mut parts: Vec<String> = Vec::new();
        if join.is_distributed() {
            parts.push("GLOBAL".to_string());
        }
        if let Some(strict) = join.get_strict() {
            parts.push(strict.to_string());
        }
        if let Some(kind) = join.get_kind() {
            parts.push(kind.to_string());
        }
        parts.push("JOIN".to_string());

        if let Some(table) = join.get_table() {
            parts.push(self.compile_table(table)?);
        }
        if let Some(alias) = join.get_alias() {
            parts.push(format!("AS {}", alias.quoted()));
        }

        if !join.get_using().is_empty() {
            let columns: Vec<String> = join.get_using().iter().map(|c| c.quoted()).collect();
            parts.push(format!("USING {}", columns.join(", ")));
        } else {
            parts.push(format!("ON {}", self.compile_predicates(join.get_on())?));
        }

        Ok(join_fragments(parts))
    }
}

/// Collect every missing segment, then check key exclusivity.
fn verify_join(join: &JoinClause) -> QbResult<()> {
    let has_using = !join.get_using().is_empty();
    let has_on = !join.get_on().is_empty();

    let mut missing = Vec::new();
    if join.get_table().is_none() {
        missing.push("table or subquery");
    }
    if !has_using && !has_on {
        missing.push("using or on clauses");
    }
    if !missing.is_empty() {
        return Err(QbError::WrongJoin { missing });
    }
    if has_using && has_on {
        return Err(QbError::AmbiguousJoinKeys);
    }
    Ok(())
}

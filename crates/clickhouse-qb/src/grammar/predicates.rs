use super::Grammar;
use crate::enums::Operator;
use crate::error::QbResult;
use crate::query::predicate::{Operand, Predicate};
use crate::value::Tuple;
use std::slice;

impl Grammar {
    /// Render a predicate list: `<p1> [<conj> <p2> ...]`.
    ///
    /// `NOT BETWEEN` renders as `NOT ( x BETWEEN a AND b )`. Empty fragments
    /// contribute nothing.
    pub fn compile_predicates(&self, predicates: &[Predicate]) -> QbResult<String> {
        let mut parts: Vec<String> = Vec::new();

        for predicate in predicates {
            let mut rendered: Vec<String> = Vec::with_capacity(5);
            let first = self.compile_operand(&predicate.first)?;
            let second = match &predicate.second {
                Some(second) => self.compile_operand(second)?,
                None => String::new(),
            };

            if predicate.operator == Some(Operator::NotBetween) {
                rendered.push("NOT (".to_string());
                rendered.push(first);
                rendered.push(Operator::Between.to_string());
                rendered.push(second);
                rendered.push(")".to_string());
            } else {
                rendered.push(first);
                if let Some(operator) = predicate.operator {
                    rendered.push(operator.to_string());
                }
                rendered.push(second);
            }

            rendered.retain(|part| !part.is_empty());
            if rendered.is_empty() {
                continue;
            }
            if !parts.is_empty() {
                parts.push(predicate.conjunction.to_string());
            }
            parts.append(&mut rendered);
        }

        Ok(parts.join(" "))
    }

    /// One side of a predicate.
    pub fn compile_operand(&self, operand: &Operand) -> QbResult<String> {
        Ok(match operand {
            Operand::Value(value) => self.wrap(value),
            Operand::Tuple(tuple) => format!("({})", self.compile_tuple(tuple)),
            Operand::Column(column) => self.compile_column(column)?,
            Operand::Group(predicates) => format!("({})", self.compile_predicates(predicates)?),
            Operand::Predicate(predicate) => {
                self.compile_predicates(slice::from_ref(predicate.as_ref()))?
            }
            Operand::Query(query) => format!("({})", self.compile_select(query)?),
        })
    }

    /// Tuple elements, comma-separated, without parentheses.
    pub fn compile_tuple(&self, tuple: &Tuple) -> String {
        self.wrap_each(tuple.elements()).join(", ")
    }
}

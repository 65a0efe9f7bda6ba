//! Text search clauses over display fields.
//!
//! A clause is applied to several fields at once: a positive operator matches when
//! any field matches (OR), a negated operator only when every field passes (AND).

use serde::{Deserialize, Serialize};

use innkeep_core::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOperator {
    Eq,
    NotEq,
    /// Case-insensitive pattern with `%` (any run) and `_` (one char) wildcards.
    Ilike,
    NotIlike,
}

impl SearchOperator {
    pub fn is_negated(self) -> bool {
        matches!(self, SearchOperator::NotEq | SearchOperator::NotIlike)
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "=" | "eq" => Ok(SearchOperator::Eq),
            "!=" | "not_eq" => Ok(SearchOperator::NotEq),
            "ilike" => Ok(SearchOperator::Ilike),
            "not ilike" | "not_ilike" => Ok(SearchOperator::NotIlike),
            other => Err(DomainError::validation(format!(
                "unknown search operator '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextClause {
    pub operator: SearchOperator,
    pub value: String,
}

impl TextClause {
    pub fn new(operator: SearchOperator, value: impl Into<String>) -> Self {
        Self {
            operator,
            value: value.into(),
        }
    }

    /// Substring search (`ilike %value%`).
    pub fn contains(value: &str) -> Self {
        Self::new(SearchOperator::Ilike, format!("%{value}%"))
    }

    pub fn matches_field(&self, field: &str) -> bool {
        match self.operator {
            SearchOperator::Eq => field == self.value,
            SearchOperator::NotEq => field != self.value,
            SearchOperator::Ilike => ilike(&self.value, field),
            SearchOperator::NotIlike => !ilike(&self.value, field),
        }
    }

    /// OR across `fields`, AND when the operator is negated.
    pub fn matches_any(&self, fields: &[&str]) -> bool {
        if self.operator.is_negated() {
            fields.iter().all(|f| self.matches_field(f))
        } else {
            fields.iter().any(|f| self.matches_field(f))
        }
    }
}

fn ilike(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    let text: Vec<char> = text.to_lowercase().chars().collect();

    // reachable[j]: text[..j] matches the pattern prefix consumed so far
    let mut reachable = vec![false; text.len() + 1];
    reachable[0] = true;
    for p in &pattern {
        let mut next = vec![false; text.len() + 1];
        match p {
            '%' => {
                let mut seen = false;
                for j in 0..=text.len() {
                    seen |= reachable[j];
                    next[j] = seen;
                }
            }
            '_' => {
                for j in 0..text.len() {
                    next[j + 1] = reachable[j];
                }
            }
            c => {
                for j in 0..text.len() {
                    next[j + 1] = reachable[j] && text[j] == *c;
                }
            }
        }
        reachable = next;
    }
    reachable[text.len()]
}

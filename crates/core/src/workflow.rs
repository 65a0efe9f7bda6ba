//! Explicit finite-state machines.
//!
//! A state enum lists its permitted edges in `TRANSITIONS`; every transition attempt
//! goes through [`Workflow::transition_to`], which rejects edges outside the table.

use crate::error::{DomainError, DomainResult};

pub trait Workflow: Copy + Eq + core::fmt::Debug + core::fmt::Display + 'static {
    /// Permitted `(from, to)` edges.
    const TRANSITIONS: &'static [(Self, Self)];

    fn can_transition_to(self, next: Self) -> bool {
        Self::TRANSITIONS
            .iter()
            .any(|&(from, to)| from == self && to == next)
    }

    /// States reachable from `self` in one step, in table order.
    fn next_states(self) -> Vec<Self> {
        Self::TRANSITIONS
            .iter()
            .filter(|(from, _)| *from == self)
            .map(|&(_, to)| to)
            .collect()
    }

    /// Validate the edge `self -> next`.
    fn transition_to(self, next: Self) -> DomainResult<Self> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::invalid_transition(self, next))
        }
    }
}

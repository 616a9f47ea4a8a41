use itertools::Itertools;
use thiserror::Error;

use crate::engine::predicates::Predicate;
use crate::engine::EmptyDomain;

/// The result of invoking a propagator.
pub type PropagationStatus = Result<(), Inconsistency>;

/// The reasons why propagation can stop before reaching a fixpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// A mutation would have emptied the domain of a variable.
    #[error(transparent)]
    EmptyDomain(#[from] EmptyDomain),
    /// A propagator detected that its constraint cannot be satisfied anymore.
    #[error(transparent)]
    Conflict(#[from] PropagatorConflict),
}

/// A conflict reported by a propagator without emptying a domain, together with the predicates
/// which together are infeasible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("propagator conflict: {}", display_conjunction(.conjunction))]
pub struct PropagatorConflict {
    pub conjunction: Vec<Predicate>,
}

fn display_conjunction(conjunction: &[Predicate]) -> String {
    if conjunction.is_empty() {
        "true".to_owned()
    } else {
        conjunction.iter().join(" & ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::variables::IntVarId;
    use crate::predicate;

    #[test]
    fn conflicts_are_displayed_as_a_conjunction() {
        let x = IntVarId::new(0);
        let y = IntVarId::new(1);
        let conflict = PropagatorConflict {
            conjunction: vec![predicate!(x == 2), predicate!(y == 2)],
        };

        assert_eq!(
            "propagator conflict: [x0 == 2] & [x1 == 2]",
            conflict.to_string()
        );
    }
}

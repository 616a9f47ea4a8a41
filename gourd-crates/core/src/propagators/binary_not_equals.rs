use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorConflict;
use crate::engine::events::DomainEvents;
use crate::engine::variables::IntVarId;
use crate::predicate;
use crate::propagation::Domains;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::MutateDomains;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`BinaryNotEqualsPropagator`].
#[derive(Clone, Copy, Debug)]
pub struct BinaryNotEquals {
    pub a: IntVarId,
    pub b: IntVarId,
}

impl PropagatorConstructor for BinaryNotEquals {
    type PropagatorImpl = BinaryNotEqualsPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let BinaryNotEquals { a, b } = self;

        // We only care about the case where one of the two is assigned
        context.register(a, DomainEvents::ASSIGN, LocalId::from(0));
        context.register(b, DomainEvents::ASSIGN, LocalId::from(1));

        BinaryNotEqualsPropagator { a, b }
    }
}

/// Propagator for the constraint `a != b`.
#[derive(Clone, Debug)]
pub struct BinaryNotEqualsPropagator {
    a: IntVarId,
    b: IntVarId,
}

impl BinaryNotEqualsPropagator {
    fn detect_inconsistency(&self, domains: Domains) -> Option<PropagatorConflict> {
        let value = domains.fixed_value(self.a)?;
        (domains.fixed_value(self.b)? == value).then(|| PropagatorConflict {
            conjunction: vec![predicate!(self.a == value), predicate!(self.b == value)],
        })
    }
}

impl Propagator for BinaryNotEqualsPropagator {
    fn name(&self) -> &str {
        "BinaryNotEq"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        if let Some(conflict) = self.detect_inconsistency(context.domains()) {
            return Err(conflict.into());
        }

        let a_lb = context.lower_bound(self.a);
        let a_ub = context.upper_bound(self.a);

        let b_lb = context.lower_bound(self.b);
        let b_ub = context.upper_bound(self.b);

        if a_ub < b_lb || b_ub < a_lb {
            // The domains are non-overlapping
            return Ok(());
        }

        if a_lb == a_ub {
            let _ = context.remove_value(self.b, a_lb)?;
        }

        if b_lb == b_ub {
            let _ = context.remove_value(self.a, b_lb)?;
        }

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        if self.detect_inconsistency(domains).is_some() {
            return Entailment::False;
        }

        let disjoint = domains.upper_bound(self.a) < domains.lower_bound(self.b)
            || domains.upper_bound(self.b) < domains.lower_bound(self.a);
        let fixed_value_excluded = |fixed: IntVarId, other: IntVarId| {
            domains
                .fixed_value(fixed)
                .is_some_and(|value| !domains.contains(other, value))
        };

        if disjoint
            || fixed_value_excluded(self.a, self.b)
            || fixed_value_excluded(self.b, self.a)
        {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Inconsistency;
    use crate::State;

    #[test]
    fn detects_conflict() {
        let mut state = State::default();
        let a = state.new_bounded_variable(0, 0).expect("valid interval");
        let b = state.new_bounded_variable(0, 0).expect("valid interval");

        let _ = state.add_propagator(BinaryNotEquals { a, b });
        let result = state.propagate_to_fixed_point();

        let Err(Inconsistency::Conflict(conflict)) = result else {
            panic!("expected a conflict, got {result:?}");
        };
        assert_eq!(
            vec![predicate!(a == 0), predicate!(b == 0)],
            conflict.conjunction
        );
    }

    #[test]
    fn propagate_when_one_is_fixed() {
        let mut state = State::default();
        let a = state.new_bounded_variable(0, 0).expect("valid interval");
        let b = state.new_bounded_variable(0, 1).expect("valid interval");

        let _ = state.add_propagator(BinaryNotEquals { a, b });
        state
            .propagate_to_fixed_point()
            .expect("Expected no conflict to be detected");

        assert_eq!(Some(1), state.fixed_value(b));
    }

    #[test]
    fn incremental_propagation() {
        let mut state = State::default();
        let a = state.new_interval_variable(0, 10).expect("valid interval");
        let b = state.new_interval_variable(0, 10).expect("valid interval");
        let handle = state.add_propagator(BinaryNotEquals { a, b });
        state.propagate_to_fixed_point().expect("no conflict");

        state.new_checkpoint();
        let _ = state.update_upper_bound(b, 5).expect("non-empty domain");
        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!(11, state.domain_size(a));

        let _ = state.instantiate_to(b, 4).expect("non-empty domain");
        state.propagate_to_fixed_point().expect("no conflict");
        assert!(!state.contains(a, 4));
        assert!(!state.is_active(handle.propagator_id()));

        state.restore_to(0);
        assert!(state.contains(a, 4));
        assert!(state.is_active(handle.propagator_id()));
    }

    #[test]
    fn non_overlapping_is_entailed() {
        let mut state = State::default();
        let a = state.new_bounded_variable(0, 5).expect("valid interval");
        let b = state.new_bounded_variable(6, 10).expect("valid interval");

        let handle = state.add_propagator(BinaryNotEquals { a, b });
        assert_eq!(
            Entailment::True,
            state.is_entailed(handle.propagator_id())
        );
        state
            .propagate_to_fixed_point()
            .expect("Expected no conflict to be detected");

        assert_eq!((0, 5), (state.lower_bound(a), state.upper_bound(a)));
        assert_eq!((6, 10), (state.lower_bound(b), state.upper_bound(b)));
    }
}

use crate::basic_types::PropagationStatus;
use crate::engine::delta::SetDeltaMonitor;
use crate::engine::events::DomainEvents;
use crate::engine::events::SetDomainEvent;
use crate::engine::trailed::TrailedInteger;
use crate::engine::variables::IntVarId;
use crate::engine::variables::SetVarId;
use crate::engine::EmptyDomain;
use crate::gourd_assert_moderate;
use crate::propagation::Domains;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::ManipulateTrailedValues;
use crate::propagation::MutateDomains;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`SetCardinalityPropagator`].
#[derive(Clone, Copy, Debug)]
pub struct SetCardinality {
    pub set: SetVarId,
    pub cardinality: IntVarId,
}

impl PropagatorConstructor for SetCardinality {
    type PropagatorImpl = SetCardinalityPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let SetCardinality { set, cardinality } = self;

        context.register(set, DomainEvents::ANY_SET, LocalId::from(0));
        context.register(cardinality, DomainEvents::BOUNDS, LocalId::from(1));

        let kernel_size = context.kernel_size(set) as i64;
        let envelope_size = context.envelope_size(set) as i64;
        SetCardinalityPropagator {
            set,
            cardinality,
            changes: context.delta_monitor(set),
            kernel_size: context.new_trailed_integer(kernel_size),
            envelope_size: context.new_trailed_integer(envelope_size),
        }
    }
}

/// Propagator for the constraint `|set| = cardinality`.
///
/// The sizes of the kernel and the envelope are kept in trailed counters which are updated from
/// the delta log of the set, so the bounds of the cardinality are filtered without scanning the
/// set. The set itself is only scanned when it is fixed to its kernel or its envelope.
#[derive(Clone, Debug)]
pub struct SetCardinalityPropagator {
    set: SetVarId,
    cardinality: IntVarId,
    changes: SetDeltaMonitor,
    kernel_size: TrailedInteger,
    envelope_size: TrailedInteger,
}

impl Propagator for SetCardinalityPropagator {
    fn name(&self) -> &str {
        "SetCardinality"
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let (kernel_size, envelope_size) = (self.kernel_size, self.envelope_size);
        self.changes.replay(
            &mut context,
            SetDomainEvent::AddToKernel | SetDomainEvent::RemoveFromEnvelope,
            |context, delta| -> Result<(), EmptyDomain> {
                match delta.event {
                    SetDomainEvent::AddToKernel => context.add_assign(kernel_size, 1),
                    SetDomainEvent::RemoveFromEnvelope => context.add_assign(envelope_size, -1),
                }
                Ok(())
            },
        )?;

        let num_mandatory = context.read(self.kernel_size) as i32;
        let num_possible = context.read(self.envelope_size) as i32;
        gourd_assert_moderate!(num_mandatory as usize == context.kernel_size(self.set));
        gourd_assert_moderate!(num_possible as usize == context.envelope_size(self.set));

        let _ = context.update_bounds(self.cardinality, num_mandatory, num_possible)?;

        if context.lower_bound(self.cardinality) == num_possible && num_mandatory < num_possible {
            let envelope = context.envelope(self.set).iter().collect::<Vec<_>>();
            let _ = context.instantiate_set_to(self.set, &envelope)?;
        } else if context.upper_bound(self.cardinality) == num_mandatory
            && num_mandatory < num_possible
        {
            let kernel = context.kernel(self.set).iter().collect::<Vec<_>>();
            let _ = context.instantiate_set_to(self.set, &kernel)?;
        }

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let num_mandatory = domains.kernel_size(self.set) as i32;
        let num_possible = domains.envelope_size(self.set) as i32;

        if domains.upper_bound(self.cardinality) < num_mandatory
            || domains.lower_bound(self.cardinality) > num_possible
        {
            Entailment::False
        } else if domains.is_set_fixed(self.set)
            && domains.fixed_value(self.cardinality) == Some(num_mandatory)
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
    fn cardinality_is_bounded_by_kernel_and_envelope() {
        let mut state = State::default();
        let set = state
            .new_set_variable([1], [1, 2, 3, 4])
            .expect("kernel within envelope");
        let cardinality = state.new_bounded_variable(0, 10).expect("valid interval");
        let _ = state.add_propagator(SetCardinality { set, cardinality });
        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!(
            (1, 4),
            (
                state.lower_bound(cardinality),
                state.upper_bound(cardinality)
            )
        );

        let _ = state.force(set, 3).expect("3 is in the envelope");
        let _ = state.remove_from_envelope(set, 4).expect("4 is not in the kernel");
        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!(
            (2, 3),
            (
                state.lower_bound(cardinality),
                state.upper_bound(cardinality)
            )
        );
    }

    #[test]
    fn a_tight_cardinality_fixes_the_set() {
        let mut state = State::default();
        let set = state
            .new_set_variable([1], [1, 2, 3])
            .expect("kernel within envelope");
        let cardinality = state.new_bounded_variable(0, 10).expect("valid interval");
        let handle = state.add_propagator(SetCardinality { set, cardinality });
        state.propagate_to_fixed_point().expect("no conflict");

        state.new_checkpoint();
        let _ = state
            .update_lower_bound(cardinality, 3)
            .expect("non-empty domain");
        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!(vec![1, 2, 3], state.kernel(set).iter().collect::<Vec<_>>());
        assert!(!state.is_active(handle.propagator_id()));

        state.restore_to(0);
        let _ = state
            .update_upper_bound(cardinality, 1)
            .expect("non-empty domain");
        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!(vec![1], state.envelope(set).iter().collect::<Vec<_>>());
    }

    #[test]
    fn counters_are_restored_on_backtrack() {
        let mut state = State::default();
        let set = state
            .new_set_variable([], [1, 2, 3])
            .expect("kernel within envelope");
        let cardinality = state.new_bounded_variable(0, 10).expect("valid interval");
        let _ = state.add_propagator(SetCardinality { set, cardinality });
        state.propagate_to_fixed_point().expect("no conflict");

        state.new_checkpoint();
        let _ = state.force(set, 1).expect("1 is in the envelope");
        let _ = state.force(set, 2).expect("2 is in the envelope");
        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!(2, state.lower_bound(cardinality));

        state.restore_to(0);
        let _ = state.remove_from_envelope(set, 1).expect("1 is not in the kernel");
        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!(
            (0, 2),
            (
                state.lower_bound(cardinality),
                state.upper_bound(cardinality)
            )
        );
    }

    #[test]
    fn an_impossible_cardinality_fails() {
        let mut state = State::default();
        let set = state
            .new_set_variable([1, 2], [1, 2, 3])
            .expect("kernel within envelope");
        let cardinality = state.new_bounded_variable(0, 1).expect("valid interval");
        let handle = state.add_propagator(SetCardinality { set, cardinality });

        assert_eq!(
            Entailment::False,
            state.is_entailed(handle.propagator_id())
        );
        let result = state.propagate_to_fixed_point();
        assert!(matches!(result, Err(Inconsistency::EmptyDomain(_))));
    }

    #[test]
    fn removals_after_backtracking_past_earlier_forcings_are_counted() {
        let mut state = State::default();
        let set = state
            .new_set_variable([], [1, 2, 3])
            .expect("kernel within envelope");
        let cardinality = state.new_bounded_variable(0, 10).expect("valid interval");
        let _ = state.add_propagator(SetCardinality { set, cardinality });
        state.propagate_to_fixed_point().expect("no conflict");

        state.new_checkpoint();
        let _ = state.force(set, 1).expect("1 is in the envelope");
        let _ = state.force(set, 2).expect("2 is in the envelope");
        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!((2, 3), (state.lower_bound(cardinality), state.upper_bound(cardinality)));

        state.restore_to(0);
        let _ = state.remove_from_envelope(set, 3).expect("3 is not in the kernel");
        state.propagate_to_fixed_point().expect("no conflict");

        assert!(state.kernel(set).is_empty());
        assert_eq!(
            (0, 2),
            (
                state.lower_bound(cardinality),
                state.upper_bound(cardinality)
            )
        );
    }
}

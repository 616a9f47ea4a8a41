use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorConflict;
use crate::containers::HashMap;
use crate::create_statistics_struct;
use crate::engine::delta::IntDeltaMonitor;
use crate::engine::events::DomainEvents;
use crate::engine::events::IntDomainEvent;
use crate::engine::trailed::TrailedInteger;
use crate::engine::variables::IntVarId;
use crate::predicate;
use crate::propagation::Domains;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::ManipulateTrailedValues;
use crate::propagation::MutateDomains;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The [`PropagatorConstructor`] for the [`AllDifferentPropagator`].
#[derive(Clone, Debug)]
pub struct AllDifferent {
    pub variables: Box<[IntVarId]>,
}

impl PropagatorConstructor for AllDifferent {
    type PropagatorImpl = AllDifferentPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let monitors = self
            .variables
            .iter()
            .enumerate()
            .map(|(index, &variable)| {
                context.register(variable, DomainEvents::ASSIGN, LocalId::from(index as u32));
                context.delta_monitor(variable)
            })
            .collect();

        AllDifferentPropagator {
            variables: self.variables,
            monitors,
            initialised: context.new_trailed_integer(0),
            statistics: AllDifferentStatistics::default(),
        }
    }
}

create_statistics_struct!(AllDifferentStatistics {
    num_fixed_values_processed: usize,
    num_values_removed: usize,
});

/// Forward checking for the constraint that all variables take pairwise different values.
///
/// The value of every variable which becomes fixed is removed from all other variables. The
/// fixings are read from the delta logs, which also contain the fixings caused by this propagator
/// itself (those do not notify it), so [`Propagator::propagate`] keeps replaying until every log
/// is consumed.
#[derive(Clone, Debug)]
pub struct AllDifferentPropagator {
    variables: Box<[IntVarId]>,
    monitors: Box<[IntDeltaMonitor]>,
    /// Zero until the fixings which preceded the creation of the monitors have been processed.
    initialised: TrailedInteger,
    statistics: AllDifferentStatistics,
}

impl AllDifferentPropagator {
    /// Remove `value` from every variable other than the one at `fixed_index`.
    fn remove_from_others(
        variables: &[IntVarId],
        statistics: &mut AllDifferentStatistics,
        context: &mut PropagationContext,
        fixed_index: usize,
        value: i32,
    ) -> PropagationStatus {
        statistics.num_fixed_values_processed += 1;
        for (index, &other) in variables.iter().enumerate() {
            if index != fixed_index && context.remove_value(other, value)? {
                statistics.num_values_removed += 1;
            }
        }
        Ok(())
    }

    /// Two variables fixed to the same value.
    fn detect_inconsistency(&self, domains: Domains) -> Option<PropagatorConflict> {
        let mut fixed_by: HashMap<i32, IntVarId> = HashMap::default();
        for &variable in self.variables.iter() {
            let Some(value) = domains.fixed_value(variable) else {
                continue;
            };
            if let Some(other) = fixed_by.insert(value, variable) {
                return Some(PropagatorConflict {
                    conjunction: vec![predicate!(other == value), predicate!(variable == value)],
                });
            }
        }
        None
    }

    fn propagate_from_scratch(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        // Fixings made by the scan below are appended after this point and replayed afterwards.
        for monitor in self.monitors.iter_mut() {
            monitor.skip_pending(context);
        }
        context.assign(self.initialised, 1);

        for index in 0..self.variables.len() {
            if let Some(value) = context.fixed_value(self.variables[index]) {
                Self::remove_from_others(
                    &self.variables,
                    &mut self.statistics,
                    context,
                    index,
                    value,
                )?;
            }
        }

        Ok(())
    }
}

impl Propagator for AllDifferentPropagator {
    fn name(&self) -> &str {
        "AllDifferent"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        if let Some(conflict) = self.detect_inconsistency(context.domains()) {
            return Err(conflict.into());
        }

        if context.read(self.initialised) == 0 {
            self.propagate_from_scratch(&mut context)?;
        }

        while self
            .monitors
            .iter()
            .any(|monitor| monitor.has_pending(&context))
        {
            for index in 0..self.monitors.len() {
                let variables = &self.variables;
                let statistics = &mut self.statistics;
                self.monitors[index].replay(
                    &mut context,
                    IntDomainEvent::Assign.into(),
                    |context, delta| {
                        let (value, _) = delta.current_bounds();
                        Self::remove_from_others(variables, statistics, context, index, value)
                    },
                )?;
            }
        }

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        if self.detect_inconsistency(domains).is_some() {
            Entailment::False
        } else if self
            .variables
            .iter()
            .all(|&variable| domains.is_fixed(variable))
        {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Inconsistency;
    use crate::State;

    fn all_different(state: &mut State, variables: &[IntVarId]) {
        let _ = state.add_propagator(AllDifferent {
            variables: variables.into(),
        });
    }

    #[test]
    fn fixed_values_are_removed_from_the_others() {
        let mut state = State::default();
        let x = state.new_interval_variable(1, 3).expect("valid interval");
        let y = state.new_interval_variable(1, 3).expect("valid interval");
        let z = state.new_interval_variable(1, 3).expect("valid interval");
        all_different(&mut state, &[x, y, z]);
        state.propagate_to_fixed_point().expect("no conflict");

        let _ = state.instantiate_to(x, 2).expect("non-empty domain");
        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!(vec![1, 3], state.iterate_values(y).collect::<Vec<_>>());
        assert_eq!(vec![1, 3], state.iterate_values(z).collect::<Vec<_>>());
    }

    #[test]
    fn fixings_caused_by_the_propagator_are_processed() {
        let mut state = State::default();
        let x = state.new_interval_variable(1, 3).expect("valid interval");
        let y = state.new_interval_variable(1, 2).expect("valid interval");
        let z = state.new_interval_variable(1, 3).expect("valid interval");
        all_different(&mut state, &[x, y, z]);
        state.propagate_to_fixed_point().expect("no conflict");

        // y becomes 2 through the propagator, which must then remove 2 from z.
        let _ = state.instantiate_to(x, 1).expect("non-empty domain");
        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!(Some(2), state.fixed_value(y));
        assert_eq!(Some(3), state.fixed_value(z));
    }

    #[test]
    fn variables_fixed_before_creation_are_processed() {
        let mut state = State::default();
        let x = state.new_interval_variable(2, 2).expect("valid interval");
        let y = state.new_interval_variable(1, 3).expect("valid interval");
        all_different(&mut state, &[x, y]);

        state.propagate_to_fixed_point().expect("no conflict");

        assert!(!state.contains(y, 2));
    }

    #[test]
    fn two_variables_fixed_to_the_same_value_conflict() {
        let mut state = State::default();
        let x = state.new_interval_variable(1, 3).expect("valid interval");
        let y = state.new_interval_variable(1, 3).expect("valid interval");
        all_different(&mut state, &[x, y]);
        state.propagate_to_fixed_point().expect("no conflict");

        state.new_checkpoint();
        let _ = state.instantiate_to(x, 3).expect("non-empty domain");
        let _ = state.instantiate_to(y, 3).expect("non-empty domain");
        let result = state.propagate_to_fixed_point();
        let Err(Inconsistency::Conflict(conflict)) = result else {
            panic!("expected a conflict, got {result:?}");
        };
        assert_eq!(
            vec![predicate!(x == 3), predicate!(y == 3)],
            conflict.conjunction
        );

        state.restore_to(0);
        let _ = state.instantiate_to(y, 3).expect("non-empty domain");
        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!(vec![1, 2], state.iterate_values(x).collect::<Vec<_>>());
    }

    #[test]
    fn entailment_follows_the_fixed_values() {
        let mut state = State::default();
        let x = state.new_interval_variable(4, 5).expect("valid interval");
        let y = state.new_interval_variable(4, 5).expect("valid interval");
        let handle = state.add_propagator(AllDifferent {
            variables: [x, y].into(),
        });
        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!(
            Entailment::Undefined,
            state.is_entailed(handle.propagator_id())
        );

        state.new_checkpoint();
        let _ = state.instantiate_to(x, 4).expect("non-empty domain");
        let _ = state.instantiate_to(y, 4).expect("non-empty domain");
        assert_eq!(
            Entailment::False,
            state.is_entailed(handle.propagator_id())
        );

        state.restore_to(0);
        let _ = state.instantiate_to(x, 4).expect("non-empty domain");
        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!(Some(5), state.fixed_value(y));
        assert!(!state.is_active(handle.propagator_id()));
    }

    #[test]
    fn statistics_count_the_removals() {
        let mut state = State::default();
        let x = state.new_interval_variable(1, 2).expect("valid interval");
        let y = state.new_interval_variable(1, 2).expect("valid interval");
        let handle = state.add_propagator(AllDifferent {
            variables: [x, y].into(),
        });
        state.propagate_to_fixed_point().expect("no conflict");

        let _ = state.instantiate_to(x, 1).expect("non-empty domain");
        state.propagate_to_fixed_point().expect("no conflict");

        let propagator = state.get_propagator(handle).expect("the handle is typed");
        assert_eq!(2, propagator.statistics.num_fixed_values_processed);
        assert_eq!(1, propagator.statistics.num_values_removed);
    }
}

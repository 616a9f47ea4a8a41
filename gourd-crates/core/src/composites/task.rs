use log::trace;

use crate::engine::events::DomainEvents;
use crate::engine::predicates::Justification;
use crate::engine::variables::IntVarId;
use crate::engine::variables::VariableRef;
use crate::engine::EmptyDomain;
use crate::monitors::MonitorId;
use crate::monitors::VariableMonitor;
use crate::predicate;
use crate::propagation::MonitorContext;
use crate::propagation::MutateDomains;
use crate::propagation::ReadDomains;
use crate::State;

/// An activity with a start, a duration and an end, which are kept bound consistent with
/// `start + duration = end` at all times.
///
/// The relation is maintained by a [`VariableMonitor`] attached to the three variables, which
/// runs right after every change to one of them. Propagators of the [`State`] therefore never
/// observe a task which violates the relation on its bounds.
#[derive(Clone, Copy, Debug)]
pub struct Task {
    start: IntVarId,
    duration: IntVarId,
    end: IntVarId,
    monitor: MonitorId,
}

impl Task {
    /// Create a task over existing variables and immediately make their bounds consistent.
    pub fn new(
        state: &mut State,
        start: IntVarId,
        duration: IntVarId,
        end: IntVarId,
    ) -> Result<Task, EmptyDomain> {
        let monitor = state.add_monitor(
            TaskMonitor {
                start,
                duration,
                end,
            },
            [start.into(), duration.into(), end.into()],
        );

        let task = Task {
            start,
            duration,
            end,
            monitor,
        };
        task.ensure_bound_consistency(state)?;
        Ok(task)
    }

    pub fn start(&self) -> IntVarId {
        self.start
    }

    pub fn duration(&self) -> IntVarId {
        self.duration
    }

    pub fn end(&self) -> IntVarId {
        self.end
    }

    pub fn monitor_id(&self) -> MonitorId {
        self.monitor
    }

    /// Run the filtering of the monitor regardless of which variable changed.
    pub fn ensure_bound_consistency(&self, state: &mut State) -> Result<(), EmptyDomain> {
        state.trigger_monitor(self.monitor, self.start.into(), DomainEvents::BOUNDS)
    }
}

/// The passive monitor of a [`Task`].
#[derive(Clone, Copy, Debug)]
struct TaskMonitor {
    start: IntVarId,
    duration: IntVarId,
    end: IntVarId,
}

impl TaskMonitor {
    /// Tighten the three variables once; returns whether anything changed.
    fn filter(&self, context: &mut MonitorContext) -> Result<bool, EmptyDomain> {
        let TaskMonitor {
            start,
            duration,
            end,
        } = *self;
        let mut changed = false;

        // start ∈ [end.lb - duration.ub, end.ub - duration.lb]
        let (end_lb, duration_ub) = (context.lower_bound(end), context.upper_bound(duration));
        changed |= context.update_lower_bound_because(
            start,
            end_lb.saturating_sub(duration_ub),
            Justification::new(predicate!(end >= end_lb), predicate!(duration <= duration_ub)),
        )?;
        let (end_ub, duration_lb) = (context.upper_bound(end), context.lower_bound(duration));
        changed |= context.update_upper_bound_because(
            start,
            end_ub.saturating_sub(duration_lb),
            Justification::new(predicate!(end <= end_ub), predicate!(duration >= duration_lb)),
        )?;

        // end ∈ [start.lb + duration.lb, start.ub + duration.ub]
        let (start_lb, duration_lb) = (context.lower_bound(start), context.lower_bound(duration));
        changed |= context.update_lower_bound_because(
            end,
            start_lb.saturating_add(duration_lb),
            Justification::new(predicate!(start >= start_lb), predicate!(duration >= duration_lb)),
        )?;
        let (start_ub, duration_ub) = (context.upper_bound(start), context.upper_bound(duration));
        changed |= context.update_upper_bound_because(
            end,
            start_ub.saturating_add(duration_ub),
            Justification::new(predicate!(start <= start_ub), predicate!(duration <= duration_ub)),
        )?;

        // duration ∈ [end.lb - start.ub, end.ub - start.lb]
        let (end_lb, start_ub) = (context.lower_bound(end), context.upper_bound(start));
        changed |= context.update_lower_bound_because(
            duration,
            end_lb.saturating_sub(start_ub),
            Justification::new(predicate!(end >= end_lb), predicate!(start <= start_ub)),
        )?;
        let (end_ub, start_lb) = (context.upper_bound(end), context.lower_bound(start));
        changed |= context.update_upper_bound_because(
            duration,
            end_ub.saturating_sub(start_lb),
            Justification::new(predicate!(end <= end_ub), predicate!(start >= start_lb)),
        )?;

        Ok(changed)
    }
}

impl VariableMonitor for TaskMonitor {
    fn name(&self) -> &str {
        "Task"
    }

    fn on_update(
        &mut self,
        mut context: MonitorContext,
        variable: VariableRef,
        events: DomainEvents,
    ) -> Result<(), EmptyDomain> {
        if !events.intersects(DomainEvents::BOUNDS) {
            return Ok(());
        }
        trace!("task monitor {} reacts to {variable}", context.monitor_id());

        // Snapping a bound to the next present value of an enumerated domain can enable further
        // tightening, while interval arithmetic on bounds alone is done after one pass.
        let iterate = [self.start, self.duration, self.end]
            .into_iter()
            .any(|variable| context.is_enumerated(variable));
        while self.filter(&mut context)? && iterate {}

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Cause;
    use crate::propagators::BinaryNotEquals;

    fn bounds(state: &State, variable: IntVarId) -> (i32, i32) {
        (state.lower_bound(variable), state.upper_bound(variable))
    }

    #[test]
    fn creation_makes_the_bounds_consistent() {
        let mut state = State::default();
        let start = state.new_bounded_variable(0, 10).expect("valid interval");
        let duration = state.new_bounded_variable(2, 2).expect("valid interval");
        let end = state.new_bounded_variable(0, 10).expect("valid interval");

        let task = Task::new(&mut state, start, duration, end).expect("consistent task");

        assert_eq!((0, 8), bounds(&state, task.start()));
        assert_eq!((2, 10), bounds(&state, task.end()));
        assert_eq!((2, 2), bounds(&state, task.duration()));
    }

    #[test]
    fn decisions_are_followed_immediately() {
        let mut state = State::default();
        let start = state.new_bounded_variable(0, 10).expect("valid interval");
        let duration = state.new_bounded_variable(1, 3).expect("valid interval");
        let end = state.new_bounded_variable(0, 20).expect("valid interval");
        let task = Task::new(&mut state, start, duration, end).expect("consistent task");

        state.new_checkpoint();
        let _ = state.update_lower_bound(start, 4).expect("non-empty domain");
        assert_eq!((5, 13), bounds(&state, end));

        let _ = state.update_upper_bound(end, 6).expect("non-empty domain");
        assert_eq!((4, 5), bounds(&state, start));
        assert_eq!((1, 2), bounds(&state, duration));

        let delta = state.last_int_delta(duration).expect("duration changed");
        assert_eq!(Cause::Monitor(task.monitor_id()), delta.cause());
        assert_eq!(
            vec![predicate!(end <= 6), predicate!(start >= 4)],
            delta
                .justification()
                .expect("tightenings are justified")
                .iter()
                .collect::<Vec<_>>()
        );

        state.restore_to(0);
        assert_eq!((0, 10), bounds(&state, start));
        assert_eq!((1, 13), bounds(&state, end));
    }

    #[test]
    fn enumerated_domains_are_filtered_to_a_fixpoint() {
        let mut state = State::default();
        let start = state.new_bounded_variable(9, 10).expect("valid interval");
        let duration = state
            .new_enumerated_variable([1, 5])
            .expect("non-empty domain");
        let end = state.new_bounded_variable(0, 20).expect("valid interval");
        let _ = Task::new(&mut state, start, duration, end).expect("consistent task");
        assert_eq!((10, 15), bounds(&state, end));

        let _ = state.update_lower_bound(end, 12).expect("non-empty domain");

        // The duration snaps from 2 to 5, which only raises the end in a second pass.
        assert_eq!(Some(5), state.fixed_value(duration));
        assert_eq!((14, 15), bounds(&state, end));
        assert_eq!((9, 10), bounds(&state, start));
    }

    #[test]
    fn a_decision_which_empties_a_domain_never_reaches_the_monitor() {
        let mut state = State::default();
        let start = state.new_bounded_variable(0, 10).expect("valid interval");
        let duration = state.new_bounded_variable(5, 5).expect("valid interval");
        let end = state.new_bounded_variable(0, 10).expect("valid interval");
        let _ = Task::new(&mut state, start, duration, end).expect("consistent task");
        let num_monitor_calls = state.statistics().num_monitor_calls;

        let result = state.update_upper_bound(end, 4);

        assert_eq!(
            Err(EmptyDomain {
                variable: end.into(),
                cause: Cause::Decision,
            }),
            result
        );
        assert_eq!((0, 5), bounds(&state, start));
        assert_eq!((5, 10), bounds(&state, end));
        assert_eq!(num_monitor_calls, state.statistics().num_monitor_calls);
    }

    #[test]
    fn propagators_see_consistent_tasks() {
        let mut state = State::default();
        let start = state.new_interval_variable(0, 2).expect("valid interval");
        let duration = state.new_bounded_variable(3, 3).expect("valid interval");
        let end = state.new_interval_variable(3, 5).expect("valid interval");
        let other = state.new_interval_variable(4, 4).expect("valid interval");
        let _ = Task::new(&mut state, start, duration, end).expect("consistent task");
        let _ = state.add_propagator(BinaryNotEquals { a: end, b: other });

        state.propagate_to_fixed_point().expect("no conflict");
        assert!(!state.contains(end, 4));

        let _ = state.update_lower_bound(start, 1).expect("non-empty domain");
        assert_eq!(Some(5), state.fixed_value(end));
        assert_eq!(Some(2), state.fixed_value(start));
        state.propagate_to_fixed_point().expect("no conflict");
    }

    #[test]
    fn an_infeasible_task_cannot_be_created() {
        let mut state = State::default();
        let start = state.new_bounded_variable(5, 10).expect("valid interval");
        let duration = state.new_bounded_variable(3, 3).expect("valid interval");
        let end = state.new_bounded_variable(0, 6).expect("valid interval");

        let result = Task::new(&mut state, start, duration, end);

        assert!(matches!(
            result,
            Err(EmptyDomain { variable, .. }) if variable == VariableRef::from(start)
        ));
    }
}

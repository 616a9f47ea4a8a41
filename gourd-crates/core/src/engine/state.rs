use log::debug;
use log::trace;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagatorConflict;
use crate::engine::delta::IntDelta;
use crate::engine::events::DomainEvents;
use crate::engine::predicates::Justification;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateType;
use crate::engine::variables::IntVarId;
use crate::engine::variables::SetVarId;
use crate::engine::variables::VariableRef;
use crate::engine::Assignments;
use crate::engine::Cause;
use crate::engine::EmptyDomain;
use crate::engine::PropagatorQueue;
use crate::engine::Reason;
use crate::gourd_assert_eq_simple;
use crate::gourd_assert_simple;
use crate::monitors::MonitorId;
use crate::monitors::MonitorStore;
use crate::monitors::VariableMonitor;
use crate::options::EngineOptions;
use crate::options::EntailmentPolicy;
use crate::print_gourd_assert_warning_message;
use crate::propagation::store::PropagatorStore;
use crate::propagation::ApplyMutation;
use crate::propagation::Domains;
use crate::propagation::EnqueueDecision;
use crate::propagation::Entailment;
use crate::propagation::HasAssignments;
use crate::propagation::MutateDomains;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
#[cfg(doc)]
use crate::propagation::ReadDomains;
use crate::statistics::EngineStatistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The [`State`] is the container of variables, propagators and passive monitors, and drives
/// propagation to a fixpoint.
///
/// Domains are read through [`ReadDomains`] and changed through [`MutateDomains`]; changes made
/// directly on the [`State`] are attributed to [`Cause::Decision`]. The [`State`] makes no
/// branching decisions itself: a search layer posts decisions, calls
/// [`State::propagate_to_fixed_point`] and uses [`State::new_checkpoint`] and
/// [`State::restore_to`] to explore and undo them.
#[derive(Debug)]
pub struct State {
    /// Tracks the domains of all variables, their delta logs and all trailed state.
    pub(crate) assignments: Assignments,
    /// The list of propagators; propagators live here and are queried when events (domain changes)
    /// happen.
    pub(crate) propagators: PropagatorStore,
    pub(crate) monitors: MonitorStore,
    /// Dictates the order in which propagators will be called to propagate.
    pub(crate) propagator_queue: PropagatorQueue,
    options: EngineOptions,
    statistics: EngineStatistics,
}

impl Default for State {
    fn default() -> Self {
        State::new(EngineOptions::default())
    }
}

impl State {
    pub fn new(options: EngineOptions) -> Self {
        print_gourd_assert_warning_message!();

        State {
            assignments: Assignments::default(),
            propagators: PropagatorStore::default(),
            monitors: MonitorStore::default(),
            propagator_queue: PropagatorQueue::new(options.num_priority_levels),
            options,
            statistics: EngineStatistics::default(),
        }
    }

    /// The counters of the engine.
    pub fn statistics(&self) -> EngineStatistics {
        EngineStatistics {
            num_monitor_calls: self.monitors.num_calls(),
            ..self.statistics
        }
    }

    /// Log the statistics of the engine and of every propagator through `statistic_logger`; the
    /// statistics of a propagator are prefixed with its name and its position.
    pub fn log_statistics(&self, statistic_logger: StatisticLogger) {
        statistic_logger
            .attach_to_prefix("numIntVariables")
            .log_value(self.assignments.num_int_variables());
        statistic_logger
            .attach_to_prefix("numSetVariables")
            .log_value(self.assignments.num_set_variables());
        statistic_logger
            .attach_to_prefix("numPropagators")
            .log_value(self.propagators.num_propagators());
        statistic_logger
            .attach_to_prefix("numMonitors")
            .log_value(self.monitors.num_monitors());
        self.statistics().log(statistic_logger.clone());

        for (index, propagator) in self.propagators.iter_propagators().enumerate() {
            propagator.log_statistics(
                statistic_logger.attach_to_prefix(format!("{}_number_{index}", propagator.name())),
            );
        }
    }
}

/// Operations to create variables.
impl State {
    /// Creates a new variable with the domain `[lower_bound, upper_bound]` which can only be
    /// narrowed at its bounds.
    ///
    /// Creation of new variables is not influenced by the current checkpoint of the state. If a
    /// variable is created at a non-zero checkpoint, then it will _not_ 'disappear' when
    /// backtracking past the checkpoint where it was created.
    pub fn new_bounded_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Result<IntVarId, ConstraintOperationError> {
        if lower_bound > upper_bound {
            return Err(ConstraintOperationError::InvalidInterval {
                lower_bound,
                upper_bound,
            });
        }

        Ok(self
            .assignments
            .new_bounded_variable(lower_bound, upper_bound))
    }

    /// Creates a new variable with the domain `[lower_bound, upper_bound]` which supports holes.
    ///
    /// For more information on creation of variables, see [`State::new_bounded_variable`].
    pub fn new_interval_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Result<IntVarId, ConstraintOperationError> {
        if lower_bound > upper_bound {
            return Err(ConstraintOperationError::InvalidInterval {
                lower_bound,
                upper_bound,
            });
        }

        let values = (lower_bound..=upper_bound).collect::<Vec<_>>();
        Ok(self.assignments.new_enumerated_variable(&values))
    }

    /// Creates a new variable with exactly the given values; duplicates are ignored.
    ///
    /// Note that the domain is stored as a bitset from the smallest to the largest value. For very
    /// sparse domains, this can result in a high memory overhead.
    pub fn new_enumerated_variable(
        &mut self,
        values: impl IntoIterator<Item = i32>,
    ) -> Result<IntVarId, ConstraintOperationError> {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_unstable();
        values.dedup();

        if values.is_empty() {
            return Err(ConstraintOperationError::EmptyInitialDomain);
        }

        Ok(self.assignments.new_enumerated_variable(&values))
    }

    /// Creates a new set variable which contains at least the elements of `kernel` and at most
    /// the elements of `envelope`.
    pub fn new_set_variable(
        &mut self,
        kernel: impl IntoIterator<Item = i32>,
        envelope: impl IntoIterator<Item = i32>,
    ) -> Result<SetVarId, ConstraintOperationError> {
        let mut kernel = kernel.into_iter().collect::<Vec<_>>();
        kernel.sort_unstable();
        kernel.dedup();
        let mut envelope = envelope.into_iter().collect::<Vec<_>>();
        envelope.sort_unstable();
        envelope.dedup();

        if let Some(&element) = kernel
            .iter()
            .find(|element| envelope.binary_search(element).is_err())
        {
            return Err(ConstraintOperationError::KernelNotInEnvelope(element));
        }

        Ok(self.assignments.new_set_variable(&kernel, &envelope))
    }
}

/// Operations to retrieve information about the domains which are not covered by [`ReadDomains`].
impl State {
    /// Returns the number of created checkpoints.
    pub fn get_checkpoint(&self) -> usize {
        self.assignments.get_checkpoint()
    }

    /// Returns the truth value of the provided [`Predicate`], if it is decided by the current
    /// domain.
    pub fn truth_value(&self, predicate: Predicate) -> Option<bool> {
        self.assignments.evaluate_predicate(predicate)
    }

    /// The record of the most recent change to `variable`, which holds its cause and
    /// justification.
    pub fn last_int_delta(&self, variable: IntVarId) -> Option<&IntDelta> {
        self.assignments.last_int_delta(variable)
    }
}

/// Operations for adding propagators and monitors.
impl State {
    /// Add a new propagator to the [`State`]. The constructor for that propagator should
    /// subscribe to the appropriate domain events so that the propagator is notified when
    /// necessary.
    ///
    /// While the propagator is added to the queue for propagation, this function does _not_
    /// trigger a round of propagation. An explicit call to [`State::propagate_to_fixed_point`] is
    /// necessary to run the new propagator for the first time.
    ///
    /// Propagators can only be added at the root level: the trailed state created by the
    /// constructor (delta monitor cursors, counters) describes the current domains and would not
    /// be restored past the checkpoint it was created at.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> PropagatorHandle<Constructor::PropagatorImpl>
    where
        Constructor: PropagatorConstructor,
    {
        gourd_assert_simple!(
            self.get_checkpoint() == 0,
            "propagators can only be added at the root"
        );

        let propagator_id = self.propagators.next_id();
        let constructor_context =
            PropagatorConstructorContext::new(&mut self.assignments, propagator_id);
        let propagator = constructor.create(constructor_context);

        let priority = propagator.priority();
        gourd_assert_simple!(
            (priority as u32) < self.options.num_priority_levels,
            "the priority {priority:?} exceeds the number of priority levels {}",
            self.options.num_priority_levels
        );

        debug!("adding propagator {} as {propagator_id}", propagator.name());
        let handle = self
            .propagators
            .add(propagator, &mut self.assignments.trailed_values);
        gourd_assert_eq_simple!(handle.propagator_id(), propagator_id);

        self.propagator_queue
            .enqueue_propagator(propagator_id, priority);

        handle
    }

    /// Get a reference to the propagator identified by the given handle.
    ///
    /// For an exclusive reference, use [`State::get_propagator_mut`].
    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }

    /// Get an exclusive reference to the propagator identified by the given handle.
    pub fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self.propagators.get_propagator_mut(handle)
    }

    /// Ask the propagator whether its constraint is decided by the current domains.
    pub fn is_entailed(&self, propagator: PropagatorId) -> Entailment {
        self.propagators[propagator].is_entailed(Domains::new(&self.assignments))
    }

    /// Whether the propagator is neither deactivated by entailment nor detached.
    pub fn is_active(&self, propagator: PropagatorId) -> bool {
        self.propagators
            .is_active(propagator, &self.assignments.trailed_values)
    }

    /// Unlink the propagator from every variable it watches. It is never notified or propagated
    /// again, also not after backtracking.
    pub fn detach_propagator(&mut self, propagator: PropagatorId) {
        debug!("detaching {propagator}");
        self.assignments.detach(propagator);
        self.propagators.detach(propagator);
    }

    /// Attach a passive monitor to `variables`; it runs after every change to any of them.
    pub fn add_monitor(
        &mut self,
        monitor: impl VariableMonitor + 'static,
        variables: impl IntoIterator<Item = VariableRef>,
    ) -> MonitorId {
        let monitor_id = self.monitors.add(Box::new(monitor));
        for variable in variables {
            self.assignments.attach_monitor(monitor_id, variable);
        }
        monitor_id
    }

    /// Run the monitor as if `events` happened on `variable`, e.g. to establish its invariant
    /// when it is created.
    pub fn trigger_monitor(
        &mut self,
        monitor: MonitorId,
        variable: VariableRef,
        events: DomainEvents,
    ) -> Result<(), EmptyDomain> {
        self.monitors
            .trigger(monitor, variable, events, &mut self.assignments)
    }
}

/// Operations for modifying the state.
impl State {
    /// Apply a [`Predicate`] to the [`State`] as a decision.
    ///
    /// Returns `true` if a change to a domain occurred, and `false` if the given [`Predicate`] was
    /// already true.
    ///
    /// This method does _not_ perform any propagation. For that, an explicit call to
    /// [`State::propagate_to_fixed_point`] is required. This allows the posting of multiple
    /// predicates before the propagators are invoked.
    pub fn post(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        let variable = predicate.get_variable();
        let value = predicate.get_right_hand_side();
        match predicate.get_predicate_type() {
            PredicateType::LowerBound => self.update_lower_bound(variable, value),
            PredicateType::UpperBound => self.update_upper_bound(variable, value),
            PredicateType::Equal => self.instantiate_to(variable, value),
            PredicateType::NotEqual => self.remove_value(variable, value),
        }
    }

    /// Create a checkpoint of the current [`State`], that can be returned to with
    /// [`State::restore_to`].
    ///
    /// If propagators are still enqueued, then this method will panic.
    ///
    /// # Example
    /// ```
    /// use gourd_core::predicate;
    /// use gourd_core::propagation::ReadDomains;
    /// use gourd_core::State;
    ///
    /// let mut state = State::default();
    /// let variable = state
    ///     .new_bounded_variable(1, 10)
    ///     .expect("valid interval");
    ///
    /// state.new_checkpoint();
    /// assert_eq!(state.get_checkpoint(), 1);
    ///
    /// let _ = state
    ///     .post(predicate![variable <= 5])
    ///     .expect("the lower bound is 1 so there is no conflict");
    /// assert_eq!(state.upper_bound(variable), 5);
    ///
    /// state.restore_to(0);
    ///
    /// assert_eq!(state.get_checkpoint(), 0);
    /// assert_eq!(state.upper_bound(variable), 10);
    /// ```
    pub fn new_checkpoint(&mut self) {
        gourd_assert_simple!(
            self.propagator_queue.is_empty(),
            "can only create a new checkpoint when all propagation has occurred"
        );
        self.assignments.new_checkpoint();
        debug!("new checkpoint {}", self.get_checkpoint());
    }

    /// Restore every domain, delta log, delta monitor and trailed integer to the given checkpoint.
    ///
    /// If the provided checkpoint is equal to the current checkpoint, this is a no-op. If
    /// the provided checkpoint is larger than the current checkpoint, this method will
    /// panic.
    ///
    /// See [`State::new_checkpoint`] for an example.
    pub fn restore_to(&mut self, checkpoint: usize) {
        gourd_assert_simple!(
            checkpoint <= self.get_checkpoint(),
            "cannot restore to checkpoint {checkpoint}, the current checkpoint is {}",
            self.get_checkpoint()
        );
        if checkpoint == self.get_checkpoint() {
            return;
        }

        debug!(
            "restoring from checkpoint {} to {checkpoint}",
            self.get_checkpoint()
        );
        self.statistics.num_restores += 1;
        self.assignments.synchronise(checkpoint);
        self.propagator_queue.clear();
    }

    /// Performs fixed-point propagation using the propagators defined in the [`State`].
    ///
    /// The pending notifications are delivered to [`Propagator::notify`] in the order in which
    /// the changes happened, and the propagators which ask for it are enqueued. Then the enqueued
    /// propagator with the highest priority is propagated, which produces new notifications. This
    /// continues until no notification is pending and the queue is empty.
    ///
    /// If a domain becomes empty or a propagator reports a conflict, the queue and the pending
    /// notifications are cleared and the error is returned. Once the [`State`] is conflicting,
    /// the only meaningful operation is [`State::restore_to`].
    pub fn propagate_to_fixed_point(&mut self) -> Result<(), Inconsistency> {
        loop {
            while let Some(event) = self.assignments.notifications.pop_propagator_event() {
                if !self.is_active(event.propagator) {
                    continue;
                }

                self.statistics.num_notifications += 1;
                let propagator = &mut self.propagators[event.propagator];
                trace!(
                    "notifying {} ({}) of {:?} on {}",
                    propagator.name(),
                    event.propagator,
                    event.events,
                    event.local_id
                );

                let context = PropagationContext::new(
                    &mut self.assignments,
                    &mut self.monitors,
                    Cause::Propagator(event.propagator),
                );
                match propagator.notify(context, event.local_id, event.events) {
                    Ok(EnqueueDecision::Enqueue) => {
                        let priority = propagator.priority();
                        self.propagator_queue
                            .enqueue_propagator(event.propagator, priority);
                    }
                    Ok(EnqueueDecision::Skip) => {}
                    Err(inconsistency) => return Err(self.conflict(inconsistency)),
                }
            }

            let Some(propagator_id) = self.propagator_queue.pop() else {
                break;
            };
            if !self.is_active(propagator_id) {
                continue;
            }

            if let Err(inconsistency) = self.propagate(propagator_id) {
                return Err(self.conflict(inconsistency));
            }
        }

        Ok(())
    }

    /// Performs a single call to [`Propagator::propagate`] and checks entailment afterwards.
    fn propagate(&mut self, propagator_id: PropagatorId) -> Result<(), Inconsistency> {
        self.statistics.num_propagator_calls += 1;

        let propagator = &mut self.propagators[propagator_id];
        trace!("propagating {} ({propagator_id})", propagator.name());
        let context = PropagationContext::new(
            &mut self.assignments,
            &mut self.monitors,
            Cause::Propagator(propagator_id),
        );
        propagator.propagate(context)?;

        if self.options.entailment == EntailmentPolicy::Deactivate {
            match self.is_entailed(propagator_id) {
                Entailment::True => {
                    trace!("{propagator_id} is entailed");
                    self.statistics.num_entailed += 1;
                    self.propagators
                        .deactivate(propagator_id, &mut self.assignments.trailed_values);
                }
                Entailment::False => {
                    return Err(PropagatorConflict {
                        conjunction: vec![],
                    }
                    .into())
                }
                Entailment::Undefined => {}
            }
        }

        Ok(())
    }

    fn conflict(&mut self, inconsistency: Inconsistency) -> Inconsistency {
        debug!(
            "conflict at checkpoint {}: {inconsistency}",
            self.get_checkpoint()
        );
        self.statistics.num_conflicts += 1;
        self.propagator_queue.clear();
        self.assignments.notifications.clear();
        inconsistency
    }
}

impl HasAssignments for State {
    fn assignments(&self) -> &Assignments {
        &self.assignments
    }
}

impl ApplyMutation for State {
    fn apply_mutation(
        &mut self,
        justification: Option<Justification>,
        mutation: impl FnOnce(&mut Assignments, Reason) -> Result<bool, EmptyDomain>,
    ) -> Result<bool, EmptyDomain> {
        PropagationContext::new(&mut self.assignments, &mut self.monitors, Cause::Decision)
            .apply_mutation(justification, mutation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::PropagationStatus;
    use crate::engine::delta::IntDeltaMonitor;
    use crate::engine::events::IntDomainEvent;
    use crate::predicate;
    use crate::propagation::LocalId;
    use crate::propagation::MonitorContext;
    use crate::propagation::ReadDomains;

    /// `left <= right`, propagated on bounds.
    #[derive(Clone, Copy, Debug)]
    struct LessOrEqual {
        left: IntVarId,
        right: IntVarId,
    }

    impl PropagatorConstructor for LessOrEqual {
        type PropagatorImpl = LessOrEqualPropagator;

        fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
            context.register(self.left, DomainEvents::BOUNDS, LocalId::from(0));
            context.register(self.right, DomainEvents::BOUNDS, LocalId::from(1));
            LessOrEqualPropagator {
                constraint: self,
                num_notifications: 0,
            }
        }
    }

    #[derive(Clone, Debug)]
    struct LessOrEqualPropagator {
        constraint: LessOrEqual,
        num_notifications: usize,
    }

    impl Propagator for LessOrEqualPropagator {
        fn name(&self) -> &str {
            "LessOrEqual"
        }

        fn notify(
            &mut self,
            _context: PropagationContext,
            _local_id: LocalId,
            _events: DomainEvents,
        ) -> Result<EnqueueDecision, Inconsistency> {
            self.num_notifications += 1;
            Ok(EnqueueDecision::Enqueue)
        }

        fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
            let LessOrEqual { left, right } = self.constraint;
            let _ = context.update_lower_bound(right, context.lower_bound(left))?;
            let _ = context.update_upper_bound(left, context.upper_bound(right))?;
            Ok(())
        }

        fn is_entailed(&self, domains: Domains) -> Entailment {
            let LessOrEqual { left, right } = self.constraint;
            if domains.upper_bound(left) <= domains.lower_bound(right) {
                Entailment::True
            } else if domains.lower_bound(left) > domains.upper_bound(right) {
                Entailment::False
            } else {
                Entailment::Undefined
            }
        }
    }

    /// Copies every bound change of `source` onto `target` while it is attached.
    #[derive(Debug)]
    struct CopyBounds {
        source: IntVarId,
        target: IntVarId,
    }

    impl VariableMonitor for CopyBounds {
        fn name(&self) -> &str {
            "CopyBounds"
        }

        fn on_update(
            &mut self,
            mut context: MonitorContext,
            variable: VariableRef,
            _events: DomainEvents,
        ) -> Result<(), EmptyDomain> {
            if variable == VariableRef::from(self.source) {
                let lower_bound = context.lower_bound(self.source);
                let upper_bound = context.upper_bound(self.source);
                let _ = context.update_bounds(self.target, lower_bound, upper_bound)?;
            }
            Ok(())
        }
    }

    fn less_or_equal(state: &mut State, left: IntVarId, right: IntVarId) -> PropagatorId {
        state
            .add_propagator(LessOrEqual { left, right })
            .propagator_id()
    }

    #[test]
    fn propagation_reaches_a_fixpoint_through_a_chain() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut state = State::default();
        let x = state.new_bounded_variable(0, 10).expect("valid interval");
        let y = state.new_bounded_variable(0, 10).expect("valid interval");
        let z = state.new_bounded_variable(0, 10).expect("valid interval");
        let _ = less_or_equal(&mut state, x, y);
        let _ = less_or_equal(&mut state, y, z);
        state.propagate_to_fixed_point().expect("no conflict");

        let _ = state
            .post(predicate!(x >= 4))
            .expect("non-empty domain");
        let _ = state
            .post(predicate!(z <= 6))
            .expect("non-empty domain");
        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!((4, 6), (state.lower_bound(y), state.upper_bound(y)));
        assert_eq!(6, state.upper_bound(x));
        assert_eq!(4, state.lower_bound(z));
    }

    #[test]
    fn a_propagator_is_not_notified_of_its_own_changes() {
        let mut state = State::default();
        let x = state.new_bounded_variable(3, 10).expect("valid interval");
        let y = state.new_bounded_variable(0, 10).expect("valid interval");
        let handle = state.add_propagator(LessOrEqual { left: x, right: y });

        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!(3, state.lower_bound(y));
        assert_eq!(
            Cause::Propagator(handle.propagator_id()),
            state.last_int_delta(y).expect("y changed").cause()
        );
        let propagator = state.get_propagator(handle).expect("the handle is typed");
        assert_eq!(0, propagator.num_notifications);
    }

    #[test]
    fn a_wipeout_is_reported_and_clears_the_queue() {
        let mut state = State::default();
        let x = state.new_bounded_variable(0, 10).expect("valid interval");
        let y = state.new_bounded_variable(0, 10).expect("valid interval");
        let _ = less_or_equal(&mut state, x, y);
        state.propagate_to_fixed_point().expect("no conflict");

        state.new_checkpoint();
        let _ = state
            .post(predicate!(x >= 7))
            .expect("non-empty domain");
        let _ = state
            .post(predicate!(y <= 5))
            .expect("non-empty domain");

        let result = state.propagate_to_fixed_point();
        assert!(matches!(result, Err(Inconsistency::EmptyDomain(_))));
        assert_eq!(1, state.statistics().num_conflicts);

        state.restore_to(0);
        assert_eq!((0, 10), (state.lower_bound(x), state.upper_bound(x)));
        assert_eq!((0, 10), (state.lower_bound(y), state.upper_bound(y)));
        state.propagate_to_fixed_point().expect("no conflict");
    }

    #[test]
    fn entailed_propagators_are_reactivated_on_backtrack() {
        let mut state = State::default();
        let x = state.new_bounded_variable(0, 10).expect("valid interval");
        let y = state.new_bounded_variable(0, 10).expect("valid interval");
        let propagator = less_or_equal(&mut state, x, y);
        state.propagate_to_fixed_point().expect("no conflict");
        assert!(state.is_active(propagator));

        state.new_checkpoint();
        let _ = state.post(predicate!(x <= 2)).expect("non-empty domain");
        let _ = state.post(predicate!(y >= 2)).expect("non-empty domain");
        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!(Entailment::True, state.is_entailed(propagator));
        assert!(!state.is_active(propagator));
        assert_eq!(1, state.statistics().num_entailed);

        state.restore_to(0);
        assert!(state.is_active(propagator));
    }

    #[test]
    fn entailment_is_not_checked_when_ignored() {
        let mut state = State::new(EngineOptions {
            entailment: EntailmentPolicy::Ignore,
            ..EngineOptions::default()
        });
        let x = state.new_bounded_variable(0, 1).expect("valid interval");
        let y = state.new_bounded_variable(5, 6).expect("valid interval");
        let propagator = less_or_equal(&mut state, x, y);

        state.propagate_to_fixed_point().expect("no conflict");

        assert!(state.is_active(propagator));
    }

    #[test]
    fn detached_propagators_are_never_called_again() {
        let mut state = State::default();
        let x = state.new_bounded_variable(0, 10).expect("valid interval");
        let y = state.new_bounded_variable(0, 10).expect("valid interval");
        let propagator = less_or_equal(&mut state, x, y);
        state.propagate_to_fixed_point().expect("no conflict");

        state.detach_propagator(propagator);
        let _ = state.post(predicate!(x >= 8)).expect("non-empty domain");
        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!(0, state.lower_bound(y));
        assert!(!state.is_active(propagator));
    }

    #[test]
    fn monitors_run_before_the_decision_returns() {
        let mut state = State::default();
        let x = state.new_bounded_variable(0, 10).expect("valid interval");
        let y = state.new_bounded_variable(0, 10).expect("valid interval");
        let _ = state.add_monitor(
            CopyBounds {
                source: x,
                target: y,
            },
            [x.into()],
        );

        state.new_checkpoint();
        let _ = state.update_bounds(x, 3, 7).expect("non-empty domain");

        assert_eq!((3, 7), (state.lower_bound(y), state.upper_bound(y)));
        assert_eq!(
            Cause::Monitor(MonitorId(0)),
            state.last_int_delta(y).expect("y changed").cause()
        );
        assert_eq!(1, state.statistics().num_monitor_calls);

        state.restore_to(0);
        assert_eq!((0, 10), (state.lower_bound(y), state.upper_bound(y)));
    }

    #[test]
    fn a_failing_monitor_fails_the_decision() {
        let mut state = State::default();
        let x = state.new_bounded_variable(0, 10).expect("valid interval");
        let y = state.new_bounded_variable(0, 4).expect("valid interval");
        let _ = state.add_monitor(
            CopyBounds {
                source: x,
                target: y,
            },
            [x.into()],
        );

        let result = state.update_lower_bound(x, 6);

        assert_eq!(
            Err(EmptyDomain {
                variable: y.into(),
                cause: Cause::Monitor(MonitorId(0)),
            }),
            result
        );
        assert_eq!(6, state.lower_bound(x));
        assert_eq!((0, 4), (state.lower_bound(y), state.upper_bound(y)));
    }

    #[test]
    fn delta_monitors_are_restored_with_the_log() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10).expect("valid interval");
        let mut monitor: IntDeltaMonitor = {
            let mut context =
                PropagatorConstructorContext::new(&mut state.assignments, PropagatorId(0));
            context.delta_monitor(x)
        };

        state.new_checkpoint();
        let _ = state.remove_value(x, 3).expect("non-empty domain");
        let _ = state.remove_value(x, 5).expect("non-empty domain");

        let mut context =
            PropagationContext::new(&mut state.assignments, &mut state.monitors, Cause::Decision);
        let mut removed = vec![];
        monitor
            .replay(
                &mut context,
                IntDomainEvent::Removal.into(),
                |_, delta| -> Result<(), EmptyDomain> {
                    removed.extend(delta.removed_value());
                    Ok(())
                },
            )
            .expect("actions do not fail");
        assert_eq!(vec![3, 5], removed);
        assert!(!monitor.has_pending(&context));

        state.restore_to(0);
        let _ = state.remove_value(x, 7).expect("non-empty domain");

        let mut context =
            PropagationContext::new(&mut state.assignments, &mut state.monitors, Cause::Decision);
        removed.clear();
        monitor
            .replay(
                &mut context,
                IntDomainEvent::Removal.into(),
                |_, delta| -> Result<(), EmptyDomain> {
                    removed.extend(delta.removed_value());
                    Ok(())
                },
            )
            .expect("actions do not fail");
        assert_eq!(vec![7], removed);
    }

    #[test]
    fn invalid_variables_are_rejected() {
        let mut state = State::default();

        assert_eq!(
            Err(ConstraintOperationError::InvalidInterval {
                lower_bound: 3,
                upper_bound: 1
            }),
            state.new_bounded_variable(3, 1)
        );
        assert_eq!(
            Err(ConstraintOperationError::EmptyInitialDomain),
            state.new_enumerated_variable([])
        );
        assert_eq!(
            Err(ConstraintOperationError::KernelNotInEnvelope(4)),
            state.new_set_variable([4], [1, 2, 3])
        );

        let x = state
            .new_enumerated_variable([5, 1, 3, 1])
            .expect("non-empty domain");
        assert_eq!(vec![1, 3, 5], state.iterate_values(x).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic(expected = "propagators can only be added at the root")]
    fn propagators_cannot_be_added_above_the_root() {
        let mut state = State::default();
        let x = state.new_bounded_variable(0, 10).expect("valid interval");
        let y = state.new_bounded_variable(0, 10).expect("valid interval");

        state.new_checkpoint();
        let _ = state.update_lower_bound(x, 3).expect("non-empty domain");
        let _ = less_or_equal(&mut state, x, y);
    }
}

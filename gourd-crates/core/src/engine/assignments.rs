use enumset::EnumSet;
use itertools::Itertools;
use log::trace;

use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::engine::delta::IntDelta;
use crate::engine::delta::SetDelta;
use crate::engine::domains::IntDomain;
use crate::engine::domains::RangeIterator;
use crate::engine::domains::SetDomain;
use crate::engine::domains::SetView;
use crate::engine::domains::ValueIterator;
use crate::engine::events::DomainEvents;
use crate::engine::events::SetDomainEvent;
use crate::engine::notifications::MonitorEvent;
use crate::engine::notifications::NotificationQueue;
use crate::engine::notifications::PropagatorEvent;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateType;
use crate::engine::trailed::TrailedValues;
use crate::engine::variables::Attachment;
use crate::engine::variables::IntVarId;
use crate::engine::variables::IntVariable;
use crate::engine::variables::SetVarId;
use crate::engine::variables::SetVariable;
use crate::engine::variables::VariableRef;
use crate::engine::variables::Watcher;
use crate::engine::Cause;
use crate::engine::EmptyDomain;
use crate::engine::Reason;
use crate::gourd_assert_advanced;
use crate::gourd_assert_extreme;
use crate::gourd_assert_simple;
use crate::monitors::MonitorId;
use crate::propagation::LocalId;
use crate::propagation::PropagatorId;

/// Owns every variable and exposes the only legal way to change their domains.
///
/// Every accepted change appends exactly one record to the delta log of the variable and queues a
/// notification for every attached propagator whose subscription matches and for every attached
/// passive monitor, except for whoever caused the change. Every change is validated before
/// anything is written, so a change which fails with [`EmptyDomain`] leaves the domain untouched.
///
/// All state lives in [`TrailedValues`], which makes [`Assignments::synchronise`] restore the
/// domains, the lengths of the delta logs and all trailed state of propagators at once.
#[derive(Debug, Clone, Default)]
pub struct Assignments {
    pub(crate) trailed_values: TrailedValues,
    int_variables: KeyedVec<IntVarId, IntVariable>,
    set_variables: KeyedVec<SetVarId, SetVariable>,
    /// For each propagator, the watchers it registered.
    attachments: KeyedVec<PropagatorId, Vec<Attachment>>,
    pub(crate) notifications: NotificationQueue,
}

// Creation and subscriptions.
impl Assignments {
    pub(crate) fn new_bounded_variable(&mut self, lower_bound: i32, upper_bound: i32) -> IntVarId {
        let domain = IntDomain::new_bounded(&mut self.trailed_values, lower_bound, upper_bound);
        let variable = IntVariable::new(domain, &mut self.trailed_values);
        self.int_variables.push(variable)
    }

    /// Create an enumerated variable from a sorted and deduplicated non-empty list of values.
    pub(crate) fn new_enumerated_variable(&mut self, values: &[i32]) -> IntVarId {
        let domain = IntDomain::new_enumerated(&mut self.trailed_values, values);
        let variable = IntVariable::new(domain, &mut self.trailed_values);
        self.int_variables.push(variable)
    }

    pub(crate) fn new_set_variable(&mut self, kernel: &[i32], envelope: &[i32]) -> SetVarId {
        let domain = SetDomain::new(&mut self.trailed_values, kernel, envelope);
        let variable = SetVariable::new(domain, &mut self.trailed_values);
        self.set_variables.push(variable)
    }

    pub fn num_int_variables(&self) -> usize {
        self.int_variables.len()
    }

    pub fn num_set_variables(&self) -> usize {
        self.set_variables.len()
    }

    pub fn int_variables(&self) -> impl Iterator<Item = IntVarId> {
        self.int_variables.keys()
    }

    /// Attach a propagator to a variable, so it is notified of the `events` on it.
    ///
    /// A mask of set events on an integer variable (or the other way around) never matches.
    pub(crate) fn attach(
        &mut self,
        propagator: PropagatorId,
        variable: VariableRef,
        events: DomainEvents,
        local_id: LocalId,
    ) {
        self.attachments.accomodate(propagator, Vec::new());
        let attachment = self.attachments[propagator].len();

        let position = match variable {
            VariableRef::Int(variable) => {
                let watchers = &mut self.int_variables[variable].watchers;
                watchers.push(Watcher {
                    propagator,
                    local_id,
                    events: events.int_events(),
                    attachment,
                });
                watchers.len() - 1
            }
            VariableRef::Set(variable) => {
                let watchers = &mut self.set_variables[variable].watchers;
                watchers.push(Watcher {
                    propagator,
                    local_id,
                    events: events.set_events(),
                    attachment,
                });
                watchers.len() - 1
            }
        };

        self.attachments[propagator].push(Attachment { variable, position });
    }

    /// Remove every watcher of the propagator, in constant time per watcher.
    pub(crate) fn detach(&mut self, propagator: PropagatorId) {
        let num_attachments = self.attachments.get(propagator).map_or(0, Vec::len);

        // Positions are read as we go, since a swap may move a watcher of this propagator.
        for index in 0..num_attachments {
            let attachment = self.attachments[propagator][index];
            let moved = match attachment.variable {
                VariableRef::Int(variable) => {
                    let watchers = &mut self.int_variables[variable].watchers;
                    let _ = watchers.swap_remove(attachment.position);
                    watchers
                        .get(attachment.position)
                        .map(|watcher| (watcher.propagator, watcher.attachment))
                }
                VariableRef::Set(variable) => {
                    let watchers = &mut self.set_variables[variable].watchers;
                    let _ = watchers.swap_remove(attachment.position);
                    watchers
                        .get(attachment.position)
                        .map(|watcher| (watcher.propagator, watcher.attachment))
                }
            };

            // The last watcher took the freed slot; its back-link has to follow.
            if let Some((moved_propagator, moved_attachment)) = moved {
                self.attachments[moved_propagator][moved_attachment].position =
                    attachment.position;
            }
        }

        if num_attachments > 0 {
            self.attachments[propagator].clear();
        }
    }

    pub(crate) fn attach_monitor(&mut self, monitor: MonitorId, variable: VariableRef) {
        match variable {
            VariableRef::Int(variable) => self.int_variables[variable].monitors.push(monitor),
            VariableRef::Set(variable) => self.set_variables[variable].monitors.push(monitor),
        }
    }

    pub(crate) fn num_watchers(&self, variable: VariableRef) -> usize {
        match variable {
            VariableRef::Int(variable) => self.int_variables[variable].watchers.len(),
            VariableRef::Set(variable) => self.set_variables[variable].watchers.len(),
        }
    }
}

// Checkpoints.
impl Assignments {
    pub(crate) fn new_checkpoint(&mut self) {
        self.trailed_values.new_checkpoint();
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trailed_values.get_checkpoint()
    }

    /// Restore every domain, log and trailed integer to `checkpoint` and drop the pending
    /// notifications.
    pub(crate) fn synchronise(&mut self, checkpoint: usize) {
        self.trailed_values.synchronise(checkpoint);
        self.notifications.clear();
    }
}

// Integer queries.
impl Assignments {
    pub fn lower_bound(&self, variable: IntVarId) -> i32 {
        self.int_variables[variable]
            .domain
            .lower_bound(&self.trailed_values)
    }

    pub fn upper_bound(&self, variable: IntVarId) -> i32 {
        self.int_variables[variable]
            .domain
            .upper_bound(&self.trailed_values)
    }

    pub fn domain_size(&self, variable: IntVarId) -> usize {
        self.int_variables[variable].domain.size(&self.trailed_values)
    }

    pub fn contains(&self, variable: IntVarId, value: i32) -> bool {
        self.int_variables[variable]
            .domain
            .contains(&self.trailed_values, value)
    }

    pub fn is_fixed(&self, variable: IntVarId) -> bool {
        self.lower_bound(variable) == self.upper_bound(variable)
    }

    pub fn fixed_value(&self, variable: IntVarId) -> Option<i32> {
        self.is_fixed(variable)
            .then(|| self.lower_bound(variable))
    }

    pub fn is_enumerated(&self, variable: IntVarId) -> bool {
        self.int_variables[variable].domain.is_enumerated()
    }

    pub fn next_value(&self, variable: IntVarId, value: i32) -> Option<i32> {
        self.int_variables[variable]
            .domain
            .next_value(&self.trailed_values, value)
    }

    pub fn previous_value(&self, variable: IntVarId, value: i32) -> Option<i32> {
        self.int_variables[variable]
            .domain
            .previous_value(&self.trailed_values, value)
    }

    pub fn iterate_values(&self, variable: IntVarId) -> ValueIterator<'_> {
        ValueIterator::forward(&self.int_variables[variable].domain, &self.trailed_values)
    }

    pub fn iterate_values_rev(&self, variable: IntVarId) -> ValueIterator<'_> {
        ValueIterator::backward(&self.int_variables[variable].domain, &self.trailed_values)
    }

    pub fn iterate_ranges(&self, variable: IntVarId) -> RangeIterator<'_> {
        RangeIterator::forward(&self.int_variables[variable].domain, &self.trailed_values)
    }

    pub fn iterate_ranges_rev(&self, variable: IntVarId) -> RangeIterator<'_> {
        RangeIterator::backward(&self.int_variables[variable].domain, &self.trailed_values)
    }

    pub fn int_deltas(&self, variable: IntVarId) -> &[IntDelta] {
        self.int_variables[variable]
            .log
            .records(&self.trailed_values)
    }

    /// The record of the most recent change to the variable, e.g. to query its justification.
    pub fn last_int_delta(&self, variable: IntVarId) -> Option<&IntDelta> {
        self.int_deltas(variable).last()
    }

    pub fn evaluate_predicate(&self, predicate: Predicate) -> Option<bool> {
        let variable = predicate.get_variable();
        let value = predicate.get_right_hand_side();
        let lower_bound = self.lower_bound(variable);
        let upper_bound = self.upper_bound(variable);
        let contains = |value| self.contains(variable, value);

        if predicate.is_entailed_by(lower_bound, upper_bound, contains) {
            return Some(true);
        }

        let falsified = match predicate.get_predicate_type() {
            PredicateType::LowerBound => upper_bound < value,
            PredicateType::UpperBound => lower_bound > value,
            PredicateType::Equal => !contains(value),
            PredicateType::NotEqual => lower_bound == value && upper_bound == value,
        };
        falsified.then_some(false)
    }
}

// Set queries.
impl Assignments {
    pub fn kernel(&self, variable: SetVarId) -> SetView<'_> {
        self.set_variables[variable]
            .domain
            .kernel(&self.trailed_values)
    }

    pub fn envelope(&self, variable: SetVarId) -> SetView<'_> {
        self.set_variables[variable]
            .domain
            .envelope(&self.trailed_values)
    }

    pub fn kernel_size(&self, variable: SetVarId) -> usize {
        self.kernel(variable).len()
    }

    pub fn envelope_size(&self, variable: SetVarId) -> usize {
        self.envelope(variable).len()
    }

    pub fn is_set_fixed(&self, variable: SetVarId) -> bool {
        self.kernel_size(variable) == self.envelope_size(variable)
    }

    pub fn set_deltas(&self, variable: SetVarId) -> &[SetDelta] {
        self.set_variables[variable]
            .log
            .records(&self.trailed_values)
    }
}

// Integer mutations.
impl Assignments {
    fn empty_domain(variable: impl Into<VariableRef>, reason: Reason) -> EmptyDomain {
        EmptyDomain {
            variable: variable.into(),
            cause: reason.cause,
        }
    }

    /// Remove `value` from the domain.
    ///
    /// Removing a bound moves it to the next value in the domain. A bounded domain cannot
    /// represent holes, so removing a value strictly between its bounds does nothing.
    pub(crate) fn remove_value(
        &mut self,
        variable: IntVarId,
        value: i32,
        reason: Reason,
    ) -> Result<bool, EmptyDomain> {
        if !self.contains(variable, value) {
            return Ok(false);
        }

        let lower_bound = self.lower_bound(variable);
        let upper_bound = self.upper_bound(variable);
        if lower_bound == upper_bound {
            return Err(Self::empty_domain(variable, reason));
        }

        if value == lower_bound {
            let Some(new_lower_bound) = self.next_value(variable, value) else {
                return Err(Self::empty_domain(variable, reason));
            };
            self.narrow(variable, new_lower_bound, upper_bound, reason);
            return Ok(true);
        }

        if value == upper_bound {
            let Some(new_upper_bound) = self.previous_value(variable, value) else {
                return Err(Self::empty_domain(variable, reason));
            };
            self.narrow(variable, lower_bound, new_upper_bound, reason);
            return Ok(true);
        }

        let domain = &self.int_variables[variable].domain;
        if !domain.is_enumerated() {
            return Ok(false);
        }
        domain.remove_interior(&mut self.trailed_values, value);

        self.record_int_change(
            variable,
            IntDelta::new(
                (lower_bound, upper_bound),
                (lower_bound, upper_bound),
                Some(value),
                reason.cause,
                reason.justification,
            ),
        );
        Ok(true)
    }

    /// Remove every value in `[from, to]`.
    ///
    /// A prefix or suffix of the domain is removed with a single bound change; an interior
    /// interval of an enumerated domain is removed value by value.
    pub(crate) fn remove_interval(
        &mut self,
        variable: IntVarId,
        from: i32,
        to: i32,
        reason: Reason,
    ) -> Result<bool, EmptyDomain> {
        if from > to {
            return Ok(false);
        }

        let lower_bound = self.lower_bound(variable);
        let upper_bound = self.upper_bound(variable);

        if from <= lower_bound && to >= upper_bound {
            return Err(Self::empty_domain(variable, reason));
        }
        if from <= lower_bound {
            return self.update_lower_bound(variable, to + 1, reason);
        }
        if to >= upper_bound {
            return self.update_upper_bound(variable, from - 1, reason);
        }
        if !self.is_enumerated(variable) {
            return Ok(false);
        }

        let to_remove = self
            .iterate_values(variable)
            .skip_while(|&value| value < from)
            .take_while(|&value| value <= to)
            .collect::<Vec<_>>();
        for &value in &to_remove {
            let _ = self.remove_value(variable, value, reason)?;
        }

        Ok(!to_remove.is_empty())
    }

    /// Raise the lower bound to the smallest value in the domain which is at least `value`.
    pub(crate) fn update_lower_bound(
        &mut self,
        variable: IntVarId,
        value: i32,
        reason: Reason,
    ) -> Result<bool, EmptyDomain> {
        let lower_bound = self.lower_bound(variable);
        if value <= lower_bound {
            return Ok(false);
        }

        let Some(new_lower_bound) = self.int_variables[variable]
            .domain
            .lowest_member_from(&self.trailed_values, value)
        else {
            return Err(Self::empty_domain(variable, reason));
        };

        let upper_bound = self.upper_bound(variable);
        self.narrow(variable, new_lower_bound, upper_bound, reason);
        Ok(true)
    }

    /// Lower the upper bound to the largest value in the domain which is at most `value`.
    pub(crate) fn update_upper_bound(
        &mut self,
        variable: IntVarId,
        value: i32,
        reason: Reason,
    ) -> Result<bool, EmptyDomain> {
        let upper_bound = self.upper_bound(variable);
        if value >= upper_bound {
            return Ok(false);
        }

        let Some(new_upper_bound) = self.int_variables[variable]
            .domain
            .highest_member_until(&self.trailed_values, value)
        else {
            return Err(Self::empty_domain(variable, reason));
        };

        let lower_bound = self.lower_bound(variable);
        self.narrow(variable, lower_bound, new_upper_bound, reason);
        Ok(true)
    }

    /// Update both bounds with a single change; if the resulting bounds cross, nothing is
    /// changed.
    pub(crate) fn update_bounds(
        &mut self,
        variable: IntVarId,
        lower: i32,
        upper: i32,
        reason: Reason,
    ) -> Result<bool, EmptyDomain> {
        let lower_bound = self.lower_bound(variable);
        let upper_bound = self.upper_bound(variable);
        let domain = &self.int_variables[variable].domain;

        let new_lower_bound = if lower <= lower_bound {
            Some(lower_bound)
        } else {
            domain.lowest_member_from(&self.trailed_values, lower)
        };
        let new_upper_bound = if upper >= upper_bound {
            Some(upper_bound)
        } else {
            domain.highest_member_until(&self.trailed_values, upper)
        };

        let (Some(new_lower_bound), Some(new_upper_bound)) = (new_lower_bound, new_upper_bound)
        else {
            return Err(Self::empty_domain(variable, reason));
        };
        if new_lower_bound > new_upper_bound {
            return Err(Self::empty_domain(variable, reason));
        }
        if (new_lower_bound, new_upper_bound) == (lower_bound, upper_bound) {
            return Ok(false);
        }

        self.narrow(variable, new_lower_bound, new_upper_bound, reason);
        Ok(true)
    }

    /// Reduce the domain to `{value}`.
    pub(crate) fn instantiate_to(
        &mut self,
        variable: IntVarId,
        value: i32,
        reason: Reason,
    ) -> Result<bool, EmptyDomain> {
        if let Some(fixed_value) = self.fixed_value(variable) {
            return if fixed_value == value {
                Ok(false)
            } else {
                Err(Self::empty_domain(variable, reason))
            };
        }

        if !self.contains(variable, value) {
            return Err(Self::empty_domain(variable, reason));
        }

        self.narrow(variable, value, value, reason);
        Ok(true)
    }

    /// Narrow the bounds to the provided members of the domain and record the change.
    fn narrow(&mut self, variable: IntVarId, lower_bound: i32, upper_bound: i32, reason: Reason) {
        let previous_bounds = (self.lower_bound(variable), self.upper_bound(variable));
        gourd_assert_simple!(previous_bounds != (lower_bound, upper_bound));

        self.int_variables[variable].domain.narrow_to(
            &mut self.trailed_values,
            lower_bound,
            upper_bound,
        );

        self.record_int_change(
            variable,
            IntDelta::new(
                previous_bounds,
                (lower_bound, upper_bound),
                None,
                reason.cause,
                reason.justification,
            ),
        );
    }

    fn record_int_change(&mut self, variable: IntVarId, delta: IntDelta) {
        gourd_assert_extreme!(self.int_variables[variable]
            .domain
            .debug_is_consistent(&self.trailed_values));
        trace!(
            "{variable}: {:?} {:?} -> {:?} by {}",
            delta.event(),
            delta.previous_bounds(),
            delta.current_bounds(),
            delta.cause()
        );

        self.int_variables[variable]
            .log
            .append(&mut self.trailed_values, delta);

        let events = DomainEvents::create_with_int_events(delta.changes());
        self.notify_propagators(variable.into(), events, delta.cause());
        self.notify_monitors(variable.into(), events, delta.cause());
    }
}

// Set mutations.
impl Assignments {
    /// Add `element` to the kernel; it has to be in the envelope.
    pub(crate) fn force(
        &mut self,
        variable: SetVarId,
        element: i32,
        reason: Reason,
    ) -> Result<bool, EmptyDomain> {
        if self.kernel(variable).contains(element) {
            return Ok(false);
        }
        if !self.envelope(variable).contains(element) {
            return Err(Self::empty_domain(variable, reason));
        }

        let _ = self.set_variables[variable]
            .domain
            .add_to_kernel(&mut self.trailed_values, element);
        self.record_set_change(
            variable,
            SetDelta {
                element,
                event: SetDomainEvent::AddToKernel,
                cause: reason.cause,
            },
        );
        Ok(true)
    }

    /// Remove `element` from the envelope; it cannot be in the kernel.
    pub(crate) fn remove_from_envelope(
        &mut self,
        variable: SetVarId,
        element: i32,
        reason: Reason,
    ) -> Result<bool, EmptyDomain> {
        if !self.envelope(variable).contains(element) {
            return Ok(false);
        }
        if self.kernel(variable).contains(element) {
            return Err(Self::empty_domain(variable, reason));
        }

        let _ = self.set_variables[variable]
            .domain
            .remove_from_envelope(&mut self.trailed_values, element);
        self.record_set_change(
            variable,
            SetDelta {
                element,
                event: SetDomainEvent::RemoveFromEnvelope,
                cause: reason.cause,
            },
        );
        Ok(true)
    }

    /// Fix the set to `values`: force every member and remove every non-member.
    ///
    /// The whole change is validated first; if it fails, no element is moved and no event fires.
    pub(crate) fn instantiate_set_to(
        &mut self,
        variable: SetVarId,
        values: &[i32],
        reason: Reason,
    ) -> Result<bool, EmptyDomain> {
        let members: HashSet<i32> = values.iter().copied().collect();

        let envelope = self.envelope(variable);
        let kernel = self.kernel(variable);
        let feasible = members.iter().all(|&member| envelope.contains(member))
            && kernel.iter().all(|element| members.contains(&element));
        if !feasible {
            return Err(Self::empty_domain(variable, reason));
        }

        let to_force = values
            .iter()
            .copied()
            .sorted_unstable()
            .dedup()
            .filter(|&member| !kernel.contains(member))
            .collect::<Vec<_>>();
        let to_remove = envelope
            .iter()
            .filter(|element| !members.contains(element))
            .collect::<Vec<_>>();

        for &element in &to_force {
            let _ = self.force(variable, element, reason)?;
        }
        for &element in &to_remove {
            let _ = self.remove_from_envelope(variable, element, reason)?;
        }

        gourd_assert_advanced!(self.is_set_fixed(variable));
        Ok(!to_force.is_empty() || !to_remove.is_empty())
    }

    fn record_set_change(&mut self, variable: SetVarId, delta: SetDelta) {
        gourd_assert_advanced!(self.kernel(variable).is_subset_of(&self.envelope(variable)));
        trace!(
            "{variable}: {:?} {} by {}",
            delta.event,
            delta.element,
            delta.cause
        );

        self.set_variables[variable]
            .log
            .append(&mut self.trailed_values, delta);

        let events = DomainEvents::create_with_set_events(delta.changes());
        self.notify_propagators(variable.into(), events, delta.cause);
        self.notify_monitors(variable.into(), events, delta.cause);
    }
}

// Notifications.
impl Assignments {
    /// Queue a notification for every propagator attached to `variable` whose subscription
    /// intersects `events`, except for `cause`.
    pub(crate) fn notify_propagators(
        &mut self,
        variable: VariableRef,
        events: DomainEvents,
        cause: Cause,
    ) {
        match variable {
            VariableRef::Int(variable) => {
                for watcher in &self.int_variables[variable].watchers {
                    let matched = watcher.events & events.int_events();
                    if !matched.is_empty() && cause != Cause::Propagator(watcher.propagator) {
                        self.notifications.push_propagator_event(PropagatorEvent {
                            propagator: watcher.propagator,
                            local_id: watcher.local_id,
                            events: DomainEvents::create_with_int_events(matched),
                        });
                    }
                }
            }
            VariableRef::Set(variable) => {
                for watcher in &self.set_variables[variable].watchers {
                    let matched: EnumSet<SetDomainEvent> = watcher.events & events.set_events();
                    if !matched.is_empty() && cause != Cause::Propagator(watcher.propagator) {
                        self.notifications.push_propagator_event(PropagatorEvent {
                            propagator: watcher.propagator,
                            local_id: watcher.local_id,
                            events: DomainEvents::create_with_set_events(matched),
                        });
                    }
                }
            }
        }
    }

    /// Queue a notification for every passive monitor attached to `variable`, except for `cause`.
    pub(crate) fn notify_monitors(
        &mut self,
        variable: VariableRef,
        events: DomainEvents,
        cause: Cause,
    ) {
        let monitors = match variable {
            VariableRef::Int(variable) => &self.int_variables[variable].monitors,
            VariableRef::Set(variable) => &self.set_variables[variable].monitors,
        };

        for &monitor in monitors {
            if cause != Cause::Monitor(monitor) {
                self.notifications.push_monitor_event(MonitorEvent {
                    monitor,
                    variable,
                    events,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use enumset::enum_set;

    use super::*;
    use crate::engine::events::IntDomainEvent;
    use crate::predicate;

    fn decision() -> Reason {
        Cause::Decision.into()
    }

    fn propagator(id: u32) -> Reason {
        Cause::Propagator(PropagatorId(id)).into()
    }

    #[test]
    fn removing_an_interior_value_logs_one_removal() {
        let mut assignments = Assignments::default();
        let x = assignments.new_enumerated_variable(&(1..=10).collect::<Vec<_>>());

        let changed = assignments
            .remove_value(x, 5, decision())
            .expect("non-empty domain");

        assert!(changed);
        assert!(!assignments.contains(x, 5));
        assert_eq!(9, assignments.domain_size(x));
        assert_eq!(1, assignments.int_deltas(x).len());
        assert_eq!(IntDomainEvent::Removal, assignments.int_deltas(x)[0].event());
        assert_eq!(Some(5), assignments.int_deltas(x)[0].removed_value());
    }

    #[test]
    fn instantiation_logs_a_single_assign_event() {
        let mut assignments = Assignments::default();
        let x = assignments.new_enumerated_variable(&[1, 2, 3]);

        let _ = assignments
            .instantiate_to(x, 2, decision())
            .expect("non-empty domain");

        assert_eq!(vec![2], assignments.iterate_values(x).collect::<Vec<_>>());
        assert_eq!(1, assignments.int_deltas(x).len());
        assert_eq!(IntDomainEvent::Assign, assignments.int_deltas(x)[0].event());
    }

    #[test]
    fn crossing_bounds_leaves_the_domain_unchanged() {
        let mut assignments = Assignments::default();
        let x = assignments.new_bounded_variable(1, 10);

        assignments.new_checkpoint();
        let result = assignments.update_lower_bound(x, 11, decision());

        assert_eq!(
            Err(EmptyDomain {
                variable: x.into(),
                cause: Cause::Decision
            }),
            result
        );
        assert_eq!((1, 10), (assignments.lower_bound(x), assignments.upper_bound(x)));
        assert!(assignments.int_deltas(x).is_empty());

        assignments.synchronise(0);
        assert_eq!((1, 10), (assignments.lower_bound(x), assignments.upper_bound(x)));
    }

    #[test]
    fn forcing_then_removing_the_same_element_fails_without_changes() {
        let mut assignments = Assignments::default();
        let s = assignments.new_set_variable(&[], &[1, 2, 3]);

        assert!(assignments.force(s, 2, decision()).expect("in envelope"));
        let result = assignments.remove_from_envelope(s, 2, decision());

        assert!(result.is_err());
        assert_eq!(vec![2], assignments.kernel(s).iter().collect::<Vec<_>>());
        assert_eq!(
            vec![1, 2, 3],
            assignments.envelope(s).iter().collect::<Vec<_>>()
        );
        assert_eq!(1, assignments.set_deltas(s).len());
    }

    #[test]
    fn no_op_mutations_emit_nothing() {
        let mut assignments = Assignments::default();
        let x = assignments.new_enumerated_variable(&[1, 3, 5]);
        let s = assignments.new_set_variable(&[1], &[1, 2]);

        assert_eq!(Ok(false), assignments.remove_value(x, 2, decision()));
        assert_eq!(Ok(false), assignments.update_lower_bound(x, 0, decision()));
        assert_eq!(Ok(false), assignments.update_upper_bound(x, 5, decision()));
        assert_eq!(Ok(false), assignments.force(s, 1, decision()));
        assert_eq!(Ok(false), assignments.remove_from_envelope(s, 7, decision()));

        assert!(assignments.int_deltas(x).is_empty());
        assert!(assignments.set_deltas(s).is_empty());
    }

    #[test]
    fn removing_a_bound_is_promoted() {
        let mut assignments = Assignments::default();
        let x = assignments.new_enumerated_variable(&[1, 2, 4]);

        let _ = assignments
            .remove_value(x, 1, decision())
            .expect("non-empty domain");
        assert_eq!(2, assignments.lower_bound(x));
        assert_eq!(
            IntDomainEvent::LowerBound,
            assignments.int_deltas(x)[0].event()
        );

        let _ = assignments
            .remove_value(x, 4, decision())
            .expect("non-empty domain");
        assert_eq!(Some(2), assignments.fixed_value(x));
        assert_eq!(IntDomainEvent::Assign, assignments.int_deltas(x)[1].event());

        assert!(assignments.remove_value(x, 2, decision()).is_err());
        assert_eq!(Some(2), assignments.fixed_value(x));
    }

    #[test]
    fn bounded_domains_ignore_interior_removals() {
        let mut assignments = Assignments::default();
        let x = assignments.new_bounded_variable(1, 10);

        assert_eq!(Ok(false), assignments.remove_value(x, 5, decision()));
        assert_eq!(Ok(false), assignments.remove_interval(x, 3, 6, decision()));
        assert_eq!(10, assignments.domain_size(x));

        assert_eq!(Ok(true), assignments.remove_interval(x, -4, 3, decision()));
        assert_eq!(4, assignments.lower_bound(x));
    }

    #[test]
    fn bounds_snap_to_present_values() {
        let mut assignments = Assignments::default();
        let x = assignments.new_enumerated_variable(&[1, 4, 6, 9]);

        let _ = assignments
            .update_bounds(x, 2, 8, decision())
            .expect("non-empty domain");

        assert_eq!((4, 6), (assignments.lower_bound(x), assignments.upper_bound(x)));
        assert_eq!(2, assignments.domain_size(x));
        assert_eq!(1, assignments.int_deltas(x).len());
        assert_eq!(
            vec![(1, 3), (7, 9)],
            assignments.int_deltas(x)[0]
                .removed_ranges()
                .collect::<Vec<_>>()
        );

        assert!(assignments.update_bounds(x, 5, 5, decision()).is_err());
        assert_eq!((4, 6), (assignments.lower_bound(x), assignments.upper_bound(x)));
    }

    #[test]
    fn interior_intervals_are_removed_value_by_value() {
        let mut assignments = Assignments::default();
        let x = assignments.new_enumerated_variable(&[1, 2, 3, 5, 8]);

        assert_eq!(Ok(true), assignments.remove_interval(x, 2, 6, decision()));

        assert_eq!(vec![1, 8], assignments.iterate_values(x).collect::<Vec<_>>());
        assert_eq!(3, assignments.int_deltas(x).len());
        assert!(assignments.remove_interval(x, 0, 10, decision()).is_err());
    }

    #[test]
    fn set_instantiation_is_all_or_nothing() {
        let mut assignments = Assignments::default();
        let s = assignments.new_set_variable(&[1], &[1, 2, 3, 4]);

        assert!(assignments.instantiate_set_to(s, &[2, 5], decision()).is_err());
        assert!(assignments.instantiate_set_to(s, &[2, 3], decision()).is_err());
        assert!(assignments.set_deltas(s).is_empty());

        assert_eq!(
            Ok(true),
            assignments.instantiate_set_to(s, &[3, 1, 3], decision())
        );
        assert!(assignments.is_set_fixed(s));
        assert_eq!(vec![1, 3], assignments.kernel(s).iter().collect::<Vec<_>>());
        assert_eq!(3, assignments.set_deltas(s).len());
    }

    #[test]
    fn the_cause_is_not_notified_but_logged() {
        let mut assignments = Assignments::default();
        let x = assignments.new_bounded_variable(0, 10);
        assignments.attach(PropagatorId(0), x.into(), DomainEvents::BOUNDS, LocalId::from(0));
        assignments.attach(PropagatorId(1), x.into(), DomainEvents::BOUNDS, LocalId::from(3));
        assignments.attach(PropagatorId(2), x.into(), DomainEvents::ASSIGN, LocalId::from(1));

        let _ = assignments
            .update_lower_bound(x, 3, propagator(0))
            .expect("non-empty domain");

        assert_eq!(
            Some(PropagatorEvent {
                propagator: PropagatorId(1),
                local_id: LocalId::from(3),
                events: DomainEvents::LOWER_BOUND,
            }),
            assignments.notifications.pop_propagator_event()
        );
        assert_eq!(None, assignments.notifications.pop_propagator_event());
        assert_eq!(
            Cause::Propagator(PropagatorId(0)),
            assignments.int_deltas(x)[0].cause()
        );
    }

    #[test]
    fn fixing_through_a_bound_notifies_assign_watchers() {
        let mut assignments = Assignments::default();
        let x = assignments.new_bounded_variable(0, 1);
        assignments.attach(PropagatorId(0), x.into(), DomainEvents::ASSIGN, LocalId::from(0));

        let _ = assignments
            .update_upper_bound(x, 0, decision())
            .expect("non-empty domain");

        let event = assignments
            .notifications
            .pop_propagator_event()
            .expect("the watcher is notified");
        assert_eq!(enum_set!(IntDomainEvent::Assign), event.events.int_events());
    }

    #[test]
    fn detaching_keeps_the_other_back_links_valid() {
        let mut assignments = Assignments::default();
        let x = assignments.new_bounded_variable(0, 10);
        let y = assignments.new_bounded_variable(0, 10);
        for propagator in 0..3 {
            assignments.attach(
                PropagatorId(propagator),
                x.into(),
                DomainEvents::ANY_INT,
                LocalId::from(0),
            );
            assignments.attach(
                PropagatorId(propagator),
                y.into(),
                DomainEvents::ANY_INT,
                LocalId::from(1),
            );
        }

        assignments.detach(PropagatorId(0));
        assignments.detach(PropagatorId(2));

        assert_eq!(1, assignments.num_watchers(x.into()));
        assert_eq!(1, assignments.num_watchers(y.into()));

        let _ = assignments
            .update_lower_bound(y, 2, decision())
            .expect("non-empty domain");
        let event = assignments
            .notifications
            .pop_propagator_event()
            .expect("the remaining propagator is notified");
        assert_eq!(PropagatorId(1), event.propagator);
        assert_eq!(LocalId::from(1), event.local_id);
    }

    #[test]
    fn detaching_a_propagator_which_watches_a_variable_twice() {
        let mut assignments = Assignments::default();
        let x = assignments.new_bounded_variable(0, 10);
        assignments.attach(PropagatorId(0), x.into(), DomainEvents::BOUNDS, LocalId::from(0));
        assignments.attach(PropagatorId(1), x.into(), DomainEvents::BOUNDS, LocalId::from(0));
        assignments.attach(PropagatorId(0), x.into(), DomainEvents::ASSIGN, LocalId::from(1));

        assignments.detach(PropagatorId(0));

        assert_eq!(1, assignments.num_watchers(x.into()));
        let _ = assignments
            .update_upper_bound(x, 4, decision())
            .expect("non-empty domain");
        let event = assignments
            .notifications
            .pop_propagator_event()
            .expect("the remaining propagator is notified");
        assert_eq!(PropagatorId(1), event.propagator);
        assert!(assignments.notifications.pop_propagator_event().is_none());
    }

    #[test]
    fn predicates_are_evaluated_against_the_domain() {
        let mut assignments = Assignments::default();
        let x = assignments.new_enumerated_variable(&[1, 3, 5]);

        assert_eq!(Some(true), assignments.evaluate_predicate(predicate!(x >= 1)));
        assert_eq!(Some(false), assignments.evaluate_predicate(predicate!(x >= 6)));
        assert_eq!(None, assignments.evaluate_predicate(predicate!(x <= 3)));
        assert_eq!(Some(true), assignments.evaluate_predicate(predicate!(x != 2)));
        assert_eq!(Some(false), assignments.evaluate_predicate(predicate!(x == 4)));
    }

    #[test]
    fn domains_only_shrink_and_stay_consistent() {
        let mut assignments = Assignments::default();
        let x = assignments.new_enumerated_variable(&(0..40).collect::<Vec<_>>());

        let mut size = assignments.domain_size(x);
        for step in 0..60 {
            let value = (step * 7) % 43;
            let result = match step % 4 {
                0 => assignments.remove_value(x, value, decision()),
                1 => assignments.update_lower_bound(x, value / 4, decision()),
                2 => assignments.update_upper_bound(x, 40 - value / 4, decision()),
                _ => assignments.remove_interval(x, value, value + 2, decision()),
            };

            match result {
                Ok(true) => assert!(assignments.domain_size(x) < size),
                Ok(false) => assert_eq!(size, assignments.domain_size(x)),
                Err(_) => assert_eq!(size, assignments.domain_size(x)),
            }
            size = assignments.domain_size(x);
            assert!(assignments.lower_bound(x) <= assignments.upper_bound(x));
            assert_eq!(
                size,
                assignments.iterate_values(x).count(),
                "the cached size agrees with the values"
            );
        }
    }
}

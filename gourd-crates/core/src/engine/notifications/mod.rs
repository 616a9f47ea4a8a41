//! The queues of notifications which changes produce for propagators and passive monitors.
use std::collections::VecDeque;

use crate::engine::events::DomainEvents;
use crate::engine::variables::VariableRef;
use crate::monitors::MonitorId;
use crate::propagation::LocalId;
use crate::propagation::PropagatorId;

/// A change a propagator subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PropagatorEvent {
    pub(crate) propagator: PropagatorId,
    pub(crate) local_id: LocalId,
    pub(crate) events: DomainEvents,
}

/// A change of a variable a passive monitor is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonitorEvent {
    pub(crate) monitor: MonitorId,
    pub(crate) variable: VariableRef,
    pub(crate) events: DomainEvents,
}

/// Notifications in the order in which the changes happened.
///
/// Monitor notifications are drained right after the mutation which produced them, propagator
/// notifications by the fixpoint loop of the [`State`](crate::State).
#[derive(Debug, Clone, Default)]
pub(crate) struct NotificationQueue {
    propagator_events: VecDeque<PropagatorEvent>,
    monitor_events: VecDeque<MonitorEvent>,
}

impl NotificationQueue {
    pub(crate) fn push_propagator_event(&mut self, event: PropagatorEvent) {
        self.propagator_events.push_back(event);
    }

    pub(crate) fn pop_propagator_event(&mut self) -> Option<PropagatorEvent> {
        self.propagator_events.pop_front()
    }

    pub(crate) fn push_monitor_event(&mut self, event: MonitorEvent) {
        self.monitor_events.push_back(event);
    }

    pub(crate) fn pop_monitor_event(&mut self) -> Option<MonitorEvent> {
        self.monitor_events.pop_front()
    }

    pub(crate) fn clear_monitor_events(&mut self) {
        self.monitor_events.clear();
    }

    pub(crate) fn clear(&mut self) {
        self.propagator_events.clear();
        self.monitor_events.clear();
    }
}

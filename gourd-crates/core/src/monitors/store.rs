use log::trace;

use super::MonitorId;
use super::VariableMonitor;
use crate::containers::KeyedVec;
use crate::engine::events::DomainEvents;
use crate::engine::variables::VariableRef;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::propagation::MonitorContext;

/// Owns the passive monitors and runs them on the pending monitor notifications.
#[derive(Debug, Default)]
pub(crate) struct MonitorStore {
    monitors: KeyedVec<MonitorId, Box<dyn VariableMonitor>>,
    num_calls: usize,
}

impl MonitorStore {
    pub(crate) fn add(&mut self, monitor: Box<dyn VariableMonitor>) -> MonitorId {
        self.monitors.push(monitor)
    }

    pub(crate) fn num_monitors(&self) -> usize {
        self.monitors.len()
    }

    pub(crate) fn num_calls(&self) -> usize {
        self.num_calls
    }

    /// Run `monitor` as if `events` happened on `variable`, then drain the notifications its
    /// changes produced.
    pub(crate) fn trigger(
        &mut self,
        monitor: MonitorId,
        variable: VariableRef,
        events: DomainEvents,
        assignments: &mut Assignments,
    ) -> Result<(), EmptyDomain> {
        self.num_calls += 1;
        let context = MonitorContext::new(assignments, monitor);
        if let Err(empty_domain) = self.monitors[monitor].on_update(context, variable, events) {
            assignments.notifications.clear_monitor_events();
            return Err(empty_domain);
        }

        self.process_pending(assignments)
    }

    /// Run monitors until no monitor notification is pending, including the ones produced by
    /// the monitors themselves.
    ///
    /// When a monitor fails, the remaining monitor notifications are dropped; the failure leads
    /// to a backtrack which makes them meaningless.
    pub(crate) fn process_pending(
        &mut self,
        assignments: &mut Assignments,
    ) -> Result<(), EmptyDomain> {
        while let Some(event) = assignments.notifications.pop_monitor_event() {
            self.num_calls += 1;
            let monitor = &mut self.monitors[event.monitor];
            trace!(
                "{} ({}) on {} {:?}",
                monitor.name(),
                event.monitor,
                event.variable,
                event.events
            );

            let context = MonitorContext::new(assignments, event.monitor);
            if let Err(empty_domain) = monitor.on_update(context, event.variable, event.events) {
                assignments.notifications.clear_monitor_events();
                return Err(empty_domain);
            }
        }

        Ok(())
    }
}

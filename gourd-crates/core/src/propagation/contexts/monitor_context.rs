use super::ApplyMutation;
use crate::engine::predicates::Justification;
use crate::engine::Assignments;
use crate::engine::Cause;
use crate::engine::EmptyDomain;
use crate::engine::Reason;
use crate::engine::trailed::TrailedValues;
use crate::monitors::MonitorId;
use crate::propagation::HasAssignments;
use crate::propagation::ManipulateTrailedValues;
#[cfg(doc)]
use crate::monitors::VariableMonitor;

/// Provided to a [`VariableMonitor`] when a variable it is attached to changed.
///
/// Changes made through it are attributed to the monitor, so the monitor is not called again for
/// its own changes. Other monitors are run by the store once the current monitor returns.
#[derive(Debug)]
pub struct MonitorContext<'a> {
    pub(crate) assignments: &'a mut Assignments,
    monitor: MonitorId,
}

impl<'a> MonitorContext<'a> {
    pub(crate) fn new(assignments: &'a mut Assignments, monitor: MonitorId) -> Self {
        MonitorContext {
            assignments,
            monitor,
        }
    }

    pub fn monitor_id(&self) -> MonitorId {
        self.monitor
    }

    pub fn reborrow(&mut self) -> MonitorContext<'_> {
        MonitorContext {
            assignments: self.assignments,
            monitor: self.monitor,
        }
    }
}

impl HasAssignments for MonitorContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

impl ManipulateTrailedValues for MonitorContext<'_> {
    fn trailed_values_mut(&mut self) -> &mut TrailedValues {
        &mut self.assignments.trailed_values
    }
}

impl ApplyMutation for MonitorContext<'_> {
    fn apply_mutation(
        &mut self,
        justification: Option<Justification>,
        mutation: impl FnOnce(&mut Assignments, Reason) -> Result<bool, EmptyDomain>,
    ) -> Result<bool, EmptyDomain> {
        let reason = Reason {
            cause: Cause::Monitor(self.monitor),
            justification,
        };
        mutation(&mut *self.assignments, reason)
    }
}

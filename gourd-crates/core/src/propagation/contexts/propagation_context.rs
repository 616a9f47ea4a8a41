use super::ApplyMutation;
use crate::engine::predicates::Justification;
use crate::engine::Assignments;
use crate::engine::Cause;
use crate::engine::EmptyDomain;
use crate::engine::Reason;
use crate::engine::trailed::TrailedValues;
use crate::monitors::MonitorStore;
use crate::propagation::Domains;
use crate::propagation::HasAssignments;
use crate::propagation::ManipulateTrailedValues;
#[cfg(doc)]
use crate::propagation::MutateDomains;
#[cfg(doc)]
use crate::propagation::Propagator;
#[cfg(doc)]
use crate::propagation::ReadDomains;

/// Provided to a [`Propagator`] when it is notified or asked to propagate.
///
/// Domains are read through [`ReadDomains`] and changed through [`MutateDomains`]; every change is
/// attributed to the propagator. The passive monitors of a variable run before the mutation
/// method returns, so the propagator always observes a state in which they are consistent.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    pub(crate) assignments: &'a mut Assignments,
    pub(crate) monitors: &'a mut MonitorStore,
    cause: Cause,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        assignments: &'a mut Assignments,
        monitors: &'a mut MonitorStore,
        cause: Cause,
    ) -> Self {
        PropagationContext {
            assignments,
            monitors,
            cause,
        }
    }

    /// Who the changes made through this context are attributed to.
    pub fn cause(&self) -> Cause {
        self.cause
    }

    /// Get the current domain information.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments)
    }

    /// Reborrow the current context to a new value with a shorter lifetime. Should be used when
    /// passing `Self` to another function that takes ownership, but the value is still needed
    /// afterwards.
    pub fn reborrow(&mut self) -> PropagationContext<'_> {
        PropagationContext {
            assignments: self.assignments,
            monitors: self.monitors,
            cause: self.cause,
        }
    }
}

impl HasAssignments for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

impl ManipulateTrailedValues for PropagationContext<'_> {
    fn trailed_values_mut(&mut self) -> &mut TrailedValues {
        &mut self.assignments.trailed_values
    }
}

impl ApplyMutation for PropagationContext<'_> {
    fn apply_mutation(
        &mut self,
        justification: Option<Justification>,
        mutation: impl FnOnce(&mut Assignments, Reason) -> Result<bool, EmptyDomain>,
    ) -> Result<bool, EmptyDomain> {
        let reason = Reason {
            cause: self.cause,
            justification,
        };
        let changed = mutation(&mut *self.assignments, reason)?;
        if changed {
            self.monitors.process_pending(self.assignments)?;
        }
        Ok(changed)
    }
}

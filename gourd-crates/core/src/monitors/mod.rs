//! Passive monitors: observers which run synchronously right after every change to a variable
//! they are attached to.
//!
//! Unlike a [`Propagator`](crate::propagation::Propagator), a monitor is never queued and has no
//! notion of priority or entailment. It is used to keep structures such as the
//! [`Task`](crate::composites::Task) consistent at all times, not only at fixpoint.
mod store;

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

pub(crate) use store::MonitorStore;

use crate::containers::StorageKey;
use crate::engine::events::DomainEvents;
use crate::engine::variables::VariableRef;
use crate::engine::EmptyDomain;
use crate::propagation::MonitorContext;

/// Identifies a passive monitor within the [`State`](crate::State).
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct MonitorId(pub(crate) u32);

impl Display for MonitorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MonitorId({})", self.0)
    }
}

impl StorageKey for MonitorId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        MonitorId(index as u32)
    }
}

pub trait VariableMonitor: Debug {
    fn name(&self) -> &str;

    /// Called after every change to `variable` which was not caused by this monitor, with the
    /// events the change satisfies.
    ///
    /// Changes made through the context are attributed to the monitor. They notify propagators
    /// and the other monitors as usual; the latter run after this call returns.
    fn on_update(
        &mut self,
        context: MonitorContext,
        variable: VariableRef,
        events: DomainEvents,
    ) -> Result<(), EmptyDomain>;
}

use std::fmt::Display;
use std::fmt::Formatter;

use crate::engine::predicates::Justification;
use crate::monitors::MonitorId;
use crate::propagation::PropagatorId;

/// Who requested a domain change.
///
/// The cause is stored in the delta record of the change and is excluded from the notifications
/// the change triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cause {
    /// A search decision posted through the [`State`](crate::State).
    Decision,
    Propagator(PropagatorId),
    Monitor(MonitorId),
}

impl Display for Cause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Cause::Decision => write!(f, "decision"),
            Cause::Propagator(propagator_id) => propagator_id.fmt(f),
            Cause::Monitor(monitor_id) => monitor_id.fmt(f),
        }
    }
}

/// The cause of a change together with the predicates which justify it, if known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reason {
    pub cause: Cause,
    pub justification: Option<Justification>,
}

impl Reason {
    pub fn new(cause: Cause, justification: impl Into<Justification>) -> Self {
        Reason {
            cause,
            justification: Some(justification.into()),
        }
    }
}

impl From<Cause> for Reason {
    fn from(cause: Cause) -> Self {
        Reason {
            cause,
            justification: None,
        }
    }
}

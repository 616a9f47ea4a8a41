use enumset::EnumSet;
use enumset::EnumSetType;

use crate::engine::delta::DeltaLog;
use crate::engine::delta::IntDelta;
use crate::engine::delta::SetDelta;
use crate::engine::domains::IntDomain;
use crate::engine::domains::SetDomain;
use crate::engine::events::IntDomainEvent;
use crate::engine::events::SetDomainEvent;
use crate::engine::trailed::TrailedValues;
use crate::engine::variables::VariableRef;
use crate::monitors::MonitorId;
use crate::propagation::LocalId;
use crate::propagation::PropagatorId;

/// A domain together with its bookkeeping: the delta log, the attached propagators and the
/// attached passive monitors.
#[derive(Debug, Clone)]
pub(crate) struct Variable<Domain, Event: EnumSetType, Record> {
    pub(crate) domain: Domain,
    pub(crate) log: DeltaLog<Record>,
    /// In order of attachment, except that detaching moves the last watcher into the freed slot.
    pub(crate) watchers: Vec<Watcher<Event>>,
    pub(crate) monitors: Vec<MonitorId>,
}

pub(crate) type IntVariable = Variable<IntDomain, IntDomainEvent, IntDelta>;
pub(crate) type SetVariable = Variable<SetDomain, SetDomainEvent, SetDelta>;

impl<Domain, Event: EnumSetType, Record: Copy> Variable<Domain, Event, Record> {
    pub(crate) fn new(domain: Domain, trailed_values: &mut TrailedValues) -> Self {
        Variable {
            domain,
            log: DeltaLog::new(trailed_values),
            watchers: Vec::new(),
            monitors: Vec::new(),
        }
    }
}

/// A propagator attached to a variable.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Watcher<Event: EnumSetType> {
    pub(crate) propagator: PropagatorId,
    pub(crate) local_id: LocalId,
    pub(crate) events: EnumSet<Event>,
    /// The index of the matching [`Attachment`] in the attachments of the propagator.
    pub(crate) attachment: usize,
}

/// The back-link from a propagator to one of its watchers, so that the watcher can be unlinked in
/// constant time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Attachment {
    pub(crate) variable: VariableRef,
    pub(crate) position: usize,
}

use std::fmt::Debug;

use enumset::EnumSet;
use enumset::EnumSetType;

use super::IntDelta;
use super::SetDelta;
use crate::engine::events::IntDomainEvent;
use crate::engine::events::SetDomainEvent;
use crate::engine::trailed::TrailedInteger;
use crate::engine::variables::IntVarId;
use crate::engine::variables::SetVarId;
use crate::engine::Assignments;
use crate::gourd_assert_simple;
use crate::propagation::ManipulateTrailedValues;
use crate::propagation::ReadDomains;

/// A variable kind which keeps a delta log.
pub trait LoggedVariable: Copy + Debug {
    type Event: EnumSetType + Debug;
    type Record: Copy + Debug;

    fn log_len(self, assignments: &Assignments) -> usize;

    fn record_at(self, assignments: &Assignments, index: usize) -> Self::Record;

    fn events_of(record: &Self::Record) -> EnumSet<Self::Event>;
}

impl LoggedVariable for IntVarId {
    type Event = IntDomainEvent;
    type Record = IntDelta;

    fn log_len(self, assignments: &Assignments) -> usize {
        assignments.int_deltas(self).len()
    }

    fn record_at(self, assignments: &Assignments, index: usize) -> IntDelta {
        assignments.int_deltas(self)[index]
    }

    fn events_of(record: &IntDelta) -> EnumSet<IntDomainEvent> {
        record.changes()
    }
}

impl LoggedVariable for SetVarId {
    type Event = SetDomainEvent;
    type Record = SetDelta;

    fn log_len(self, assignments: &Assignments) -> usize {
        assignments.set_deltas(self).len()
    }

    fn record_at(self, assignments: &Assignments, index: usize) -> SetDelta {
        assignments.set_deltas(self)[index]
    }

    fn events_of(record: &SetDelta) -> EnumSet<SetDomainEvent> {
        record.changes()
    }
}

pub type IntDeltaMonitor = DeltaMonitor<IntVarId>;
pub type SetDeltaMonitor = DeltaMonitor<SetVarId>;

/// A cursor into the delta log of one variable, owned by a propagator.
///
/// The monitor remembers how many records it has consumed in a trailed integer. A round of
/// consumption is [`DeltaMonitor::freeze`], then any number of [`DeltaMonitor::for_each`] calls
/// over the records appended since the last round, then [`DeltaMonitor::unfreeze`] which marks
/// them as consumed. [`DeltaMonitor::replay`] performs the three steps and only unfreezes when
/// every action succeeded; after a failure the records stay unconsumed, and the backtrack which
/// follows the failure rolls the log and the cursor back together.
///
/// Records appended while the monitor is frozen, including the ones appended by the actions
/// themselves, are delivered in the next round. Each record is therefore delivered exactly once,
/// independently of any other monitor on the same variable.
#[derive(Debug, Clone, Copy)]
pub struct DeltaMonitor<Var> {
    variable: Var,
    consumed: TrailedInteger,
    frozen: Option<usize>,
}

impl<Var: LoggedVariable> DeltaMonitor<Var> {
    /// Create a monitor which starts consuming at the current end of the log.
    pub(crate) fn new(variable: Var, assignments: &mut Assignments) -> Self {
        let start = variable.log_len(assignments);
        DeltaMonitor {
            variable,
            consumed: assignments.trailed_values.grow(start as i64),
            frozen: None,
        }
    }

    pub fn variable(&self) -> Var {
        self.variable
    }

    /// The position in the log from which the next round starts.
    fn start(&self, context: &impl ReadDomains) -> usize {
        (context.read(self.consumed) as usize).min(self.variable.log_len(context.assignments()))
    }

    /// Whether records were appended since the last round.
    pub fn has_pending(&self, context: &impl ReadDomains) -> bool {
        self.start(context) < self.variable.log_len(context.assignments())
    }

    /// Snapshot the current length of the log; the records before it are the ones
    /// [`DeltaMonitor::for_each`] delivers.
    pub fn freeze(&mut self, context: &impl ReadDomains) {
        self.frozen = Some(self.variable.log_len(context.assignments()));
    }

    /// Call `action` on every unconsumed record before the snapshot which satisfies at least one
    /// of `events`, stopping at the first error.
    ///
    /// # Panics
    /// If the monitor is not frozen.
    pub fn for_each<Context, Error>(
        &self,
        context: &mut Context,
        events: EnumSet<Var::Event>,
        mut action: impl FnMut(&mut Context, Var::Record) -> Result<(), Error>,
    ) -> Result<(), Error>
    where
        Context: ReadDomains,
    {
        gourd_assert_simple!(
            self.frozen.is_some(),
            "a delta monitor has to be frozen before replaying"
        );
        let end = self
            .frozen
            .unwrap_or_default()
            .min(self.variable.log_len(context.assignments()));
        let start = self.start(&*context).min(end);

        for index in start..end {
            let record = self.variable.record_at(context.assignments(), index);
            if !Var::events_of(&record).is_disjoint(events) {
                action(context, record)?;
            }
        }

        Ok(())
    }

    /// Mark every record before the snapshot as consumed.
    pub fn unfreeze(&mut self, context: &mut impl ManipulateTrailedValues) {
        if let Some(frozen) = self.frozen.take() {
            context.assign(self.consumed, frozen as i64);
        }
    }

    /// Deliver the records appended since the last round and consume them if every action
    /// succeeded.
    pub fn replay<Context, Error>(
        &mut self,
        context: &mut Context,
        events: EnumSet<Var::Event>,
        action: impl FnMut(&mut Context, Var::Record) -> Result<(), Error>,
    ) -> Result<(), Error>
    where
        Context: ReadDomains + ManipulateTrailedValues,
    {
        self.freeze(&*context);
        let result = self.for_each(context, events, action);
        if result.is_ok() {
            self.unfreeze(context);
        } else {
            self.frozen = None;
        }
        result
    }

    /// Consume everything in the log without delivering it, e.g. after a propagator recomputed
    /// its state from scratch.
    pub fn skip_pending(&mut self, context: &mut (impl ReadDomains + ManipulateTrailedValues)) {
        let len = self.variable.log_len(context.assignments());
        context.assign(self.consumed, len as i64);
        self.frozen = None;
    }
}

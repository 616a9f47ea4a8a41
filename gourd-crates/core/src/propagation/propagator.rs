use std::fmt::Debug;

use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

use super::Domains;
use super::LocalId;
use super::PropagationContext;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::engine::events::DomainEvents;
#[cfg(doc)]
use crate::engine::DeltaMonitor;
#[cfg(doc)]
use crate::propagation::PropagatorConstructor;
#[cfg(doc)]
use crate::create_statistics_struct;
use crate::statistics::StatisticLogger;

// We need to use this to cast from `Box<dyn Propagator>` to a concrete propagator, e.g. to
// inspect its state in tests.
impl_downcast!(Propagator);

/// All propagators implement the [`Propagator`] trait, which defines the main propagator logic
/// with regards to propagation, notification and entailment.
///
/// A propagator only talks to the engine through the contexts it is handed: it reads domains
/// through [`ReadDomains`](super::ReadDomains), changes them through the mutation methods of
/// [`PropagationContext`], and keeps every piece of state which has to be restored on backtracking
/// in trailed integers or [`DeltaMonitor`]s created by its [`PropagatorConstructor`].
pub trait Propagator: Downcast + Debug {
    /// Return the name of the propagator.
    ///
    /// This is a convenience method that is used for printing.
    fn name(&self) -> &str;

    /// Performs propagation of the propagator's constraint.
    ///
    /// It is called when the propagator was enqueued, either because it was just added or because
    /// [`Propagator::notify`] returned [`EnqueueDecision::Enqueue`]. Every change made through the
    /// context is attributed to this propagator, which therefore is not notified about it; it does
    /// appear in the delta logs the propagator replays.
    fn propagate(&mut self, context: PropagationContext) -> PropagationStatus;

    /// Called when one of the variables of the propagator changed, with the [`LocalId`] it was
    /// registered with and the events which happened (restricted to the subscribed ones).
    ///
    /// This is the fine-grained entry point of the propagator: it may already filter domains
    /// based on the single change it is told about, and decides whether the coarse-grained
    /// [`Propagator::propagate`] should run as well.
    ///
    /// By default the propagator is always enqueued.
    fn notify(
        &mut self,
        _context: PropagationContext,
        _local_id: LocalId,
        _events: DomainEvents,
    ) -> Result<EnqueueDecision, Inconsistency> {
        Ok(EnqueueDecision::Enqueue)
    }

    /// Returns whether the constraint is satisfied by every assignment of the current domains
    /// ([`Entailment::True`]), by none of them ([`Entailment::False`]) or whether this cannot be
    /// decided yet.
    fn is_entailed(&self, _domains: Domains) -> Entailment {
        Entailment::Undefined
    }

    /// Returns the priority of the propagator, which determines the order in which enqueued
    /// propagators are asked to propagate.
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Logs statistics of the propagator using the provided [`StatisticLogger`].
    ///
    /// It is recommended to create a struct through the [`create_statistics_struct!`] macro!
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    /// The propagator should be enqueued.
    Enqueue,
    /// The propagator should not be enqueued.
    Skip,
}

/// The answer of [`Propagator::is_entailed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entailment {
    True,
    False,
    Undefined,
}

/// The priority of a propagator, used for determining the order in which propagators will be
/// called.
///
/// Propagators with high priority are propagated before propagators with low(er) priority. If two
/// propagators have the same priority, then the order in which they are propagated is the order
/// in which they were enqueued.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}

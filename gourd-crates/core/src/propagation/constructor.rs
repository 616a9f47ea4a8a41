use super::Domains;
use super::HasAssignments;
use super::LocalId;
use super::ManipulateTrailedValues;
use super::Propagator;
use super::PropagatorId;
use crate::engine::delta::DeltaMonitor;
use crate::engine::delta::LoggedVariable;
use crate::engine::events::DomainEvents;
use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;
use crate::engine::variables::VariableRef;
use crate::engine::Assignments;
#[cfg(doc)]
use crate::State;

/// A propagator constructor creates a fully initialized instance of a [`Propagator`].
///
/// The constructor is responsible for indicating on which events the propagator should be
/// notified. Additionally, the propagator can be initialized with values that come from the
/// current domains, and allocate the trailed integers and delta monitors it needs.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator;

    /// Create the propagator instance from `Self`.
    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl;
}

/// [`PropagatorConstructorContext`] is used when [`Propagator`]s are initialised after creation.
///
/// It represents a communication point between the [`State`] and the [`Propagator`].
/// Propagators use the [`PropagatorConstructorContext`] to register to domain changes
/// of variables and to retrieve the current bounds of variables.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    assignments: &'a mut Assignments,
    propagator_id: PropagatorId,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(assignments: &'a mut Assignments, propagator_id: PropagatorId) -> Self {
        PropagatorConstructorContext {
            assignments,
            propagator_id,
        }
    }

    /// The identifier the propagator will have once it is added.
    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Get domain information.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments)
    }

    /// Subscribes the propagator to the given [`DomainEvents`] of `variable`.
    ///
    /// The domain events determine when [`Propagator::notify`] will be called on the propagator.
    /// The [`LocalId`] is given back to [`Propagator::notify`] to identify the variable; most often
    /// it is the index of the variable in the internal array of variables of the propagator.
    pub fn register(
        &mut self,
        variable: impl Into<VariableRef>,
        domain_events: DomainEvents,
        local_id: LocalId,
    ) {
        self.assignments
            .attach(self.propagator_id, variable.into(), domain_events, local_id);
    }

    /// Create a new trailed integer, e.g. a counter which has to be restored on backtracking.
    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.assignments.trailed_values.grow(initial_value)
    }

    /// Create a delta monitor on `variable` which delivers the changes made from now on.
    pub fn delta_monitor<Var: LoggedVariable>(&mut self, variable: Var) -> DeltaMonitor<Var> {
        DeltaMonitor::new(variable, self.assignments)
    }
}

impl HasAssignments for PropagatorConstructorContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

impl ManipulateTrailedValues for PropagatorConstructorContext<'_> {
    fn trailed_values_mut(&mut self) -> &mut TrailedValues {
        &mut self.assignments.trailed_values
    }
}

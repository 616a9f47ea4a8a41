use crate::engine::delta::IntDelta;
use crate::engine::delta::SetDelta;
use crate::engine::domains::RangeIterator;
use crate::engine::domains::SetView;
use crate::engine::domains::ValueIterator;
use crate::engine::predicates::Predicate;
use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;
use crate::engine::variables::IntVarId;
use crate::engine::variables::SetVarId;
use crate::engine::Assignments;

/// Gives read access to the [`Assignments`].
pub trait HasAssignments {
    fn assignments(&self) -> &Assignments;
}

/// Gives write access to the trailed integers of the engine.
pub trait ManipulateTrailedValues {
    fn trailed_values_mut(&mut self) -> &mut TrailedValues;

    fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.trailed_values_mut().assign(trailed_integer, value);
    }

    fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.trailed_values_mut().add_assign(trailed_integer, addition);
    }
}

/// Queries on the current domains which every context implements.
pub trait ReadDomains: HasAssignments {
    fn lower_bound(&self, variable: IntVarId) -> i32 {
        self.assignments().lower_bound(variable)
    }

    fn upper_bound(&self, variable: IntVarId) -> i32 {
        self.assignments().upper_bound(variable)
    }

    fn domain_size(&self, variable: IntVarId) -> usize {
        self.assignments().domain_size(variable)
    }

    fn contains(&self, variable: IntVarId, value: i32) -> bool {
        self.assignments().contains(variable, value)
    }

    fn is_fixed(&self, variable: IntVarId) -> bool {
        self.assignments().is_fixed(variable)
    }

    /// The value of the variable if it is fixed.
    fn fixed_value(&self, variable: IntVarId) -> Option<i32> {
        self.assignments().fixed_value(variable)
    }

    fn is_enumerated(&self, variable: IntVarId) -> bool {
        self.assignments().is_enumerated(variable)
    }

    fn next_value(&self, variable: IntVarId, value: i32) -> Option<i32> {
        self.assignments().next_value(variable, value)
    }

    fn previous_value(&self, variable: IntVarId, value: i32) -> Option<i32> {
        self.assignments().previous_value(variable, value)
    }

    fn iterate_values(&self, variable: IntVarId) -> ValueIterator<'_> {
        self.assignments().iterate_values(variable)
    }

    fn iterate_values_rev(&self, variable: IntVarId) -> ValueIterator<'_> {
        self.assignments().iterate_values_rev(variable)
    }

    fn iterate_ranges(&self, variable: IntVarId) -> RangeIterator<'_> {
        self.assignments().iterate_ranges(variable)
    }

    fn iterate_ranges_rev(&self, variable: IntVarId) -> RangeIterator<'_> {
        self.assignments().iterate_ranges_rev(variable)
    }

    fn kernel(&self, variable: SetVarId) -> SetView<'_> {
        self.assignments().kernel(variable)
    }

    fn envelope(&self, variable: SetVarId) -> SetView<'_> {
        self.assignments().envelope(variable)
    }

    fn kernel_size(&self, variable: SetVarId) -> usize {
        self.assignments().kernel_size(variable)
    }

    fn envelope_size(&self, variable: SetVarId) -> usize {
        self.assignments().envelope_size(variable)
    }

    fn is_set_fixed(&self, variable: SetVarId) -> bool {
        self.assignments().is_set_fixed(variable)
    }

    /// `Some(true)` if the predicate holds in every assignment of the current domain, `Some(false)`
    /// if it holds in none and `None` otherwise.
    fn evaluate_predicate(&self, predicate: Predicate) -> Option<bool> {
        self.assignments().evaluate_predicate(predicate)
    }

    fn int_deltas(&self, variable: IntVarId) -> &[IntDelta] {
        self.assignments().int_deltas(variable)
    }

    fn set_deltas(&self, variable: SetVarId) -> &[SetDelta] {
        self.assignments().set_deltas(variable)
    }

    fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.assignments().trailed_values.read(trailed_integer)
    }
}

impl<T: HasAssignments> ReadDomains for T {}

/// A read-only view on the domains.
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    pub(crate) assignments: &'a Assignments,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(assignments: &'a Assignments) -> Self {
        Domains { assignments }
    }
}

impl HasAssignments for Domains<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

mod monitor_context;
mod propagation_context;

pub use monitor_context::*;
pub use propagation_context::*;

use crate::engine::predicates::Justification;
use crate::engine::variables::IntVarId;
use crate::engine::variables::SetVarId;
use crate::engine::EmptyDomain;
use crate::propagation::ReadDomains;

mod sealed {
    use crate::engine::predicates::Justification;
    use crate::engine::Assignments;
    use crate::engine::EmptyDomain;
    use crate::engine::Reason;

    /// Applies a mutation of the [`Assignments`] on behalf of the owner of the context.
    ///
    /// Only the contexts of this crate implement it, which keeps the set of causes closed.
    #[allow(unreachable_pub, reason = "the trait seals `MutateDomains`")]
    pub trait ApplyMutation {
        fn apply_mutation(
            &mut self,
            justification: Option<Justification>,
            mutation: impl FnOnce(&mut Assignments, Reason) -> Result<bool, EmptyDomain>,
        ) -> Result<bool, EmptyDomain>;
    }
}

pub(crate) use sealed::ApplyMutation;

/// The mutation API of the domains, attributed to whoever owns the context.
///
/// Every method returns whether the domain changed. A change which would empty the domain is
/// rejected with [`EmptyDomain`] before anything is written. See
/// [`Assignments`](crate::engine::Assignments) for the exact semantics of every mutation.
pub trait MutateDomains: ReadDomains + sealed::ApplyMutation {
    fn remove_value(&mut self, variable: IntVarId, value: i32) -> Result<bool, EmptyDomain> {
        self.apply_mutation(None, |assignments, reason| {
            assignments.remove_value(variable, value, reason)
        })
    }

    /// Remove every value in `[from, to]`.
    fn remove_interval(
        &mut self,
        variable: IntVarId,
        from: i32,
        to: i32,
    ) -> Result<bool, EmptyDomain> {
        self.apply_mutation(None, |assignments, reason| {
            assignments.remove_interval(variable, from, to, reason)
        })
    }

    fn update_lower_bound(&mut self, variable: IntVarId, value: i32) -> Result<bool, EmptyDomain> {
        self.apply_mutation(None, |assignments, reason| {
            assignments.update_lower_bound(variable, value, reason)
        })
    }

    fn update_upper_bound(&mut self, variable: IntVarId, value: i32) -> Result<bool, EmptyDomain> {
        self.apply_mutation(None, |assignments, reason| {
            assignments.update_upper_bound(variable, value, reason)
        })
    }

    /// Update both bounds in a single change.
    fn update_bounds(
        &mut self,
        variable: IntVarId,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Result<bool, EmptyDomain> {
        self.apply_mutation(None, |assignments, reason| {
            assignments.update_bounds(variable, lower_bound, upper_bound, reason)
        })
    }

    fn instantiate_to(&mut self, variable: IntVarId, value: i32) -> Result<bool, EmptyDomain> {
        self.apply_mutation(None, |assignments, reason| {
            assignments.instantiate_to(variable, value, reason)
        })
    }

    /// [`MutateDomains::update_lower_bound`], recording the predicates which imply the new bound
    /// in the delta record.
    fn update_lower_bound_because(
        &mut self,
        variable: IntVarId,
        value: i32,
        justification: impl Into<Justification>,
    ) -> Result<bool, EmptyDomain> {
        self.apply_mutation(Some(justification.into()), |assignments, reason| {
            assignments.update_lower_bound(variable, value, reason)
        })
    }

    /// [`MutateDomains::update_upper_bound`], recording the predicates which imply the new bound
    /// in the delta record.
    fn update_upper_bound_because(
        &mut self,
        variable: IntVarId,
        value: i32,
        justification: impl Into<Justification>,
    ) -> Result<bool, EmptyDomain> {
        self.apply_mutation(Some(justification.into()), |assignments, reason| {
            assignments.update_upper_bound(variable, value, reason)
        })
    }

    /// Add `element` to the kernel of the set variable.
    fn force(&mut self, variable: SetVarId, element: i32) -> Result<bool, EmptyDomain> {
        self.apply_mutation(None, |assignments, reason| {
            assignments.force(variable, element, reason)
        })
    }

    fn remove_from_envelope(
        &mut self,
        variable: SetVarId,
        element: i32,
    ) -> Result<bool, EmptyDomain> {
        self.apply_mutation(None, |assignments, reason| {
            assignments.remove_from_envelope(variable, element, reason)
        })
    }

    /// Fix the set variable to exactly `values`; nothing changes if this is infeasible.
    fn instantiate_set_to(
        &mut self,
        variable: SetVarId,
        values: &[i32],
    ) -> Result<bool, EmptyDomain> {
        self.apply_mutation(None, |assignments, reason| {
            assignments.instantiate_set_to(variable, values, reason)
        })
    }
}

impl<Context: ReadDomains + sealed::ApplyMutation> MutateDomains for Context {}

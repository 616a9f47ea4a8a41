use crate::basic_types::PropagationStatus;
use crate::engine::events::DomainEvents;
use crate::engine::variables::IntVarId;
use crate::engine::variables::SetVarId;
use crate::propagation::Domains;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::MutateDomains;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`IntMemberSetPropagator`].
#[derive(Clone, Copy, Debug)]
pub struct IntMemberSet {
    pub member: IntVarId,
    pub set: SetVarId,
}

impl PropagatorConstructor for IntMemberSet {
    type PropagatorImpl = IntMemberSetPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.member, DomainEvents::ANY_INT, LocalId::from(0));
        context.register(self.set, DomainEvents::REMOVE_FROM_ENVELOPE, LocalId::from(1));

        IntMemberSetPropagator {
            member: self.member,
            set: self.set,
        }
    }
}

/// Propagator for the constraint `member ∈ set`.
///
/// The values which are not in the envelope are removed from the member, and once the member is
/// fixed its value is forced into the set. On a domain without holes only the bounds are
/// tightened.
#[derive(Clone, Copy, Debug)]
pub struct IntMemberSetPropagator {
    member: IntVarId,
    set: SetVarId,
}

impl Propagator for IntMemberSetPropagator {
    fn name(&self) -> &str {
        "IntMemberSet"
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let envelope = context.envelope(self.set);
        let excluded = context
            .iterate_values(self.member)
            .filter(|&value| !envelope.contains(value))
            .collect::<Vec<_>>();
        for &value in &excluded {
            let _ = context.remove_value(self.member, value)?;
        }
        // A bounded member ignores interior removals, so values which only became its upper
        // bound during the first pass are removed from the top.
        if !context.is_enumerated(self.member) {
            for &value in excluded.iter().rev() {
                let _ = context.remove_value(self.member, value)?;
            }
        }

        if let Some(value) = context.fixed_value(self.member) {
            let _ = context.force(self.set, value)?;
        }

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let envelope = domains.envelope(self.set);
        if !domains
            .iterate_values(self.member)
            .any(|value| envelope.contains(value))
        {
            return Entailment::False;
        }

        let kernel = domains.kernel(self.set);
        if domains
            .iterate_values(self.member)
            .all(|value| kernel.contains(value))
        {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }
}

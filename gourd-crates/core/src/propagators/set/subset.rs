use crate::basic_types::PropagationStatus;
use crate::engine::delta::SetDeltaMonitor;
use crate::engine::events::DomainEvents;
use crate::engine::events::SetDomainEvent;
use crate::engine::trailed::TrailedInteger;
use crate::engine::variables::SetVarId;
use crate::propagation::Domains;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::ManipulateTrailedValues;
use crate::propagation::MutateDomains;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`SubsetPropagator`].
#[derive(Clone, Copy, Debug)]
pub struct Subset {
    pub subset: SetVarId,
    pub superset: SetVarId,
}

impl PropagatorConstructor for Subset {
    type PropagatorImpl = SubsetPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let Subset { subset, superset } = self;

        context.register(subset, DomainEvents::ADD_TO_KERNEL, LocalId::from(0));
        context.register(superset, DomainEvents::REMOVE_FROM_ENVELOPE, LocalId::from(1));

        SubsetPropagator {
            subset,
            superset,
            subset_changes: context.delta_monitor(subset),
            superset_changes: context.delta_monitor(superset),
            initialised: context.new_trailed_integer(0),
        }
    }
}

/// Propagator for the constraint `subset ⊆ superset`.
///
/// Every element forced into the subset is forced into the superset, and every element removed
/// from the envelope of the superset is removed from the envelope of the subset. Only the elements
/// which changed since the previous call are looked at.
#[derive(Clone, Debug)]
pub struct SubsetPropagator {
    subset: SetVarId,
    superset: SetVarId,
    subset_changes: SetDeltaMonitor,
    superset_changes: SetDeltaMonitor,
    initialised: TrailedInteger,
}

impl SubsetPropagator {
    fn propagate_from_scratch(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.subset_changes.skip_pending(context);
        self.superset_changes.skip_pending(context);
        context.assign(self.initialised, 1);

        let kernel = context.kernel(self.subset).iter().collect::<Vec<_>>();
        for element in kernel {
            let _ = context.force(self.superset, element)?;
        }

        let superset_envelope = context.envelope(self.superset);
        let excluded = context
            .envelope(self.subset)
            .iter()
            .filter(|&element| !superset_envelope.contains(element))
            .collect::<Vec<_>>();
        for element in excluded {
            let _ = context.remove_from_envelope(self.subset, element)?;
        }

        Ok(())
    }
}

impl Propagator for SubsetPropagator {
    fn name(&self) -> &str {
        "Subset"
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        if context.read(self.initialised) == 0 {
            self.propagate_from_scratch(&mut context)?;
        }

        let superset = self.superset;
        let subset = self.subset;
        while self.subset_changes.has_pending(&context)
            || self.superset_changes.has_pending(&context)
        {
            self.subset_changes.replay(
                &mut context,
                SetDomainEvent::AddToKernel.into(),
                |context, delta| context.force(superset, delta.element).map(|_| ()),
            )?;
            self.superset_changes.replay(
                &mut context,
                SetDomainEvent::RemoveFromEnvelope.into(),
                |context, delta| {
                    context
                        .remove_from_envelope(subset, delta.element)
                        .map(|_| ())
                },
            )?;
        }

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let superset_envelope = domains.envelope(self.superset);
        if !domains
            .kernel(self.subset)
            .is_subset_of(&superset_envelope)
        {
            Entailment::False
        } else if domains
            .envelope(self.subset)
            .is_subset_of(&domains.kernel(self.superset))
        {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }
}

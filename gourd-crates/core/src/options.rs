#[cfg(doc)]
use crate::propagation::Entailment;
#[cfg(doc)]
use crate::State;

/// The options of the [`State`].
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// What happens to a propagator which reports [`Entailment::True`] after propagating.
    pub entailment: EntailmentPolicy,
    /// The number of priority levels of the propagator queue; every
    /// [`Priority`](crate::propagation::Priority) has to be below it.
    pub num_priority_levels: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            entailment: EntailmentPolicy::default(),
            num_priority_levels: 4,
        }
    }
}

/// Whether entailed propagators are switched off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum EntailmentPolicy {
    /// Entailed propagators are neither notified nor propagated until the search backtracks above
    /// the level at which they became entailed.
    #[default]
    Deactivate,
    /// Entailment is not checked after propagation.
    Ignore,
}

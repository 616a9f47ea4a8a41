//! The substrate of the propagation engine: trailed state, domains, delta logs and the [`State`]
//! which ties them to propagators and monitors.
mod assignments;
mod cause;
pub mod delta;
pub mod domains;
mod empty_domain;
pub mod events;
pub(crate) mod notifications;
pub mod predicates;
mod propagator_queue;
mod state;
pub mod trailed;
pub mod variables;

pub use assignments::Assignments;
pub use cause::*;
pub use delta::DeltaMonitor;
pub use delta::IntDeltaMonitor;
pub use delta::SetDeltaMonitor;
pub use empty_domain::EmptyDomain;
pub(crate) use propagator_queue::PropagatorQueue;
pub use state::State;

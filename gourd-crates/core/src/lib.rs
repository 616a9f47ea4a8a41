//! # Gourd Core
//! The substrate of a constraint propagation engine: backtrackable state, integer and set
//! domains with delta logs, the propagator contract and the driver which runs propagators to a
//! fixpoint.
//!
//! Everything starts with a [`State`]. Variables are created on it, propagators are added to it
//! through a [`PropagatorConstructor`](propagation::PropagatorConstructor), and a search layer
//! posts decisions, propagates, and uses checkpoints to undo its decisions:
//!
//! ```
//! use gourd_core::predicate;
//! use gourd_core::propagation::ReadDomains;
//! use gourd_core::propagators::BinaryNotEquals;
//! use gourd_core::State;
//!
//! let mut state = State::default();
//! let x = state.new_interval_variable(1, 3).expect("valid interval");
//! let y = state.new_interval_variable(1, 3).expect("valid interval");
//! let _ = state.add_propagator(BinaryNotEquals { a: x, b: y });
//! state.propagate_to_fixed_point().expect("no conflict");
//!
//! state.new_checkpoint();
//! let _ = state.post(predicate![x == 2]).expect("2 is in the domain of x");
//! state.propagate_to_fixed_point().expect("no conflict");
//! assert!(!state.contains(y, 2));
//!
//! state.restore_to(0);
//! assert!(state.contains(y, 2));
//! ```
//!
//! Every change to a domain is recorded in the delta log of its variable, together with its
//! [`Cause`](engine::Cause). Propagators consume those logs incrementally through
//! [`DeltaMonitor`](engine::DeltaMonitor)s, and passive [`monitors`] react to changes
//! synchronously; [`composites::Task`] is built that way.
//!
//! # Assertions
//! Internal consistency checks are grouped in levels, see the `debug-checks` feature. With the
//! feature enabled the most expensive checks run after every change to a domain.
pub(crate) mod basic_types;
pub mod composites;
pub mod containers;
pub mod engine;
pub(crate) mod gourd_asserts;
pub mod monitors;
mod options;
pub mod propagation;
pub mod propagators;
pub mod statistics;

pub use basic_types::ConstraintOperationError;
pub use basic_types::Inconsistency;
pub use basic_types::PropagationStatus;
pub use basic_types::PropagatorConflict;
pub use convert_case;
pub use engine::predicates;
pub use engine::State;
pub use options::EngineOptions;
pub use options::EntailmentPolicy;

//! Contains the main building blocks for propagators.
//!
//! A propagator takes a set of variables with their domains and removes values which cannot be
//! part of any solution of its constraint. Propagators are not required to be idempotent: a
//! propagator which is not at fixpoint after propagating is called again as long as it keeps
//! changing domains it is subscribed to.
//!
//! Each concrete propagator implements [`Propagator`] and is created by a
//! [`PropagatorConstructor`], which registers to domain events and allocates the trailed state of
//! the propagator (trailed integers and [`DeltaMonitor`]s) through the
//! [`PropagatorConstructorContext`].
//!
//! During search, a propagator reads domains through [`ReadDomains`] and changes them through
//! [`MutateDomains`]; both are implemented by the [`PropagationContext`] it is handed.
//!
//! See the [`propagators`](crate::propagators) module for concrete implementations.
mod constructor;
mod contexts;
mod domains;
mod identifiers;
mod propagator;
pub(crate) mod store;

pub use constructor::*;
pub use contexts::*;
pub use domains::*;
pub use identifiers::*;
pub use propagator::*;
pub use store::PropagatorHandle;

#[cfg(doc)]
use crate::engine::delta::DeltaMonitor;

//! Contains propagator implementations which exercise the engine: integer propagators driven by
//! events and integer delta monitors, a matching based propagator whose graph state is trailed,
//! and set propagators driven by set delta monitors.
//!
//! See the [`propagation`] module for info on propagators.
#[cfg(doc)]
use crate::propagation;

mod all_different;
mod all_different_matching;
mod binary_not_equals;
pub mod set;

pub use all_different::*;
pub use all_different_matching::*;
pub use binary_not_equals::*;

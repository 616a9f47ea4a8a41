//! Structures over several variables whose invariant is kept by a passive monitor, so it holds
//! after every single change instead of only at fixpoint.
mod task;

pub use task::*;

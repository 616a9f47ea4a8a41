//! Atomic statements about integer variables, used to justify domain changes and to describe
//! conflicts.
mod justification;
mod predicate;
mod predicate_constructor;

pub use justification::*;
pub use predicate::*;
pub use predicate_constructor::*;

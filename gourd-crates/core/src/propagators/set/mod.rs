//! Propagators over set variables and between set and integer variables.
mod cardinality;
mod int_member;
mod subset;

pub use cardinality::*;
pub use int_member::*;
pub use subset::*;

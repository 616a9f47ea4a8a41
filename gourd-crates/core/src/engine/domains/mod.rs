//! The value-set representations of variables.
mod int_domain;
mod iterators;
mod set_domain;

pub(crate) use int_domain::*;
pub use iterators::*;
pub(crate) use set_domain::SetDomain;
pub use set_domain::SetView;

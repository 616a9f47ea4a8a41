mod variable;
mod variable_ids;

pub(crate) use variable::*;
pub use variable_ids::*;

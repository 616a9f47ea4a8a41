//! The reversible environment: integer cells whose writes are undone on backtracking.
mod trailed_bit_set;
mod trailed_change;
mod trailed_integer;
mod trailed_values;

pub(crate) use trailed_bit_set::*;
pub(crate) use trailed_change::*;
pub use trailed_integer::*;
pub use trailed_values::*;

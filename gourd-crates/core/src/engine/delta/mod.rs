//! The per-variable logs of accepted changes and the cursors propagators use to consume them.
mod delta_log;
mod delta_monitor;
mod int_delta;
mod set_delta;

pub(crate) use delta_log::*;
pub use delta_monitor::*;
pub use int_delta::*;
pub use set_delta::*;

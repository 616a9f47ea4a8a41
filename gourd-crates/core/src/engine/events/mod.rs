mod domain_events;
mod int_domain_event;
mod set_domain_event;

pub use domain_events::*;
pub use int_domain_event::*;
pub use set_domain_event::*;

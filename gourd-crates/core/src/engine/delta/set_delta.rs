use enumset::EnumSet;

use crate::engine::Cause;
use crate::engine::events::SetDomainEvent;

/// The record of one element entering the kernel or leaving the envelope of a set variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetDelta {
    pub element: i32,
    pub event: SetDomainEvent,
    pub cause: Cause,
}

impl SetDelta {
    pub fn changes(&self) -> EnumSet<SetDomainEvent> {
        EnumSet::only(self.event)
    }
}

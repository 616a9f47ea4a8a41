use enumset::enum_set;
use enumset::EnumSet;

use super::IntDomainEvent;
use super::SetDomainEvent;

/// A mask of events, used both to subscribe to a variable and to describe which events occurred.
///
/// There is one optional set per kind of variable; a mask for integer events does not match any
/// set event and vice versa.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DomainEvents {
    int_events: Option<EnumSet<IntDomainEvent>>,
    set_events: Option<EnumSet<SetDomainEvent>>,
}

impl DomainEvents {
    /// DomainEvents with both lower and upper bound tightening (but not other value removal).
    pub const BOUNDS: DomainEvents = DomainEvents::create_with_int_events(enum_set!(
        IntDomainEvent::LowerBound | IntDomainEvent::UpperBound
    ));
    /// DomainEvents with lower and upper bound tightening, assigning to a single value, and
    /// single value removal.
    pub const ANY_INT: DomainEvents = DomainEvents::create_with_int_events(enum_set!(
        IntDomainEvent::Assign
            | IntDomainEvent::LowerBound
            | IntDomainEvent::UpperBound
            | IntDomainEvent::Removal
    ));
    pub const REMOVAL: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(IntDomainEvent::Removal));
    /// DomainEvents with only lower bound tightening.
    pub const LOWER_BOUND: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(IntDomainEvent::LowerBound));
    /// DomainEvents with only upper bound tightening.
    pub const UPPER_BOUND: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(IntDomainEvent::UpperBound));
    /// DomainEvents with only assigning to a single value.
    pub const ASSIGN: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(IntDomainEvent::Assign));

    /// DomainEvents with every change of a set domain.
    pub const ANY_SET: DomainEvents = DomainEvents::create_with_set_events(enum_set!(
        SetDomainEvent::AddToKernel | SetDomainEvent::RemoveFromEnvelope
    ));
    pub const ADD_TO_KERNEL: DomainEvents =
        DomainEvents::create_with_set_events(enum_set!(SetDomainEvent::AddToKernel));
    pub const REMOVE_FROM_ENVELOPE: DomainEvents =
        DomainEvents::create_with_set_events(enum_set!(SetDomainEvent::RemoveFromEnvelope));
}

impl DomainEvents {
    pub const fn create_with_int_events(int_events: EnumSet<IntDomainEvent>) -> DomainEvents {
        DomainEvents {
            int_events: Some(int_events),
            set_events: None,
        }
    }

    pub const fn create_with_set_events(set_events: EnumSet<SetDomainEvent>) -> DomainEvents {
        DomainEvents {
            int_events: None,
            set_events: Some(set_events),
        }
    }

    /// The integer events of the mask; empty if the mask is about set variables.
    pub fn int_events(&self) -> EnumSet<IntDomainEvent> {
        self.int_events.unwrap_or_default()
    }

    /// The set events of the mask; empty if the mask is about integer variables.
    pub fn set_events(&self) -> EnumSet<SetDomainEvent> {
        self.set_events.unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.int_events().is_empty() && self.set_events().is_empty()
    }

    /// Whether any event is in both masks.
    pub fn intersects(&self, other: DomainEvents) -> bool {
        !self.int_events().is_disjoint(other.int_events())
            || !self.set_events().is_disjoint(other.set_events())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_of_different_kinds_never_intersect() {
        assert!(!DomainEvents::ANY_INT.intersects(DomainEvents::ANY_SET));
        assert!(DomainEvents::BOUNDS.intersects(DomainEvents::LOWER_BOUND));
        assert!(!DomainEvents::ASSIGN.intersects(DomainEvents::REMOVAL));
        assert!(DomainEvents::ANY_SET.intersects(DomainEvents::ADD_TO_KERNEL));
    }
}

use enumset::EnumSet;
use enumset::EnumSetType;

/// The kinds of changes an integer domain can undergo.
///
/// A single change may satisfy several kinds at once (removing the lower bound of `{1, 2}` raises
/// the lower bound, removes a value and fixes the variable); the log reports the strongest one
/// through [`IntDomainEvent::strongest`] and keeps the others available through
/// [`IntDelta::changes`](crate::engine::delta::IntDelta::changes).
#[derive(Debug, EnumSetType, Hash)]
pub enum IntDomainEvent {
    /// The domain became a singleton.
    Assign,
    /// The lower bound increased.
    LowerBound,
    /// The upper bound decreased.
    UpperBound,
    /// At least one value was removed.
    Removal,
}

impl IntDomainEvent {
    /// The event which is reported when all of `events` hold.
    ///
    /// # Panics
    /// If `events` is empty.
    pub fn strongest(events: EnumSet<IntDomainEvent>) -> IntDomainEvent {
        [
            IntDomainEvent::Assign,
            IntDomainEvent::LowerBound,
            IntDomainEvent::UpperBound,
            IntDomainEvent::Removal,
        ]
        .into_iter()
        .find(|event| events.contains(*event))
        .expect("a change satisfies at least one event")
    }
}

#[cfg(test)]
mod tests {
    use enumset::enum_set;

    use super::*;

    #[test]
    fn assignment_dominates_bound_changes() {
        assert_eq!(
            IntDomainEvent::Assign,
            IntDomainEvent::strongest(enum_set!(
                IntDomainEvent::LowerBound | IntDomainEvent::Assign | IntDomainEvent::Removal
            ))
        );
        assert_eq!(
            IntDomainEvent::UpperBound,
            IntDomainEvent::strongest(enum_set!(
                IntDomainEvent::UpperBound | IntDomainEvent::Removal
            ))
        );
    }
}

use enumset::EnumSet;

use crate::engine::predicates::Justification;
use crate::engine::Cause;
use crate::engine::events::IntDomainEvent;

/// The record of one accepted change to an integer domain.
///
/// A change either moves the bounds or removes a single interior value (never both). The
/// removed values are described by [`IntDelta::removed_ranges`]: for an enumerated domain a range
/// between the previous and the current bound may include holes which had already been removed
/// by earlier changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntDelta {
    event: IntDomainEvent,
    previous_bounds: (i32, i32),
    current_bounds: (i32, i32),
    removed_value: Option<i32>,
    cause: Cause,
    justification: Option<Justification>,
}

impl IntDelta {
    pub(crate) fn new(
        previous_bounds: (i32, i32),
        current_bounds: (i32, i32),
        removed_value: Option<i32>,
        cause: Cause,
        justification: Option<Justification>,
    ) -> Self {
        let mut delta = IntDelta {
            event: IntDomainEvent::Removal,
            previous_bounds,
            current_bounds,
            removed_value,
            cause,
            justification,
        };
        delta.event = IntDomainEvent::strongest(delta.changes());
        delta
    }

    /// The strongest event of the change.
    pub fn event(&self) -> IntDomainEvent {
        self.event
    }

    /// Every event the change satisfies; every change removes at least one value.
    pub fn changes(&self) -> EnumSet<IntDomainEvent> {
        let mut changes = EnumSet::only(IntDomainEvent::Removal);
        if self.current_bounds.0 > self.previous_bounds.0 {
            let _ = changes.insert(IntDomainEvent::LowerBound);
        }
        if self.current_bounds.1 < self.previous_bounds.1 {
            let _ = changes.insert(IntDomainEvent::UpperBound);
        }
        if self.current_bounds.0 == self.current_bounds.1 {
            let _ = changes.insert(IntDomainEvent::Assign);
        }
        changes
    }

    pub fn previous_bounds(&self) -> (i32, i32) {
        self.previous_bounds
    }

    pub fn current_bounds(&self) -> (i32, i32) {
        self.current_bounds
    }

    /// The interior value removed by the change, if it did not move a bound.
    pub fn removed_value(&self) -> Option<i32> {
        self.removed_value
    }

    pub fn cause(&self) -> Cause {
        self.cause
    }

    pub fn justification(&self) -> Option<Justification> {
        self.justification
    }

    /// The inclusive ranges of values which left the domain, in increasing order.
    pub fn removed_ranges(&self) -> impl Iterator<Item = (i32, i32)> {
        let (previous_lower_bound, previous_upper_bound) = self.previous_bounds;
        let (lower_bound, upper_bound) = self.current_bounds;

        let below = (lower_bound > previous_lower_bound)
            .then(|| (previous_lower_bound, lower_bound - 1));
        let hole = self.removed_value.map(|value| (value, value));
        let above = (upper_bound < previous_upper_bound)
            .then(|| (upper_bound + 1, previous_upper_bound));

        below.into_iter().chain(hole).chain(above)
    }
}

#[cfg(test)]
mod tests {
    use enumset::enum_set;

    use super::*;

    #[test]
    fn instantiation_reports_both_sides() {
        let delta = IntDelta::new((1, 10), (4, 4), None, Cause::Decision, None);

        assert_eq!(IntDomainEvent::Assign, delta.event());
        assert_eq!(
            vec![(1, 3), (5, 10)],
            delta.removed_ranges().collect::<Vec<_>>()
        );
        assert_eq!(EnumSet::all(), delta.changes());
    }

    #[test]
    fn hole_removal_is_a_plain_removal() {
        let delta = IntDelta::new((1, 10), (1, 10), Some(5), Cause::Decision, None);

        assert_eq!(IntDomainEvent::Removal, delta.event());
        assert_eq!(enum_set!(IntDomainEvent::Removal), delta.changes());
        assert_eq!(vec![(5, 5)], delta.removed_ranges().collect::<Vec<_>>());
    }

    #[test]
    fn lower_bound_change_is_promoted_over_removal() {
        let delta = IntDelta::new((1, 10), (3, 10), None, Cause::Decision, None);

        assert_eq!(IntDomainEvent::LowerBound, delta.event());
        assert_eq!(
            enum_set!(IntDomainEvent::LowerBound | IntDomainEvent::Removal),
            delta.changes()
        );
    }
}

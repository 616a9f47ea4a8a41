use crate::engine::trailed::TrailedBitSet;
use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;
use crate::gourd_assert_moderate;
use crate::gourd_assert_simple;

/// The representation of a finite-domain integer variable.
///
/// Both representations keep their bounds in trailed cells, so every query on the bounds is O(1)
/// and every change is undone on backtracking. The domain itself never checks whether a change
/// would empty it; [`Assignments`](crate::engine::Assignments) validates every mutation before
/// calling into the domain.
#[derive(Debug, Clone)]
pub(crate) enum IntDomain {
    /// A contiguous interval which cannot represent holes.
    Bounded(BoundedDomain),
    /// An explicit set of values, which supports holes.
    Enumerated(EnumeratedDomain),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct BoundedDomain {
    lower_bound: TrailedInteger,
    upper_bound: TrailedInteger,
}

#[derive(Debug, Clone)]
pub(crate) struct EnumeratedDomain {
    lower_bound: TrailedInteger,
    upper_bound: TrailedInteger,
    size: TrailedInteger,
    values: TrailedBitSet,
}

impl IntDomain {
    pub(crate) fn new_bounded(
        trailed_values: &mut TrailedValues,
        lower_bound: i32,
        upper_bound: i32,
    ) -> IntDomain {
        gourd_assert_simple!(lower_bound <= upper_bound);
        IntDomain::Bounded(BoundedDomain {
            lower_bound: trailed_values.grow(lower_bound.into()),
            upper_bound: trailed_values.grow(upper_bound.into()),
        })
    }

    /// Create an enumerated domain from a non-empty, sorted and deduplicated list of values.
    pub(crate) fn new_enumerated(trailed_values: &mut TrailedValues, values: &[i32]) -> IntDomain {
        gourd_assert_simple!(!values.is_empty());
        gourd_assert_moderate!(values.windows(2).all(|pair| pair[0] < pair[1]));

        let lower_bound = values[0];
        let upper_bound = values[values.len() - 1];
        let width = (i64::from(upper_bound) - i64::from(lower_bound) + 1) as usize;

        IntDomain::Enumerated(EnumeratedDomain {
            lower_bound: trailed_values.grow(lower_bound.into()),
            upper_bound: trailed_values.grow(upper_bound.into()),
            size: trailed_values.grow(values.len() as i64),
            values: TrailedBitSet::new(
                trailed_values,
                lower_bound,
                width,
                values.iter().copied(),
            ),
        })
    }

    pub(crate) fn is_enumerated(&self) -> bool {
        matches!(self, IntDomain::Enumerated(_))
    }

    fn bound_cells(&self) -> (TrailedInteger, TrailedInteger) {
        match self {
            IntDomain::Bounded(domain) => (domain.lower_bound, domain.upper_bound),
            IntDomain::Enumerated(domain) => (domain.lower_bound, domain.upper_bound),
        }
    }

    pub(crate) fn lower_bound(&self, trailed_values: &TrailedValues) -> i32 {
        trailed_values.read(self.bound_cells().0) as i32
    }

    pub(crate) fn upper_bound(&self, trailed_values: &TrailedValues) -> i32 {
        trailed_values.read(self.bound_cells().1) as i32
    }

    pub(crate) fn size(&self, trailed_values: &TrailedValues) -> usize {
        match self {
            IntDomain::Bounded(_) => {
                (i64::from(self.upper_bound(trailed_values))
                    - i64::from(self.lower_bound(trailed_values))
                    + 1) as usize
            }
            IntDomain::Enumerated(domain) => trailed_values.read(domain.size) as usize,
        }
    }

    pub(crate) fn contains(&self, trailed_values: &TrailedValues, value: i32) -> bool {
        let in_bounds = self.lower_bound(trailed_values) <= value
            && value <= self.upper_bound(trailed_values);
        match self {
            IntDomain::Bounded(_) => in_bounds,
            IntDomain::Enumerated(domain) => {
                in_bounds && domain.values.contains(trailed_values, value)
            }
        }
    }

    /// The smallest value in the domain which is at least `value`.
    pub(crate) fn lowest_member_from(
        &self,
        trailed_values: &TrailedValues,
        value: i32,
    ) -> Option<i32> {
        let lower_bound = self.lower_bound(trailed_values);
        let upper_bound = self.upper_bound(trailed_values);
        if value <= lower_bound {
            return Some(lower_bound);
        }
        if value > upper_bound {
            return None;
        }

        match self {
            IntDomain::Bounded(_) => Some(value),
            IntDomain::Enumerated(domain) => domain.values.next_member(trailed_values, value),
        }
    }

    /// The largest value in the domain which is at most `value`.
    pub(crate) fn highest_member_until(
        &self,
        trailed_values: &TrailedValues,
        value: i32,
    ) -> Option<i32> {
        let lower_bound = self.lower_bound(trailed_values);
        let upper_bound = self.upper_bound(trailed_values);
        if value >= upper_bound {
            return Some(upper_bound);
        }
        if value < lower_bound {
            return None;
        }

        match self {
            IntDomain::Bounded(_) => Some(value),
            IntDomain::Enumerated(domain) => domain.values.previous_member(trailed_values, value),
        }
    }

    /// The smallest value in the domain which is strictly larger than `value`.
    pub(crate) fn next_value(&self, trailed_values: &TrailedValues, value: i32) -> Option<i32> {
        value
            .checked_add(1)
            .and_then(|from| self.lowest_member_from(trailed_values, from))
    }

    /// The largest value in the domain which is strictly smaller than `value`.
    pub(crate) fn previous_value(&self, trailed_values: &TrailedValues, value: i32) -> Option<i32> {
        value
            .checked_sub(1)
            .and_then(|until| self.highest_member_until(trailed_values, until))
    }

    /// Narrow the domain to `[lower_bound, upper_bound]`.
    ///
    /// Both bounds have to be members of the current domain and `lower_bound <= upper_bound`.
    pub(crate) fn narrow_to(
        &self,
        trailed_values: &mut TrailedValues,
        lower_bound: i32,
        upper_bound: i32,
    ) {
        gourd_assert_simple!(lower_bound <= upper_bound);
        gourd_assert_moderate!(self.contains(trailed_values, lower_bound));
        gourd_assert_moderate!(self.contains(trailed_values, upper_bound));

        let old_lower_bound = self.lower_bound(trailed_values);
        let old_upper_bound = self.upper_bound(trailed_values);

        if let IntDomain::Enumerated(domain) = self {
            let mut num_removed = 0;
            if old_lower_bound < lower_bound {
                num_removed +=
                    domain
                        .values
                        .clear_range(trailed_values, old_lower_bound, lower_bound - 1);
            }
            if upper_bound < old_upper_bound {
                num_removed +=
                    domain
                        .values
                        .clear_range(trailed_values, upper_bound + 1, old_upper_bound);
            }
            trailed_values.add_assign(domain.size, -(num_removed as i64));
        }

        let (lower_bound_cell, upper_bound_cell) = self.bound_cells();
        trailed_values.assign(lower_bound_cell, lower_bound.into());
        trailed_values.assign(upper_bound_cell, upper_bound.into());
    }

    /// Remove a value strictly between the bounds of an enumerated domain.
    pub(crate) fn remove_interior(&self, trailed_values: &mut TrailedValues, value: i32) {
        gourd_assert_simple!(
            self.lower_bound(trailed_values) < value && value < self.upper_bound(trailed_values)
        );

        let IntDomain::Enumerated(domain) = self else {
            panic!("a bounded domain cannot represent holes");
        };
        if domain.values.remove(trailed_values, value) {
            trailed_values.add_assign(domain.size, -1);
        }
    }

    /// Whether the cached size agrees with the stored values; used by the expensive assertions.
    pub(crate) fn debug_is_consistent(&self, trailed_values: &TrailedValues) -> bool {
        let lower_bound = self.lower_bound(trailed_values);
        let upper_bound = self.upper_bound(trailed_values);
        match self {
            IntDomain::Bounded(_) => lower_bound <= upper_bound,
            IntDomain::Enumerated(domain) => {
                let members = domain.values.iter(trailed_values).collect::<Vec<_>>();
                lower_bound <= upper_bound
                    && members.first() == Some(&lower_bound)
                    && members.last() == Some(&upper_bound)
                    && members.len() == trailed_values.read(domain.size) as usize
            }
        }
    }
}

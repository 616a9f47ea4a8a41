use super::IntDomain;
use crate::engine::trailed::TrailedValues;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Iterates over the values of an integer domain, from the lower bound upwards or from the upper
/// bound downwards.
///
/// The iterator borrows the domain, so the domain cannot change while it is alive. Every call to
/// the iteration methods creates a fresh iterator; they do not share state.
#[derive(Debug, Clone)]
pub struct ValueIterator<'a> {
    domain: &'a IntDomain,
    trailed_values: &'a TrailedValues,
    next: Option<i32>,
    direction: Direction,
}

impl<'a> ValueIterator<'a> {
    pub(crate) fn forward(domain: &'a IntDomain, trailed_values: &'a TrailedValues) -> Self {
        ValueIterator {
            domain,
            trailed_values,
            next: Some(domain.lower_bound(trailed_values)),
            direction: Direction::Forward,
        }
    }

    pub(crate) fn backward(domain: &'a IntDomain, trailed_values: &'a TrailedValues) -> Self {
        ValueIterator {
            domain,
            trailed_values,
            next: Some(domain.upper_bound(trailed_values)),
            direction: Direction::Backward,
        }
    }
}

impl Iterator for ValueIterator<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let current = self.next?;
        self.next = match self.direction {
            Direction::Forward => self.domain.next_value(self.trailed_values, current),
            Direction::Backward => self.domain.previous_value(self.trailed_values, current),
        };
        Some(current)
    }
}

/// Iterates over the maximal intervals `(from, to)` of an integer domain.
#[derive(Debug, Clone)]
pub struct RangeIterator<'a> {
    values: ValueIterator<'a>,
}

impl<'a> RangeIterator<'a> {
    pub(crate) fn forward(domain: &'a IntDomain, trailed_values: &'a TrailedValues) -> Self {
        RangeIterator {
            values: ValueIterator::forward(domain, trailed_values),
        }
    }

    pub(crate) fn backward(domain: &'a IntDomain, trailed_values: &'a TrailedValues) -> Self {
        RangeIterator {
            values: ValueIterator::backward(domain, trailed_values),
        }
    }
}

impl Iterator for RangeIterator<'_> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        let start = self.values.next?;
        let domain = self.values.domain;
        let trailed_values = self.values.trailed_values;

        let mut end = start;
        match self.values.direction {
            Direction::Forward => {
                // Bounded domains consist of a single range.
                if !domain.is_enumerated() {
                    end = domain.upper_bound(trailed_values);
                } else {
                    while let Some(next) = domain.next_value(trailed_values, end) {
                        if next != end + 1 {
                            break;
                        }
                        end = next;
                    }
                }
                self.values.next = domain.next_value(trailed_values, end);
                Some((start, end))
            }
            Direction::Backward => {
                if !domain.is_enumerated() {
                    end = domain.lower_bound(trailed_values);
                } else {
                    while let Some(previous) = domain.previous_value(trailed_values, end) {
                        if previous != end - 1 {
                            break;
                        }
                        end = previous;
                    }
                }
                self.values.next = domain.previous_value(trailed_values, end);
                Some((end, start))
            }
        }
    }
}

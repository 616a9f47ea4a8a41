use std::fmt::Display;
use std::fmt::Formatter;

use itertools::Itertools;

use crate::engine::trailed::TrailedBitSet;
use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;
use crate::gourd_assert_moderate;

/// The domain of a set variable: the kernel holds the mandatory elements and the envelope the
/// possible ones.
///
/// Both sets live in bitsets over the universe of the initial envelope, which is also the only
/// place elements can ever come from. The kernel is always a subset of the envelope; the
/// [`Assignments`](crate::engine::Assignments) reject every change which would break this before
/// calling into the domain.
#[derive(Debug, Clone)]
pub(crate) struct SetDomain {
    kernel: TrailedBitSet,
    envelope: TrailedBitSet,
    kernel_size: TrailedInteger,
    envelope_size: TrailedInteger,
}

impl SetDomain {
    /// Create the domain from a sorted and deduplicated kernel and envelope, where the kernel is a
    /// subset of the envelope.
    pub(crate) fn new(trailed_values: &mut TrailedValues, kernel: &[i32], envelope: &[i32]) -> Self {
        gourd_assert_moderate!(kernel.iter().all(|element| envelope.contains(element)));

        let (offset, width) = match (envelope.first(), envelope.last()) {
            (Some(&first), Some(&last)) => {
                (first, (i64::from(last) - i64::from(first) + 1) as usize)
            }
            _ => (0, 0),
        };

        SetDomain {
            kernel: TrailedBitSet::new(trailed_values, offset, width, kernel.iter().copied()),
            envelope: TrailedBitSet::new(trailed_values, offset, width, envelope.iter().copied()),
            kernel_size: trailed_values.grow(kernel.len() as i64),
            envelope_size: trailed_values.grow(envelope.len() as i64),
        }
    }

    pub(crate) fn kernel<'a>(&'a self, trailed_values: &'a TrailedValues) -> SetView<'a> {
        SetView {
            bits: &self.kernel,
            size: self.kernel_size,
            trailed_values,
        }
    }

    pub(crate) fn envelope<'a>(&'a self, trailed_values: &'a TrailedValues) -> SetView<'a> {
        SetView {
            bits: &self.envelope,
            size: self.envelope_size,
            trailed_values,
        }
    }

    /// Add an element of the envelope to the kernel. Returns whether the kernel changed.
    pub(crate) fn add_to_kernel(&self, trailed_values: &mut TrailedValues, element: i32) -> bool {
        gourd_assert_moderate!(self.envelope.contains(trailed_values, element));

        let added = self.kernel.insert(trailed_values, element);
        if added {
            trailed_values.add_assign(self.kernel_size, 1);
        }
        added
    }

    /// Remove an element which is not in the kernel from the envelope. Returns whether the
    /// envelope changed.
    pub(crate) fn remove_from_envelope(
        &self,
        trailed_values: &mut TrailedValues,
        element: i32,
    ) -> bool {
        gourd_assert_moderate!(!self.kernel.contains(trailed_values, element));

        let removed = self.envelope.remove(trailed_values, element);
        if removed {
            trailed_values.add_assign(self.envelope_size, -1);
        }
        removed
    }
}

/// A read-only view on the kernel or the envelope of a set variable.
#[derive(Debug, Clone, Copy)]
pub struct SetView<'a> {
    bits: &'a TrailedBitSet,
    size: TrailedInteger,
    trailed_values: &'a TrailedValues,
}

impl<'a> SetView<'a> {
    pub fn contains(&self, element: i32) -> bool {
        self.bits.contains(self.trailed_values, element)
    }

    pub fn len(&self) -> usize {
        self.trailed_values.read(self.size) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The elements in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + 'a {
        self.bits.iter(self.trailed_values)
    }

    /// Whether every element of `self` is also in `other`.
    pub fn is_subset_of(&self, other: &SetView<'_>) -> bool {
        self.len() <= other.len() && self.iter().all(|element| other.contains(element))
    }
}

impl Display for SetView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.iter().join(", "))
    }
}

use log::trace;

use super::TrailedChange;
use super::TrailedInteger;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::gourd_assert_simple;

/// Issues [`TrailedInteger`]s and restores them when backtracking.
///
/// Every write records the previous value of the cell on a [`Trail`], tagged with the checkpoint
/// at which it was made. [`TrailedValues::synchronise`] pops these records in reverse
/// chronological order, so a cell which was overwritten several times above the target checkpoint
/// ends up with the value it had at that checkpoint.
///
/// This is the only storage which the engine, the domains, the delta logs and the propagators use
/// for state that has to survive a backtrack correctly.
#[derive(Default, Debug, Clone)]
pub struct TrailedValues {
    trail: Trail<TrailedChange>,
    values: KeyedVec<TrailedInteger, i64>,
}

impl TrailedValues {
    /// Create a new cell with the provided initial value.
    pub fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        self.values.push(initial_value)
    }

    pub fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint()
    }

    pub fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.values[trailed_integer]
    }

    /// Restore every cell to the value it had at `new_checkpoint`.
    ///
    /// Synchronising to the current checkpoint does nothing; synchronising to a checkpoint which
    /// was never reached is a programming error and panics.
    pub fn synchronise(&mut self, new_checkpoint: usize) {
        gourd_assert_simple!(
            new_checkpoint <= self.trail.get_checkpoint(),
            "cannot backtrack to checkpoint {new_checkpoint}, the current checkpoint is {}",
            self.trail.get_checkpoint()
        );
        if new_checkpoint == self.trail.get_checkpoint() {
            return;
        }

        let mut num_restored = 0_usize;
        self.trail
            .synchronise(new_checkpoint)
            .for_each(|state_change| {
                num_restored += 1;
                self.values[state_change.reference] = state_change.old_value
            });
        trace!("restored {num_restored} trailed values to checkpoint {new_checkpoint}");
    }

    fn write(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let old_value = self.values[trailed_integer];
        if old_value == value {
            return;
        }
        let entry = TrailedChange {
            old_value,
            reference: trailed_integer,
        };
        self.trail.push(entry);
        self.values[trailed_integer] = value;
    }

    pub fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.write(trailed_integer, self.values[trailed_integer] + addition);
    }

    pub fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.write(trailed_integer, value);
    }
}

use super::TrailedInteger;
use super::TrailedValues;
use crate::gourd_assert_moderate;

const WORD_SIZE: usize = 64;

/// A bitset over a fixed universe `[offset, offset + width)`, stored as trailed 64-bit words.
///
/// Bits outside the universe are never set, so the scanning operations do not need to mask the
/// last word.
#[derive(Debug, Clone)]
pub(crate) struct TrailedBitSet {
    offset: i32,
    width: usize,
    words: Box<[TrailedInteger]>,
}

impl TrailedBitSet {
    pub(crate) fn new(
        trailed_values: &mut TrailedValues,
        offset: i32,
        width: usize,
        members: impl IntoIterator<Item = i32>,
    ) -> TrailedBitSet {
        let mut initial_words = vec![0_u64; width.div_ceil(WORD_SIZE)];
        for member in members {
            let bit = (i64::from(member) - i64::from(offset)) as usize;
            gourd_assert_moderate!(bit < width);
            initial_words[bit / WORD_SIZE] |= 1_u64 << (bit % WORD_SIZE);
        }

        TrailedBitSet {
            offset,
            width,
            words: initial_words
                .into_iter()
                .map(|word| trailed_values.grow(word as i64))
                .collect(),
        }
    }

    fn bit_of(&self, value: i32) -> Option<usize> {
        let bit = i64::from(value) - i64::from(self.offset);
        (0..self.width as i64)
            .contains(&bit)
            .then_some(bit as usize)
    }

    fn value_of(&self, bit: usize) -> i32 {
        (i64::from(self.offset) + bit as i64) as i32
    }

    fn word(&self, trailed_values: &TrailedValues, word_index: usize) -> u64 {
        trailed_values.read(self.words[word_index]) as u64
    }

    fn write_word(&self, trailed_values: &mut TrailedValues, word_index: usize, word: u64) {
        trailed_values.assign(self.words[word_index], word as i64);
    }

    pub(crate) fn contains(&self, trailed_values: &TrailedValues, value: i32) -> bool {
        self.bit_of(value).is_some_and(|bit| {
            self.word(trailed_values, bit / WORD_SIZE) & (1_u64 << (bit % WORD_SIZE)) != 0
        })
    }

    /// Set the bit of `value`, which has to lie in the universe. Returns whether it was unset.
    pub(crate) fn insert(&self, trailed_values: &mut TrailedValues, value: i32) -> bool {
        let Some(bit) = self.bit_of(value) else {
            panic!("{value} is outside of the universe of the bitset");
        };
        let word = self.word(trailed_values, bit / WORD_SIZE);
        let mask = 1_u64 << (bit % WORD_SIZE);
        self.write_word(trailed_values, bit / WORD_SIZE, word | mask);

        word & mask == 0
    }

    /// Unset the bit of `value`. Returns whether it was set.
    pub(crate) fn remove(&self, trailed_values: &mut TrailedValues, value: i32) -> bool {
        self.clear_range(trailed_values, value, value) == 1
    }

    /// Unset every bit in `[from, to]` and return how many of them were set.
    pub(crate) fn clear_range(&self, trailed_values: &mut TrailedValues, from: i32, to: i32) -> usize {
        let from = i64::from(from).max(i64::from(self.offset));
        let to = i64::from(to).min(i64::from(self.offset) + self.width as i64 - 1);
        if from > to {
            return 0;
        }

        let first_bit = (from - i64::from(self.offset)) as usize;
        let last_bit = (to - i64::from(self.offset)) as usize;

        let mut num_cleared = 0;
        for word_index in first_bit / WORD_SIZE..=last_bit / WORD_SIZE {
            let low = if word_index == first_bit / WORD_SIZE {
                first_bit % WORD_SIZE
            } else {
                0
            };
            let high = if word_index == last_bit / WORD_SIZE {
                last_bit % WORD_SIZE
            } else {
                WORD_SIZE - 1
            };
            let mask = (u64::MAX << low) & (u64::MAX >> (WORD_SIZE - 1 - high));

            let word = self.word(trailed_values, word_index);
            num_cleared += (word & mask).count_ones() as usize;
            self.write_word(trailed_values, word_index, word & !mask);
        }

        num_cleared
    }

    /// The smallest member which is at least `from`.
    pub(crate) fn next_member(&self, trailed_values: &TrailedValues, from: i32) -> Option<i32> {
        let start = i64::from(from) - i64::from(self.offset);
        if self.width == 0 || start >= self.width as i64 {
            return None;
        }
        let start = start.max(0) as usize;

        let mut word_index = start / WORD_SIZE;
        let mut word = self.word(trailed_values, word_index) & (u64::MAX << (start % WORD_SIZE));
        loop {
            if word != 0 {
                let bit = word_index * WORD_SIZE + word.trailing_zeros() as usize;
                return Some(self.value_of(bit));
            }

            word_index += 1;
            if word_index >= self.words.len() {
                return None;
            }
            word = self.word(trailed_values, word_index);
        }
    }

    /// The largest member which is at most `from`.
    pub(crate) fn previous_member(&self, trailed_values: &TrailedValues, from: i32) -> Option<i32> {
        let start = i64::from(from) - i64::from(self.offset);
        if start < 0 || self.width == 0 {
            return None;
        }
        let start = start.min(self.width as i64 - 1) as usize;

        let mut word_index = start / WORD_SIZE;
        let mut word = self.word(trailed_values, word_index)
            & (u64::MAX >> (WORD_SIZE - 1 - start % WORD_SIZE));
        loop {
            if word != 0 {
                let bit = word_index * WORD_SIZE + (WORD_SIZE - 1 - word.leading_zeros() as usize);
                return Some(self.value_of(bit));
            }

            if word_index == 0 {
                return None;
            }
            word_index -= 1;
            word = self.word(trailed_values, word_index);
        }
    }

    /// Iterate over the members in increasing order.
    pub(crate) fn iter<'a>(
        &'a self,
        trailed_values: &'a TrailedValues,
    ) -> impl Iterator<Item = i32> + 'a {
        let mut next = self.next_member(trailed_values, i32::MIN);
        std::iter::from_fn(move || {
            let current = next?;
            next = current
                .checked_add(1)
                .and_then(|from| self.next_member(trailed_values, from));
            Some(current)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit_set(trailed_values: &mut TrailedValues, members: &[i32]) -> TrailedBitSet {
        TrailedBitSet::new(trailed_values, -5, 200, members.iter().copied())
    }

    #[test]
    fn scanning_crosses_word_boundaries() {
        let mut trailed_values = TrailedValues::default();
        let bit_set = bit_set(&mut trailed_values, &[-5, 60, 130, 194]);

        assert_eq!(Some(60), bit_set.next_member(&trailed_values, -4));
        assert_eq!(Some(130), bit_set.next_member(&trailed_values, 61));
        assert_eq!(None, bit_set.next_member(&trailed_values, 195));
        assert_eq!(Some(130), bit_set.previous_member(&trailed_values, 193));
        assert_eq!(Some(-5), bit_set.previous_member(&trailed_values, 59));
        assert_eq!(None, bit_set.previous_member(&trailed_values, -6));
        assert_eq!(
            vec![-5, 60, 130, 194],
            bit_set.iter(&trailed_values).collect::<Vec<_>>()
        );
    }

    #[test]
    fn clearing_counts_removed_members() {
        let mut trailed_values = TrailedValues::default();
        let bit_set = bit_set(&mut trailed_values, &[0, 1, 2, 70, 71, 150]);

        assert_eq!(4, bit_set.clear_range(&mut trailed_values, 1, 100));
        assert!(bit_set.contains(&trailed_values, 0));
        assert!(!bit_set.contains(&trailed_values, 70));
        assert_eq!(1, bit_set.clear_range(&mut trailed_values, -100, 100));
        assert_eq!(Some(150), bit_set.next_member(&trailed_values, i32::MIN));
    }

    #[test]
    fn changes_are_undone_on_backtrack() {
        let mut trailed_values = TrailedValues::default();
        let bit_set = bit_set(&mut trailed_values, &[3, 4]);

        trailed_values.new_checkpoint();
        assert!(bit_set.remove(&mut trailed_values, 3));
        assert!(!bit_set.remove(&mut trailed_values, 3));
        assert!(bit_set.insert(&mut trailed_values, 100));

        trailed_values.synchronise(0);

        assert!(bit_set.contains(&trailed_values, 3));
        assert!(!bit_set.contains(&trailed_values, 100));
    }
}

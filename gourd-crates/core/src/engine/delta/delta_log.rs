use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;

/// The ordered records of the accepted changes to one variable.
///
/// Only the length is backtrackable: records appended at a level which is later abandoned become
/// invisible as soon as the length is restored, and are overwritten by the next append.
#[derive(Debug, Clone)]
pub(crate) struct DeltaLog<Record> {
    records: Vec<Record>,
    length: TrailedInteger,
}

impl<Record: Copy> DeltaLog<Record> {
    pub(crate) fn new(trailed_values: &mut TrailedValues) -> Self {
        DeltaLog {
            records: Vec::new(),
            length: trailed_values.grow(0),
        }
    }

    pub(crate) fn len(&self, trailed_values: &TrailedValues) -> usize {
        trailed_values.read(self.length) as usize
    }

    pub(crate) fn append(&mut self, trailed_values: &mut TrailedValues, record: Record) {
        let len = self.len(trailed_values);
        self.records.truncate(len);
        self.records.push(record);
        trailed_values.assign(self.length, len as i64 + 1);
    }

    pub(crate) fn records(&self, trailed_values: &TrailedValues) -> &[Record] {
        &self.records[..self.len(trailed_values)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_of_abandoned_levels_are_overwritten() {
        let mut trailed_values = TrailedValues::default();
        let mut log = DeltaLog::new(&mut trailed_values);

        log.append(&mut trailed_values, 'a');
        trailed_values.new_checkpoint();
        log.append(&mut trailed_values, 'b');
        log.append(&mut trailed_values, 'c');
        assert_eq!(&['a', 'b', 'c'], log.records(&trailed_values));

        trailed_values.synchronise(0);
        assert_eq!(&['a'], log.records(&trailed_values));

        log.append(&mut trailed_values, 'd');
        assert_eq!(&['a', 'd'], log.records(&trailed_values));
    }
}

use super::Predicate;

/// The predicates which imply a domain change, e.g. the sibling bounds that a composite used to
/// tighten a variable.
///
/// It is stored in the delta record of the change, so that an explanation can be queried for as
/// long as the record is visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Justification {
    predicates: [Option<Predicate>; 2],
}

impl Justification {
    pub fn new(first: Predicate, second: Predicate) -> Self {
        Justification {
            predicates: [Some(first), Some(second)],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Predicate> + '_ {
        self.predicates.iter().flatten().copied()
    }
}

impl From<Predicate> for Justification {
    fn from(predicate: Predicate) -> Self {
        Justification {
            predicates: [Some(predicate), None],
        }
    }
}

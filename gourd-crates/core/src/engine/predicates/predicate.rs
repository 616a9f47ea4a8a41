use std::fmt::Display;
use std::fmt::Formatter;

use crate::engine::variables::IntVarId;

/// The comparison of a [`Predicate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PredicateType {
    LowerBound,
    UpperBound,
    Equal,
    NotEqual,
}

/// A statement `[variable op value]` over an integer variable.
///
/// Use the [`predicate!`](crate::predicate) macro to create one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Predicate {
    variable: IntVarId,
    predicate_type: PredicateType,
    value: i32,
}

impl Predicate {
    pub(crate) fn new(variable: IntVarId, predicate_type: PredicateType, value: i32) -> Self {
        Predicate {
            variable,
            predicate_type,
            value,
        }
    }

    pub fn get_variable(&self) -> IntVarId {
        self.variable
    }

    pub fn get_predicate_type(&self) -> PredicateType {
        self.predicate_type
    }

    pub fn get_right_hand_side(&self) -> i32 {
        self.value
    }

    /// Whether the predicate holds for every value in `[lower_bound, upper_bound]` with the
    /// provided membership test.
    pub(crate) fn is_entailed_by(
        &self,
        lower_bound: i32,
        upper_bound: i32,
        contains: impl Fn(i32) -> bool,
    ) -> bool {
        match self.predicate_type {
            PredicateType::LowerBound => lower_bound >= self.value,
            PredicateType::UpperBound => upper_bound <= self.value,
            PredicateType::Equal => lower_bound == self.value && upper_bound == self.value,
            PredicateType::NotEqual => !contains(self.value),
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let operator = match self.predicate_type {
            PredicateType::LowerBound => ">=",
            PredicateType::UpperBound => "<=",
            PredicateType::Equal => "==",
            PredicateType::NotEqual => "!=",
        };
        write!(f, "[{} {operator} {}]", self.variable, self.value)
    }
}

use super::Predicate;
use super::PredicateType;
use crate::engine::variables::IntVarId;

/// Creates the four kinds of [`Predicate`] over a variable.
pub trait PredicateConstructor {
    type Value;

    fn lower_bound_predicate(&self, bound: Self::Value) -> Predicate;

    fn upper_bound_predicate(&self, bound: Self::Value) -> Predicate;

    fn equality_predicate(&self, value: Self::Value) -> Predicate;

    fn disequality_predicate(&self, value: Self::Value) -> Predicate;
}

impl PredicateConstructor for IntVarId {
    type Value = i32;

    fn lower_bound_predicate(&self, bound: Self::Value) -> Predicate {
        Predicate::new(*self, PredicateType::LowerBound, bound)
    }

    fn upper_bound_predicate(&self, bound: Self::Value) -> Predicate {
        Predicate::new(*self, PredicateType::UpperBound, bound)
    }

    fn equality_predicate(&self, value: Self::Value) -> Predicate {
        Predicate::new(*self, PredicateType::Equal, value)
    }

    fn disequality_predicate(&self, value: Self::Value) -> Predicate {
        Predicate::new(*self, PredicateType::NotEqual, value)
    }
}

/// Creates a [`Predicate`] from a comparison, e.g. `predicate!(x >= 5)` or
/// `predicate!(self.start <= bound)`.
#[macro_export]
macro_rules! predicate {
    ($($var:ident).+$([$index:expr])? >= $bound:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.lower_bound_predicate($bound)
    }};
    ($($var:ident).+$([$index:expr])? <= $bound:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.upper_bound_predicate($bound)
    }};
    ($($var:ident).+$([$index:expr])? == $value:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.equality_predicate($value)
    }};
    ($($var:ident).+$([$index:expr])? != $value:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.disequality_predicate($value)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_matches_local_and_nested_identifiers() {
        struct Wrapper {
            x: IntVarId,
        }

        let x = IntVarId::new(0);
        let wrapper = Wrapper { x };
        let indexed = [x];

        assert_eq!(PredicateType::LowerBound, predicate![x >= 2].get_predicate_type());
        assert_eq!(PredicateType::UpperBound, predicate![wrapper.x <= 3].get_predicate_type());
        assert_eq!(PredicateType::Equal, predicate![indexed[0] == 5].get_predicate_type());
        assert_eq!(PredicateType::NotEqual, predicate![x != 5].get_predicate_type());

        assert_eq!(x, predicate![wrapper.x != 5].get_variable());
        assert_eq!(3, predicate![wrapper.x <= 3].get_right_hand_side());
    }

    #[test]
    fn predicates_are_displayed_with_their_operator() {
        let x = IntVarId::new(3);

        assert_eq!("[x3 >= -1]", predicate!(x >= -1).to_string());
        assert_eq!("[x3 != 4]", predicate!(x != 4).to_string());
    }
}

//! Assertions whose cost is controlled by a compile-time level.
//!
//! The `simple` level is always active and guards the cheap invariants of the engine (e.g. never
//! restoring to a level that was not reached). The higher levels re-derive state from scratch and
//! are only enabled with the `debug-checks` feature.

pub(crate) const GOURD_ASSERT_LEVEL_DEFINITION: u8 = if cfg!(feature = "debug-checks") {
    GOURD_ASSERT_EXTREME
} else {
    GOURD_ASSERT_SIMPLE
};

pub(crate) const GOURD_ASSERT_SIMPLE: u8 = 1;
pub(crate) const GOURD_ASSERT_MODERATE: u8 = 2;
pub(crate) const GOURD_ASSERT_ADVANCED: u8 = 3;
pub(crate) const GOURD_ASSERT_EXTREME: u8 = 4;

#[macro_export]
#[doc(hidden)]
macro_rules! print_gourd_assert_warning_message {
    () => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION
            >= $crate::gourd_asserts::GOURD_ASSERT_MODERATE
        {
            log::warn!(
                "Potential performance degradation: the gourd assert level is set to {}, meaning many debug asserts are active.",
                $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION
            );
        };
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! gourd_assert_simple {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION
            >= $crate::gourd_asserts::GOURD_ASSERT_SIMPLE
        {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! gourd_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION
            >= $crate::gourd_asserts::GOURD_ASSERT_SIMPLE
        {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! gourd_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION
            >= $crate::gourd_asserts::GOURD_ASSERT_MODERATE
        {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! gourd_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION
            >= $crate::gourd_asserts::GOURD_ASSERT_ADVANCED
        {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! gourd_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION
            >= $crate::gourd_asserts::GOURD_ASSERT_EXTREME
        {
            assert!($($arg)*);
        }
    };
}

//! Counters of the engine and of individual propagators, and the logging of their values.
mod statistic_logger;

use std::fmt::Display;

pub use statistic_logger::StatisticLogger;
pub use statistic_logger::STATISTICS_TARGET;

#[cfg(doc)]
use crate::State;

/// A simple trait for defining a loggable statistic.
///
/// See [`create_statistics_struct!`] for creating a statistic struct automatically!
pub trait Statistic {
    /// Logs the [`Statistic`] using the provided [`StatisticLogger`].
    fn log(&self, statistic_logger: StatisticLogger);
}

impl<Value: Display> Statistic for Value {
    fn log(&self, statistic_logger: StatisticLogger) {
        statistic_logger.log_value(self);
    }
}

/// A macro for generating a struct for storing statistics.
///
/// # Example
/// ```rust
/// # use gourd_core::create_statistics_struct;
/// create_statistics_struct!(Statistics {
///     number_of_calls: usize
/// });
///
/// let statistics = Statistics::default();
///
/// assert_eq!(statistics.number_of_calls, 0);
/// ```
#[macro_export]
macro_rules! create_statistics_struct {
    ($(#[$struct_documentation:meta])* $name:ident { $($(#[$variable_documentation:meta])* $field:ident : $type:ident),+ $(,)? }) => {
        $(#[$struct_documentation])*
        #[derive(Default, Debug, Copy, Clone)]
        pub struct $name {
            $($(#[$variable_documentation])* pub $field: $type),+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, statistic_logger: $crate::statistics::StatisticLogger) {
                $(
                    $crate::statistics::Statistic::log(
                        &self.$field,
                        statistic_logger.attach_to_prefix(stringify!($field)),
                    );
                )+
            }
        }
    };
}

create_statistics_struct!(
    /// The counters the [`State`] keeps about propagation and backtracking.
    EngineStatistics {
        /// The number of calls to [`Propagator::propagate`](crate::propagation::Propagator::propagate).
        num_propagator_calls: usize,
        /// The number of notifications delivered through
        /// [`Propagator::notify`](crate::propagation::Propagator::notify).
        num_notifications: usize,
        /// The number of calls to passive monitors.
        num_monitor_calls: usize,
        num_conflicts: usize,
        num_restores: usize,
        /// The number of propagators deactivated because they were entailed.
        num_entailed: usize,
    }
);

use thiserror::Error;

/// Errors related to creating variables and adding propagators or monitors to the
/// [`State`](crate::State).
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    #[error("a variable cannot be created with an empty domain")]
    EmptyInitialDomain,
    #[error("the domain [{lower_bound}, {upper_bound}] is not a valid interval")]
    InvalidInterval { lower_bound: i32, upper_bound: i32 },
    #[error("element {0} is in the kernel but not in the envelope")]
    KernelNotInEnvelope(i32),
}

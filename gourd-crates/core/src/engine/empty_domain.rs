use thiserror::Error;

use crate::engine::variables::VariableRef;
use crate::engine::Cause;

/// A requested change would have left a variable without any legal value (or with a kernel which
/// is not a subset of its envelope).
///
/// The change is rejected before anything is written, so the domain is exactly as it was before
/// the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("the domain of {variable} would become empty (caused by {cause})")]
pub struct EmptyDomain {
    pub variable: VariableRef,
    pub cause: Cause,
}

use thiserror::Error;

use innkeep_core::DomainError;

use crate::store::StoreError;

/// Failure of a front-desk operation.
///
/// Domain failures are deterministic and mean nothing was written; store failures
/// are infrastructure problems.
#[derive(Debug, Error)]
pub enum FrontDeskError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FrontDeskError {
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            FrontDeskError::Domain(e) => Some(e),
            FrontDeskError::Store(_) => None,
        }
    }
}

//! High-level error types

use crate::transaction::TransactionError;
use crate::transfer::TransferError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[from] r307_transport::Error),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),
}

impl Error {
    /// Whether the failure is the user's to fix (placement, timing) rather
    /// than the link's
    ///
    /// The canonical caller response is to re-prompt and start a fresh
    /// workflow invocation.
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            Self::Transaction(TransactionError::Exhausted { .. })
                | Self::Transaction(TransactionError::Terminal(_))
                | Self::Transfer(TransferError::Transaction(TransactionError::Exhausted { .. }))
                | Self::Transfer(TransferError::Transaction(TransactionError::Terminal(_)))
        )
    }
}

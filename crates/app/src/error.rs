use thiserror::Error;

use playtime_store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures around the backing file. The absorbing ledger operations turn
/// these into diagnostics; the `try_` variants hand them to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("read failure: {0}")]
    ReadFailure(String),
    #[error("write failure: {0}")]
    WriteFailure(String),
}

impl LedgerError {
    pub fn kind(&self) -> IssueKind {
        match self {
            Self::StorageUnavailable(_) => IssueKind::StorageUnavailable,
            Self::ReadFailure(_) => IssueKind::ReadFailure,
            Self::WriteFailure(_) => IssueKind::WriteFailure,
        }
    }

    pub(crate) fn on_read(context: &str, err: StoreError) -> Self {
        if err.is_unavailable() {
            Self::StorageUnavailable(format!("{}: {}", context, err))
        } else {
            Self::ReadFailure(format!("{}: {}", context, err))
        }
    }

    pub(crate) fn on_write(context: &str, err: StoreError) -> Self {
        if matches!(err, StoreError::RootUnavailable(_)) {
            Self::StorageUnavailable(format!("{}: {}", context, err))
        } else {
            Self::WriteFailure(format!("{}: {}", context, err))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    StorageUnavailable,
    ReadFailure,
    WriteFailure,
}

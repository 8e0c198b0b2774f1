use std::io;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("storage root unavailable: {0}")]
    RootUnavailable(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("injected fault: {0}")]
    Injected(&'static str),
}

impl StoreError {
    /// True when the failure means the target is absent rather than broken.
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::RootUnavailable(_) | Self::NotFound(_) => true,
            Self::Io(err) => err.kind() == io::ErrorKind::NotFound,
            Self::InvalidPath(_) | Self::Injected(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

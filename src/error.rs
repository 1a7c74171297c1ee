use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T, E = SnapshotError> = std::result::Result<T, E>;

/// Boxed error coming out of a platform capture backend
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every way a snapshot run can fail
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no display found")]
    NoDisplay,

    #[error("capture backend failed to {context}")]
    Backend {
        context: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("no frame captured within {0:?}")]
    FrameTimeout(Duration),

    #[error("capture stream ended before delivering a frame")]
    StreamEnded,

    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    #[error("JPEG encoding failed")]
    Encode(#[from] image::ImageError),

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not determine a desktop directory for the output file")]
    NoOutputDirectory,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("snapshot worker failed")]
    Worker(#[from] tokio::task::JoinError),
}

impl SnapshotError {
    pub fn backend(context: &'static str, source: impl Into<BackendError>) -> Self {
        Self::Backend {
            context,
            source: source.into(),
        }
    }
}

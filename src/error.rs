//! Error kinds surfaced to the user.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop the viewer from rendering a dataset.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The backing data file does not exist.
    #[error("Data file not found. Check {}.", path.display())]
    DataFileMissing { path: PathBuf },

    /// Anything else that went wrong while loading or preparing the data.
    #[error("An error occurred: {0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl ViewerError {
    /// Classify a load failure: a `NotFound` I/O error anywhere in the
    /// chain becomes [`ViewerError::DataFileMissing`].
    pub fn from_load(path: PathBuf, err: anyhow::Error) -> Self {
        let not_found = err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
        });
        if not_found {
            ViewerError::DataFileMissing { path }
        } else {
            ViewerError::Unexpected(err)
        }
    }
}

//! Export error types

use std::io;
use std::path::Path;

use thiserror::Error;

/// Errors raised while writing one aggregated table
#[derive(Debug, Error)]
pub enum ExportError {
    /// Could not create the temporary file next to the target
    #[error("could not create a temporary file in {path}")]
    Io {
        /// Output directory
        path: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// CSV serialization or flush failure
    #[error("could not write {path}")]
    Csv {
        /// Destination file
        path: String,
        /// Underlying error
        #[source]
        source: csv::Error,
    },

    /// Rename of the finished temporary file failed
    #[error("could not move {path} into place")]
    Persist {
        /// Destination file
        path: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    /// Create an Io error for the output directory
    pub fn io(dir: &Path, source: io::Error) -> Self {
        Self::Io {
            path: dir.display().to_string(),
            source,
        }
    }

    /// Create a Csv error for the destination file
    pub fn csv(target: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: target.display().to_string(),
            source,
        }
    }

    /// Create a Persist error for the destination file
    pub fn persist(target: &Path, source: io::Error) -> Self {
        Self::Persist {
            path: target.display().to_string(),
            source,
        }
    }
}

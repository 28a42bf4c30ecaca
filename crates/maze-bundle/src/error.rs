use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("failed to access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BundleError {
    /// The file or directory that could not be read
    pub fn path(&self) -> &std::path::Path {
        match self {
            BundleError::FileAccess { path, .. } => path,
        }
    }
}

pub type BundleResult<T> = std::result::Result<T, BundleError>;

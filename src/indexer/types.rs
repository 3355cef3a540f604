//! Indexer type definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::MatcherError;

#[derive(Error, Debug)]
pub enum IndexerError {
    /// The workspace root is missing or not a directory
    #[error("Workspace root is not a directory: {0:?}")]
    InvalidPath(PathBuf),

    #[error(transparent)]
    Matcher(#[from] MatcherError),
}

//! Error types shared by the picker core and the terminal host

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while a picker session is live.
///
/// None of these are fatal: the session controller recovers from each one
/// locally and at most shows a transient status message.
#[derive(Debug, Error)]
pub enum PickerError {
    /// A directory could not be listed; the subtree is skipped
    #[error("cannot list {}: {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The scan finished without discovering a single file
    #[error("no files found under {}", root.display())]
    EmptyResult { root: PathBuf },

    /// The chosen path could not be opened or activated
    #[error("cannot open {}: {reason}", path.display())]
    EditFailure { path: PathBuf, reason: String },

    /// A scheduled scan step fired after its session was closed
    #[error("stale scan callback for generation {generation}")]
    StaleCallback { generation: u64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PickerError>;

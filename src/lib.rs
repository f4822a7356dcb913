//! Fpick - an incremental fuzzy file picker
//!
//! The picker scans a directory tree a slice at a time, so the list is
//! usable before the scan finishes, and narrows it by fuzzy matching as
//! the user types. The host it draws into is abstracted behind the traits
//! in [`host`]; [`tui`] provides the terminal implementation.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod file_opener;
pub mod host;
pub mod logging;
pub mod scheduler;
pub mod session;
pub mod tui;

// Re-export primary types for convenience
pub use config::{OpenWith, UserConfig};
pub use domain::{match_paths, scan_step, PathFilter, PathNormalizer, ScanState};
pub use error::{PickerError, Result};
pub use file_opener::open_file;
pub use host::{DirectoryLister, FsLister, PickerHost};
pub use session::{PickerKey, SessionConfig, SessionController};

//! Launching chosen files outside the picker

use crate::config::OpenWith;
use crate::error::{PickerError, Result};
use std::path::Path;
use tracing::info;

/// Opens `path` in the user's editor or the system's default application.
///
/// Editor launches block until the editor exits, so the caller must have
/// released the terminal first.
pub fn open_file(path: &Path, open_with: OpenWith) -> Result<()> {
    info!(path = %path.display(), ?open_with, "launching file");

    let result = match open_with {
        OpenWith::Editor => edit::edit_file(path),
        OpenWith::System => open::that(path),
    };

    result.map_err(|e| PickerError::EditFailure {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}


use std::path::{Path, PathBuf};

/// Room reserved for the `...` marker and the ` (` `/)` decoration
const DECORATION_WIDTH: usize = 6;

/// One row of the picker list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub label: String,
    pub path: PathBuf,
}

fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) if idx > 0 => (&path[idx + 1..], &path[..idx]),
        Some(_) => (&path[1..], "/"),
        None => (path, "."),
    }
}

/// Keeps `keep` chars from each end of `dir`, joined by `...`.
fn compress(dir: &str, keep: usize) -> String {
    let chars: Vec<char> = dir.chars().collect();
    if keep * 2 >= chars.len() {
        return dir.to_string();
    }
    let head: String = chars[..keep].iter().collect();
    let tail: String = chars[chars.len() - keep..].iter().collect();
    format!("{head}...{tail}")
}

/// Builds the `name (dir/)` label for one path.
///
/// When the whole path does not fit in `max_width` the directory part is
/// shortened from the middle. Widths too small to leave any room shrink the
/// directory to a bare `...`.
pub fn format_label(path: &Path, max_width: usize) -> String {
    let full = path.to_string_lossy();
    let (file_name, dir_name) = split_path(&full);
    let name_len = file_name.chars().count();

    let dir = if full.chars().count() > max_width && name_len < max_width {
        let keep = max_width.saturating_sub(name_len + DECORATION_WIDTH) / 2;
        compress(dir_name, keep)
    } else {
        dir_name.to_string()
    };

    if dir_name == "." {
        file_name.to_string()
    } else if dir == "/" {
        format!("{file_name} (/)")
    } else {
        format!("{file_name} ({dir}/)")
    }
}

pub fn format_labels(paths: &[PathBuf], max_width: usize) -> Vec<String> {
    paths.iter().map(|p| format_label(p, max_width)).collect()
}

pub fn display_items(paths: &[PathBuf], max_width: usize) -> Vec<DisplayItem> {
    paths
        .iter()
        .map(|p| DisplayItem {
            label: format_label(p, max_width),
            path: p.clone(),
        })
        .collect()
}

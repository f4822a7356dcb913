//! Picker core: entry filtering, scanning, matching and label formatting.
//!
//! Everything in here is free of host concerns. The scanner talks to the
//! file system only through [`crate::host::DirectoryLister`].

pub mod display;
pub mod matcher;
pub mod path_filter;
pub mod scanner;

pub use display::{display_items, format_label, format_labels, DisplayItem};
pub use matcher::match_paths;
pub use path_filter::{should_ignore, PathFilter};
pub use scanner::{scan_step, PathNormalizer, ScanState, StepOutcome, DEFAULT_SCAN_BUDGET};

use std::path::PathBuf;

/// Query text and the matches it currently selects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    /// Ranked subset of the discovered paths
    pub matched: Vec<PathBuf>,
    /// Path under the highlight when the list was last rendered
    pub selected: Option<PathBuf>,
}

impl FilterState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Recomputes `matched` from the full path list
    pub fn rematch(&mut self, all: &[PathBuf]) {
        self.matched = match_paths(all, &self.query);
    }

    /// Index the highlight should land on after a rematch: the previously
    /// selected path when it is still matched, else the first row.
    pub fn highlight_index(&self) -> usize {
        self.selected
            .as_ref()
            .and_then(|sel| self.matched.iter().position(|p| p == sel))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod filter_state_tests {
        use super::*;

        fn all() -> Vec<PathBuf> {
            ["a/one.rs", "b/two.rs", "c/three.md"]
                .iter()
                .map(PathBuf::from)
                .collect()
        }

        #[test]
        fn test_new_filter_state_is_empty() {
            let state = FilterState::new("q");
            assert_eq!(state.query, "q");
            assert!(state.matched.is_empty());
            assert!(state.selected.is_none());
        }

        #[test]
        fn test_highlight_follows_selected_path() {
            let mut state = FilterState::new("");
            state.rematch(&all());
            state.selected = Some(PathBuf::from("b/two.rs"));
            assert_eq!(state.highlight_index(), 1);

            state.query = "rs".to_string();
            state.rematch(&all());
            assert_eq!(state.matched[state.highlight_index()], PathBuf::from("b/two.rs"));
        }

        #[test]
        fn test_highlight_falls_back_to_first() {
            let mut state = FilterState::new("md");
            state.selected = Some(PathBuf::from("a/one.rs"));
            state.rematch(&all());
            assert_eq!(state.matched, vec![PathBuf::from("c/three.md")]);
            assert_eq!(state.highlight_index(), 0);
        }
    }
}

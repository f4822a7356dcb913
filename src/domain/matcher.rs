use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::path::PathBuf;

/// Ranks `all` against `query`.
///
/// An empty query returns the paths unchanged. Otherwise only paths that
/// contain every query character in order are kept, best score first; equal
/// scores keep discovery order.
pub fn match_paths(all: &[PathBuf], query: &str) -> Vec<PathBuf> {
    if query.is_empty() {
        return all.to_vec();
    }

    let matcher = SkimMatcherV2::default().smart_case();

    let mut scored: Vec<(i64, &PathBuf)> = all
        .iter()
        .filter_map(|path| {
            matcher
                .fuzzy_match(&path.to_string_lossy(), query)
                .map(|score| (score, path))
        })
        .collect();

    // sort_by is stable, so ties stay in discovery order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, path)| path.clone()).collect()
}

//! Time-sliced breadth-first directory scan.
//!
//! A scan is driven by repeated calls to [`scan_step`]. Each call lists
//! directories until its wall-clock budget runs out, then returns so the
//! caller can render, handle input and reschedule the next step.

use super::path_filter::PathFilter;
use crate::error::PickerError;
use crate::host::{DirectoryLister, EntryKind};
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

/// Wall-clock budget of one scan step
pub const DEFAULT_SCAN_BUDGET: Duration = Duration::from_millis(100);

/// Progress of one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    /// Directories waiting to be listed, in discovery order
    pub pending: VecDeque<PathBuf>,
    /// Every file found so far; only grows while the scan runs
    pub discovered: Vec<PathBuf>,
    pub active: bool,
    /// Set once the finishing normalization pass ran
    pub normalized: bool,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all progress and marks the scan active
    pub fn reset(&mut self) {
        self.pending.clear();
        self.discovered.clear();
        self.active = true;
        self.normalized = false;
    }
}

/// Result of one [`scan_step`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Number of files appended during this step
    pub appended: usize,
    /// No directories are left to list
    pub complete: bool,
    /// The finishing normalization pass ran during this step
    pub normalized: bool,
    /// Directories that could not be listed during this step
    pub skipped: usize,
}

fn enumeration_error(dir: &Path, source: io::Error) -> PickerError {
    PickerError::Enumeration {
        path: dir.to_path_buf(),
        source,
    }
}

/// Rewrites paths into the short form shown to the user: relative to the
/// working directory when below it, `~/...` when below home.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathNormalizer {
    home: Option<PathBuf>,
    cwd: Option<PathBuf>,
}

impl PathNormalizer {
    pub fn new(home: Option<PathBuf>, cwd: Option<PathBuf>) -> Self {
        Self { home, cwd }
    }

    /// Uses the process's home and working directories
    pub fn from_env() -> Self {
        Self::new(dirs::home_dir(), std::env::current_dir().ok())
    }

    pub fn normalize(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            return path
                .strip_prefix(".")
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.to_path_buf());
        }

        if let Some(rest) = self
            .cwd
            .as_deref()
            .and_then(|cwd| path.strip_prefix(cwd).ok())
        {
            if !rest.as_os_str().is_empty() {
                return rest.to_path_buf();
            }
        }

        if let Some(rest) = self
            .home
            .as_deref()
            .and_then(|home| path.strip_prefix(home).ok())
        {
            return Path::new("~").join(rest);
        }

        path.to_path_buf()
    }

    /// Turns a normalized path back into one the file system accepts.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if let (Ok(rest), Some(home)) = (path.strip_prefix("~"), self.home.as_deref()) {
            return home.join(rest);
        }
        match self.cwd.as_deref() {
            Some(cwd) if path.is_relative() => cwd.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Joins an entry name onto its directory, keeping paths under `.` bare.
fn child_path(dir: &Path, name: &str) -> PathBuf {
    if dir == Path::new(".") || dir.as_os_str().is_empty() {
        PathBuf::from(name)
    } else {
        dir.join(name)
    }
}

/// Runs one time-sliced scan step.
///
/// With `start` set, listing begins there (the scan root on the first call);
/// otherwise the next pending directory is taken. The step keeps listing
/// directories until `budget` is exceeded or nothing is pending. Directories
/// that cannot be listed are skipped. Once the queue is exhausted every
/// discovered path is normalized, exactly once per scan.
pub fn scan_step(
    state: &mut ScanState,
    lister: &dyn DirectoryLister,
    filter: &PathFilter,
    normalizer: &PathNormalizer,
    start: Option<&Path>,
    budget: Duration,
) -> StepOutcome {
    let mut current = match start {
        Some(dir) => Some(dir.to_path_buf()),
        None => state.pending.pop_front(),
    };

    let started = Instant::now();
    let mut appended = 0;
    let mut skipped = 0;

    while let Some(dir) = current.take() {
        match lister.list(&dir) {
            Ok(entries) => {
                for entry in entries {
                    if filter.should_ignore(&entry.name) {
                        continue;
                    }
                    let path = child_path(&dir, &entry.name);
                    match entry.kind {
                        EntryKind::Dir => state.pending.push_back(path),
                        EntryKind::File | EntryKind::Other => {
                            state.discovered.push(path);
                            appended += 1;
                        }
                    }
                }
            }
            Err(e) => {
                let err = enumeration_error(&dir, e);
                debug!(%err, "skipping unreadable directory");
                skipped += 1;
            }
        }

        if started.elapsed() > budget {
            break;
        }
        current = state.pending.pop_front();
    }

    let complete = state.pending.is_empty();
    let mut normalized = false;
    if complete {
        state.active = false;
        if !state.normalized {
            for path in state.discovered.iter_mut() {
                *path = normalizer.normalize(path);
            }
            state.normalized = true;
            normalized = true;
        }
    }

    debug!(
        appended,
        skipped,
        total = state.discovered.len(),
        pending = state.pending.len(),
        complete,
        "scan step finished"
    );

    StepOutcome {
        appended,
        complete,
        normalized,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DirEntryInfo, FsLister};
    use std::collections::{HashMap, HashSet};
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    /// In-memory tree keyed by directory path
    struct MapLister(HashMap<PathBuf, Vec<DirEntryInfo>>);

    impl DirectoryLister for MapLister {
        fn list(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
            self.0
                .get(dir)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn run_to_completion(
        state: &mut ScanState,
        lister: &dyn DirectoryLister,
        root: &Path,
        budget: Duration,
    ) -> usize {
        let filter = PathFilter::new();
        let normalizer = PathNormalizer::default();
        state.reset();
        let mut steps = 1;
        let mut outcome = scan_step(state, lister, &filter, &normalizer, Some(root), budget);
        while !outcome.complete {
            outcome = scan_step(state, lister, &filter, &normalizer, None, budget);
            steps += 1;
        }
        steps
    }

    fn sample_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("main.c"), b"int main;").unwrap();
        fs::write(root.join("main.o"), b"\x7fELF").unwrap();
        fs::write(root.join(".env"), b"SECRET=1").unwrap();
        fs::create_dir_all(root.join("src/nested/deeper")).unwrap();
        fs::write(root.join("src/lib.c"), b"").unwrap();
        fs::write(root.join("src/nested/util.h"), b"").unwrap();
        fs::write(root.join("src/nested/deeper/leaf.txt"), b"").unwrap();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::write(root.join(".git/HEAD"), b"ref").unwrap();
        temp_dir
    }

    mod traversal_tests {
        use super::*;

        #[test]
        fn test_scan_finds_every_visible_file_once() {
            let temp_dir = sample_tree();
            let mut state = ScanState::new();

            run_to_completion(&mut state, &FsLister, temp_dir.path(), DEFAULT_SCAN_BUDGET);

            let found: HashSet<_> = state
                .discovered
                .iter()
                .map(|p| p.strip_prefix(temp_dir.path()).unwrap().to_path_buf())
                .collect();
            let expected: HashSet<PathBuf> = [
                "main.c",
                "src/lib.c",
                "src/nested/util.h",
                "src/nested/deeper/leaf.txt",
            ]
            .iter()
            .map(PathBuf::from)
            .collect();
            assert_eq!(found, expected);
            assert_eq!(state.discovered.len(), expected.len());
            assert!(!state.active);
        }

        #[test]
        fn test_zero_budget_gives_same_result_one_dir_per_step() {
            let temp_dir = sample_tree();
            let mut sliced = ScanState::new();
            let mut whole = ScanState::new();

            let steps = run_to_completion(&mut sliced, &FsLister, temp_dir.path(), Duration::ZERO);
            run_to_completion(&mut whole, &FsLister, temp_dir.path(), Duration::from_secs(60));

            assert!(steps > 1);
            assert_eq!(sliced.discovered, whole.discovered);
        }

        #[test]
        fn test_breadth_first_order() {
            let temp_dir = sample_tree();
            let mut state = ScanState::new();

            run_to_completion(&mut state, &FsLister, temp_dir.path(), Duration::ZERO);

            let depths: Vec<usize> = state
                .discovered
                .iter()
                .map(|p| p.strip_prefix(temp_dir.path()).unwrap().components().count())
                .collect();
            let mut sorted = depths.clone();
            sorted.sort();
            assert_eq!(depths, sorted);
        }

        #[test]
        fn test_discovered_never_shrinks_between_steps() {
            let temp_dir = sample_tree();
            let filter = PathFilter::new();
            let normalizer = PathNormalizer::default();
            let mut state = ScanState::new();
            state.reset();

            let mut last = 0;
            let mut outcome = scan_step(
                &mut state,
                &FsLister,
                &filter,
                &normalizer,
                Some(temp_dir.path()),
                Duration::ZERO,
            );
            loop {
                assert!(state.discovered.len() >= last);
                assert_eq!(outcome.appended, state.discovered.len() - last);
                last = state.discovered.len();
                if outcome.complete {
                    break;
                }
                outcome = scan_step(&mut state, &FsLister, &filter, &normalizer, None, Duration::ZERO);
            }
        }

        #[test]
        fn test_step_on_exhausted_queue_is_complete_and_unchanged() {
            let mut state = ScanState::new();
            state.discovered.push(PathBuf::from("a.txt"));
            state.normalized = true;
            let before = state.clone();

            let outcome = scan_step(
                &mut state,
                &FsLister,
                &PathFilter::new(),
                &PathNormalizer::default(),
                None,
                DEFAULT_SCAN_BUDGET,
            );

            assert!(outcome.complete);
            assert_eq!(outcome.appended, 0);
            assert!(!outcome.normalized);
            assert_eq!(state.discovered, before.discovered);
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_unreadable_directory_is_skipped() {
            let mut tree = HashMap::new();
            tree.insert(
                PathBuf::from("root"),
                vec![
                    DirEntryInfo::new("locked", EntryKind::Dir),
                    DirEntryInfo::new("open", EntryKind::Dir),
                    DirEntryInfo::new("top.txt", EntryKind::File),
                ],
            );
            tree.insert(
                PathBuf::from("root/open"),
                vec![DirEntryInfo::new("inner.txt", EntryKind::File)],
            );
            let lister = MapLister(tree);
            let mut state = ScanState::new();

            run_to_completion(&mut state, &lister, Path::new("root"), Duration::ZERO);

            assert_eq!(
                state.discovered,
                vec![
                    PathBuf::from("root/top.txt"),
                    PathBuf::from("root/open/inner.txt"),
                ]
            );
        }

        #[test]
        fn test_skipped_directories_are_counted() {
            let mut tree = HashMap::new();
            tree.insert(
                PathBuf::from("root"),
                vec![
                    DirEntryInfo::new("locked", EntryKind::Dir),
                    DirEntryInfo::new("top.txt", EntryKind::File),
                ],
            );
            let lister = MapLister(tree);
            let filter = PathFilter::new();
            let normalizer = PathNormalizer::default();
            let mut state = ScanState::new();
            state.reset();

            let outcome = scan_step(
                &mut state,
                &lister,
                &filter,
                &normalizer,
                Some(Path::new("root")),
                DEFAULT_SCAN_BUDGET,
            );

            assert!(outcome.complete);
            assert_eq!(outcome.skipped, 1);
            assert_eq!(outcome.appended, 1);
        }

        #[test]
        fn test_enumeration_error_names_directory() {
            let err = enumeration_error(
                Path::new("root/locked"),
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            );

            assert!(matches!(
                &err,
                PickerError::Enumeration { path, .. } if path == Path::new("root/locked")
            ));
            assert_eq!(err.to_string(), "cannot list root/locked: denied");
        }

        #[test]
        fn test_empty_tree_completes_with_no_files() {
            let temp_dir = TempDir::new().unwrap();
            fs::create_dir(temp_dir.path().join("empty_sub")).unwrap();
            fs::write(temp_dir.path().join(".hidden"), b"").unwrap();
            let mut state = ScanState::new();

            run_to_completion(&mut state, &FsLister, temp_dir.path(), Duration::ZERO);

            assert!(state.discovered.is_empty());
            assert!(state.normalized);
        }

        #[test]
        fn test_symlinks_are_not_followed() {
            let mut tree = HashMap::new();
            tree.insert(
                PathBuf::from("."),
                vec![
                    DirEntryInfo::new("loop", EntryKind::Other),
                    DirEntryInfo::new("a.rs", EntryKind::File),
                ],
            );
            let lister = MapLister(tree);
            let mut state = ScanState::new();

            run_to_completion(&mut state, &lister, Path::new("."), DEFAULT_SCAN_BUDGET);

            assert_eq!(
                state.discovered,
                vec![PathBuf::from("loop"), PathBuf::from("a.rs")]
            );
        }
    }

    mod normalizer_tests {
        use super::*;

        fn normalizer() -> PathNormalizer {
            PathNormalizer::new(
                Some(PathBuf::from("/home/ann")),
                Some(PathBuf::from("/home/ann/project")),
            )
        }

        #[test]
        fn test_below_cwd_becomes_relative() {
            assert_eq!(
                normalizer().normalize(Path::new("/home/ann/project/src/a.rs")),
                PathBuf::from("src/a.rs")
            );
        }

        #[test]
        fn test_below_home_uses_tilde() {
            assert_eq!(
                normalizer().normalize(Path::new("/home/ann/notes/todo.md")),
                PathBuf::from("~/notes/todo.md")
            );
        }

        #[test]
        fn test_elsewhere_is_unchanged() {
            assert_eq!(
                normalizer().normalize(Path::new("/etc/hosts")),
                PathBuf::from("/etc/hosts")
            );
        }

        #[test]
        fn test_relative_drops_leading_dot() {
            assert_eq!(
                normalizer().normalize(Path::new("./src/a.rs")),
                PathBuf::from("src/a.rs")
            );
            assert_eq!(
                normalizer().normalize(Path::new("src/a.rs")),
                PathBuf::from("src/a.rs")
            );
        }

        #[test]
        fn test_resolve_undoes_normalize() {
            let n = normalizer();
            for raw in ["/home/ann/project/src/a.rs", "/home/ann/notes/todo.md", "/etc/hosts"] {
                let raw = Path::new(raw);
                assert_eq!(n.resolve(&n.normalize(raw)), raw);
            }
        }

        #[test]
        fn test_normalization_runs_once_on_completion() {
            let mut tree = HashMap::new();
            tree.insert(
                PathBuf::from("/home/ann/project"),
                vec![DirEntryInfo::new("a.rs", EntryKind::File)],
            );
            let lister = MapLister(tree);
            let filter = PathFilter::new();
            let mut state = ScanState::new();
            state.reset();

            let outcome = scan_step(
                &mut state,
                &lister,
                &filter,
                &normalizer(),
                Some(Path::new("/home/ann/project")),
                DEFAULT_SCAN_BUDGET,
            );

            assert!(outcome.complete);
            assert!(outcome.normalized);
            assert_eq!(state.discovered, vec![PathBuf::from("a.rs")]);

            let again = scan_step(&mut state, &lister, &filter, &normalizer(), None, DEFAULT_SCAN_BUDGET);
            assert!(!again.normalized);
            assert_eq!(state.discovered, vec![PathBuf::from("a.rs")]);
        }
    }
}

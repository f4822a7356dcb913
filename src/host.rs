//! Interfaces the picker core consumes from its host.
//!
//! The session controller never touches the terminal, the clock or the
//! window list directly. Everything it needs goes through the traits below,
//! which the terminal front end implements in [`crate::tui`] and the tests
//! implement with recording mocks.

use crate::error::{PickerError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Kind of a directory entry as reported by the listing primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntryInfo {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Lists the immediate entries of one directory.
pub trait DirectoryLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>>;
}

/// Lists directories on the local file system.
///
/// Symlinks are reported as [`EntryKind::Other`] and never followed, so a
/// link cycle cannot trap the scanner.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();

        for entry_result in fs::read_dir(dir)? {
            // Skip entries that cannot be read (permission errors, etc.)
            let entry = match entry_result {
                Ok(e) => e,
                Err(_) => continue,
            };

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };

            let kind = match entry.file_type() {
                Ok(ft) if ft.is_dir() => EntryKind::Dir,
                Ok(ft) if ft.is_file() => EntryKind::File,
                Ok(_) => EntryKind::Other,
                Err(_) => continue,
            };

            entries.push(DirEntryInfo { name, kind });
        }

        // read_dir order is platform dependent
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Placement and size limits for the picker popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupSpec {
    pub title: String,
    pub min_width: u16,
    pub max_width: u16,
    pub min_height: u16,
    pub max_height: u16,
}

impl Default for PopupSpec {
    fn default() -> Self {
        Self {
            title: "Files".to_string(),
            min_width: 40,
            max_width: 100,
            min_height: 10,
            max_height: 30,
        }
    }
}

/// Usable size of the list area, excluding borders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub width: u16,
    pub height: u16,
}

/// The list widget that shows matched paths.
pub trait ListDisplay {
    fn create(&mut self, spec: &PopupSpec);
    fn set_title(&mut self, title: &str);
    fn set_lines(&mut self, lines: Vec<String>);
    fn geometry(&self) -> Geometry;
    /// Zero-based index of the highlighted line, if the list is open and
    /// not empty
    fn selected(&self) -> Option<usize>;
    fn set_highlight(&mut self, index: usize);
    fn close(&mut self);
    /// Shows a one-line transient message to the user
    fn notify(&mut self, message: &str);
}

/// Identifies one scheduled one-shot callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(pub u64);

/// One-shot timer facility.
///
/// When a task comes due the host hands its handle and generation back to
/// [`crate::session::SessionController::on_timer`].
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, generation: u64) -> TaskHandle;
    /// Returns false when the task already fired or was never scheduled
    fn cancel(&mut self, handle: TaskHandle) -> bool;
}

/// Identifies a view (window, tab, buffer) of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub usize);

/// The host's set of views onto files.
pub trait Workspace {
    /// Views already showing `path`
    fn find_views(&self, path: &Path) -> Vec<ViewId>;
    fn activate(&mut self, view: ViewId) -> Result<()>;
    /// False when the current view is modified or special and must not be
    /// replaced
    fn current_view_reusable(&self) -> bool;
    fn open_in_current(&mut self, path: &Path) -> Result<ViewId>;
    fn open_in_new(&mut self, path: &Path) -> Result<ViewId>;
}

/// Everything a picker session needs from its host
pub trait PickerHost: ListDisplay + Scheduler + Workspace {}

impl<T: ListDisplay + Scheduler + Workspace> PickerHost for T {}

/// How a selected path ended up on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenedIn {
    Existing(ViewId),
    Current(ViewId),
    New(ViewId),
}

/// Jumps to a view already showing `path`, or opens it.
///
/// A reusable current view is replaced; otherwise a new view is created.
pub fn open_or_jump<W: Workspace + ?Sized>(workspace: &mut W, path: &Path) -> Result<OpenedIn> {
    if let Some(&view) = workspace.find_views(path).first() {
        workspace.activate(view)?;
        return Ok(OpenedIn::Existing(view));
    }

    if workspace.current_view_reusable() {
        workspace.open_in_current(path).map(OpenedIn::Current)
    } else {
        workspace.open_in_new(path).map(OpenedIn::New)
    }
}

/// Resolves `path` for opening, failing if it vanished after the scan.
pub fn ensure_openable(path: &Path) -> Result<PathBuf> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(PickerError::EditFailure {
            path: path.to_path_buf(),
            reason: "is a directory".to_string(),
        }),
        Ok(_) => Ok(path.to_path_buf()),
        Err(e) => Err(PickerError::EditFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeWorkspace {
        views: Vec<PathBuf>,
        current: usize,
        reusable: bool,
        activated: Vec<ViewId>,
    }

    impl Workspace for FakeWorkspace {
        fn find_views(&self, path: &Path) -> Vec<ViewId> {
            self.views
                .iter()
                .enumerate()
                .filter(|(_, p)| p.as_path() == path)
                .map(|(i, _)| ViewId(i))
                .collect()
        }

        fn activate(&mut self, view: ViewId) -> Result<()> {
            self.current = view.0;
            self.activated.push(view);
            Ok(())
        }

        fn current_view_reusable(&self) -> bool {
            self.reusable
        }

        fn open_in_current(&mut self, path: &Path) -> Result<ViewId> {
            if self.views.is_empty() {
                self.views.push(path.to_path_buf());
            } else {
                self.views[self.current] = path.to_path_buf();
            }
            Ok(ViewId(self.current))
        }

        fn open_in_new(&mut self, path: &Path) -> Result<ViewId> {
            self.views.push(path.to_path_buf());
            self.current = self.views.len() - 1;
            Ok(ViewId(self.current))
        }
    }

    mod lister_tests {
        use super::*;

        #[test]
        fn test_fs_lister_reports_kinds_sorted() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join("b.txt"), b"b").unwrap();
            fs::create_dir(temp_dir.path().join("a_dir")).unwrap();

            let entries = FsLister.list(temp_dir.path()).unwrap();

            assert_eq!(
                entries,
                vec![
                    DirEntryInfo::new("a_dir", EntryKind::Dir),
                    DirEntryInfo::new("b.txt", EntryKind::File),
                ]
            );
        }

        #[test]
        fn test_fs_lister_missing_directory_errors() {
            assert!(FsLister.list(Path::new("/nonexistent/dir")).is_err());
        }
    }

    mod open_or_jump_tests {
        use super::*;

        #[test]
        fn test_jumps_to_existing_view() {
            let mut ws = FakeWorkspace {
                views: vec![PathBuf::from("a.rs"), PathBuf::from("b.rs")],
                ..Default::default()
            };

            let opened = open_or_jump(&mut ws, Path::new("b.rs")).unwrap();

            assert_eq!(opened, OpenedIn::Existing(ViewId(1)));
            assert_eq!(ws.activated, vec![ViewId(1)]);
            assert_eq!(ws.views.len(), 2);
        }

        #[test]
        fn test_reuses_current_view() {
            let mut ws = FakeWorkspace {
                views: vec![PathBuf::from("a.rs")],
                reusable: true,
                ..Default::default()
            };

            let opened = open_or_jump(&mut ws, Path::new("c.rs")).unwrap();

            assert_eq!(opened, OpenedIn::Current(ViewId(0)));
            assert_eq!(ws.views, vec![PathBuf::from("c.rs")]);
        }

        #[test]
        fn test_opens_new_view_when_current_is_busy() {
            let mut ws = FakeWorkspace {
                views: vec![PathBuf::from("a.rs")],
                reusable: false,
                ..Default::default()
            };

            let opened = open_or_jump(&mut ws, Path::new("c.rs")).unwrap();

            assert_eq!(opened, OpenedIn::New(ViewId(1)));
            assert_eq!(ws.views.len(), 2);
        }
    }

    #[test]
    fn test_ensure_openable() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("f.txt");
        fs::write(&file, b"x").unwrap();

        assert!(ensure_openable(&file).is_ok());
        assert!(matches!(
            ensure_openable(temp_dir.path()),
            Err(PickerError::EditFailure { .. })
        ));
        assert!(matches!(
            ensure_openable(&temp_dir.path().join("gone.txt")),
            Err(PickerError::EditFailure { .. })
        ));
    }
}

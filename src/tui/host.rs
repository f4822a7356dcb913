//! The terminal application as a picker host

use crate::error::Result;
use crate::host::{
    ensure_openable, Geometry, ListDisplay, PopupSpec, Scheduler, TaskHandle, ViewId, Workspace,
};
use crate::scheduler::TimerQueue;
use crate::session::PickerKey;
use ratatui::layout::Rect;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Lines moved by one scroll step
const SCROLL_STEP: usize = 3;

/// Popup list state as last set by the session
#[derive(Debug, Clone)]
pub struct PopupWidget {
    pub spec: PopupSpec,
    pub title: String,
    pub lines: Vec<String>,
    pub highlight: usize,
}

impl PopupWidget {
    pub fn new(spec: &PopupSpec) -> Self {
        Self {
            spec: spec.clone(),
            title: spec.title.clone(),
            lines: Vec::new(),
            highlight: 0,
        }
    }

    /// Moves the highlight for a navigation key. `page` is the number of
    /// visible rows.
    pub fn navigate(&mut self, key: PickerKey, page: usize) {
        let Some(last) = self.lines.len().checked_sub(1) else {
            return;
        };
        let page = page.max(1);
        self.highlight = match key {
            PickerKey::ArrowUp => self.highlight.saturating_sub(1),
            PickerKey::ArrowDown => self.highlight + 1,
            PickerKey::ScrollUp => self.highlight.saturating_sub(SCROLL_STEP),
            PickerKey::ScrollDown => self.highlight + SCROLL_STEP,
            PickerKey::PageUp => self.highlight.saturating_sub(page),
            PickerKey::PageDown => self.highlight + page,
            PickerKey::Home => 0,
            PickerKey::End => last,
            _ => self.highlight,
        }
        .min(last);
    }
}

/// Where the popup goes on a screen of the given size
pub fn popup_area(spec: &PopupSpec, screen: Rect) -> Rect {
    let clamp = |wanted: u16, min: u16, max: u16, available: u16| {
        wanted.max(min).min(max).min(available)
    };
    let width = clamp(
        screen.width.saturating_mul(4) / 5,
        spec.min_width,
        spec.max_width,
        screen.width,
    );
    let height = clamp(
        screen.height.saturating_mul(3) / 5,
        spec.min_height,
        spec.max_height,
        screen.height,
    );

    Rect {
        x: screen.x + (screen.width - width) / 2,
        y: screen.y + (screen.height - height) / 2,
        width,
        height,
    }
}

/// A file shown in the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub path: PathBuf,
    /// Modification time when the view was opened
    opened_mtime: Option<SystemTime>,
}

impl View {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            opened_mtime: mtime(path),
        }
    }

    /// The file changed on disk since the view was opened, e.g. it was
    /// edited in the launched editor
    pub fn is_modified(&self) -> bool {
        mtime(&self.path) != self.opened_mtime
    }
}

fn mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Views opened from the picker. Index 0 is the scratch view, which is
/// special and never replaced.
#[derive(Debug, Default)]
pub struct TerminalWorkspace {
    views: Vec<View>,
    /// 0 is the scratch view, `n` is `views[n - 1]`
    current: usize,
    pending_launch: Option<PathBuf>,
}

impl TerminalWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn current_view(&self) -> Option<&View> {
        self.current.checked_sub(1).and_then(|i| self.views.get(i))
    }

    /// Position in the on-screen list, scratch first
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn next(&mut self) {
        if self.current < self.views.len() {
            self.current += 1;
        }
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Queues the current view's file for launching
    pub fn relaunch_current(&mut self) {
        self.pending_launch = self.current_view().map(|v| v.path.clone());
    }

    /// File waiting to be launched once the terminal is released
    pub fn take_pending_launch(&mut self) -> Option<PathBuf> {
        self.pending_launch.take()
    }
}

impl Workspace for TerminalWorkspace {
    fn find_views(&self, path: &Path) -> Vec<ViewId> {
        self.views
            .iter()
            .enumerate()
            .filter(|(_, v)| v.path == path)
            .map(|(i, _)| ViewId(i + 1))
            .collect()
    }

    fn activate(&mut self, view: ViewId) -> Result<()> {
        let path = match view.0.checked_sub(1).and_then(|i| self.views.get(i)) {
            Some(v) => ensure_openable(&v.path)?,
            None => return Ok(()),
        };
        self.current = view.0;
        self.pending_launch = Some(path);
        Ok(())
    }

    fn current_view_reusable(&self) -> bool {
        self.current_view().is_some_and(|v| !v.is_modified())
    }

    fn open_in_current(&mut self, path: &Path) -> Result<ViewId> {
        let path = ensure_openable(path)?;
        match self.current.checked_sub(1) {
            Some(i) if i < self.views.len() => {
                self.views[i] = View::new(&path);
                self.pending_launch = Some(path);
                Ok(ViewId(self.current))
            }
            _ => self.open_in_new(&path),
        }
    }

    fn open_in_new(&mut self, path: &Path) -> Result<ViewId> {
        let path = ensure_openable(path)?;
        self.views.push(View::new(&path));
        self.current = self.views.len();
        self.pending_launch = Some(path);
        Ok(ViewId(self.current))
    }
}

/// Host state shared between the event loop and the renderer
#[derive(Debug)]
pub struct TerminalHost {
    pub popup: Option<PopupWidget>,
    pub status: Option<String>,
    pub timers: TimerQueue,
    pub workspace: TerminalWorkspace,
    screen: Rect,
}

impl TerminalHost {
    pub fn new(screen: Rect) -> Self {
        Self {
            popup: None,
            status: None,
            timers: TimerQueue::new(),
            workspace: TerminalWorkspace::new(),
            screen,
        }
    }

    pub fn set_screen(&mut self, screen: Rect) {
        self.screen = screen;
    }

    pub fn popup_area(&self) -> Option<Rect> {
        self.popup
            .as_ref()
            .map(|popup| popup_area(&popup.spec, self.screen))
    }

    /// Handles a navigation key the session did not consume
    pub fn forward(&mut self, key: PickerKey) {
        let page = self.geometry().height as usize;
        if let Some(popup) = self.popup.as_mut() {
            popup.navigate(key, page);
        }
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}

impl ListDisplay for TerminalHost {
    fn create(&mut self, spec: &PopupSpec) {
        self.popup = Some(PopupWidget::new(spec));
    }

    fn set_title(&mut self, title: &str) {
        if let Some(popup) = self.popup.as_mut() {
            popup.title = title.to_string();
        }
    }

    fn set_lines(&mut self, lines: Vec<String>) {
        if let Some(popup) = self.popup.as_mut() {
            popup.highlight = popup.highlight.min(lines.len().saturating_sub(1));
            popup.lines = lines;
        }
    }

    fn geometry(&self) -> Geometry {
        // Borders take one cell on each side
        self.popup_area()
            .map(|area| Geometry {
                width: area.width.saturating_sub(2),
                height: area.height.saturating_sub(2),
            })
            .unwrap_or_default()
    }

    fn selected(&self) -> Option<usize> {
        self.popup
            .as_ref()
            .filter(|popup| !popup.lines.is_empty())
            .map(|popup| popup.highlight)
    }

    fn set_highlight(&mut self, index: usize) {
        if let Some(popup) = self.popup.as_mut() {
            popup.highlight = index.min(popup.lines.len().saturating_sub(1));
        }
    }

    fn close(&mut self) {
        self.popup = None;
    }

    fn notify(&mut self, message: &str) {
        self.status = Some(message.to_string());
    }
}

impl Scheduler for TerminalHost {
    fn schedule(&mut self, delay: Duration, generation: u64) -> TaskHandle {
        self.timers.schedule(delay, generation)
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.timers.cancel(handle)
    }
}

impl Workspace for TerminalHost {
    fn find_views(&self, path: &Path) -> Vec<ViewId> {
        self.workspace.find_views(path)
    }

    fn activate(&mut self, view: ViewId) -> Result<()> {
        self.workspace.activate(view)
    }

    fn current_view_reusable(&self) -> bool {
        self.workspace.current_view_reusable()
    }

    fn open_in_current(&mut self, path: &Path) -> Result<ViewId> {
        self.workspace.open_in_current(path)
    }

    fn open_in_new(&mut self, path: &Path) -> Result<ViewId> {
        self.workspace.open_in_new(path)
    }
}

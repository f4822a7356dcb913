//! Picker session lifecycle.
//!
//! [`SessionController`] owns the one live [`SessionHandle`] and is the
//! only code that mutates scan and filter state. It is driven from two
//! places on the same cooperative loop: key events from the host, and scan
//! ticks handed back by the host's [`Scheduler`](crate::host::Scheduler).
//! Every tick carries the generation of the session that scheduled it, so a
//! tick that outlives its session is recognised and dropped.

use crate::domain::{
    format_labels, scan_step, FilterState, PathFilter, PathNormalizer, ScanState,
    DEFAULT_SCAN_BUDGET,
};
use crate::error::PickerError;
use crate::host::{
    open_or_jump, DirectoryLister, ListDisplay, OpenedIn, PickerHost, PopupSpec, TaskHandle,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Delay between two scan steps
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub root: PathBuf,
    pub scan_budget: Duration,
    pub scan_interval: Duration,
    pub filter: PathFilter,
    pub normalizer: PathNormalizer,
    pub popup: PopupSpec,
}

impl SessionConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scan_budget: DEFAULT_SCAN_BUDGET,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            filter: PathFilter::new(),
            normalizer: PathNormalizer::from_env(),
            popup: PopupSpec::default(),
        }
    }
}

/// Input events the picker understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKey {
    Backspace,
    ClearLine,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Home,
    End,
    ArrowUp,
    ArrowDown,
    PrintableChar(char),
    Space,
    Escape,
    Other,
}

impl PickerKey {
    /// Keys the list widget handles by itself
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            PickerKey::ScrollUp
                | PickerKey::ScrollDown
                | PickerKey::PageUp
                | PickerKey::PageDown
                | PickerKey::Home
                | PickerKey::End
                | PickerKey::ArrowUp
                | PickerKey::ArrowDown
        )
    }
}

/// Characters accepted into the query
pub fn is_filename_char(c: char) -> bool {
    c.is_alphanumeric() || "/.-_+,#$%~=".contains(c)
}

/// Whether the picker used a key or the host should handle it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Consumed,
    Forward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Scanning,
    Idle,
    /// The scan finished without files; the session stays open but inert
    Empty,
}

/// What a scan tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belonged to a closed or replaced session
    Stale,
    Progress { appended: usize, complete: bool },
    Empty,
}

#[derive(Debug)]
pub enum SelectionOutcome {
    /// No session was open
    NotOpen,
    Cancelled,
    Opened { path: PathBuf, opened_in: OpenedIn },
    /// The session closed but the path could not be shown
    Failed { path: PathBuf, error: PickerError },
}

/// State of the live picker session
#[derive(Debug)]
pub struct SessionHandle {
    generation: u64,
    scan: ScanState,
    filter: FilterState,
    task: Option<TaskHandle>,
    phase: SessionPhase,
}

impl SessionHandle {
    fn new(generation: u64, query: &str) -> Self {
        let mut scan = ScanState::new();
        scan.reset();
        Self {
            generation,
            scan,
            filter: FilterState::new(query),
            task: None,
            phase: SessionPhase::Scanning,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scan(&self) -> &ScanState {
        &self.scan
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn query(&self) -> &str {
        &self.filter.query
    }

    pub fn pending_task(&self) -> Option<TaskHandle> {
        self.task
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }
}

/// Applies a query edit; false when `key` does not edit the query.
fn edit_query(query: &mut String, key: PickerKey) -> bool {
    match key {
        PickerKey::Backspace => {
            query.pop();
        }
        PickerKey::ClearLine => query.clear(),
        PickerKey::Space => query.push(' '),
        PickerKey::PrintableChar(c) if is_filename_char(c) => query.push(c),
        _ => return false,
    }
    true
}

/// Records which path sits under the host's highlight right now.
fn remember_selection<D: ListDisplay + ?Sized>(session: &mut SessionHandle, display: &D) {
    if let Some(index) = display.selected() {
        if let Some(path) = session.filter.matched.get(index) {
            session.filter.selected = Some(path.clone());
        }
    }
}

fn title(config: &SessionConfig, session: &SessionHandle) -> String {
    let mut title = format!(
        "{} {}/{}",
        config.popup.title,
        session.filter.matched.len(),
        session.scan.discovered.len()
    );
    if session.phase == SessionPhase::Scanning {
        title.push_str(" (scanning)");
    }
    if !session.filter.query.is_empty() {
        title.push_str(" > ");
        title.push_str(&session.filter.query);
    }
    title
}

/// Rematches, reformats and redraws the list, keeping the highlight on
/// the remembered path when it survived.
fn refresh<D: ListDisplay + ?Sized>(
    config: &SessionConfig,
    session: &mut SessionHandle,
    display: &mut D,
) {
    session.filter.rematch(&session.scan.discovered);

    let width = display.geometry().width as usize;
    display.set_lines(format_labels(&session.filter.matched, width));
    display.set_title(&title(config, session));

    let index = session.filter.highlight_index();
    if !session.filter.matched.is_empty() {
        display.set_highlight(index);
    }
    session.filter.selected = session.filter.matched.get(index).cloned();
}

pub struct SessionController {
    config: SessionConfig,
    lister: Box<dyn DirectoryLister>,
    generation: u64,
    session: Option<SessionHandle>,
}

impl SessionController {
    pub fn new(config: SessionConfig, lister: Box<dyn DirectoryLister>) -> Self {
        Self {
            config,
            lister,
            generation: 0,
            session: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&SessionHandle> {
        self.session.as_ref()
    }

    /// Opens the picker and starts scanning. Does nothing and returns false
    /// when a session is already live.
    pub fn open<H: PickerHost>(&mut self, host: &mut H, initial_query: &str) -> bool {
        if self.session.is_some() {
            return false;
        }

        self.generation += 1;
        info!(
            generation = self.generation,
            root = %self.config.root.display(),
            "opening picker"
        );

        host.create(&self.config.popup);
        host.set_lines(Vec::new());
        self.session = Some(SessionHandle::new(self.generation, initial_query));
        self.step(host, true);
        true
    }

    /// Opens when closed, closes when open.
    pub fn toggle<H: PickerHost>(&mut self, host: &mut H) -> KeyDisposition {
        if self.session.is_some() {
            self.close(host);
        } else {
            self.open(host, "");
        }
        KeyDisposition::Consumed
    }

    /// Cancels the pending scan tick, closes the list and drops all state.
    pub fn close<H: PickerHost>(&mut self, host: &mut H) {
        if let Some(session) = self.session.take() {
            if let Some(task) = session.task {
                host.cancel(task);
            }
            host.close();
            info!(generation = session.generation, "picker closed");
        }
    }

    pub fn handle_key<H: PickerHost>(&mut self, host: &mut H, key: PickerKey) -> KeyDisposition {
        if self.session.is_none() {
            return KeyDisposition::Forward;
        }
        if key == PickerKey::Escape {
            self.close(host);
            return KeyDisposition::Consumed;
        }

        let Some(session) = self.session.as_mut() else {
            return KeyDisposition::Forward;
        };
        remember_selection(session, host);
        if !edit_query(&mut session.filter.query, key) {
            return KeyDisposition::Forward;
        }

        debug!(query = %session.filter.query, "query changed");
        refresh(&self.config, session, host);
        KeyDisposition::Consumed
    }

    /// Acts on a choice from the list. `index` is 1-based into the matched
    /// list; zero or less means the user cancelled. The session always ends.
    pub fn handle_selection<H: PickerHost>(&mut self, host: &mut H, index: i64) -> SelectionOutcome {
        let Some(mut session) = self.session.take() else {
            return SelectionOutcome::NotOpen;
        };
        if let Some(task) = session.task.take() {
            host.cancel(task);
        }
        host.close();

        let chosen = usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| session.filter.matched.get(i));
        let Some(chosen) = chosen else {
            info!(index, "selection cancelled");
            return SelectionOutcome::Cancelled;
        };

        let path = self.config.normalizer.resolve(chosen);
        match open_or_jump(host, &path) {
            Ok(opened_in) => {
                info!(path = %path.display(), ?opened_in, "opened selection");
                SelectionOutcome::Opened { path, opened_in }
            }
            Err(error) => {
                warn!(%error, "failed to open selection");
                host.notify(&error.to_string());
                SelectionOutcome::Failed { path, error }
            }
        }
    }

    /// Runs the scan step a host timer was scheduled for.
    pub fn on_timer<H: PickerHost>(
        &mut self,
        host: &mut H,
        handle: TaskHandle,
        generation: u64,
    ) -> TickOutcome {
        let live = self
            .session
            .as_ref()
            .is_some_and(|s| s.generation == generation && s.task == Some(handle));
        if !live {
            let stale = PickerError::StaleCallback { generation };
            debug!(%stale, ?handle, "dropping timer");
            return TickOutcome::Stale;
        }
        self.step(host, false)
    }

    fn step<H: PickerHost>(&mut self, host: &mut H, first: bool) -> TickOutcome {
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Stale;
        };
        let config = &self.config;
        session.task = None;
        remember_selection(session, host);

        let start = first.then_some(config.root.as_path());
        let outcome = scan_step(
            &mut session.scan,
            self.lister.as_ref(),
            &config.filter,
            &config.normalizer,
            start,
            config.scan_budget,
        );

        if outcome.normalized {
            if let Some(selected) = session.filter.selected.take() {
                session.filter.selected = Some(config.normalizer.normalize(&selected));
            }
        }

        if !outcome.complete {
            session.task = Some(host.schedule(config.scan_interval, session.generation));
        } else if session.scan.discovered.is_empty() {
            session.phase = SessionPhase::Empty;
            let empty = PickerError::EmptyResult {
                root: config.root.clone(),
            };
            info!(%empty, "scan finished empty");
            refresh(config, session, host);
            host.notify(&empty.to_string());
            return TickOutcome::Empty;
        } else {
            session.phase = SessionPhase::Idle;
            info!(files = session.scan.discovered.len(), "scan finished");
        }

        if first || outcome.appended > 0 || outcome.complete {
            refresh(config, session, host);
        }

        TickOutcome::Progress {
            appended: outcome.appended,
            complete: outcome.complete,
        }
    }
}

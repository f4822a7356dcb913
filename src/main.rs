use fpick::cli::{AppConfig, Args};
use fpick::config::UserConfig;
use fpick::file_opener::open_file;
use fpick::host::{FsLister, ListDisplay};
use fpick::logging;
use fpick::session::{KeyDisposition, SelectionOutcome, SessionController};
use fpick::tui::{
    handle_key_event, handle_popup_key, pressed_key, render, KeyAction, PopupAction,
    TerminalHost,
};

use crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::path::PathBuf;
use std::{
    io,
    time::{Duration, Instant},
};
use tracing::{info, warn};

/// Longest wait for input before checking timers again
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Load user configuration
    let user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    let config = AppConfig::resolve(args, user_config);

    match logging::init(config.log_file.as_deref()) {
        Ok(Some(path)) => info!(log = %path.display(), "logging started"),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: Failed to open log file: {}", e),
    }

    // Run the app
    let chosen = run_app_with_config(&config)?;

    if let Some(path) = chosen {
        println!("{}", path.display());
    }
    Ok(())
}

/// Runs the TUI application. Returns the chosen path in print mode.
pub fn run_app_with_config(config: &AppConfig) -> io::Result<Option<PathBuf>> {
    let mut controller = SessionController::new(config.session_config(), Box::new(FsLister));
    let mut host = TerminalHost::new(Rect::default());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(&mut terminal, &mut controller, &mut host, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Suspends the TUI terminal to allow external programs to run
fn suspend_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Resumes the TUI terminal after external program exits
fn resume_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(())
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
    controller: &mut SessionController,
    host: &mut TerminalHost,
    config: &AppConfig,
) -> io::Result<Option<PathBuf>> {
    // The first frame sizes the popup before the picker fills it
    terminal.draw(|frame| render(frame, host, &config.directory))?;
    controller.open(host, &config.query);

    loop {
        terminal.draw(|frame| render(frame, host, &config.directory))?;

        let timeout = host
            .timers
            .time_until_next(Instant::now())
            .map_or(POLL_INTERVAL, |due| due.min(POLL_INTERVAL));

        // Handle input
        if event::poll(timeout)? {
            if let Some(key) = pressed_key(event::read()?) {
                if controller.is_open() {
                    match handle_popup_key(key) {
                        PopupAction::Toggle => {
                            controller.toggle(host);
                        }
                        PopupAction::Confirm => {
                            let index = host.selected().map_or(0, |i| i as i64 + 1);
                            if let SelectionOutcome::Opened { path, .. } =
                                controller.handle_selection(host, index)
                            {
                                if config.print {
                                    return Ok(Some(path));
                                }
                            }
                        }
                        PopupAction::Key(picker_key) => {
                            let disposition = controller.handle_key(host, picker_key);
                            if disposition == KeyDisposition::Forward && picker_key.is_navigation()
                            {
                                host.forward(picker_key);
                            }
                        }
                    }
                } else {
                    match handle_key_event(key) {
                        KeyAction::Quit => break,
                        KeyAction::TogglePicker => {
                            host.clear_status();
                            controller.toggle(host);
                        }
                        KeyAction::OpenCurrent => host.workspace.relaunch_current(),
                        KeyAction::NextView => host.workspace.next(),
                        KeyAction::PreviousView => host.workspace.previous(),
                        KeyAction::None => {}
                    }
                }
            }
        }

        // Run scan steps whose time has come
        let now = Instant::now();
        while let Some(due) = host.timers.pop_due(now) {
            controller.on_timer(host, due.handle, due.generation);
        }

        if config.print {
            continue;
        }

        if let Some(path) = host.workspace.take_pending_launch() {
            // Suspend terminal before opening external program
            if let Err(e) = suspend_terminal(terminal) {
                warn!(error = %e, "failed to suspend terminal");
                continue;
            }

            // Open the file (blocking call)
            let open_result = open_file(&path, config.open_with);

            // Resume terminal after external program exits
            resume_terminal(terminal)?;

            if let Err(e) = open_result {
                warn!(error = %e, "failed to open file");
                host.notify(&e.to_string());
            }
        }
    }

    Ok(None)
}

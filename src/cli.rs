// CLI module for argument parsing and configuration

use crate::config::{OpenWith, UserConfig};
use crate::domain::{PathFilter, PathNormalizer};
use crate::session::SessionConfig;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Fpick - an incremental fuzzy file picker for the terminal
///
/// Scans a directory tree in the background and narrows the list as you type.
#[derive(Parser, Debug, Clone)]
#[command(name = "fpick")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to scan for files
    ///
    /// If not specified, defaults to the current directory.
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Initial filter text
    #[arg(short = 'q', long = "query", default_value = "")]
    pub query: String,

    /// Time budget of one scan step in milliseconds
    #[arg(long = "budget-ms")]
    pub budget_ms: Option<u64>,

    /// Pause between scan steps in milliseconds
    #[arg(long = "interval-ms")]
    pub interval_ms: Option<u64>,

    /// Hide names ending in this suffix (repeatable)
    ///
    /// Example: --exclude-ext .pyc --exclude-ext .class
    #[arg(short = 'x', long = "exclude-ext")]
    pub exclude: Vec<String>,

    /// How to open the chosen file
    #[arg(long = "open-with", value_enum)]
    pub open_with: Option<OpenWithArg>,

    /// Print the chosen path to stdout and exit instead of opening it
    #[arg(short = 'p', long = "print", action = ArgAction::SetTrue)]
    pub print: bool,

    /// Write logs to this file (filter with FPICK_LOG)
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OpenWithArg {
    /// $VISUAL or $EDITOR
    Editor,
    /// The system's default application
    System,
}

impl From<OpenWithArg> for OpenWith {
    fn from(arg: OpenWithArg) -> Self {
        match arg {
            OpenWithArg::Editor => OpenWith::Editor,
            OpenWithArg::System => OpenWith::System,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if !self.directory.exists() {
            return Err(format!(
                "Directory does not exist: {}",
                self.directory.display()
            ));
        }

        if !self.directory.is_dir() {
            return Err(format!(
                "Path is not a directory: {}",
                self.directory.display()
            ));
        }

        if self.interval_ms == Some(0) {
            return Err("interval-ms must be greater than zero".to_string());
        }

        Ok(())
    }
}

/// Settings for one run, merged from the config file and the command line
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory: PathBuf,
    pub query: String,
    pub scan_budget: Duration,
    pub scan_interval: Duration,
    pub ignore_suffixes: Vec<String>,
    pub open_with: OpenWith,
    pub print: bool,
    pub log_file: Option<PathBuf>,
    pub user: UserConfig,
}

impl AppConfig {
    /// Command-line values win over the config file
    pub fn resolve(args: Args, user: UserConfig) -> Self {
        let mut ignore_suffixes = user.ignore_suffixes.clone();
        ignore_suffixes.extend(args.exclude);

        AppConfig {
            directory: args.directory,
            query: args.query,
            scan_budget: Duration::from_millis(args.budget_ms.unwrap_or(user.scan_budget_ms)),
            scan_interval: Duration::from_millis(
                args.interval_ms.unwrap_or(user.scan_interval_ms),
            ),
            ignore_suffixes,
            open_with: args.open_with.map(Into::into).unwrap_or(user.open_with),
            print: args.print,
            log_file: args.log_file,
            user,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            root: self.directory.clone(),
            scan_budget: self.scan_budget,
            scan_interval: self.scan_interval,
            filter: PathFilter::with_suffixes(self.ignore_suffixes.iter().cloned()),
            normalizer: PathNormalizer::from_env(),
            popup: self.user.popup_spec(),
        }
    }
}

/// Structured logging for the EFH grouping service
///
/// Provides context-rich logging with pipeline stage and task identifiers,
/// timestamps, and severity levels. Supports console output and an
/// optional append-only log file for batch runs.
///
/// Nothing is emitted until `init_logger` has been called, so library
/// callers and unit tests stay quiet by default.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline Stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    Normalize,
    Grouping,
    Compliance,
    Nesting,
    System,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ingest => write!(f, "INGEST"),
            Stage::Normalize => write!(f, "NORM"),
            Stage::Grouping => write!(f, "GROUP"),
            Stage::Compliance => write!(f, "COMPL"),
            Stage::Nesting => write!(f, "NEST"),
            Stage::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    fn format_entry(level: LogLevel, stage: Stage, task_id: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let task_part = task_id.map(|t| format!(" [{}]", t)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, stage, task_part, message)
    }

    fn log(&self, level: LogLevel, stage: Stage, task_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, stage, task_id, message);
        let task_part = task_id.map(|t| format!(" [{}]", t)).unwrap_or_default();

        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", stage, task_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", stage, task_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}{}: {}", stage, task_part, message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger. Calling it again replaces the settings.
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    let logger = Logger {
        min_level,
        log_file: log_file.map(String::from),
        console_timestamps,
    };
    if let Ok(mut slot) = LOGGER.lock() {
        *slot = Some(logger);
    }
}

fn emit(level: LogLevel, stage: Stage, task_id: Option<&str>, message: &str) {
    if let Ok(slot) = LOGGER.lock() {
        if let Some(logger) = slot.as_ref() {
            logger.log(level, stage, task_id, message);
        }
    }
}

/// Log a general informational message
pub fn info(stage: Stage, task_id: Option<&str>, message: &str) {
    emit(LogLevel::Info, stage, task_id, message);
}

/// Log a warning message
pub fn warn(stage: Stage, task_id: Option<&str>, message: &str) {
    emit(LogLevel::Warning, stage, task_id, message);
}

/// Log an error message
pub fn error(stage: Stage, task_id: Option<&str>, message: &str) {
    emit(LogLevel::Error, stage, task_id, message);
}

/// Log a debug message
pub fn debug(stage: Stage, task_id: Option<&str>, message: &str) {
    emit(LogLevel::Debug, stage, task_id, message);
}

// ---------------------------------------------------------------------------
// Run Summary Logging
// ---------------------------------------------------------------------------

/// Level a run summary should be logged at, given its task counts.
pub fn summary_level(total: usize, grouped: usize) -> LogLevel {
    if grouped == 0 {
        LogLevel::Error
    } else if grouped < total {
        LogLevel::Warning
    } else {
        LogLevel::Info
    }
}

/// Log a summary of one analysis run
pub fn log_run_summary(total: usize, grouped: usize, in_group: usize, out_of_phase: usize) {
    let message = format!(
        "Run complete: {}/{} tasks grouped ({} excluded), {} in-group, {} out-of-phase",
        grouped,
        total,
        total - grouped.min(total),
        in_group,
        out_of_phase
    );
    emit(summary_level(total, grouped), Stage::System, None, &message);
}

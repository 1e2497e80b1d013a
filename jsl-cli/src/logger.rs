use chrono::Local;
use colored::Colorize;
use jsl_lib::common::common::Common;
use log::{Log, Metadata, Record};
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Global debug flag
static DEBUG_MODE: AtomicBool = AtomicBool::new(false);

/// Enable debug logging
pub fn enable_debug() {
    DEBUG_MODE.store(true, Ordering::Relaxed);
}

/// Check if debug mode is enabled
pub fn is_debug_enabled() -> bool {
    DEBUG_MODE.load(Ordering::Relaxed)
}

/// Line oriented sink; every call writes one whole line.
pub trait Logger: Send + Sync {
    fn log(&self, message: String);
}

/// Standard output logger for CLI mode
pub struct StdoutLogger;

impl Logger for StdoutLogger {
    fn log(&self, message: String) {
        // println! holds the stdout lock for the whole line
        println!("{}", message);
    }
}

/// Keeps messages in memory, used to inspect what a session reported.
#[allow(dead_code)]
pub struct CollectingLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl CollectingLogger {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Logger for CollectingLogger {
    fn log(&self, message: String) {
        let mut messages = match self.messages.lock() {
            Ok(messages) => messages,
            Err(poisoned) => poisoned.into_inner(),
        };
        messages.push(message);
        // Keep only last 100 messages to avoid memory growth
        if messages.len() > 100 {
            messages.remove(0);
        }
    }
}

/// Global logger instance
static GLOBAL_LOGGER: OnceCell<Arc<dyn Logger>> = OnceCell::new();

/// Log a message using the global logger
pub fn log(message: String) {
    if let Some(logger) = GLOBAL_LOGGER.get() {
        logger.log(message);
    } else {
        println!("{}", message);
    }
}

/// Log an info message
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::logger::log(format!($($arg)*))
    };
}

/// Log a warning message
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::logger::log(format!("⚠️  {}", format!($($arg)*)))
    };
}

/// Log an error message
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::logger::log(format!("❌ {}", format!($($arg)*)))
    };
}

/// Log a success message
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::logger::log(format!("✓ {}", format!($($arg)*)))
    };
}

/// Get the default logger (stdout)
pub fn stdout_logger() -> Arc<dyn Logger> {
    Arc::new(StdoutLogger)
}

/// The global logger, stdout when none was installed.
pub fn global_logger() -> Arc<dyn Logger> {
    GLOBAL_LOGGER.get().cloned().unwrap_or_else(stdout_logger)
}

/// `HH:MM:SS - message` in green.
pub fn timestamped_success(message: &str) -> String {
    format!(
        "{} {}",
        Common::clock_time(&Local::now()),
        format!("- {}", message).green()
    )
}

/// `HH:MM:SS - message` in red.
pub fn timestamped_error(message: &str) -> String {
    format!(
        "{} {}",
        Common::clock_time(&Local::now()),
        format!("- {}", message).red()
    )
}

/// A bridge that implements log::Log to route log crate messages to our custom logger
struct LogBridge {
    logger: Arc<dyn Logger>,
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level_prefix = match record.level() {
            log::Level::Error => "❌",
            log::Level::Warn => "⚠️",
            log::Level::Info => "ℹ️",
            log::Level::Debug => "🔍",
            log::Level::Trace => "🔬",
        };

        let message = format!("{} {}", level_prefix, record.args());
        self.logger.log(message);
    }

    fn flush(&self) {}
}

/// Initialize both the custom logger and the log crate backend
pub fn init_logger_with_log_bridge(logger: Arc<dyn Logger>) {
    GLOBAL_LOGGER.set(logger.clone()).ok();

    let bridge = LogBridge { logger };
    log::set_boxed_logger(Box::new(bridge)).ok();

    // log crate output is noise unless debugging
    let level = if is_debug_enabled() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    log::set_max_level(level);
}

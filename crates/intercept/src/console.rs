//! Logging interception.

use std::sync::Arc;

use overlog_banner::{Banner, BannerStyle};
use overlog_format::{Formatter, Value};
use overlog_lifecycle::BannerHub;

/// Upper bound on stack lines attached to an error banner.
const MAX_TRACE_LINES: usize = 12;

/// A host logging sink, invoked with the original arguments.
pub type LogSink = Box<dyn Fn(&[Value])>;

/// Logging severity categories the overlay intercepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Log,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// All severities, in installation order.
    pub const ALL: [Level; 5] = [
        Level::Log,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    fn style(self) -> BannerStyle {
        match self {
            Level::Log => BannerStyle::Log,
            Level::Debug => BannerStyle::Debug,
            Level::Info => BannerStyle::Info,
            Level::Warn => BannerStyle::Warn,
            Level::Error => BannerStyle::Error,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Level::Log => "log",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// Per-severity host sinks handed over at installation.
#[derive(Default)]
pub struct ConsoleSinks {
    pub log: Option<LogSink>,
    pub debug: Option<LogSink>,
    pub info: Option<LogSink>,
    pub warn: Option<LogSink>,
    pub error: Option<LogSink>,
}

impl ConsoleSinks {
    fn get(&self, level: Level) -> Option<&LogSink> {
        match level {
            Level::Log => self.log.as_ref(),
            Level::Debug => self.debug.as_ref(),
            Level::Info => self.info.as_ref(),
            Level::Warn => self.warn.as_ref(),
            Level::Error => self.error.as_ref(),
        }
    }
}

/// Wrapped logging entry points.
///
/// Each call invokes the host's original sink with identical arguments
/// first — a fault in it propagates to the caller untouched — and only
/// then runs the display side, whose failures are swallowed.
pub struct Console {
    hub: Arc<BannerHub>,
    sinks: ConsoleSinks,
    formatter: Formatter,
}

impl Console {
    /// Wraps the given sinks. Missing sinks are surfaced once here and
    /// their intercepts skipped.
    pub fn new(hub: Arc<BannerHub>, sinks: ConsoleSinks, formatter: Formatter) -> Self {
        for level in Level::ALL {
            if sinks.get(level).is_none() {
                tracing::warn!(level = level.name(), "host has no logging sink, intercept skipped");
            }
        }
        Self {
            hub,
            sinks,
            formatter,
        }
    }

    pub fn log(&self, args: &[Value]) {
        self.call(Level::Log, args);
    }

    pub fn debug(&self, args: &[Value]) {
        self.call(Level::Debug, args);
    }

    pub fn info(&self, args: &[Value]) {
        self.call(Level::Info, args);
    }

    pub fn warn(&self, args: &[Value]) {
        self.call(Level::Warn, args);
    }

    pub fn error(&self, args: &[Value]) {
        self.call(Level::Error, args);
    }

    /// Invokes the wrapped sink for `level`.
    pub fn call(&self, level: Level, args: &[Value]) {
        let Some(original) = self.sinks.get(level) else {
            return; // Intercept skipped at install.
        };

        original(args);
        self.show(level, args);
    }

    /// Display side channel.
    fn show(&self, level: Level, args: &[Value]) {
        let (text, shadow) = self.formatter.format_args(args);
        let banner = Banner::new(level.style(), text, shadow);

        if level == Level::Error {
            if let Err(e) = banner.set_stack_trace(capture_stack()) {
                tracing::debug!(error = %e, "stack trace not attached");
            }
        }

        self.hub.admit(banner);
    }
}

/// Captures the current call stack as trimmed display lines.
fn capture_stack() -> Vec<String> {
    std::backtrace::Backtrace::force_capture()
        .to_string()
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_TRACE_LINES)
        .collect()
}

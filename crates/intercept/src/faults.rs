//! Global fault interception: uncaught errors and unhandled rejections.

use std::sync::Arc;

use overlog_banner::{Banner, BannerStyle};
use overlog_format::{Formatter, ShadowForm, Value};
use overlog_lifecycle::BannerHub;

/// Handlers the host's global fault notifications feed.
///
/// Each produces an `error`-style banner; neither alters how the host
/// observes the fault itself.
pub struct FaultHooks {
    hub: Arc<BannerHub>,
    formatter: Formatter,
}

impl FaultHooks {
    pub fn new(hub: Arc<BannerHub>, formatter: Formatter) -> Self {
        Self { hub, formatter }
    }

    /// An uncaught synchronous error reached the host's global handler.
    pub fn uncaught_error(&self, message: &str, stack: Option<&str>) -> Banner {
        self.show(message.to_string(), vec![], stack)
    }

    /// An asynchronous rejection was never handled; the reason value runs
    /// through the serializer like any logged argument.
    pub fn unhandled_rejection(&self, reason: &Value, stack: Option<&str>) -> Banner {
        let (text, shadow) = self.formatter.format_args(std::slice::from_ref(reason));
        self.show(text, shadow, stack)
    }

    fn show(&self, text: String, shadow: Vec<ShadowForm>, stack: Option<&str>) -> Banner {
        let banner = Banner::new(BannerStyle::Error, text, shadow);

        let lines: Vec<String> = stack
            .unwrap_or_default()
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        if !lines.is_empty() {
            if let Err(e) = banner.set_stack_trace(lines) {
                tracing::debug!(error = %e, "stack trace not attached");
            }
        }

        self.hub.admit(banner)
    }
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local};
use overlog_format::ShadowForm;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::style::BannerStyle;

/// Ids are process-unique; render surfaces key their visual handles on them.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Errors from banner state mutations.
#[derive(Debug, thiserror::Error)]
pub enum BannerError {
    #[error("invalid style transition: {from:?} -> {to:?}")]
    InvalidTransition { from: BannerStyle, to: BannerStyle },

    #[error("stack trace already set")]
    StackTraceAlreadySet,
}

/// Upload progress attached to a network banner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub percent_complete: u8,
    pub bytes_transferred: u64,
    pub bytes_total: u64,
}

impl Progress {
    /// Derives progress from byte counts; a zero total reads as complete.
    pub fn from_bytes(transferred: u64, total: u64) -> Self {
        let percent = if total == 0 {
            100
        } else {
            (transferred.saturating_mul(100) / total).min(100) as u8
        };
        Self {
            percent_complete: percent,
            bytes_transferred: transferred,
            bytes_total: total,
        }
    }

    /// Display form: `NN% (cur / total)`, collapsing to the total alone
    /// once complete.
    pub fn display(&self) -> String {
        if self.percent_complete >= 100 {
            format!("{}% ({})", self.percent_complete, format_size(self.bytes_total))
        } else {
            format!(
                "{}% ({} / {})",
                self.percent_complete,
                format_size(self.bytes_transferred),
                format_size(self.bytes_total)
            )
        }
    }
}

/// Humanizes a byte count, one decimal above the byte range.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

/// One intercepted event's display state.
///
/// A cheap cloneable handle: the interception layer, the hub, and the
/// sweep task all hold the same underlying state. Creation instant and
/// wall-clock timestamp are fixed at construction; everything else
/// mutates behind the lock.
#[derive(Debug, Clone)]
pub struct Banner {
    id: u64,
    created_at: Instant,
    timestamp: DateTime<Local>,
    inner: Arc<Mutex<BannerState>>,
}

#[derive(Debug)]
struct BannerState {
    style: BannerStyle,
    autohide_modifier: Duration,
    text: Vec<String>,
    stack_trace: Option<Vec<String>>,
    progress: Option<Progress>,
    shadow: Vec<ShadowForm>,
}

impl Banner {
    /// Creates a banner with its initial formatted text and the shadow
    /// forms of the arguments it was built from.
    pub fn new(style: BannerStyle, text: impl Into<String>, shadow: Vec<ShadowForm>) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            created_at: Instant::now(),
            timestamp: Local::now(),
            inner: Arc::new(Mutex::new(BannerState {
                style,
                autohide_modifier: Duration::ZERO,
                text: vec![text.into()],
                stack_trace: None,
                progress: None,
                shadow,
            })),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Monotonic creation instant, immutable.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Wall-clock time at creation, shown as the first display segment.
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn style(&self) -> BannerStyle {
        self.lock().style
    }

    /// Moves a pending network banner to its settled style.
    pub fn change_style(&self, to: BannerStyle) -> Result<(), BannerError> {
        let mut state = self.lock();
        if !state.style.can_transition(to) {
            return Err(BannerError::InvalidTransition {
                from: state.style,
                to,
            });
        }
        state.style = to;
        Ok(())
    }

    /// Appends one formatted segment to the display line.
    pub fn append_text(&self, segment: impl Into<String>) {
        self.lock().text.push(segment.into());
    }

    /// Snapshot of the display segments, in append order.
    pub fn text(&self) -> Vec<String> {
        self.lock().text.clone()
    }

    /// Grants extra lifetime; the modifier only grows.
    pub fn extend_autohide(&self, extra: Duration) {
        self.lock().autohide_modifier += extra;
    }

    pub fn autohide_modifier(&self) -> Duration {
        self.lock().autohide_modifier
    }

    /// Attaches the captured stack, at most once.
    pub fn set_stack_trace(&self, lines: Vec<String>) -> Result<(), BannerError> {
        let mut state = self.lock();
        if state.stack_trace.is_some() {
            return Err(BannerError::StackTraceAlreadySet);
        }
        state.stack_trace = Some(lines);
        Ok(())
    }

    pub fn stack_trace(&self) -> Option<Vec<String>> {
        self.lock().stack_trace.clone()
    }

    /// Replaces upload progress in place.
    pub fn set_progress(&self, progress: Progress) {
        self.lock().progress = Some(progress);
    }

    pub fn progress(&self) -> Option<Progress> {
        self.lock().progress
    }

    /// Shadow forms preserved from the arguments the banner was built from.
    pub fn shadow(&self) -> Vec<ShadowForm> {
        self.lock().shadow.clone()
    }

    /// The rendered line: wall-clock timestamp plus all segments, joined
    /// with single spaces.
    pub fn display_line(&self) -> String {
        let state = self.lock();
        let mut parts = vec![self.timestamp.format("%H:%M:%S:%3f").to_string()];
        parts.extend(state.text.iter().cloned());
        parts.join(" ")
    }

    /// Whether the banner's age exceeds `delay` once the accumulated life
    /// extension is spent.
    pub fn expired(&self, now: Instant, delay: Duration) -> bool {
        now.duration_since(self.created_at) > delay + self.lock().autohide_modifier
    }

    fn lock(&self) -> MutexGuard<'_, BannerState> {
        self.inner.lock().unwrap()
    }
}

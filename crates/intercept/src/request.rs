//! Legacy request-open interception with upload progress tracking.

use std::sync::Arc;

use overlog_banner::{Banner, BannerStyle, Progress};
use overlog_lifecycle::{BannerHub, SWEEP_INTERVAL};

use crate::fetch::normalize_url;

/// The host's original request-open primitive.
pub type OpenFn = Box<dyn Fn(&str, &str)>;

/// Verbs that carry a request body worth tracking.
const UPLOAD_VERBS: [&str; 3] = ["POST", "PUT", "PATCH"];

/// Wrapped request-open entry point.
pub struct RequestOpen {
    hub: Arc<BannerHub>,
    original: OpenFn,
    page_host: Option<String>,
}

impl RequestOpen {
    pub fn new(hub: Arc<BannerHub>, original: OpenFn, page_host: Option<String>) -> Self {
        Self {
            hub,
            original,
            page_host,
        }
    }

    /// Invokes the wrapped open call and returns the tracked request the
    /// host's progress event stream feeds.
    pub fn open(&self, method: &str, url: &str) -> TrackedRequest {
        (self.original)(method, url);

        let text = format!(
            "{} {}",
            method,
            normalize_url(url, self.page_host.as_deref())
        );
        let banner = self
            .hub
            .admit(Banner::new(BannerStyle::NetworkPending, text, vec![]));

        TrackedRequest {
            banner,
            tracks_upload: is_upload_verb(method),
        }
    }
}

/// One opened request; upload-capable verbs get a progress tracker.
pub struct TrackedRequest {
    banner: Banner,
    tracks_upload: bool,
}

impl TrackedRequest {
    /// Feeds one progress event: replaces the banner's progress state and
    /// extends its lifetime so an active transfer is not hidden
    /// mid-flight. Ignored for non-upload verbs.
    pub fn upload_progress(&self, transferred: u64, total: u64) {
        if !self.tracks_upload {
            return;
        }
        self.banner
            .set_progress(Progress::from_bytes(transferred, total));
        self.banner.extend_autohide(SWEEP_INTERVAL);
    }

    pub fn tracks_upload(&self) -> bool {
        self.tracks_upload
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }
}

fn is_upload_verb(method: &str) -> bool {
    UPLOAD_VERBS.iter().any(|v| method.eq_ignore_ascii_case(v))
}

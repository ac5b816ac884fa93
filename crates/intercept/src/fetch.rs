//! Network-fetch interception.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use overlog_banner::{Banner, BannerStyle};
use overlog_lifecycle::BannerHub;
use tokio::time::Instant;

/// Boxed future returned by the host's fetch primitive.
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<FetchResponse, FetchError>>>>;

/// The host's original fetch primitive.
pub type FetchFn = Box<dyn Fn(FetchRequest) -> FetchFuture>;

/// Rejection value of the fetch primitive, passed through to the caller
/// unmodified.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct FetchError(pub String);

/// Request handed to the fetch primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub method: String,
    pub url: String,
}

/// Settled response of the fetch primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub status_text: String,
    /// Best-effort body snapshot captured by the host adapter; the
    /// intercept never blocks on a body read.
    pub body_preview: Option<String>,
}

impl FetchResponse {
    /// Success statuses, per the usual 2xx convention.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Wrapped fetch entry point.
///
/// A pending banner appears before the original is awaited; on settlement
/// the banner moves to its settled style and the caller receives exactly
/// the original's `Result`.
pub struct Fetch {
    hub: Arc<BannerHub>,
    original: FetchFn,
    page_host: Option<String>,
}

impl Fetch {
    pub fn new(hub: Arc<BannerHub>, original: FetchFn, page_host: Option<String>) -> Self {
        Self {
            hub,
            original,
            page_host,
        }
    }

    /// Invokes the wrapped fetch.
    pub async fn call(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let text = format!(
            "{} {}",
            request.method,
            normalize_url(&request.url, self.page_host.as_deref())
        );
        let banner = self
            .hub
            .admit(Banner::new(BannerStyle::NetworkPending, text, vec![]));

        let started = Instant::now();
        let result = (self.original)(request).await;
        let elapsed_ms = started.elapsed().as_millis();

        match &result {
            Ok(response) if response.ok() => {
                settle(&banner, BannerStyle::NetworkSuccess);
                banner.append_text(format!("[{}]", response.status));
                banner.append_text(format!("[{elapsed_ms}ms]"));
            }
            Ok(response) => {
                settle(&banner, BannerStyle::NetworkError);
                banner.append_text(format!("[{} {}]", response.status, response.status_text));
                banner.append_text(format!("[{elapsed_ms}ms]"));
                if let Some(body) = &response.body_preview {
                    banner.append_text(body.clone());
                }
            }
            Err(error) => {
                settle(&banner, BannerStyle::NetworkError);
                banner.append_text(error.to_string());
                banner.append_text(format!("[{elapsed_ms}ms]"));
            }
        }

        result
    }
}

/// Settlement is display-side; an impossible transition is logged, never
/// surfaced to the caller.
fn settle(banner: &Banner, style: BannerStyle) {
    if let Err(e) = banner.change_style(style) {
        tracing::warn!(banner = banner.id(), error = %e, "banner did not settle");
    }
}

/// Strips the scheme and the page's own host from a displayed URL;
/// foreign hosts stay visible.
pub fn normalize_url(url: &str, page_host: Option<&str>) -> String {
    let rest = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };
    match page_host {
        Some(host) if !host.is_empty() && rest.starts_with(host) => rest[host.len()..].to_string(),
        _ => rest.to_string(),
    }
}

//! Call interception for the overlay.
//!
//! Wraps a host runtime's logging and network primitives while preserving
//! their observable contract — return values, faults, and timing — exactly
//! as the rest of the host program sees them; each intercepted call emits
//! a banner as a side channel. Nothing here mutates ambient global state:
//! the host hands its original callables to [`install`] once, at a
//! well-defined initialization point, and receives first-class wrappers
//! back.

mod console;
mod faults;
mod fetch;
mod request;

pub use console::{Console, ConsoleSinks, Level, LogSink};
pub use faults::FaultHooks;
pub use fetch::{Fetch, FetchError, FetchFn, FetchFuture, FetchRequest, FetchResponse, normalize_url};
pub use request::{OpenFn, RequestOpen, TrackedRequest};

use std::sync::Arc;

use overlog_format::Formatter;
use overlog_lifecycle::BannerHub;

/// Host originals handed over at installation.
///
/// Every binding is optional: a missing one is an interception-install
/// fault, surfaced once and skipped without affecting the others.
#[derive(Default)]
pub struct HostBindings {
    pub console: ConsoleSinks,
    pub fetch: Option<FetchFn>,
    pub request_open: Option<OpenFn>,
    /// Origin host stripped from displayed URLs.
    pub page_host: Option<String>,
}

/// The installed wrapper registry.
pub struct Intercepts {
    pub console: Console,
    pub fetch: Option<Fetch>,
    pub request: Option<RequestOpen>,
    pub faults: FaultHooks,
}

/// Builds the wrapper registry. Expected to run once per page lifetime.
pub fn install(hub: Arc<BannerHub>, bindings: HostBindings) -> Intercepts {
    install_with(hub, bindings, Formatter::default())
}

/// [`install`] with a custom formatter (e.g. an extended key filter).
pub fn install_with(
    hub: Arc<BannerHub>,
    bindings: HostBindings,
    formatter: Formatter,
) -> Intercepts {
    let console = Console::new(Arc::clone(&hub), bindings.console, formatter.clone());

    let fetch = match bindings.fetch {
        Some(original) => Some(Fetch::new(
            Arc::clone(&hub),
            original,
            bindings.page_host.clone(),
        )),
        None => {
            tracing::warn!("host has no fetch primitive, network intercept skipped");
            None
        }
    };

    let request = match bindings.request_open {
        Some(original) => Some(RequestOpen::new(
            Arc::clone(&hub),
            original,
            bindings.page_host,
        )),
        None => {
            tracing::warn!("host has no request-open primitive, legacy request intercept skipped");
            None
        }
    };

    let faults = FaultHooks::new(hub, formatter);

    Intercepts {
        console,
        fetch,
        request,
        faults,
    }
}

//! Banner admission, eviction, and the periodic expiry sweep.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use overlog_banner::Banner;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::options::{Options, OptionsPatch};
use crate::surface::RenderSurface;

/// Fixed period of the expiry sweep.
pub const SWEEP_INTERVAL: Duration = Duration::from_millis(1000);

/// Owner of the active banner collection.
///
/// The hub is the only writer of the collection: the interception layer
/// requests insertions through [`admit`](Self::admit) and the sweep task
/// evicts, both under the same lock. Critical sections never await, so a
/// tick and an admission serialize cleanly.
pub struct BannerHub {
    inner: Arc<Mutex<HubState>>,
    /// Process-wide hover gate. While held, the sweep extends lifetimes
    /// instead of evicting.
    hovering: Arc<AtomicBool>,
}

struct HubState {
    /// Active banners, front = newest.
    banners: VecDeque<Banner>,
    options: Options,
    surface: Arc<dyn RenderSurface>,
    sweep: Option<CancellationToken>,
}

impl BannerHub {
    pub fn new(options: Options, surface: Arc<dyn RenderSurface>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubState {
                banners: VecDeque::new(),
                options: options.normalized(),
                surface,
                sweep: None,
            })),
            hovering: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Inserts a banner at the front and enforces the count bound by
    /// dropping from the tail (oldest first). Returns the admitted banner.
    pub fn admit(&self, banner: Banner) -> Banner {
        let mut state = self.inner.lock().unwrap();

        if let Err(e) = state.surface.banner_created(&banner) {
            tracing::warn!(
                banner = banner.id(),
                error = %e,
                "render surface rejected banner, tracking it anyway"
            );
        }

        state.banners.push_front(banner.clone());
        while state.banners.len() > state.options.max_message {
            if let Some(oldest) = state.banners.pop_back() {
                remove_visual(&*state.surface, &oldest);
            }
        }

        banner
    }

    /// Starts the expiry sweep in a background task.
    ///
    /// Idempotent: does nothing if already running.
    pub fn start(&self) {
        let mut state = self.inner.lock().unwrap();
        if state.sweep.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        state.sweep = Some(cancel.clone());

        let inner = Arc::clone(&self.inner);
        let hovering = Arc::clone(&self.hovering);

        tokio::spawn(async move {
            sweep_loop(inner, hovering, cancel).await;
        });

        tracing::info!("banner sweep started");
    }

    /// Stops the expiry sweep. No-op when not running.
    pub fn stop(&self) {
        let mut state = self.inner.lock().unwrap();
        if let Some(cancel) = state.sweep.take() {
            cancel.cancel();
            tracing::info!("banner sweep stopped");
        }
    }

    /// Returns `true` if the sweep task is running.
    pub fn is_running(&self) -> bool {
        self.inner.lock().unwrap().sweep.is_some()
    }

    /// Sets the process-wide hover gate.
    pub fn set_hovering(&self, hovering: bool) {
        self.hovering.store(hovering, Ordering::Relaxed);
    }

    pub fn hovering(&self) -> bool {
        self.hovering.load(Ordering::Relaxed)
    }

    /// Merges a partial update over the current options and rebuilds the
    /// render surface with the new geometry. Active banners and the sweep
    /// are untouched.
    pub fn set_options(&self, patch: &OptionsPatch) {
        let mut state = self.inner.lock().unwrap();
        state.options = patch.apply(&state.options);
        if let Err(e) = state.surface.rebuild(&state.options) {
            tracing::warn!(error = %e, "render surface rebuild failed");
        }
    }

    pub fn options(&self) -> Options {
        self.inner.lock().unwrap().options.clone()
    }

    /// Snapshot of active banners, newest first.
    pub fn active(&self) -> Vec<Banner> {
        self.inner.lock().unwrap().banners.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().banners.is_empty()
    }

    /// Runs one sweep evaluation immediately. The background task calls
    /// this every tick; tests may call it directly.
    pub fn sweep_once(&self) {
        sweep_tick(&self.inner, &self.hovering);
    }
}

/// Periodic sweep loop, one tick per [`SWEEP_INTERVAL`].
async fn sweep_loop(
    inner: Arc<Mutex<HubState>>,
    hovering: Arc<AtomicBool>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.tick().await; // Skip immediate tick.

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => sweep_tick(&inner, &hovering),
        }
    }
}

/// One sweep evaluation over the whole collection.
fn sweep_tick(inner: &Arc<Mutex<HubState>>, hovering: &AtomicBool) {
    let mut state = inner.lock().unwrap();

    if hovering.load(Ordering::Relaxed) {
        // Global pause: credit every banner one tick instead of expiring.
        for banner in &state.banners {
            banner.extend_autohide(SWEEP_INTERVAL);
        }
        return;
    }

    let now = Instant::now();
    let delay = state.options.autohide_delay();

    let mut kept = VecDeque::with_capacity(state.banners.len());
    while let Some(banner) = state.banners.pop_front() {
        if banner.expired(now, delay) {
            remove_visual(&*state.surface, &banner);
        } else {
            kept.push_back(banner);
        }
    }
    state.banners = kept;
}

/// Detaches a banner's visual. A surface failure is skipped so one stale
/// handle cannot abort the rest of a tick.
fn remove_visual(surface: &dyn RenderSurface, banner: &Banner) {
    if let Err(e) = surface.banner_removed(banner) {
        tracing::warn!(banner = banner.id(), error = %e, "failed to detach banner visual");
    }
}

use overlog_banner::Banner;

use crate::options::Options;

/// Failures reported by a render surface.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no visual handle for banner {0}")]
    StaleHandle(u64),

    #[error("render surface detached")]
    Detached,

    #[error("{0}")]
    Backend(String),
}

/// Visual collaborator consuming banner lifecycle events.
///
/// Implementations own their visual handles, keyed by [`Banner::id`]. All
/// methods are best-effort from the hub's point of view: an error is
/// logged and skipped, never propagated into interception or the sweep.
pub trait RenderSurface: Send + Sync + 'static {
    /// A banner was admitted and should become visible.
    fn banner_created(&self, banner: &Banner) -> Result<(), RenderError>;

    /// A banner expired or was displaced and its visual should be detached.
    fn banner_removed(&self, banner: &Banner) -> Result<(), RenderError>;

    /// Options were replaced; tear down and rebuild the container with the
    /// new geometry.
    fn rebuild(&self, options: &Options) -> Result<(), RenderError>;

    /// Current viewport width in px, used to resolve auto widths.
    fn viewport_width(&self) -> u32;
}

/// No-op surface for headless operation and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn banner_created(&self, _banner: &Banner) -> Result<(), RenderError> {
        Ok(())
    }

    fn banner_removed(&self, _banner: &Banner) -> Result<(), RenderError> {
        Ok(())
    }

    fn rebuild(&self, _options: &Options) -> Result<(), RenderError> {
        Ok(())
    }

    fn viewport_width(&self) -> u32 {
        0
    }
}

//! Banner lifecycle: admission, bounded retention, and the expiry sweep.
//!
//! The hub exclusively owns the ordered collection of active banners.
//! The interception layer requests insertions through [`BannerHub::admit`];
//! a background task evicts banners whose lifetime is spent, pausing
//! globally while a pointer hovers the overlay. Visuals are delegated to a
//! [`RenderSurface`] collaborator.

mod hub;
mod options;
mod surface;

pub use hub::{BannerHub, SWEEP_INTERVAL};
pub use options::{Corner, Options, OptionsPatch};
pub use surface::{NullSurface, RenderError, RenderSurface};

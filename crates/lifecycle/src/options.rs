use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Widths at or below this are treated as "auto".
const AUTO_WIDTH_THRESHOLD: u32 = 10;

/// Corner of the viewport the overlay anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Overlay configuration.
///
/// Constructed with defaults and replaceable wholesale at runtime via
/// [`OptionsPatch`]; every construction path re-normalizes the clamped
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Upper bound on simultaneously active banners.
    pub max_message: usize,
    /// Idle lifetime before a banner is evicted.
    pub autohide_delay_ms: u64,
    pub position: Corner,
    /// Horizontal distance from the anchored corner, px.
    pub offset_x: u32,
    /// Vertical distance from the anchored corner, px.
    pub offset_y: u32,
    /// Container height in px (0 = auto).
    pub max_height: u32,
    /// Container width in px (values at or below 10 = auto).
    pub max_width: u32,
    /// Clamped to `[0, 1]`.
    pub opacity: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_message: 50,
            autohide_delay_ms: 10_000,
            position: Corner::BottomLeft,
            offset_x: 20,
            offset_y: 40,
            max_height: 250,
            max_width: 0,
            opacity: 0.65,
        }
    }
}

impl Options {
    /// Clamps fields to their documented ranges.
    pub fn normalized(mut self) -> Self {
        self.max_message = self.max_message.max(1);
        self.opacity = self.opacity.clamp(0.0, 1.0);
        self
    }

    pub fn autohide_delay(&self) -> Duration {
        Duration::from_millis(self.autohide_delay_ms)
    }

    /// Resolves the effective container width for a viewport: auto widths
    /// span the viewport minus the horizontal offset on both sides.
    pub fn effective_max_width(&self, viewport_width: u32) -> u32 {
        if self.max_width <= AUTO_WIDTH_THRESHOLD {
            viewport_width.saturating_sub(self.offset_x * 2)
        } else {
            self.max_width
        }
    }
}

/// Partial update merged over the current options by `set_options`.
/// Unset fields retain their prior values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_message: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autohide_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Corner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
}

impl OptionsPatch {
    /// Merges set fields over `base`, then re-normalizes.
    pub fn apply(&self, base: &Options) -> Options {
        let mut next = base.clone();
        if let Some(v) = self.max_message {
            next.max_message = v;
        }
        if let Some(v) = self.autohide_delay_ms {
            next.autohide_delay_ms = v;
        }
        if let Some(v) = self.position {
            next.position = v;
        }
        if let Some(v) = self.offset_x {
            next.offset_x = v;
        }
        if let Some(v) = self.offset_y {
            next.offset_y = v;
        }
        if let Some(v) = self.max_height {
            next.max_height = v;
        }
        if let Some(v) = self.max_width {
            next.max_width = v;
        }
        if let Some(v) = self.opacity {
            next.opacity = v;
        }
        next.normalized()
    }
}

use serde::{Deserialize, Serialize};

/// Display category of a banner.
///
/// Serialized names are the kebab-case category strings render surfaces
/// theme against (`network-pending` etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BannerStyle {
    Log,
    Debug,
    Info,
    Warn,
    Error,
    NetworkPending,
    NetworkSuccess,
    NetworkError,
}

impl BannerStyle {
    /// Whether a banner may move from `self` to `to`.
    ///
    /// Only a pending network banner transitions, and only to a settled
    /// network style; every other style is terminal from creation.
    pub fn can_transition(self, to: BannerStyle) -> bool {
        matches!(
            (self, to),
            (BannerStyle::NetworkPending, BannerStyle::NetworkSuccess)
                | (BannerStyle::NetworkPending, BannerStyle::NetworkError)
        )
    }
}

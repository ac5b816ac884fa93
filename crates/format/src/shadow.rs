use serde::{Deserialize, Serialize};

/// One keyed entry in a record shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowEntry {
    pub key: String,
    pub value: ShadowForm,
}

/// Structured mirror of a formatted value, tagged by kind.
///
/// Never rendered; preserved on the banner so downstream tooling can
/// inspect what a display string was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ShadowForm {
    Seq { items: Vec<ShadowForm> },
    Record { entries: Vec<ShadowEntry> },
    Num { value: f64 },
    BigInt { value: String },
    Text { value: String },
    Bool { value: bool },
    Callable,
    Circular,
    Unknown {
        #[serde(rename = "value")]
        kind: String,
    },
}

//! Host value serialization for overlay banners.
//!
//! Turns arbitrary runtime values delivered by the host into a compact
//! display string plus a structured shadow form. Formatting is pure and
//! total: unrecognized kinds degrade to diagnostic placeholders, and an
//! identity-based cycle guard keeps self-referential object graphs from
//! recursing forever.

mod formatter;
mod shadow;
mod value;

pub use formatter::{
    CIRCULAR_PLACEHOLDER, Context, FN_PLACEHOLDER, Formatted, Formatter, GLOBAL_PLACEHOLDER,
    KeyFilter,
};
pub use shadow::{ShadowEntry, ShadowForm};
pub use value::Value;

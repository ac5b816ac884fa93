//! Recursive value-to-display serialization.
//!
//! One formatted value yields a display string plus a parallel
//! [`ShadowForm`]. Formatting is total: every input kind, including
//! unrecognized ones and cyclic graphs, produces output without panicking.

use crate::shadow::{ShadowEntry, ShadowForm};
use crate::value::Value;

/// Placeholder for function bodies not worth displaying.
pub const FN_PLACEHOLDER: &str = "__fn()";

/// Placeholder emitted when the cycle guard trips.
pub const CIRCULAR_PLACEHOLDER: &str = "<circular>";

/// Placeholder for the host's global environment object.
pub const GLOBAL_PLACEHOLDER: &str = "<global>";

/// Position of a value relative to its parent during formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    TopLevel,
    Seq,
    Record,
}

/// Result of formatting one value.
#[derive(Debug, Clone, PartialEq)]
pub struct Formatted {
    pub display: String,
    pub shadow: ShadowForm,
}

/// Predicate deciding which record keys are excluded from serialization.
///
/// Keeps enormous host-environment/event objects (the global object, event
/// targets) out of banners. Patterns are plain data so hosts can extend
/// the set without touching the serializer.
#[derive(Debug, Clone)]
pub struct KeyFilter {
    exact: Vec<String>,
    substrings: Vec<String>,
    skip_globals: bool,
}

impl KeyFilter {
    /// Builds a filter from exact key names, lowercased key substrings,
    /// and whether global-reference values are dropped.
    pub fn new(exact: Vec<String>, substrings: Vec<String>, skip_globals: bool) -> Self {
        Self {
            exact,
            substrings,
            skip_globals,
        }
    }

    /// A filter that excludes nothing.
    pub fn permissive() -> Self {
        Self::new(Vec::new(), Vec::new(), false)
    }

    /// Returns `true` if the entry should be skipped.
    pub fn excludes(&self, key: &str, value: &Value) -> bool {
        if self.skip_globals && matches!(value, Value::Global) {
            return true;
        }
        if self.exact.iter().any(|k| k == key) {
            return true;
        }
        let lower = key.to_lowercase();
        self.substrings.iter().any(|s| lower.contains(s.as_str()))
    }
}

impl Default for KeyFilter {
    /// The stock exclusion set: global references plus the event-object
    /// keys that drag the whole page graph in.
    fn default() -> Self {
        Self {
            exact: ["window", "view", "srcElement", "toElement"]
                .map(String::from)
                .to_vec(),
            substrings: vec!["target".into()],
            skip_globals: true,
        }
    }
}

/// Recursive value-to-display serializer.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    filter: KeyFilter,
}

impl Formatter {
    /// Creates a formatter with a custom key-exclusion filter.
    pub fn new(filter: KeyFilter) -> Self {
        Self { filter }
    }

    /// Formats a single top-level value.
    pub fn format(&self, value: &Value) -> Formatted {
        self.format_at(value, Context::TopLevel, &mut Vec::new())
    }

    /// Formats an argument list the way a log call displays it: one
    /// segment per argument, joined with single spaces.
    pub fn format_args(&self, values: &[Value]) -> (String, Vec<ShadowForm>) {
        let parts: Vec<Formatted> = values.iter().map(|v| self.format(v)).collect();
        let display = parts
            .iter()
            .map(|f| f.display.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        (display, parts.into_iter().map(|f| f.shadow).collect())
    }

    fn format_at(&self, value: &Value, ctx: Context, visited: &mut Vec<usize>) -> Formatted {
        // Cycle guard: a composite node already on the current path is a
        // true cycle. Shared acyclic nodes format normally on each visit.
        let identity = value.identity();
        if let Some(id) = identity {
            if visited.contains(&id) {
                return Formatted {
                    display: CIRCULAR_PLACEHOLDER.into(),
                    shadow: ShadowForm::Circular,
                };
            }
            visited.push(id);
        }

        let formatted = match value {
            Value::Seq(items) => {
                let mut displays = Vec::new();
                let mut shadows = Vec::new();
                for item in items.borrow().iter() {
                    let f = self.format_at(item, Context::Seq, visited);
                    displays.push(f.display);
                    shadows.push(f.shadow);
                }
                Formatted {
                    display: format!("[{}]", displays.join(", ")),
                    shadow: ShadowForm::Seq { items: shadows },
                }
            }
            Value::Record(record) => {
                let mut displays = Vec::new();
                let mut entries = Vec::new();
                for (key, entry) in record.borrow().iter() {
                    if self.filter.excludes(key, entry) {
                        continue;
                    }
                    let f = self.format_at(entry, Context::Record, visited);
                    displays.push(format!("{key}: {}", f.display));
                    entries.push(ShadowEntry {
                        key: key.clone(),
                        value: f.shadow,
                    });
                }
                Formatted {
                    display: format!("{{{}}}", displays.join(", ")),
                    shadow: ShadowForm::Record { entries },
                }
            }
            Value::Num(n) => Formatted {
                display: n.to_string(),
                shadow: ShadowForm::Num { value: *n },
            },
            Value::BigInt(i) => Formatted {
                display: i.to_string(),
                shadow: ShadowForm::BigInt {
                    value: i.to_string(),
                },
            },
            Value::Text(s) => {
                let display = if s.starts_with("function ") {
                    FN_PLACEHOLDER.into()
                } else if ctx == Context::Record {
                    format!("\"{s}\"")
                } else {
                    s.clone()
                };
                Formatted {
                    display,
                    shadow: ShadowForm::Text { value: s.clone() },
                }
            }
            Value::Bool(b) => Formatted {
                display: if *b { "true".into() } else { "false".into() },
                shadow: ShadowForm::Bool { value: *b },
            },
            Value::Callable { source } => {
                let display = if source.contains("native code") {
                    FN_PLACEHOLDER.into()
                } else {
                    source.clone()
                };
                Formatted {
                    display,
                    shadow: ShadowForm::Callable,
                }
            }
            Value::Global => Formatted {
                display: GLOBAL_PLACEHOLDER.into(),
                shadow: ShadowForm::Unknown {
                    kind: "global".into(),
                },
            },
            Value::Other(kind) => {
                tracing::debug!(kind = %kind, "unrecognized value kind reached the formatter");
                Formatted {
                    display: format!("<unknown:{kind}>"),
                    shadow: ShadowForm::Unknown { kind: kind.clone() },
                }
            }
        };

        if identity.is_some() {
            visited.pop();
        }
        formatted
    }
}

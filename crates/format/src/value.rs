use std::cell::RefCell;
use std::rc::Rc;

/// A runtime value delivered by the host for display.
///
/// Composite nodes are reference-counted so a host adapter can hand over
/// aliased or even cyclic object graphs; the formatter's cycle guard keys
/// on that pointer identity. `Value` is deliberately not `Send` — values
/// live on the host's thread and only their formatted output crosses into
/// background tasks.
#[derive(Debug, Clone)]
pub enum Value {
    /// Sequence-like value.
    Seq(Rc<RefCell<Vec<Value>>>),
    /// Keyed record, insertion order preserved.
    Record(Rc<RefCell<Vec<(String, Value)>>>),
    /// Host number.
    Num(f64),
    /// Arbitrary-precision-style integer.
    BigInt(i128),
    /// Text value.
    Text(String),
    /// Boolean value.
    Bool(bool),
    /// Function value carrying its source text.
    Callable { source: String },
    /// Reference to the host's global environment object.
    Global,
    /// A kind the host adapter could not map; carries the kind label.
    Other(String),
}

impl Value {
    /// Builds a sequence value from owned items.
    pub fn seq(items: Vec<Value>) -> Self {
        Value::Seq(Rc::new(RefCell::new(items)))
    }

    /// Builds a record value from owned key/value entries.
    pub fn record(entries: Vec<(String, Value)>) -> Self {
        Value::Record(Rc::new(RefCell::new(entries)))
    }

    /// Builds a text value.
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    /// Builds a callable value from its source text.
    pub fn callable(source: impl Into<String>) -> Self {
        Value::Callable {
            source: source.into(),
        }
    }

    /// Pointer identity of composite nodes, used by the cycle guard.
    pub(crate) fn identity(&self) -> Option<usize> {
        match self {
            Value::Seq(items) => Some(Rc::as_ptr(items) as usize),
            Value::Record(entries) => Some(Rc::as_ptr(entries) as usize),
            _ => None,
        }
    }
}

/// JSON marshaling seam: hosts that deliver arguments as JSON plug in
/// through this conversion. `null` has no member in the kind set and takes
/// the formatter's soft-failure path.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Other("null".into()),
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Value::Num(f),
                None => Value::Other("number".into()),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::record(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_maps_kinds() {
        let json = serde_json::json!({
            "name": "probe",
            "count": 3,
            "ratio": 0.5,
            "live": true,
            "tags": ["a", "b"],
            "missing": null,
        });

        let value = Value::from(json);
        let Value::Record(entries) = &value else {
            panic!("object should map to a record");
        };

        let entries = entries.borrow();
        let get = |key: &str| {
            entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };

        assert!(matches!(get("name"), Value::Text(s) if s == "probe"));
        assert!(matches!(get("count"), Value::Num(n) if n == 3.0));
        assert!(matches!(get("live"), Value::Bool(true)));
        assert!(matches!(get("tags"), Value::Seq(_)));
        assert!(matches!(get("missing"), Value::Other(kind) if kind == "null"));
    }

    #[test]
    fn identity_tracks_shared_nodes() {
        let shared = Value::seq(vec![Value::Num(1.0)]);
        let alias = shared.clone();

        assert_eq!(shared.identity(), alias.identity());
        assert_ne!(
            shared.identity(),
            Value::seq(vec![Value::Num(1.0)]).identity()
        );
        assert!(Value::Bool(true).identity().is_none());
    }
}

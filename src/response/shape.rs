//! Classification of arbitrary handler output.
//!
//! Handlers return whatever they like; [`classify`] inspects the JSON once and
//! produces a [`ResponseShape`] that the normalizer consumes exhaustively.
//! Rules are tried in priority order: standardized, legacy, paginated, raw.

use serde_json::{Map, Value};

/// The plain classification tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Already `{ payload, meta? }`
    Standardized,
    /// Older `{ success, timestamp, data? }` envelope
    Legacy,
    /// A page of a collection
    Paginated,
    /// Anything else, including `null`
    Raw,
}

/// Key under which a paginated object keeps its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKey {
    /// `{ items, total }`
    Items,
    /// `{ data, total | count }`
    Data,
    /// `{ results, total }`
    Results,
}

impl ListKey {
    const ALL: [ListKey; 3] = [ListKey::Items, ListKey::Data, ListKey::Results];

    /// JSON key holding the list.
    pub fn as_str(self) -> &'static str {
        match self {
            ListKey::Items => "items",
            ListKey::Data => "data",
            ListKey::Results => "results",
        }
    }

    /// Keys whose presence marks the object as a page.
    fn total_keys(self) -> &'static [&'static str] {
        match self {
            ListKey::Items | ListKey::Results => &["total"],
            ListKey::Data => &["total", "count"],
        }
    }
}

/// Where the items of a paginated value came from.
#[derive(Debug, Clone, PartialEq)]
pub enum PageSource {
    /// A bare, non-empty array of objects
    Bare(Vec<Value>),
    /// An object carrying the list under `key`
    Keyed {
        /// Which key matched
        key: ListKey,
        /// The list itself
        items: Vec<Value>,
        /// The remaining fields (`total`, `page`, `limit`, ...)
        fields: Map<String, Value>,
    },
}

/// A classified handler output, carrying the parts the normalizer needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// Object with `payload` and an object or absent `meta`
    Standardized(Map<String, Value>),
    /// Object with `success` and `timestamp` but no `payload`
    Legacy(Map<String, Value>),
    /// List data
    Paginated(PageSource),
    /// Everything else
    Raw(Value),
}

impl ResponseShape {
    /// Returns the plain tag for this shape.
    pub fn kind(&self) -> ShapeKind {
        match self {
            ResponseShape::Standardized(_) => ShapeKind::Standardized,
            ResponseShape::Legacy(_) => ShapeKind::Legacy,
            ResponseShape::Paginated(_) => ShapeKind::Paginated,
            ResponseShape::Raw(_) => ShapeKind::Raw,
        }
    }
}

fn is_standardized(map: &Map<String, Value>) -> bool {
    map.contains_key("payload") && map.get("meta").map_or(true, Value::is_object)
}

fn is_legacy(map: &Map<String, Value>) -> bool {
    !map.contains_key("payload") && map.contains_key("success") && map.contains_key("timestamp")
}

fn list_key(map: &Map<String, Value>) -> Option<ListKey> {
    ListKey::ALL.into_iter().find(|key| {
        map.get(key.as_str()).is_some_and(Value::is_array)
            && key.total_keys().iter().any(|total| map.contains_key(*total))
    })
}

fn is_bare_page(items: &[Value]) -> bool {
    // Arrays of primitives stay raw.
    items.first().is_some_and(Value::is_object)
}

/// Classifies `value` without consuming it.
///
/// # Examples
///
/// ```
/// use request_guard::response::{detect, ShapeKind};
/// use serde_json::json;
///
/// assert_eq!(detect(&json!({"payload": {"x": 1}})), ShapeKind::Standardized);
/// assert_eq!(detect(&json!({"success": true, "timestamp": "t"})), ShapeKind::Legacy);
/// assert_eq!(detect(&json!({"items": [{}], "total": 5})), ShapeKind::Paginated);
/// assert_eq!(detect(&json!(null)), ShapeKind::Raw);
/// ```
pub fn detect(value: &Value) -> ShapeKind {
    match value {
        Value::Object(map) if is_standardized(map) => ShapeKind::Standardized,
        Value::Object(map) if is_legacy(map) => ShapeKind::Legacy,
        Value::Object(map) if list_key(map).is_some() => ShapeKind::Paginated,
        Value::Array(items) if is_bare_page(items) => ShapeKind::Paginated,
        _ => ShapeKind::Raw,
    }
}

/// Classifies `value`, splitting it into the parts its shape implies.
pub fn classify(value: Value) -> ResponseShape {
    match value {
        Value::Object(map) if is_standardized(&map) => ResponseShape::Standardized(map),
        Value::Object(map) if is_legacy(&map) => ResponseShape::Legacy(map),
        Value::Object(mut map) => match list_key(&map) {
            Some(key) => match map.remove(key.as_str()) {
                Some(Value::Array(items)) => ResponseShape::Paginated(PageSource::Keyed {
                    key,
                    items,
                    fields: map,
                }),
                // list_key only returns keys holding arrays
                _ => ResponseShape::Raw(Value::Object(map)),
            },
            None => ResponseShape::Raw(Value::Object(map)),
        },
        Value::Array(items) if is_bare_page(&items) => {
            ResponseShape::Paginated(PageSource::Bare(items))
        }
        other => ResponseShape::Raw(other),
    }
}

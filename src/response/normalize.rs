use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use super::envelope::{iso_timestamp, Meta, NormalizedResponse, PaginationMeta, ResponseMeta};
use super::shape::{classify, PageSource, ResponseShape};

const DEFAULT_PAGE_LIMIT: u64 = 50;

const TOTAL_KEYS: &[&str] = &["total", "count"];
const PAGE_KEYS: &[&str] = &["page", "currentPage"];
const LIMIT_KEYS: &[&str] = &["limit", "pageSize", "perPage"];

/// Tunables for [`ResponseNormalizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Page size assumed when a list carries none. Bare arrays use
    /// `max(len, default_limit)` so they fit on one page.
    pub default_limit: u64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Wraps arbitrary handler output in the canonical envelope.
///
/// Normalization is total: every JSON value has a defined envelope, and an
/// envelope fed back in comes out unchanged.
///
/// # Examples
///
/// ```
/// use request_guard::response::ResponseNormalizer;
/// use serde_json::json;
///
/// let normalizer = ResponseNormalizer::default();
/// let out = normalizer.normalize(json!({"items": [{"id": 1}, {"id": 2}], "total": 2, "page": 1, "limit": 10}));
///
/// assert_eq!(
///     serde_json::to_value(&out).unwrap(),
///     json!({
///         "payload": [{"id": 1}, {"id": 2}],
///         "meta": {"page": 1, "limit": 10, "total": 2, "totalPages": 1, "hasNext": false, "hasPrevious": false}
///     })
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResponseNormalizer {
    config: NormalizerConfig,
}

impl ResponseNormalizer {
    /// Creates a normalizer with the given settings.
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Returns the active settings.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Classifies `value` and wraps it.
    pub fn normalize(&self, value: Value) -> NormalizedResponse {
        let shape = classify(value);
        trace!(shape = ?shape.kind(), "normalizing response");

        match shape {
            ResponseShape::Standardized(map) => pass_through(map),
            ResponseShape::Legacy(map) => from_legacy(map),
            ResponseShape::Paginated(source) => self.paginate(source),
            ResponseShape::Raw(value) => NormalizedResponse::new(value, ResponseMeta::now()),
        }
    }

    fn paginate(&self, source: PageSource) -> NormalizedResponse {
        let default_limit = self.config.default_limit.max(1);

        let (items, meta) = match source {
            PageSource::Bare(items) => {
                let total = items.len() as u64;
                let meta = PaginationMeta::new(1, total.max(default_limit), total);
                (items, meta)
            }
            PageSource::Keyed { items, fields, .. } => {
                let total = count_field(&fields, TOTAL_KEYS).unwrap_or(items.len() as u64);
                let page = positive_field(&fields, PAGE_KEYS).unwrap_or(1);
                let limit = positive_field(&fields, LIMIT_KEYS).unwrap_or(default_limit);
                (items, PaginationMeta::new(page, limit, total))
            }
        };

        NormalizedResponse::new(Value::Array(items), meta)
    }
}

/// Normalizes `value` with default settings.
pub fn normalize(value: Value) -> NormalizedResponse {
    ResponseNormalizer::default().normalize(value)
}

fn pass_through(mut map: Map<String, Value>) -> NormalizedResponse {
    let payload = map.remove("payload").unwrap_or(Value::Null);
    let meta = match map.remove("meta") {
        Some(Value::Object(meta)) => Some(Meta::Custom(meta)),
        _ => None,
    };

    NormalizedResponse {
        payload,
        meta,
        extra: map,
    }
}

fn from_legacy(mut map: Map<String, Value>) -> NormalizedResponse {
    let timestamp = text_field(&map, "timestamp").unwrap_or_else(iso_timestamp);
    let meta = ResponseMeta {
        timestamp,
        path: text_field(&map, "path"),
        status_code: map
            .get("statusCode")
            .and_then(as_count)
            .and_then(|code| u16::try_from(code).ok()),
        message: text_field(&map, "message"),
    };

    let payload = match map.remove("data") {
        Some(data) => data,
        None => Value::Object(map),
    };

    NormalizedResponse::new(payload, meta)
}

/// Reads a field as text. Strings are kept verbatim, `null` counts as
/// absent, and any other value is rendered as JSON.
fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Reads a non-negative integer, accepting numeric strings such as `"2"`.
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn count_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| fields.get(*key).and_then(as_count))
}

fn positive_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(as_count).filter(|n| *n > 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::shape::{detect, ShapeKind};
    use serde_json::json;

    fn to_json(response: &NormalizedResponse) -> Value {
        serde_json::to_value(response).unwrap()
    }

    #[test]
    fn paginated_items_with_explicit_fields() {
        let out = normalize(json!({"items": [{"id": 1}, {"id": 2}], "total": 2, "page": 1, "limit": 10}));
        assert_eq!(
            to_json(&out),
            json!({
                "payload": [{"id": 1}, {"id": 2}],
                "meta": {"page": 1, "limit": 10, "total": 2, "totalPages": 1, "hasNext": false, "hasPrevious": false}
            })
        );
    }

    #[test]
    fn paginated_data_with_count_and_aliases() {
        let out = normalize(json!({"data": [{"id": 3}], "count": 45, "currentPage": "2", "pageSize": 20}));
        let meta = out.meta.as_ref().and_then(Meta::pagination).unwrap();
        assert_eq!(*meta, PaginationMeta::new(2, 20, 45));
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_previous);
        assert_eq!(out.payload, json!([{"id": 3}]));
    }

    #[test]
    fn paginated_results_default_page_and_limit() {
        let out = normalize(json!({"results": [{}], "total": 120}));
        let meta = out.meta.as_ref().and_then(Meta::pagination).unwrap();
        assert_eq!(meta.page, 1);
        assert_eq!(meta.limit, 50);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(!meta.has_previous);
    }

    #[test]
    fn per_page_alias_and_unusable_values() {
        let out = normalize(json!({"items": [{}], "total": "n/a", "page": 0, "perPage": 5}));
        let meta = out.meta.as_ref().and_then(Meta::pagination).unwrap();
        assert_eq!(meta.total, 1); // falls back to the list length
        assert_eq!(meta.page, 1);
        assert_eq!(meta.limit, 5);
    }

    #[test]
    fn bare_array_is_a_single_page() {
        let items: Vec<Value> = (0..75).map(|i| json!({"id": i})).collect();
        let out = normalize(Value::Array(items));
        let meta = out.meta.as_ref().and_then(Meta::pagination).unwrap();
        assert_eq!(*meta, PaginationMeta::new(1, 75, 75));
        assert_eq!(meta.total_pages, 1);

        let out = normalize(json!([{"id": 1}]));
        let meta = out.meta.as_ref().and_then(Meta::pagination).unwrap();
        assert_eq!(meta.limit, 50);
        assert_eq!(meta.total, 1);
    }

    #[test]
    fn configured_default_limit_is_used() {
        let normalizer = ResponseNormalizer::new(NormalizerConfig { default_limit: 10 });
        let out = normalizer.normalize(json!({"items": [{}], "total": 25}));
        assert_eq!(out.meta.as_ref().and_then(Meta::pagination).unwrap().total_pages, 3);
    }

    #[test]
    fn legacy_envelope_extracts_data_and_meta() {
        let out = normalize(json!({
            "success": true,
            "timestamp": "2024-01-01T00:00:00.000Z",
            "path": "/users/1",
            "statusCode": 200,
            "message": "OK",
            "data": {"id": 1}
        }));
        assert_eq!(
            to_json(&out),
            json!({
                "payload": {"id": 1},
                "meta": {"timestamp": "2024-01-01T00:00:00.000Z", "path": "/users/1", "statusCode": 200, "message": "OK"}
            })
        );
    }

    #[test]
    fn legacy_without_data_wraps_whole_object() {
        let out = normalize(json!({"success": false, "timestamp": "t", "reason": "busy"}));
        assert_eq!(
            out.payload,
            json!({"success": false, "timestamp": "t", "reason": "busy"})
        );
        assert_eq!(out.meta, Some(Meta::Response(ResponseMeta::at("t"))));
    }

    #[test]
    fn legacy_non_string_fields_are_stringified() {
        let out = normalize(json!({
            "success": true,
            "timestamp": 1700000000,
            "path": ["users", 1],
            "message": 404,
            "data": null
        }));
        match out.meta {
            Some(Meta::Response(meta)) => {
                assert_eq!(meta.timestamp, "1700000000");
                assert_eq!(meta.path.as_deref(), Some(r#"["users",1]"#));
                assert_eq!(meta.message.as_deref(), Some("404"));
            }
            other => panic!("unexpected meta: {other:?}"),
        }
    }

    #[test]
    fn legacy_null_fields_are_absent() {
        let out = normalize(json!({"success": true, "timestamp": null, "path": null, "message": null}));
        match out.meta {
            Some(Meta::Response(meta)) => {
                assert!(chrono::DateTime::parse_from_rfc3339(&meta.timestamp).is_ok());
                assert_eq!(meta.path, None);
                assert_eq!(meta.message, None);
            }
            other => panic!("unexpected meta: {other:?}"),
        }
    }

    #[test]
    fn null_becomes_timestamped_null_payload() {
        let out = normalize(Value::Null);
        assert_eq!(out.payload, Value::Null);
        let value = to_json(&out);
        assert_eq!(value["payload"], Value::Null);
        let ts = value["meta"]["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        assert_eq!(value["meta"].as_object().unwrap().len(), 1);
    }

    #[test]
    fn primitive_arrays_stay_raw() {
        let out = normalize(json!([1, 2, 3]));
        assert_eq!(out.payload, json!([1, 2, 3]));
        assert!(matches!(out.meta, Some(Meta::Response(_))));
    }

    #[test]
    fn standardized_passes_through_unchanged() {
        let input = json!({"payload": {"x": 1}, "meta": {"timestamp": "t", "traceId": "abc"}, "version": 2});
        let out = normalize(input.clone());
        assert_eq!(to_json(&out), input);
        assert_eq!(out.into_value(), input);

        let input = json!({"payload": [1, 2]});
        assert_eq!(to_json(&normalize(input.clone())), input);
    }

    #[test]
    fn normalizing_twice_is_stable() {
        for input in [
            json!(null),
            json!({"id": 7}),
            json!({"items": [{"id": 1}], "total": 9, "page": 2, "limit": 4}),
            json!({"success": true, "timestamp": "t", "data": [1]}),
            json!([{"a": 1}, {"b": 2}]),
        ] {
            let once = to_json(&normalize(input));
            assert_eq!(detect(&once), ShapeKind::Standardized);
            let twice = to_json(&normalize(once.clone()));
            assert_eq!(once, twice);
        }
    }
}

//! Wire types for the canonical `{ payload, meta }` envelope.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Returns the current UTC time as an ISO-8601 string with millisecond
/// precision, e.g. `2024-05-01T12:00:00.000Z`.
pub(crate) fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Metadata for a single resource or a non-list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResponseMeta {
    /// When the response was produced
    pub timestamp: String,
    /// Request path, carried over from legacy envelopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// HTTP status code, carried over from legacy envelopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Human-readable message, carried over from legacy envelopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResponseMeta {
    /// A timestamp-only record stamped with the current time.
    pub fn now() -> Self {
        Self::at(iso_timestamp())
    }

    /// A timestamp-only record for the given time.
    pub fn at(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            path: None,
            status_code: None,
            message: None,
        }
    }
}

/// Metadata describing one page of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PaginationMeta {
    /// 1-based page number
    pub page: u64,
    /// Page size
    pub limit: u64,
    /// Total number of items across all pages
    pub total: u64,
    /// `ceil(total / limit)`
    pub total_pages: u64,
    /// `page < total_pages`
    pub has_next: bool,
    /// `page > 1`
    pub has_previous: bool,
}

impl PaginationMeta {
    /// Derives page counts from `page`, `limit` and `total`.
    ///
    /// A `limit` of zero is treated as one so the page count stays defined.
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = total.div_ceil(limit.max(1));
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

/// The `meta` half of a [`NormalizedResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Meta {
    /// List data
    Pagination(PaginationMeta),
    /// Single resource or raw value
    Response(ResponseMeta),
    /// Metadata of an envelope that was already standardized, kept verbatim
    Custom(Map<String, Value>),
}

impl Meta {
    /// Returns the pagination record, if this is list metadata.
    pub fn pagination(&self) -> Option<&PaginationMeta> {
        match self {
            Meta::Pagination(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the timestamp, if one is present.
    pub fn timestamp(&self) -> Option<&str> {
        match self {
            Meta::Pagination(_) => None,
            Meta::Response(r) => Some(&r.timestamp),
            Meta::Custom(map) => map.get("timestamp").and_then(Value::as_str),
        }
    }
}

impl From<PaginationMeta> for Meta {
    fn from(meta: PaginationMeta) -> Self {
        Meta::Pagination(meta)
    }
}

impl From<ResponseMeta> for Meta {
    fn from(meta: ResponseMeta) -> Self {
        Meta::Response(meta)
    }
}

/// Canonical response envelope: `{ "payload": ..., "meta": ... }`.
///
/// `meta` is only absent when an already-standardized value without `meta`
/// passed through. Any other top-level keys of such a value are kept in
/// `extra` and flattened back out on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    /// Handler output
    #[serde(default)]
    pub payload: Value,
    /// Timestamp or pagination metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Extra top-level keys of a passed-through envelope
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NormalizedResponse {
    /// Builds an envelope with the given payload and metadata.
    pub fn new(payload: Value, meta: impl Into<Meta>) -> Self {
        Self {
            payload,
            meta: Some(meta.into()),
            extra: Map::new(),
        }
    }

    /// Converts the envelope into a JSON value.
    pub fn into_value(self) -> Value {
        let mut out = Map::new();
        out.insert("payload".to_string(), self.payload);
        if let Some(meta) = self.meta {
            let meta = match meta {
                Meta::Pagination(p) => serde_json::to_value(p),
                Meta::Response(r) => serde_json::to_value(r),
                Meta::Custom(map) => Ok(Value::Object(map)),
            };
            // Plain structs of strings, integers and bools always serialize.
            out.insert("meta".to_string(), meta.unwrap_or(Value::Null));
        }
        for (key, value) in self.extra {
            out.entry(key).or_insert(value);
        }
        Value::Object(out)
    }
}

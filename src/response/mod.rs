//! Response shaping.
//!
//! This module turns whatever a handler returned into the canonical
//! `{ payload, meta }` envelope:
//! - [`classify`] / [`detect`]: tag the value as standardized, legacy,
//!   paginated or raw
//! - [`ResponseNormalizer`]: map each tag to an envelope, inferring pagination
//!   metadata for lists
//! - [`ErrorBody`]: the body sent instead when authorization fails

mod envelope;
mod error_body;
mod normalize;
mod shape;

pub use envelope::{Meta, NormalizedResponse, PaginationMeta, ResponseMeta};
pub use error_body::ErrorBody;
pub use normalize::{normalize, NormalizerConfig, ResponseNormalizer};
pub use shape::{classify, detect, ListKey, PageSource, ResponseShape, ShapeKind};

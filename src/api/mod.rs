//! Purpose: Define the stable public Rust API boundary for polydecode.
//! Exports: Decoder, families, connection types, errors, and byte-level decode helpers.
//! Role: Public, additive-only surface; callers should not need `core` paths directly.
//! Invariants: Byte-level entrypoints parse through `json::parse` before decoding.
//! Invariants: Every entrypoint is stateless; a `Decoder` may be shared across threads.

mod document;

pub use crate::core::connection::{Connection, Edge, PageInfo};
pub use crate::core::decode::{Decoder, Family, NestedField};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::fields::Fields;
pub use crate::core::gid::{DEFAULT_GID_PATTERN, GidPattern};
pub use crate::core::registry::{Shape, ShapeRegistry, build_variant};
pub use crate::core::resolve::DiscriminatorRule;
pub use crate::model::media::{Media, MediaKind};
pub use crate::model::webhook::{EndpointKind, WebhookSubscription, WebhookSubscriptionEndpoint};
pub use document::{
    ApiResult, decode_connection_slice, decode_entity_slice, decode_media_connection,
    decode_webhook_subscriptions, parse_document,
};

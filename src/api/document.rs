//! Purpose: Byte-level entrypoints that parse a response body and decode it in one call.
//! Exports: `parse_document`, `decode_entity_slice`, `decode_connection_slice`,
//!   `decode_media_connection`, `decode_webhook_subscriptions`.
//! Role: Convenience layer over `json::parse` + `Decoder` for API clients.
//! Invariants: Input bytes are parsed once into the dynamic tree; no partial results on error.

use serde_json::Value;

use crate::core::connection::Connection;
use crate::core::decode::{Decoder, Family};
use crate::core::error::Error;
use crate::json;
use crate::model::media::Media;
use crate::model::webhook::WebhookSubscription;

pub type ApiResult<T> = Result<T, Error>;

pub fn parse_document(bytes: &[u8]) -> ApiResult<Value> {
    json::parse::parse_document(bytes, "response body")
}

pub fn decode_entity_slice<F: Family>(bytes: &[u8], decoder: &Decoder) -> ApiResult<F> {
    let document = json::parse::parse_document(bytes, F::NAME)?;
    decoder.decode_value(document)
}

pub fn decode_connection_slice<F: Family>(
    bytes: &[u8],
    container_key: &str,
    decoder: &Decoder,
) -> ApiResult<Connection<F>> {
    let document = json::parse::parse_document(bytes, container_key)?;
    decoder.unwrap_connection(document, container_key)
}

/// Decodes a bare media connection object (`edges` / `nodes` / `pageInfo` at the root).
pub fn decode_media_connection(bytes: &[u8], decoder: &Decoder) -> ApiResult<Connection<Media>> {
    let document = json::parse::parse_document(bytes, "media connection")?;
    decoder.decode_connection_value(document)
}

/// Decodes the `webhookSubscriptions` connection of a query response.
pub fn decode_webhook_subscriptions(
    bytes: &[u8],
    decoder: &Decoder,
) -> ApiResult<Connection<WebhookSubscription>> {
    decode_connection_slice(bytes, "webhookSubscriptions", decoder)
}

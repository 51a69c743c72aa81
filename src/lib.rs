//! Purpose: Library crate backing the `polydecode` CLI and API clients.
//! Exports: `api` (stable surface), `core` (decode engine), `model` (entity families), `json`.
//! Role: Projects untyped GraphQL response documents onto strongly-typed polymorphic entities.
//! Invariants: Decoding is read-only and stateless; nothing persists between calls.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
#![allow(clippy::result_large_err)]
pub mod api;
pub mod core;
pub mod json;
pub mod model;

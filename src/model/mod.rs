//! Purpose: Registry content for the two polymorphic entity families.
//! Exports: `media` and `webhook` modules with their shapes and `Family` impls.
//! Role: Data for the decode engine; no decode logic lives here beyond wiring.
//! Invariants: Each family owns its registry; families never share registry state.

pub mod media;
pub mod webhook;

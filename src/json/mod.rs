//! Purpose: Internal JSON parsing boundary for raw response payloads.
//! Exports: `parse` module with the document decode entrypoints.
//! Role: Single seam for the parser implementation so decode paths never touch bytes directly.
//! Invariants: Every byte-level entrypoint in `api` parses through this module.

pub mod parse;

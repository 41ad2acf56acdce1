//! Integration tests for the session server.
//!
//! - `scenarios`: end-to-end session flows through the public API
//! - `dispatch`: tool envelopes and the stdio transport
//! - `properties`: proptest properties for preview and history behaviour

mod dispatch;
mod properties;
mod scenarios;

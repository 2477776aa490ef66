//! Data Transfer Objects for talking to the CI host
//!
//! Request shapes sent by the HTTP client. Lightweight, serde-derived,
//! immutable once constructed.

pub mod pipeline;

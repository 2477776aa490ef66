//! Core domain types
//!
//! This module contains the domain structures shared between the HTTP
//! client (which deserializes them from the host) and the CLI runner
//! (which drives the trigger-and-wait workflow over them).

pub mod pipeline;

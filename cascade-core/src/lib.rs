//! Cascade Core
//!
//! Core types for the cascade pipeline trigger tool.
//!
//! This crate contains:
//! - Domain types: the pipeline run handle and its status
//! - DTOs: request objects sent to the CI host

pub mod domain;
pub mod dto;

//! Common types and utilities for the sqe semantic query engine.
//!
//! This crate provides foundational types used across all sqe crates:
//! - Source spans (`TextSpan`)
//! - Cooperative cancellation (`CancellationToken`, `Cancelled`)
//! - Centralized iteration limits
//! - Tracing subscriber setup for tests and host binaries

// Span - Source location tracking (character offsets)
pub mod span;
pub use span::TextSpan;

// Cooperative cancellation shared between a host and running queries
pub mod cancellation;
pub use cancellation::{CancellationToken, Cancelled};

// Centralized limits and thresholds
pub mod limits;

// Opt-in tracing subscriber (SQE_LOG / SQE_LOG_FORMAT)
pub mod tracing_config;

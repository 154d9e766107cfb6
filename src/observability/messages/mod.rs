// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements the `Display` trait for consistent,
//! human-readable output, and [`StructuredLog`] to emit the same event with
//! structured fields through `tracing`.
//!
//! # Organization
//!
//! * `graph` - traversal, placeholder resolution, and ordering events
//!
//! # Usage Pattern
//!
//! ```rust
//! use tagweave::observability::messages::graph::UnresolvedReference;
//! use tagweave::observability::messages::StructuredLog;
//!
//! let msg = UnresolvedReference {
//!     source: "tag:12",
//!     target_kind: "variable",
//!     placeholder: "name:Page Path",
//!     location: "parameter.eventName",
//! };
//!
//! msg.log();
//! ```

pub mod graph;

use tracing::Span;

/// Emit a message as a structured tracing event at its designated level.
pub trait StructuredLog: std::fmt::Display {
    /// Log the event with structured fields alongside the display text.
    fn log(&self);

    /// Create a span carrying the event's structured fields.
    fn span(&self, name: &str) -> Span;
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! This module provides centralized message types for diagnostic and
//! operational logging. Message types follow a struct-based pattern with
//! `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Enable future internationalization without code changes
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::graph` - traversal, resolution, and ordering events
//!
//! # Usage
//!
//! ```rust
//! use tagweave::observability::messages::graph::EntityAbsent;
//! use tagweave::observability::messages::StructuredLog;
//!
//! let msg = EntityAbsent {
//!     kind: "tag",
//!     identifier: "42",
//! };
//!
//! msg.log();
//! ```

pub mod messages;

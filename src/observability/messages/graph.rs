// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph traversal, resolution, and ordering events.
//!
//! This module contains message types for logging events related to:
//! * Entities that could not be found during discovery
//! * Placeholder references that never resolved
//! * Duplicate display names in the candidate pool
//! * Nodes recovered after an incomplete Kahn pass
//! * Traversal completion summaries

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An entity referenced during traversal was not found.
///
/// # Log Level
/// `debug!` - Expected for references that leave the candidate pool
pub struct EntityAbsent<'a> {
    pub kind: &'a str,
    pub identifier: &'a str,
}

impl Display for EntityAbsent<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "No {} found for '{}'; excluding it from the graph",
            self.kind, self.identifier
        )
    }
}

impl StructuredLog for EntityAbsent<'_> {
    fn log(&self) {
        tracing::debug!(
            kind = self.kind,
            identifier = self.identifier,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "entity_absent",
            name = name,
            kind = self.kind,
            identifier = self.identifier,
        )
    }
}

/// A `name:` or `cvt:` placeholder never matched a known entity.
///
/// # Log Level
/// `warn!` - The edge is excluded from ordering but kept for diagnostics
pub struct UnresolvedReference<'a> {
    pub source: &'a str,
    pub target_kind: &'a str,
    pub placeholder: &'a str,
    pub location: &'a str,
}

impl Display for UnresolvedReference<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Reference '{}' ({} at {}) from {} did not resolve; edge excluded from ordering",
            self.placeholder, self.target_kind, self.location, self.source
        )
    }
}

impl StructuredLog for UnresolvedReference<'_> {
    fn log(&self) {
        tracing::warn!(
            source = self.source,
            target_kind = self.target_kind,
            placeholder = self.placeholder,
            location = self.location,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::WARN,
            "unresolved_reference",
            name = name,
            source = self.source,
            placeholder = self.placeholder,
        )
    }
}

/// Two entities of the same kind share a display name.
///
/// # Log Level
/// `warn!` - Data-quality issue; the last indexed entity wins
pub struct DuplicateEntityName<'a> {
    pub kind: &'a str,
    pub name: &'a str,
    pub kept_id: &'a str,
    pub shadowed_id: &'a str,
}

impl Display for DuplicateEntityName<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Duplicate {} name '{}': '{}' shadows '{}' for name resolution",
            self.kind, self.name, self.kept_id, self.shadowed_id
        )
    }
}

impl StructuredLog for DuplicateEntityName<'_> {
    fn log(&self) {
        tracing::warn!(
            kind = self.kind,
            entity_name = self.name,
            kept_id = self.kept_id,
            shadowed_id = self.shadowed_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::WARN,
            "duplicate_entity_name",
            name = name,
            kind = self.kind,
            entity_name = self.name,
        )
    }
}

/// A node was appended after the Kahn pass drained without covering it.
///
/// # Log Level
/// `warn!` - The node is part of a cycle or depends on one
pub struct CycleRecoveredNode<'a> {
    pub node: &'a str,
    pub unprocessed_remaining: usize,
}

impl Display for CycleRecoveredNode<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node {} is part of a dependency cycle or unreachable; appending it out of order ({} remaining)",
            self.node, self.unprocessed_remaining
        )
    }
}

impl StructuredLog for CycleRecoveredNode<'_> {
    fn log(&self) {
        tracing::warn!(
            node = self.node,
            unprocessed_remaining = self.unprocessed_remaining,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::WARN,
            "cycle_recovered_node",
            name = name,
            node = self.node,
        )
    }
}

/// Traversal finished and the creation order was computed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct TraversalCompleted<'a> {
    pub root: &'a str,
    pub node_count: usize,
    pub recovered_count: usize,
    pub reverse_tracking: bool,
}

impl Display for TraversalCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Built dependency graph for {}: {} nodes, {} recovered, reverse_tracking={}",
            self.root, self.node_count, self.recovered_count, self.reverse_tracking
        )
    }
}

impl StructuredLog for TraversalCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            root = self.root,
            node_count = self.node_count,
            recovered_count = self.recovered_count,
            reverse_tracking = self.reverse_tracking,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "traversal_completed",
            name = name,
            root = self.root,
            node_count = self.node_count,
        )
    }
}

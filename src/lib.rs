// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod export;     // container-export loading
pub mod extract;    // reference extraction
pub mod fetch;      // entity-fetching collaborator boundary
pub mod graph;      // BFS discovery + graph builder
pub mod index;      // name / template-type / reverse indexes
pub mod model;      // entities, refs, edges
pub mod observability;
pub mod order;      // Kahn ordering with recovery

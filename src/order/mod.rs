// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Creation-order computation over a built dependency graph.
//!
//! Implements Kahn's algorithm with two departures from the textbook
//! version, both aimed at producing a usable order from imperfect data:
//!
//! 1. **Total output.** Every node appears in the result exactly once.
//!    When the queue drains before all nodes are processed (a cycle, or
//!    nodes stranded behind one), the leftovers are appended in discovery
//!    order with a warning per node instead of failing the whole run.
//! 2. **Kind-ranked output.** After the topological pass the order is
//!    stably sorted by entity kind: templates, then variables, then
//!    triggers, then tags. Dependencies in this domain only ever point at
//!    equal or lower ranks, so the sort cannot reorder a dependency after
//!    its dependent; it groups each kind's creation calls together while
//!    the stable sort preserves the topological order within a kind.
//!
//! Only resolved edges whose target is present in the graph constrain the
//! order. Placeholder edges and edges to absent entities were already
//! reported during the build and carry no ordering weight. Self-references
//! cannot constrain ordering and are skipped.

use crate::graph::DependencyGraph;
use crate::model::EntityRef;
use crate::observability::messages::graph::CycleRecoveredNode;
use crate::observability::messages::StructuredLog;
use std::collections::{HashMap, HashSet, VecDeque};

/// A safe-creation order over a graph's nodes.
#[derive(Debug, Clone, Default)]
pub struct CreationOrder {
    /// Every node ref exactly once; dependencies precede dependents except
    /// for the refs listed in `recovered`.
    pub order: Vec<EntityRef>,
    /// Refs appended out of order because the topological pass could not
    /// reach them.
    pub recovered: Vec<EntityRef>,
}

/// Compute the creation order for every node in the graph.
pub fn creation_order(graph: &DependencyGraph) -> CreationOrder {
    let mut in_degree: HashMap<&EntityRef, usize> = HashMap::new();
    let mut dependents: HashMap<EntityRef, Vec<&EntityRef>> = HashMap::new();

    for node_ref in graph.discovery_order() {
        let Some(node) = graph.get(node_ref) else {
            continue;
        };
        let mut targets: Vec<EntityRef> = Vec::new();
        for edge in node.resolved_edges() {
            let Some(target) = edge.target_ref() else {
                continue;
            };
            if target != *node_ref && graph.contains(&target) && !targets.contains(&target) {
                targets.push(target);
            }
        }
        in_degree.insert(node_ref, targets.len());
        for target in targets {
            dependents.entry(target).or_default().push(node_ref);
        }
    }

    // Seed and process in discovery order so identical inputs always yield
    // identical orders.
    let mut queue: VecDeque<&EntityRef> = graph
        .discovery_order()
        .iter()
        .filter(|r| in_degree.get(r).copied() == Some(0))
        .collect();

    let mut order: Vec<EntityRef> = Vec::with_capacity(graph.len());
    let mut processed: HashSet<&EntityRef> = HashSet::with_capacity(graph.len());

    while let Some(node_ref) = queue.pop_front() {
        order.push(node_ref.clone());
        processed.insert(node_ref);
        if let Some(waiting) = dependents.get(node_ref) {
            for &dependent in waiting {
                if let Some(count) = in_degree.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }
    }

    let mut recovered: Vec<EntityRef> = Vec::new();
    if order.len() < graph.len() {
        let leftovers: Vec<&EntityRef> = graph
            .discovery_order()
            .iter()
            .filter(|r| !processed.contains(r))
            .collect();
        let mut remaining = leftovers.len();
        for node_ref in leftovers {
            remaining -= 1;
            CycleRecoveredNode {
                node: &node_ref.to_string(),
                unprocessed_remaining: remaining,
            }
            .log();
            order.push(node_ref.clone());
            recovered.push(node_ref.clone());
        }
    }

    order.sort_by_key(|r| r.kind.creation_rank());

    CreationOrder { order, recovered }
}

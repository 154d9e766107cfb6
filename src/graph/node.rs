// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::model::{DependencyEdge, Entity, EntityKind, EntityRef};
use serde_json::Value;
use std::collections::HashMap;

/// One discovered entity with its outgoing dependency edges.
///
/// The raw payload is carried along untouched so downstream consumers (the
/// materialization step, the summarizer) can read whatever they need from
/// it. Hub variables always carry an empty edge list.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    pub kind: EntityKind,
    pub id: String,
    pub name: String,
    pub data: Value,
    pub edges: Vec<DependencyEdge>,
    /// The entity's type string; set for tags, triggers, and variables.
    pub subtype: Option<String>,
}

impl DependencyNode {
    pub fn from_entity(entity: &Entity, edges: Vec<DependencyEdge>) -> Self {
        Self {
            kind: entity.kind,
            id: entity.id.clone(),
            name: entity.name.clone(),
            data: entity.data.clone(),
            edges,
            subtype: entity.subtype().map(str::to_string),
        }
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.kind, self.id.clone())
    }

    /// Edges whose target is a concrete ID (placeholders excluded).
    pub fn resolved_edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter().filter(|e| e.is_resolved())
    }
}

/// The aggregate result of one build: the discovered node set and the
/// computed creation order.
///
/// Nodes are keyed by kind-scoped ref; a separate discovery-order list
/// keeps iteration deterministic across rebuilds, so identical inputs
/// always produce identical creation orders.
#[derive(Clone)]
pub struct DependencyGraph {
    pub root: EntityRef,
    pub root_name: String,
    nodes: HashMap<EntityRef, DependencyNode>,
    discovery_order: Vec<EntityRef>,
    /// Every node ref exactly once, dependencies before dependents (except
    /// nodes listed in `recovered`).
    pub creation_order: Vec<EntityRef>,
    /// Nodes appended out of order because they sit in or behind a cycle.
    pub recovered: Vec<EntityRef>,
}

impl DependencyGraph {
    pub fn new(root: EntityRef) -> Self {
        Self {
            root,
            root_name: String::new(),
            nodes: HashMap::new(),
            discovery_order: Vec::new(),
            creation_order: Vec::new(),
            recovered: Vec::new(),
        }
    }

    /// Insert a node, keeping the first version when the ref was already
    /// discovered. Returns whether the node was inserted.
    pub fn insert(&mut self, node: DependencyNode) -> bool {
        let entity_ref = node.entity_ref();
        if self.nodes.contains_key(&entity_ref) {
            return false;
        }
        self.discovery_order.push(entity_ref.clone());
        self.nodes.insert(entity_ref, node);
        true
    }

    pub fn get(&self, entity_ref: &EntityRef) -> Option<&DependencyNode> {
        self.nodes.get(entity_ref)
    }

    pub fn get_mut(&mut self, entity_ref: &EntityRef) -> Option<&mut DependencyNode> {
        self.nodes.get_mut(entity_ref)
    }

    pub fn contains(&self, entity_ref: &EntityRef) -> bool {
        self.nodes.contains_key(entity_ref)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node refs in the order discovery reached them.
    pub fn discovery_order(&self) -> &[EntityRef] {
        &self.discovery_order
    }

    /// Nodes in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.discovery_order
            .iter()
            .filter_map(move |r| self.nodes.get(r))
    }
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("root", &self.root)
            .field("node_count", &self.nodes.len())
            .field("creation_order", &self.creation_order)
            .field("recovered", &self.recovered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn revisiting_a_discovered_ref_is_a_no_op() {
        let mut graph = DependencyGraph::new(EntityRef::new(EntityKind::Tag, "1"));
        let first = Entity::new(EntityKind::Tag, "1", "First", json!({}));
        let second = Entity::new(EntityKind::Tag, "1", "Second", json!({}));

        assert!(graph.insert(DependencyNode::from_entity(&first, Vec::new())));
        assert!(!graph.insert(DependencyNode::from_entity(&second, Vec::new())));
        assert_eq!(graph.len(), 1);
        assert_eq!(
            graph
                .get(&EntityRef::new(EntityKind::Tag, "1"))
                .unwrap()
                .name,
            "First"
        );
    }

    #[test]
    fn discovery_order_tracks_insertion() {
        let mut graph = DependencyGraph::new(EntityRef::new(EntityKind::Tag, "1"));
        for (kind, id) in [
            (EntityKind::Tag, "1"),
            (EntityKind::Trigger, "1"),
            (EntityKind::Variable, "9"),
        ] {
            let entity = Entity::new(kind, id, "", json!({}));
            graph.insert(DependencyNode::from_entity(&entity, Vec::new()));
        }
        let order: Vec<String> = graph.discovery_order().iter().map(ToString::to_string).collect();
        assert_eq!(order, vec!["tag:1", "trigger:1", "variable:9"]);
    }
}

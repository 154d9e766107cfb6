// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Breadth-first dependency discovery over a heterogeneous entity graph.
//!
//! The builder runs a FIFO work queue of kind-scoped refs seeded with the
//! root set. Each dequeued ref is resolved to an entity (through the fetch
//! collaborator, or by lookup in a pre-loaded pool), its payload is handed
//! to the reference extractor, placeholder targets are resolved against the
//! name and template-type indexes, and newly resolved targets are enqueued.
//! An entity that cannot be found is excluded and traversal continues.
//!
//! Reverse tracking, when enabled, widens discovery with entities that
//! depend on what was just discovered (companion users, event emitters).
//! Those lookups only enqueue refs. They never add an edge back to the
//! node that triggered them: such an edge would encode the wrong causal
//! direction and could introduce a cycle. Ordering comes exclusively from
//! the edges extracted out of each entity's own payload.
//!
//! Traversal is sequential: the adapter-backed mode awaits one fetch per
//! queue item, so a given fetch-response sequence always produces the same
//! discovery order. The pool mode never suspends.

use crate::extract::{detected_custom_event, extract_dependencies};
use crate::fetch::{EntityFetcher, FetchError};
use crate::graph::{DependencyGraph, DependencyNode};
use crate::index::{NameIndex, ReverseIndex, TemplateTypeIndex};
use crate::model::{DependencyEdge, Entity, EntityKind, EntityRef};
use crate::observability::messages::graph::{
    EntityAbsent, TraversalCompleted, UnresolvedReference,
};
use crate::observability::messages::StructuredLog;
use std::collections::{HashMap, HashSet, VecDeque};

/// Options for one build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Widen discovery with entities that depend on discovered ones.
    pub reverse_tracking: bool,
    /// Wider candidate pool used for placeholder resolution and for the
    /// reverse index in the adapter-backed mode. The pool mode ignores this
    /// and uses its pool argument instead.
    pub candidates: Vec<Entity>,
    /// Container ID used for `cvt_` type construction when a template's own
    /// metadata lacks one. Typically the loaded export's container ID.
    pub container_id: Option<String>,
}

/// Builds a [`DependencyGraph`] from a root selection.
///
/// A builder can be reused across builds; the name-lookup cache it owns is
/// cleared at the start of every build so independent builds stay
/// independent.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    options: BuildOptions,
    name_cache: HashMap<(EntityKind, String), Option<Entity>>,
}

impl GraphBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            name_cache: HashMap::new(),
        }
    }

    /// Build from root refs, fetching entities on demand through the
    /// collaborator. One suspend point per queue item; a transport failure
    /// aborts the build.
    pub async fn build<F>(
        &mut self,
        fetcher: &F,
        roots: &[EntityRef],
    ) -> Result<DependencyGraph, FetchError>
    where
        F: EntityFetcher + ?Sized,
    {
        self.name_cache.clear();
        let mut names = NameIndex::from_entities(&self.options.candidates);
        let mut templates = TemplateTypeIndex::new();
        for template in self
            .options
            .candidates
            .iter()
            .filter(|e| e.kind == EntityKind::Template)
        {
            templates.insert_with_container(template, self.options.container_id.as_deref());
        }
        let reverse = self
            .options
            .reverse_tracking
            .then(|| ReverseIndex::build(&self.options.candidates));

        let mut graph = DependencyGraph::new(first_root(roots));
        let mut queue: VecDeque<EntityRef> = roots.iter().cloned().collect();
        let mut visited: HashSet<EntityRef> = HashSet::new();

        while let Some(node_ref) = queue.pop_front() {
            if !visited.insert(node_ref.clone()) {
                continue;
            }
            let Some(entity) = fetcher.fetch_by_id(node_ref.kind, &node_ref.id).await? else {
                EntityAbsent {
                    kind: node_ref.kind.label(),
                    identifier: &node_ref.id,
                }
                .log();
                continue;
            };
            names.insert(&entity);
            templates.insert_with_container(&entity, self.options.container_id.as_deref());

            let mut edges = node_edges(&entity);
            for edge in &mut edges {
                if let Some(name) = edge.name_ref().map(str::to_string) {
                    let known = names.resolve(edge.target_kind, &name).map(str::to_string);
                    if let Some(id) = known {
                        edge.resolve(&id);
                    } else if let Some(found) =
                        self.lookup_by_name(fetcher, edge.target_kind, &name).await?
                    {
                        edge.resolve(&found.id);
                        names.insert(&found);
                    }
                } else {
                    resolve_template_ref(edge, &templates);
                }
                enqueue_target(edge, &visited, &mut queue);
            }

            if let Some(reverse) = &reverse {
                enqueue_reverse(&entity, reverse, &visited, &mut queue);
            }
            graph.insert(DependencyNode::from_entity(&entity, edges));
        }

        self.finish(&mut graph, &names, &templates);
        Ok(graph)
    }

    /// Build synchronously from an already-loaded entity pool.
    ///
    /// The pool doubles as the candidate set: indexes are built over the
    /// whole pool up front, so there are no suspension points and no
    /// network round trips. Recommended whenever the full workspace is
    /// already materialized.
    pub fn build_from_pool(
        &mut self,
        pool: &[Entity],
        selection: &[EntityRef],
    ) -> DependencyGraph {
        self.name_cache.clear();
        let names = NameIndex::from_entities(pool);
        let mut templates = TemplateTypeIndex::new();
        for template in pool.iter().filter(|e| e.kind == EntityKind::Template) {
            templates.insert_with_container(template, self.options.container_id.as_deref());
        }
        let reverse = self
            .options
            .reverse_tracking
            .then(|| ReverseIndex::build(pool));

        let mut graph = DependencyGraph::new(first_root(selection));
        let mut queue: VecDeque<EntityRef> = selection.iter().cloned().collect();
        let mut visited: HashSet<EntityRef> = HashSet::new();

        while let Some(node_ref) = queue.pop_front() {
            if !visited.insert(node_ref.clone()) {
                continue;
            }
            let Some(entity) = pool
                .iter()
                .find(|e| e.kind == node_ref.kind && e.id == node_ref.id)
            else {
                EntityAbsent {
                    kind: node_ref.kind.label(),
                    identifier: &node_ref.id,
                }
                .log();
                continue;
            };

            let mut edges = node_edges(entity);
            for edge in &mut edges {
                if let Some(name) = edge.name_ref().map(str::to_string) {
                    let known = names.resolve(edge.target_kind, &name).map(str::to_string);
                    if let Some(id) = known {
                        edge.resolve(&id);
                    }
                } else {
                    resolve_template_ref(edge, &templates);
                }
                enqueue_target(edge, &visited, &mut queue);
            }

            if let Some(reverse) = &reverse {
                enqueue_reverse(entity, reverse, &visited, &mut queue);
            }
            graph.insert(DependencyNode::from_entity(entity, edges));
        }

        self.finish(&mut graph, &names, &templates);
        graph
    }

    async fn lookup_by_name<F>(
        &mut self,
        fetcher: &F,
        kind: EntityKind,
        name: &str,
    ) -> Result<Option<Entity>, FetchError>
    where
        F: EntityFetcher + ?Sized,
    {
        let key = (kind, name.to_string());
        if let Some(cached) = self.name_cache.get(&key) {
            return Ok(cached.clone());
        }
        let fetched = fetcher.fetch_by_name(kind, name).await?;
        self.name_cache.insert(key, fetched.clone());
        Ok(fetched)
    }

    /// Final resolution pass plus ordering.
    ///
    /// Placeholders extracted before their target was indexed (a template
    /// discovered after the tag that uses it, say) get one more chance
    /// against the completed indexes. Whatever still fails to resolve is
    /// reported and excluded from ordering but stays on its node for
    /// diagnostics.
    fn finish(
        &self,
        graph: &mut DependencyGraph,
        names: &NameIndex,
        templates: &TemplateTypeIndex,
    ) {
        let refs: Vec<EntityRef> = graph.discovery_order().to_vec();
        for node_ref in &refs {
            let source = node_ref.to_string();
            let Some(node) = graph.get_mut(node_ref) else {
                continue;
            };
            for edge in &mut node.edges {
                if edge.is_resolved() {
                    continue;
                }
                let resolved = if let Some(name) = edge.name_ref() {
                    names.resolve(edge.target_kind, name).map(str::to_string)
                } else if let Some(type_str) = edge.template_ref() {
                    templates.resolve(type_str).map(str::to_string)
                } else {
                    None
                };
                match resolved {
                    Some(id) => edge.resolve(&id),
                    None => UnresolvedReference {
                        source: &source,
                        target_kind: edge.target_kind.label(),
                        placeholder: &edge.target,
                        location: &edge.location,
                    }
                    .log(),
                }
            }
        }

        let ordered = crate::order::creation_order(graph);
        graph.creation_order = ordered.order;
        graph.recovered = ordered.recovered;

        let root = graph.root.clone();
        graph.root_name = graph
            .get(&root)
            .map(|node| node.name.clone())
            .unwrap_or_default();

        TraversalCompleted {
            root: &root.to_string(),
            node_count: graph.len(),
            recovered_count: graph.recovered.len(),
            reverse_tracking: self.options.reverse_tracking,
        }
        .log();
    }
}

fn first_root(roots: &[EntityRef]) -> EntityRef {
    roots
        .first()
        .cloned()
        .unwrap_or_else(|| EntityRef::new(EntityKind::Tag, ""))
}

/// Hub variables are leaves no matter what their payload says.
fn node_edges(entity: &Entity) -> Vec<DependencyEdge> {
    if entity.is_hub_variable() {
        Vec::new()
    } else {
        extract_dependencies(entity)
    }
}

fn resolve_template_ref(edge: &mut DependencyEdge, templates: &TemplateTypeIndex) {
    let resolved = edge
        .template_ref()
        .and_then(|type_str| templates.resolve(type_str))
        .map(str::to_string);
    if let Some(id) = resolved {
        edge.resolve(&id);
    }
}

fn enqueue_target(
    edge: &DependencyEdge,
    visited: &HashSet<EntityRef>,
    queue: &mut VecDeque<EntityRef>,
) {
    if let Some(target) = edge.target_ref() {
        if !visited.contains(&target) {
            queue.push_back(target);
        }
    }
}

/// Enqueue-only reverse lookups; see the module docs for why these never
/// add edges.
fn enqueue_reverse(
    entity: &Entity,
    reverse: &ReverseIndex,
    visited: &HashSet<EntityRef>,
    queue: &mut VecDeque<EntityRef>,
) {
    match entity.kind {
        EntityKind::Tag => {
            if entity.name.is_empty() {
                return;
            }
            for id in reverse.users_of_companion(&entity.name) {
                let user = EntityRef::new(EntityKind::Tag, id.clone());
                if !visited.contains(&user) {
                    queue.push_back(user);
                }
            }
        }
        EntityKind::Trigger => {
            let Some(event) = detected_custom_event(entity) else {
                return;
            };
            for id in reverse.emitters_of(&event) {
                let emitter = EntityRef::new(EntityKind::Tag, id.clone());
                if !visited.contains(&emitter) {
                    queue.push_back(emitter);
                }
            }
        }
        EntityKind::Variable | EntityKind::Template => {}
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::fetch::PoolFetcher;
use crate::graph::{BuildOptions, DependencyGraph, GraphBuilder};
use crate::model::{EdgeKind, Entity, EntityKind, EntityRef};
use serde_json::json;

fn tag(id: &str, name: &str, data: serde_json::Value) -> Entity {
    Entity::new(EntityKind::Tag, id, name, data)
}

fn entity_ref(kind: EntityKind, id: &str) -> EntityRef {
    EntityRef::new(kind, id)
}

fn order_position(graph: &DependencyGraph, kind: EntityKind, id: &str) -> usize {
    let wanted = entity_ref(kind, id);
    graph
        .creation_order
        .iter()
        .position(|r| *r == wanted)
        .unwrap_or_else(|| panic!("{wanted} missing from creation order"))
}

/// Tag A declares tag B as a teardown companion, by name.
fn teardown_pair() -> Vec<Entity> {
    vec![
        tag(
            "1",
            "Main",
            json!({"type": "gaawe", "teardownTag": [{"tagName": "Cleanup"}]}),
        ),
        tag("2", "Cleanup", json!({"type": "html"})),
    ]
}

/// Test that a teardown companion referenced by name orders before the tag
/// that declares it.
#[test]
fn teardown_companion_orders_before_its_user() {
    let pool = teardown_pair();
    let mut builder = GraphBuilder::default();
    let graph = builder.build_from_pool(
        &pool,
        &[
            entity_ref(EntityKind::Tag, "1"),
            entity_ref(EntityKind::Tag, "2"),
        ],
    );

    assert_eq!(graph.len(), 2);
    assert!(graph.recovered.is_empty());
    assert!(
        order_position(&graph, EntityKind::Tag, "2")
            < order_position(&graph, EntityKind::Tag, "1")
    );
}

/// Test that reverse tracking discovers the declaring tag from the
/// companion alone, and that the companion still orders first. The reverse
/// lookup must only enqueue; an edge in the reverse direction would invert
/// the causal order.
#[test]
fn reverse_tracking_discovers_users_without_reordering() {
    let pool = teardown_pair();
    let mut builder = GraphBuilder::new(BuildOptions {
        reverse_tracking: true,
        ..BuildOptions::default()
    });
    let graph = builder.build_from_pool(&pool, &[entity_ref(EntityKind::Tag, "2")]);

    assert_eq!(graph.len(), 2);
    assert!(graph.contains(&entity_ref(EntityKind::Tag, "1")));
    assert!(
        order_position(&graph, EntityKind::Tag, "2")
            < order_position(&graph, EntityKind::Tag, "1")
    );
    // The companion gained no edge pointing at its user.
    let companion = graph.get(&entity_ref(EntityKind::Tag, "2")).unwrap();
    assert!(companion.edges.is_empty());
}

/// Test that without reverse tracking the same single-root build leaves the
/// declaring tag undiscovered.
#[test]
fn reverse_tracking_off_keeps_discovery_narrow() {
    let pool = teardown_pair();
    let mut builder = GraphBuilder::default();
    let graph = builder.build_from_pool(&pool, &[entity_ref(EntityKind::Tag, "2")]);

    assert_eq!(graph.len(), 1);
    assert!(!graph.contains(&entity_ref(EntityKind::Tag, "1")));
}

/// Test that a custom-event trigger pulls in the tags that emit its event
/// when reverse tracking is on.
#[test]
fn reverse_tracking_discovers_event_emitters() {
    let pool = vec![
        Entity::new(
            EntityKind::Trigger,
            "5",
            "Lead Trigger",
            json!({
                "type": "customEvent",
                "customEventFilter": [
                    {"type": "equals", "parameter": [
                        {"key": "arg0", "value": "{{_event}}"},
                        {"key": "arg1", "value": "lead"},
                    ]},
                ],
            }),
        ),
        tag(
            "6",
            "Lead Pusher",
            json!({
                "type": "html",
                "parameter": [
                    {"key": "html", "value": "<script>dataLayer.push({event: 'lead'});</script>"},
                ],
            }),
        ),
    ];
    let mut builder = GraphBuilder::new(BuildOptions {
        reverse_tracking: true,
        ..BuildOptions::default()
    });
    let graph = builder.build_from_pool(&pool, &[entity_ref(EntityKind::Trigger, "5")]);

    assert_eq!(graph.len(), 2);
    assert!(graph.contains(&entity_ref(EntityKind::Tag, "6")));
    assert!(graph.recovered.is_empty());
}

/// Test the custom-template scenario: a tag typed `cvt_172990757_195` plus
/// a template with ID 195 in container 172990757 must yield a template node
/// ordered before the tag, even when the template metadata only embeds the
/// public-ID sentinel.
#[test]
fn custom_template_type_resolves_through_construction() {
    let pool = vec![
        tag("10", "Consent Tag", json!({"type": "cvt_172990757_195"})),
        Entity::new(
            EntityKind::Template,
            "195",
            "Consent Template",
            json!({
                "containerId": "172990757",
                "templateData": "___INFO___\n{\"id\": \"cvt_temp_public_id\"}",
            }),
        ),
    ];
    let mut builder = GraphBuilder::default();
    let graph = builder.build_from_pool(&pool, &[entity_ref(EntityKind::Tag, "10")]);

    assert_eq!(graph.len(), 2);
    let template_ref = entity_ref(EntityKind::Template, "195");
    assert!(graph.contains(&template_ref));
    assert!(
        order_position(&graph, EntityKind::Template, "195")
            < order_position(&graph, EntityKind::Tag, "10")
    );
    // The tag's template edge resolved to the concrete ID.
    let tag_node = graph.get(&entity_ref(EntityKind::Tag, "10")).unwrap();
    let template_edge = tag_node
        .edges
        .iter()
        .find(|e| e.kind == EdgeKind::TemplateType)
        .unwrap();
    assert_eq!(template_edge.target, "195");
}

/// Test that a template without its own container ID still resolves a
/// tag's `cvt_` type through the export-level container ID option.
#[test]
fn export_container_id_backs_template_resolution() {
    let pool = vec![
        tag("10", "Consent Tag", json!({"type": "cvt_172990757_195"})),
        Entity::new(
            EntityKind::Template,
            "195",
            "Consent Template",
            json!({"templateData": ""}),
        ),
    ];
    let mut builder = GraphBuilder::new(BuildOptions {
        container_id: Some("172990757".into()),
        ..BuildOptions::default()
    });
    let graph = builder.build_from_pool(&pool, &[entity_ref(EntityKind::Tag, "10")]);

    assert!(graph.contains(&entity_ref(EntityKind::Template, "195")));
    assert!(
        order_position(&graph, EntityKind::Template, "195")
            < order_position(&graph, EntityKind::Tag, "10")
    );
}

/// Test that a chain of config-tag references between tags keeps its
/// dependency order through the kind-rank pass, which must stay stable
/// within a rank, with reverse tracking enabled.
#[test]
fn config_tag_chain_orders_within_rank() {
    let pool = vec![
        tag("1", "GA4 Config", json!({"type": "gaawc"})),
        tag(
            "2",
            "GA4 Event",
            json!({"type": "gaawe", "parameter": [
                {"key": "configTagId", "value": "1"},
            ]}),
        ),
        tag(
            "3",
            "GA4 Conversion",
            json!({"type": "gaawe", "parameter": [
                {"key": "configTagId", "value": "2"},
            ]}),
        ),
    ];
    let mut builder = GraphBuilder::new(BuildOptions {
        reverse_tracking: true,
        ..BuildOptions::default()
    });
    let graph = builder.build_from_pool(&pool, &[entity_ref(EntityKind::Tag, "3")]);

    assert_eq!(graph.len(), 3);
    assert!(graph.recovered.is_empty());
    assert!(
        order_position(&graph, EntityKind::Tag, "1")
            < order_position(&graph, EntityKind::Tag, "2")
    );
    assert!(
        order_position(&graph, EntityKind::Tag, "2")
            < order_position(&graph, EntityKind::Tag, "3")
    );
}

/// Test that the node map and the creation order hold exactly the same refs.
#[test]
fn node_map_and_creation_order_are_a_bijection() {
    let pool = vec![
        tag(
            "1",
            "Main",
            json!({
                "type": "gaawe",
                "firingTriggerId": ["7"],
                "parameter": [
                    {"key": "eventName", "value": "{{Event Name}}"},
                ],
            }),
        ),
        Entity::new(EntityKind::Trigger, "7", "All Pages", json!({"type": "pageview"})),
        Entity::new(
            EntityKind::Variable,
            "3",
            "Event Name",
            json!({"type": "v"}),
        ),
    ];
    let mut builder = GraphBuilder::default();
    let graph = builder.build_from_pool(&pool, &[entity_ref(EntityKind::Tag, "1")]);

    assert_eq!(graph.creation_order.len(), graph.len());
    for node_ref in &graph.creation_order {
        assert!(graph.contains(node_ref));
    }
    for node_ref in graph.discovery_order() {
        assert_eq!(
            graph
                .creation_order
                .iter()
                .filter(|r| *r == node_ref)
                .count(),
            1
        );
    }
}

/// Test that hub variables keep an empty edge list no matter what their
/// payload references, and that traversal does not follow those references.
#[test]
fn hub_variables_are_leaves() {
    let pool = vec![
        Entity::new(
            EntityKind::Variable,
            "20",
            "GT Event Settings",
            json!({
                "type": "gtes",
                "parameter": [
                    {"key": "eventSettings", "value": "{{Hidden Dependency}}"},
                ],
            }),
        ),
        Entity::new(
            EntityKind::Variable,
            "21",
            "Hidden Dependency",
            json!({"type": "v"}),
        ),
    ];
    let mut builder = GraphBuilder::default();
    let graph = builder.build_from_pool(&pool, &[entity_ref(EntityKind::Variable, "20")]);

    assert_eq!(graph.len(), 1);
    let hub = graph.get(&entity_ref(EntityKind::Variable, "20")).unwrap();
    assert!(hub.edges.is_empty());
}

/// Test that an unresolvable name placeholder neither crashes the build nor
/// blocks ordering of everything else.
#[test]
fn unresolved_placeholders_are_kept_but_not_ordered() {
    let pool = vec![tag(
        "1",
        "Main",
        json!({"teardownTag": [{"tagName": "No Such Tag"}]}),
    )];
    let mut builder = GraphBuilder::default();
    let graph = builder.build_from_pool(&pool, &[entity_ref(EntityKind::Tag, "1")]);

    assert_eq!(graph.len(), 1);
    assert_eq!(graph.creation_order.len(), 1);
    assert!(graph.recovered.is_empty());
    // The raw edge survives for diagnostics.
    let node = graph.get(&entity_ref(EntityKind::Tag, "1")).unwrap();
    assert_eq!(node.edges.len(), 1);
    assert!(!node.edges[0].is_resolved());
}

/// Test that rebuilding identical input yields identical results.
#[test]
fn rebuilding_identical_input_is_idempotent() {
    let pool = teardown_pair();
    let selection = [
        entity_ref(EntityKind::Tag, "1"),
        entity_ref(EntityKind::Tag, "2"),
    ];
    let mut builder = GraphBuilder::default();
    let first = builder.build_from_pool(&pool, &selection);
    let second = builder.build_from_pool(&pool, &selection);

    assert_eq!(first.discovery_order(), second.discovery_order());
    assert_eq!(first.creation_order, second.creation_order);
    assert_eq!(first.recovered, second.recovered);
}

/// Test the adapter-backed mode end to end: on-demand fetches, name
/// resolution through the collaborator, and the same ordering result as the
/// pool mode.
#[tokio::test]
async fn adapter_backed_build_matches_pool_semantics() {
    let fetcher = PoolFetcher::new(teardown_pair());
    let mut builder = GraphBuilder::default();
    let graph = builder
        .build(&fetcher, &[entity_ref(EntityKind::Tag, "1")])
        .await
        .unwrap();

    assert_eq!(graph.len(), 2);
    assert_eq!(graph.root, entity_ref(EntityKind::Tag, "1"));
    assert_eq!(graph.root_name, "Main");
    assert!(
        order_position(&graph, EntityKind::Tag, "2")
            < order_position(&graph, EntityKind::Tag, "1")
    );
}

/// Test that a template discovered after the tag that uses it still
/// resolves the tag's template edge.
#[tokio::test]
async fn late_template_discovery_still_resolves_the_edge() {
    let fetcher = PoolFetcher::new(vec![
        tag("10", "Consent Tag", json!({"type": "cvt_172990757_195"})),
        Entity::new(
            EntityKind::Template,
            "195",
            "Consent Template",
            json!({"containerId": "172990757", "templateData": ""}),
        ),
    ]);
    let mut builder = GraphBuilder::default();
    let graph = builder
        .build(
            &fetcher,
            &[
                entity_ref(EntityKind::Tag, "10"),
                entity_ref(EntityKind::Template, "195"),
            ],
        )
        .await
        .unwrap();

    assert!(
        order_position(&graph, EntityKind::Template, "195")
            < order_position(&graph, EntityKind::Tag, "10")
    );
    let tag_node = graph.get(&entity_ref(EntityKind::Tag, "10")).unwrap();
    assert!(tag_node.edges.iter().all(|e| e.is_resolved()));
}

/// Test that an absent entity is skipped without failing the build.
#[tokio::test]
async fn absent_entities_are_excluded_silently() {
    let fetcher = PoolFetcher::new(vec![tag(
        "1",
        "Main",
        json!({"firingTriggerId": ["404"]}),
    )]);
    let mut builder = GraphBuilder::default();
    let graph = builder
        .build(&fetcher, &[entity_ref(EntityKind::Tag, "1")])
        .await
        .unwrap();

    assert_eq!(graph.len(), 1);
    assert!(!graph.contains(&entity_ref(EntityKind::Trigger, "404")));
    assert_eq!(graph.creation_order.len(), 1);
}

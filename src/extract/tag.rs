// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::extract::{collect_parameter_values, marker_edges};
use crate::model::{
    value_as_id, DependencyEdge, EdgeKind, Entity, EntityKind, CUSTOM_TEMPLATE_TYPE_PREFIX,
};
use serde_json::Value;

/// Dependency edges declared by a tag payload.
///
/// Tags are the most reference-dense kind: firing and blocking triggers,
/// setup/teardown companion tags (by ID when present, by name otherwise),
/// variable markers in every parameter value, the `configTagId` parameter of
/// config-tag-driven types, and a TEMPLATE edge when the tag's type is
/// backed by a custom template.
pub(super) fn extract(entity: &Entity) -> Vec<DependencyEdge> {
    let mut edges = Vec::new();
    let data = &entity.data;

    for (field, kind) in [
        ("firingTriggerId", EdgeKind::FiringTrigger),
        ("blockingTriggerId", EdgeKind::BlockingTrigger),
    ] {
        if let Some(ids) = data.get(field).and_then(Value::as_array) {
            for (i, id) in ids.iter().enumerate() {
                if let Some(id) = value_as_id(id) {
                    edges.push(DependencyEdge::new(
                        EntityKind::Trigger,
                        id,
                        kind,
                        format!("{field}[{i}]"),
                    ));
                }
            }
        }
    }

    for (field, kind) in [
        ("setupTag", EdgeKind::SetupTag),
        ("teardownTag", EdgeKind::TeardownTag),
    ] {
        if let Some(entries) = data.get(field).and_then(Value::as_array) {
            for (i, entry) in entries.iter().enumerate() {
                let location = format!("{field}[{i}]");
                if let Some(id) = entry.get("tagId").and_then(value_as_id) {
                    edges.push(DependencyEdge::new(EntityKind::Tag, id, kind, location));
                } else if let Some(name) = entry.get("tagName").and_then(Value::as_str) {
                    edges.push(DependencyEdge::by_name(EntityKind::Tag, name, kind, location));
                }
            }
        }
    }

    if let Some(params) = data.get("parameter") {
        let mut values = Vec::new();
        collect_parameter_values(params, "parameter", &mut values);
        for value in &values {
            // A configTagId holding a {{...}} marker is a variable
            // reference, not a literal tag ID.
            if value.key == Some("configTagId") && !value.text.contains("{{") {
                edges.push(DependencyEdge::new(
                    EntityKind::Tag,
                    value.text,
                    EdgeKind::ConfigTag,
                    value.location.clone(),
                ));
            } else {
                marker_edges(value.text, EdgeKind::Parameter, &value.location, &mut edges);
            }
        }
    }

    if let Some(ty) = entity.subtype() {
        if ty.starts_with(CUSTOM_TEMPLATE_TYPE_PREFIX) {
            edges.push(DependencyEdge::by_template_type(ty, "type"));
        }
    }

    edges
}

/// Display names of the companion tags this tag designates as setup or
/// teardown, whether referenced by name or alongside an ID.
pub(crate) fn companion_tag_names(entity: &Entity) -> Vec<String> {
    let mut names = Vec::new();
    for field in ["setupTag", "teardownTag"] {
        if let Some(entries) = entity.data.get(field).and_then(Value::as_array) {
            for entry in entries {
                if let Some(name) = entry.get("tagName").and_then(Value::as_str) {
                    if !names.iter().any(|n| n == name) {
                        names.push(name.to_string());
                    }
                }
            }
        }
    }
    names
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Reference extraction: turn one entity payload into typed dependency edges.
//!
//! Extraction is a pure function of the payload and is total by design:
//! missing or unexpectedly shaped fields simply contribute no edges for that
//! sub-path. Payloads arrive from exports and remote APIs in whatever state
//! the authoring UI left them in, so every probe here is optional and no
//! branch can fail the entity.

mod events;
mod markers;
mod tag;
mod trigger;
mod variable;

pub use events::{detected_custom_event, emitted_events};
pub use markers::scan_variable_markers;

pub(crate) use tag::companion_tag_names;

use crate::model::{DependencyEdge, Entity, EntityKind};
use serde_json::Value;

/// Extract every dependency edge an entity's payload declares.
///
/// Dispatches on the entity kind; templates are leaves and contribute no
/// outgoing edges. Never fails — see the module docs.
pub fn extract_dependencies(entity: &Entity) -> Vec<DependencyEdge> {
    match entity.kind {
        EntityKind::Tag => tag::extract(entity),
        EntityKind::Trigger => trigger::extract(entity),
        EntityKind::Variable => variable::extract(entity),
        EntityKind::Template => Vec::new(),
    }
}

/// One string value found while walking a parameter tree: the parameter key
/// (when the node has one), the value text, and a location path for
/// diagnostics.
pub(crate) struct ParameterValue<'a> {
    pub key: Option<&'a str>,
    pub text: &'a str,
    pub location: String,
}

/// Walk a `parameter` array (or any nested `list`/`map` within it) and
/// collect every string value together with its location.
pub(crate) fn collect_parameter_values<'a>(
    params: &'a Value,
    base: &str,
    out: &mut Vec<ParameterValue<'a>>,
) {
    let Some(entries) = params.as_array() else {
        return;
    };
    for (i, entry) in entries.iter().enumerate() {
        let key = entry.get("key").and_then(Value::as_str);
        let location = match key {
            Some(key) => format!("{base}.{key}"),
            None => format!("{base}[{i}]"),
        };
        if let Some(text) = entry.get("value").and_then(Value::as_str) {
            out.push(ParameterValue {
                key,
                text,
                location: location.clone(),
            });
        }
        for nested in ["list", "map"] {
            if let Some(inner) = entry.get(nested) {
                collect_parameter_values(inner, &location, out);
            }
        }
    }
}

/// Emit one VARIABLE edge per distinct `{{...}}` marker in a string.
pub(crate) fn marker_edges(
    text: &str,
    edge_kind: crate::model::EdgeKind,
    location: &str,
    out: &mut Vec<DependencyEdge>,
) {
    for name in scan_variable_markers(text) {
        out.push(DependencyEdge::by_name(
            EntityKind::Variable,
            &name,
            edge_kind,
            location,
        ));
    }
}

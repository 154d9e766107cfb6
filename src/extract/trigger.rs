// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::extract::{collect_parameter_values, marker_edges};
use crate::model::{DependencyEdge, EdgeKind, Entity};
use serde_json::Value;

/// Filter arrays a trigger payload can carry. Each entry is a condition
/// whose operands live in a nested `parameter` array.
const FILTER_FIELDS: &[&str] = &["filter", "autoEventFilter", "customEventFilter"];

/// Dependency edges declared by a trigger payload.
///
/// Plain parameters keep the generic Parameter category; operands inside
/// filter conditions are tagged FilterCondition so the two reference sites
/// stay distinguishable downstream.
pub(super) fn extract(entity: &Entity) -> Vec<DependencyEdge> {
    let mut edges = Vec::new();
    let data = &entity.data;

    if let Some(params) = data.get("parameter") {
        let mut values = Vec::new();
        collect_parameter_values(params, "parameter", &mut values);
        for value in &values {
            marker_edges(value.text, EdgeKind::Parameter, &value.location, &mut edges);
        }
    }

    for field in FILTER_FIELDS {
        if let Some(conditions) = data.get(*field).and_then(Value::as_array) {
            for (i, condition) in conditions.iter().enumerate() {
                if let Some(params) = condition.get("parameter") {
                    let mut values = Vec::new();
                    collect_parameter_values(params, &format!("{field}[{i}]"), &mut values);
                    for value in &values {
                        marker_edges(
                            value.text,
                            EdgeKind::FilterCondition,
                            &value.location,
                            &mut edges,
                        );
                    }
                }
            }
        }
    }

    edges
}

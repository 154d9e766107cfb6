// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::extract::{collect_parameter_values, marker_edges, ParameterValue};
use crate::model::{DependencyEdge, EdgeKind, Entity};

/// Custom JavaScript variable: the script body is scanned separately.
const CUSTOM_SCRIPT_TYPE: &str = "jsm";
/// Lookup table variable: input selector plus per-row output references.
const LOOKUP_TABLE_TYPE: &str = "smm";
/// Regex table variable: input selector only.
const REGEX_TABLE_TYPE: &str = "remm";

/// Dependency edges declared by a variable payload.
///
/// All parameter values get the generic marker scan; the script, lookup
/// table, and regex table subtypes pull specific parameters out of that
/// pass and tag them with their own categories instead.
pub(super) fn extract(entity: &Entity) -> Vec<DependencyEdge> {
    let mut edges = Vec::new();
    let Some(params) = entity.data.get("parameter") else {
        return edges;
    };
    let mut values = Vec::new();
    collect_parameter_values(params, "parameter", &mut values);

    let subtype = entity.subtype().unwrap_or_default();
    for value in &values {
        match (subtype, value.key) {
            (CUSTOM_SCRIPT_TYPE, Some("javascript")) => {
                marker_edges(value.text, EdgeKind::ScriptReference, &value.location, &mut edges);
            }
            (LOOKUP_TABLE_TYPE | REGEX_TABLE_TYPE, Some("input")) => {
                marker_edges(value.text, EdgeKind::LookupInput, &value.location, &mut edges);
            }
            (LOOKUP_TABLE_TYPE, Some("value")) if in_lookup_map(value) => {
                marker_edges(value.text, EdgeKind::LookupOutput, &value.location, &mut edges);
            }
            _ => {
                marker_edges(value.text, EdgeKind::Parameter, &value.location, &mut edges);
            }
        }
    }
    edges
}

/// Whether a collected value sits inside the lookup table's `map` rows.
fn in_lookup_map(value: &ParameterValue<'_>) -> bool {
    value.location.starts_with("parameter.map")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;
    use serde_json::{json, Value};

    fn variable(ty: &str, data: Value) -> Entity {
        let mut data = data;
        data["type"] = json!(ty);
        Entity::new(EntityKind::Variable, "30", "Test Variable", data)
    }

    #[test]
    fn plain_variable_parameters_are_marker_scanned() {
        let entity = variable("v", json!({
            "parameter": [
                {"type": "template", "key": "defaultValue", "value": "{{Fallback}}"},
            ],
        }));
        let edges = extract(&entity);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].kind, EdgeKind::Parameter);
        assert_eq!(edges[0].name_ref(), Some("Fallback"));
    }

    #[test]
    fn custom_script_body_gets_script_reference_category() {
        let entity = variable(CUSTOM_SCRIPT_TYPE, json!({
            "parameter": [
                {"type": "template", "key": "javascript",
                 "value": "function() { return {{Client ID}} + {{Session ID}}; }"},
            ],
        }));
        let edges = extract(&entity);
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.kind == EdgeKind::ScriptReference));
        let names: Vec<_> = edges.iter().filter_map(|e| e.name_ref()).collect();
        assert_eq!(names, vec!["Client ID", "Session ID"]);
    }

    #[test]
    fn lookup_table_extracts_input_and_output_references() {
        let entity = variable(LOOKUP_TABLE_TYPE, json!({
            "parameter": [
                {"type": "template", "key": "input", "value": "{{Page Path}}"},
                {"type": "list", "key": "map", "list": [
                    {"type": "map", "map": [
                        {"type": "template", "key": "key", "value": "/home"},
                        {"type": "template", "key": "value", "value": "{{Home ID}}"},
                    ]},
                ]},
            ],
        }));
        let edges = extract(&entity);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].kind, EdgeKind::LookupInput);
        assert_eq!(edges[0].name_ref(), Some("Page Path"));
        assert_eq!(edges[1].kind, EdgeKind::LookupOutput);
        assert_eq!(edges[1].name_ref(), Some("Home ID"));
    }

    #[test]
    fn regex_table_extracts_only_the_input_selector() {
        let entity = variable(REGEX_TABLE_TYPE, json!({
            "parameter": [
                {"type": "template", "key": "input", "value": "{{Page URL}}"},
            ],
        }));
        let edges = extract(&entity);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].kind, EdgeKind::LookupInput);
        assert_eq!(edges[0].name_ref(), Some("Page URL"));
    }

    #[test]
    fn missing_parameter_array_yields_no_edges() {
        let entity = variable("v", json!({}));
        assert!(extract(&entity).is_empty());
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Variable subtypes treated as dependency leaves.
///
/// These are the shared platform-settings variables (Google tag event and
/// configuration settings). They are assumed to already exist in any target
/// environment, so their internal references are never traversed.
pub const HUB_VARIABLE_TYPES: &[&str] = &["gtes", "gtcs"];

/// The four entity kinds a container holds.
///
/// IDs are unique only within a kind, so anything that identifies an entity
/// carries the kind alongside the ID (see [`EntityRef`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Tag,
    Trigger,
    Variable,
    Template,
}

impl EntityKind {
    /// Rank used by the secondary creation-order pass: entities of a lower
    /// rank are materialized before entities of a higher rank when the
    /// dependency graph leaves their relative order unconstrained.
    pub fn creation_rank(self) -> u8 {
        match self {
            EntityKind::Template => 0,
            EntityKind::Variable => 1,
            EntityKind::Trigger => 2,
            EntityKind::Tag => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Tag => "tag",
            EntityKind::Trigger => "trigger",
            EntityKind::Variable => "variable",
            EntityKind::Template => "template",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind-scoped entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// One container entity: a tag, trigger, variable, or custom template.
///
/// The payload is kept as raw JSON. Entities are immutable inputs to the
/// graph builder; extraction and traversal only ever read from `data`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub id: String,
    pub name: String,
    pub data: Value,
}

impl Entity {
    pub fn new(kind: EntityKind, id: impl Into<String>, name: impl Into<String>, data: Value) -> Self {
        Self {
            kind,
            id: id.into(),
            name: name.into(),
            data,
        }
    }

    /// Build an entity from one element of a container-export array.
    ///
    /// Returns `None` when the element has no usable ID; malformed entries
    /// are skipped rather than failing the whole export.
    pub fn from_export(kind: EntityKind, data: &Value) -> Option<Self> {
        let id_field = match kind {
            EntityKind::Tag => "tagId",
            EntityKind::Trigger => "triggerId",
            EntityKind::Variable => "variableId",
            EntityKind::Template => "templateId",
        };
        let id = value_as_id(data.get(id_field)?)?;
        let name = data
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Some(Self {
            kind,
            id,
            name,
            data: data.clone(),
        })
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.kind, self.id.clone())
    }

    /// The entity's type string (`type` field), e.g. `html`, `jsm`,
    /// `customEvent`, or a `cvt_...` custom-template type.
    pub fn subtype(&self) -> Option<&str> {
        self.data.get("type").and_then(Value::as_str)
    }

    /// Whether this is a hub variable (shared platform settings, treated as
    /// a dependency leaf).
    pub fn is_hub_variable(&self) -> bool {
        self.kind == EntityKind::Variable
            && self
                .subtype()
                .is_some_and(|ty| HUB_VARIABLE_TYPES.contains(&ty))
    }
}

/// Exports carry IDs as strings, but hand-built payloads sometimes use
/// numbers. Accept both.
pub(crate) fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Lookup indexes built over a candidate entity pool.
//!
//! Three indexes support the graph builder:
//! * [`NameIndex`] resolves `name:` placeholders to concrete IDs.
//! * [`TemplateTypeIndex`] resolves `cvt:` placeholders to template IDs.
//! * [`ReverseIndex`] widens discovery (who uses a companion tag, who emits
//!   an event). It never contributes ordering edges: ordering comes only
//!   from edges extracted out of each entity's own payload.

use crate::extract::{companion_tag_names, emitted_events};
use crate::model::{Entity, EntityKind};
use crate::observability::messages::graph::DuplicateEntityName;
use crate::observability::messages::StructuredLog;
use serde_json::Value;
use std::collections::HashMap;

/// Sentinel public ID present in template data before a gallery ID is
/// assigned.
pub const TEMPLATE_PUBLIC_ID_SENTINEL: &str = "cvt_temp_public_id";

/// Display-name → ID index, per entity kind.
///
/// Display names are not guaranteed unique. When two entities of the same
/// kind share a name the last one indexed wins; that is surfaced as a
/// data-quality warning, not an error.
// TODO: make the duplicate-name policy configurable (first match / error).
#[derive(Debug, Default)]
pub struct NameIndex {
    by_name: HashMap<(EntityKind, String), String>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entities<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Self {
        let mut index = Self::new();
        for entity in entities {
            index.insert(entity);
        }
        index
    }

    pub fn insert(&mut self, entity: &Entity) {
        if entity.name.is_empty() {
            return;
        }
        let key = (entity.kind, entity.name.clone());
        if let Some(previous) = self.by_name.insert(key, entity.id.clone()) {
            if previous != entity.id {
                DuplicateEntityName {
                    kind: entity.kind.label(),
                    name: &entity.name,
                    kept_id: &entity.id,
                    shadowed_id: &previous,
                }
                .log();
            }
        }
    }

    pub fn resolve(&self, kind: EntityKind, name: &str) -> Option<&str> {
        self.by_name
            .get(&(kind, name.to_string()))
            .map(String::as_str)
    }
}

/// Custom-template type-string → template-ID index.
///
/// Two strategies populate it: direct construction of
/// `cvt_<containerId>_<templateId>` from each template's own metadata, and
/// a gallery-assigned public ID embedded in the template data when it
/// differs from the [`TEMPLATE_PUBLIC_ID_SENTINEL`].
#[derive(Debug, Default)]
pub struct TemplateTypeIndex {
    by_type: HashMap<String, String>,
}

impl TemplateTypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_templates<'a>(templates: impl IntoIterator<Item = &'a Entity>) -> Self {
        let mut index = Self::new();
        for template in templates {
            index.insert(template);
        }
        index
    }

    pub fn insert(&mut self, template: &Entity) {
        self.insert_with_container(template, None);
    }

    /// Insert a template, using the export-level container ID when the
    /// template's own metadata does not carry one.
    pub fn insert_with_container(&mut self, template: &Entity, fallback_container: Option<&str>) {
        if template.kind != EntityKind::Template {
            return;
        }
        let container_id = template
            .data
            .get("containerId")
            .and_then(crate::model::value_as_id)
            .or_else(|| fallback_container.map(str::to_string));
        if let Some(container_id) = container_id {
            let constructed = format!("cvt_{}_{}", container_id, template.id);
            self.by_type.insert(constructed, template.id.clone());
        }
        if let Some(public_id) = gallery_public_id(&template.data) {
            if public_id != TEMPLATE_PUBLIC_ID_SENTINEL {
                self.by_type.insert(public_id, template.id.clone());
            }
        }
    }

    pub fn resolve(&self, type_str: &str) -> Option<&str> {
        self.by_type.get(type_str).map(String::as_str)
    }
}

/// Pull a gallery-assigned `cvt_...` public ID out of raw template data.
///
/// Template data is an opaque text blob; this scans for the first `"id"`
/// field whose quoted value carries the custom-template prefix.
fn gallery_public_id(data: &Value) -> Option<String> {
    let text = data.get("templateData").and_then(Value::as_str)?;
    let mut at = 0;
    while let Some(pos) = text[at..].find("\"id\"") {
        let after = &text[at + pos + "\"id\"".len()..];
        at = at + pos + "\"id\"".len();
        let Some(rest) = after.trim_start().strip_prefix(':') else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(rest) = rest.strip_prefix('"') else {
            continue;
        };
        let Some(end) = rest.find('"') else {
            continue;
        };
        let value = &rest[..end];
        if value.starts_with("cvt_") {
            return Some(value.to_string());
        }
    }
    None
}

/// Reverse lookups used only to widen discovery.
#[derive(Debug, Default)]
pub struct ReverseIndex {
    /// Event name → IDs of tags that emit it.
    event_emitters: HashMap<String, Vec<String>>,
    /// Companion tag name → IDs of tags that designate it as setup/teardown.
    companion_users: HashMap<String, Vec<String>>,
}

impl ReverseIndex {
    pub fn build<'a>(pool: impl IntoIterator<Item = &'a Entity>) -> Self {
        let mut index = Self::default();
        for entity in pool {
            if entity.kind != EntityKind::Tag {
                continue;
            }
            for event in emitted_events(entity) {
                index
                    .event_emitters
                    .entry(event)
                    .or_default()
                    .push(entity.id.clone());
            }
            for name in companion_tag_names(entity) {
                index
                    .companion_users
                    .entry(name)
                    .or_default()
                    .push(entity.id.clone());
            }
        }
        index
    }

    /// Tags that emit the given event.
    pub fn emitters_of(&self, event: &str) -> &[String] {
        self.event_emitters.get(event).map_or(&[], Vec::as_slice)
    }

    /// Tags that designate the named tag as a setup/teardown companion.
    pub fn users_of_companion(&self, name: &str) -> &[String] {
        self.companion_users.get(name).map_or(&[], Vec::as_slice)
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Container-export loading.
//!
//! A container export is a single JSON document whose `containerVersion`
//! object carries the entity arrays (`tag`, `trigger`, `variable`,
//! `customTemplate`). Loading produces the flat entity pool the pool-mode
//! builder consumes. Malformed array elements (no usable ID) are skipped
//! rather than failing the whole export; a missing `containerVersion` is a
//! hard error because nothing useful can be built from it.

use crate::model::{Entity, EntityKind};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read export file: {0}")]
    Io(#[from] std::io::Error),

    #[error("export is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("export has no containerVersion object")]
    MissingContainerVersion,
}

/// A loaded container export: the container ID and its entity pool.
#[derive(Debug, Clone)]
pub struct ContainerExport {
    pub container_id: String,
    pub entities: Vec<Entity>,
}

impl ContainerExport {
    /// Entities of one kind, in export order.
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }
}

/// Array field name per entity kind inside `containerVersion`.
const KIND_FIELDS: &[(EntityKind, &str)] = &[
    (EntityKind::Tag, "tag"),
    (EntityKind::Trigger, "trigger"),
    (EntityKind::Variable, "variable"),
    (EntityKind::Template, "customTemplate"),
];

/// Parse an export document from JSON text.
pub fn parse_export(text: &str) -> Result<ContainerExport, ExportError> {
    let document: Value = serde_json::from_str(text)?;
    let version = document
        .get("containerVersion")
        .ok_or(ExportError::MissingContainerVersion)?;

    let container_id = version
        .get("containerId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut entities = Vec::new();
    for (kind, field) in KIND_FIELDS {
        let Some(items) = version.get(field).and_then(Value::as_array) else {
            continue;
        };
        entities.extend(items.iter().filter_map(|item| Entity::from_export(*kind, item)));
    }

    Ok(ContainerExport {
        container_id,
        entities,
    })
}

/// Read and parse an export file.
pub fn load_export(path: impl AsRef<Path>) -> Result<ContainerExport, ExportError> {
    let text = fs::read_to_string(path)?;
    parse_export(&text)
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::model::{EntityKind, EntityRef};
use std::fmt;

/// Prefix for a target referenced by display name, resolved against the
/// name index once the candidate pool is known.
pub const NAME_REF_PREFIX: &str = "name:";

/// Prefix for a target referenced by custom-template type string, resolved
/// against the template-type index.
pub const TEMPLATE_REF_PREFIX: &str = "cvt:";

/// Type-string prefix that marks a tag or variable as backed by a custom
/// template (`cvt_<containerId>_<templateId>`).
pub const CUSTOM_TEMPLATE_TYPE_PREFIX: &str = "cvt_";

/// Category of a dependency reference, recorded for diagnostics and for the
/// downstream summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    FiringTrigger,
    BlockingTrigger,
    SetupTag,
    TeardownTag,
    /// `{{variable}}` marker in a parameter value.
    Parameter,
    /// `{{variable}}` marker inside a trigger filter condition.
    FilterCondition,
    /// `{{variable}}` marker inside a custom-script body.
    ScriptReference,
    /// Lookup/regex table input selector.
    LookupInput,
    /// Variable reference embedded in a lookup-table output value.
    LookupOutput,
    /// `configTagId` parameter pointing at a configuration tag.
    ConfigTag,
    /// Tag type backed by a custom template.
    TemplateType,
}

/// A directed reference from a source entity to a target entity.
///
/// `target` starts out as whatever the payload gave us: a concrete ID, a
/// `name:`-prefixed display name, or a `cvt:`-prefixed template type. It is
/// rewritten in place to a concrete ID once resolution succeeds. Edges that
/// never resolve stay on the node for diagnostics but are excluded from
/// ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyEdge {
    pub target_kind: EntityKind,
    pub target: String,
    pub kind: EdgeKind,
    pub location: String,
}

impl DependencyEdge {
    pub fn new(
        target_kind: EntityKind,
        target: impl Into<String>,
        kind: EdgeKind,
        location: impl Into<String>,
    ) -> Self {
        Self {
            target_kind,
            target: target.into(),
            kind,
            location: location.into(),
        }
    }

    /// Edge targeting an entity by display name.
    pub fn by_name(
        target_kind: EntityKind,
        name: &str,
        kind: EdgeKind,
        location: impl Into<String>,
    ) -> Self {
        Self::new(target_kind, format!("{NAME_REF_PREFIX}{name}"), kind, location)
    }

    /// Edge targeting a custom template by type string.
    pub fn by_template_type(type_str: &str, location: impl Into<String>) -> Self {
        Self::new(
            EntityKind::Template,
            format!("{TEMPLATE_REF_PREFIX}{type_str}"),
            EdgeKind::TemplateType,
            location,
        )
    }

    /// The display name behind a `name:` placeholder, if this edge has one.
    pub fn name_ref(&self) -> Option<&str> {
        self.target.strip_prefix(NAME_REF_PREFIX)
    }

    /// The template type behind a `cvt:` placeholder, if this edge has one.
    pub fn template_ref(&self) -> Option<&str> {
        self.target.strip_prefix(TEMPLATE_REF_PREFIX)
    }

    /// Whether the target is a concrete ID (not a placeholder).
    pub fn is_resolved(&self) -> bool {
        self.name_ref().is_none() && self.template_ref().is_none()
    }

    /// The kind-scoped target, available once the edge is resolved.
    pub fn target_ref(&self) -> Option<EntityRef> {
        if self.is_resolved() {
            Some(EntityRef::new(self.target_kind, self.target.clone()))
        } else {
            None
        }
    }

    /// Rewrite the placeholder to a concrete ID.
    pub fn resolve(&mut self, id: &str) {
        self.target = id.to_string();
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} -> {}:{} (at {})",
            self.kind, self.target_kind, self.target, self.location
        )
    }
}

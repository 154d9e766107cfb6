// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod edge;
mod entity;

pub use edge::{
    DependencyEdge, EdgeKind, CUSTOM_TEMPLATE_TYPE_PREFIX, NAME_REF_PREFIX, TEMPLATE_REF_PREFIX,
};
pub use entity::{Entity, EntityKind, EntityRef, HUB_VARIABLE_TYPES};

pub(crate) use entity::value_as_id;

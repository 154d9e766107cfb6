// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The entity-fetching collaborator boundary.
//!
//! The graph builder's only external dependency. Implementations may be
//! remote API clients, cache-backed proxies, or in-process lookup tables;
//! the builder only awaits their results. "Not found" is a value
//! (`Ok(None)`), never an error: a missing entity is excluded from the
//! graph and the build continues. An `Err` means the transport itself
//! failed and bubbles out of the whole build.

mod pool;

pub use pool::PoolFetcher;

use crate::model::{Entity, EntityKind};
use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failure from an entity fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The underlying transport failed; the identifier names the entity
    /// being fetched when it happened.
    #[error("transport failure fetching {kind} '{identifier}': {message}")]
    Transport {
        kind: EntityKind,
        identifier: String,
        message: String,
    },
}

/// Asynchronous entity lookup by ID or display name.
///
/// Ambiguous display names are the collaborator's concern: it returns the
/// best (or only) entity of the requested kind with that name.
#[async_trait]
pub trait EntityFetcher: Send + Sync {
    /// Fetch an entity by its kind-scoped ID.
    async fn fetch_by_id(
        &self,
        kind: EntityKind,
        id: &str,
    ) -> Result<Option<Entity>, FetchError>;

    /// Fetch an entity of the given kind by display name.
    async fn fetch_by_name(
        &self,
        kind: EntityKind,
        name: &str,
    ) -> Result<Option<Entity>, FetchError>;
}

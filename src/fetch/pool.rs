// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::fetch::{EntityFetcher, FetchError};
use crate::model::{Entity, EntityKind};
use async_trait::async_trait;

/// An [`EntityFetcher`] over an already-materialized entity pool.
///
/// Used by tests and the demo binary, and useful wherever a whole workspace
/// has been loaded up front and per-entity round trips would be wasted.
/// Name lookups follow the same policy as the name index: when several
/// entities of a kind share a name, the last one wins.
#[derive(Debug, Clone, Default)]
pub struct PoolFetcher {
    entities: Vec<Entity>,
}

impl PoolFetcher {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[async_trait]
impl EntityFetcher for PoolFetcher {
    async fn fetch_by_id(
        &self,
        kind: EntityKind,
        id: &str,
    ) -> Result<Option<Entity>, FetchError> {
        Ok(self
            .entities
            .iter()
            .find(|e| e.kind == kind && e.id == id)
            .cloned())
    }

    async fn fetch_by_name(
        &self,
        kind: EntityKind,
        name: &str,
    ) -> Result<Option<Entity>, FetchError> {
        Ok(self
            .entities
            .iter()
            .filter(|e| e.kind == kind && e.name == name)
            .next_back()
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pool() -> PoolFetcher {
        PoolFetcher::new(vec![
            Entity::new(EntityKind::Tag, "1", "Pixel", json!({})),
            Entity::new(EntityKind::Tag, "2", "Pixel", json!({})),
            Entity::new(EntityKind::Variable, "3", "Page Path", json!({})),
        ])
    }

    #[tokio::test]
    async fn fetch_by_id_is_kind_scoped() {
        let fetcher = pool();
        let tag = fetcher.fetch_by_id(EntityKind::Tag, "1").await.unwrap();
        assert_eq!(tag.unwrap().name, "Pixel");
        let miss = fetcher.fetch_by_id(EntityKind::Trigger, "1").await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn fetch_by_name_returns_the_last_match() {
        let fetcher = pool();
        let tag = fetcher.fetch_by_name(EntityKind::Tag, "Pixel").await.unwrap();
        assert_eq!(tag.unwrap().id, "2");
    }

    #[tokio::test]
    async fn absence_is_a_value_not_an_error() {
        let fetcher = pool();
        let miss = fetcher
            .fetch_by_name(EntityKind::Template, "Nope")
            .await
            .unwrap();
        assert!(miss.is_none());
    }
}

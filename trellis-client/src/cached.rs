//! Cached client wrapper.
//!
//! Provides the same read interface as `ApiClient` but checks the query
//! cache first. Mutations pass through to the server and then invalidate
//! the entity's list keys plus any caller-supplied invalidation prefixes,
//! so list views outside the panel re-fetch on their next read.

use tracing::{debug, warn};
use trellis_core::EntityId;

use crate::api_client::{ApiClient, ApiClientError};
use crate::cache::{QueryCache, QueryKey};
use crate::routes::{Operation, RouteSet};
use crate::types::{AttachmentRecord, CreateUpdateRequest, UpdateRecord};

#[derive(Clone)]
pub struct CachedClient {
    client: ApiClient,
    cache: QueryCache,
}

impl CachedClient {
    pub fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// List an entity's updates, serving the cached result when present.
    pub async fn list_updates(
        &self,
        routes: &RouteSet,
        entity_id: EntityId,
    ) -> Result<Vec<UpdateRecord>, ApiClientError> {
        let key = QueryKey::for_operation(Operation::ListUpdates, entity_id);
        if let Some(cached) = self.cache.get::<Vec<UpdateRecord>>(&key).await {
            debug!(key = %key, "cache hit");
            return Ok(cached);
        }
        let updates = self.client.list_updates(routes, entity_id).await?;
        self.cache.put(key, &updates).await;
        Ok(updates)
    }

    /// List an entity's attachments, serving the cached result when present.
    pub async fn list_attachments(
        &self,
        routes: &RouteSet,
        entity_id: EntityId,
    ) -> Result<Vec<AttachmentRecord>, ApiClientError> {
        let key = QueryKey::for_operation(Operation::ListAttachments, entity_id);
        if let Some(cached) = self.cache.get::<Vec<AttachmentRecord>>(&key).await {
            debug!(key = %key, "cache hit");
            return Ok(cached);
        }
        let attachments = self
            .client
            .list_attachments(routes, entity_id)
            .await?
            .attachments;
        self.cache.put(key, &attachments).await;
        Ok(attachments)
    }

    /// Create an update, then invalidate the entity's update list and every
    /// caller-supplied prefix.
    pub async fn create_update(
        &self,
        routes: &RouteSet,
        entity_id: EntityId,
        req: &CreateUpdateRequest,
        invalidation_keys: &[QueryKey],
    ) -> Result<UpdateRecord, ApiClientError> {
        let created = self.client.create_update(routes, entity_id, req).await?;
        self.invalidate_after_mutation(Operation::ListUpdates, entity_id, invalidation_keys)
            .await;
        Ok(created)
    }

    /// Delete an update, then invalidate as for create.
    pub async fn delete_update(
        &self,
        routes: &RouteSet,
        update_id: EntityId,
        entity_id: EntityId,
        invalidation_keys: &[QueryKey],
    ) -> Result<(), ApiClientError> {
        self.client.delete_update(routes, update_id).await?;
        self.invalidate_after_mutation(Operation::ListUpdates, entity_id, invalidation_keys)
            .await;
        Ok(())
    }

    /// Delete an attachment, then invalidate the entity's attachment list
    /// and every caller-supplied prefix.
    pub async fn delete_attachment(
        &self,
        routes: &RouteSet,
        attachment_id: EntityId,
        entity_id: EntityId,
        invalidation_keys: &[QueryKey],
    ) -> Result<(), ApiClientError> {
        self.client.delete_attachment(routes, attachment_id).await?;
        self.invalidate_after_mutation(Operation::ListAttachments, entity_id, invalidation_keys)
            .await;
        Ok(())
    }

    /// Drop the active tab's entry so the next read re-fetches.
    pub async fn force_refetch(&self, op: Operation, entity_id: EntityId) {
        let key = QueryKey::for_operation(op, entity_id);
        self.cache.invalidate(&key).await;
    }

    async fn invalidate_after_mutation(
        &self,
        op: Operation,
        entity_id: EntityId,
        invalidation_keys: &[QueryKey],
    ) {
        let mut removed = self
            .cache
            .invalidate_prefix(&QueryKey::for_operation(op, entity_id))
            .await;
        for prefix in invalidation_keys {
            removed += self.cache.invalidate_prefix(prefix).await;
        }
        if removed == 0 {
            warn!(entity = %entity_id, "mutation invalidated no cache entries");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    // Mutation invalidation operates purely on the cache; exercise the same
    // key discipline CachedClient applies after a successful write.
    #[tokio::test]
    async fn mutation_invalidation_clears_entity_and_board_keys() {
        let cache = QueryCache::new();
        let entity = Uuid::now_v7();
        let other = Uuid::now_v7();
        let board = QueryKey::new(["pipeline-board"]);

        cache
            .put(QueryKey::for_operation(Operation::ListUpdates, entity), &1u32)
            .await;
        cache
            .put(QueryKey::for_operation(Operation::ListUpdates, other), &2u32)
            .await;
        cache
            .put(QueryKey::new(["pipeline-board", "stage-1"]), &3u32)
            .await;

        // The discipline applied by invalidate_after_mutation.
        cache
            .invalidate_prefix(&QueryKey::for_operation(Operation::ListUpdates, entity))
            .await;
        cache.invalidate_prefix(&board).await;

        assert!(
            !cache
                .contains(&QueryKey::for_operation(Operation::ListUpdates, entity))
                .await
        );
        assert!(!cache.contains(&QueryKey::new(["pipeline-board", "stage-1"])).await);
        // The other entity's list is untouched.
        assert!(
            cache
                .contains(&QueryKey::for_operation(Operation::ListUpdates, other))
                .await
        );
    }
}

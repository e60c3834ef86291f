//! Per-entity download/upload pipeline.

use crate::error::SyncResult;
use crate::remote::{Download, RemoteCollection, RemoteStore};
use async_trait::async_trait;
use liftsync_convert::{EntityConverter, RemoteDocument};
use liftsync_core::id::local_id_for_document;
use liftsync_core::{EntityType, LocalRecord, SyncScope, Timestamp};
use liftsync_store::{LocalCollection, MetadataKey, SyncMetadataStore, UploadReceipt};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Everything a pipeline needs from the run that invokes it.
pub struct PipelineContext<'a> {
    /// Installation the bookmarks belong to.
    pub installation_id: &'a str,
    /// Scope being synchronized.
    pub scope: &'a SyncScope,
    /// Bookmark store.
    pub metadata: &'a dyn SyncMetadataStore,
    /// Deadline per remote call.
    pub request_timeout: Duration,
    /// Documents per upload request.
    pub upload_batch_size: usize,
}

/// What one pipeline run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Entity type synchronized.
    pub entity_type: EntityType,
    /// True if no bookmark existed before the run.
    pub first_sync: bool,
    /// Downloaded documents that changed a local row.
    pub downloaded: usize,
    /// Records uploaded.
    pub uploaded: usize,
    /// Bookmark after the run, in remote store time.
    pub bookmark: Timestamp,
}

/// A type-erased entity pipeline, as held by the registry.
#[async_trait]
pub trait EntitySync: Send + Sync {
    /// Entity type this pipeline synchronizes.
    fn entity_type(&self) -> EntityType;

    /// Entity types that must be synchronized first.
    fn dependencies(&self) -> Vec<EntityType> {
        self.entity_type().dependencies().to_vec()
    }

    /// Runs one download-then-upload pass.
    ///
    /// The bookmark is advanced only if every step succeeds, and only to a
    /// time reported by the remote store.
    async fn run(&self, ctx: &PipelineContext<'_>) -> SyncResult<PipelineReport>;
}

/// The pipeline for one entity type.
pub struct EntityPipeline<C: EntityConverter> {
    converter: C,
    remote: RemoteCollection<C::Remote>,
    local: Arc<dyn LocalCollection<C::Local>>,
}

impl<C: EntityConverter> EntityPipeline<C> {
    /// Creates a pipeline reading and writing the converter's collection.
    pub fn new(
        converter: C,
        remote: Arc<dyn RemoteStore>,
        local: Arc<dyn LocalCollection<C::Local>>,
    ) -> Self {
        let collection = converter.entity_type().collection();
        Self {
            converter,
            remote: RemoteCollection::new(remote, collection),
            local,
        }
    }

    /// Picks the local id a downloaded document is stored under.
    ///
    /// An existing row wins, matched first by the embedded local id and then
    /// by remote id. A new row takes the embedded local id when there is
    /// one, so references from other documents resolve to it.
    async fn target_local_id(&self, document: &C::Remote) -> SyncResult<String> {
        if let Some(local_id) = document.local_id() {
            if self.local.get(local_id).await?.is_some() {
                return Ok(local_id.to_string());
            }
        }
        if let Some(existing) = self.local.find_by_remote_id(document.id()).await? {
            return Ok(existing.local_id().to_string());
        }
        Ok(match document.local_id() {
            Some(local_id) => local_id.to_string(),
            None => local_id_for_document(document.id()),
        })
    }

    async fn download(
        &self,
        ctx: &PipelineContext<'_>,
        since: Timestamp,
        first_sync: bool,
    ) -> SyncResult<Download<C::Remote>> {
        if first_sync && self.converter.entity_type().is_read_only() {
            self.remote.download_all(ctx.request_timeout).await
        } else {
            self.remote
                .download_since(ctx.scope, since, ctx.request_timeout)
                .await
        }
    }
}

#[async_trait]
impl<C: EntityConverter> EntitySync for EntityPipeline<C> {
    fn entity_type(&self) -> EntityType {
        self.converter.entity_type()
    }

    async fn run(&self, ctx: &PipelineContext<'_>) -> SyncResult<PipelineReport> {
        let entity_type = self.converter.entity_type();
        let key = MetadataKey::new(ctx.installation_id, entity_type, ctx.scope.scope_id());
        let bookmark = ctx.metadata.get(&key).await?;
        let first_sync = bookmark.is_none();
        let since = bookmark.map_or(Timestamp::EPOCH, |metadata| metadata.last_sync);
        debug!(entity = %entity_type, scope = %ctx.scope, since = %since, first_sync, "pipeline start");

        let fetched = self.download(ctx, since, first_sync).await?;
        let mut records = Vec::with_capacity(fetched.documents.len());
        for item in &fetched.documents {
            let local_id = self.target_local_id(&item.document).await?;
            records.push(self.converter.from_remote(&item.document, &local_id)?);
        }
        let downloaded = self.local.apply_remote(records).await?;
        debug!(
            entity = %entity_type,
            fetched = fetched.documents.len(),
            downloaded,
            "download applied"
        );

        let mut uploaded = 0;
        if !entity_type.is_read_only() {
            let pending = self.local.pending_upload().await?;
            for chunk in pending.chunks(ctx.upload_batch_size.max(1)) {
                let documents: Vec<C::Remote> =
                    chunk.iter().map(|record| self.converter.to_remote(record)).collect();
                self.remote
                    .upload(ctx.scope, &documents, ctx.request_timeout)
                    .await?;

                let receipts: Vec<UploadReceipt> = chunk
                    .iter()
                    .zip(&documents)
                    .map(|(record, document)| UploadReceipt::for_record(record, document.id()))
                    .collect();
                self.local.mark_uploaded(&receipts).await?;
                uploaded += chunk.len();
            }
            debug!(entity = %entity_type, uploaded, "upload complete");
        }

        // Own uploads are stamped after `as_of` and come back unchanged next run.
        let stored = ctx.metadata.advance(&key, fetched.high_water()).await?;

        Ok(PipelineReport {
            entity_type,
            first_sync,
            downloaded,
            uploaded,
            bookmark: stored.last_sync,
        })
    }
}

//! Local collection contract.

use crate::error::StoreResult;
use async_trait::async_trait;
use liftsync_core::{LocalRecord, Timestamp};
use std::sync::Arc;

/// Confirmation that a record reached the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Local id of the uploaded record.
    pub local_id: String,
    /// Document id the record was stored under.
    pub remote_id: String,
    /// `updated_at` of the uploaded version.
    pub updated_at: Timestamp,
}

impl UploadReceipt {
    /// Builds the receipt for `record` stored as `remote_id`.
    pub fn for_record<R: LocalRecord>(record: &R, remote_id: impl Into<String>) -> Self {
        Self {
            local_id: record.local_id().to_string(),
            remote_id: remote_id.into(),
            updated_at: record.updated_at(),
        }
    }
}

/// Accessor for one local table, as seen by a sync pipeline.
///
/// Every row carries a pending-upload flag. Local writes set it, downloaded
/// writes leave it clear, and an upload receipt clears it.
#[async_trait]
pub trait LocalCollection<R: LocalRecord>: Send + Sync {
    /// Returns the record with `local_id`.
    async fn get(&self, local_id: &str) -> StoreResult<Option<R>>;

    /// Returns the record carrying `remote_id`.
    async fn find_by_remote_id(&self, remote_id: &str) -> StoreResult<Option<R>>;

    /// Inserts or replaces records by local id, as local edits pending
    /// upload.
    ///
    /// Either every record is written or none is.
    async fn upsert(&self, records: Vec<R>) -> StoreResult<()>;

    /// Stores downloaded records, not pending upload.
    ///
    /// A row with a pending edit at least as new as the incoming record is
    /// kept, and a row equal to the incoming record is left alone. Returns
    /// the number of rows written.
    async fn apply_remote(&self, records: Vec<R>) -> StoreResult<usize>;

    /// Returns records with local changes not yet uploaded.
    async fn pending_upload(&self) -> StoreResult<Vec<R>>;

    /// Records the remote ids of uploaded records.
    ///
    /// A row edited again since the uploaded version stays pending. Unknown
    /// local ids are ignored.
    async fn mark_uploaded(&self, receipts: &[UploadReceipt]) -> StoreResult<()>;

    /// Returns every record visible through this accessor, ordered by
    /// local id.
    async fn all(&self) -> StoreResult<Vec<R>>;

    /// Number of records visible through this accessor.
    async fn len(&self) -> StoreResult<usize> {
        Ok(self.all().await?.len())
    }
}

/// A view of a shared table restricted to the rows matching a predicate.
///
/// Lookups by id still see every row, so references into the shared table
/// resolve. Listing and remote-id lookups are filtered.
pub struct FilteredCollection<R: LocalRecord> {
    inner: Arc<dyn LocalCollection<R>>,
    predicate: fn(&R) -> bool,
}

impl<R: LocalRecord> FilteredCollection<R> {
    /// Wraps `inner`.
    pub fn new(inner: Arc<dyn LocalCollection<R>>, predicate: fn(&R) -> bool) -> Self {
        Self { inner, predicate }
    }
}

#[async_trait]
impl<R: LocalRecord> LocalCollection<R> for FilteredCollection<R> {
    async fn get(&self, local_id: &str) -> StoreResult<Option<R>> {
        self.inner.get(local_id).await
    }

    async fn find_by_remote_id(&self, remote_id: &str) -> StoreResult<Option<R>> {
        Ok(self
            .inner
            .find_by_remote_id(remote_id)
            .await?
            .filter(|record| (self.predicate)(record)))
    }

    async fn upsert(&self, records: Vec<R>) -> StoreResult<()> {
        self.inner.upsert(records).await
    }

    async fn apply_remote(&self, records: Vec<R>) -> StoreResult<usize> {
        self.inner.apply_remote(records).await
    }

    async fn pending_upload(&self) -> StoreResult<Vec<R>> {
        let mut records = self.inner.pending_upload().await?;
        records.retain(|record| (self.predicate)(record));
        Ok(records)
    }

    async fn mark_uploaded(&self, receipts: &[UploadReceipt]) -> StoreResult<()> {
        self.inner.mark_uploaded(receipts).await
    }

    async fn all(&self) -> StoreResult<Vec<R>> {
        let mut records = self.inner.all().await?;
        records.retain(|record| (self.predicate)(record));
        Ok(records)
    }
}

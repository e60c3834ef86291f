//! Remote document store contract and in-memory implementation.

use crate::clock::{Clock, SystemClock};
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use liftsync_convert::{decode_document, encode_document, RemoteDocument};
use liftsync_core::{SyncScope, Timestamp, SYSTEM_SCOPE_ID};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// An untyped remote document.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRecord {
    /// Document id within its collection.
    pub id: String,
    /// Write time assigned by the store, which downloads filter on.
    pub last_modified: Timestamp,
    /// Document body.
    pub body: serde_json::Value,
}

/// A document to write. The store assigns its write time.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRecord {
    /// Document id within its collection.
    pub id: String,
    /// Document body.
    pub body: serde_json::Value,
}

/// The result of a download.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemoteBatch {
    /// Matching documents.
    pub records: Vec<RemoteRecord>,
    /// Store time the read was served at. Every document written after the
    /// read is stamped strictly later.
    pub as_of: Timestamp,
}

/// A multi-tenant remote document store.
///
/// Documents live in named collections, partitioned by scope. The system
/// scope holds shared read-only data. Write times come from the store's
/// clock, never from the writer's, so a download cursor taken from them is
/// safe across devices with unrelated clocks.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Returns documents in `collection` for `scope` written strictly after
    /// `since`.
    async fn download_since(
        &self,
        collection: &str,
        scope: &SyncScope,
        since: Timestamp,
    ) -> SyncResult<RemoteBatch>;

    /// Creates or replaces documents by id, stamping them with the store's
    /// write time.
    async fn upload(
        &self,
        collection: &str,
        scope: &SyncScope,
        records: Vec<OutgoingRecord>,
    ) -> SyncResult<()>;

    /// Returns every system-scope document in `collection`.
    async fn download_all(&self, collection: &str) -> SyncResult<RemoteBatch>;
}

/// A downloaded, decoded document.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedDocument<D> {
    /// Write time reported by the store.
    pub last_modified: Timestamp,
    /// Decoded document.
    pub document: D,
}

/// Decoded documents plus the store time of the read.
#[derive(Debug, Clone, PartialEq)]
pub struct Download<D> {
    /// Decoded documents.
    pub documents: Vec<FetchedDocument<D>>,
    /// Store time the read was served at.
    pub as_of: Timestamp,
}

impl<D> Download<D> {
    /// Latest store time covered by this download.
    pub fn high_water(&self) -> Timestamp {
        self.documents
            .iter()
            .map(|item| item.last_modified)
            .fold(self.as_of, Timestamp::max)
    }
}

/// Typed access to one remote collection.
pub struct RemoteCollection<D: RemoteDocument> {
    store: Arc<dyn RemoteStore>,
    name: &'static str,
    _document: PhantomData<fn() -> D>,
}

impl<D: RemoteDocument> RemoteCollection<D> {
    /// Creates a typed view of `name`.
    pub fn new(store: Arc<dyn RemoteStore>, name: &'static str) -> Self {
        Self {
            store,
            name,
            _document: PhantomData,
        }
    }

    /// Collection name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Downloads documents written after `since`.
    pub async fn download_since(
        &self,
        scope: &SyncScope,
        since: Timestamp,
        timeout: Duration,
    ) -> SyncResult<Download<D>> {
        let batch = with_timeout(timeout, self.store.download_since(self.name, scope, since)).await?;
        decode_batch(batch)
    }

    /// Downloads every document in the collection.
    pub async fn download_all(&self, timeout: Duration) -> SyncResult<Download<D>> {
        let batch = with_timeout(timeout, self.store.download_all(self.name)).await?;
        decode_batch(batch)
    }

    /// Uploads documents.
    pub async fn upload(&self, scope: &SyncScope, documents: &[D], timeout: Duration) -> SyncResult<()> {
        let records = documents
            .iter()
            .map(|document| -> SyncResult<OutgoingRecord> {
                Ok(OutgoingRecord {
                    id: document.id().to_string(),
                    body: encode_document(document)?,
                })
            })
            .collect::<SyncResult<Vec<_>>>()?;
        with_timeout(timeout, self.store.upload(self.name, scope, records)).await
    }
}

fn decode_batch<D: RemoteDocument>(batch: RemoteBatch) -> SyncResult<Download<D>> {
    let documents = batch
        .records
        .into_iter()
        .map(|record| -> SyncResult<FetchedDocument<D>> {
            Ok(FetchedDocument {
                last_modified: record.last_modified,
                document: decode_document(&record.id, record.body)?,
            })
        })
        .collect::<SyncResult<Vec<_>>>()?;
    Ok(Download {
        documents,
        as_of: batch.as_of,
    })
}

async fn with_timeout<T>(
    timeout: Duration,
    call: impl std::future::Future<Output = SyncResult<T>>,
) -> SyncResult<T> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(SyncError::Timeout),
    }
}

/// A failure injected into [`MemoryRemoteStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedFailure {
    /// Error message.
    pub message: String,
    /// Whether the error is reported as retryable.
    pub retryable: bool,
}

impl InjectedFailure {
    /// A retryable failure, like a dropped connection.
    pub fn unavailable() -> Self {
        Self {
            message: "remote store unavailable".into(),
            retryable: true,
        }
    }

    /// A fatal failure, like a rejected credential.
    pub fn permission_denied() -> Self {
        Self {
            message: "permission denied".into(),
            retryable: false,
        }
    }
}

type Partition = BTreeMap<String, RemoteRecord>;

#[derive(Default)]
struct RemoteState {
    partitions: HashMap<(String, String), Partition>,
    /// Latest write or read time handed out.
    high_water: Timestamp,
}

impl RemoteState {
    /// Marks a read at `now` and returns its time.
    fn read_at(&mut self, now: Timestamp) -> Timestamp {
        self.high_water = self.high_water.max(now);
        self.high_water
    }

    /// Returns a write time strictly after every earlier read and write.
    fn write_at(&mut self, now: Timestamp) -> Timestamp {
        self.high_water = now.max(self.high_water.saturating_add(Duration::from_millis(1)));
        self.high_water
    }
}

/// In-memory [`RemoteStore`] with latency and failure injection.
///
/// Several devices may share one instance to simulate a real backend. Write
/// times come from the store's own clock and strictly increase.
pub struct MemoryRemoteStore {
    state: RwLock<RemoteState>,
    clock: Arc<dyn Clock>,
    latency: RwLock<Duration>,
    collection_latency: RwLock<HashMap<String, Duration>>,
    failures: RwLock<HashMap<String, InjectedFailure>>,
    downloads: AtomicUsize,
    uploads: AtomicUsize,
}

impl Default for MemoryRemoteStore {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl MemoryRemoteStore {
    /// Creates an empty store on the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store reading `clock` for write times.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(RemoteState::default()),
            clock,
            latency: RwLock::new(Duration::ZERO),
            collection_latency: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
            downloads: AtomicUsize::new(0),
            uploads: AtomicUsize::new(0),
        }
    }

    /// Delays every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write() = latency;
    }

    /// Delays calls on `collection` by `latency`, instead of the global one.
    pub fn set_collection_latency(&self, collection: &str, latency: Duration) {
        self.collection_latency
            .write()
            .insert(collection.to_string(), latency);
    }

    /// Makes every call on `collection` fail.
    pub fn fail_collection(&self, collection: &str, failure: InjectedFailure) {
        self.failures.write().insert(collection.to_string(), failure);
    }

    /// Removes every injected failure.
    pub fn clear_failures(&self) {
        self.failures.write().clear();
    }

    /// Stores a document with the write time it carries, bypassing
    /// injection. Used to seed data written by other clients.
    pub fn insert(&self, collection: &str, scope: &SyncScope, record: RemoteRecord) {
        let mut state = self.state.write();
        state.high_water = state.high_water.max(record.last_modified);
        state
            .partitions
            .entry(partition_key(collection, scope.scope_id()))
            .or_default()
            .insert(record.id.clone(), record);
    }

    /// Returns a stored document.
    pub fn get(&self, collection: &str, scope: &SyncScope, id: &str) -> Option<RemoteRecord> {
        self.state
            .read()
            .partitions
            .get(&partition_key(collection, scope.scope_id()))
            .and_then(|partition| partition.get(id).cloned())
    }

    /// Number of documents stored in `collection` for `scope`.
    pub fn count(&self, collection: &str, scope: &SyncScope) -> usize {
        self.state
            .read()
            .partitions
            .get(&partition_key(collection, scope.scope_id()))
            .map_or(0, BTreeMap::len)
    }

    /// Number of download calls served, including failed ones.
    pub fn download_calls(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    /// Number of upload calls served, including failed ones.
    pub fn upload_calls(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    async fn simulate(&self, collection: &str) -> SyncResult<()> {
        let latency = self
            .collection_latency
            .read()
            .get(collection)
            .copied()
            .unwrap_or_else(|| *self.latency.read());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let failure = self.failures.read().get(collection).cloned();
        match failure {
            Some(failure) => Err(SyncError::Transport {
                message: failure.message,
                retryable: failure.retryable,
            }),
            None => Ok(()),
        }
    }

    fn read(
        &self,
        collection: &str,
        scope_id: &str,
        filter: impl Fn(&RemoteRecord) -> bool,
    ) -> RemoteBatch {
        let mut state = self.state.write();
        let as_of = state.read_at(self.clock.now());
        let records = state
            .partitions
            .get(&partition_key(collection, scope_id))
            .map(|partition| {
                partition
                    .values()
                    .filter(|record| filter(*record))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        RemoteBatch { records, as_of }
    }
}

fn partition_key(collection: &str, scope_id: &str) -> (String, String) {
    (collection.to_string(), scope_id.to_string())
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn download_since(
        &self,
        collection: &str,
        scope: &SyncScope,
        since: Timestamp,
    ) -> SyncResult<RemoteBatch> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.simulate(collection).await?;

        let batch = self.read(collection, scope.scope_id(), |record| record.last_modified > since);
        debug!(
            collection,
            scope = %scope,
            since = %since,
            as_of = %batch.as_of,
            count = batch.records.len(),
            "served download"
        );
        Ok(batch)
    }

    async fn upload(
        &self,
        collection: &str,
        scope: &SyncScope,
        records: Vec<OutgoingRecord>,
    ) -> SyncResult<()> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.simulate(collection).await?;

        let count = records.len();
        let mut state = self.state.write();
        let stamp = state.write_at(self.clock.now());
        let partition = state
            .partitions
            .entry(partition_key(collection, scope.scope_id()))
            .or_default();
        for record in records {
            partition.insert(
                record.id.clone(),
                RemoteRecord {
                    id: record.id,
                    last_modified: stamp,
                    body: record.body,
                },
            );
        }
        debug!(collection, scope = %scope, count, stamp = %stamp, "accepted upload");
        Ok(())
    }

    async fn download_all(&self, collection: &str) -> SyncResult<RemoteBatch> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.simulate(collection).await?;

        Ok(self.read(collection, SYSTEM_SCOPE_ID, |_| true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use liftsync_convert::{RemoteTimestamp, WorkoutDocument};
    use serde_json::json;

    fn record(id: &str, millis: i64) -> RemoteRecord {
        RemoteRecord {
            id: id.into(),
            last_modified: Timestamp::from_millis(millis),
            body: json!({"name": id}),
        }
    }

    fn outgoing(id: &str) -> OutgoingRecord {
        OutgoingRecord {
            id: id.into(),
            body: json!({"name": id}),
        }
    }

    fn store_at(millis: i64) -> (MemoryRemoteStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Timestamp::from_millis(millis)));
        (MemoryRemoteStore::with_clock(clock.clone()), clock)
    }

    #[tokio::test]
    async fn download_since_is_strict_and_scoped() {
        let store = MemoryRemoteStore::new();
        let alice = SyncScope::user("alice");
        store.insert("workouts", &alice, record("a", 10));
        store.insert("workouts", &alice, record("b", 20));
        store.insert("workouts", &SyncScope::user("bob"), record("c", 30));

        let since_ten = store
            .download_since("workouts", &alice, Timestamp::from_millis(10))
            .await
            .unwrap();
        assert_eq!(since_ten.records.len(), 1);
        assert_eq!(since_ten.records[0].id, "b");

        let everything = store
            .download_since("workouts", &alice, Timestamp::EPOCH)
            .await
            .unwrap();
        assert_eq!(everything.records.len(), 2);
        assert_eq!(store.download_calls(), 2);
    }

    #[tokio::test]
    async fn uploads_are_stamped_by_the_store() {
        let (store, clock) = store_at(5_000);
        let scope = SyncScope::user("u");

        store.upload("workouts", &scope, vec![outgoing("a"), outgoing("b")]).await.unwrap();
        assert_eq!(store.get("workouts", &scope, "a").unwrap().last_modified, Timestamp::from_millis(5_000));
        assert_eq!(store.get("workouts", &scope, "b").unwrap().last_modified, Timestamp::from_millis(5_000));

        store.upload("workouts", &scope, vec![outgoing("a")]).await.unwrap();
        assert_eq!(store.get("workouts", &scope, "a").unwrap().last_modified, Timestamp::from_millis(5_001));

        clock.advance(Duration::from_secs(1));
        store.upload("workouts", &scope, vec![outgoing("c")]).await.unwrap();
        assert_eq!(store.get("workouts", &scope, "c").unwrap().last_modified, Timestamp::from_millis(6_000));
    }

    #[tokio::test]
    async fn writes_after_a_read_are_newer_than_the_read() {
        let (store, clock) = store_at(5_000);
        let scope = SyncScope::user("u");

        let read = store.download_since("workouts", &scope, Timestamp::EPOCH).await.unwrap();
        assert!(read.records.is_empty());
        assert_eq!(read.as_of, Timestamp::from_millis(5_000));

        store.upload("workouts", &scope, vec![outgoing("a")]).await.unwrap();
        let next = store.download_since("workouts", &scope, read.as_of).await.unwrap();
        assert_eq!(next.records.len(), 1);
        assert!(next.as_of >= next.records[0].last_modified);

        clock.set(Timestamp::from_millis(1_000));
        store.upload("workouts", &scope, vec![outgoing("b")]).await.unwrap();
        let after_skew = store.download_since("workouts", &scope, next.as_of).await.unwrap();
        assert_eq!(after_skew.records.len(), 1);
        assert_eq!(after_skew.records[0].id, "b");
    }

    #[tokio::test]
    async fn download_all_reads_system_scope() {
        let store = MemoryRemoteStore::new();
        store.insert("exercises", &SyncScope::System, record("squat", 0));
        store.insert("exercises", &SyncScope::user("alice"), record("mine", 0));

        let all = store.download_all("exercises").await.unwrap();
        assert_eq!(all.records.len(), 1);
        assert_eq!(all.records[0].id, "squat");
    }

    #[tokio::test]
    async fn injected_failures() {
        let store = MemoryRemoteStore::new();
        store.fail_collection("workouts", InjectedFailure::permission_denied());

        let err = store
            .upload("workouts", &SyncScope::user("u"), vec![outgoing("a")])
            .await
            .unwrap_err();
        assert!(!err.is_retryable());
        assert_eq!(store.count("workouts", &SyncScope::user("u")), 0);

        store.clear_failures();
        store
            .upload("workouts", &SyncScope::user("u"), vec![outgoing("a")])
            .await
            .unwrap();
        assert_eq!(store.count("workouts", &SyncScope::user("u")), 1);
        assert_eq!(store.upload_calls(), 2);
    }

    #[tokio::test]
    async fn slow_calls_time_out() {
        let store = Arc::new(MemoryRemoteStore::new());
        store.set_collection_latency("workouts", Duration::from_millis(200));
        let collection: RemoteCollection<WorkoutDocument> =
            RemoteCollection::new(store.clone(), "workouts");

        let result = collection
            .download_since(&SyncScope::user("u"), Timestamp::EPOCH, Duration::from_millis(20))
            .await;
        assert!(matches!(result, Err(SyncError::Timeout)));
    }

    #[tokio::test]
    async fn typed_collection_round_trip() {
        let (store, _clock) = store_at(9_000);
        let store = Arc::new(store);
        let collection: RemoteCollection<WorkoutDocument> =
            RemoteCollection::new(store.clone(), "workouts");
        let scope = SyncScope::user("u");
        let document = WorkoutDocument {
            id: "w-doc".into(),
            local_id: Some("w-1".into()),
            last_modified: Some(RemoteTimestamp::new(3, 0)),
            name: "Pull".into(),
            ..WorkoutDocument::default()
        };

        collection
            .upload(&scope, std::slice::from_ref(&document), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(
            store.get("workouts", &scope, "w-doc").unwrap().last_modified,
            Timestamp::from_millis(9_000)
        );

        let fetched = collection
            .download_since(&scope, Timestamp::EPOCH, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(fetched.documents.len(), 1);
        assert_eq!(fetched.documents[0].document, document);
        assert_eq!(fetched.high_water(), Timestamp::from_millis(9_000));
    }
}

//! In-memory local database.

use crate::error::{StoreError, StoreResult};
use crate::local::{FilteredCollection, LocalCollection, UploadReceipt};
use async_trait::async_trait;
use liftsync_core::records::{
    BodyMeasurementRecord, ExerciseLogRecord, ExerciseRecord, ExerciseUsageRecord,
    PersonalRecordEntry, ProgrammeExerciseRecord, ProgrammeProgressRecord, ProgrammeRecord,
    ProgrammeWeekRecord, ProgrammeWorkoutRecord, SetLogRecord, UserProfileRecord, WorkoutRecord,
};
use liftsync_core::LocalRecord;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Ids present in every table, shared by the collections of one database
/// so that upserts can check foreign keys.
#[derive(Debug, Default)]
pub struct KeyIndex {
    tables: RwLock<HashMap<&'static str, HashSet<String>>>,
}

impl KeyIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `table` holds `id`.
    pub fn contains(&self, table: &str, id: &str) -> bool {
        self.tables
            .read()
            .get(table)
            .is_some_and(|ids| ids.contains(id))
    }

    fn insert_all<'a>(&self, table: &'static str, ids: impl IntoIterator<Item = &'a str>) {
        let mut tables = self.tables.write();
        let entry = tables.entry(table).or_default();
        for id in ids {
            entry.insert(id.to_string());
        }
    }
}

/// A stored record and its pending-upload flag.
#[derive(Debug, Clone)]
struct Row<R> {
    record: R,
    pending: bool,
}

/// In-memory [`LocalCollection`].
///
/// When attached to a [`KeyIndex`], every write is rejected with
/// [`StoreError::MissingReference`] unless the rows it points at already
/// exist, the way SQLite rejects rows violating a foreign key.
pub struct MemoryCollection<R: LocalRecord> {
    rows: RwLock<BTreeMap<String, Row<R>>>,
    index: Option<Arc<KeyIndex>>,
}

impl<R: LocalRecord> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            index: None,
        }
    }
}

impl<R: LocalRecord> MemoryCollection<R> {
    /// Creates a standalone collection that does not check references.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection that checks references against `index`.
    #[must_use]
    pub fn with_index(index: Arc<KeyIndex>) -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            index: Some(index),
        }
    }

    fn check_references(&self, records: &[R]) -> StoreResult<()> {
        let Some(index) = &self.index else {
            return Ok(());
        };
        let batch: HashSet<&str> = records.iter().map(LocalRecord::local_id).collect();

        for record in records {
            for reference in record.references() {
                let in_batch = reference.table == R::TABLE && batch.contains(reference.id);
                if !in_batch && !index.contains(reference.table, reference.id) {
                    return Err(StoreError::MissingReference {
                        table: R::TABLE,
                        id: record.local_id().to_string(),
                        referenced_table: reference.table,
                        referenced_id: reference.id.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn write(&self, records: Vec<R>, pending: bool) -> StoreResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        self.check_references(&records)?;

        if let Some(index) = &self.index {
            index.insert_all(R::TABLE, records.iter().map(LocalRecord::local_id));
        }
        let mut rows = self.rows.write();
        for record in records {
            rows.insert(record.local_id().to_string(), Row { record, pending });
        }
        Ok(())
    }
}

#[async_trait]
impl<R: LocalRecord> LocalCollection<R> for MemoryCollection<R> {
    async fn get(&self, local_id: &str) -> StoreResult<Option<R>> {
        Ok(self.rows.read().get(local_id).map(|row| row.record.clone()))
    }

    async fn find_by_remote_id(&self, remote_id: &str) -> StoreResult<Option<R>> {
        Ok(self
            .rows
            .read()
            .values()
            .find(|row| row.record.remote_id() == Some(remote_id))
            .map(|row| row.record.clone()))
    }

    async fn upsert(&self, records: Vec<R>) -> StoreResult<()> {
        self.write(records, true)
    }

    async fn apply_remote(&self, records: Vec<R>) -> StoreResult<usize> {
        let incoming: Vec<R> = {
            let rows = self.rows.read();
            records
                .into_iter()
                .filter(|record| match rows.get(record.local_id()) {
                    None => true,
                    Some(row) if row.pending => row.record.updated_at() < record.updated_at(),
                    Some(row) => row.record != *record,
                })
                .collect()
        };
        let written = incoming.len();
        self.write(incoming, false)?;
        Ok(written)
    }

    async fn pending_upload(&self) -> StoreResult<Vec<R>> {
        Ok(self
            .rows
            .read()
            .values()
            .filter(|row| row.pending)
            .map(|row| row.record.clone())
            .collect())
    }

    async fn mark_uploaded(&self, receipts: &[UploadReceipt]) -> StoreResult<()> {
        let mut rows = self.rows.write();
        for receipt in receipts {
            if let Some(row) = rows.get_mut(&receipt.local_id) {
                row.record.set_remote_id(receipt.remote_id.clone());
                if row.record.updated_at() == receipt.updated_at {
                    row.pending = false;
                }
            }
        }
        Ok(())
    }

    async fn all(&self) -> StoreResult<Vec<R>> {
        Ok(self.rows.read().values().map(|row| row.record.clone()).collect())
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(self.rows.read().len())
    }
}

/// Accessors for every synchronized local table.
///
/// `exercises` and `custom_exercises` are two views of the same table: the
/// first sees every exercise, the second only user-defined ones.
#[derive(Clone)]
pub struct LocalCollections {
    /// Catalog and custom exercises.
    pub exercises: Arc<dyn LocalCollection<ExerciseRecord>>,
    /// Custom exercises only.
    pub custom_exercises: Arc<dyn LocalCollection<ExerciseRecord>>,
    /// User profiles.
    pub user_profiles: Arc<dyn LocalCollection<UserProfileRecord>>,
    /// Body measurements.
    pub body_measurements: Arc<dyn LocalCollection<BodyMeasurementRecord>>,
    /// Programmes.
    pub programmes: Arc<dyn LocalCollection<ProgrammeRecord>>,
    /// Programme weeks.
    pub programme_weeks: Arc<dyn LocalCollection<ProgrammeWeekRecord>>,
    /// Programme workouts.
    pub programme_workouts: Arc<dyn LocalCollection<ProgrammeWorkoutRecord>>,
    /// Programme exercises.
    pub programme_exercises: Arc<dyn LocalCollection<ProgrammeExerciseRecord>>,
    /// Programme progress.
    pub programme_progress: Arc<dyn LocalCollection<ProgrammeProgressRecord>>,
    /// Workouts.
    pub workouts: Arc<dyn LocalCollection<WorkoutRecord>>,
    /// Exercise logs.
    pub exercise_logs: Arc<dyn LocalCollection<ExerciseLogRecord>>,
    /// Set logs.
    pub set_logs: Arc<dyn LocalCollection<SetLogRecord>>,
    /// Personal records.
    pub personal_records: Arc<dyn LocalCollection<PersonalRecordEntry>>,
    /// Exercise usage.
    pub exercise_usage: Arc<dyn LocalCollection<ExerciseUsageRecord>>,
}

/// An in-memory local database with foreign-key checks across tables.
pub struct MemoryDatabase {
    index: Arc<KeyIndex>,
    collections: LocalCollections,
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDatabase {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        let index = Arc::new(KeyIndex::new());
        let exercises: Arc<dyn LocalCollection<ExerciseRecord>> =
            Arc::new(MemoryCollection::with_index(index.clone()));
        let custom_exercises = Arc::new(FilteredCollection::new(exercises.clone(), |record| {
            record.is_custom
        }));

        let collections = LocalCollections {
            exercises,
            custom_exercises,
            user_profiles: Arc::new(MemoryCollection::with_index(index.clone())),
            body_measurements: Arc::new(MemoryCollection::with_index(index.clone())),
            programmes: Arc::new(MemoryCollection::with_index(index.clone())),
            programme_weeks: Arc::new(MemoryCollection::with_index(index.clone())),
            programme_workouts: Arc::new(MemoryCollection::with_index(index.clone())),
            programme_exercises: Arc::new(MemoryCollection::with_index(index.clone())),
            programme_progress: Arc::new(MemoryCollection::with_index(index.clone())),
            workouts: Arc::new(MemoryCollection::with_index(index.clone())),
            exercise_logs: Arc::new(MemoryCollection::with_index(index.clone())),
            set_logs: Arc::new(MemoryCollection::with_index(index.clone())),
            personal_records: Arc::new(MemoryCollection::with_index(index.clone())),
            exercise_usage: Arc::new(MemoryCollection::with_index(index.clone())),
        };

        Self { index, collections }
    }

    /// Returns the table accessors.
    #[must_use]
    pub fn collections(&self) -> LocalCollections {
        self.collections.clone()
    }

    /// Returns true if `table` holds `id`.
    #[must_use]
    pub fn contains(&self, table: &str, id: &str) -> bool {
        self.index.contains(table, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftsync_core::enums::{SetType, WorkoutStatus};
    use liftsync_core::Timestamp;

    fn workout(id: &str, updated_at: i64) -> WorkoutRecord {
        WorkoutRecord {
            local_id: id.into(),
            remote_id: None,
            name: "Push".into(),
            status: WorkoutStatus::Completed,
            started_at: Timestamp::from_millis(1),
            finished_at: None,
            programme_workout_id: None,
            notes: None,
            updated_at: Timestamp::from_millis(updated_at),
        }
    }

    fn set_log(id: &str, exercise_log_id: &str) -> SetLogRecord {
        SetLogRecord {
            local_id: id.into(),
            remote_id: None,
            exercise_log_id: exercise_log_id.into(),
            set_number: 1,
            set_type: SetType::Standard,
            reps: 5,
            weight_kg: 100.0,
            rpe: None,
            completed: true,
            completed_at: None,
            updated_at: Timestamp::from_millis(1),
        }
    }

    fn local_ids(records: Vec<WorkoutRecord>) -> Vec<String> {
        let mut ids: Vec<String> = records.into_iter().map(|r| r.local_id).collect();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn upsert_and_lookup() {
        let collection: MemoryCollection<WorkoutRecord> = MemoryCollection::new();
        let record = workout("w-1", 10);
        collection.upsert(vec![record.clone()]).await.unwrap();

        assert!(collection.get("w-1").await.unwrap().is_some());
        assert!(collection.get("w-2").await.unwrap().is_none());
        assert_eq!(collection.len().await.unwrap(), 1);

        collection
            .mark_uploaded(&[
                UploadReceipt::for_record(&record, "doc-1"),
                UploadReceipt::for_record(&workout("w-9", 10), "doc-9"),
            ])
            .await
            .unwrap();
        let found = collection.find_by_remote_id("doc-1").await.unwrap().unwrap();
        assert_eq!(found.local_id, "w-1");
    }

    #[tokio::test]
    async fn local_writes_are_pending_until_uploaded() {
        let collection: MemoryCollection<WorkoutRecord> = MemoryCollection::new();
        let first = workout("w-1", 10);
        collection
            .upsert(vec![first.clone(), workout("w-2", 5)])
            .await
            .unwrap();
        assert_eq!(local_ids(collection.pending_upload().await.unwrap()), ["w-1", "w-2"]);

        collection
            .mark_uploaded(&[UploadReceipt::for_record(&first, "w-1")])
            .await
            .unwrap();
        assert_eq!(local_ids(collection.pending_upload().await.unwrap()), ["w-2"]);
    }

    #[tokio::test]
    async fn edit_during_upload_stays_pending() {
        let collection: MemoryCollection<WorkoutRecord> = MemoryCollection::new();
        let uploaded = workout("w-1", 10);
        collection.upsert(vec![uploaded.clone()]).await.unwrap();
        collection.upsert(vec![workout("w-1", 20)]).await.unwrap();

        collection
            .mark_uploaded(&[UploadReceipt::for_record(&uploaded, "w-1")])
            .await
            .unwrap();
        let pending = collection.pending_upload().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].updated_at, Timestamp::from_millis(20));
        assert_eq!(pending[0].remote_id.as_deref(), Some("w-1"));
    }

    #[tokio::test]
    async fn downloads_are_not_pending() {
        let collection: MemoryCollection<WorkoutRecord> = MemoryCollection::new();
        let mut remote = workout("w-1", 10);
        remote.remote_id = Some("w-1".into());

        assert_eq!(collection.apply_remote(vec![remote.clone()]).await.unwrap(), 1);
        assert!(collection.pending_upload().await.unwrap().is_empty());
        assert_eq!(collection.apply_remote(vec![remote]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn newer_pending_edit_survives_download() {
        let collection: MemoryCollection<WorkoutRecord> = MemoryCollection::new();
        let mut edited = workout("w-1", 50);
        edited.name = "Local".into();
        collection.upsert(vec![edited]).await.unwrap();

        let mut stale = workout("w-1", 40);
        stale.name = "Remote".into();
        assert_eq!(collection.apply_remote(vec![stale]).await.unwrap(), 0);
        let kept = collection.get("w-1").await.unwrap().unwrap();
        assert_eq!(kept.name, "Local");
        assert_eq!(collection.pending_upload().await.unwrap().len(), 1);

        let mut newer = workout("w-1", 60);
        newer.name = "Remote".into();
        assert_eq!(collection.apply_remote(vec![newer]).await.unwrap(), 1);
        assert_eq!(collection.get("w-1").await.unwrap().unwrap().name, "Remote");
        assert!(collection.pending_upload().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = MemoryDatabase::new();
        let collections = db.collections();

        let err = collections
            .set_logs
            .upsert(vec![set_log("s-1", "el-missing")])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingReference {
                referenced_table: "exercise_logs",
                ..
            }
        ));
        assert_eq!(collections.set_logs.len().await.unwrap(), 0);
        assert!(!db.contains("set_logs", "s-1"));
    }

    #[tokio::test]
    async fn custom_exercise_view_filters_rows() {
        let db = MemoryDatabase::new();
        let collections = db.collections();
        let exercise = |id: &str, is_custom: bool| ExerciseRecord {
            local_id: id.into(),
            remote_id: None,
            name: id.into(),
            category: Default::default(),
            equipment: Default::default(),
            description: None,
            is_custom,
            muscles: Vec::new(),
            instructions: Vec::new(),
            aliases: Vec::new(),
            created_at: Timestamp::EPOCH,
            updated_at: Timestamp::EPOCH,
        };
        collections
            .exercises
            .upsert(vec![exercise("catalog", false), exercise("mine", true)])
            .await
            .unwrap();

        assert_eq!(collections.exercises.len().await.unwrap(), 2);
        assert_eq!(collections.custom_exercises.len().await.unwrap(), 1);
        let pending = collections.custom_exercises.pending_upload().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].local_id, "mine");
        assert!(collections.custom_exercises.get("catalog").await.unwrap().is_some());
        assert!(db.contains("exercises", "mine"));
    }
}

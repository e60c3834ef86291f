//! Personal records and exercise usage statistics.

use super::{local_record, Reference};
use crate::entity::EntityType;
use crate::enums::RecordType;
use crate::types::Timestamp;

/// A personal best for one exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalRecordEntry {
    /// Local id.
    pub local_id: String,
    /// Remote document id.
    pub remote_id: Option<String>,
    /// Catalog or custom exercise.
    pub exercise_id: String,
    /// Which metric the record is for.
    pub record_type: RecordType,
    /// Record value (kg, reps or kg*reps depending on type).
    pub value: f64,
    /// Reps performed when the record was set.
    pub reps: Option<u32>,
    /// When the record was set.
    pub achieved_at: Timestamp,
    /// Set that produced the record.
    pub set_log_id: Option<String>,
    /// Last modification time.
    pub updated_at: Timestamp,
}

/// How often and how recently an exercise is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseUsageRecord {
    /// Local id.
    pub local_id: String,
    /// Remote document id.
    pub remote_id: Option<String>,
    /// Catalog or custom exercise.
    pub exercise_id: String,
    /// Number of workouts the exercise appeared in.
    pub usage_count: u32,
    /// Most recent use.
    pub last_used_at: Option<Timestamp>,
    /// Pinned by the user.
    pub is_favourite: bool,
    /// Last modification time.
    pub updated_at: Timestamp,
}

local_record!(PersonalRecordEntry, EntityType::PersonalRecord.table(), |record| {
    let mut references = vec![Reference::new(EntityType::Exercise.table(), &record.exercise_id)];
    if let Some(set_log_id) = &record.set_log_id {
        references.push(Reference::new(EntityType::SetLog.table(), set_log_id));
    }
    references
});

local_record!(ExerciseUsageRecord, EntityType::ExerciseUsage.table(), |record| {
    vec![Reference::new(EntityType::Exercise.table(), &record.exercise_id)]
});

//! Logged workouts, exercises and sets.

use super::{local_record, Reference};
use crate::entity::EntityType;
use crate::enums::{SetType, WorkoutStatus};
use crate::types::Timestamp;

/// A logged workout session.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRecord {
    /// Local id.
    pub local_id: String,
    /// Remote document id.
    pub remote_id: Option<String>,
    /// Session name.
    pub name: String,
    /// Lifecycle state.
    pub status: WorkoutStatus,
    /// Start time.
    pub started_at: Timestamp,
    /// End time, once finished.
    pub finished_at: Option<Timestamp>,
    /// Programme day this session follows, if any.
    pub programme_workout_id: Option<String>,
    /// Free-text note.
    pub notes: Option<String>,
    /// Last modification time.
    pub updated_at: Timestamp,
}

/// One exercise performed in a workout.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseLogRecord {
    /// Local id.
    pub local_id: String,
    /// Remote document id.
    pub remote_id: Option<String>,
    /// Owning workout.
    pub workout_id: String,
    /// Catalog or custom exercise.
    pub exercise_id: String,
    /// Position within the workout.
    pub order_index: u32,
    /// Free-text note.
    pub notes: Option<String>,
    /// Last modification time.
    pub updated_at: Timestamp,
}

/// One set performed for an exercise log.
#[derive(Debug, Clone, PartialEq)]
pub struct SetLogRecord {
    /// Local id.
    pub local_id: String,
    /// Remote document id.
    pub remote_id: Option<String>,
    /// Owning exercise log.
    pub exercise_log_id: String,
    /// 1-based set number.
    pub set_number: u32,
    /// How the set was performed.
    pub set_type: SetType,
    /// Repetitions.
    pub reps: u32,
    /// Load in kilograms.
    pub weight_kg: f64,
    /// Rate of perceived exertion.
    pub rpe: Option<f64>,
    /// Ticked off by the user.
    pub completed: bool,
    /// When the set was ticked off.
    pub completed_at: Option<Timestamp>,
    /// Last modification time.
    pub updated_at: Timestamp,
}

local_record!(WorkoutRecord, EntityType::Workout.table(), |record| {
    record
        .programme_workout_id
        .as_deref()
        .map(|id| Reference::new(EntityType::ProgrammeWorkout.table(), id))
        .into_iter()
        .collect()
});

local_record!(ExerciseLogRecord, EntityType::ExerciseLog.table(), |record| {
    vec![
        Reference::new(EntityType::Workout.table(), &record.workout_id),
        Reference::new(EntityType::Exercise.table(), &record.exercise_id),
    ]
});

local_record!(SetLogRecord, EntityType::SetLog.table(), |record| {
    vec![Reference::new(EntityType::ExerciseLog.table(), &record.exercise_log_id)]
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::LocalRecord;

    fn workout(programme_workout_id: Option<&str>) -> WorkoutRecord {
        WorkoutRecord {
            local_id: "w-1".into(),
            remote_id: None,
            name: "Push".into(),
            status: WorkoutStatus::Completed,
            started_at: Timestamp::from_millis(10),
            finished_at: None,
            programme_workout_id: programme_workout_id.map(str::to_string),
            notes: None,
            updated_at: Timestamp::from_millis(20),
        }
    }

    #[test]
    fn optional_reference() {
        assert!(workout(None).references().is_empty());
        assert_eq!(
            workout(Some("pw-1")).references(),
            vec![Reference::new("programme_workouts", "pw-1")]
        );
    }

    #[test]
    fn document_id_prefers_remote_id() {
        let mut record = workout(None);
        assert_eq!(record.document_id(), "w-1");
        record.set_remote_id("doc-9".into());
        assert_eq!(record.document_id(), "doc-9");
        assert_eq!(record.remote_id(), Some("doc-9"));
    }
}

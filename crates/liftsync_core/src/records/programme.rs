//! Training programmes and their structure.

use super::{local_record, Reference};
use crate::entity::EntityType;
use crate::enums::ProgrammeGoal;
use crate::types::Timestamp;

/// A training programme.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgrammeRecord {
    /// Local id.
    pub local_id: String,
    /// Remote document id.
    pub remote_id: Option<String>,
    /// Programme name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Training goal.
    pub goal: ProgrammeGoal,
    /// Planned length.
    pub duration_weeks: u32,
    /// True for the programme the user is currently following.
    pub is_active: bool,
    /// True if produced by the programme generator.
    pub is_generated: bool,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last modification time.
    pub updated_at: Timestamp,
}

/// A week inside a programme.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgrammeWeekRecord {
    /// Local id.
    pub local_id: String,
    /// Remote document id.
    pub remote_id: Option<String>,
    /// Owning programme.
    pub programme_id: String,
    /// 1-based week number.
    pub week_number: u32,
    /// Optional label ("Deload", "Peak").
    pub name: Option<String>,
    /// Reduced-volume week.
    pub is_deload: bool,
    /// Last modification time.
    pub updated_at: Timestamp,
}

/// A planned workout day inside a programme week.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgrammeWorkoutRecord {
    /// Local id.
    pub local_id: String,
    /// Remote document id.
    pub remote_id: Option<String>,
    /// Owning week.
    pub week_id: String,
    /// 1-based day within the week.
    pub day_number: u32,
    /// Workout name.
    pub name: String,
    /// Expected duration.
    pub estimated_minutes: Option<u32>,
    /// Last modification time.
    pub updated_at: Timestamp,
}

/// A planned exercise inside a programme workout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgrammeExerciseRecord {
    /// Local id.
    pub local_id: String,
    /// Remote document id.
    pub remote_id: Option<String>,
    /// Owning programme workout.
    pub programme_workout_id: String,
    /// Catalog or custom exercise.
    pub exercise_id: String,
    /// Position within the workout.
    pub order_index: u32,
    /// Prescribed number of sets.
    pub target_sets: u32,
    /// Prescribed reps, e.g. `"8-12"`.
    pub target_reps: String,
    /// Prescribed effort.
    pub target_rpe: Option<f64>,
    /// Rest between sets.
    pub rest_seconds: Option<u32>,
    /// Coaching note.
    pub notes: Option<String>,
    /// Last modification time.
    pub updated_at: Timestamp,
}

/// The user's position in a programme.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgrammeProgressRecord {
    /// Local id.
    pub local_id: String,
    /// Remote document id.
    pub remote_id: Option<String>,
    /// Programme being followed.
    pub programme_id: String,
    /// Current week (1-based).
    pub current_week: u32,
    /// Current day (1-based).
    pub current_day: u32,
    /// Workouts finished so far.
    pub completed_workouts: u32,
    /// When the last programme workout was finished.
    pub last_workout_at: Option<Timestamp>,
    /// Last modification time.
    pub updated_at: Timestamp,
}

local_record!(ProgrammeRecord, EntityType::Programme.table());

local_record!(ProgrammeWeekRecord, EntityType::ProgrammeWeek.table(), |record| {
    vec![Reference::new(EntityType::Programme.table(), &record.programme_id)]
});

local_record!(ProgrammeWorkoutRecord, EntityType::ProgrammeWorkout.table(), |record| {
    vec![Reference::new(EntityType::ProgrammeWeek.table(), &record.week_id)]
});

local_record!(ProgrammeExerciseRecord, EntityType::ProgrammeExercise.table(), |record| {
    vec![
        Reference::new(
            EntityType::ProgrammeWorkout.table(),
            &record.programme_workout_id,
        ),
        Reference::new(EntityType::Exercise.table(), &record.exercise_id),
    ]
});

local_record!(ProgrammeProgressRecord, EntityType::ProgrammeProgress.table(), |record| {
    vec![Reference::new(EntityType::Programme.table(), &record.programme_id)]
});

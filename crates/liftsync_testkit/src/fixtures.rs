//! Record builders and remote seeding helpers.
//!
//! Builders produce rows that were never uploaded (`remote_id` is `None`)
//! with every optional field empty. Tests adjust fields directly.

use liftsync_convert::{
    encode_document, EntityConverter, ExerciseConverter, RemoteDocument, MUSCLE_KIND,
};
use liftsync_core::enums::{
    Equipment, ExerciseCategory, ExperienceLevel, MuscleGroup, ProgrammeGoal, SetType,
    UnitSystem, WorkoutStatus,
};
use liftsync_core::id::child_id;
use liftsync_core::records::{
    ExerciseLogRecord, ExerciseMuscle, ExerciseRecord, ProgrammeRecord, SetLogRecord,
    UserProfileRecord, WorkoutRecord,
};
use liftsync_core::{LocalRecord, SyncScope, Timestamp};
use liftsync_engine::{MemoryRemoteStore, RemoteRecord};

/// A catalog exercise with one primary muscle.
pub fn catalog_exercise(local_id: &str, name: &str, at: Timestamp) -> ExerciseRecord {
    ExerciseRecord {
        local_id: local_id.to_string(),
        remote_id: Some(local_id.to_string()),
        name: name.to_string(),
        category: ExerciseCategory::Legs,
        equipment: Equipment::Barbell,
        description: None,
        is_custom: false,
        muscles: vec![ExerciseMuscle {
            id: child_id(local_id, MUSCLE_KIND, 0),
            muscle: MuscleGroup::Quadriceps,
            is_primary: true,
        }],
        instructions: Vec::new(),
        aliases: Vec::new(),
        created_at: at,
        updated_at: at,
    }
}

/// A user-defined exercise.
pub fn custom_exercise(local_id: &str, name: &str, at: Timestamp) -> ExerciseRecord {
    ExerciseRecord {
        local_id: local_id.to_string(),
        remote_id: None,
        name: name.to_string(),
        category: ExerciseCategory::Other,
        equipment: Equipment::Other,
        description: None,
        is_custom: true,
        muscles: Vec::new(),
        instructions: Vec::new(),
        aliases: Vec::new(),
        created_at: at,
        updated_at: at,
    }
}

/// A finished workout.
pub fn workout(local_id: &str, at: Timestamp) -> WorkoutRecord {
    WorkoutRecord {
        local_id: local_id.to_string(),
        remote_id: None,
        name: format!("Workout {local_id}"),
        status: WorkoutStatus::Completed,
        started_at: at,
        finished_at: None,
        programme_workout_id: None,
        notes: None,
        updated_at: at,
    }
}

/// An exercise performed in `workout_id`.
pub fn exercise_log(
    local_id: &str,
    workout_id: &str,
    exercise_id: &str,
    at: Timestamp,
) -> ExerciseLogRecord {
    ExerciseLogRecord {
        local_id: local_id.to_string(),
        remote_id: None,
        workout_id: workout_id.to_string(),
        exercise_id: exercise_id.to_string(),
        order_index: 0,
        notes: None,
        updated_at: at,
    }
}

/// A completed working set.
pub fn set_log(
    local_id: &str,
    exercise_log_id: &str,
    set_number: u32,
    at: Timestamp,
) -> SetLogRecord {
    SetLogRecord {
        local_id: local_id.to_string(),
        remote_id: None,
        exercise_log_id: exercise_log_id.to_string(),
        set_number,
        set_type: SetType::Standard,
        reps: 5,
        weight_kg: 100.0,
        rpe: None,
        completed: true,
        completed_at: Some(at),
        updated_at: at,
    }
}

/// A four-week strength programme.
pub fn programme(local_id: &str, at: Timestamp) -> ProgrammeRecord {
    ProgrammeRecord {
        local_id: local_id.to_string(),
        remote_id: None,
        name: format!("Programme {local_id}"),
        description: None,
        goal: ProgrammeGoal::Strength,
        duration_weeks: 4,
        is_active: true,
        is_generated: false,
        created_at: at,
        updated_at: at,
    }
}

/// A metric beginner profile.
pub fn user_profile(local_id: &str, display_name: &str, at: Timestamp) -> UserProfileRecord {
    UserProfileRecord {
        local_id: local_id.to_string(),
        remote_id: None,
        display_name: display_name.to_string(),
        unit_system: UnitSystem::Metric,
        experience_level: ExperienceLevel::Beginner,
        bodyweight_kg: None,
        height_cm: None,
        birth_year: None,
        updated_at: at,
    }
}

/// Encodes `record` the way `converter` uploads it, as if the store wrote
/// it at the record's `updated_at`.
pub fn remote_record<C: EntityConverter>(converter: &C, record: &C::Local) -> RemoteRecord {
    let document = converter.to_remote(record);
    RemoteRecord {
        id: document.id().to_string(),
        last_modified: record.updated_at(),
        body: encode_document(&document).expect("generated documents always encode"),
    }
}

/// Publishes catalog exercises to the system scope of `remote`.
pub fn seed_catalog(remote: &MemoryRemoteStore, exercises: &[ExerciseRecord]) {
    let converter = ExerciseConverter::catalog();
    for exercise in exercises {
        remote.insert(
            converter.entity_type().collection(),
            &SyncScope::System,
            remote_record(&converter, exercise),
        );
    }
}

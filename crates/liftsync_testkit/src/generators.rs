//! Property-based test generators using proptest.
//!
//! Generated records satisfy the conditions under which a converter round
//! trip is lossless: `remote_id` is set, child ids are the canonical ones
//! derived from the parent's local id, optional text is never empty, and
//! weights are exact binary fractions.

use liftsync_convert::{ALIAS_KIND, INSTRUCTION_KIND, MUSCLE_KIND};
use liftsync_core::enums::{
    Equipment, ExerciseCategory, ExperienceLevel, MeasurementKind, MuscleGroup, ProgrammeGoal,
    RecordType, SetType, UnitSystem, WorkoutStatus,
};
use liftsync_core::id::child_id;
use liftsync_core::records::{
    BodyMeasurementRecord, ExerciseAlias, ExerciseInstruction, ExerciseLogRecord, ExerciseMuscle,
    ExerciseRecord, ExerciseUsageRecord, PersonalRecordEntry, ProgrammeExerciseRecord,
    ProgrammeProgressRecord, ProgrammeRecord, ProgrammeWeekRecord, ProgrammeWorkoutRecord,
    SetLogRecord, UserProfileRecord, WorkoutRecord,
};
use liftsync_core::{RemoteEnum, Timestamp};
use proptest::prelude::*;

/// Strategy for local ids.
pub fn local_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]{8,16}").expect("Invalid regex")
}

/// Strategy for remote document ids.
pub fn document_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9]{20}").expect("Invalid regex")
}

/// Strategy for non-empty display text.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z0-9 ,.'-]{0,30}").expect("Invalid regex")
}

/// Strategy for optional text that is never `Some("")`.
pub fn optional_text_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(text_strategy())
}

/// Strategy for timestamps between the epoch and the year 2100.
pub fn timestamp_strategy() -> impl Strategy<Value = Timestamp> {
    (0i64..4_102_444_800_000).prop_map(Timestamp::from_millis)
}

/// Strategy for weights in quarter-kilogram steps.
pub fn weight_strategy() -> impl Strategy<Value = f64> {
    (0u32..2_000).prop_map(|quarters| f64::from(quarters) / 4.0)
}

/// Strategy for RPE values in half steps.
pub fn rpe_strategy() -> impl Strategy<Value = f64> {
    (2u32..=20).prop_map(|halves| f64::from(halves) / 2.0)
}

/// Strategy for any variant of `E`.
pub fn enum_strategy<E: RemoteEnum>() -> impl Strategy<Value = E> {
    prop::sample::select(E::VARIANTS)
}

/// Strategy for codes no enumeration defines.
pub fn unknown_code_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("ZZ_[A-Z]{3,10}").expect("Invalid regex")
}

/// Strategy for exercises; `custom` selects user-defined ones.
pub fn exercise_record_strategy(custom: bool) -> impl Strategy<Value = ExerciseRecord> {
    let head = (
        local_id_strategy(),
        document_id_strategy(),
        text_strategy(),
        enum_strategy::<ExerciseCategory>(),
        enum_strategy::<Equipment>(),
        optional_text_strategy(),
        timestamp_strategy(),
        timestamp_strategy(),
    );
    let children = (
        prop::collection::vec((enum_strategy::<MuscleGroup>(), any::<bool>()), 0..4),
        prop::collection::vec(text_strategy(), 0..4),
        prop::collection::vec(text_strategy(), 0..3),
    );
    (head, children).prop_map(
        move |(
            (local_id, remote_id, name, category, equipment, description, created_at, updated_at),
            (muscles, steps, aliases),
        )| {
            let muscles = muscles
                .into_iter()
                .enumerate()
                .map(|(position, (muscle, is_primary))| ExerciseMuscle {
                    id: child_id(&local_id, MUSCLE_KIND, position),
                    muscle,
                    is_primary,
                })
                .collect();
            let instructions = steps
                .into_iter()
                .enumerate()
                .map(|(position, text)| ExerciseInstruction {
                    id: child_id(&local_id, INSTRUCTION_KIND, position),
                    step: position as u32 + 1,
                    text,
                })
                .collect();
            let aliases = aliases
                .into_iter()
                .enumerate()
                .map(|(position, alias)| ExerciseAlias {
                    id: child_id(&local_id, ALIAS_KIND, position),
                    alias,
                })
                .collect();
            ExerciseRecord {
                local_id,
                remote_id: Some(remote_id),
                name,
                category,
                equipment,
                description,
                is_custom: custom,
                muscles,
                instructions,
                aliases,
                created_at,
                updated_at,
            }
        },
    )
}

/// Strategy for user profiles.
pub fn user_profile_strategy() -> impl Strategy<Value = UserProfileRecord> {
    (
        local_id_strategy(),
        document_id_strategy(),
        text_strategy(),
        enum_strategy::<UnitSystem>(),
        enum_strategy::<ExperienceLevel>(),
        prop::option::of(weight_strategy()),
        prop::option::of((1_000u32..2_500).prop_map(|tenths| f64::from(tenths) / 10.0)),
        prop::option::of(1900i32..2020),
        timestamp_strategy(),
    )
        .prop_map(
            |(
                local_id,
                remote_id,
                display_name,
                unit_system,
                experience_level,
                bodyweight_kg,
                height_cm,
                birth_year,
                updated_at,
            )| UserProfileRecord {
                local_id,
                remote_id: Some(remote_id),
                display_name,
                unit_system,
                experience_level,
                bodyweight_kg,
                height_cm,
                birth_year,
                updated_at,
            },
        )
}

/// Strategy for body measurements.
pub fn body_measurement_strategy() -> impl Strategy<Value = BodyMeasurementRecord> {
    (
        local_id_strategy(),
        document_id_strategy(),
        enum_strategy::<MeasurementKind>(),
        weight_strategy(),
        timestamp_strategy(),
        optional_text_strategy(),
        timestamp_strategy(),
    )
        .prop_map(
            |(local_id, remote_id, kind, value, measured_at, notes, updated_at)| {
                BodyMeasurementRecord {
                    local_id,
                    remote_id: Some(remote_id),
                    kind,
                    value,
                    measured_at,
                    notes,
                    updated_at,
                }
            },
        )
}

/// Strategy for programmes.
pub fn programme_strategy() -> impl Strategy<Value = ProgrammeRecord> {
    (
        local_id_strategy(),
        document_id_strategy(),
        text_strategy(),
        optional_text_strategy(),
        enum_strategy::<ProgrammeGoal>(),
        1u32..=52,
        any::<bool>(),
        any::<bool>(),
        timestamp_strategy(),
        timestamp_strategy(),
    )
        .prop_map(
            |(
                local_id,
                remote_id,
                name,
                description,
                goal,
                duration_weeks,
                is_active,
                is_generated,
                created_at,
                updated_at,
            )| ProgrammeRecord {
                local_id,
                remote_id: Some(remote_id),
                name,
                description,
                goal,
                duration_weeks,
                is_active,
                is_generated,
                created_at,
                updated_at,
            },
        )
}

/// Strategy for programme weeks.
pub fn programme_week_strategy() -> impl Strategy<Value = ProgrammeWeekRecord> {
    (
        local_id_strategy(),
        document_id_strategy(),
        local_id_strategy(),
        1u32..=52,
        optional_text_strategy(),
        any::<bool>(),
        timestamp_strategy(),
    )
        .prop_map(
            |(local_id, remote_id, programme_id, week_number, name, is_deload, updated_at)| {
                ProgrammeWeekRecord {
                    local_id,
                    remote_id: Some(remote_id),
                    programme_id,
                    week_number,
                    name,
                    is_deload,
                    updated_at,
                }
            },
        )
}

/// Strategy for programme workouts.
pub fn programme_workout_strategy() -> impl Strategy<Value = ProgrammeWorkoutRecord> {
    (
        local_id_strategy(),
        document_id_strategy(),
        local_id_strategy(),
        1u32..=7,
        text_strategy(),
        prop::option::of(10u32..180),
        timestamp_strategy(),
    )
        .prop_map(
            |(local_id, remote_id, week_id, day_number, name, estimated_minutes, updated_at)| {
                ProgrammeWorkoutRecord {
                    local_id,
                    remote_id: Some(remote_id),
                    week_id,
                    day_number,
                    name,
                    estimated_minutes,
                    updated_at,
                }
            },
        )
}

/// Strategy for programme exercises.
pub fn programme_exercise_strategy() -> impl Strategy<Value = ProgrammeExerciseRecord> {
    (
        (local_id_strategy(), document_id_strategy(), local_id_strategy(), local_id_strategy()),
        0u32..20,
        1u32..10,
        prop::string::string_regex("[0-9]{1,2}(-[0-9]{1,2})?").expect("Invalid regex"),
        prop::option::of(rpe_strategy()),
        prop::option::of(30u32..600),
        optional_text_strategy(),
        timestamp_strategy(),
    )
        .prop_map(
            |(
                (local_id, remote_id, programme_workout_id, exercise_id),
                order_index,
                target_sets,
                target_reps,
                target_rpe,
                rest_seconds,
                notes,
                updated_at,
            )| ProgrammeExerciseRecord {
                local_id,
                remote_id: Some(remote_id),
                programme_workout_id,
                exercise_id,
                order_index,
                target_sets,
                target_reps,
                target_rpe,
                rest_seconds,
                notes,
                updated_at,
            },
        )
}

/// Strategy for programme progress.
pub fn programme_progress_strategy() -> impl Strategy<Value = ProgrammeProgressRecord> {
    (
        local_id_strategy(),
        document_id_strategy(),
        local_id_strategy(),
        1u32..=52,
        1u32..=7,
        0u32..400,
        prop::option::of(timestamp_strategy()),
        timestamp_strategy(),
    )
        .prop_map(
            |(
                local_id,
                remote_id,
                programme_id,
                current_week,
                current_day,
                completed_workouts,
                last_workout_at,
                updated_at,
            )| ProgrammeProgressRecord {
                local_id,
                remote_id: Some(remote_id),
                programme_id,
                current_week,
                current_day,
                completed_workouts,
                last_workout_at,
                updated_at,
            },
        )
}

/// Strategy for workouts.
pub fn workout_record_strategy() -> impl Strategy<Value = WorkoutRecord> {
    (
        local_id_strategy(),
        document_id_strategy(),
        text_strategy(),
        enum_strategy::<WorkoutStatus>(),
        timestamp_strategy(),
        prop::option::of(timestamp_strategy()),
        prop::option::of(local_id_strategy()),
        optional_text_strategy(),
        timestamp_strategy(),
    )
        .prop_map(
            |(
                local_id,
                remote_id,
                name,
                status,
                started_at,
                finished_at,
                programme_workout_id,
                notes,
                updated_at,
            )| WorkoutRecord {
                local_id,
                remote_id: Some(remote_id),
                name,
                status,
                started_at,
                finished_at,
                programme_workout_id,
                notes,
                updated_at,
            },
        )
}

/// Strategy for exercise logs.
pub fn exercise_log_strategy() -> impl Strategy<Value = ExerciseLogRecord> {
    (
        local_id_strategy(),
        document_id_strategy(),
        local_id_strategy(),
        local_id_strategy(),
        0u32..20,
        optional_text_strategy(),
        timestamp_strategy(),
    )
        .prop_map(
            |(local_id, remote_id, workout_id, exercise_id, order_index, notes, updated_at)| {
                ExerciseLogRecord {
                    local_id,
                    remote_id: Some(remote_id),
                    workout_id,
                    exercise_id,
                    order_index,
                    notes,
                    updated_at,
                }
            },
        )
}

/// Strategy for set logs.
pub fn set_log_strategy() -> impl Strategy<Value = SetLogRecord> {
    (
        local_id_strategy(),
        document_id_strategy(),
        local_id_strategy(),
        1u32..=10,
        enum_strategy::<SetType>(),
        0u32..50,
        weight_strategy(),
        prop::option::of(rpe_strategy()),
        any::<bool>(),
        prop::option::of(timestamp_strategy()),
        timestamp_strategy(),
    )
        .prop_map(
            |(
                local_id,
                remote_id,
                exercise_log_id,
                set_number,
                set_type,
                reps,
                weight_kg,
                rpe,
                completed,
                completed_at,
                updated_at,
            )| SetLogRecord {
                local_id,
                remote_id: Some(remote_id),
                exercise_log_id,
                set_number,
                set_type,
                reps,
                weight_kg,
                rpe,
                completed,
                completed_at,
                updated_at,
            },
        )
}

/// Strategy for personal records.
pub fn personal_record_strategy() -> impl Strategy<Value = PersonalRecordEntry> {
    (
        local_id_strategy(),
        document_id_strategy(),
        local_id_strategy(),
        enum_strategy::<RecordType>(),
        weight_strategy(),
        prop::option::of(1u32..50),
        timestamp_strategy(),
        prop::option::of(local_id_strategy()),
        timestamp_strategy(),
    )
        .prop_map(
            |(
                local_id,
                remote_id,
                exercise_id,
                record_type,
                value,
                reps,
                achieved_at,
                set_log_id,
                updated_at,
            )| PersonalRecordEntry {
                local_id,
                remote_id: Some(remote_id),
                exercise_id,
                record_type,
                value,
                reps,
                achieved_at,
                set_log_id,
                updated_at,
            },
        )
}

/// Strategy for exercise usage statistics.
pub fn exercise_usage_strategy() -> impl Strategy<Value = ExerciseUsageRecord> {
    (
        local_id_strategy(),
        document_id_strategy(),
        local_id_strategy(),
        0u32..1_000,
        prop::option::of(timestamp_strategy()),
        any::<bool>(),
        timestamp_strategy(),
    )
        .prop_map(
            |(local_id, remote_id, exercise_id, usage_count, last_used_at, is_favourite, updated_at)| {
                ExerciseUsageRecord {
                    local_id,
                    remote_id: Some(remote_id),
                    exercise_id,
                    usage_count,
                    last_used_at,
                    is_favourite,
                    updated_at,
                }
            },
        )
}

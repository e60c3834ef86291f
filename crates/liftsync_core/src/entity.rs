//! Catalog of synchronized entity types.

use std::fmt;

/// Which scope an entity type is synchronized under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Shared read-only data, synchronized without a user id.
    System,
    /// Per-user data.
    User,
}

/// A category of domain object synchronized independently.
///
/// The declaration order below is the tie-breaker used when the registry
/// sorts entity types by dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityType {
    /// Curated exercise catalog.
    Exercise,
    /// The user's profile and preferences.
    UserProfile,
    /// User-defined exercises.
    CustomExercise,
    /// Body weight and girth measurements.
    BodyMeasurement,
    /// Training programme header.
    Programme,
    /// A week inside a programme.
    ProgrammeWeek,
    /// A planned workout day inside a programme week.
    ProgrammeWorkout,
    /// A planned exercise inside a programme workout.
    ProgrammeExercise,
    /// The user's progress through a programme.
    ProgrammeProgress,
    /// A logged workout session.
    Workout,
    /// One exercise performed inside a workout.
    ExerciseLog,
    /// One set performed for an exercise log.
    SetLog,
    /// A personal best.
    PersonalRecord,
    /// Per-exercise usage statistics.
    ExerciseUsage,
}

impl EntityType {
    /// Every entity type, in declaration order.
    pub const ALL: [EntityType; 14] = [
        EntityType::Exercise,
        EntityType::UserProfile,
        EntityType::CustomExercise,
        EntityType::BodyMeasurement,
        EntityType::Programme,
        EntityType::ProgrammeWeek,
        EntityType::ProgrammeWorkout,
        EntityType::ProgrammeExercise,
        EntityType::ProgrammeProgress,
        EntityType::Workout,
        EntityType::ExerciseLog,
        EntityType::SetLog,
        EntityType::PersonalRecord,
        EntityType::ExerciseUsage,
    ];

    /// Stable name used in sync metadata keys and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityType::Exercise => "exercise",
            EntityType::UserProfile => "user_profile",
            EntityType::CustomExercise => "custom_exercise",
            EntityType::BodyMeasurement => "body_measurement",
            EntityType::Programme => "programme",
            EntityType::ProgrammeWeek => "programme_week",
            EntityType::ProgrammeWorkout => "programme_workout",
            EntityType::ProgrammeExercise => "programme_exercise",
            EntityType::ProgrammeProgress => "programme_progress",
            EntityType::Workout => "workout",
            EntityType::ExerciseLog => "exercise_log",
            EntityType::SetLog => "set_log",
            EntityType::PersonalRecord => "personal_record",
            EntityType::ExerciseUsage => "exercise_usage",
        }
    }

    /// Parses a name produced by [`EntityType::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Remote collection holding this entity type's documents.
    #[must_use]
    pub const fn collection(&self) -> &'static str {
        match self {
            EntityType::Exercise => "exercises",
            EntityType::UserProfile => "user_profiles",
            EntityType::CustomExercise => "custom_exercises",
            EntityType::BodyMeasurement => "body_measurements",
            EntityType::Programme => "programmes",
            EntityType::ProgrammeWeek => "programme_weeks",
            EntityType::ProgrammeWorkout => "programme_workouts",
            EntityType::ProgrammeExercise => "programme_exercises",
            EntityType::ProgrammeProgress => "programme_progress",
            EntityType::Workout => "workouts",
            EntityType::ExerciseLog => "exercise_logs",
            EntityType::SetLog => "set_logs",
            EntityType::PersonalRecord => "personal_records",
            EntityType::ExerciseUsage => "exercise_usage",
        }
    }

    /// Local table holding this entity type's records.
    ///
    /// Catalog and custom exercises share one table, so exercise references
    /// resolve against either.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            EntityType::Exercise | EntityType::CustomExercise => "exercises",
            other => other.collection(),
        }
    }

    /// Scope this entity type is synchronized under.
    #[must_use]
    pub const fn scope_kind(&self) -> ScopeKind {
        match self {
            EntityType::Exercise => ScopeKind::System,
            _ => ScopeKind::User,
        }
    }

    /// Returns true if local changes are never uploaded.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        matches!(self.scope_kind(), ScopeKind::System)
    }

    /// Entity types whose identifiers this entity type's documents embed.
    ///
    /// These must be synchronized first, on download and on upload.
    #[must_use]
    pub const fn dependencies(&self) -> &'static [EntityType] {
        match self {
            EntityType::Exercise
            | EntityType::UserProfile
            | EntityType::CustomExercise
            | EntityType::BodyMeasurement
            | EntityType::Programme => &[],
            EntityType::ProgrammeWeek | EntityType::ProgrammeProgress => {
                &[EntityType::Programme]
            }
            EntityType::ProgrammeWorkout => &[EntityType::ProgrammeWeek],
            EntityType::ProgrammeExercise => &[
                EntityType::ProgrammeWorkout,
                EntityType::Exercise,
                EntityType::CustomExercise,
            ],
            EntityType::Workout => &[EntityType::ProgrammeWorkout],
            EntityType::ExerciseLog => &[
                EntityType::Workout,
                EntityType::Exercise,
                EntityType::CustomExercise,
            ],
            EntityType::SetLog => &[EntityType::ExerciseLog],
            EntityType::PersonalRecord => &[
                EntityType::Exercise,
                EntityType::CustomExercise,
                EntityType::SetLog,
            ],
            EntityType::ExerciseUsage => &[EntityType::Exercise, EntityType::CustomExercise],
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for entity_type in EntityType::ALL {
            assert_eq!(EntityType::from_name(entity_type.as_str()), Some(entity_type));
        }
        assert_eq!(EntityType::from_name("nope"), None);
    }

    #[test]
    fn only_catalog_is_system_scoped() {
        let system: Vec<_> = EntityType::ALL
            .into_iter()
            .filter(|t| t.scope_kind() == ScopeKind::System)
            .collect();
        assert_eq!(system, vec![EntityType::Exercise]);
        assert!(EntityType::Exercise.is_read_only());
        assert!(!EntityType::CustomExercise.is_read_only());
    }

    #[test]
    fn exercises_share_a_table() {
        assert_eq!(EntityType::Exercise.table(), EntityType::CustomExercise.table());
        assert_ne!(
            EntityType::Exercise.collection(),
            EntityType::CustomExercise.collection()
        );
    }

    #[test]
    fn dependencies_are_declared_before_dependents() {
        // Declaration order is already a valid topological order.
        for (index, entity_type) in EntityType::ALL.iter().enumerate() {
            for dependency in entity_type.dependencies() {
                let dep_index = EntityType::ALL
                    .iter()
                    .position(|t| t == dependency)
                    .unwrap();
                assert!(dep_index < index, "{dependency} must precede {entity_type}");
            }
        }
    }
}

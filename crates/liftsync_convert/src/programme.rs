//! Programme documents.

use crate::converter::{
    decode_enum, remote_id_of, require, text_from_remote, text_to_remote, time_from_remote,
    time_or_epoch, EntityConverter,
};
use crate::document::remote_document;
use crate::error::ConvertResult;
use crate::timestamp::RemoteTimestamp;
use liftsync_core::enums::ProgrammeGoal;
use liftsync_core::records::{
    ProgrammeExerciseRecord, ProgrammeProgressRecord, ProgrammeRecord, ProgrammeWeekRecord,
    ProgrammeWorkoutRecord,
};
use liftsync_core::{EntityType, LocalRecord, RemoteEnum};
use serde::{Deserialize, Serialize};

/// Remote programme document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgrammeDocument {
    /// Document id.
    pub id: String,
    /// Local id on the uploading device.
    pub local_id: Option<String>,
    /// Last modification time.
    pub last_modified: Option<RemoteTimestamp>,
    /// Programme name.
    pub name: String,
    /// Description, empty when absent.
    pub description: String,
    /// [`ProgrammeGoal`] code.
    pub goal: String,
    /// Planned length in weeks.
    pub duration_weeks: u32,
    /// Currently followed.
    pub is_active: bool,
    /// Produced by the programme generator.
    pub is_generated: bool,
    /// Creation time.
    pub created_at: Option<RemoteTimestamp>,
}

/// Remote programme week document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgrammeWeekDocument {
    /// Document id.
    pub id: String,
    /// Local id on the uploading device.
    pub local_id: Option<String>,
    /// Last modification time.
    pub last_modified: Option<RemoteTimestamp>,
    /// Local id of the owning programme.
    pub programme_id: String,
    /// 1-based week number.
    pub week_number: u32,
    /// Label, empty when absent.
    pub name: String,
    /// Reduced-volume week.
    pub is_deload: bool,
}

/// Remote programme workout document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgrammeWorkoutDocument {
    /// Document id.
    pub id: String,
    /// Local id on the uploading device.
    pub local_id: Option<String>,
    /// Last modification time.
    pub last_modified: Option<RemoteTimestamp>,
    /// Local id of the owning week.
    pub week_id: String,
    /// 1-based day within the week.
    pub day_number: u32,
    /// Workout name.
    pub name: String,
    /// Expected duration.
    pub estimated_minutes: Option<u32>,
}

/// Remote programme exercise document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgrammeExerciseDocument {
    /// Document id.
    pub id: String,
    /// Local id on the uploading device.
    pub local_id: Option<String>,
    /// Last modification time.
    pub last_modified: Option<RemoteTimestamp>,
    /// Local id of the owning programme workout.
    pub programme_workout_id: String,
    /// Local id of the exercise.
    pub exercise_id: String,
    /// Position within the workout.
    pub order_index: u32,
    /// Prescribed sets.
    pub target_sets: u32,
    /// Prescribed reps.
    pub target_reps: String,
    /// Prescribed effort.
    pub target_rpe: Option<f64>,
    /// Rest between sets.
    pub rest_seconds: Option<u32>,
    /// Note, empty when absent.
    pub notes: String,
}

/// Remote programme progress document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgrammeProgressDocument {
    /// Document id.
    pub id: String,
    /// Local id on the uploading device.
    pub local_id: Option<String>,
    /// Last modification time.
    pub last_modified: Option<RemoteTimestamp>,
    /// Local id of the programme.
    pub programme_id: String,
    /// Current week.
    pub current_week: u32,
    /// Current day.
    pub current_day: u32,
    /// Workouts finished so far.
    pub completed_workouts: u32,
    /// When the last programme workout was finished.
    pub last_workout_at: Option<RemoteTimestamp>,
}

remote_document!(ProgrammeDocument);
remote_document!(ProgrammeWeekDocument);
remote_document!(ProgrammeWorkoutDocument);
remote_document!(ProgrammeExerciseDocument);
remote_document!(ProgrammeProgressDocument);

/// Converter for [`ProgrammeRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgrammeConverter;

impl EntityConverter for ProgrammeConverter {
    type Local = ProgrammeRecord;
    type Remote = ProgrammeDocument;

    fn entity_type(&self) -> EntityType {
        EntityType::Programme
    }

    fn to_remote(&self, local: &ProgrammeRecord) -> ProgrammeDocument {
        ProgrammeDocument {
            id: local.document_id().to_string(),
            local_id: Some(local.local_id.clone()),
            last_modified: Some(local.updated_at.into()),
            name: local.name.clone(),
            description: text_to_remote(local.description.as_deref()),
            goal: local.goal.as_remote().to_string(),
            duration_weeks: local.duration_weeks,
            is_active: local.is_active,
            is_generated: local.is_generated,
            created_at: Some(local.created_at.into()),
        }
    }

    fn from_remote(&self, remote: &ProgrammeDocument, local_id: &str) -> ConvertResult<ProgrammeRecord> {
        let entity = self.entity_type();
        Ok(ProgrammeRecord {
            local_id: local_id.to_string(),
            remote_id: Some(remote_id_of(entity, remote)?),
            name: remote.name.clone(),
            description: text_from_remote(&remote.description),
            goal: decode_enum::<ProgrammeGoal>(&remote.id, "goal", &remote.goal),
            duration_weeks: remote.duration_weeks,
            is_active: remote.is_active,
            is_generated: remote.is_generated,
            created_at: time_or_epoch(entity, "createdAt", remote.created_at)?,
            updated_at: time_or_epoch(entity, "lastModified", remote.last_modified)?,
        })
    }
}

/// Converter for [`ProgrammeWeekRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgrammeWeekConverter;

impl EntityConverter for ProgrammeWeekConverter {
    type Local = ProgrammeWeekRecord;
    type Remote = ProgrammeWeekDocument;

    fn entity_type(&self) -> EntityType {
        EntityType::ProgrammeWeek
    }

    fn to_remote(&self, local: &ProgrammeWeekRecord) -> ProgrammeWeekDocument {
        ProgrammeWeekDocument {
            id: local.document_id().to_string(),
            local_id: Some(local.local_id.clone()),
            last_modified: Some(local.updated_at.into()),
            programme_id: local.programme_id.clone(),
            week_number: local.week_number,
            name: text_to_remote(local.name.as_deref()),
            is_deload: local.is_deload,
        }
    }

    fn from_remote(
        &self,
        remote: &ProgrammeWeekDocument,
        local_id: &str,
    ) -> ConvertResult<ProgrammeWeekRecord> {
        let entity = self.entity_type();
        Ok(ProgrammeWeekRecord {
            local_id: local_id.to_string(),
            remote_id: Some(remote_id_of(entity, remote)?),
            programme_id: require(entity, "programmeId", &remote.programme_id)?.to_string(),
            week_number: remote.week_number,
            name: text_from_remote(&remote.name),
            is_deload: remote.is_deload,
            updated_at: time_or_epoch(entity, "lastModified", remote.last_modified)?,
        })
    }
}

/// Converter for [`ProgrammeWorkoutRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgrammeWorkoutConverter;

impl EntityConverter for ProgrammeWorkoutConverter {
    type Local = ProgrammeWorkoutRecord;
    type Remote = ProgrammeWorkoutDocument;

    fn entity_type(&self) -> EntityType {
        EntityType::ProgrammeWorkout
    }

    fn to_remote(&self, local: &ProgrammeWorkoutRecord) -> ProgrammeWorkoutDocument {
        ProgrammeWorkoutDocument {
            id: local.document_id().to_string(),
            local_id: Some(local.local_id.clone()),
            last_modified: Some(local.updated_at.into()),
            week_id: local.week_id.clone(),
            day_number: local.day_number,
            name: local.name.clone(),
            estimated_minutes: local.estimated_minutes,
        }
    }

    fn from_remote(
        &self,
        remote: &ProgrammeWorkoutDocument,
        local_id: &str,
    ) -> ConvertResult<ProgrammeWorkoutRecord> {
        let entity = self.entity_type();
        Ok(ProgrammeWorkoutRecord {
            local_id: local_id.to_string(),
            remote_id: Some(remote_id_of(entity, remote)?),
            week_id: require(entity, "weekId", &remote.week_id)?.to_string(),
            day_number: remote.day_number,
            name: remote.name.clone(),
            estimated_minutes: remote.estimated_minutes,
            updated_at: time_or_epoch(entity, "lastModified", remote.last_modified)?,
        })
    }
}

/// Converter for [`ProgrammeExerciseRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgrammeExerciseConverter;

impl EntityConverter for ProgrammeExerciseConverter {
    type Local = ProgrammeExerciseRecord;
    type Remote = ProgrammeExerciseDocument;

    fn entity_type(&self) -> EntityType {
        EntityType::ProgrammeExercise
    }

    fn to_remote(&self, local: &ProgrammeExerciseRecord) -> ProgrammeExerciseDocument {
        ProgrammeExerciseDocument {
            id: local.document_id().to_string(),
            local_id: Some(local.local_id.clone()),
            last_modified: Some(local.updated_at.into()),
            programme_workout_id: local.programme_workout_id.clone(),
            exercise_id: local.exercise_id.clone(),
            order_index: local.order_index,
            target_sets: local.target_sets,
            target_reps: local.target_reps.clone(),
            target_rpe: local.target_rpe,
            rest_seconds: local.rest_seconds,
            notes: text_to_remote(local.notes.as_deref()),
        }
    }

    fn from_remote(
        &self,
        remote: &ProgrammeExerciseDocument,
        local_id: &str,
    ) -> ConvertResult<ProgrammeExerciseRecord> {
        let entity = self.entity_type();
        Ok(ProgrammeExerciseRecord {
            local_id: local_id.to_string(),
            remote_id: Some(remote_id_of(entity, remote)?),
            programme_workout_id: require(entity, "programmeWorkoutId", &remote.programme_workout_id)?
                .to_string(),
            exercise_id: require(entity, "exerciseId", &remote.exercise_id)?.to_string(),
            order_index: remote.order_index,
            target_sets: remote.target_sets,
            target_reps: remote.target_reps.clone(),
            target_rpe: remote.target_rpe,
            rest_seconds: remote.rest_seconds,
            notes: text_from_remote(&remote.notes),
            updated_at: time_or_epoch(entity, "lastModified", remote.last_modified)?,
        })
    }
}

/// Converter for [`ProgrammeProgressRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgrammeProgressConverter;

impl EntityConverter for ProgrammeProgressConverter {
    type Local = ProgrammeProgressRecord;
    type Remote = ProgrammeProgressDocument;

    fn entity_type(&self) -> EntityType {
        EntityType::ProgrammeProgress
    }

    fn to_remote(&self, local: &ProgrammeProgressRecord) -> ProgrammeProgressDocument {
        ProgrammeProgressDocument {
            id: local.document_id().to_string(),
            local_id: Some(local.local_id.clone()),
            last_modified: Some(local.updated_at.into()),
            programme_id: local.programme_id.clone(),
            current_week: local.current_week,
            current_day: local.current_day,
            completed_workouts: local.completed_workouts,
            last_workout_at: local.last_workout_at.map(Into::into),
        }
    }

    fn from_remote(
        &self,
        remote: &ProgrammeProgressDocument,
        local_id: &str,
    ) -> ConvertResult<ProgrammeProgressRecord> {
        let entity = self.entity_type();
        Ok(ProgrammeProgressRecord {
            local_id: local_id.to_string(),
            remote_id: Some(remote_id_of(entity, remote)?),
            programme_id: require(entity, "programmeId", &remote.programme_id)?.to_string(),
            current_week: remote.current_week,
            current_day: remote.current_day,
            completed_workouts: remote.completed_workouts,
            last_workout_at: time_from_remote(entity, "lastWorkoutAt", remote.last_workout_at)?,
            updated_at: time_or_epoch(entity, "lastModified", remote.last_modified)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::decode_document;
    use crate::error::ConvertError;
    use serde_json::json;

    #[test]
    fn week_requires_programme_id() {
        let doc: ProgrammeWeekDocument =
            decode_document("w-doc", json!({"weekNumber": 2, "programmeId": ""})).unwrap();
        let err = ProgrammeWeekConverter.from_remote(&doc, "w-1").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MissingField {
                entity: EntityType::ProgrammeWeek,
                field: "programmeId"
            }
        ));
    }

    #[test]
    fn unknown_goal_falls_back() {
        let doc: ProgrammeDocument =
            decode_document("p-doc", json!({"name": "5/3/1", "goal": "POWERLIFTING"})).unwrap();
        let record = ProgrammeConverter.from_remote(&doc, "p-1").unwrap();
        assert_eq!(record.goal, ProgrammeGoal::General);
        assert_eq!(record.description, None);
    }

    #[test]
    fn progress_optional_timestamp() {
        let doc: ProgrammeProgressDocument = decode_document(
            "pp-doc",
            json!({"programmeId": "p-1", "currentWeek": 3, "lastWorkoutAt": null}),
        )
        .unwrap();
        let record = ProgrammeProgressConverter.from_remote(&doc, "pp-1").unwrap();
        assert_eq!(record.last_workout_at, None);
        assert_eq!(record.current_week, 3);

        let out = ProgrammeProgressConverter.to_remote(&record);
        assert_eq!(out.last_workout_at, None);
        assert_eq!(out.id, "pp-doc");
    }

    #[test]
    fn exercise_references_travel_verbatim() {
        let doc: ProgrammeExerciseDocument = decode_document(
            "pe-doc",
            json!({"programmeWorkoutId": "pw-1", "exerciseId": "ex-1", "targetReps": "8-12"}),
        )
        .unwrap();
        let record = ProgrammeExerciseConverter.from_remote(&doc, "pe-1").unwrap();
        assert_eq!(record.programme_workout_id, "pw-1");
        assert_eq!(record.exercise_id, "ex-1");
        assert_eq!(record.target_rpe, None);
    }
}

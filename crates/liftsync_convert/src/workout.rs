//! Workout log documents.

use crate::converter::{
    decode_enum, remote_id_of, require, text_from_remote, text_to_remote, time_from_remote,
    time_or_epoch, EntityConverter,
};
use crate::document::remote_document;
use crate::error::ConvertResult;
use crate::timestamp::RemoteTimestamp;
use liftsync_core::enums::{SetType, WorkoutStatus};
use liftsync_core::records::{ExerciseLogRecord, SetLogRecord, WorkoutRecord};
use liftsync_core::{EntityType, LocalRecord, RemoteEnum};
use serde::{Deserialize, Serialize};

/// Remote workout document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkoutDocument {
    /// Document id.
    pub id: String,
    /// Local id on the uploading device.
    pub local_id: Option<String>,
    /// Last modification time.
    pub last_modified: Option<RemoteTimestamp>,
    /// Session name.
    pub name: String,
    /// [`WorkoutStatus`] code.
    pub status: String,
    /// Start time.
    pub started_at: Option<RemoteTimestamp>,
    /// End time.
    pub finished_at: Option<RemoteTimestamp>,
    /// Local id of the programme day followed.
    pub programme_workout_id: Option<String>,
    /// Note, empty when absent.
    pub notes: String,
}

/// Remote exercise log document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExerciseLogDocument {
    /// Document id.
    pub id: String,
    /// Local id on the uploading device.
    pub local_id: Option<String>,
    /// Last modification time.
    pub last_modified: Option<RemoteTimestamp>,
    /// Local id of the owning workout.
    pub workout_id: String,
    /// Local id of the exercise.
    pub exercise_id: String,
    /// Position within the workout.
    pub order_index: u32,
    /// Note, empty when absent.
    pub notes: String,
}

/// Remote set log document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetLogDocument {
    /// Document id.
    pub id: String,
    /// Local id on the uploading device.
    pub local_id: Option<String>,
    /// Last modification time.
    pub last_modified: Option<RemoteTimestamp>,
    /// Local id of the owning exercise log.
    pub exercise_log_id: String,
    /// 1-based set number.
    pub set_number: u32,
    /// [`SetType`] code.
    pub set_type: String,
    /// Repetitions.
    pub reps: u32,
    /// Load in kilograms.
    pub weight_kg: f64,
    /// Perceived exertion.
    pub rpe: Option<f64>,
    /// Ticked off.
    pub completed: bool,
    /// When the set was ticked off.
    pub completed_at: Option<RemoteTimestamp>,
}

remote_document!(WorkoutDocument);
remote_document!(ExerciseLogDocument);
remote_document!(SetLogDocument);

/// Converter for [`WorkoutRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkoutConverter;

impl EntityConverter for WorkoutConverter {
    type Local = WorkoutRecord;
    type Remote = WorkoutDocument;

    fn entity_type(&self) -> EntityType {
        EntityType::Workout
    }

    fn to_remote(&self, local: &WorkoutRecord) -> WorkoutDocument {
        WorkoutDocument {
            id: local.document_id().to_string(),
            local_id: Some(local.local_id.clone()),
            last_modified: Some(local.updated_at.into()),
            name: local.name.clone(),
            status: local.status.as_remote().to_string(),
            started_at: Some(local.started_at.into()),
            finished_at: local.finished_at.map(Into::into),
            programme_workout_id: local.programme_workout_id.clone(),
            notes: text_to_remote(local.notes.as_deref()),
        }
    }

    fn from_remote(&self, remote: &WorkoutDocument, local_id: &str) -> ConvertResult<WorkoutRecord> {
        let entity = self.entity_type();
        Ok(WorkoutRecord {
            local_id: local_id.to_string(),
            remote_id: Some(remote_id_of(entity, remote)?),
            name: remote.name.clone(),
            status: decode_enum::<WorkoutStatus>(&remote.id, "status", &remote.status),
            started_at: time_or_epoch(entity, "startedAt", remote.started_at)?,
            finished_at: time_from_remote(entity, "finishedAt", remote.finished_at)?,
            programme_workout_id: remote
                .programme_workout_id
                .as_deref()
                .and_then(text_from_remote),
            notes: text_from_remote(&remote.notes),
            updated_at: time_or_epoch(entity, "lastModified", remote.last_modified)?,
        })
    }
}

/// Converter for [`ExerciseLogRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExerciseLogConverter;

impl EntityConverter for ExerciseLogConverter {
    type Local = ExerciseLogRecord;
    type Remote = ExerciseLogDocument;

    fn entity_type(&self) -> EntityType {
        EntityType::ExerciseLog
    }

    fn to_remote(&self, local: &ExerciseLogRecord) -> ExerciseLogDocument {
        ExerciseLogDocument {
            id: local.document_id().to_string(),
            local_id: Some(local.local_id.clone()),
            last_modified: Some(local.updated_at.into()),
            workout_id: local.workout_id.clone(),
            exercise_id: local.exercise_id.clone(),
            order_index: local.order_index,
            notes: text_to_remote(local.notes.as_deref()),
        }
    }

    fn from_remote(
        &self,
        remote: &ExerciseLogDocument,
        local_id: &str,
    ) -> ConvertResult<ExerciseLogRecord> {
        let entity = self.entity_type();
        Ok(ExerciseLogRecord {
            local_id: local_id.to_string(),
            remote_id: Some(remote_id_of(entity, remote)?),
            workout_id: require(entity, "workoutId", &remote.workout_id)?.to_string(),
            exercise_id: require(entity, "exerciseId", &remote.exercise_id)?.to_string(),
            order_index: remote.order_index,
            notes: text_from_remote(&remote.notes),
            updated_at: time_or_epoch(entity, "lastModified", remote.last_modified)?,
        })
    }
}

/// Converter for [`SetLogRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SetLogConverter;

impl EntityConverter for SetLogConverter {
    type Local = SetLogRecord;
    type Remote = SetLogDocument;

    fn entity_type(&self) -> EntityType {
        EntityType::SetLog
    }

    fn to_remote(&self, local: &SetLogRecord) -> SetLogDocument {
        SetLogDocument {
            id: local.document_id().to_string(),
            local_id: Some(local.local_id.clone()),
            last_modified: Some(local.updated_at.into()),
            exercise_log_id: local.exercise_log_id.clone(),
            set_number: local.set_number,
            set_type: local.set_type.as_remote().to_string(),
            reps: local.reps,
            weight_kg: local.weight_kg,
            rpe: local.rpe,
            completed: local.completed,
            completed_at: local.completed_at.map(Into::into),
        }
    }

    fn from_remote(&self, remote: &SetLogDocument, local_id: &str) -> ConvertResult<SetLogRecord> {
        let entity = self.entity_type();
        Ok(SetLogRecord {
            local_id: local_id.to_string(),
            remote_id: Some(remote_id_of(entity, remote)?),
            exercise_log_id: require(entity, "exerciseLogId", &remote.exercise_log_id)?.to_string(),
            set_number: remote.set_number,
            set_type: decode_enum::<SetType>(&remote.id, "setType", &remote.set_type),
            reps: remote.reps,
            weight_kg: remote.weight_kg,
            rpe: remote.rpe,
            completed: remote.completed,
            completed_at: time_from_remote(entity, "completedAt", remote.completed_at)?,
            updated_at: time_or_epoch(entity, "lastModified", remote.last_modified)?,
        })
    }
}

//! Personal record and usage documents.

use crate::converter::{
    decode_enum, remote_id_of, require, text_from_remote, time_from_remote, time_or_epoch,
    EntityConverter,
};
use crate::document::remote_document;
use crate::error::ConvertResult;
use crate::timestamp::RemoteTimestamp;
use liftsync_core::enums::RecordType;
use liftsync_core::records::{ExerciseUsageRecord, PersonalRecordEntry};
use liftsync_core::{EntityType, LocalRecord, RemoteEnum};
use serde::{Deserialize, Serialize};

/// Remote personal record document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalRecordDocument {
    /// Document id.
    pub id: String,
    /// Local id on the uploading device.
    pub local_id: Option<String>,
    /// Last modification time.
    pub last_modified: Option<RemoteTimestamp>,
    /// Local id of the exercise.
    pub exercise_id: String,
    /// [`RecordType`] code.
    pub record_type: String,
    /// Record value.
    pub value: f64,
    /// Reps performed.
    pub reps: Option<u32>,
    /// When the record was set.
    pub achieved_at: Option<RemoteTimestamp>,
    /// Local id of the set that produced it.
    pub set_log_id: Option<String>,
}

/// Remote exercise usage document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExerciseUsageDocument {
    /// Document id.
    pub id: String,
    /// Local id on the uploading device.
    pub local_id: Option<String>,
    /// Last modification time.
    pub last_modified: Option<RemoteTimestamp>,
    /// Local id of the exercise.
    pub exercise_id: String,
    /// Workouts the exercise appeared in.
    pub usage_count: u32,
    /// Most recent use.
    pub last_used_at: Option<RemoteTimestamp>,
    /// Pinned.
    pub is_favourite: bool,
}

remote_document!(PersonalRecordDocument);
remote_document!(ExerciseUsageDocument);

/// Converter for [`PersonalRecordEntry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonalRecordConverter;

impl EntityConverter for PersonalRecordConverter {
    type Local = PersonalRecordEntry;
    type Remote = PersonalRecordDocument;

    fn entity_type(&self) -> EntityType {
        EntityType::PersonalRecord
    }

    fn to_remote(&self, local: &PersonalRecordEntry) -> PersonalRecordDocument {
        PersonalRecordDocument {
            id: local.document_id().to_string(),
            local_id: Some(local.local_id.clone()),
            last_modified: Some(local.updated_at.into()),
            exercise_id: local.exercise_id.clone(),
            record_type: local.record_type.as_remote().to_string(),
            value: local.value,
            reps: local.reps,
            achieved_at: Some(local.achieved_at.into()),
            set_log_id: local.set_log_id.clone(),
        }
    }

    fn from_remote(
        &self,
        remote: &PersonalRecordDocument,
        local_id: &str,
    ) -> ConvertResult<PersonalRecordEntry> {
        let entity = self.entity_type();
        Ok(PersonalRecordEntry {
            local_id: local_id.to_string(),
            remote_id: Some(remote_id_of(entity, remote)?),
            exercise_id: require(entity, "exerciseId", &remote.exercise_id)?.to_string(),
            record_type: decode_enum::<RecordType>(&remote.id, "recordType", &remote.record_type),
            value: remote.value,
            reps: remote.reps,
            achieved_at: time_or_epoch(entity, "achievedAt", remote.achieved_at)?,
            set_log_id: remote.set_log_id.as_deref().and_then(text_from_remote),
            updated_at: time_or_epoch(entity, "lastModified", remote.last_modified)?,
        })
    }
}

/// Converter for [`ExerciseUsageRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExerciseUsageConverter;

impl EntityConverter for ExerciseUsageConverter {
    type Local = ExerciseUsageRecord;
    type Remote = ExerciseUsageDocument;

    fn entity_type(&self) -> EntityType {
        EntityType::ExerciseUsage
    }

    fn to_remote(&self, local: &ExerciseUsageRecord) -> ExerciseUsageDocument {
        ExerciseUsageDocument {
            id: local.document_id().to_string(),
            local_id: Some(local.local_id.clone()),
            last_modified: Some(local.updated_at.into()),
            exercise_id: local.exercise_id.clone(),
            usage_count: local.usage_count,
            last_used_at: local.last_used_at.map(Into::into),
            is_favourite: local.is_favourite,
        }
    }

    fn from_remote(
        &self,
        remote: &ExerciseUsageDocument,
        local_id: &str,
    ) -> ConvertResult<ExerciseUsageRecord> {
        let entity = self.entity_type();
        Ok(ExerciseUsageRecord {
            local_id: local_id.to_string(),
            remote_id: Some(remote_id_of(entity, remote)?),
            exercise_id: require(entity, "exerciseId", &remote.exercise_id)?.to_string(),
            usage_count: remote.usage_count,
            last_used_at: time_from_remote(entity, "lastUsedAt", remote.last_used_at)?,
            is_favourite: remote.is_favourite,
            updated_at: time_or_epoch(entity, "lastModified", remote.last_modified)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::decode_document;
    use serde_json::json;

    #[test]
    fn record_type_fallback_and_optional_set() {
        let doc: PersonalRecordDocument = decode_document(
            "pr-doc",
            json!({"exerciseId": "ex-1", "recordType": "FASTEST_MILE", "value": 120.0}),
        )
        .unwrap();
        let record = PersonalRecordConverter.from_remote(&doc, "pr-1").unwrap();
        assert_eq!(record.record_type, RecordType::MaxWeight);
        assert_eq!(record.set_log_id, None);
        assert_eq!(record.reps, None);
    }

    #[test]
    fn usage_converts() {
        let doc: ExerciseUsageDocument = decode_document(
            "u-doc",
            json!({"exerciseId": "ex-1", "usageCount": 7, "isFavourite": true}),
        )
        .unwrap();
        let record = ExerciseUsageConverter.from_remote(&doc, "u-1").unwrap();
        assert_eq!(record.usage_count, 7);
        assert!(record.is_favourite);
        assert_eq!(ExerciseUsageConverter.to_remote(&record).id, "u-doc");
    }
}

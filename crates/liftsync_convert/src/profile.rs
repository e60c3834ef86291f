//! Profile and body measurement documents.

use crate::converter::{
    decode_enum, remote_id_of, text_from_remote, text_to_remote, time_or_epoch, EntityConverter,
};
use crate::document::remote_document;
use crate::error::ConvertResult;
use crate::timestamp::RemoteTimestamp;
use liftsync_core::enums::{ExperienceLevel, MeasurementKind, UnitSystem};
use liftsync_core::records::{BodyMeasurementRecord, UserProfileRecord};
use liftsync_core::{EntityType, LocalRecord, RemoteEnum};
use serde::{Deserialize, Serialize};

/// Remote user profile document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfileDocument {
    /// Document id.
    pub id: String,
    /// Local id on the uploading device.
    pub local_id: Option<String>,
    /// Last modification time.
    pub last_modified: Option<RemoteTimestamp>,
    /// Name shown in the app.
    pub display_name: String,
    /// [`UnitSystem`] code.
    pub unit_system: String,
    /// [`ExperienceLevel`] code.
    pub experience_level: String,
    /// Body weight in kilograms.
    pub bodyweight_kg: Option<f64>,
    /// Height in centimetres.
    pub height_cm: Option<f64>,
    /// Year of birth.
    pub birth_year: Option<i32>,
}

remote_document!(UserProfileDocument);

/// Remote body measurement document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BodyMeasurementDocument {
    /// Document id.
    pub id: String,
    /// Local id on the uploading device.
    pub local_id: Option<String>,
    /// Last modification time.
    pub last_modified: Option<RemoteTimestamp>,
    /// [`MeasurementKind`] code.
    pub kind: String,
    /// Measured value.
    pub value: f64,
    /// When the measurement was taken.
    pub measured_at: Option<RemoteTimestamp>,
    /// Note, empty when absent.
    pub notes: String,
}

remote_document!(BodyMeasurementDocument);

/// Converter for [`UserProfileRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UserProfileConverter;

impl EntityConverter for UserProfileConverter {
    type Local = UserProfileRecord;
    type Remote = UserProfileDocument;

    fn entity_type(&self) -> EntityType {
        EntityType::UserProfile
    }

    fn to_remote(&self, local: &UserProfileRecord) -> UserProfileDocument {
        UserProfileDocument {
            id: local.document_id().to_string(),
            local_id: Some(local.local_id.clone()),
            last_modified: Some(local.updated_at.into()),
            display_name: local.display_name.clone(),
            unit_system: local.unit_system.as_remote().to_string(),
            experience_level: local.experience_level.as_remote().to_string(),
            bodyweight_kg: local.bodyweight_kg,
            height_cm: local.height_cm,
            birth_year: local.birth_year,
        }
    }

    fn from_remote(
        &self,
        remote: &UserProfileDocument,
        local_id: &str,
    ) -> ConvertResult<UserProfileRecord> {
        let entity = self.entity_type();
        Ok(UserProfileRecord {
            local_id: local_id.to_string(),
            remote_id: Some(remote_id_of(entity, remote)?),
            display_name: remote.display_name.clone(),
            unit_system: decode_enum::<UnitSystem>(&remote.id, "unitSystem", &remote.unit_system),
            experience_level: decode_enum::<ExperienceLevel>(
                &remote.id,
                "experienceLevel",
                &remote.experience_level,
            ),
            bodyweight_kg: remote.bodyweight_kg,
            height_cm: remote.height_cm,
            birth_year: remote.birth_year,
            updated_at: time_or_epoch(entity, "lastModified", remote.last_modified)?,
        })
    }
}

/// Converter for [`BodyMeasurementRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyMeasurementConverter;

impl EntityConverter for BodyMeasurementConverter {
    type Local = BodyMeasurementRecord;
    type Remote = BodyMeasurementDocument;

    fn entity_type(&self) -> EntityType {
        EntityType::BodyMeasurement
    }

    fn to_remote(&self, local: &BodyMeasurementRecord) -> BodyMeasurementDocument {
        BodyMeasurementDocument {
            id: local.document_id().to_string(),
            local_id: Some(local.local_id.clone()),
            last_modified: Some(local.updated_at.into()),
            kind: local.kind.as_remote().to_string(),
            value: local.value,
            measured_at: Some(local.measured_at.into()),
            notes: text_to_remote(local.notes.as_deref()),
        }
    }

    fn from_remote(
        &self,
        remote: &BodyMeasurementDocument,
        local_id: &str,
    ) -> ConvertResult<BodyMeasurementRecord> {
        let entity = self.entity_type();
        Ok(BodyMeasurementRecord {
            local_id: local_id.to_string(),
            remote_id: Some(remote_id_of(entity, remote)?),
            kind: decode_enum::<MeasurementKind>(&remote.id, "kind", &remote.kind),
            value: remote.value,
            measured_at: time_or_epoch(entity, "measuredAt", remote.measured_at)?,
            notes: text_from_remote(&remote.notes),
            updated_at: time_or_epoch(entity, "lastModified", remote.last_modified)?,
        })
    }
}

//! Exercise documents (catalog and custom).

use crate::converter::{
    decode_enum, remote_id_of, text_from_remote, text_to_remote, time_or_epoch, EntityConverter,
};
use crate::document::remote_document;
use crate::error::ConvertResult;
use crate::timestamp::RemoteTimestamp;
use liftsync_core::enums::{Equipment, ExerciseCategory, MuscleGroup};
use liftsync_core::id::child_id;
use liftsync_core::records::{ExerciseAlias, ExerciseInstruction, ExerciseMuscle, ExerciseRecord};
use liftsync_core::{EntityType, LocalRecord, RemoteEnum};
use serde::{Deserialize, Serialize};

/// Child-id kind for muscles.
pub const MUSCLE_KIND: &str = "muscle";
/// Child-id kind for instructions.
pub const INSTRUCTION_KIND: &str = "instruction";
/// Child-id kind for aliases.
pub const ALIAS_KIND: &str = "alias";

/// Remote exercise document. Child rows are embedded as arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExerciseDocument {
    /// Document id.
    pub id: String,
    /// Local id on the uploading device.
    pub local_id: Option<String>,
    /// Last modification time.
    pub last_modified: Option<RemoteTimestamp>,
    /// Display name.
    pub name: String,
    /// [`ExerciseCategory`] code.
    pub category: String,
    /// [`Equipment`] code.
    pub equipment: String,
    /// Description, empty when absent.
    pub description: String,
    /// Targeted muscles.
    pub muscles: Vec<MuscleDocument>,
    /// Ordered instruction steps.
    pub instructions: Vec<InstructionDocument>,
    /// Alternative names.
    pub aliases: Vec<String>,
    /// Creation time.
    pub created_at: Option<RemoteTimestamp>,
}

/// Embedded muscle entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MuscleDocument {
    /// [`MuscleGroup`] code.
    pub muscle: String,
    /// Primary mover.
    pub is_primary: bool,
}

/// Embedded instruction step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstructionDocument {
    /// 1-based step number.
    pub step: u32,
    /// Step text.
    pub text: String,
}

remote_document!(ExerciseDocument);

/// Converter for both exercise entity types.
///
/// Catalog and custom exercises share a record and document shape; the
/// converter decides which one it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseConverter {
    custom: bool,
}

impl ExerciseConverter {
    /// Converter for the read-only exercise catalog.
    #[must_use]
    pub const fn catalog() -> Self {
        Self { custom: false }
    }

    /// Converter for user-defined exercises.
    #[must_use]
    pub const fn custom() -> Self {
        Self { custom: true }
    }
}

impl EntityConverter for ExerciseConverter {
    type Local = ExerciseRecord;
    type Remote = ExerciseDocument;

    fn entity_type(&self) -> EntityType {
        if self.custom {
            EntityType::CustomExercise
        } else {
            EntityType::Exercise
        }
    }

    fn to_remote(&self, local: &ExerciseRecord) -> ExerciseDocument {
        ExerciseDocument {
            id: local.document_id().to_string(),
            local_id: Some(local.local_id.clone()),
            last_modified: Some(local.updated_at.into()),
            name: local.name.clone(),
            category: local.category.as_remote().to_string(),
            equipment: local.equipment.as_remote().to_string(),
            description: text_to_remote(local.description.as_deref()),
            muscles: local
                .muscles
                .iter()
                .map(|m| MuscleDocument {
                    muscle: m.muscle.as_remote().to_string(),
                    is_primary: m.is_primary,
                })
                .collect(),
            instructions: local
                .instructions
                .iter()
                .map(|i| InstructionDocument {
                    step: i.step,
                    text: i.text.clone(),
                })
                .collect(),
            aliases: local.aliases.iter().map(|a| a.alias.clone()).collect(),
            created_at: Some(local.created_at.into()),
        }
    }

    fn from_remote(&self, remote: &ExerciseDocument, local_id: &str) -> ConvertResult<ExerciseRecord> {
        let entity = self.entity_type();
        let remote_id = remote_id_of(entity, remote)?;
        let doc = remote.id.as_str();

        let muscles = remote
            .muscles
            .iter()
            .enumerate()
            .map(|(position, m)| ExerciseMuscle {
                id: child_id(local_id, MUSCLE_KIND, position),
                muscle: decode_enum::<MuscleGroup>(doc, "muscles.muscle", &m.muscle),
                is_primary: m.is_primary,
            })
            .collect();

        let instructions = remote
            .instructions
            .iter()
            .enumerate()
            .map(|(position, i)| ExerciseInstruction {
                id: child_id(local_id, INSTRUCTION_KIND, position),
                step: i.step,
                text: i.text.clone(),
            })
            .collect();

        let aliases = remote
            .aliases
            .iter()
            .enumerate()
            .map(|(position, alias)| ExerciseAlias {
                id: child_id(local_id, ALIAS_KIND, position),
                alias: alias.clone(),
            })
            .collect();

        Ok(ExerciseRecord {
            local_id: local_id.to_string(),
            remote_id: Some(remote_id),
            name: remote.name.clone(),
            category: decode_enum::<ExerciseCategory>(doc, "category", &remote.category),
            equipment: decode_enum::<Equipment>(doc, "equipment", &remote.equipment),
            description: text_from_remote(&remote.description),
            is_custom: self.custom,
            muscles,
            instructions,
            aliases,
            created_at: time_or_epoch(entity, "createdAt", remote.created_at)?,
            updated_at: time_or_epoch(entity, "lastModified", remote.last_modified)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{decode_document, RemoteDocument};
    use crate::error::ConvertError;
    use serde_json::json;

    fn body() -> serde_json::Value {
        json!({
            "localId": "ex-local",
            "lastModified": {"seconds": 100, "nanos": 0},
            "name": "Bench Press",
            "category": "CHEST",
            "equipment": "BARBELL",
            "description": "",
            "muscles": [
                {"muscle": "CHEST", "isPrimary": true},
                {"muscle": "SERRATUS", "isPrimary": false}
            ],
            "instructions": [{"step": 1, "text": "Unrack"}],
            "aliases": ["Flat bench"],
            "createdAt": {"seconds": 50, "nanos": 0}
        })
    }

    #[test]
    fn decodes_catalog_document() {
        let doc: ExerciseDocument = decode_document("ex-doc", body()).unwrap();
        assert_eq!(doc.id(), "ex-doc");
        assert_eq!(doc.local_id(), Some("ex-local"));

        let record = ExerciseConverter::catalog().from_remote(&doc, "ex-local").unwrap();
        assert_eq!(record.remote_id.as_deref(), Some("ex-doc"));
        assert!(!record.is_custom);
        assert_eq!(record.description, None);
        assert_eq!(record.category, ExerciseCategory::Chest);
        assert_eq!(record.muscles[1].muscle, MuscleGroup::Other);
        assert_eq!(record.aliases.len(), 1);
        assert_eq!(record.updated_at.as_millis(), 100_000);
        assert_eq!(record.created_at.as_millis(), 50_000);
    }

    #[test]
    fn child_ids_are_stable() {
        let doc: ExerciseDocument = decode_document("ex-doc", body()).unwrap();
        let converter = ExerciseConverter::custom();
        let first = converter.from_remote(&doc, "ex-local").unwrap();
        let second = converter.from_remote(&doc, "ex-local").unwrap();
        assert_eq!(first, second);
        assert!(first.is_custom);
        assert_eq!(first.muscles[0].id, child_id("ex-local", MUSCLE_KIND, 0));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let doc: ExerciseDocument = decode_document("ex-doc", json!({"name": "Plank"})).unwrap();
        let record = ExerciseConverter::catalog().from_remote(&doc, "l").unwrap();
        assert_eq!(record.category, ExerciseCategory::Other);
        assert_eq!(record.equipment, Equipment::Other);
        assert!(record.muscles.is_empty());
        assert!(record.updated_at.is_epoch());
    }

    #[test]
    fn missing_id_is_an_error() {
        let doc: ExerciseDocument = serde_json::from_value(json!({"name": "Plank"})).unwrap();
        assert!(matches!(
            ExerciseConverter::catalog().from_remote(&doc, "l"),
            Err(ConvertError::MissingField { field: "id", .. })
        ));
    }

    #[test]
    fn uploads_embed_local_id() {
        let doc: ExerciseDocument = decode_document("ex-doc", body()).unwrap();
        let record = ExerciseConverter::custom().from_remote(&doc, "ex-local").unwrap();
        let out = ExerciseConverter::custom().to_remote(&record);
        assert_eq!(out.id, "ex-doc");
        assert_eq!(out.local_id.as_deref(), Some("ex-local"));
        assert_eq!(out.muscles[1].muscle, "OTHER");
    }
}

//! The converter contract and field mapping helpers.

use crate::document::RemoteDocument;
use crate::error::{ConvertError, ConvertResult};
use crate::timestamp::RemoteTimestamp;
use liftsync_core::{EntityType, LocalRecord, RemoteEnum, Timestamp};
use tracing::warn;

/// A pure, bidirectional mapping between a local record and its remote
/// document.
///
/// Converters never touch either store. `from_remote` receives the local id
/// the pipeline resolved for the document and must build the record under
/// that id.
pub trait EntityConverter: Send + Sync + 'static {
    /// Local record shape.
    type Local: LocalRecord;
    /// Remote document shape.
    type Remote: RemoteDocument;

    /// Entity type this converter serves.
    fn entity_type(&self) -> EntityType;

    /// Builds the document to upload for `local`, embedding its local id.
    fn to_remote(&self, local: &Self::Local) -> Self::Remote;

    /// Builds the local record for a downloaded document.
    fn from_remote(&self, remote: &Self::Remote, local_id: &str) -> ConvertResult<Self::Local>;
}

/// Optional text going out: absent becomes the empty string.
pub fn text_to_remote(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Optional text coming in: the empty string becomes absent.
pub fn text_from_remote(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Decodes an enumeration code, falling back on unknown values.
pub fn decode_enum<E: RemoteEnum>(document_id: &str, field: &'static str, code: &str) -> E {
    match E::from_remote(code) {
        Some(value) => value,
        None => {
            warn!(
                document = %document_id,
                field,
                code,
                fallback = E::FALLBACK.as_remote(),
                "unknown {} code, using fallback",
                E::NAME
            );
            E::FALLBACK
        }
    }
}

/// Returns `value` if it is non-empty.
pub fn require<'a>(entity: EntityType, field: &'static str, value: &'a str) -> ConvertResult<&'a str> {
    if value.trim().is_empty() {
        Err(ConvertError::missing(entity, field))
    } else {
        Ok(value)
    }
}

/// Converts an optional remote timestamp.
pub fn time_from_remote(
    entity: EntityType,
    field: &'static str,
    value: Option<RemoteTimestamp>,
) -> ConvertResult<Option<Timestamp>> {
    match value {
        None => Ok(None),
        Some(remote) => remote
            .to_timestamp()
            .map(Some)
            .ok_or_else(|| ConvertError::invalid(entity, field, format!("nanos {} out of range", remote.nanos))),
    }
}

/// Converts a remote timestamp that defaults to the epoch when absent.
pub fn time_or_epoch(
    entity: EntityType,
    field: &'static str,
    value: Option<RemoteTimestamp>,
) -> ConvertResult<Timestamp> {
    Ok(time_from_remote(entity, field, value)?.unwrap_or(Timestamp::EPOCH))
}

/// Checks the document id and returns it as the record's remote id.
pub(crate) fn remote_id_of<D: RemoteDocument>(entity: EntityType, document: &D) -> ConvertResult<String> {
    require(entity, "id", document.id()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftsync_core::enums::{SetType, WorkoutStatus};

    #[test]
    fn optional_text_mapping() {
        assert_eq!(text_to_remote(None), "");
        assert_eq!(text_to_remote(Some("note")), "note");
        assert_eq!(text_from_remote(""), None);
        assert_eq!(text_from_remote("note"), Some("note".to_string()));
    }

    #[test]
    fn enum_codes_fall_back() {
        assert_eq!(decode_enum::<SetType>("d", "setType", "WARMUP"), SetType::Warmup);
        assert_eq!(decode_enum::<SetType>("d", "setType", "warmup"), SetType::Warmup);
        assert_eq!(decode_enum::<SetType>("d", "setType", "CLUSTER"), SetType::Standard);
        assert_eq!(
            decode_enum::<WorkoutStatus>("d", "status", ""),
            WorkoutStatus::Completed
        );
    }

    #[test]
    fn required_values() {
        assert!(require(EntityType::SetLog, "exerciseLogId", "abc").is_ok());
        assert!(matches!(
            require(EntityType::SetLog, "exerciseLogId", "  "),
            Err(ConvertError::MissingField { field: "exerciseLogId", .. })
        ));
    }

    #[test]
    fn timestamps() {
        let entity = EntityType::Workout;
        assert_eq!(time_from_remote(entity, "t", None).unwrap(), None);
        assert_eq!(time_or_epoch(entity, "t", None).unwrap(), Timestamp::EPOCH);
        assert_eq!(
            time_or_epoch(entity, "t", Some(RemoteTimestamp::new(2, 0))).unwrap(),
            Timestamp::from_millis(2_000)
        );
        assert!(matches!(
            time_from_remote(entity, "t", Some(RemoteTimestamp::new(2, -5))),
            Err(ConvertError::InvalidValue { .. })
        ));
    }
}

//! The remote document contract.

use crate::error::ConvertResult;
use crate::timestamp::RemoteTimestamp;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// A document stored in a remote collection.
///
/// Every document carries its own id, the local id of the record it was
/// produced from, and its last modification time. The remaining fields are
/// the denormalized domain payload.
pub trait RemoteDocument:
    Serialize + DeserializeOwned + Clone + fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// Document id within its collection.
    fn id(&self) -> &str;

    /// Overwrites the document id.
    fn set_id(&mut self, id: String);

    /// Local id embedded by the uploading device, if any.
    fn local_id(&self) -> Option<&str>;

    /// Last modification time.
    fn last_modified(&self) -> Option<RemoteTimestamp>;
}

/// Implements [`RemoteDocument`] for a struct with `id`, `local_id` and
/// `last_modified` fields.
macro_rules! remote_document {
    ($ty:ty) => {
        impl $crate::document::RemoteDocument for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn local_id(&self) -> Option<&str> {
                self.local_id.as_deref().filter(|id| !id.is_empty())
            }

            fn last_modified(&self) -> Option<$crate::timestamp::RemoteTimestamp> {
                self.last_modified
            }
        }
    };
}

pub(crate) use remote_document;

/// Decodes a document body.
///
/// The id the store returned the document under wins over any `id` field in
/// the body.
pub fn decode_document<D: RemoteDocument>(id: &str, body: serde_json::Value) -> ConvertResult<D> {
    let mut document: D = serde_json::from_value(body)?;
    document.set_id(id.to_string());
    Ok(document)
}

/// Encodes a document body.
pub fn encode_document<D: RemoteDocument>(document: &D) -> ConvertResult<serde_json::Value> {
    Ok(serde_json::to_value(document)?)
}

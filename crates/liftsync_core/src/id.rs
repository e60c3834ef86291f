//! Identifier helpers.
//!
//! Local ids are random UUID strings created by the application. Ids of rows
//! folded into a parent document (muscles, instructions, aliases) are derived
//! from the parent id so that converting the same document twice yields the
//! same child rows.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Separator between hashed id components. Not valid inside UUID text.
const COMPONENT_SEPARATOR: u8 = 0x1f;

/// Creates a new random local identifier.
#[must_use]
pub fn new_local_id() -> String {
    Uuid::new_v4().to_string()
}

/// Derives a stable identifier from its components.
///
/// The same components always produce the same id; different component
/// lists produce different ids with overwhelming probability.
#[must_use]
pub fn derive_id(components: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for component in components {
        hasher.update(component.as_bytes());
        hasher.update([COMPONENT_SEPARATOR]);
    }
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::from_bytes(bytes).to_string()
}

/// Derives the id of the `position`-th child row of `kind` under `parent_id`.
#[must_use]
pub fn child_id(parent_id: &str, kind: &str, position: usize) -> String {
    derive_id(&[parent_id, kind, &position.to_string()])
}

/// Derives the local id for a document that has no embedded local id.
#[must_use]
pub fn local_id_for_document(document_id: &str) -> String {
    derive_id(&["document", document_id])
}

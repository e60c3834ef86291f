//! User profile and body measurements.

use super::local_record;
use crate::entity::EntityType;
use crate::enums::{ExperienceLevel, MeasurementKind, UnitSystem};
use crate::types::Timestamp;

/// The signed-in user's profile.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfileRecord {
    /// Local id.
    pub local_id: String,
    /// Remote document id.
    pub remote_id: Option<String>,
    /// Name shown in the app.
    pub display_name: String,
    /// Preferred units.
    pub unit_system: UnitSystem,
    /// Training experience.
    pub experience_level: ExperienceLevel,
    /// Body weight in kilograms.
    pub bodyweight_kg: Option<f64>,
    /// Height in centimetres.
    pub height_cm: Option<f64>,
    /// Year of birth.
    pub birth_year: Option<i32>,
    /// Last modification time.
    pub updated_at: Timestamp,
}

/// A body measurement taken at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyMeasurementRecord {
    /// Local id.
    pub local_id: String,
    /// Remote document id.
    pub remote_id: Option<String>,
    /// What was measured.
    pub kind: MeasurementKind,
    /// Measured value in metric units (kg, %, cm).
    pub value: f64,
    /// When the measurement was taken.
    pub measured_at: Timestamp,
    /// Free-text note.
    pub notes: Option<String>,
    /// Last modification time.
    pub updated_at: Timestamp,
}

local_record!(UserProfileRecord, EntityType::UserProfile.table());
local_record!(BodyMeasurementRecord, EntityType::BodyMeasurement.table());

//! Exercise definitions (catalog and custom).

use super::local_record;
use crate::entity::EntityType;
use crate::enums::{Equipment, ExerciseCategory, MuscleGroup};
use crate::types::Timestamp;

/// An exercise definition.
///
/// Catalog exercises and user-defined exercises share this shape and the
/// same local table; `is_custom` tells them apart. The child collections are
/// separate tables on device and are folded into the parent document
/// remotely.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseRecord {
    /// Local id.
    pub local_id: String,
    /// Remote document id.
    pub remote_id: Option<String>,
    /// Display name.
    pub name: String,
    /// Body region.
    pub category: ExerciseCategory,
    /// Required equipment.
    pub equipment: Equipment,
    /// Free-text description.
    pub description: Option<String>,
    /// True for user-defined exercises.
    pub is_custom: bool,
    /// Targeted muscles.
    pub muscles: Vec<ExerciseMuscle>,
    /// Ordered how-to steps.
    pub instructions: Vec<ExerciseInstruction>,
    /// Alternative names used by search.
    pub aliases: Vec<ExerciseAlias>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last modification time.
    pub updated_at: Timestamp,
}

/// A muscle targeted by an exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseMuscle {
    /// Child row id.
    pub id: String,
    /// Muscle group.
    pub muscle: MuscleGroup,
    /// Primary mover rather than synergist.
    pub is_primary: bool,
}

/// One step of an exercise's instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseInstruction {
    /// Child row id.
    pub id: String,
    /// 1-based step number.
    pub step: u32,
    /// Step text.
    pub text: String,
}

/// An alternative exercise name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseAlias {
    /// Child row id.
    pub id: String,
    /// Alias text.
    pub alias: String,
}

local_record!(ExerciseRecord, EntityType::Exercise.table());

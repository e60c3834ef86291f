//! # LiftSync Convert
//!
//! Remote document shapes and the converters that map them to and from the
//! local record shapes in `liftsync_core`.
//!
//! Converters are pure: they never read or write either store. Field mapping
//! rules shared by every converter:
//! - absent optional text is uploaded as `""`, and `""` downloads as absent
//! - optional numbers, timestamps and references map to `null`
//! - unknown enumeration codes decode to the enumeration's fallback and log
//!   a warning
//! - a missing document id or required foreign id is a hard error
//! - foreign ids travel as the referencing device's local ids

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod converter;
mod document;
mod error;
mod exercise;
mod profile;
mod programme;
mod stats;
mod timestamp;
mod workout;

pub use converter::{
    decode_enum, require, text_from_remote, text_to_remote, time_from_remote, time_or_epoch,
    EntityConverter,
};
pub use document::{decode_document, encode_document, RemoteDocument};
pub use error::{ConvertError, ConvertResult};
pub use exercise::{
    ExerciseConverter, ExerciseDocument, InstructionDocument, MuscleDocument, ALIAS_KIND,
    INSTRUCTION_KIND, MUSCLE_KIND,
};
pub use profile::{
    BodyMeasurementConverter, BodyMeasurementDocument, UserProfileConverter, UserProfileDocument,
};
pub use programme::{
    ProgrammeConverter, ProgrammeDocument, ProgrammeExerciseConverter, ProgrammeExerciseDocument,
    ProgrammeProgressConverter, ProgrammeProgressDocument, ProgrammeWeekConverter,
    ProgrammeWeekDocument, ProgrammeWorkoutConverter, ProgrammeWorkoutDocument,
};
pub use stats::{
    ExerciseUsageConverter, ExerciseUsageDocument, PersonalRecordConverter, PersonalRecordDocument,
};
pub use timestamp::RemoteTimestamp;
pub use workout::{
    ExerciseLogConverter, ExerciseLogDocument, SetLogConverter, SetLogDocument, WorkoutConverter,
    WorkoutDocument,
};

//! Local record shapes.
//!
//! These are the on-device representations written by the application. The
//! sync engine only reads them and upserts converted downloads; it never
//! originates domain content.

macro_rules! local_record {
    ($ty:ty, $table:expr) => {
        local_record!($ty, $table, |_record| Vec::new());
    };
    ($ty:ty, $table:expr, |$record:ident| $references:expr) => {
        impl $crate::records::LocalRecord for $ty {
            const TABLE: &'static str = $table;

            fn local_id(&self) -> &str {
                &self.local_id
            }

            fn remote_id(&self) -> Option<&str> {
                self.remote_id.as_deref()
            }

            fn set_remote_id(&mut self, remote_id: String) {
                self.remote_id = Some(remote_id);
            }

            fn updated_at(&self) -> $crate::types::Timestamp {
                self.updated_at
            }

            fn references(&self) -> Vec<$crate::records::Reference<'_>> {
                let $record = self;
                $references
            }
        }
    };
}

pub(crate) use local_record;

mod exercise;
mod profile;
mod programme;
mod stats;
mod workout;

pub use exercise::{ExerciseAlias, ExerciseInstruction, ExerciseMuscle, ExerciseRecord};
pub use profile::{BodyMeasurementRecord, UserProfileRecord};
pub use programme::{
    ProgrammeExerciseRecord, ProgrammeProgressRecord, ProgrammeRecord, ProgrammeWeekRecord,
    ProgrammeWorkoutRecord,
};
pub use stats::{ExerciseUsageRecord, PersonalRecordEntry};
pub use workout::{ExerciseLogRecord, SetLogRecord, WorkoutRecord};

use crate::types::Timestamp;
use std::fmt;

/// A foreign key held by a local record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reference<'a> {
    /// Table the referenced row lives in.
    pub table: &'static str,
    /// Local id of the referenced row.
    pub id: &'a str,
}

impl<'a> Reference<'a> {
    /// Creates a reference.
    #[must_use]
    pub const fn new(table: &'static str, id: &'a str) -> Self {
        Self { table, id }
    }
}

/// Behavior shared by every local record shape.
pub trait LocalRecord: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Local table the record is stored in.
    const TABLE: &'static str;

    /// Locally unique identifier.
    fn local_id(&self) -> &str;

    /// Remote document id, once the record has been uploaded or downloaded.
    fn remote_id(&self) -> Option<&str>;

    /// Records the remote document id after a successful upload.
    fn set_remote_id(&mut self, remote_id: String);

    /// Last local modification time.
    fn updated_at(&self) -> Timestamp;

    /// Rows this record points at. They must exist before it is stored.
    fn references(&self) -> Vec<Reference<'_>> {
        Vec::new()
    }

    /// Id of the remote document this record maps to.
    fn document_id(&self) -> &str {
        self.remote_id().unwrap_or_else(|| self.local_id())
    }
}

//! Domain enumerations and their remote string codes.
//!
//! Remote documents store enumerated values as upper-snake-case strings.
//! Every enumeration designates a fallback variant that unrecognized codes
//! decode to, so a newer client writing a new category never breaks an older
//! one.

use std::fmt;

/// An enumeration stored as a string code in remote documents.
pub trait RemoteEnum: Sized + Copy + Eq + fmt::Debug + 'static {
    /// Variant used for unrecognized codes.
    const FALLBACK: Self;

    /// Type name, used in diagnostics.
    const NAME: &'static str;

    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// Returns the remote code.
    fn as_remote(&self) -> &'static str;

    /// Parses a remote code. Matching ignores ASCII case and surrounding
    /// whitespace. Returns `None` for unknown codes.
    fn from_remote(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.as_remote().eq_ignore_ascii_case(code))
    }
}

macro_rules! remote_enum {
    (
        $(#[$meta:meta])*
        $name:ident, fallback = $fallback:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl RemoteEnum for $name {
            const FALLBACK: Self = $name::$fallback;
            const NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [Self] = &[$( $name::$variant ),+];

            fn as_remote(&self) -> &'static str {
                match self {
                    $( $name::$variant => $code ),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                <$name as RemoteEnum>::FALLBACK
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_remote())
            }
        }
    };
}

remote_enum! {
    /// Primary body region an exercise trains.
    ExerciseCategory, fallback = Other {
        /// Chest.
        Chest => "CHEST",
        /// Back.
        Back => "BACK",
        /// Legs.
        Legs => "LEGS",
        /// Shoulders.
        Shoulders => "SHOULDERS",
        /// Arms.
        Arms => "ARMS",
        /// Core.
        Core => "CORE",
        /// Cardio.
        Cardio => "CARDIO",
        /// Full body.
        FullBody => "FULL_BODY",
        /// Anything else.
        Other => "OTHER",
    }
}

remote_enum! {
    /// Equipment an exercise requires.
    Equipment, fallback = Other {
        /// Barbell.
        Barbell => "BARBELL",
        /// Dumbbell.
        Dumbbell => "DUMBBELL",
        /// Machine.
        Machine => "MACHINE",
        /// Cable stack.
        Cable => "CABLE",
        /// Kettlebell.
        Kettlebell => "KETTLEBELL",
        /// No equipment.
        Bodyweight => "BODYWEIGHT",
        /// Resistance band.
        Band => "BAND",
        /// Anything else.
        Other => "OTHER",
    }
}

remote_enum! {
    /// A muscle group targeted by an exercise.
    MuscleGroup, fallback = Other {
        /// Pectorals.
        Chest => "CHEST",
        /// Latissimus dorsi.
        Lats => "LATS",
        /// Trapezius.
        Traps => "TRAPS",
        /// Deltoids.
        Shoulders => "SHOULDERS",
        /// Biceps.
        Biceps => "BICEPS",
        /// Triceps.
        Triceps => "TRICEPS",
        /// Forearms.
        Forearms => "FOREARMS",
        /// Abdominals.
        Abs => "ABS",
        /// Obliques.
        Obliques => "OBLIQUES",
        /// Erectors.
        LowerBack => "LOWER_BACK",
        /// Glutes.
        Glutes => "GLUTES",
        /// Quadriceps.
        Quadriceps => "QUADRICEPS",
        /// Hamstrings.
        Hamstrings => "HAMSTRINGS",
        /// Calves.
        Calves => "CALVES",
        /// Anything else.
        Other => "OTHER",
    }
}

remote_enum! {
    /// How a set was performed.
    SetType, fallback = Standard {
        /// Regular working set.
        Standard => "STANDARD",
        /// Warm-up set.
        Warmup => "WARMUP",
        /// Drop set.
        Drop => "DROP",
        /// Set taken to failure.
        Failure => "FAILURE",
        /// As many reps as possible.
        Amrap => "AMRAP",
    }
}

remote_enum! {
    /// Lifecycle of a logged workout.
    WorkoutStatus, fallback = Completed {
        /// Still being logged.
        InProgress => "IN_PROGRESS",
        /// Finished.
        Completed => "COMPLETED",
        /// Stopped early.
        Abandoned => "ABANDONED",
    }
}

remote_enum! {
    /// Training goal of a programme.
    ProgrammeGoal, fallback = General {
        /// Maximal strength.
        Strength => "STRENGTH",
        /// Muscle growth.
        Hypertrophy => "HYPERTROPHY",
        /// Muscular endurance.
        Endurance => "ENDURANCE",
        /// General fitness.
        General => "GENERAL",
    }
}

remote_enum! {
    /// Kind of personal record.
    RecordType, fallback = MaxWeight {
        /// Estimated one-rep max.
        OneRepMax => "ONE_REP_MAX",
        /// Heaviest weight lifted.
        MaxWeight => "MAX_WEIGHT",
        /// Most reps in one set.
        MaxReps => "MAX_REPS",
        /// Highest weight times reps.
        MaxVolume => "MAX_VOLUME",
    }
}

remote_enum! {
    /// Preferred display units.
    UnitSystem, fallback = Metric {
        /// Kilograms and centimetres.
        Metric => "METRIC",
        /// Pounds and inches.
        Imperial => "IMPERIAL",
    }
}

remote_enum! {
    /// Self-reported training experience.
    ExperienceLevel, fallback = Beginner {
        /// Less than a year of training.
        Beginner => "BEGINNER",
        /// One to three years.
        Intermediate => "INTERMEDIATE",
        /// More than three years.
        Advanced => "ADVANCED",
    }
}

remote_enum! {
    /// What a body measurement measures.
    MeasurementKind, fallback = Other {
        /// Body weight.
        BodyWeight => "BODY_WEIGHT",
        /// Body fat percentage.
        BodyFat => "BODY_FAT",
        /// Chest girth.
        Chest => "CHEST",
        /// Waist girth.
        Waist => "WAIST",
        /// Hip girth.
        Hips => "HIPS",
        /// Arm girth.
        Arm => "ARM",
        /// Thigh girth.
        Thigh => "THIGH",
        /// Anything else.
        Other => "OTHER",
    }
}

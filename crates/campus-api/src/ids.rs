// ── Identity types ──
//
// Every backend record is addressed by a numeric id, except grades,
// which the backend keys by their unique name. Each gets its own
// newtype so a section id can never be passed where a subject id is
// expected.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

numeric_id!(
    /// A section within a grade. The backend calls this a class, so the
    /// same value appears as `class_id` on schedules and students.
    SectionId
);
numeric_id!(SubjectId);
numeric_id!(ScheduleId);
numeric_id!(TeacherId);
numeric_id!(StudentId);
numeric_id!(ParentId);
numeric_id!(FeedbackId);
numeric_id!(AnnouncementId);
numeric_id!(UserId);

/// Classes returned by `/classes` are the same records as sections.
pub type ClassId = SectionId;

// ── GradeKey ────────────────────────────────────────────────────────

/// Reference to a grade. The backend has no numeric grade id and keys
/// grades by their unique name, so the name doubles as identity here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeKey(String);

impl GradeKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GradeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GradeKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for GradeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

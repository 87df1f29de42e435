//! Lifecycle status enums for versions, submissions and conflict audit rows.
//!
//! Each enum is stored as a lowercase `TEXT` column guarded by a `CHECK`
//! constraint. All state changes go through [`VersionStatus::transition`] or
//! [`SubmissionStatus::transition`], which enforce the workflow diagram:
//!
//! ```text
//! version:     pending -> published | rejected
//! submission:  pending -> conflict_detected | merged | rejected
//!              conflict_detected -> merged | rejected
//! conflict:    detected -> resolved
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The value stored in the database column.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $val => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        concat!("Invalid ", stringify!($name), " '{}'"),
                        other
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

define_status_enum! {
    /// Status of an `article_versions` row.
    VersionStatus {
        Pending = "pending",
        Published = "published",
        Rejected = "rejected",
    }
}

define_status_enum! {
    /// Status of a `review_submissions` row.
    SubmissionStatus {
        Pending = "pending",
        ConflictDetected = "conflict_detected",
        Rejected = "rejected",
        Merged = "merged",
    }
}

define_status_enum! {
    /// Status of a `version_conflicts` audit row.
    ConflictStatus {
        Detected = "detected",
        Resolved = "resolved",
    }
}

impl VersionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Published) | (Self::Pending, Self::Rejected)
        )
    }

    pub fn transition(self, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::Conflict(format!(
                "Version cannot move from '{self}' to '{next}'"
            )))
        }
    }
}

impl SubmissionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Merged)
    }

    /// Whether a review action may still be taken.
    pub fn is_actionable(self) -> bool {
        !self.is_terminal()
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        use SubmissionStatus::*;
        matches!(
            (self, next),
            (Pending, ConflictDetected)
                | (Pending, Merged)
                | (Pending, Rejected)
                | (ConflictDetected, Merged)
                | (ConflictDetected, Rejected)
        )
    }

    pub fn transition(self, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::Conflict(format!(
                "Submission cannot move from '{self}' to '{next}'"
            )))
        }
    }

    /// Status the proposed version must carry while the submission is in
    /// this state.
    pub fn proposed_version_status(self) -> VersionStatus {
        match self {
            Self::Pending | Self::ConflictDetected => VersionStatus::Pending,
            Self::Merged => VersionStatus::Published,
            Self::Rejected => VersionStatus::Rejected,
        }
    }
}

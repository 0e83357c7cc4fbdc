//! Error types for the timetable engine.

use thiserror::Error;

use crate::data::{CourseId, InstructorId};

/// A single input-validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error(
        "course_conflict record for course {course_id} has non-numeric second course id {raw:?}"
    )]
    MalformedConflictId { course_id: CourseId, raw: String },

    #[error("duplicate {entity} id {id}")]
    DuplicateId { entity: &'static str, id: u32 },

    #[error("course {course_id} references unknown instructor {instructor_id}")]
    UnknownInstructor {
        course_id: CourseId,
        instructor_id: InstructorId,
    },

    #[error("course {0} is declared to conflict with itself")]
    SelfConflict(CourseId),
}

/// Malformed weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid has no days")]
    NoDays,

    #[error("grid has no time slots")]
    NoTimeSlots,

    #[error("time slot label {0:?} is not of the form \"HH:MM-HH:MM\"")]
    MalformedLabel(String),

    #[error("duplicate {kind} label {label:?}")]
    DuplicateLabel { kind: &'static str, label: String },

    #[error("time slot {0:?} does not end after it starts")]
    EmptyInterval(String),

    #[error("time slot {label:?} starts before {previous:?} ends")]
    OverlappingSlots { previous: String, label: String },
}

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error for generation runs.
#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("invalid input: {}", join(.0))]
    InvalidInput(Vec<InputError>),
}

impl From<InputError> for TimetableError {
    fn from(err: InputError) -> Self {
        Self::InvalidInput(vec![err])
    }
}

impl From<Vec<InputError>> for TimetableError {
    fn from(errors: Vec<InputError>) -> Self {
        Self::InvalidInput(errors)
    }
}

fn join(errors: &[InputError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, TimetableError>;

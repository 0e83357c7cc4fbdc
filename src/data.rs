use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InputError;

// Type aliases for clarity
pub type CourseId = u32;
pub type InstructorId = u32;
pub type ClassroomId = u32;
pub type DepartmentId = u32;
pub type TimetableId = u32;

/// A course to be placed on the weekly grid.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub credits: f64,
    pub capacity: u32,
    pub instructor_id: InstructorId,
    pub department_id: DepartmentId,
}

impl Course {
    /// Number of grid cells this course occupies per week.
    pub fn slots_needed(&self) -> usize {
        if self.credits >= 4.0 {
            3
        } else if self.credits >= 3.0 {
            2
        } else {
            1
        }
    }
}

/// A teacher; courses reference it by id.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Instructor {
    pub id: InstructorId,
    #[serde(default)]
    pub name: String,
}

/// A physical room with a seating capacity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Classroom {
    pub id: ClassroomId,
    pub capacity: u32,
    #[serde(default)]
    pub name: String,
}

/// Discriminant of a wire constraint record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    InstructorUnavailable,
    RoomUnavailable,
    CourseConflict,
}

/// Constraint record as stored by the persistence layer.
///
/// For `course_conflict` the `day` field is unused and `time_slot` holds the
/// second course id as a string. Convert with [`Constraint::try_from`] before
/// handing it to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintRecord {
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    pub entity_id: u32,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub time_slot: String,
}

/// A scheduling constraint, one variant per rule with only the fields it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    InstructorUnavailable {
        instructor_id: InstructorId,
        day: String,
        time_slot: String,
    },
    RoomUnavailable {
        classroom_id: ClassroomId,
        day: String,
        time_slot: String,
    },
    /// The two courses may never share a grid cell.
    CourseConflict {
        course_id: CourseId,
        conflicting_course_id: CourseId,
    },
}

impl Constraint {
    pub fn instructor_unavailable(
        instructor_id: InstructorId,
        day: impl Into<String>,
        time_slot: impl Into<String>,
    ) -> Self {
        Self::InstructorUnavailable {
            instructor_id,
            day: day.into(),
            time_slot: time_slot.into(),
        }
    }

    pub fn room_unavailable(
        classroom_id: ClassroomId,
        day: impl Into<String>,
        time_slot: impl Into<String>,
    ) -> Self {
        Self::RoomUnavailable {
            classroom_id,
            day: day.into(),
            time_slot: time_slot.into(),
        }
    }

    pub fn course_conflict(course_id: CourseId, conflicting_course_id: CourseId) -> Self {
        Self::CourseConflict {
            course_id,
            conflicting_course_id,
        }
    }
}

impl TryFrom<&ConstraintRecord> for Constraint {
    type Error = InputError;

    fn try_from(record: &ConstraintRecord) -> Result<Self, Self::Error> {
        Ok(match record.kind {
            ConstraintKind::InstructorUnavailable => {
                Self::instructor_unavailable(record.entity_id, &record.day, &record.time_slot)
            }
            ConstraintKind::RoomUnavailable => {
                Self::room_unavailable(record.entity_id, &record.day, &record.time_slot)
            }
            ConstraintKind::CourseConflict => {
                let raw = record.time_slot.trim();
                let other = raw
                    .parse::<CourseId>()
                    .map_err(|_| InputError::MalformedConflictId {
                        course_id: record.entity_id,
                        raw: record.time_slot.clone(),
                    })?;
                Self::course_conflict(record.entity_id, other)
            }
        })
    }
}

impl From<&Constraint> for ConstraintRecord {
    fn from(constraint: &Constraint) -> Self {
        match constraint {
            Constraint::InstructorUnavailable {
                instructor_id,
                day,
                time_slot,
            } => Self {
                kind: ConstraintKind::InstructorUnavailable,
                entity_id: *instructor_id,
                day: day.clone(),
                time_slot: time_slot.clone(),
            },
            Constraint::RoomUnavailable {
                classroom_id,
                day,
                time_slot,
            } => Self {
                kind: ConstraintKind::RoomUnavailable,
                entity_id: *classroom_id,
                day: day.clone(),
                time_slot: time_slot.clone(),
            },
            Constraint::CourseConflict {
                course_id,
                conflicting_course_id,
            } => Self {
                kind: ConstraintKind::CourseConflict,
                entity_id: *course_id,
                day: String::new(),
                time_slot: conflicting_course_id.to_string(),
            },
        }
    }
}

/// The complete input for one timetable generation run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableInput {
    pub courses: Vec<Course>,
    #[serde(default)]
    pub instructors: Vec<Instructor>,
    pub classrooms: Vec<Classroom>,
    #[serde(default)]
    pub constraints: Vec<ConstraintRecord>,
    #[serde(default)]
    pub timetable_id: TimetableId,
}

/// One output row. `id` stays 0 until the storage layer assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledClass {
    #[serde(default)]
    pub id: u64,
    pub course_id: CourseId,
    pub instructor_id: InstructorId,
    pub classroom_id: ClassroomId,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub timetable_id: TimetableId,
}

impl fmt::Display for ScheduledClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "course {} / instructor {} / room {} on {} {}-{}",
            self.course_id,
            self.instructor_id,
            self.classroom_id,
            self.day,
            self.start_time,
            self.end_time
        )
    }
}

/// Why a course ended up with a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No classroom is large enough.
    NoAdequateRoom,
    /// Fewer cells were placed than the course requires.
    UnderScheduled,
    /// The contiguous search hit its budget before finding a block.
    SearchBudgetExceeded,
}

/// A partial or failed placement, returned alongside the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub course_id: CourseId,
    pub course_code: String,
    pub slots_requested: usize,
    pub slots_achieved: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.kind {
            DiagnosticKind::NoAdequateRoom => "no classroom is large enough",
            DiagnosticKind::UnderScheduled => "not enough feasible cells",
            DiagnosticKind::SearchBudgetExceeded => "contiguous search budget exhausted",
        };
        write!(
            f,
            "[{}] {}/{} slots placed: {}",
            self.course_code, self.slots_achieved, self.slots_requested, reason
        )
    }
}

/// Why a well-formed constraint had no effect on the run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IgnoreReason {
    UnknownCourse(CourseId),
    UnknownInstructor(InstructorId),
    UnknownClassroom(ClassroomId),
    UnknownDay(String),
    UnknownTimeSlot(String),
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCourse(id) => write!(f, "course {id} is not part of this run"),
            Self::UnknownInstructor(id) => write!(f, "instructor {id} is not part of this run"),
            Self::UnknownClassroom(id) => write!(f, "classroom {id} is not part of this run"),
            Self::UnknownDay(day) => write!(f, "day {day:?} is not on the grid"),
            Self::UnknownTimeSlot(slot) => write!(f, "time slot {slot:?} is not on the grid"),
        }
    }
}

/// A constraint that refers to something outside this run and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoredConstraint {
    pub constraint: ConstraintRecord,
    pub reason: IgnoreReason,
}

impl IgnoredConstraint {
    pub fn new(constraint: &Constraint, reason: IgnoreReason) -> Self {
        Self {
            constraint: constraint.into(),
            reason,
        }
    }
}

/// The final output of the allocator.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableOutput {
    pub scheduled_classes: Vec<ScheduledClass>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(default)]
    pub ignored_constraints: Vec<IgnoredConstraint>,
}

impl TimetableOutput {
    /// Diagnostics reporting fewer slots than requested.
    pub fn under_scheduled(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.slots_achieved < d.slots_requested)
    }
}

//! Input validation for generation runs.
//!
//! Converts wire constraint records into typed [`Constraint`]s and checks
//! the entity lists for structural problems. All findings are collected so
//! the caller sees every problem at once. Constraints that merely point at
//! entities outside this run (a department's run fed the whole constraint
//! table, say) are not errors: they are set aside as [`IgnoredConstraint`]s.

use log::warn;
use std::collections::HashSet;

use crate::data::{Constraint, IgnoreReason, IgnoredConstraint, TimetableInput};
use crate::error::InputError;

/// Constraints that apply to this run, plus the ones skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedConstraints {
    pub constraints: Vec<Constraint>,
    pub ignored: Vec<IgnoredConstraint>,
}

/// Validates `input`, returning the typed constraints on success.
///
/// Errors:
/// 1. Duplicate course, instructor or classroom ids
/// 2. A course naming an unknown instructor (when instructors are supplied)
/// 3. A `course_conflict` record whose second id is not numeric
/// 4. A course declared to conflict with itself
///
/// Constraints naming a course, instructor or classroom not in the run are
/// ignored and reported.
pub fn validate_input(input: &TimetableInput) -> Result<ValidatedConstraints, Vec<InputError>> {
    let mut errors = Vec::new();

    let course_ids = unique_ids("course", input.courses.iter().map(|c| c.id), &mut errors);
    let instructor_ids = unique_ids(
        "instructor",
        input.instructors.iter().map(|i| i.id),
        &mut errors,
    );
    let classroom_ids = unique_ids(
        "classroom",
        input.classrooms.iter().map(|r| r.id),
        &mut errors,
    );

    // An empty instructor list means the caller only supplies ids on courses.
    let check_instructors = !input.instructors.is_empty();
    if check_instructors {
        for course in &input.courses {
            if !instructor_ids.contains(&course.instructor_id) {
                errors.push(InputError::UnknownInstructor {
                    course_id: course.id,
                    instructor_id: course.instructor_id,
                });
            }
        }
    }

    let mut validated = ValidatedConstraints::default();
    for record in &input.constraints {
        let constraint = match Constraint::try_from(record) {
            Ok(c) => c,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        let outside = match &constraint {
            Constraint::InstructorUnavailable { instructor_id, .. } => {
                let known = !check_instructors || instructor_ids.contains(instructor_id);
                (!known).then_some(IgnoreReason::UnknownInstructor(*instructor_id))
            }
            Constraint::RoomUnavailable { classroom_id, .. } => {
                let known = classroom_ids.contains(classroom_id);
                (!known).then_some(IgnoreReason::UnknownClassroom(*classroom_id))
            }
            Constraint::CourseConflict {
                course_id,
                conflicting_course_id,
            } => {
                if course_id == conflicting_course_id {
                    errors.push(InputError::SelfConflict(*course_id));
                    continue;
                }
                [course_id, conflicting_course_id]
                    .into_iter()
                    .find(|id| !course_ids.contains(*id))
                    .map(|id| IgnoreReason::UnknownCourse(*id))
            }
        };
        match outside {
            Some(reason) => {
                warn!("Ignoring {constraint:?}: {reason}");
                validated
                    .ignored
                    .push(IgnoredConstraint::new(&constraint, reason));
            }
            None => validated.constraints.push(constraint),
        }
    }

    if errors.is_empty() {
        Ok(validated)
    } else {
        Err(errors)
    }
}

fn unique_ids(
    entity: &'static str,
    ids: impl Iterator<Item = u32>,
    errors: &mut Vec<InputError>,
) -> HashSet<u32> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(InputError::DuplicateId { entity, id });
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Classroom, ConstraintKind, ConstraintRecord, Course, Instructor};

    fn course(id: u32, instructor_id: u32) -> Course {
        Course {
            id,
            code: format!("C{id}"),
            credits: 3.0,
            capacity: 10,
            instructor_id,
            department_id: 1,
        }
    }

    fn record(
        kind: ConstraintKind,
        entity_id: u32,
        day: &str,
        time_slot: &str,
    ) -> ConstraintRecord {
        ConstraintRecord {
            kind,
            entity_id,
            day: day.into(),
            time_slot: time_slot.into(),
        }
    }

    fn input() -> TimetableInput {
        TimetableInput {
            courses: vec![course(1, 1), course(2, 1)],
            instructors: vec![Instructor {
                id: 1,
                name: "Ada".into(),
            }],
            classrooms: vec![Classroom {
                id: 1,
                capacity: 30,
                name: "R1".into(),
            }],
            constraints: vec![],
            timetable_id: 1,
        }
    }

    #[test]
    fn test_valid_input_converts_records() {
        let mut input = input();
        input.constraints = vec![
            record(ConstraintKind::CourseConflict, 1, "", "2"),
            record(ConstraintKind::InstructorUnavailable, 1, "Monday", "08:00-09:00"),
        ];
        let validated = validate_input(&input).unwrap();
        assert_eq!(
            validated.constraints,
            vec![
                Constraint::course_conflict(1, 2),
                Constraint::instructor_unavailable(1, "Monday", "08:00-09:00"),
            ]
        );
        assert!(validated.ignored.is_empty());
    }

    #[test]
    fn test_malformed_conflict_id_rejected() {
        let mut input = input();
        input.constraints = vec![record(ConstraintKind::CourseConflict, 1, "Monday", "abc")];
        let errors = validate_input(&input).unwrap_err();
        assert_eq!(
            errors,
            vec![InputError::MalformedConflictId {
                course_id: 1,
                raw: "abc".into()
            }]
        );
    }

    #[test]
    fn test_all_findings_collected() {
        let mut input = input();
        input.courses.push(course(2, 9));
        input.constraints = vec![
            record(ConstraintKind::CourseConflict, 1, "", "1"),
            record(ConstraintKind::CourseConflict, 2, "", "x"),
        ];
        let errors = validate_input(&input).unwrap_err();
        assert_eq!(
            errors,
            vec![
                InputError::DuplicateId {
                    entity: "course",
                    id: 2
                },
                InputError::UnknownInstructor {
                    course_id: 2,
                    instructor_id: 9
                },
                InputError::SelfConflict(1),
                InputError::MalformedConflictId {
                    course_id: 2,
                    raw: "x".into()
                },
            ]
        );
    }

    #[test]
    fn test_references_outside_the_run_are_ignored() {
        let mut input = input();
        input.constraints = vec![
            record(ConstraintKind::CourseConflict, 1, "", "99"),
            record(ConstraintKind::RoomUnavailable, 7, "Monday", "08:00-09:00"),
            record(ConstraintKind::InstructorUnavailable, 5, "Monday", "08:00-09:00"),
            record(ConstraintKind::CourseConflict, 2, "", "1"),
        ];
        let validated = validate_input(&input).unwrap();
        assert_eq!(validated.constraints, vec![Constraint::course_conflict(2, 1)]);
        let reasons: Vec<_> = validated.ignored.iter().map(|i| i.reason.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                IgnoreReason::UnknownCourse(99),
                IgnoreReason::UnknownClassroom(7),
                IgnoreReason::UnknownInstructor(5),
            ]
        );
        assert_eq!(validated.ignored[0].constraint, input.constraints[0]);
    }

    #[test]
    fn test_instructor_list_optional() {
        let mut input = input();
        input.instructors.clear();
        input.courses.push(course(3, 77));
        input.constraints = vec![record(
            ConstraintKind::InstructorUnavailable,
            77,
            "Monday",
            "08:00-09:00",
        )];
        let validated = validate_input(&input).unwrap();
        assert_eq!(validated.constraints.len(), 1);
        assert!(validated.ignored.is_empty());
    }
}

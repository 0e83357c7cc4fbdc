//! Fast lookups over the constraint list.
//!
//! Built once per run from typed [`Constraint`]s. Unavailability labels are
//! resolved to grid [`Slot`]s here so the oracle only ever compares indices.

use log::{trace, warn};
use std::collections::{HashMap, HashSet};

use crate::data::{
    ClassroomId, Constraint, CourseId, IgnoreReason, IgnoredConstraint, InstructorId,
};
use crate::grid::{Slot, WeekGrid};

#[derive(Debug, Clone, Default)]
pub struct ConstraintIndex {
    instructor_unavailable: HashMap<InstructorId, HashSet<Slot>>,
    room_unavailable: HashMap<ClassroomId, HashSet<Slot>>,
    conflicts: HashMap<CourseId, HashSet<CourseId>>,
    ignored: Vec<IgnoredConstraint>,
}

impl ConstraintIndex {
    /// Indexes `constraints` against `grid`.
    ///
    /// Course conflicts are stored in both directions. Unavailability on a
    /// day or time slot the grid does not have can never bind, so it is
    /// skipped and listed in [`ConstraintIndex::ignored`].
    pub fn build(constraints: &[Constraint], grid: &WeekGrid) -> Self {
        let mut index = Self::default();

        for constraint in constraints {
            match constraint {
                Constraint::InstructorUnavailable {
                    instructor_id,
                    day,
                    time_slot,
                } => match resolve(grid, day, time_slot) {
                    Ok(slot) => {
                        index
                            .instructor_unavailable
                            .entry(*instructor_id)
                            .or_default()
                            .insert(slot);
                    }
                    Err(reason) => index.skip(constraint, reason),
                },
                Constraint::RoomUnavailable {
                    classroom_id,
                    day,
                    time_slot,
                } => match resolve(grid, day, time_slot) {
                    Ok(slot) => {
                        index
                            .room_unavailable
                            .entry(*classroom_id)
                            .or_default()
                            .insert(slot);
                    }
                    Err(reason) => index.skip(constraint, reason),
                },
                Constraint::CourseConflict {
                    course_id,
                    conflicting_course_id,
                } => {
                    index
                        .conflicts
                        .entry(*course_id)
                        .or_default()
                        .insert(*conflicting_course_id);
                    index
                        .conflicts
                        .entry(*conflicting_course_id)
                        .or_default()
                        .insert(*course_id);
                }
            }
        }

        trace!(
            "Indexed unavailability for {} instructors and {} rooms, conflicts for {} courses.",
            index.instructor_unavailable.len(),
            index.room_unavailable.len(),
            index.conflicts.len()
        );
        index
    }

    /// Constraints skipped because their day or time slot is off the grid.
    pub fn ignored(&self) -> &[IgnoredConstraint] {
        &self.ignored
    }

    fn skip(&mut self, constraint: &Constraint, reason: IgnoreReason) {
        warn!("Ignoring {constraint:?}: {reason}");
        self.ignored.push(IgnoredConstraint::new(constraint, reason));
    }

    pub fn instructor_unavailable(&self, instructor_id: InstructorId, slot: Slot) -> bool {
        self.instructor_unavailable
            .get(&instructor_id)
            .is_some_and(|slots| slots.contains(&slot))
    }

    pub fn room_unavailable(&self, classroom_id: ClassroomId, slot: Slot) -> bool {
        self.room_unavailable
            .get(&classroom_id)
            .is_some_and(|slots| slots.contains(&slot))
    }

    /// Number of distinct cells in which the instructor cannot teach.
    pub fn instructor_unavailable_count(&self, instructor_id: InstructorId) -> usize {
        self.instructor_unavailable
            .get(&instructor_id)
            .map_or(0, HashSet::len)
    }

    /// Courses that may never share a cell with `course_id`.
    pub fn conflicts_of(&self, course_id: CourseId) -> impl Iterator<Item = CourseId> + '_ {
        self.conflicts
            .get(&course_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn conflict_count(&self, course_id: CourseId) -> usize {
        self.conflicts.get(&course_id).map_or(0, HashSet::len)
    }

    pub fn in_conflict(&self, a: CourseId, b: CourseId) -> bool {
        self.conflicts.get(&a).is_some_and(|set| set.contains(&b))
    }
}

fn resolve(grid: &WeekGrid, day: &str, time_slot: &str) -> Result<Slot, IgnoreReason> {
    let day_idx = grid
        .day_index(day)
        .ok_or_else(|| IgnoreReason::UnknownDay(day.to_string()))?;
    let period = grid
        .period_index(time_slot)
        .ok_or_else(|| IgnoreReason::UnknownTimeSlot(time_slot.to_string()))?;
    Ok(Slot::new(day_idx, period))
}

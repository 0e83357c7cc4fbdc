//! Feasibility checks for a single candidate placement.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::data::{ClassroomId, Course, CourseId, InstructorId};
use crate::grid::Slot;
use crate::index::ConstraintIndex;

/// Run-local record of which cells are taken, per instructor, room and course.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    instructors: HashMap<InstructorId, HashSet<Slot>>,
    classrooms: HashMap<ClassroomId, HashSet<Slot>>,
    courses: HashMap<CourseId, HashSet<Slot>>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructor_busy(&self, instructor_id: InstructorId, slot: Slot) -> bool {
        occupied(&self.instructors, instructor_id, slot)
    }

    pub fn classroom_busy(&self, classroom_id: ClassroomId, slot: Slot) -> bool {
        occupied(&self.classrooms, classroom_id, slot)
    }

    pub fn course_busy(&self, course_id: CourseId, slot: Slot) -> bool {
        occupied(&self.courses, course_id, slot)
    }

    /// Marks `slot` as taken in all three maps.
    pub fn commit(&mut self, course: &Course, classroom_id: ClassroomId, slot: Slot) {
        self.instructors
            .entry(course.instructor_id)
            .or_default()
            .insert(slot);
        self.classrooms.entry(classroom_id).or_default().insert(slot);
        self.courses.entry(course.id).or_default().insert(slot);
    }

    pub fn course_slots(&self, course_id: CourseId) -> usize {
        self.courses.get(&course_id).map_or(0, HashSet::len)
    }
}

fn occupied<K: Hash + Eq>(map: &HashMap<K, HashSet<Slot>>, key: K, slot: Slot) -> bool {
    map.get(&key).is_some_and(|slots| slots.contains(&slot))
}

/// Whether `course` may be placed in `classroom_id` at `slot`.
///
/// Checks, stopping at the first failure: instructor unavailability,
/// instructor occupancy, room unavailability, room occupancy, then every
/// conflicting course's occupancy.
pub fn feasible(
    course: &Course,
    slot: Slot,
    classroom_id: ClassroomId,
    index: &ConstraintIndex,
    occupancy: &Occupancy,
) -> bool {
    if index.instructor_unavailable(course.instructor_id, slot) {
        return false;
    }
    if occupancy.instructor_busy(course.instructor_id, slot) {
        return false;
    }
    if index.room_unavailable(classroom_id, slot) {
        return false;
    }
    if occupancy.classroom_busy(classroom_id, slot) {
        return false;
    }
    !index
        .conflicts_of(course.id)
        .any(|other| occupancy.course_busy(other, slot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Constraint;
    use crate::grid::WeekGrid;

    fn course(id: CourseId, instructor_id: InstructorId) -> Course {
        Course {
            id,
            code: format!("C{id}"),
            credits: 3.0,
            capacity: 20,
            instructor_id,
            department_id: 1,
        }
    }

    fn grid() -> WeekGrid {
        WeekGrid::new(["Mon", "Tue"], ["08:00-09:00", "09:00-10:00"]).unwrap()
    }

    #[test]
    fn test_free_cell_is_feasible() {
        let index = ConstraintIndex::default();
        let occupancy = Occupancy::new();
        assert!(feasible(&course(1, 1), Slot::new(0, 0), 10, &index, &occupancy));
    }

    #[test]
    fn test_instructor_unavailability_blocks() {
        let index = ConstraintIndex::build(
            &[Constraint::instructor_unavailable(1, "Mon", "08:00-09:00")],
            &grid(),
        );
        let occupancy = Occupancy::new();
        assert!(!feasible(&course(1, 1), Slot::new(0, 0), 10, &index, &occupancy));
        assert!(feasible(&course(1, 1), Slot::new(0, 1), 10, &index, &occupancy));
        assert!(feasible(&course(2, 2), Slot::new(0, 0), 10, &index, &occupancy));
    }

    #[test]
    fn test_room_unavailability_blocks() {
        let index = ConstraintIndex::build(
            &[Constraint::room_unavailable(10, "Tue", "09:00-10:00")],
            &grid(),
        );
        let occupancy = Occupancy::new();
        assert!(!feasible(&course(1, 1), Slot::new(1, 1), 10, &index, &occupancy));
        assert!(feasible(&course(1, 1), Slot::new(1, 1), 11, &index, &occupancy));
    }

    #[test]
    fn test_occupancy_blocks_instructor_and_room() {
        let index = ConstraintIndex::default();
        let mut occupancy = Occupancy::new();
        occupancy.commit(&course(1, 1), 10, Slot::new(0, 0));

        // same instructor, other room
        assert!(!feasible(&course(2, 1), Slot::new(0, 0), 11, &index, &occupancy));
        // other instructor, same room
        assert!(!feasible(&course(3, 2), Slot::new(0, 0), 10, &index, &occupancy));
        // other instructor, other room
        assert!(feasible(&course(3, 2), Slot::new(0, 0), 11, &index, &occupancy));
        assert_eq!(occupancy.course_slots(1), 1);
    }

    #[test]
    fn test_conflicting_course_blocks_both_directions() {
        let index = ConstraintIndex::build(&[Constraint::course_conflict(1, 2)], &grid());

        let mut occupancy = Occupancy::new();
        occupancy.commit(&course(1, 1), 10, Slot::new(0, 0));
        assert!(!feasible(&course(2, 2), Slot::new(0, 0), 11, &index, &occupancy));
        assert!(feasible(&course(2, 2), Slot::new(0, 1), 11, &index, &occupancy));

        let mut occupancy = Occupancy::new();
        occupancy.commit(&course(2, 2), 11, Slot::new(1, 1));
        assert!(!feasible(&course(1, 1), Slot::new(1, 1), 10, &index, &occupancy));
    }
}

//! Most-constrained-first course ordering.

use itertools::Itertools;

use crate::data::Course;
use crate::index::ConstraintIndex;

/// Number of conflicting courses plus the instructor's unavailable cells.
pub fn constrainedness(course: &Course, index: &ConstraintIndex) -> usize {
    index.conflict_count(course.id) + index.instructor_unavailable_count(course.instructor_id)
}

/// Courses sorted by descending [`constrainedness`].
///
/// The sort is stable: equally constrained courses keep their input order.
pub fn order_courses<'a>(courses: &'a [Course], index: &ConstraintIndex) -> Vec<&'a Course> {
    courses
        .iter()
        .sorted_by_key(|c| std::cmp::Reverse(constrainedness(c, index)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Constraint;
    use crate::grid::WeekGrid;

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

    #[test]
    fn test_most_constrained_first() {
        let grid = WeekGrid::default();
        let index = ConstraintIndex::build(
            &[
                Constraint::course_conflict(3, 1),
                Constraint::course_conflict(3, 2),
                Constraint::instructor_unavailable(20, "Monday", "08:00-09:00"),
            ],
            &grid,
        );
        let courses = vec![course(1, 10), course(2, 20), course(3, 10), course(4, 30)];

        let scores: Vec<usize> = courses.iter().map(|c| constrainedness(c, &index)).collect();
        assert_eq!(scores, vec![1, 2, 2, 0]);

        let ids: Vec<u32> = order_courses(&courses, &index).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let index = ConstraintIndex::default();
        let courses = vec![course(9, 1), course(4, 1), course(7, 1)];
        let ids: Vec<u32> = order_courses(&courses, &index).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![9, 4, 7]);
    }
}

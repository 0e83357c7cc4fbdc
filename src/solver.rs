use crate::config::{RowLayout, SearchOptions};
use crate::data::{
    Classroom, Course, Diagnostic, DiagnosticKind, ScheduledClass, TimetableId, TimetableInput,
    TimetableOutput,
};
use crate::error::Result;
use crate::grid::{Slot, WeekGrid};
use crate::index::ConstraintIndex;
use crate::oracle::{Occupancy, feasible};
use crate::ordering::order_courses;
use crate::validation::validate_input;
use itertools::Itertools;
use log::{debug, info, trace, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// Builds a timetable with a greedy, randomized, most-constrained-first search.
///
/// Input is validated before anything is placed; validation failures are the
/// only error. Courses that cannot be fully placed are reported in the
/// output's diagnostics. The same `rng` state and input always produce the
/// same output.
pub fn generate<R: Rng + ?Sized>(
    input: &TimetableInput,
    grid: &WeekGrid,
    options: &SearchOptions,
    rng: &mut R,
) -> Result<TimetableOutput> {
    let start_time = Instant::now();
    info!(
        "Generating timetable {} with {} courses, {} classrooms, {} constraints on a {}x{} grid...",
        input.timetable_id,
        input.courses.len(),
        input.classrooms.len(),
        input.constraints.len(),
        grid.day_count(),
        grid.period_count()
    );

    let validated = validate_input(input)?;
    let index = ConstraintIndex::build(&validated.constraints, grid);
    let ordered = order_courses(&input.courses, &index);

    // smallest adequate room first
    let rooms_by_capacity: Vec<&Classroom> = input
        .classrooms
        .iter()
        .sorted_by_key(|r| r.capacity)
        .collect();

    let mut allocator = Allocator::new(grid, &index, options, input.timetable_id);
    for course in ordered {
        let rooms: Vec<&Classroom> = rooms_by_capacity
            .iter()
            .copied()
            .filter(|r| r.capacity >= course.capacity)
            .collect();
        allocator.place(course, &rooms, rng);
    }

    let mut output = allocator.finish();
    output.ignored_constraints = validated.ignored;
    output.ignored_constraints.extend_from_slice(index.ignored());
    info!(
        "Placed {} rows with {} diagnostics ({} constraints ignored) in {:.2?}",
        output.scheduled_classes.len(),
        output.diagnostics.len(),
        output.ignored_constraints.len(),
        start_time.elapsed()
    );
    Ok(output)
}

/// [`generate`] with a `ChaCha8Rng` seeded from `seed`.
pub fn generate_seeded(
    input: &TimetableInput,
    grid: &WeekGrid,
    options: &SearchOptions,
    seed: u64,
) -> Result<TimetableOutput> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(input, grid, options, &mut rng)
}

enum BlockSearch {
    Placed,
    NotFound,
    BudgetExceeded,
}

/// Per-run allocation state. Dropped when the run ends.
struct Allocator<'a> {
    grid: &'a WeekGrid,
    index: &'a ConstraintIndex,
    options: &'a SearchOptions,
    timetable_id: TimetableId,
    occupancy: Occupancy,
    rows: Vec<ScheduledClass>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Allocator<'a> {
    fn new(
        grid: &'a WeekGrid,
        index: &'a ConstraintIndex,
        options: &'a SearchOptions,
        timetable_id: TimetableId,
    ) -> Self {
        Self {
            grid,
            index,
            options,
            timetable_id,
            occupancy: Occupancy::new(),
            rows: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn finish(self) -> TimetableOutput {
        TimetableOutput {
            scheduled_classes: self.rows,
            diagnostics: self.diagnostics,
            ignored_constraints: Vec::new(),
        }
    }

    fn place<R: Rng + ?Sized>(&mut self, course: &Course, rooms: &[&Classroom], rng: &mut R) {
        let needed = course.slots_needed();

        if rooms.is_empty() {
            warn!(
                "Course {} needs capacity {} but no classroom is large enough.",
                course.code, course.capacity
            );
            self.report(course, DiagnosticKind::NoAdequateRoom, needed, 0);
            return;
        }

        let budget_exceeded = match self.place_block(course, rooms, needed, rng) {
            BlockSearch::Placed => return,
            BlockSearch::NotFound => false,
            BlockSearch::BudgetExceeded => {
                warn!(
                    "Contiguous search for {} stopped after {} feasibility checks.",
                    course.code, self.options.block_search_budget
                );
                true
            }
        };

        debug!("No contiguous block for {}, scattering {} slots.", course.code, needed);
        let achieved = self.place_scattered(course, rooms, needed, rng);

        if budget_exceeded {
            self.report(course, DiagnosticKind::SearchBudgetExceeded, needed, achieved);
        }
        if achieved < needed {
            warn!("Course {} under-scheduled: {}/{} slots.", course.code, achieved, needed);
            self.report(course, DiagnosticKind::UnderScheduled, needed, achieved);
        }
    }

    /// Tries every room, then shuffled days, then shuffled start periods.
    fn place_block<R: Rng + ?Sized>(
        &mut self,
        course: &Course,
        rooms: &[&Classroom],
        needed: usize,
        rng: &mut R,
    ) -> BlockSearch {
        let periods = self.grid.period_count();
        if needed > periods {
            return BlockSearch::NotFound;
        }

        let mut checks = 0usize;
        for room in rooms {
            let mut days: Vec<usize> = (0..self.grid.day_count()).collect();
            days.shuffle(rng);
            for day in days {
                let mut starts: Vec<usize> = (0..=periods - needed).collect();
                starts.shuffle(rng);
                for start in starts {
                    let mut fits = true;
                    for period in start..start + needed {
                        if checks >= self.options.block_search_budget {
                            return BlockSearch::BudgetExceeded;
                        }
                        checks += 1;
                        let slot = Slot::new(day, period);
                        if !feasible(course, slot, room.id, self.index, &self.occupancy) {
                            fits = false;
                            break;
                        }
                    }
                    if fits {
                        self.commit_block(course, room, day, start, needed);
                        return BlockSearch::Placed;
                    }
                }
            }
        }
        BlockSearch::NotFound
    }

    fn commit_block(
        &mut self,
        course: &Course,
        room: &Classroom,
        day: usize,
        start: usize,
        len: usize,
    ) {
        for period in start..start + len {
            self.occupancy.commit(course, room.id, Slot::new(day, period));
        }
        match self.options.row_layout {
            RowLayout::PerSlot => {
                for period in start..start + len {
                    self.emit(course, room, day, period, period);
                }
            }
            RowLayout::MergedBlock => self.emit(course, room, day, start, start + len - 1),
        }
        debug!(
            "Placed {} as a {}-slot block on {} from {} in room {}.",
            course.code,
            len,
            self.grid.day_label(day),
            self.grid.time_slot(start).start,
            room.id
        );
    }

    /// Places single cells anywhere in the week until `needed` are taken or
    /// the grid is exhausted. Returns the number placed.
    fn place_scattered<R: Rng + ?Sized>(
        &mut self,
        course: &Course,
        rooms: &[&Classroom],
        needed: usize,
        rng: &mut R,
    ) -> usize {
        let mut cells: Vec<Slot> = self.grid.slots().collect();
        cells.shuffle(rng);

        let mut achieved = 0;
        for slot in cells {
            if achieved == needed {
                break;
            }
            if self.occupancy.course_busy(course.id, slot) {
                continue;
            }
            let room = rooms
                .iter()
                .copied()
                .find(|r| feasible(course, slot, r.id, self.index, &self.occupancy));
            if let Some(room) = room {
                self.occupancy.commit(course, room.id, slot);
                self.emit(course, room, slot.day, slot.period, slot.period);
                achieved += 1;
                trace!(
                    "Scattered {} into {} {} in room {}.",
                    course.code,
                    self.grid.day_label(slot.day),
                    self.grid.time_slot(slot.period).label,
                    room.id
                );
            }
        }
        achieved
    }

    /// Emits one row spanning periods `first..=last` of `day`.
    fn emit(&mut self, course: &Course, room: &Classroom, day: usize, first: usize, last: usize) {
        self.rows.push(ScheduledClass {
            id: 0,
            course_id: course.id,
            instructor_id: course.instructor_id,
            classroom_id: room.id,
            day: self.grid.day_label(day).to_string(),
            start_time: self.grid.time_slot(first).start.clone(),
            end_time: self.grid.time_slot(last).end.clone(),
            timetable_id: self.timetable_id,
        });
    }

    fn report(&mut self, course: &Course, kind: DiagnosticKind, requested: usize, achieved: usize) {
        self.diagnostics.push(Diagnostic {
            kind,
            course_id: course.id,
            course_code: course.code.clone(),
            slots_requested: requested,
            slots_achieved: achieved,
        });
    }
}

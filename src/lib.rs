//! Weekly timetable generation for courses, instructors and classrooms.
//!
//! The engine places each course into one or more cells of a fixed
//! day × time-slot grid, honouring instructor and room unavailability and
//! pairwise course conflicts, and preferring the smallest adequate room.
//! It is a heuristic: courses that cannot be fully placed are reported as
//! [`data::Diagnostic`]s rather than failing the run.
//!
//! # Modules
//!
//! - **`data`**: input entities, wire constraint records, output rows
//! - **`grid`**: the weekly grid and `"HH:MM-HH:MM"` label parsing
//! - **`validation`**: input checks run before any placement
//! - **`index`**: constraint lookups (unavailability, symmetric conflicts)
//! - **`oracle`**: per-cell feasibility against constraints and occupancy
//! - **`ordering`**: most-constrained-first course order
//! - **`solver`**: the randomized block/scatter allocator
//! - **`audit`**: post-hoc instructor and classroom collision report
//! - **`config`**, **`server`**: JSON configuration and the HTTP surface
//!
//! # Example
//!
//! ```
//! use timetable_solver::audit::audit_conflicts;
//! use timetable_solver::config::SearchOptions;
//! use timetable_solver::data::{Classroom, Course, TimetableInput};
//! use timetable_solver::grid::WeekGrid;
//! use timetable_solver::solver::generate_seeded;
//!
//! let input = TimetableInput {
//!     courses: vec![Course {
//!         id: 1,
//!         code: "MATH201".into(),
//!         credits: 3.0,
//!         capacity: 40,
//!         instructor_id: 1,
//!         department_id: 1,
//!     }],
//!     classrooms: vec![Classroom { id: 1, capacity: 60, name: "A-101".into() }],
//!     ..Default::default()
//! };
//! let options = SearchOptions::default();
//! let output = generate_seeded(&input, &WeekGrid::default(), &options, 42).unwrap();
//! assert_eq!(output.scheduled_classes.len(), 2);
//! assert!(output.diagnostics.is_empty());
//! assert!(audit_conflicts(&output.scheduled_classes).is_clean());
//! ```

pub mod audit;
pub mod config;
pub mod data;
pub mod error;
pub mod grid;
pub mod index;
pub mod oracle;
pub mod ordering;
pub mod server;
pub mod solver;
pub mod validation;

pub use audit::{AuditMode, ConflictReport, audit_conflicts};
pub use error::{InputError, TimetableError};
pub use solver::{generate, generate_seeded};

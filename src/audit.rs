//! Post-hoc collision scan over a finished schedule.
//!
//! Works on any list of [`ScheduledClass`] rows, generated or edited by hand,
//! and never fails. In [`AuditMode::Exact`] rows collide only when their
//! `(day, start, end)` tuples are identical, so a two-hour block overlapping a
//! one-hour class is not reported. [`AuditMode::Overlap`] compares parsed
//! wall-clock intervals instead.

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::ScheduledClass;
use crate::grid::clock_minutes;

/// Stated in every report, since student conflicts are never computed.
pub const STUDENT_CONFLICTS_NOTE: &str =
    "student conflicts are not detected: enrollment data is not available to the auditor";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditMode {
    /// Group by identical `(day, start, end)`.
    #[default]
    Exact,
    /// Group rows on the same day whose intervals overlap.
    Overlap,
}

/// Rows that share one instructor or classroom at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictGroup {
    /// Instructor or classroom id, depending on the list it appears in.
    pub entity_id: u32,
    pub day: String,
    /// Earliest start among the rows.
    pub start_time: String,
    /// Latest end among the rows.
    pub end_time: String,
    pub rows: Vec<ScheduledClass>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub instructor_conflicts: Vec<ConflictGroup>,
    pub classroom_conflicts: Vec<ConflictGroup>,
    /// Always empty.
    pub student_conflicts: Vec<ConflictGroup>,
    pub notes: Vec<String>,
}

impl ConflictReport {
    pub fn is_clean(&self) -> bool {
        self.instructor_conflicts.is_empty() && self.classroom_conflicts.is_empty()
    }
}

pub fn audit_conflicts(rows: &[ScheduledClass]) -> ConflictReport {
    audit_conflicts_with(rows, AuditMode::Exact)
}

pub fn audit_conflicts_with(rows: &[ScheduledClass], mode: AuditMode) -> ConflictReport {
    let instructor_conflicts = collisions(rows, mode, |r| r.instructor_id);
    let classroom_conflicts = collisions(rows, mode, |r| r.classroom_id);
    debug!(
        "Audited {} rows ({:?}): {} instructor and {} classroom conflicts.",
        rows.len(),
        mode,
        instructor_conflicts.len(),
        classroom_conflicts.len()
    );
    ConflictReport {
        instructor_conflicts,
        classroom_conflicts,
        student_conflicts: Vec::new(),
        notes: vec![STUDENT_CONFLICTS_NOTE.to_string()],
    }
}

fn collisions<F>(rows: &[ScheduledClass], mode: AuditMode, entity: F) -> Vec<ConflictGroup>
where
    F: Fn(&ScheduledClass) -> u32,
{
    // sorted by (day, entity) for a stable report
    let by_entity: BTreeMap<(&str, u32), Vec<&ScheduledClass>> = rows
        .iter()
        .map(|r| ((r.day.as_str(), entity(r)), r))
        .into_group_map()
        .into_iter()
        .collect();

    let mut groups = Vec::new();
    for ((day, entity_id), rows) in by_entity {
        if rows.len() < 2 {
            continue;
        }
        let clusters = match mode {
            AuditMode::Exact => exact_clusters(rows),
            AuditMode::Overlap => overlap_clusters(rows),
        };
        groups.extend(
            clusters
                .into_iter()
                .filter(|c| c.len() > 1)
                .map(|c| group(entity_id, day, c)),
        );
    }
    groups.sort_by(|a, b| {
        (&a.day, &a.start_time, &a.end_time, a.entity_id)
            .cmp(&(&b.day, &b.start_time, &b.end_time, b.entity_id))
    });
    groups
}

fn exact_clusters(rows: Vec<&ScheduledClass>) -> Vec<Vec<&ScheduledClass>> {
    rows.into_iter()
        .map(|r| ((r.start_time.as_str(), r.end_time.as_str()), r))
        .into_group_map()
        .into_values()
        .collect()
}

/// Sweeps rows by start time, merging any that overlap the running cluster.
/// Rows with unparsable times are grouped exactly.
fn overlap_clusters(rows: Vec<&ScheduledClass>) -> Vec<Vec<&ScheduledClass>> {
    let (mut timed, untimed): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .map(|r| (interval(r), r))
        .partition(|(span, _)| span.is_some());
    timed.sort_by_key(|(span, _)| *span);

    let mut clusters: Vec<Vec<&ScheduledClass>> = Vec::new();
    let mut cluster_end = 0;
    for (span, row) in timed {
        let Some((start, end)) = span else { continue };
        if start < cluster_end {
            if let Some(current) = clusters.last_mut() {
                current.push(row);
                cluster_end = cluster_end.max(end);
                continue;
            }
        }
        clusters.push(vec![row]);
        cluster_end = end;
    }

    clusters.extend(exact_clusters(untimed.into_iter().map(|(_, r)| r).collect()));
    clusters
}

fn interval(row: &ScheduledClass) -> Option<(u32, u32)> {
    let start = clock_minutes(&row.start_time)?;
    let end = clock_minutes(&row.end_time)?;
    (start < end).then_some((start, end))
}

fn group(entity_id: u32, day: &str, mut rows: Vec<&ScheduledClass>) -> ConflictGroup {
    rows.sort_by(|a, b| {
        (&a.start_time, a.course_id, a.classroom_id).cmp(&(
            &b.start_time,
            b.course_id,
            b.classroom_id,
        ))
    });
    let start_time = rows
        .iter()
        .map(|r| r.start_time.as_str())
        .min_by_key(|t| (clock_minutes(t), *t))
        .unwrap_or_default()
        .to_string();
    let end_time = rows
        .iter()
        .map(|r| r.end_time.as_str())
        .max_by_key(|t| (clock_minutes(t), *t))
        .unwrap_or_default()
        .to_string();
    ConflictGroup {
        entity_id,
        day: day.to_string(),
        start_time,
        end_time,
        rows: rows.into_iter().cloned().collect(),
    }
}

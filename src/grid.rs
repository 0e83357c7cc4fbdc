//! The fixed weekly grid: ordered day labels crossed with ordered time slots.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::GridError;

/// One grid cell, addressed by indices into the grid's enumerations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub day: usize,
    pub period: usize,
}

impl Slot {
    pub fn new(day: usize, period: usize) -> Self {
        Self { day, period }
    }
}

/// A time-slot label split into its wall-clock bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub label: String,
    pub start: String,
    pub end: String,
}

impl TimeSlot {
    /// Parses `"HH:MM-HH:MM"` by splitting on `-` and trimming each side.
    pub fn parse(label: &str) -> Result<Self, GridError> {
        let (start, end) = label
            .split_once('-')
            .map(|(s, e)| (s.trim(), e.trim()))
            .filter(|(s, e)| !s.is_empty() && !e.is_empty() && !e.contains('-'))
            .ok_or_else(|| GridError::MalformedLabel(label.to_string()))?;
        Ok(Self {
            label: label.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        })
    }
}

/// Minutes since midnight for an `HH:MM` string.
pub fn clock_minutes(value: &str) -> Option<u32> {
    let (h, m) = value.trim().split_once(':')?;
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    (h < 24 && m < 60).then_some(h * 60 + m)
}

/// Serialized as `{ "days": [...], "timeSlots": [...] }` with raw labels.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLabels {
    days: Vec<String>,
    time_slots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "GridLabels", into = "GridLabels")]
pub struct WeekGrid {
    days: Vec<String>,
    time_slots: Vec<TimeSlot>,
}

impl WeekGrid {
    pub fn new<D, T>(days: D, time_slots: T) -> Result<Self, GridError>
    where
        D: IntoIterator,
        D::Item: Into<String>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let days: Vec<String> = days.into_iter().map(Into::into).collect();
        let time_slots = time_slots
            .into_iter()
            .map(|label| TimeSlot::parse(label.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if days.is_empty() {
            return Err(GridError::NoDays);
        }
        if time_slots.is_empty() {
            return Err(GridError::NoTimeSlots);
        }
        let mut seen = HashSet::new();
        if let Some(day) = days.iter().find(|d| !seen.insert(d.as_str())) {
            return Err(GridError::DuplicateLabel {
                kind: "day",
                label: day.clone(),
            });
        }

        // periods must be well-formed intervals in strictly ascending order
        let mut previous: Option<(&TimeSlot, u32)> = None;
        for slot in &time_slots {
            let (start, end) = match (clock_minutes(&slot.start), clock_minutes(&slot.end)) {
                (Some(start), Some(end)) => (start, end),
                _ => return Err(GridError::MalformedLabel(slot.label.clone())),
            };
            if start >= end {
                return Err(GridError::EmptyInterval(slot.label.clone()));
            }
            if let Some((prev, prev_end)) = previous {
                if start < prev_end {
                    return Err(GridError::OverlappingSlots {
                        previous: prev.label.clone(),
                        label: slot.label.clone(),
                    });
                }
            }
            previous = Some((slot, end));
        }

        Ok(Self { days, time_slots })
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn period_count(&self) -> usize {
        self.time_slots.len()
    }

    pub fn day_label(&self, day: usize) -> &str {
        &self.days[day]
    }

    pub fn time_slot(&self, period: usize) -> &TimeSlot {
        &self.time_slots[period]
    }

    pub fn day_index(&self, label: &str) -> Option<usize> {
        let label = label.trim();
        self.days.iter().position(|d| d == label)
    }

    /// Finds a period by label; whitespace around the `-` is not significant.
    pub fn period_index(&self, label: &str) -> Option<usize> {
        let wanted = TimeSlot::parse(label).ok()?;
        self.time_slots
            .iter()
            .position(|t| t.start == wanted.start && t.end == wanted.end)
    }

    /// Every cell of the grid, day-major.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        (0..self.day_count())
            .flat_map(move |day| (0..self.period_count()).map(move |period| Slot::new(day, period)))
    }

    pub fn cell_count(&self) -> usize {
        self.day_count() * self.period_count()
    }
}

impl Default for WeekGrid {
    /// Monday to Friday, eight hourly periods from 08:00 to 16:00.
    fn default() -> Self {
        let days = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
            .into_iter()
            .map(String::from)
            .collect();
        let time_slots = (8..16)
            .map(|h| TimeSlot {
                label: format!("{h:02}:00-{:02}:00", h + 1),
                start: format!("{h:02}:00"),
                end: format!("{:02}:00", h + 1),
            })
            .collect();
        Self { days, time_slots }
    }
}

impl TryFrom<GridLabels> for WeekGrid {
    type Error = GridError;

    fn try_from(labels: GridLabels) -> Result<Self, Self::Error> {
        Self::new(labels.days, labels.time_slots)
    }
}

impl From<WeekGrid> for GridLabels {
    fn from(grid: WeekGrid) -> Self {
        Self {
            days: grid.days,
            time_slots: grid.time_slots.into_iter().map(|t| t.label).collect(),
        }
    }
}

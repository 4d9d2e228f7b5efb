use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Start instant of a bookable slot, carrying the civil-day offset it was generated with.
///
/// Equality, ordering and hashing follow the absolute instant, so an appointment stored as
/// `13:00Z` matches a slot generated as `10:00-03:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotInstant(DateTime<FixedOffset>);

impl SlotInstant {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self(instant)
    }

    pub fn as_datetime(&self) -> DateTime<FixedOffset> {
        self.0
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }
}

impl From<DateTime<FixedOffset>> for SlotInstant {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        Self(instant)
    }
}

impl From<DateTime<Utc>> for SlotInstant {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant.fixed_offset())
    }
}

impl fmt::Display for SlotInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Working hours of a practitioner on one calendar date, in the clinic's local time.
/// `start` is inclusive and `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWindow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WorkWindow {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self { date, start, end }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// Absolute bounds of a [`WorkWindow`] once the civil-day offset has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Row shape returned by the appointments table for an occupied-slot lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupiedAppointment {
    pub scheduled_start_time: DateTime<FixedOffset>,
}

impl From<OccupiedAppointment> for SlotInstant {
    fn from(appointment: OccupiedAppointment) -> Self {
        Self(appointment.scheduled_start_time)
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::AvailabilityError;
use crate::models::{SlotInstant, WindowBounds, WorkWindow};
use crate::services::occupied::OccupiedSlotsProvider;

/// Width of a bookable slot.
pub const SLOT_MINUTES: i64 = 15;

/// Computes bookable slot start instants for a practitioner on one calendar date.
///
/// The calculator holds no mutable state; the occupied-slot provider is its only collaborator
/// and is read exactly once per computation.
#[derive(Clone)]
pub struct SlotCalculator {
    timezone: Tz,
    provider: Arc<dyn OccupiedSlotsProvider>,
}

impl SlotCalculator {
    pub fn new(timezone: Tz, provider: Arc<dyn OccupiedSlotsProvider>) -> Self {
        Self { timezone, provider }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Available slot starts for `practitioner_id` within `window`, in chronological order.
    ///
    /// A failed occupied-slot read aborts the computation; no partial list is returned.
    pub async fn compute_available_slots(
        &self,
        practitioner_id: &str,
        window: &WorkWindow,
    ) -> Result<Vec<SlotInstant>, AvailabilityError> {
        let bounds = window_bounds(self.timezone, window)?;

        debug!(
            "Computing slots for practitioner {} on {} between {} and {}",
            practitioner_id, window.date, bounds.start, bounds.end
        );

        let occupied = self
            .provider
            .find_occupied_instants(practitioner_id, bounds.start, bounds.end)
            .await?;

        let slots = available_slots(&bounds, &occupied);

        debug!(
            "Practitioner {} has {} available slots on {} ({} occupied)",
            practitioner_id,
            slots.len(),
            window.date,
            occupied.len()
        );

        Ok(slots)
    }
}

/// UTC offset of `timezone` at the start of the civil day `date`.
///
/// When a transition removes local midnight, the first local time that exists that day decides
/// the offset. The result is reused for every slot of the day.
pub fn civil_day_offset(timezone: Tz, date: NaiveDate) -> FixedOffset {
    let midnight = date.and_time(NaiveTime::MIN);
    let mut local = midnight;

    while local.date() == date {
        if let Some(start_of_day) = timezone.from_local_datetime(&local).earliest() {
            return start_of_day.offset().fix();
        }
        local = match local.checked_add_signed(Duration::minutes(SLOT_MINUTES)) {
            Some(next) => next,
            None => break,
        };
    }

    timezone.offset_from_utc_datetime(&midnight).fix()
}

/// Absolute start and end of `window` using the civil-day offset of its date.
///
/// Dates at the edge of the representable range can have no absolute instant; those are
/// rejected as invalid input.
pub fn window_bounds(timezone: Tz, window: &WorkWindow) -> Result<WindowBounds, AvailabilityError> {
    let offset = civil_day_offset(timezone, window.date);

    let start = at_offset(window.date.and_time(window.start), offset);
    let end = at_offset(window.date.and_time(window.end), offset);

    match (start, end) {
        (Some(start), Some(end)) => Ok(WindowBounds { start, end }),
        _ => Err(AvailabilityError::InvalidInput(format!(
            "Date {} is outside the supported range",
            window.date
        ))),
    }
}

fn at_offset(local: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let utc = local.checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))?;
    Some(DateTime::from_naive_utc_and_offset(utc, offset))
}

/// Every slot start from `bounds.start` in fixed steps, strictly before `bounds.end`.
pub fn candidate_slots(bounds: &WindowBounds) -> Vec<SlotInstant> {
    let step = Duration::minutes(SLOT_MINUTES);
    let mut candidates = Vec::new();
    let mut current = bounds.start;

    while current < bounds.end {
        candidates.push(SlotInstant::new(current));
        current = match current.checked_add_signed(step) {
            Some(next) => next,
            None => break,
        };
    }

    candidates
}

/// Candidates of `bounds` that do not coincide with an occupied instant.
///
/// Occupied instants outside the window or off the slot grid never match and are ignored.
pub fn available_slots(bounds: &WindowBounds, occupied: &[SlotInstant]) -> Vec<SlotInstant> {
    let occupied: HashSet<&SlotInstant> = occupied.iter().collect();

    candidate_slots(bounds)
        .into_iter()
        .filter(|candidate| !occupied.contains(candidate))
        .collect()
}

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
#[cfg(test)]
use mockall::automock;
use reqwest::Method;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::error::AvailabilityError;
use crate::models::{OccupiedAppointment, SlotInstant};

/// Read access to slots already taken by persisted bookings.
///
/// Implementations return every booked start instant for `practitioner_id` within the closed
/// interval `[window_start, window_end]`. Cancelled appointments are not occupied.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OccupiedSlotsProvider: Send + Sync {
    async fn find_occupied_instants(
        &self,
        practitioner_id: &str,
        window_start: DateTime<FixedOffset>,
        window_end: DateTime<FixedOffset>,
    ) -> Result<Vec<SlotInstant>, AvailabilityError>;
}

/// Looks up occupied slots in the `appointments` table through PostgREST.
pub struct SupabaseOccupiedSlots {
    supabase: SupabaseClient,
}

impl SupabaseOccupiedSlots {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    fn occupied_path(
        practitioner_id: &str,
        window_start: DateTime<FixedOffset>,
        window_end: DateTime<FixedOffset>,
    ) -> String {
        // Zulu form keeps '+' out of the query string.
        let start = window_start.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true);
        let end = window_end.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true);

        format!(
            "/rest/v1/appointments?select=scheduled_start_time&doctor_id=eq.{}&scheduled_start_time=gte.{}&scheduled_start_time=lte.{}&status=neq.cancelled&order=scheduled_start_time.asc",
            practitioner_id, start, end
        )
    }
}

#[async_trait]
impl OccupiedSlotsProvider for SupabaseOccupiedSlots {
    async fn find_occupied_instants(
        &self,
        practitioner_id: &str,
        window_start: DateTime<FixedOffset>,
        window_end: DateTime<FixedOffset>,
    ) -> Result<Vec<SlotInstant>, AvailabilityError> {
        let path = Self::occupied_path(practitioner_id, window_start, window_end);

        let rows: Vec<OccupiedAppointment> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| {
                error!("Occupied slot lookup failed for practitioner {}: {}", practitioner_id, e);
                AvailabilityError::OccupiedRead(e)
            })?;

        debug!("Practitioner {} has {} occupied slots in window", practitioner_id, rows.len());

        Ok(rows.into_iter().map(SlotInstant::from).collect())
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::{parse_time_of_day, AppConfig};
use shared_models::error::AppError;

use crate::error::AvailabilityError;
use crate::models::WorkWindow;
use crate::services::calculator::{SlotCalculator, SLOT_MINUTES};
use crate::services::occupied::SupabaseOccupiedSlots;

#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    pub date: NaiveDate,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppConfig>>,
    Path(practitioner_id): Path<String>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Value>, AppError> {
    validate_practitioner_id(&practitioner_id)?;
    let window = resolve_window(&state, &query)?;

    debug!("Available slots requested for practitioner {} on {}", practitioner_id, window.date);

    let provider = SupabaseOccupiedSlots::new(&state);
    let calculator = SlotCalculator::new(state.clinic_timezone, Arc::new(provider));

    let slots = calculator.compute_available_slots(&practitioner_id, &window).await?;

    Ok(Json(json!({
        "practitioner_id": practitioner_id,
        "date": window.date,
        "timezone": calculator.timezone().name(),
        "work_start": window.start.format("%H:%M").to_string(),
        "work_end": window.end.format("%H:%M").to_string(),
        "slot_minutes": SLOT_MINUTES,
        "available_slots": slots,
        "total_slots": slots.len()
    })))
}

/// Ids end up inside a PostgREST filter, so only plain identifier characters are accepted.
fn validate_practitioner_id(practitioner_id: &str) -> Result<(), AvailabilityError> {
    if practitioner_id.trim().is_empty() {
        return Err(AvailabilityError::InvalidInput("Practitioner id is required".to_string()));
    }

    if !practitioner_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AvailabilityError::InvalidInput(format!(
            "Practitioner id '{}' contains invalid characters",
            practitioner_id
        )));
    }

    Ok(())
}

fn resolve_window(config: &AppConfig, query: &AvailableSlotsQuery) -> Result<WorkWindow, AvailabilityError> {
    let start = parse_override("start", query.start.as_deref(), config.default_work_start)?;
    let end = parse_override("end", query.end.as_deref(), config.default_work_end)?;

    let window = WorkWindow::new(query.date, start, end);
    if window.is_inverted() {
        return Err(AvailabilityError::InvalidWindow { start, end });
    }

    Ok(window)
}

fn parse_override(
    field: &str,
    value: Option<&str>,
    default: NaiveTime,
) -> Result<NaiveTime, AvailabilityError> {
    match value {
        None => Ok(default),
        Some(raw) => parse_time_of_day(raw).ok_or_else(|| {
            AvailabilityError::InvalidInput(format!("'{}' is not a valid {} time (expected HH:MM)", raw, field))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config() -> AppConfig {
        AppConfig {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "anon".to_string(),
            clinic_timezone: chrono_tz::America::Argentina::Buenos_Aires,
            default_work_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            default_work_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            port: 3000,
        }
    }

    fn query(start: Option<&str>, end: Option<&str>) -> AvailableSlotsQuery {
        AvailableSlotsQuery {
            date: NaiveDate::from_ymd_opt(2025, 9, 15).unwrap(),
            start: start.map(str::to_string),
            end: end.map(str::to_string),
        }
    }

    #[test]
    fn test_window_defaults_to_config() {
        let window = resolve_window(&config(), &query(None, None)).unwrap();
        assert_eq!(window.start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(window.end, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn test_window_override() {
        let window = resolve_window(&config(), &query(Some("09:30"), Some("12:00:00"))).unwrap();
        assert_eq!(window.start, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(window.end, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let result = resolve_window(&config(), &query(Some("18:00"), Some("08:00")));
        assert_matches!(result, Err(AvailabilityError::InvalidWindow { .. }));
    }

    #[test]
    fn test_equal_bounds_are_accepted() {
        let window = resolve_window(&config(), &query(Some("10:00"), Some("10:00"))).unwrap();
        assert!(!window.is_inverted());
    }

    #[test]
    fn test_malformed_time_is_rejected() {
        let result = resolve_window(&config(), &query(Some("9am"), None));
        assert_matches!(result, Err(AvailabilityError::InvalidInput(_)));
    }

    #[test]
    fn test_practitioner_id_validation() {
        assert!(validate_practitioner_id("7f1c2a9e-4b1d-4c55-9d0e-1a2b3c4d5e6f").is_ok());
        assert!(validate_practitioner_id("doc_42").is_ok());
        assert_matches!(validate_practitioner_id("  "), Err(AvailabilityError::InvalidInput(_)));
        assert_matches!(
            validate_practitioner_id("doc&status=eq.cancelled"),
            Err(AvailabilityError::InvalidInput(_))
        );
    }
}

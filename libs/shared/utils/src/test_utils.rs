use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveTime, SecondsFormat};
use chrono_tz::Tz;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::{AppConfig, DEFAULT_PORT, DEFAULT_TIMEZONE};

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub clinic_timezone: Tz,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            clinic_timezone: DEFAULT_TIMEZONE,
            work_start: NaiveTime::from_hms_opt(8, 0, 0).expect("valid time"),
            work_end: NaiveTime::from_hms_opt(18, 0, 0).expect("valid time"),
        }
    }
}

impl TestConfig {
    /// Point the config at a mock Supabase server.
    pub fn with_supabase_url(url: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            clinic_timezone: self.clinic_timezone,
            default_work_start: self.work_start,
            default_work_end: self.work_end,
            port: DEFAULT_PORT,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    /// Appointment row as PostgREST returns it for `select=scheduled_start_time`.
    pub fn occupied_row(scheduled_start_time: DateTime<FixedOffset>) -> Value {
        json!({
            "scheduled_start_time": scheduled_start_time.to_rfc3339_opts(SecondsFormat::Secs, false)
        })
    }

    pub fn occupied_rows(instants: &[DateTime<FixedOffset>]) -> Value {
        Value::Array(instants.iter().copied().map(Self::occupied_row).collect())
    }

    /// Full appointment row, including columns the slot lookup does not select.
    pub fn appointment_response(doctor_id: &str, scheduled_start_time: &str, status: &str) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "patient_id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "scheduled_start_time": scheduled_start_time,
            "duration_minutes": 15,
            "status": status,
            "created_at": "2025-09-01T00:00:00+00:00",
            "updated_at": "2025-09-01T00:00:00+00:00"
        })
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "message": message,
            "code": code,
            "details": null,
            "hint": null
        })
    }
}

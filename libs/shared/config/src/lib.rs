use std::env;

use chrono::NaiveTime;
use chrono_tz::Tz;
use tracing::warn;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Argentina::Buenos_Aires;
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub clinic_timezone: Tz,
    pub default_work_start: NaiveTime,
    pub default_work_end: NaiveTime,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            clinic_timezone: env::var("CLINIC_TIMEZONE")
                .ok()
                .and_then(|value| match value.parse::<Tz>() {
                    Ok(tz) => Some(tz),
                    Err(e) => {
                        warn!("CLINIC_TIMEZONE '{}' is invalid ({}), using default", value, e);
                        None
                    }
                })
                .unwrap_or(DEFAULT_TIMEZONE),
            default_work_start: time_from_env("DEFAULT_WORK_START", default_work_start()),
            default_work_end: time_from_env("DEFAULT_WORK_END", default_work_end()),
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        if config.default_work_start > config.default_work_end {
            warn!(
                "Default work window {} - {} is inverted, requests without overrides will be rejected",
                config.default_work_start, config.default_work_end
            );
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
    }
}

/// Parses a local time of day written as `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

fn default_work_start() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_work_end() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn time_from_env(key: &str, default: NaiveTime) -> NaiveTime {
    match env::var(key) {
        Ok(value) => parse_time_of_day(&value).unwrap_or_else(|| {
            warn!("{} '{}' is not a valid HH:MM time, using {}", key, value, default);
            default
        }),
        Err(_) => default,
    }
}

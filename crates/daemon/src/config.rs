//! Daemon settings
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file named by `UPKEEP_CONFIG`, then `UPKEEP_*` environment variables.

use chrono::NaiveTime;
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use upkeep_core::application::trigger::constants::DEFAULT_STARTUP_DELAY;
use upkeep_core::domain::parse_time_of_day;
use upkeep_core::error::AppError;
use upkeep_infra_notify::DEFAULT_API_URL;

const ENV_PREFIX: &str = "UPKEEP";
const CONFIG_FILE_VAR: &str = "UPKEEP_CONFIG";

const DEFAULT_DB_PATH: &str = "~/.upkeep/upkeep.db";
const DEFAULT_REPORT_DIR: &str = "~/.upkeep/reports";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub api_url: String,
}

/// Validated daemon settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: String,
    pub environment: String,
    pub timezone: Tz,
    pub reminder_time: NaiveTime,
    pub audit_time: NaiveTime,
    pub startup_delay: Duration,
    pub notify_concurrency: usize,
    pub notify_timeout: Duration,
    /// `None` means deliveries are only logged
    pub telegram: Option<TelegramSettings>,
    pub report_dir: PathBuf,
    pub log_format: LogFormat,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    db_path: String,
    environment: String,
    timezone: String,
    reminder_time: String,
    audit_time: String,
    startup_delay_secs: u64,
    notify_concurrency: usize,
    notify_timeout_secs: u64,
    telegram_bot_token: Option<String>,
    telegram_api_url: String,
    report_dir: String,
    log_format: String,
}

impl Settings {
    /// Load from the process environment
    pub fn load() -> Result<Self, AppError> {
        let file = std::env::var(CONFIG_FILE_VAR).ok();
        Self::from_sources(file.as_deref(), Environment::with_prefix(ENV_PREFIX))
    }

    pub(crate) fn from_sources(file: Option<&str>, env: Environment) -> Result<Self, AppError> {
        let mut builder = Config::builder()
            .set_default("db_path", DEFAULT_DB_PATH)
            .and_then(|b| b.set_default("environment", "development"))
            .and_then(|b| b.set_default("timezone", "UTC"))
            .and_then(|b| b.set_default("reminder_time", "06:00"))
            .and_then(|b| b.set_default("audit_time", "06:30"))
            .and_then(|b| {
                b.set_default("startup_delay_secs", DEFAULT_STARTUP_DELAY.as_secs() as i64)
            })
            .and_then(|b| b.set_default("notify_concurrency", 4))
            .and_then(|b| b.set_default("notify_timeout_secs", 10))
            .and_then(|b| b.set_default("telegram_api_url", DEFAULT_API_URL))
            .and_then(|b| b.set_default("report_dir", DEFAULT_REPORT_DIR))
            .and_then(|b| b.set_default("log_format", "pretty"))
            .map_err(config_error)?;

        if let Some(path) = file {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        let raw: RawSettings = builder
            .add_source(env)
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)?;

        raw.validate()
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// sqlx connection URL for `db_path`
    pub fn database_url(&self) -> String {
        if self.db_path.starts_with("sqlite:") {
            self.db_path.clone()
        } else {
            format!("sqlite://{}", self.db_path)
        }
    }
}

impl RawSettings {
    fn validate(self) -> Result<Settings, AppError> {
        let timezone: Tz = self
            .timezone
            .parse()
            .map_err(|_| AppError::Config(format!("unknown timezone: {}", self.timezone)))?;
        let reminder_time = parse_trigger_time("reminder_time", &self.reminder_time)?;
        let audit_time = parse_trigger_time("audit_time", &self.audit_time)?;

        let log_format = match self.log_format.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            other => return Err(AppError::Config(format!("unknown log_format: {other}"))),
        };

        let telegram = self
            .telegram_bot_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .map(|bot_token| TelegramSettings {
                bot_token,
                api_url: self.telegram_api_url.clone(),
            });

        Ok(Settings {
            db_path: shellexpand::tilde(&self.db_path).into_owned(),
            environment: self.environment,
            timezone,
            reminder_time,
            audit_time,
            startup_delay: Duration::from_secs(self.startup_delay_secs),
            notify_concurrency: self.notify_concurrency.max(1),
            notify_timeout: Duration::from_secs(self.notify_timeout_secs),
            telegram,
            report_dir: PathBuf::from(shellexpand::tilde(&self.report_dir).into_owned()),
            log_format,
        })
    }
}

fn parse_trigger_time(key: &str, value: &str) -> Result<NaiveTime, AppError> {
    parse_time_of_day(value).map_err(|_| AppError::Config(format!("{key} is not HH:MM: {value}")))
}

fn config_error(e: config::ConfigError) -> AppError {
    AppError::Config(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_sources(None, env(&[])).unwrap();

        assert_eq!(settings.timezone, Tz::UTC);
        assert_eq!(settings.reminder_time, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(settings.audit_time, NaiveTime::from_hms_opt(6, 30, 0).unwrap());
        assert_eq!(settings.startup_delay, Duration::from_secs(10));
        assert_eq!(settings.notify_concurrency, 4);
        assert_eq!(settings.log_format, LogFormat::Pretty);
        assert!(settings.telegram.is_none());
        assert!(!settings.is_production());
        assert!(!settings.db_path.starts_with('~'));
    }

    #[test]
    fn test_environment_overrides() {
        let settings = Settings::from_sources(
            None,
            env(&[
                ("UPKEEP_ENVIRONMENT", "production"),
                ("UPKEEP_TIMEZONE", "Asia/Jakarta"),
                ("UPKEEP_REMINDER_TIME", "07:15"),
                ("UPKEEP_NOTIFY_CONCURRENCY", "8"),
                ("UPKEEP_TELEGRAM_BOT_TOKEN", "123:abc"),
                ("UPKEEP_LOG_FORMAT", "json"),
            ]),
        )
        .unwrap();

        assert!(settings.is_production());
        assert_eq!(settings.timezone, chrono_tz::Asia::Jakarta);
        assert_eq!(settings.reminder_time, NaiveTime::from_hms_opt(7, 15, 0).unwrap());
        assert_eq!(settings.notify_concurrency, 8);
        assert_eq!(settings.log_format, LogFormat::Json);
        let telegram = settings.telegram.unwrap();
        assert_eq!(telegram.bot_token, "123:abc");
        assert_eq!(telegram.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_invalid_time_is_config_error() {
        let err = Settings::from_sources(None, env(&[("UPKEEP_AUDIT_TIME", "25:99")])).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("audit_time")));
    }

    #[test]
    fn test_unknown_timezone_is_config_error() {
        let err = Settings::from_sources(None, env(&[("UPKEEP_TIMEZONE", "Mars/Olympus")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_blank_token_falls_back_to_log_notifier() {
        let settings =
            Settings::from_sources(None, env(&[("UPKEEP_TELEGRAM_BOT_TOKEN", "  ")])).unwrap();
        assert!(settings.telegram.is_none());
    }

    #[test]
    fn test_database_url() {
        let settings = Settings::from_sources(
            None,
            env(&[("UPKEEP_DB_PATH", "/var/lib/upkeep/upkeep.db")]),
        )
        .unwrap();
        assert_eq!(settings.database_url(), "sqlite:///var/lib/upkeep/upkeep.db");
    }
}

use crate::error::ConfigError;
use anyhow::Context;
use dotenv::dotenv;
use log::info;
use serde::Deserialize;
use shared::RankingPolicy;
use std::env;

pub const DEFAULT_JOIN_FAILURE_MESSAGE: &str = "Failed to join contest. Please try again.";
pub const DEFAULT_REMINDER_MESSAGE: &str = "We'll remind you when the contest starts.";
pub const DEFAULT_CONTESTS_COLLECTION: &str = "contests";

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub environment: Environment,
    pub logging: LoggingConfig,
    pub gate: GateConfig,
    pub leaderboard: LeaderboardConfig,
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// env_logger filter used when RUST_LOG is unset
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GateConfig {
    /// Shown when a failed join carries no message of its own
    pub join_failure_fallback: String,
    pub reminder_message: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            join_failure_fallback: DEFAULT_JOIN_FAILURE_MESSAGE.to_string(),
            reminder_message: DEFAULT_REMINDER_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct LeaderboardConfig {
    pub ranking: RankingPolicy,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PersistenceConfig {
    pub project_id: Option<String>,
    pub contests_collection: String,
}

impl Config {
    /// Loads `.env` (or the file named by ENV_FILE_PATH) and then reads the
    /// process environment.
    pub fn load() -> anyhow::Result<Self> {
        match env::var("ENV_FILE_PATH") {
            Ok(path) if !path.is_empty() => {
                info!("Loading environment from ENV_FILE_PATH: {}", path);
                dotenv::from_filename(&path).ok();
            }
            _ => {
                dotenv().ok();
            }
        }

        let config = Self::from_lookup(|key| env::var(key).ok())
            .context("Failed to load configuration from environment")?;
        info!("Loaded configuration for environment: {:?}", config.environment);
        Ok(config)
    }

    /// Builds the config from any key lookup; missing keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match read("RUST_ENV") {
            Some(value) => value.parse::<Environment>().map_err(|reason| ConfigError::InvalidValue {
                key: "RUST_ENV".to_string(),
                value,
                reason,
            })?,
            None => Environment::Development,
        };

        let level = read("LOG_LEVEL").unwrap_or_else(|| match environment {
            Environment::Development => "debug".to_string(),
            Environment::Test | Environment::Production => "info".to_string(),
        });

        let ranking = match read("LEADERBOARD_RANKING") {
            Some(value) => value.parse::<RankingPolicy>().map_err(|reason| ConfigError::InvalidValue {
                key: "LEADERBOARD_RANKING".to_string(),
                value,
                reason,
            })?,
            None => RankingPolicy::default(),
        };

        let limit = match read("LEADERBOARD_LIMIT") {
            Some(value) => Some(value.parse::<usize>().map_err(|e| ConfigError::InvalidValue {
                key: "LEADERBOARD_LIMIT".to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(Config {
            environment,
            logging: LoggingConfig { level },
            gate: GateConfig {
                join_failure_fallback: read("CONTEST_JOIN_FALLBACK_MESSAGE")
                    .unwrap_or_else(|| DEFAULT_JOIN_FAILURE_MESSAGE.to_string()),
                reminder_message: read("CONTEST_REMINDER_MESSAGE")
                    .unwrap_or_else(|| DEFAULT_REMINDER_MESSAGE.to_string()),
            },
            leaderboard: LeaderboardConfig { ranking, limit },
            persistence: PersistenceConfig {
                project_id: read("FIRESTORE_PROJECT_ID"),
                contests_collection: read("CONTESTS_COLLECTION")
                    .unwrap_or_else(|| DEFAULT_CONTESTS_COLLECTION.to_string()),
            },
        })
    }
}

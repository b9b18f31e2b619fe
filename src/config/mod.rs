use serde::Deserialize;
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("price for hall row {row} does not fit into u32")]
    PriceOverflow { row: u32 },
}

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub hall: HallConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub rust_log: String,
}

// Настройки сессионного хранилища
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub selection_key: String,
    /// Лимит в байтах, `None` - без ограничений
    pub quota_bytes: Option<usize>,
}

// Схема зала для демо
#[derive(Debug, Clone, Deserialize)]
pub struct HallConfig {
    pub rows: u32,
    pub seats_per_row: u32,
    pub base_price: u32,
    pub row_price_step: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: AppConfig {
                environment: "development".to_string(),
                rust_log: "seat_reservation=debug".to_string(),
            },
            storage: StorageConfig {
                selection_key: crate::services::selection::DEFAULT_SELECTION_KEY.to_string(),
                quota_bytes: None,
            },
            hall: HallConfig {
                rows: 10,
                seats_per_row: 12,
                base_price: 150,
                row_price_step: 10,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            app: AppConfig {
                environment: env::var("ENVIRONMENT").unwrap_or(defaults.app.environment),
                rust_log: env::var("RUST_LOG").unwrap_or(defaults.app.rust_log),
            },
            storage: StorageConfig {
                selection_key: env::var("SELECTION_STORAGE_KEY")
                    .unwrap_or(defaults.storage.selection_key),
                quota_bytes: match env::var("SESSION_STORAGE_QUOTA_BYTES") {
                    Ok(value) => Some(parse_value("SESSION_STORAGE_QUOTA_BYTES", value)?),
                    Err(_) => None,
                },
            },
            hall: HallConfig {
                rows: parse_var("HALL_ROWS", defaults.hall.rows)?,
                seats_per_row: parse_var("HALL_SEATS_PER_ROW", defaults.hall.seats_per_row)?,
                base_price: parse_var("HALL_BASE_PRICE", defaults.hall.base_price)?,
                row_price_step: parse_var("HALL_ROW_PRICE_STEP", defaults.hall.row_price_step)?,
            },
        })
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => parse_value(var, value),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}

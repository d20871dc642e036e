use std::net::SocketAddr;

use serde::Deserialize;
use thiserror::Error;
use time::{macros::format_description, Time, UtcOffset};

use crate::{models::TradingSchedule, notifier::SLACK_API_BASE, repository::TableRepository};

/// Process configuration, read once from the environment.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    storage_account: Option<String>,
    sas_token: Option<String>,
    #[serde(default = "default_table_name")]
    table_name: String,
    table_endpoint: Option<String>,
    database_url: Option<String>,

    slack_channel_id: String,
    slack_bearer_token: String,
    #[serde(default = "default_slack_api_base")]
    slack_api_base: String,

    #[serde(default = "default_market_open")]
    market_open: String,
    #[serde(default = "default_market_utc_offset")]
    market_utc_offset: String,

    #[serde(default = "default_listen_addr")]
    listen_addr: String,
}

fn default_table_name() -> String {
    "daily".to_owned()
}

fn default_slack_api_base() -> String {
    SLACK_API_BASE.to_owned()
}

fn default_market_open() -> String {
    "14:30".to_owned()
}

fn default_market_utc_offset() -> String {
    "+00:00".to_owned()
}

fn default_listen_addr() -> String {
    "0.0.0.0:7071".to_owned()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Either DATABASE_URL or both STORAGE_ACCOUNT and SAS_TOKEN must be set")]
    MissingStore,
    #[error("Environment variable {name} has an incorrect value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, PartialEq, Eq)]
pub enum StoreSettings {
    Table {
        endpoint: String,
        table: String,
        sas_token: String,
    },
    Sqlite {
        url: String,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub struct SlackSettings {
    pub api_base: String,
    pub channel: String,
    pub bearer_token: String,
}

/// Validated configuration.
#[derive(Debug)]
pub struct Settings {
    pub schedule: TradingSchedule,
    pub store: StoreSettings,
    pub slack: SlackSettings,
    pub listen_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<AppConfig, envy::Error> {
        envy::from_env::<AppConfig>()
    }

    pub fn resolve(self) -> Result<Settings, ConfigError> {
        let open = Time::parse(&self.market_open, format_description!("[hour]:[minute]"))
            .map_err(|_| invalid("MARKET_OPEN", &self.market_open))?;
        let offset = UtcOffset::parse(
            &self.market_utc_offset,
            format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
        )
        .map_err(|_| invalid("MARKET_UTC_OFFSET", &self.market_utc_offset))?;
        let listen_addr = self
            .listen_addr
            .parse()
            .map_err(|_| invalid("LISTEN_ADDR", &self.listen_addr))?;

        if !non_empty_string(&self.slack_channel_id) {
            return Err(invalid("SLACK_CHANNEL_ID", &self.slack_channel_id));
        }
        if !non_empty_string(&self.slack_bearer_token) {
            return Err(invalid("SLACK_BEARER_TOKEN", ""));
        }

        let store = self.store_settings()?;

        Ok(Settings {
            schedule: TradingSchedule::new(open, offset),
            store,
            slack: SlackSettings {
                api_base: self.slack_api_base,
                channel: self.slack_channel_id,
                bearer_token: self.slack_bearer_token,
            },
            listen_addr,
        })
    }

    fn store_settings(&self) -> Result<StoreSettings, ConfigError> {
        if let Some(url) = present(&self.database_url) {
            return Ok(StoreSettings::Sqlite {
                url: url.to_owned(),
            });
        }

        let (Some(account), Some(sas_token)) =
            (present(&self.storage_account), present(&self.sas_token))
        else {
            return Err(ConfigError::MissingStore);
        };

        let endpoint = match present(&self.table_endpoint) {
            Some(endpoint) => endpoint.to_owned(),
            None => TableRepository::account_endpoint(account),
        };

        Ok(StoreSettings::Table {
            endpoint,
            table: self.table_name.clone(),
            sas_token: sas_token.to_owned(),
        })
    }
}

fn non_empty_string(string: &str) -> bool {
    !string.trim().is_empty()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| non_empty_string(value))
}

fn invalid(name: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_owned(),
    }
}

use crate::cli::Cli;
use crate::error::BotResult;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::Deserialize;
use std::path::Path;
use tracing::Level;

const TRACE_LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];
const LOCAL_SETTINGS_YAML_FILE: &str = ".env.local.yaml";

// All settings may be configured via environment variables. Example:
// SLACK_TOKEN="xxx" would set slack_token to the xxx value.
// Command line flags take precedence over both the local file and the environment.
#[derive(Deserialize, Debug)]
pub struct Settings {
    #[serde(default = "default_trace_level")]
    trace_level: String,
    pub slack_token: String,
    pub slack_app_token: String,
    // Channel to receive online/offline notices
    pub slack_monitoring_channel: Option<String>,
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
}

impl Settings {
    pub fn new(cli: &Cli) -> BotResult<Self> {
        let mut figment = Figment::new();
        if Path::new(LOCAL_SETTINGS_YAML_FILE).exists() {
            println!(
                "\n######################################\n\
                   ##   Found '.env.local.yaml' file,  ##\n\
                   ##   loading local configuration.   ##\n\
                   ######################################\n\
                "
            );
            figment = figment.merge(Yaml::file(LOCAL_SETTINGS_YAML_FILE));
        }

        Self::from_figment(figment.merge(Env::raw()).merge(Serialized::defaults(cli)))
    }

    fn from_figment(figment: Figment) -> BotResult<Self> {
        Ok(figment.extract()?)
    }

    pub fn get_trace_level(&self) -> Level {
        get_trace_level(&self.trace_level)
    }
}

fn get_trace_level(level_str: &str) -> Level {
    match level_str.to_uppercase().as_str() {
        level if level == TRACE_LEVELS[0] => Level::TRACE,
        level if level == TRACE_LEVELS[1] => Level::DEBUG,
        level if level == TRACE_LEVELS[2] => Level::INFO,
        level if level == TRACE_LEVELS[3] => Level::WARN,
        level if level == TRACE_LEVELS[4] => Level::ERROR,
        // Default trace level
        _ => Level::INFO,
    }
}

fn default_trace_level() -> String {
    "INFO".to_string()
}

fn default_storage_path() -> String {
    "speedruns.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let figment = Figment::new().merge(Serialized::defaults(serde_json::json!({
            "slack_token": "xoxb-1",
            "slack_app_token": "xapp-1",
        })));
        let settings = Settings::from_figment(figment).unwrap();

        assert_eq!(settings.storage_path, "speedruns.json");
        assert_eq!(settings.slack_monitoring_channel, None);
        assert_eq!(settings.get_trace_level(), Level::INFO);
    }

    #[test]
    fn cli_overrides_other_sources() {
        let cli = Cli {
            storage_path: Some("/data/runs.json".to_string()),
            trace_level: None,
        };
        let figment = Figment::new()
            .merge(Serialized::defaults(serde_json::json!({
                "slack_token": "xoxb-1",
                "slack_app_token": "xapp-1",
                "storage_path": "elsewhere.json",
                "trace_level": "debug",
            })))
            .merge(Serialized::defaults(&cli));
        let settings = Settings::from_figment(figment).unwrap();

        assert_eq!(settings.storage_path, "/data/runs.json");
        assert_eq!(settings.get_trace_level(), Level::DEBUG);
    }

    #[test]
    fn missing_tokens_are_a_config_error() {
        let result = Settings::from_figment(Figment::new());
        assert!(matches!(result, Err(crate::error::BotError::Config(_))));
    }
}

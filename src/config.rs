use std::time::Duration;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub log_level: String,
    pub backend: BackendSettings,
    pub preview: PreviewSettings,
}

/// Where the campaign backend lives and how long we wait for it.
#[derive(Clone, Debug, Deserialize)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout_milliseconds: u64,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PreviewSettings {
    pub debounce_milliseconds: u64,
    pub retry_delay_milliseconds: u64,
}

impl PreviewSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_milliseconds)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_milliseconds)
    }
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            debounce_milliseconds: 300,
            retry_delay_milliseconds: 300,
        }
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

/// Layers `configuration/base.yaml`, the environment specific file and
/// `APP_*` variables (e.g. `APP_BACKEND__BASE_URL`), in that order.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename))
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

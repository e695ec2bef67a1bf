use serde::Deserialize;
use skyport_core::ServiceRules;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub kafka: KafkaConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Without a URL flights are kept in memory.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

/// Without brokers events are only logged.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct KafkaConfig {
    pub brokers: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_max_save_attempts")]
    pub max_save_attempts: u32,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            max_save_attempts: default_max_save_attempts(),
        }
    }
}

fn default_max_save_attempts() -> u32 { 3 }

impl BusinessRules {
    pub fn service_rules(&self) -> ServiceRules {
        ServiceRules {
            max_save_attempts: self.max_save_attempts,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub enabled: bool,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Untracked local overrides
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `SKYPORT__DATABASE__URL=postgres://...`
            .add_source(config::Environment::with_prefix("SKYPORT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

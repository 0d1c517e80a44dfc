//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::application::messaging::RouterSettings;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub channel: ChannelConfig,
    pub logging: LoggingConfig,
    pub commands: CommandsConfig,
    #[serde(default)]
    pub language: LanguageConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub nick: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChannelConfig {
    pub name: String,
    /// Write the channel log; query logs are always written
    pub log: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandsConfig {
    /// Upper bound for one command, hook or language call
    pub collaborator_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LanguageConfig {
    #[serde(default)]
    pub responses: Vec<ResponseRule>,
}

/// One keyword rule for the language engine
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResponseRule {
    pub pattern: String,
    pub reply: String,
}

/// Identity used for lines typed into the console adapter
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub nick: String,
    pub host: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            nick: "console".to_string(),
            host: "localhost".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "nano".to_string(),
                nick: "Nano".to_string(),
            },
            channel: ChannelConfig {
                name: "#nano".to_string(),
                log: true,
            },
            logging: LoggingConfig {
                directory: PathBuf::from("logs"),
            },
            commands: CommandsConfig {
                collaborator_timeout_secs: 10,
            },
            language: LanguageConfig {
                responses: vec![
                    ResponseRule {
                        pattern: r"^(hi|hello|hey)\b".to_string(),
                        reply: "Hello, {name}!".to_string(),
                    },
                    ResponseRule {
                        pattern: r"\bwave\b".to_string(),
                        reply: "{'action': 'waves back'}".to_string(),
                    },
                ],
            },
            console: ConsoleConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(nick) = std::env::var("NANO_NICK") {
            config.bot.nick = nick;
        }

        if let Ok(channel) = std::env::var("NANO_CHANNEL") {
            config.channel.name = channel;
        }

        if let Ok(directory) = std::env::var("NANO_LOG_DIR") {
            config.logging.directory = PathBuf::from(directory);
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.nick.trim().is_empty() {
            return Err(ConfigError::MissingField("bot.nick".to_string()));
        }
        if !self.channel.name.starts_with(['#', '&']) {
            return Err(ConfigError::InvalidValue(format!(
                "channel.name must start with # or &: {}",
                self.channel.name
            )));
        }
        if self.commands.collaborator_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "commands.collaborator-timeout-secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn router_settings(&self) -> RouterSettings {
        RouterSettings {
            channel: self.channel.name.clone(),
            channel_logging: self.channel.log,
            timeout: Duration::from_secs(self.commands.collaborator_timeout_secs),
        }
    }
}

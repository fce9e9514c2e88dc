use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Discord bot token, sent as `Bot <token>`
    pub token: String,
    /// Application client id used to build the invite link
    pub client_id: String,
    pub bot_name: String,
    /// Packed RGB accent color for every embed
    pub embed_color: u32,
    #[serde(default = "default_paste_config")]
    pub paste: PasteConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasteConfig {
    #[serde(default = "default_paste_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_paste_timeout_secs")]
    pub timeout_secs: u64,
}

impl PasteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_paste_endpoint() -> String {
    "https://mnn.im/c".to_string()
}

fn default_paste_timeout_secs() -> u64 {
    10
}

fn default_paste_config() -> PasteConfig {
    PasteConfig {
        endpoint: default_paste_endpoint(),
        timeout_secs: default_paste_timeout_secs(),
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            anyhow::bail!("`token` must not be empty");
        }
        if self.client_id.trim().is_empty() {
            anyhow::bail!("`client_id` must not be empty");
        }
        if self.bot_name.trim().is_empty() {
            anyhow::bail!("`bot_name` must not be empty");
        }
        if self.embed_color > 0xFF_FFFF {
            anyhow::bail!(
                "`embed_color` {:#x} is not a packed RGB value",
                self.embed_color
            );
        }
        if self.paste.timeout_secs == 0 {
            anyhow::bail!("`paste.timeout_secs` must be at least 1");
        }
        Ok(())
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,
    #[serde(default = "default_default_topic")]
    pub default_topic: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    "https://prepmate-backend-x77z.onrender.com".to_string()
}
fn default_topics() -> Vec<String> {
    [
        "Percentages",
        "Profit and Loss",
        "Time and Work",
        "Time Speed and Distance",
        "Simple Interest",
        "Compound Interest",
        "Ratio and Proportion",
        "Averages",
        "Number System",
        "Probability",
        "Permutation and Combination",
        "Ages",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
fn default_default_topic() -> String {
    "Percentages".to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_tick_rate_ms() -> u64 {
    100
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            topics: default_topics(),
            default_topic: default_default_topic(),
            request_timeout_secs: default_request_timeout_secs(),
            theme: default_theme(),
            tick_rate_ms: default_tick_rate_ms(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Config::default()
        };
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("aptiq")
            .join("config.toml")
    }

    /// `None` means no timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Repairs values an edited config file can get wrong.
    pub fn normalize(&mut self) {
        self.topics.retain(|t| !t.trim().is_empty());
        if self.topics.is_empty() {
            self.topics = default_topics();
        }
        if !self.topics.contains(&self.default_topic) {
            self.default_topic = self.topics[0].clone();
        }
        self.tick_rate_ms = self.tick_rate_ms.clamp(16, 1000);
    }

    pub fn default_topic_index(&self) -> usize {
        self.topics
            .iter()
            .position(|t| *t == self.default_topic)
            .unwrap_or(0)
    }
}

use anyhow::Context;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub gatherer: GathererConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GathererConfig {
    /// Network served when a request names no network at all.
    #[serde(default = "default_network")]
    pub default_network: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_network() -> String {
    "base".to_string()
}

impl Default for GathererConfig {
    fn default() -> Self {
        Self {
            default_network: default_network(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let content = fs::read_to_string("config.toml").context("failed to read config.toml")?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("failed to parse config.toml")
    }
}

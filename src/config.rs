use serde::Deserialize;

use crate::models::{WeightError, WeightTable};
use crate::services::drawer::{DrawStrategy, WeightedDrawer};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Draw weight for LOW priority items
    #[serde(default = "default_weight_low")]
    pub weight_low: u32,

    /// Draw weight for MEDIUM priority items
    #[serde(default = "default_weight_medium")]
    pub weight_medium: u32,

    /// Draw weight for HIGH priority items
    #[serde(default = "default_weight_high")]
    pub weight_high: u32,

    /// Draw weight for URGENT priority items
    #[serde(default = "default_weight_urgent")]
    pub weight_urgent: u32,

    /// Draw strategy, `expanded` or `cumulative`
    #[serde(default)]
    pub draw_strategy: DrawStrategy,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_weight_low() -> u32 {
    1
}

fn default_weight_medium() -> u32 {
    2
}

fn default_weight_high() -> u32 {
    5
}

fn default_weight_urgent() -> u32 {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validated weight table built from the configured weights
    pub fn weight_table(&self) -> Result<WeightTable, WeightError> {
        WeightTable::new(
            self.weight_low,
            self.weight_medium,
            self.weight_high,
            self.weight_urgent,
        )
    }

    /// Drawer configured with this config's weights and strategy
    pub fn drawer(&self) -> Result<WeightedDrawer, WeightError> {
        Ok(WeightedDrawer::new(self.weight_table()?, self.draw_strategy))
    }
}

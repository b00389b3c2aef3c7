use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path of the JSON file mirroring the in-memory code table.
    #[serde(default = "default_store_path")]
    pub store_path: String,
    /// Set to "production" for JSON logging, anything else for human-readable.
    #[serde(default)]
    pub env: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    80
}

fn default_store_path() -> String {
    "/tmp/codes.json".to_string()
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.env == "production"
    }
}

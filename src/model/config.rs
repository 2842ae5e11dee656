use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mindmap: MindMapConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindMapConfig {
    /// When false, mutations go to the no-op updater
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Directory holding one outline file per day
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Bounded queue size between producers and the writer
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for MindMapConfig {
    fn default() -> Self {
        MindMapConfig {
            enabled: true,
            root: default_root(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("daymap")
        .join("mindmap")
}

fn default_queue_capacity() -> usize {
    crate::mindmap::DEFAULT_QUEUE_CAPACITY
}

fn default_log_level() -> String {
    "warn".to_string()
}

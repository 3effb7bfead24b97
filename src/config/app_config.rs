//! Engine configuration - targets, feature flags, and server settings
//!
//! Every tunable the analysis engine consults is a field here. Each struct
//! implements `Default` with the standard calibration, so behavior is
//! unchanged when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a Vera deployment.
///
/// Load with `AppConfig::load()` which searches:
/// 1. `$VERA_CONFIG` env var
/// 2. `./vera.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Performance targets the scoring engine compares against
    #[serde(default)]
    pub targets: TargetConfig,

    /// Feature flags for optional analysis packs
    #[serde(default)]
    pub features: FeatureConfig,

    /// External evidence lookup settings
    #[serde(default)]
    pub evidence: EvidenceConfig,

    /// Analysis history persistence
    #[serde(default)]
    pub history: HistoryConfig,
}

impl AppConfig {
    /// Load configuration using the standard search order:
    /// 1. `$VERA_CONFIG` environment variable
    /// 2. `./vera.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("VERA_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from VERA_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from VERA_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "VERA_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("vera.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./vera.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./vera.toml, using defaults");
                }
            }
        }

        info!("No config file found, using built-in defaults");
        Self::default()
    }

    /// Load and parse a specific TOML file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides on top of file/default values.
    ///
    /// `VERA_EVIDENCE_ENABLED=true` switches on external evidence lookups
    /// without touching the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("VERA_EVIDENCE_ENABLED") {
            self.features.external_evidence =
                matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP server
    #[serde(default = "default_addr")]
    pub addr: String,
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

/// Performance targets. Metrics below target pull risk and pillar scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Cost performance index target
    #[serde(default = "default_cpi_target")]
    pub cpi: f64,
    /// Schedule performance index target
    #[serde(default = "default_spi_target")]
    pub spi: f64,
    /// Target for the secondary performance indices (ISP/IDP/IDCo/IDB)
    #[serde(default = "default_index_target")]
    pub index: f64,
}

fn default_cpi_target() -> f64 {
    0.90
}

fn default_spi_target() -> f64 {
    0.95
}

fn default_index_target() -> f64 {
    1.00
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            cpi: default_cpi_target(),
            spi: default_spi_target(),
            index: default_index_target(),
        }
    }
}

/// Feature flags for optional analysis packs. All default on except
/// external evidence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureConfig {
    #[serde(default = "default_true")]
    pub strategy_fit: bool,
    #[serde(default = "default_true")]
    pub lessons_learned: bool,
    /// Financial pack: VAC/EAC/committed-vs-approved scoring and the
    /// financial summary report section
    #[serde(default = "default_true")]
    pub finance_pack: bool,
    /// Schedule pack: overdue-task scoring
    #[serde(default = "default_true")]
    pub schedule_pack: bool,
    /// External evidence lookups (also via `VERA_EVIDENCE_ENABLED`)
    #[serde(default)]
    pub external_evidence: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            strategy_fit: true,
            lessons_learned: true,
            finance_pack: true,
            schedule_pack: true,
            external_evidence: false,
        }
    }
}

/// External evidence lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceConfig {
    /// Allowlisted HTTPS sources queried for supporting evidence
    #[serde(default)]
    pub sources: Vec<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_evidence_timeout")]
    pub timeout_secs: u64,
}

fn default_evidence_timeout() -> u64 {
    5
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            timeout_secs: default_evidence_timeout(),
        }
    }
}

/// Analysis history persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Sled database path
    #[serde(default = "default_history_path")]
    pub path: String,
    /// Reports older than this are pruned at startup
    #[serde(default = "default_keep_days")]
    pub keep_days: u32,
}

fn default_history_path() -> String {
    "./data/analysis_history.db".to_string()
}

fn default_keep_days() -> u32 {
    30
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
            keep_days: default_keep_days(),
        }
    }
}

//! Game and opponent configuration

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::ai::{HeuristicOpponent, ScanOrder};
use crate::game::{GameMode, TIME_LIMIT};

/// Opponent heuristic settings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    /// Random seed for reproducibility (None = OS entropy)
    pub seed: Option<u64>,
    /// Symbol order of the win-or-block scan
    pub scan_order: ScanOrder,
}

impl OpponentConfig {
    pub fn build(&self) -> HeuristicOpponent {
        let opponent = match self.seed {
            Some(seed) => HeuristicOpponent::with_seed(seed),
            None => HeuristicOpponent::from_entropy(),
        };
        opponent.with_scan_order(self.scan_order)
    }
}

/// Session configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Mode a fresh session starts in
    pub mode: GameMode,
    /// Per-move deadline in seconds
    pub time_limit_secs: f64,
    pub opponent: OpponentConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::SinglePlayer,
            time_limit_secs: TIME_LIMIT.as_secs_f64(),
            opponent: OpponentConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.time_limit_secs.is_finite() || self.time_limit_secs <= 0.0 {
            bail!("time_limit_secs must be positive, got {}", self.time_limit_secs);
        }
        if Duration::try_from_secs_f64(self.time_limit_secs).is_err() {
            bail!("time_limit_secs is too large, got {}", self.time_limit_secs);
        }
        Ok(())
    }

    /// Per-move deadline; an unrepresentable value falls back to `TIME_LIMIT`
    pub fn time_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_limit_secs).unwrap_or(TIME_LIMIT)
    }

    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.opponent.seed = Some(seed);
        self
    }

    pub fn with_time_limit_secs(mut self, secs: f64) -> Self {
        self.time_limit_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.mode, GameMode::SinglePlayer);
        assert_eq!(config.time_limit(), TIME_LIMIT);
        assert_eq!(config.opponent.scan_order, ScanOrder::Fixed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_json() {
        let json = r#"{ "mode": "multi-player", "opponent": { "seed": 7 } }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.mode, GameMode::MultiPlayer);
        assert_eq!(config.opponent.seed, Some(7));
        assert_eq!(config.opponent.scan_order, ScanOrder::Fixed);
        assert_eq!(config.time_limit_secs, 5.0);
    }

    #[test]
    fn test_parse_scan_order() {
        let json = r#"{ "opponent": { "scan_order": "self-first" } }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.opponent.scan_order, ScanOrder::SelfFirst);
        assert_eq!(config.opponent.build().scan_order, ScanOrder::SelfFirst);
    }

    #[test]
    fn test_rejects_bad_time_limit() {
        assert!(GameConfig::default().with_time_limit_secs(0.0).validate().is_err());
        assert!(GameConfig::default().with_time_limit_secs(-1.0).validate().is_err());
        assert!(GameConfig::default()
            .with_time_limit_secs(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_rejects_oversized_time_limit() {
        let config = GameConfig::default().with_time_limit_secs(1e20);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("too large"));
        assert_eq!(config.time_limit(), TIME_LIMIT);

        let path = std::env::temp_dir().join(format!("tictac-huge-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "time_limit_secs": 1e20 }"#).unwrap();
        assert!(GameConfig::load(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("tictac-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "time_limit_secs": 2.5 }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.time_limit(), Duration::from_millis(2500));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameConfig::load(Path::new("/nonexistent/tictac.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}

//! Game and tier configuration: defaults, file loading (JSON or YAML) and validation.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::draw::tier::{standard_tier_specs, TierPrize, TierSpec, WinnerSpec};
use crate::money::Money;

pub const DEFAULT_CONFIG_PATH: &str = "lottery.json";
pub const CONFIG_PATH_ENV: &str = "LOTTERY_CONFIG";

/// Player and ticket limits for one game. Read-only to the draw engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub min_players: u32,
    pub max_players: u32,
    pub min_tickets: u32,
    pub max_tickets: u32,
    pub ticket_price: Money,
    pub default_player_balance: Money,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 10,
            max_players: 15,
            min_tickets: 1,
            max_tickets: 10,
            ticket_price: Money::from_cents(100),
            default_player_balance: Money::from_cents(1_000),
        }
    }
}

/// Everything a session needs: game limits, the ordered tier table, and an
/// optional seed for reproducible runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryConfig {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default = "standard_tier_specs")]
    pub tiers: Vec<TierSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            tiers: standard_tier_specs(),
            seed: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    UnsupportedFormat(String),
    Invalid(ValidationReport),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read config file: {err}"),
            Self::Json(err) => write!(f, "failed to parse JSON config: {err}"),
            Self::Yaml(err) => write!(f, "failed to parse YAML config: {err}"),
            Self::UnsupportedFormat(ext) => {
                write!(f, "unsupported config format '{ext}' (expected json, yaml or yml)")
            }
            Self::Invalid(report) => write!(
                f,
                "invalid config: {} error(s)",
                report.errors().count()
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Reads a config file, picking the parser from the extension.
pub fn load_config(path: impl AsRef<Path>) -> Result<LotteryConfig, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(ConfigError::Read)?;
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "json" => serde_json::from_str(&raw).map_err(ConfigError::Json),
        "yaml" | "yml" => serde_yaml::from_str(&raw).map_err(ConfigError::Yaml),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Loads `path`, or `$LOTTERY_CONFIG`, or falls back to defaults when neither exists.
pub fn load_config_or_default(path: Option<&str>) -> Result<LotteryConfig, ConfigError> {
    let explicit = path.map(str::to_string).or_else(|| std::env::var(CONFIG_PATH_ENV).ok());
    match explicit {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH),
        None => Ok(LotteryConfig::default()),
    }
}

impl LotteryConfig {
    /// Converts the tier table, failing with a validation report if anything is off.
    pub fn prize_tiers(&self) -> Result<Vec<TierPrize>, ConfigError> {
        let report = self.validate();
        if report.has_errors() {
            return Err(ConfigError::Invalid(report));
        }
        Ok(self.tiers.iter().filter_map(TierSpec::to_tier).collect())
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = self.game.validate();

        if self.tiers.is_empty() {
            report.push(ValidationSeverity::Error, "tiers", "at least one prize tier is required");
        }

        let mut names = HashSet::new();
        let mut total_share = 0.0;
        for (index, tier) in self.tiers.iter().enumerate() {
            let context = format!("tiers[{index}]");
            if tier.name.trim().is_empty() {
                report.push(ValidationSeverity::Error, &context, "tier name is empty");
            } else if !names.insert(tier.name.as_str()) {
                report.push(
                    ValidationSeverity::Error,
                    &context,
                    format!("duplicate tier name '{}'", tier.name),
                );
            }
            if !(0.0..=100.0).contains(&tier.share_percent) {
                report.push(
                    ValidationSeverity::Error,
                    &context,
                    format!("share_percent {} is outside [0, 100]", tier.share_percent),
                );
            } else {
                total_share += tier.share_percent;
            }
            let never_wins = match tier.winners {
                WinnerSpec::Fixed(n) => n == 0,
                WinnerSpec::PercentOfPool(p) if !(0.0..=100.0).contains(&p) => {
                    report.push(
                        ValidationSeverity::Error,
                        &context,
                        format!("percent_of_pool {p} is outside [0, 100]"),
                    );
                    false
                }
                WinnerSpec::PercentOfPool(p) => p == 0.0,
            };
            if never_wins {
                report.push(ValidationSeverity::Warning, &context, "tier can never pick a winner");
            }
        }

        if total_share > 100.0 {
            report.push(
                ValidationSeverity::Error,
                "tiers",
                format!("tier shares add up to {total_share}%, more than the revenue available"),
            );
        }

        report
    }
}

impl GameConfig {
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        if self.min_players == 0 {
            report.push(
                ValidationSeverity::Warning,
                "game.min_players",
                "min_players is 0; a draw with no tickets will be accepted",
            );
        }
        if self.min_players > self.max_players {
            report.push(
                ValidationSeverity::Error,
                "game.max_players",
                format!("min_players {} exceeds max_players {}", self.min_players, self.max_players),
            );
        }
        if self.min_tickets > self.max_tickets {
            report.push(
                ValidationSeverity::Error,
                "game.max_tickets",
                format!("min_tickets {} exceeds max_tickets {}", self.min_tickets, self.max_tickets),
            );
        }
        if self.ticket_price <= Money::ZERO {
            report.push(ValidationSeverity::Error, "game.ticket_price", "ticket price must be positive");
        }
        if self.default_player_balance.is_negative() {
            report.push(
                ValidationSeverity::Error,
                "game.default_player_balance",
                "starting balance cannot be negative",
            );
        } else if self.default_player_balance < self.ticket_price {
            report.push(
                ValidationSeverity::Warning,
                "game.default_player_balance",
                "starting balance cannot buy a single ticket",
            );
        }
        report
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let report = LotteryConfig::default().validate();
        assert!(!report.has_errors(), "{:?}", report.diagnostics);
        assert_eq!(LotteryConfig::default().prize_tiers().unwrap(), TierPrize::standard_tiers());
    }

    #[test]
    fn json_config_with_partial_fields_uses_defaults() {
        let config: LotteryConfig =
            serde_json::from_str(r#"{"game":{"ticket_price":"1.33","max_players":12}}"#).unwrap();
        assert_eq!(config.game.ticket_price, Money::from_cents(133));
        assert_eq!(config.game.max_players, 12);
        assert_eq!(config.game.min_players, 10);
        assert_eq!(config.tiers.len(), 3);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn detects_inverted_bounds_and_overallocated_shares() {
        let mut config = LotteryConfig::default();
        config.game.min_players = 20;
        config.tiers.push(TierSpec {
            name: "Bonus".to_string(),
            share_percent: 20.0,
            winners: WinnerSpec::Fixed(1),
        });
        let report = config.validate();
        let contexts: Vec<&str> = report.errors().map(|d| d.context.as_str()).collect();
        assert!(contexts.contains(&"game.max_players"));
        assert!(contexts.contains(&"tiers"));
        assert!(matches!(config.prize_tiers(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn duplicate_and_empty_tier_lists_are_errors() {
        let mut config = LotteryConfig::default();
        config.tiers[1].name = "Grand Prize".to_string();
        assert!(config.validate().has_errors());

        config.tiers.clear();
        assert!(config.validate().has_errors());
    }

    #[test]
    fn zero_price_is_an_error() {
        let config = GameConfig {
            ticket_price: Money::ZERO,
            ..GameConfig::default()
        };
        assert!(config.validate().has_errors());
    }
}

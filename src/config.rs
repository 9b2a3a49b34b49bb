//! Environment configuration
//!
//! Budget fallbacks live here rather than in the planner: a goal that
//! omits its training hours gets these values before any plan is built.

use serde::Serialize;
use std::env;
use std::str::FromStr;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const ENV_DATABASE_URL: &str = "RACE_PLANNER_DATABASE_URL";
pub const ENV_BUDGET_STRATEGY: &str = "RACE_PLANNER_BUDGET_STRATEGY";
pub const ENV_DEFAULT_WEEKDAY_HOURS: &str = "RACE_PLANNER_DEFAULT_WEEKDAY_HOURS";
pub const ENV_DEFAULT_WEEKEND_HOURS: &str = "RACE_PLANNER_DEFAULT_WEEKEND_HOURS";
pub const ENV_DEFAULT_WEEKLY_HOURS: &str = "RACE_PLANNER_DEFAULT_WEEKLY_HOURS";

const DEFAULT_WEEKDAY_HOURS: f64 = 4.0;
const DEFAULT_WEEKEND_HOURS: f64 = 2.0;
const DEFAULT_WEEKLY_HOURS: f64 = 6.0;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value}")]
  Invalid { key: &'static str, value: String },
}

/// ---------------------------------------------------------------------------
/// Budget Strategy Selection
/// ---------------------------------------------------------------------------

/// Which budget shape goal lookups use. Which one is authoritative is a
/// product call, so it is configured rather than inferred from the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStrategyKind {
  /// Separate weekday and weekend hours
  #[default]
  Split,
  /// One weekly figure with a phase-dependent rest share
  Combined,
}

impl FromStr for BudgetStrategyKind {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "split" => Ok(Self::Split),
      "combined" => Ok(Self::Combined),
      other => Err(format!("Unknown budget strategy: {}", other)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Planner Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerConfig {
  /// Overrides the app data dir database when set
  pub database_url: Option<String>,
  pub budget_strategy: BudgetStrategyKind,
  /// Hours per weekday when a goal leaves it blank
  pub default_weekday_hours: f64,
  /// Hours per weekend day when a goal leaves it blank
  pub default_weekend_hours: f64,
  /// Weekly hours for the combined strategy when a goal leaves it blank
  pub default_weekly_hours: f64,
}

impl Default for PlannerConfig {
  fn default() -> Self {
    Self {
      database_url: None,
      budget_strategy: BudgetStrategyKind::Split,
      default_weekday_hours: DEFAULT_WEEKDAY_HOURS,
      default_weekend_hours: DEFAULT_WEEKEND_HOURS,
      default_weekly_hours: DEFAULT_WEEKLY_HOURS,
    }
  }
}

impl PlannerConfig {
  /// Read configuration from the process environment.
  /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
  pub fn from_env() -> Result<Self, ConfigError> {
    let budget_strategy = match env::var(ENV_BUDGET_STRATEGY) {
      Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
        key: ENV_BUDGET_STRATEGY,
        value: raw,
      })?,
      Err(_) => BudgetStrategyKind::default(),
    };

    Ok(Self {
      database_url: env::var(ENV_DATABASE_URL).ok().filter(|url| !url.trim().is_empty()),
      budget_strategy,
      default_weekday_hours: hours_from_env(ENV_DEFAULT_WEEKDAY_HOURS, DEFAULT_WEEKDAY_HOURS)?,
      default_weekend_hours: hours_from_env(ENV_DEFAULT_WEEKEND_HOURS, DEFAULT_WEEKEND_HOURS)?,
      default_weekly_hours: hours_from_env(ENV_DEFAULT_WEEKLY_HOURS, DEFAULT_WEEKLY_HOURS)?,
    })
  }
}

fn hours_from_env(key: &'static str, default: f64) -> Result<f64, ConfigError> {
  let Ok(raw) = env::var(key) else {
    return Ok(default);
  };

  match raw.trim().parse::<f64>() {
    Ok(hours) if hours.is_finite() && hours >= 0.0 => Ok(hours),
    _ => Err(ConfigError::Invalid { key, value: raw }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const ALL_KEYS: [&str; 5] = [
    ENV_DATABASE_URL,
    ENV_BUDGET_STRATEGY,
    ENV_DEFAULT_WEEKDAY_HOURS,
    ENV_DEFAULT_WEEKEND_HOURS,
    ENV_DEFAULT_WEEKLY_HOURS,
  ];

  #[test]
  #[serial]
  fn test_from_env_defaults() {
    temp_env::with_vars_unset(ALL_KEYS.to_vec(), || {
      let config = PlannerConfig::from_env().expect("Defaults should load");
      assert_eq!(config, PlannerConfig::default());
      assert_eq!(config.default_weekday_hours, 4.0);
      assert_eq!(config.default_weekend_hours, 2.0);
      assert_eq!(config.default_weekly_hours, 6.0);
      assert_eq!(config.budget_strategy, BudgetStrategyKind::Split);
    });
  }

  #[test]
  #[serial]
  fn test_from_env_overrides() {
    temp_env::with_vars(
      vec![
        (ENV_DATABASE_URL, Some("sqlite://planner.db?mode=rwc")),
        (ENV_BUDGET_STRATEGY, Some("Combined")),
        (ENV_DEFAULT_WEEKDAY_HOURS, Some("1.5")),
        (ENV_DEFAULT_WEEKEND_HOURS, Some("3")),
        (ENV_DEFAULT_WEEKLY_HOURS, Some(" 10 ")),
      ],
      || {
        let config = PlannerConfig::from_env().unwrap();
        assert_eq!(config.database_url.as_deref(), Some("sqlite://planner.db?mode=rwc"));
        assert_eq!(config.budget_strategy, BudgetStrategyKind::Combined);
        assert_eq!(config.default_weekday_hours, 1.5);
        assert_eq!(config.default_weekend_hours, 3.0);
        assert_eq!(config.default_weekly_hours, 10.0);
      },
    );
  }

  /// Every planner variable unset except the given overrides
  fn env_with(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
    ALL_KEYS
      .iter()
      .map(|key| {
        let value = overrides.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
        (*key, value)
      })
      .collect()
  }

  #[test]
  #[serial]
  fn test_from_env_rejects_unknown_strategy() {
    temp_env::with_vars(env_with(&[(ENV_BUDGET_STRATEGY, "polarized")]), || {
      let err = PlannerConfig::from_env().unwrap_err();
      assert_eq!(
        err,
        ConfigError::Invalid {
          key: ENV_BUDGET_STRATEGY,
          value: "polarized".into()
        }
      );
    });
  }

  #[test]
  #[serial]
  fn test_from_env_rejects_negative_hours() {
    temp_env::with_vars(env_with(&[(ENV_DEFAULT_WEEKEND_HOURS, "-2")]), || {
      assert!(PlannerConfig::from_env().is_err());
    });
    temp_env::with_vars(env_with(&[(ENV_DEFAULT_WEEKDAY_HOURS, "lots")]), || {
      assert!(PlannerConfig::from_env().is_err());
    });
  }

  #[test]
  #[serial]
  fn test_blank_database_url_is_ignored() {
    temp_env::with_vars(env_with(&[(ENV_DATABASE_URL, "  ")]), || {
      assert_eq!(PlannerConfig::from_env().unwrap().database_url, None);
    });
  }
}

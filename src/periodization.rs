//! Race Periodization
//!
//! Splits the weeks between today and a target race into three blocks:
//! - Build: aerobic volume with one hard day every few sessions
//! - Peak: race-specific threshold work
//! - Taper: reduced load, two fixed rest days
//!
//! Key principles:
//! - Block sizes come from fixed ratios (60/30/10 by default)
//! - Taper absorbs every rounding remainder, so blocks always sum to the total
//! - Weeks are anchored on `today`, not on calendar Mondays
//! - Pure and deterministic: no clock reads, no I/O

use chrono::{Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::training_plan::{Intensity, Sport};

pub const DAYS_PER_WEEK: i64 = 7;
pub const DEFAULT_BUILD_RATIO: f64 = 0.6;
pub const DEFAULT_PEAK_RATIO: f64 = 0.3;

// ---------------------------------------------------------------------------
/// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("Invalid budget: {field} must be a finite, non-negative number of hours (got {value})")]
    InvalidBudget { field: &'static str, value: f64 },

    #[error("Invalid periodization policy: {0}")]
    InvalidPolicy(String),
}

// ---------------------------------------------------------------------------
/// Training Phase: macro-cycle emphasis attached to a week
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainingPhase {
    Build,
    Peak,
    Taper,
}

impl std::fmt::Display for TrainingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Build => write!(f, "Build"),
            Self::Peak => write!(f, "Peak"),
            Self::Taper => write!(f, "Taper"),
        }
    }
}

impl std::str::FromStr for TrainingPhase {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Build" | "build" => Ok(Self::Build),
            "Peak" | "peak" => Ok(Self::Peak),
            "Taper" | "taper" => Ok(Self::Taper),
            _ => Err(format!("Unknown training phase: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
/// Weekly Phase Schedule: one entry per week until race day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPhaseSchedule {
    /// 1-based, contiguous within a schedule
    pub week: u32,
    pub start_date: NaiveDate,
    /// Inclusive, always `start_date + 6 days`
    pub end_date: NaiveDate,
    pub phase: TrainingPhase,
}

impl WeeklyPhaseSchedule {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

// ---------------------------------------------------------------------------
/// Phase Split: how many weeks each block gets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSplit {
    pub build_weeks: u32,
    pub peak_weeks: u32,
    pub taper_weeks: u32,
}

impl PhaseSplit {
    pub fn total_weeks(&self) -> u32 {
        self.build_weeks + self.peak_weeks + self.taper_weeks
    }

    /// Phase for a 0-based week index. Indexes past the split stay in taper.
    pub fn phase_for_week(&self, index: u32) -> TrainingPhase {
        if index < self.build_weeks {
            TrainingPhase::Build
        } else if index < self.build_weeks + self.peak_weeks {
            TrainingPhase::Peak
        } else {
            TrainingPhase::Taper
        }
    }
}

// ---------------------------------------------------------------------------
/// Periodization Policy: the tunable constants of the plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodizationPolicy {
    /// Share of weeks spent in Build (floored)
    pub build_ratio: f64,
    /// Share of weeks spent in Peak (floored)
    pub peak_ratio: f64,
    /// Round-robin sport order, indexed by day of week
    pub sport_rotation: Vec<Sport>,
    /// Days forced to rest during Taper
    pub taper_rest_days: Vec<Weekday>,
    /// Build: every Nth day (by index, from Monday) is a Z4 session
    pub build_hard_every: u32,
    /// Peak: every Nth day alternates Z3, the rest are Z4
    pub peak_threshold_every: u32,
}

impl Default for PeriodizationPolicy {
    fn default() -> Self {
        Self {
            build_ratio: DEFAULT_BUILD_RATIO,
            peak_ratio: DEFAULT_PEAK_RATIO,
            sport_rotation: vec![Sport::Swim, Sport::Bike, Sport::Run, Sport::Strength],
            taper_rest_days: vec![Weekday::Mon, Weekday::Fri],
            build_hard_every: 3,
            peak_threshold_every: 2,
        }
    }
}

impl PeriodizationPolicy {
    pub fn validate(&self) -> Result<(), PlanError> {
        let ratios_ok = |r: f64| r.is_finite() && r >= 0.0;
        if !ratios_ok(self.build_ratio) || !ratios_ok(self.peak_ratio) {
            return Err(PlanError::InvalidPolicy(format!(
                "ratios must be non-negative (build {}, peak {})",
                self.build_ratio, self.peak_ratio
            )));
        }
        if self.build_ratio + self.peak_ratio > 1.0 {
            return Err(PlanError::InvalidPolicy(format!(
                "build and peak ratios exceed 1.0 ({} + {})",
                self.build_ratio, self.peak_ratio
            )));
        }
        if self.sport_rotation.is_empty() {
            return Err(PlanError::InvalidPolicy("sport rotation is empty".into()));
        }
        if self.sport_rotation.contains(&Sport::Rest) {
            return Err(PlanError::InvalidPolicy(
                "rest is not a rotation sport; use taper_rest_days".into(),
            ));
        }
        if self.build_hard_every == 0 || self.peak_threshold_every == 0 {
            return Err(PlanError::InvalidPolicy("intensity intervals must be at least 1".into()));
        }
        Ok(())
    }

    /// Partition `total_weeks` into Build/Peak/Taper.
    ///
    /// Build and peak are floored; taper takes the remainder. Out-of-range
    /// ratios are clamped so the three blocks still sum to `total_weeks`.
    pub fn split(&self, total_weeks: u32) -> PhaseSplit {
        let floor_share = |ratio: f64| {
            let weeks = (total_weeks as f64 * ratio).floor();
            if weeks.is_finite() && weeks > 0.0 {
                (weeks as u32).min(total_weeks)
            } else {
                0
            }
        };

        let build_weeks = floor_share(self.build_ratio);
        let peak_weeks = floor_share(self.peak_ratio).min(total_weeks - build_weeks);
        let taper_weeks = total_weeks - build_weeks - peak_weeks;

        PhaseSplit {
            build_weeks,
            peak_weeks,
            taper_weeks,
        }
    }

    /// Sport for the day at `day_index` (0 = Monday).
    pub fn sport_for(&self, day_index: usize) -> Sport {
        if self.sport_rotation.is_empty() {
            return Sport::Rest;
        }
        self.sport_rotation[day_index % self.sport_rotation.len()]
    }

    pub fn intensity_for(&self, phase: TrainingPhase, day_index: usize) -> Intensity {
        match phase {
            TrainingPhase::Build => {
                if day_index % self.build_hard_every.max(1) as usize == 0 {
                    Intensity::Z4
                } else {
                    Intensity::Z2
                }
            }
            TrainingPhase::Peak => {
                if day_index % self.peak_threshold_every.max(1) as usize == 0 {
                    Intensity::Z3
                } else {
                    Intensity::Z4
                }
            }
            TrainingPhase::Taper => Intensity::Z2,
        }
    }

    pub fn is_taper_rest_day(&self, phase: TrainingPhase, day: Weekday) -> bool {
        phase == TrainingPhase::Taper && self.taper_rest_days.contains(&day)
    }
}

// ---------------------------------------------------------------------------
/// Phase Scheduler
// ---------------------------------------------------------------------------

/// Whole weeks from `today` to `race_date`, rounded up. Zero when the race
/// is today or already behind us.
pub fn total_weeks(race_date: NaiveDate, today: NaiveDate) -> u32 {
    let days = (race_date - today).num_days();
    if days <= 0 {
        return 0;
    }
    let weeks = (days + DAYS_PER_WEEK - 1) / DAYS_PER_WEEK;
    u32::try_from(weeks).unwrap_or(u32::MAX)
}

/// Phase schedule under the default 60/30/10 policy.
pub fn generate_phase_schedule(race_date: NaiveDate, today: NaiveDate) -> Vec<WeeklyPhaseSchedule> {
    generate_phase_schedule_with(&PeriodizationPolicy::default(), race_date, today)
}

pub fn generate_phase_schedule_with(
    policy: &PeriodizationPolicy,
    race_date: NaiveDate,
    today: NaiveDate,
) -> Vec<WeeklyPhaseSchedule> {
    let total = total_weeks(race_date, today);
    let split = policy.split(total);

    (0..total)
        .map_while(|index| {
            let start_date = today.checked_add_signed(Duration::days(index as i64 * DAYS_PER_WEEK))?;
            let end_date = start_date.checked_add_signed(Duration::days(DAYS_PER_WEEK - 1))?;
            Some(WeeklyPhaseSchedule {
                week: index + 1,
                start_date,
                end_date,
                phase: split.phase_for_week(index),
            })
        })
        .collect()
}

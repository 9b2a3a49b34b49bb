//! Weekly plan expansion
//!
//! Turns each phase-scheduled week into seven concrete sessions
//! (Monday → Sunday). Sport, intensity and rest days come from the
//! `PeriodizationPolicy`; session length comes from a `BudgetStrategy`.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::periodization::{PeriodizationPolicy, PlanError, TrainingPhase, WeeklyPhaseSchedule};

pub const WEEK_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const WEEKDAY_COUNT: f64 = 5.0;
const WEEKEND_DAY_COUNT: f64 = 2.0;
const MINUTES_PER_HOUR: f64 = 60.0;

// ---------------------------------------------------------------------------
/// Session vocabulary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    Swim,
    Bike,
    Run,
    Strength,
    Rest,
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Swim => write!(f, "Swim"),
            Self::Bike => write!(f, "Bike"),
            Self::Run => write!(f, "Run"),
            Self::Strength => write!(f, "Strength"),
            Self::Rest => write!(f, "Rest"),
        }
    }
}

impl std::str::FromStr for Sport {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Swim" => Ok(Self::Swim),
            "Bike" => Ok(Self::Bike),
            "Run" => Ok(Self::Run),
            "Strength" => Ok(Self::Strength),
            "Rest" => Ok(Self::Rest),
            _ => Err(format!("Unknown sport: {}", s)),
        }
    }
}

/// Training zone, Z1 (easiest) to Z5 (hardest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Z1,
    Z2,
    Z3,
    Z4,
    Z5,
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Z1 => write!(f, "Z1"),
            Self::Z2 => write!(f, "Z2"),
            Self::Z3 => write!(f, "Z3"),
            Self::Z4 => write!(f, "Z4"),
            Self::Z5 => write!(f, "Z5"),
        }
    }
}

impl std::str::FromStr for Intensity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Z1" => Ok(Self::Z1),
            "Z2" => Ok(Self::Z2),
            "Z3" => Ok(Self::Z3),
            "Z4" => Ok(Self::Z4),
            "Z5" => Ok(Self::Z5),
            _ => Err(format!("Unknown intensity zone: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
/// Sessions and weekly plans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub day: Weekday,
    pub sport: Sport,
    pub intensity: Intensity,
    /// Zero iff `sport == Rest`; a day the budget leaves no minutes for is a rest day
    pub duration_min: u32,
    pub notes: String,
}

impl TrainingSession {
    pub fn rest(day: Weekday) -> Self {
        Self {
            day,
            sport: Sport::Rest,
            intensity: Intensity::Z1,
            duration_min: 0,
            notes: "Rest day".to_string(),
        }
    }

    pub fn workout(day: Weekday, sport: Sport, intensity: Intensity, duration_min: u32) -> Self {
        Self {
            day,
            sport,
            intensity,
            duration_min,
            notes: format!("{} {} training", sport, intensity),
        }
    }

    pub fn is_rest(&self) -> bool {
        self.sport == Sport::Rest
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTrainingPlan {
    pub week: u32,
    pub phase: TrainingPhase,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Exactly seven, Monday first
    pub sessions: Vec<TrainingSession>,
}

impl WeeklyTrainingPlan {
    pub fn total_minutes(&self) -> u32 {
        self.sessions.iter().map(|s| s.duration_min).sum()
    }

    pub fn session_on(&self, day: Weekday) -> Option<&TrainingSession> {
        self.sessions.iter().find(|s| s.day == day)
    }
}

// ---------------------------------------------------------------------------
/// Budget Strategy: how many minutes a training day gets
// ---------------------------------------------------------------------------

pub trait BudgetStrategy {
    /// Minutes for a non-rest session on `day` during a `phase` week.
    fn session_minutes(&self, phase: TrainingPhase, day: Weekday) -> u32;

    /// Short identifier surfaced to callers ("split", "combined").
    fn label(&self) -> &'static str;
}

fn check_hours(field: &'static str, value: f64) -> Result<f64, PlanError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(PlanError::InvalidBudget { field, value })
    }
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Separate weekday and weekend totals, spread evenly over 5 and 2 days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitBudget {
    weekday_hours: f64,
    weekend_hours: f64,
}

impl SplitBudget {
    /// `weekday_hours` covers Mon–Fri together, `weekend_hours` Sat–Sun together.
    pub fn new(weekday_hours: f64, weekend_hours: f64) -> Result<Self, PlanError> {
        Ok(Self {
            weekday_hours: check_hours("weekday_hours", weekday_hours)?,
            weekend_hours: check_hours("weekend_hours", weekend_hours)?,
        })
    }

    /// Build from per-day hours, as race goals record them.
    pub fn from_daily_hours(weekday_per_day: f64, weekend_per_day: f64) -> Result<Self, PlanError> {
        check_hours("weekday_hours", weekday_per_day)?;
        check_hours("weekend_hours", weekend_per_day)?;
        Self::new(weekday_per_day * WEEKDAY_COUNT, weekend_per_day * WEEKEND_DAY_COUNT)
    }

    pub fn weekday_hours(&self) -> f64 {
        self.weekday_hours
    }

    pub fn weekend_hours(&self) -> f64 {
        self.weekend_hours
    }

    pub fn weekday_minutes(&self) -> u32 {
        (self.weekday_hours * MINUTES_PER_HOUR / WEEKDAY_COUNT).round() as u32
    }

    pub fn weekend_minutes(&self) -> u32 {
        (self.weekend_hours * MINUTES_PER_HOUR / WEEKEND_DAY_COUNT).round() as u32
    }
}

impl BudgetStrategy for SplitBudget {
    fn session_minutes(&self, _phase: TrainingPhase, day: Weekday) -> u32 {
        if is_weekend(day) {
            self.weekend_minutes()
        } else {
            self.weekday_minutes()
        }
    }

    fn label(&self) -> &'static str {
        "split"
    }
}

/// One weekly total, a phase-dependent rest share, and equal sessions.
///
/// This is the older budget shape: weekday and weekend get identical
/// sessions and taper weeks hold back a larger share of the hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CombinedBudget {
    hours_per_week: f64,
    base_rest_ratio: f64,
    taper_rest_ratio: f64,
    training_days: u32,
}

impl CombinedBudget {
    pub const BASE_REST_RATIO: f64 = 0.15;
    pub const TAPER_REST_RATIO: f64 = 0.4;
    pub const TRAINING_DAYS: u32 = 6;

    pub fn new(hours_per_week: f64) -> Result<Self, PlanError> {
        Ok(Self {
            hours_per_week: check_hours("hours_per_week", hours_per_week)?,
            base_rest_ratio: Self::BASE_REST_RATIO,
            taper_rest_ratio: Self::TAPER_REST_RATIO,
            training_days: Self::TRAINING_DAYS,
        })
    }

    pub fn hours_per_week(&self) -> f64 {
        self.hours_per_week
    }

    pub fn rest_ratio(&self, phase: TrainingPhase) -> f64 {
        match phase {
            TrainingPhase::Taper => self.taper_rest_ratio,
            TrainingPhase::Build | TrainingPhase::Peak => self.base_rest_ratio,
        }
    }
}

impl BudgetStrategy for CombinedBudget {
    fn session_minutes(&self, phase: TrainingPhase, _day: Weekday) -> u32 {
        let training_minutes =
            (self.hours_per_week * MINUTES_PER_HOUR * (1.0 - self.rest_ratio(phase))).floor();
        (training_minutes / self.training_days.max(1) as f64).floor() as u32
    }

    fn label(&self) -> &'static str {
        "combined"
    }
}

/// Either budget shape, chosen explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum TimeBudget {
    Split(SplitBudget),
    Combined(CombinedBudget),
}

impl TimeBudget {
    pub fn split(weekday_hours: f64, weekend_hours: f64) -> Result<Self, PlanError> {
        SplitBudget::new(weekday_hours, weekend_hours).map(Self::Split)
    }

    pub fn combined(hours_per_week: f64) -> Result<Self, PlanError> {
        CombinedBudget::new(hours_per_week).map(Self::Combined)
    }
}

impl BudgetStrategy for TimeBudget {
    fn session_minutes(&self, phase: TrainingPhase, day: Weekday) -> u32 {
        match self {
            Self::Split(b) => b.session_minutes(phase, day),
            Self::Combined(b) => b.session_minutes(phase, day),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Split(b) => b.label(),
            Self::Combined(b) => b.label(),
        }
    }
}

// ---------------------------------------------------------------------------
/// Weekly Plan Expander
// ---------------------------------------------------------------------------

/// Expand every scheduled week under the default policy.
pub fn generate_weekly_plans<B: BudgetStrategy + ?Sized>(
    schedule: &[WeeklyPhaseSchedule],
    budget: &B,
) -> Vec<WeeklyTrainingPlan> {
    generate_weekly_plans_with(&PeriodizationPolicy::default(), schedule, budget)
}

pub fn generate_weekly_plans_with<B: BudgetStrategy + ?Sized>(
    policy: &PeriodizationPolicy,
    schedule: &[WeeklyPhaseSchedule],
    budget: &B,
) -> Vec<WeeklyTrainingPlan> {
    schedule
        .iter()
        .map(|week| expand_week(policy, week, budget))
        .collect()
}

fn expand_week<B: BudgetStrategy + ?Sized>(
    policy: &PeriodizationPolicy,
    week: &WeeklyPhaseSchedule,
    budget: &B,
) -> WeeklyTrainingPlan {
    let sessions = WEEK_DAYS
        .iter()
        .enumerate()
        .map(|(idx, &day)| plan_day(policy, week.phase, idx, day, budget))
        .collect();

    WeeklyTrainingPlan {
        week: week.week,
        phase: week.phase,
        start_date: week.start_date,
        end_date: week.end_date,
        sessions,
    }
}

fn plan_day<B: BudgetStrategy + ?Sized>(
    policy: &PeriodizationPolicy,
    phase: TrainingPhase,
    idx: usize,
    day: Weekday,
    budget: &B,
) -> TrainingSession {
    // Taper rest days override rotation and intensity
    if policy.is_taper_rest_day(phase, day) {
        return TrainingSession::rest(day);
    }

    let sport = policy.sport_for(idx);
    if sport == Sport::Rest {
        return TrainingSession::rest(day);
    }

    let minutes = budget.session_minutes(phase, day);
    if minutes == 0 {
        return TrainingSession::rest(day);
    }

    let intensity = policy.intensity_for(phase, idx);
    TrainingSession::workout(day, sport, intensity, minutes)
}

//! Goal-driven plan lookup
//!
//! Loads the athlete's nearest upcoming A race, resolves its training
//! budget (filling gaps from config), and runs the periodization engine.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::config::{BudgetStrategyKind, PlannerConfig};
use crate::goals::{find_next_a_race, GoalError};
use crate::models::RaceGoal;
use crate::periodization::{generate_phase_schedule, PlanError};
use crate::training_plan::{generate_weekly_plans, BudgetStrategy, SplitBudget, TimeBudget, WeeklyTrainingPlan};

#[derive(Debug, Clone, Serialize)]
pub struct TrainingPlanResponse {
  pub goal_id: i64,
  pub race_name: String,
  pub race_date: NaiveDate,
  pub budget: TimeBudget,
  pub weeks: Vec<WeeklyTrainingPlan>,
}

/// Budget for a goal under the configured strategy.
///
/// Missing hours fall back to config defaults; recorded negative hours
/// are an error, never clamped.
pub fn budget_for_goal(goal: &RaceGoal, config: &PlannerConfig) -> Result<TimeBudget, PlanError> {
  match config.budget_strategy {
    BudgetStrategyKind::Split => {
      let weekday = goal
        .training_time_weekday_hr
        .unwrap_or(config.default_weekday_hours);
      let weekend = goal
        .training_time_weekend_hr
        .unwrap_or(config.default_weekend_hours);
      SplitBudget::from_daily_hours(weekday, weekend).map(TimeBudget::Split)
    }
    BudgetStrategyKind::Combined => {
      let weekly = goal
        .available_hours_per_week
        .unwrap_or(config.default_weekly_hours);
      TimeBudget::combined(weekly)
    }
  }
}

pub fn plan_for_goal(
  goal: &RaceGoal,
  config: &PlannerConfig,
  today: NaiveDate,
) -> Result<TrainingPlanResponse, GoalError> {
  let budget = budget_for_goal(goal, config)?;
  let schedule = generate_phase_schedule(goal.race_date, today);
  let weeks = generate_weekly_plans(&schedule, &budget);

  info!(
    goal_id = goal.id,
    strategy = budget.label(),
    weeks = weeks.len(),
    "Generated training plan"
  );

  Ok(TrainingPlanResponse {
    goal_id: goal.id,
    race_name: goal.race_name.clone(),
    race_date: goal.race_date,
    budget,
    weeks,
  })
}

/// Plan toward the athlete's nearest A race on or after `today`
pub async fn load_training_plan(
  pool: &SqlitePool,
  config: &PlannerConfig,
  athlete_id: i64,
  today: NaiveDate,
) -> Result<TrainingPlanResponse, GoalError> {
  let Some(goal) = find_next_a_race(pool, athlete_id, today).await? else {
    warn!(athlete_id, %today, "No upcoming A race");
    return Err(GoalError::NoUpcomingRace(athlete_id));
  };

  plan_for_goal(&goal, config, today)
}

//! Tauri command for the weekly training plan

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tauri::State;

use crate::db::AppState;
use crate::goals::GoalError;
use crate::training::{load_training_plan, TrainingPlanResponse};

/// Plan toward the athlete's nearest upcoming A race.
/// `today` defaults to the current UTC date; the frontend may pass its
/// local date instead.
#[tauri::command]
pub async fn get_weekly_training_plan(
  state: State<'_, Arc<AppState>>,
  athlete_id: i64,
  today: Option<NaiveDate>,
) -> Result<TrainingPlanResponse, GoalError> {
  let today = today.unwrap_or_else(|| Utc::now().date_naive());
  load_training_plan(&state.db, &state.config, athlete_id, today).await
}

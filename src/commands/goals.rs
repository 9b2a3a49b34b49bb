//! Tauri commands for race goal management

use std::sync::Arc;
use tauri::State;

use crate::db::AppState;
use crate::goals::{self, GoalError};
use crate::models::{NewRaceGoal, RaceGoal, RaceGoalUpdate};

#[tauri::command]
pub async fn create_race_goal(
  state: State<'_, Arc<AppState>>,
  athlete_id: i64,
  goal: NewRaceGoal,
) -> Result<RaceGoal, GoalError> {
  goals::create_goal(&state.db, athlete_id, &goal).await
}

/// All goals for an athlete, nearest race first
#[tauri::command]
pub async fn list_race_goals(
  state: State<'_, Arc<AppState>>,
  athlete_id: i64,
) -> Result<Vec<RaceGoal>, GoalError> {
  goals::list_goals(&state.db, athlete_id).await
}

#[tauri::command]
pub async fn update_race_goal(
  state: State<'_, Arc<AppState>>,
  athlete_id: i64,
  id: i64,
  update: RaceGoalUpdate,
) -> Result<RaceGoal, GoalError> {
  goals::update_goal(&state.db, athlete_id, id, &update).await
}

#[tauri::command]
pub async fn delete_race_goal(
  state: State<'_, Arc<AppState>>,
  athlete_id: i64,
  id: i64,
) -> Result<(), GoalError> {
  goals::delete_goal(&state.db, athlete_id, id).await
}

pub mod config;
pub mod db;
pub mod goals;
pub mod logging;
pub mod models;
pub mod periodization;
pub mod training;
pub mod training_plan;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(test)]
mod test_utils;

pub use periodization::{
  generate_phase_schedule, generate_phase_schedule_with, PeriodizationPolicy, PhaseSplit,
  PlanError, TrainingPhase, WeeklyPhaseSchedule,
};
pub use training_plan::{
  generate_weekly_plans, generate_weekly_plans_with, BudgetStrategy, CombinedBudget, Intensity,
  SplitBudget, Sport, TimeBudget, TrainingSession, WeeklyTrainingPlan,
};

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
  use config::PlannerConfig;
  use db::AppState;
  use std::sync::Arc;
  use tauri::Manager;
  use tracing::{error, info};

  // Load environment variables from .env file
  dotenvy::dotenv().ok();
  logging::init_from_env().ok();

  let config = match PlannerConfig::from_env() {
    Ok(config) => config,
    Err(e) => {
      error!("Invalid configuration, using defaults: {}", e);
      PlannerConfig::default()
    }
  };

  tauri::Builder::default()
    .plugin(tauri_plugin_opener::init())
    .setup(move |app| {
      // Initialize database
      let app_handle = app.handle().clone();
      tauri::async_runtime::block_on(async move {
        match db::initialize_db(&app_handle, &config).await {
          Ok(pool) => {
            let state = Arc::new(AppState { db: pool, config });
            app_handle.manage(state);
            info!("Database ready");
          }
          Err(e) => {
            error!("Failed to initialize database: {}", e);
          }
        }
      });
      Ok(())
    })
    .invoke_handler(tauri::generate_handler![
      commands::training::get_weekly_training_plan,
      commands::goals::create_race_goal,
      commands::goals::list_race_goals,
      commands::goals::update_race_goal,
      commands::goals::delete_race_goal,
    ])
    .run(tauri::generate_context!())
    .expect("error while running tauri application");
}

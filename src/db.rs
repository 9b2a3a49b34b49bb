use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::PlannerConfig;

pub type DbPool = SqlitePool;

/// Application state holding the database connection pool
pub struct AppState {
  pub db: DbPool,
  pub config: PlannerConfig,
}

/// Open a pool and run the embedded migrations
pub async fn connect(db_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
  let pool = SqlitePoolOptions::new()
    .max_connections(max_connections)
    .connect(db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;
  info!(max_connections, "Database migrations applied");

  Ok(pool)
}

/// Get the path to the database file
/// Stored in the platform app data dir as race-planner.db
#[cfg(feature = "desktop")]
fn get_db_path<R: tauri::Runtime>(
  app: &tauri::AppHandle<R>,
) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
  use tauri::Manager;

  let data_dir = app
    .path()
    .app_data_dir()
    .map_err(|e| format!("Failed to get app data dir: {}", e))?;

  // Create directory if it doesn't exist
  std::fs::create_dir_all(&data_dir)?;

  Ok(data_dir.join("race-planner.db"))
}

/// Initialize the database connection pool and run migrations
///
/// `RACE_PLANNER_DATABASE_URL` wins over the app data dir when set.
#[cfg(feature = "desktop")]
pub async fn initialize_db<R: tauri::Runtime>(
  app: &tauri::AppHandle<R>,
  config: &PlannerConfig,
) -> Result<DbPool, Box<dyn std::error::Error>> {
  let db_url = match &config.database_url {
    Some(url) => url.clone(),
    None => format!("sqlite://{}?mode=rwc", get_db_path(app)?.display()),
  };

  info!(db_url = %db_url, "Initializing database");
  let pool = connect(&db_url, 5).await?;
  info!("Database initialized successfully");

  Ok(pool)
}

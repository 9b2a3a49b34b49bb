//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Race goal factories

use crate::models::NewRaceGoal;
use chrono::NaiveDate;
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  crate::db::connect("sqlite::memory:", 1)
    .await
    .expect("Failed to create in-memory database")
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Race Goal Fixtures
/// ---------------------------------------------------------------------------

/// A goal with one hour per weekday and two per weekend day
pub fn sample_new_goal(name: &str, race_date: NaiveDate, is_a_race: bool) -> NewRaceGoal {
  NewRaceGoal {
    race_name: name.to_string(),
    race_date,
    swim_distance_km: Some(3.8),
    bike_distance_km: Some(180.0),
    run_distance_km: Some(42.2),
    target_total_time: Some("11:30:00".to_string()),
    target_swim_time: Some("1:10:00".to_string()),
    target_bike_time: Some("5:45:00".to_string()),
    target_run_time: Some("4:15:00".to_string()),
    target_rank: Some(12),
    goal_type: Some("finish".to_string()),
    is_a_race,
    motivation: None,
    training_time_weekday_hr: Some(1.0),
    training_time_weekend_hr: Some(2.0),
    available_hours_per_week: Some(9.0),
    training_limit_comment: None,
  }
}

/// Insert a goal directly, returning its id
pub async fn seed_race_goal(
  pool: &SqlitePool,
  athlete_id: i64,
  name: &str,
  race_date: NaiveDate,
  is_a_race: bool,
) -> i64 {
  let result = sqlx::query(
    r#"
    INSERT INTO race_goals (
      athlete_id, race_name, race_date, is_a_race,
      training_time_weekday_hr, training_time_weekend_hr, available_hours_per_week
    )
    VALUES (?1, ?2, ?3, ?4, 1.0, 2.0, 9.0)
    "#,
  )
  .bind(athlete_id)
  .bind(name)
  .bind(race_date)
  .bind(is_a_race)
  .execute(pool)
  .await
  .expect("Failed to insert test race goal");

  result.last_insert_rowid()
}

/// Insert a goal with no training-time fields at all
pub async fn seed_bare_race_goal(
  pool: &SqlitePool,
  athlete_id: i64,
  name: &str,
  race_date: NaiveDate,
) -> i64 {
  let result = sqlx::query(
    "INSERT INTO race_goals (athlete_id, race_name, race_date, is_a_race) VALUES (?1, ?2, ?3, 1)",
  )
  .bind(athlete_id)
  .bind(name)
  .bind(race_date)
  .execute(pool)
  .await
  .expect("Failed to insert bare race goal");

  result.last_insert_rowid()
}

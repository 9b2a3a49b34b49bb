//! Race goal storage
//!
//! Every query is scoped to an athlete id: a goal owned by someone else
//! is indistinguishable from a missing one.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::models::{NewRaceGoal, RaceGoal, RaceGoalUpdate};
use crate::periodization::PlanError;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum GoalError {
  #[error("Race goal not found")]
  NotFound,

  #[error("No upcoming A race for athlete {0}")]
  NoUpcomingRace(i64),

  #[error("Invalid race goal: {0}")]
  Validation(String),

  #[error(transparent)]
  Plan(#[from] PlanError),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

impl Serialize for GoalError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Validation
/// ---------------------------------------------------------------------------

fn validate_hours(field: &str, value: Option<f64>) -> Result<(), GoalError> {
  match value {
    Some(v) if !v.is_finite() || v < 0.0 => Err(GoalError::Validation(format!(
      "{} must be a non-negative number of hours, got {}",
      field, v
    ))),
    _ => Ok(()),
  }
}

fn validate_name(name: &str) -> Result<(), GoalError> {
  if name.trim().is_empty() {
    return Err(GoalError::Validation("race_name is required".into()));
  }
  Ok(())
}

fn validate_new(goal: &NewRaceGoal) -> Result<(), GoalError> {
  validate_name(&goal.race_name)?;
  validate_hours("training_time_weekday_hr", goal.training_time_weekday_hr)?;
  validate_hours("training_time_weekend_hr", goal.training_time_weekend_hr)?;
  validate_hours("available_hours_per_week", goal.available_hours_per_week)
}

fn validate_update(update: &RaceGoalUpdate) -> Result<(), GoalError> {
  if let Some(name) = &update.race_name {
    validate_name(name)?;
  }
  validate_hours("training_time_weekday_hr", update.training_time_weekday_hr.flatten())?;
  validate_hours("training_time_weekend_hr", update.training_time_weekend_hr.flatten())?;
  validate_hours("available_hours_per_week", update.available_hours_per_week.flatten())
}

/// ---------------------------------------------------------------------------
/// Queries
/// ---------------------------------------------------------------------------

pub async fn create_goal(
  pool: &SqlitePool,
  athlete_id: i64,
  goal: &NewRaceGoal,
) -> Result<RaceGoal, GoalError> {
  validate_new(goal)?;

  let result = sqlx::query(
    r#"
    INSERT INTO race_goals (
      athlete_id, race_name, race_date, swim_distance_km, bike_distance_km,
      run_distance_km, target_total_time, target_swim_time, target_bike_time,
      target_run_time, target_rank, goal_type, is_a_race, motivation,
      training_time_weekday_hr, training_time_weekend_hr, available_hours_per_week,
      training_limit_comment
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
    "#,
  )
  .bind(athlete_id)
  .bind(goal.race_name.trim())
  .bind(goal.race_date)
  .bind(goal.swim_distance_km)
  .bind(goal.bike_distance_km)
  .bind(goal.run_distance_km)
  .bind(&goal.target_total_time)
  .bind(&goal.target_swim_time)
  .bind(&goal.target_bike_time)
  .bind(&goal.target_run_time)
  .bind(goal.target_rank)
  .bind(&goal.goal_type)
  .bind(goal.is_a_race)
  .bind(&goal.motivation)
  .bind(goal.training_time_weekday_hr)
  .bind(goal.training_time_weekend_hr)
  .bind(goal.available_hours_per_week)
  .bind(&goal.training_limit_comment)
  .execute(pool)
  .await?;

  let id = result.last_insert_rowid();
  info!(athlete_id, goal_id = id, race_date = %goal.race_date, "Created race goal");

  get_goal(pool, athlete_id, id).await
}

/// All goals for an athlete, nearest race first
pub async fn list_goals(pool: &SqlitePool, athlete_id: i64) -> Result<Vec<RaceGoal>, GoalError> {
  let goals = sqlx::query_as::<_, RaceGoal>(
    "SELECT * FROM race_goals WHERE athlete_id = ?1 ORDER BY race_date ASC, id ASC",
  )
  .bind(athlete_id)
  .fetch_all(pool)
  .await?;

  Ok(goals)
}

pub async fn get_goal(pool: &SqlitePool, athlete_id: i64, id: i64) -> Result<RaceGoal, GoalError> {
  sqlx::query_as::<_, RaceGoal>("SELECT * FROM race_goals WHERE id = ?1 AND athlete_id = ?2")
    .bind(id)
    .bind(athlete_id)
    .fetch_optional(pool)
    .await?
    .ok_or(GoalError::NotFound)
}

pub async fn update_goal(
  pool: &SqlitePool,
  athlete_id: i64,
  id: i64,
  update: &RaceGoalUpdate,
) -> Result<RaceGoal, GoalError> {
  validate_update(update)?;

  // Ownership check first so a foreign id reports NotFound, not a silent no-op
  let mut goal = get_goal(pool, athlete_id, id).await?;
  update.apply(&mut goal);

  sqlx::query(
    r#"
    UPDATE race_goals SET
      race_name = ?1,
      race_date = ?2,
      swim_distance_km = ?3,
      bike_distance_km = ?4,
      run_distance_km = ?5,
      target_total_time = ?6,
      target_swim_time = ?7,
      target_bike_time = ?8,
      target_run_time = ?9,
      target_rank = ?10,
      goal_type = ?11,
      is_a_race = ?12,
      motivation = ?13,
      training_time_weekday_hr = ?14,
      training_time_weekend_hr = ?15,
      available_hours_per_week = ?16,
      training_limit_comment = ?17,
      updated_at = CURRENT_TIMESTAMP
    WHERE id = ?18 AND athlete_id = ?19
    "#,
  )
  .bind(&goal.race_name)
  .bind(goal.race_date)
  .bind(goal.swim_distance_km)
  .bind(goal.bike_distance_km)
  .bind(goal.run_distance_km)
  .bind(&goal.target_total_time)
  .bind(&goal.target_swim_time)
  .bind(&goal.target_bike_time)
  .bind(&goal.target_run_time)
  .bind(goal.target_rank)
  .bind(&goal.goal_type)
  .bind(goal.is_a_race)
  .bind(&goal.motivation)
  .bind(goal.training_time_weekday_hr)
  .bind(goal.training_time_weekend_hr)
  .bind(goal.available_hours_per_week)
  .bind(&goal.training_limit_comment)
  .bind(id)
  .bind(athlete_id)
  .execute(pool)
  .await?;

  debug!(athlete_id, goal_id = id, "Updated race goal");
  get_goal(pool, athlete_id, id).await
}

pub async fn delete_goal(pool: &SqlitePool, athlete_id: i64, id: i64) -> Result<(), GoalError> {
  let result = sqlx::query("DELETE FROM race_goals WHERE id = ?1 AND athlete_id = ?2")
    .bind(id)
    .bind(athlete_id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(GoalError::NotFound);
  }

  info!(athlete_id, goal_id = id, "Deleted race goal");
  Ok(())
}

/// Nearest A race on or after `today`
pub async fn find_next_a_race(
  pool: &SqlitePool,
  athlete_id: i64,
  today: NaiveDate,
) -> Result<Option<RaceGoal>, GoalError> {
  let goal = sqlx::query_as::<_, RaceGoal>(
    r#"
    SELECT * FROM race_goals
    WHERE athlete_id = ?1 AND is_a_race = 1 AND race_date >= ?2
    ORDER BY race_date ASC, id ASC
    LIMIT 1
    "#,
  )
  .bind(athlete_id)
  .bind(today)
  .fetch_optional(pool)
  .await?;

  Ok(goal)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[tokio::test]
  async fn test_create_and_get_goal() {
    let pool = setup_test_db().await;

    let created = create_goal(&pool, 42, &sample_new_goal("Ironman Cairns", date(2026, 6, 14), true))
      .await
      .expect("Should create goal");

    assert_eq!(created.athlete_id, 42);
    assert_eq!(created.race_name, "Ironman Cairns");
    assert_eq!(created.race_date, date(2026, 6, 14));
    assert!(created.is_a_race);
    assert_eq!(created.training_time_weekday_hr, Some(1.0));
    assert_eq!(created.target_swim_time.as_deref(), Some("1:10:00"));
    assert_eq!(created.target_bike_time.as_deref(), Some("5:45:00"));
    assert_eq!(created.target_run_time.as_deref(), Some("4:15:00"));
    assert_eq!(created.target_rank, Some(12));
    assert!(created.created_at.is_some());

    let fetched = get_goal(&pool, 42, created.id).await.unwrap();
    assert_eq!(fetched, created);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_create_goal_rejects_negative_hours() {
    let pool = setup_test_db().await;

    let mut goal = sample_new_goal("Bad", date(2026, 6, 14), true);
    goal.training_time_weekend_hr = Some(-2.0);
    let result = create_goal(&pool, 42, &goal).await;
    assert!(matches!(result, Err(GoalError::Validation(_))));

    let blank = sample_new_goal("   ", date(2026, 6, 14), true);
    assert!(matches!(create_goal(&pool, 42, &blank).await, Err(GoalError::Validation(_))));

    assert!(list_goals(&pool, 42).await.unwrap().is_empty());
    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_list_goals_scoped_and_ordered() {
    let pool = setup_test_db().await;
    seed_race_goal(&pool, 1, "Late", date(2026, 9, 1), true).await;
    seed_race_goal(&pool, 1, "Early", date(2026, 4, 1), false).await;
    seed_race_goal(&pool, 2, "Other athlete", date(2026, 5, 1), true).await;

    let goals = list_goals(&pool, 1).await.unwrap();
    let names: Vec<_> = goals.iter().map(|g| g.race_name.as_str()).collect();
    assert_eq!(names, vec!["Early", "Late"]);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_get_goal_of_other_athlete_is_not_found() {
    let pool = setup_test_db().await;
    let id = seed_race_goal(&pool, 1, "Mine", date(2026, 9, 1), true).await;

    assert!(matches!(get_goal(&pool, 2, id).await, Err(GoalError::NotFound)));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_update_goal_partial() {
    let pool = setup_test_db().await;
    let id = seed_race_goal(&pool, 1, "70.3 Busselton", date(2026, 5, 2), false).await;

    let update = RaceGoalUpdate {
      is_a_race: Some(true),
      training_time_weekend_hr: Some(Some(3.5)),
      target_rank: Some(Some(3)),
      ..RaceGoalUpdate::default()
    };
    let updated = update_goal(&pool, 1, id, &update).await.unwrap();

    assert!(updated.is_a_race);
    assert_eq!(updated.training_time_weekend_hr, Some(3.5));
    assert_eq!(updated.target_rank, Some(3));
    assert_eq!(updated.race_name, "70.3 Busselton");
    assert_eq!(updated.race_date, date(2026, 5, 2));
    assert_eq!(updated.training_time_weekday_hr, Some(1.0));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_update_goal_clears_nullable_fields() {
    let pool = setup_test_db().await;
    let created = create_goal(&pool, 1, &sample_new_goal("Roth", date(2026, 7, 5), true))
      .await
      .unwrap();

    let update = RaceGoalUpdate {
      training_time_weekday_hr: Some(None),
      target_rank: Some(None),
      ..RaceGoalUpdate::default()
    };
    let updated = update_goal(&pool, 1, created.id, &update).await.unwrap();

    assert_eq!(updated.training_time_weekday_hr, None);
    assert_eq!(updated.target_rank, None);
    assert_eq!(updated.training_time_weekend_hr, Some(2.0));
    assert_eq!(updated.target_swim_time, created.target_swim_time);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_update_goal_rejects_negative_hours() {
    let pool = setup_test_db().await;
    let id = seed_race_goal(&pool, 1, "Mine", date(2026, 5, 2), true).await;

    let update = RaceGoalUpdate {
      available_hours_per_week: Some(Some(-3.0)),
      ..RaceGoalUpdate::default()
    };
    assert!(matches!(update_goal(&pool, 1, id, &update).await, Err(GoalError::Validation(_))));
    assert_eq!(get_goal(&pool, 1, id).await.unwrap().available_hours_per_week, Some(9.0));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_update_goal_wrong_owner() {
    let pool = setup_test_db().await;
    let id = seed_race_goal(&pool, 1, "Mine", date(2026, 5, 2), false).await;

    let update = RaceGoalUpdate {
      race_name: Some("Hijacked".into()),
      ..RaceGoalUpdate::default()
    };
    assert!(matches!(update_goal(&pool, 2, id, &update).await, Err(GoalError::NotFound)));
    assert_eq!(get_goal(&pool, 1, id).await.unwrap().race_name, "Mine");

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_delete_goal() {
    let pool = setup_test_db().await;
    let id = seed_race_goal(&pool, 1, "Gone", date(2026, 5, 2), true).await;

    assert!(matches!(delete_goal(&pool, 2, id).await, Err(GoalError::NotFound)));
    delete_goal(&pool, 1, id).await.expect("Owner can delete");
    assert!(matches!(get_goal(&pool, 1, id).await, Err(GoalError::NotFound)));
    assert!(matches!(delete_goal(&pool, 1, id).await, Err(GoalError::NotFound)));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_find_next_a_race() {
    let pool = setup_test_db().await;
    let today = date(2026, 3, 1);
    seed_race_goal(&pool, 1, "Past A race", date(2026, 2, 1), true).await;
    seed_race_goal(&pool, 1, "Near B race", date(2026, 3, 15), false).await;
    seed_race_goal(&pool, 1, "Far A race", date(2026, 10, 10), true).await;
    seed_race_goal(&pool, 1, "Near A race", date(2026, 6, 20), true).await;
    seed_race_goal(&pool, 2, "Someone else", date(2026, 3, 2), true).await;

    let next = find_next_a_race(&pool, 1, today).await.unwrap().unwrap();
    assert_eq!(next.race_name, "Near A race");

    assert!(find_next_a_race(&pool, 3, today).await.unwrap().is_none());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_find_next_a_race_includes_today() {
    let pool = setup_test_db().await;
    let today = date(2026, 3, 1);
    seed_race_goal(&pool, 1, "Race day", today, true).await;

    let next = find_next_a_race(&pool, 1, today).await.unwrap();
    assert_eq!(next.map(|g| g.race_name), Some("Race day".to_string()));

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_goal_error_serializes_as_message() {
    let json = serde_json::to_string(&GoalError::NoUpcomingRace(7)).unwrap();
    assert_eq!(json, "\"No upcoming A race for athlete 7\"");
  }
}

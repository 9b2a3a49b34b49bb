use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RaceGoal {
  pub id: i64,
  pub athlete_id: i64,
  pub race_name: String,
  pub race_date: NaiveDate,
  pub swim_distance_km: Option<f64>,
  pub bike_distance_km: Option<f64>,
  pub run_distance_km: Option<f64>,
  pub target_total_time: Option<String>,
  pub target_swim_time: Option<String>,
  pub target_bike_time: Option<String>,
  pub target_run_time: Option<String>,
  /// Finishing position aimed for (overall or age group)
  pub target_rank: Option<i64>,
  pub goal_type: Option<String>,
  /// Priority-A race: the one a training plan is built toward
  pub is_a_race: bool,
  pub motivation: Option<String>,
  /// Hours available per weekday
  pub training_time_weekday_hr: Option<f64>,
  /// Hours available per weekend day
  pub training_time_weekend_hr: Option<f64>,
  /// Single weekly figure used by the combined budget
  pub available_hours_per_week: Option<f64>,
  pub training_limit_comment: Option<String>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// For inserting new goals (without id, athlete, timestamps)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRaceGoal {
  pub race_name: String,
  pub race_date: NaiveDate,
  pub swim_distance_km: Option<f64>,
  pub bike_distance_km: Option<f64>,
  pub run_distance_km: Option<f64>,
  pub target_total_time: Option<String>,
  pub target_swim_time: Option<String>,
  pub target_bike_time: Option<String>,
  pub target_run_time: Option<String>,
  pub target_rank: Option<i64>,
  pub goal_type: Option<String>,
  #[serde(default)]
  pub is_a_race: bool,
  pub motivation: Option<String>,
  pub training_time_weekday_hr: Option<f64>,
  pub training_time_weekend_hr: Option<f64>,
  pub available_hours_per_week: Option<f64>,
  pub training_limit_comment: Option<String>,
}

/// Keeps "key absent" (`None`) apart from "key is null" (`Some(None)`)
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update.
///
/// `None` leaves the stored value untouched. For nullable columns
/// `Some(None)` (a JSON `null`) clears the value, so a goal can drop its
/// recorded hours and fall back to the configured defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceGoalUpdate {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub race_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub race_date: Option<NaiveDate>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub swim_distance_km: Option<Option<f64>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub bike_distance_km: Option<Option<f64>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub run_distance_km: Option<Option<f64>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub target_total_time: Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub target_swim_time: Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub target_bike_time: Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub target_run_time: Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub target_rank: Option<Option<i64>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub goal_type: Option<Option<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_a_race: Option<bool>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub motivation: Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub training_time_weekday_hr: Option<Option<f64>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub training_time_weekend_hr: Option<Option<f64>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub available_hours_per_week: Option<Option<f64>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub training_limit_comment: Option<Option<String>>,
}

fn merge<T: Clone>(field: &mut T, value: &Option<T>) {
  if let Some(value) = value {
    *field = value.clone();
  }
}

impl RaceGoalUpdate {
  /// Overlay the fields that are present onto a stored goal
  pub fn apply(&self, goal: &mut RaceGoal) {
    if let Some(name) = &self.race_name {
      goal.race_name = name.trim().to_string();
    }
    merge(&mut goal.race_date, &self.race_date);
    merge(&mut goal.swim_distance_km, &self.swim_distance_km);
    merge(&mut goal.bike_distance_km, &self.bike_distance_km);
    merge(&mut goal.run_distance_km, &self.run_distance_km);
    merge(&mut goal.target_total_time, &self.target_total_time);
    merge(&mut goal.target_swim_time, &self.target_swim_time);
    merge(&mut goal.target_bike_time, &self.target_bike_time);
    merge(&mut goal.target_run_time, &self.target_run_time);
    merge(&mut goal.target_rank, &self.target_rank);
    merge(&mut goal.goal_type, &self.goal_type);
    merge(&mut goal.is_a_race, &self.is_a_race);
    merge(&mut goal.motivation, &self.motivation);
    merge(&mut goal.training_time_weekday_hr, &self.training_time_weekday_hr);
    merge(&mut goal.training_time_weekend_hr, &self.training_time_weekend_hr);
    merge(&mut goal.available_hours_per_week, &self.available_hours_per_week);
    merge(&mut goal.training_limit_comment, &self.training_limit_comment);
  }
}

pub mod race_goal;

pub use race_goal::{NewRaceGoal, RaceGoal, RaceGoalUpdate};

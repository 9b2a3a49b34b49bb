pub mod goals;
pub mod training;

pub mod calendar;
pub mod date_bound;
pub mod measurement;
pub mod station;
pub mod time_series;

pub mod attendance;
pub mod calendar;
pub mod core;
pub mod export;
pub mod roster;
pub mod schedule;
pub mod setup;

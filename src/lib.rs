//! Calendar projection and planning state for calgrid.
//!
//! The [`calendar`] module holds the pure projector functions; [`planner`]
//! owns the task, alarm, project and list collections they operate on.

pub mod alarms;
pub mod calendar;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod overview;
pub mod planner;
pub mod tui;

use thiserror::Error;

/// Rejected input at entity-creation time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid alarm time '{0}', expected zero-padded HH:MM")]
    AlarmTime(String),

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("duration must be a positive number of hours, got {0}")]
    Duration(f64),

    #[error("unknown priority '{0}', expected high, medium or low")]
    Priority(String),

    #[error("unknown recurrence '{0}', expected daily, weekly or monthly")]
    Recurrence(String),

    #[error("parent project '{0}' does not exist")]
    UnknownParent(String),

    #[error("project '{0}' does not exist")]
    UnknownProject(String),
}

/// Errors surfaced by planner operations and the command layer.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task '{0}' not found")]
    TaskNotFound(String),

    #[error("alarm '{0}' not found")]
    AlarmNotFound(String),

    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    #[error("list '{0}' not found")]
    ListNotFound(String),

    #[error("invalid date or time '{0}'")]
    Date(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;

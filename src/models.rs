use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Task priority as shown by the priority badge.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(ValidationError::Priority(s.to_string())),
        }
    }
}

/// How often a recurring task comes back.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
}

impl FromStr for RecurrencePattern {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(RecurrencePattern::Daily),
            "weekly" => Ok(RecurrencePattern::Weekly),
            "monthly" => Ok(RecurrencePattern::Monthly),
            _ => Err(ValidationError::Recurrence(s.to_string())),
        }
    }
}

/// Recurrence descriptor attached to a task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recurrence {
    pub pattern: RecurrencePattern,
    #[serde(default)]
    pub enabled: bool,
}

/// A single scheduled task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: String,
    pub title: String,
    /// Owning project. Empty when the task is unassigned.
    #[serde(default)]
    pub project_id: String,
    /// Start instant in the display timezone.
    pub start: NaiveDateTime,
    /// Duration in hours, fractional values allowed.
    pub duration: f64,
    pub color: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub list_id: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
}

impl Task {
    /// End instant, always derived from `start` and `duration`.
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::seconds((self.duration * 3600.0).round() as i64)
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.map(|r| r.enabled).unwrap_or(false)
    }
}

/// Validated time of day for an alarm, rendered as zero-padded `HH:MM`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct AlarmTime {
    hour: u32,
    minute: u32,
}

impl AlarmTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::AlarmTime(format!("{}:{}", hour, minute)));
        }
        Ok(AlarmTime { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// True when `at` falls within this minute of the day.
    pub fn matches_minute(&self, at: NaiveTime) -> bool {
        at.hour() == self.hour && at.minute() == self.minute
    }
}

impl FromStr for AlarmTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ValidationError::AlarmTime(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(bad());
        }
        let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(bad());
        }
        let hour = s[0..2].parse::<u32>().map_err(|_| bad())?;
        let minute = s[3..5].parse::<u32>().map_err(|_| bad())?;
        AlarmTime::new(hour, minute).map_err(|_| bad())
    }
}

impl TryFrom<String> for AlarmTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlarmTime> for String {
    fn from(value: AlarmTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A time-of-day alarm. Not tied to any task or project.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Alarm {
    pub id: String,
    pub time: AlarmTime,
    pub enabled: bool,
    /// Fires every day when set, otherwise only today.
    pub recurring: bool,
    pub label: String,
    pub sound: String,
}

impl Alarm {
    /// Whether an occurrence of this alarm lands on `day`.
    pub fn occurs_on(&self, day: NaiveDate, today: NaiveDate) -> bool {
        self.enabled && (self.recurring || day == today)
    }

    /// Whether an occurrence of this alarm lands in the `(day, hour)` slot.
    pub fn occurs_at_hour(&self, day: NaiveDate, hour: u32, today: NaiveDate) -> bool {
        self.occurs_on(day, today) && self.time.hour() == hour
    }
}

/// Calendar granularity.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl ViewMode {
    /// Whether the view is split into hour-of-day rows.
    pub fn is_hourly(&self) -> bool {
        !matches!(self, ViewMode::Monthly)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewMode::Daily => "daily",
            ViewMode::Weekly => "weekly",
            ViewMode::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Hobby,
    Work,
    #[default]
    Personal,
}

/// A project inside an area. Projects nest through `parent_id`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub category: ProjectCategory,
    pub area: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// A named column of tasks on a project board.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskList {
    pub id: String,
    pub title: String,
    pub project_id: String,
}

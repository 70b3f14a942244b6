use chrono::{NaiveDateTime, Timelike};

use crate::models::Alarm;

/// Host timers are expected to poll at this interval.
pub const POLL_INTERVAL_SECS: u64 = 60;

/// Enabled alarms whose time equals `now` truncated to the minute.
pub fn matching_alarms(now: NaiveDateTime, alarms: &[Alarm]) -> Vec<&Alarm> {
    let at = now.time();
    alarms
        .iter()
        .filter(|a| a.enabled && a.time.matches_minute(at))
        .collect()
}

/// Remembers the last minute it reported so a host ticking faster than
/// once a minute sees each alarm once.
#[derive(Debug, Default)]
pub struct AlarmWatch {
    last_minute: Option<NaiveDateTime>,
}

impl AlarmWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches for the minute containing `now`, or nothing if that minute was
    /// already reported.
    pub fn poll<'a>(&mut self, now: NaiveDateTime, alarms: &'a [Alarm]) -> Vec<&'a Alarm> {
        let minute = now.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(now);
        if self.last_minute == Some(minute) {
            return Vec::new();
        }
        self.last_minute = Some(minute);
        let fired = matching_alarms(now, alarms);
        for alarm in &fired {
            tracing::info!(id = %alarm.id, label = %alarm.label, sound = %alarm.sound, "alarm due");
        }
        fired
    }
}

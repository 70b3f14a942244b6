//! Calendar projection: which days a view shows, which items sit in which
//! slot, and how a drop onto a slot reschedules a task.
//!
//! Everything here is a pure function over plain data. Callers pass `today`
//! and `now` explicitly so the current-slot highlight and alarm occupancy are
//! recomputed on every query.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{PlanError, PlanResult};
use crate::models::{Alarm, AlarmTime, Task, ViewMode};

/// Anything with a start instant that can be placed on the grid.
pub trait Scheduled {
    fn start(&self) -> NaiveDateTime;
}

impl Scheduled for Task {
    fn start(&self) -> NaiveDateTime {
        self.start
    }
}

impl<T: Scheduled> Scheduled for &T {
    fn start(&self) -> NaiveDateTime {
        (*self).start()
    }
}

/// One cell of the projected date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedDay {
    pub date: NaiveDate,
    /// False for the leading/trailing days of a monthly grid.
    pub in_month: bool,
}

/// The ordered days a view renders plus its navigation label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub view: ViewMode,
    pub anchor: NaiveDate,
    pub days: Vec<ProjectedDay>,
    pub label: String,
}

impl Projection {
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.iter().map(|d| d.date).collect()
    }
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first);
    (first, last)
}

/// Projects the visible days and label for `view` around `anchor`.
pub fn project_days(anchor: NaiveDate, view: ViewMode) -> Projection {
    let (days, label) = match view {
        ViewMode::Daily => {
            let day = ProjectedDay { date: anchor, in_month: true };
            (vec![day], anchor.format("%B %-d, %Y").to_string())
        }
        ViewMode::Weekly => {
            let start = week_start(anchor);
            let end = start + Duration::days(6);
            let days = start
                .iter_days()
                .take(7)
                .map(|date| ProjectedDay { date, in_month: true })
                .collect();
            let label = format!("{} - {}", start.format("%b %-d"), end.format("%b %-d, %Y"));
            (days, label)
        }
        ViewMode::Monthly => {
            let (first, last) = month_bounds(anchor);
            let grid_start = week_start(first);
            let grid_end = week_start(last) + Duration::days(6);
            let days = grid_start
                .iter_days()
                .take_while(|d| *d <= grid_end)
                .map(|date| ProjectedDay {
                    date,
                    in_month: date.month() == anchor.month() && date.year() == anchor.year(),
                })
                .collect();
            (days, anchor.format("%B %Y").to_string())
        }
    };
    Projection { view, anchor, days, label }
}

/// Anchor one step back: a day, a week or a month depending on `view`.
pub fn previous(anchor: NaiveDate, view: ViewMode) -> NaiveDate {
    match view {
        ViewMode::Daily => anchor - Duration::days(1),
        ViewMode::Weekly => anchor - Duration::weeks(1),
        ViewMode::Monthly => anchor.checked_sub_months(Months::new(1)).unwrap_or(anchor),
    }
}

/// Anchor one step forward: a day, a week or a month depending on `view`.
pub fn next(anchor: NaiveDate, view: ViewMode) -> NaiveDate {
    match view {
        ViewMode::Daily => anchor + Duration::days(1),
        ViewMode::Weekly => anchor + Duration::weeks(1),
        ViewMode::Monthly => anchor.checked_add_months(Months::new(1)).unwrap_or(anchor),
    }
}

/// Items starting on `day`.
pub fn bucket_for_day<T: Scheduled>(items: &[T], day: NaiveDate) -> Vec<&T> {
    items.iter().filter(|i| i.start().date() == day).collect()
}

/// Items starting on `day` within hour `hour`. Multi-hour items only appear
/// in their start slot.
pub fn bucket_for_hour<T: Scheduled>(items: &[T], day: NaiveDate, hour: u32) -> Vec<&T> {
    items
        .iter()
        .filter(|i| {
            let start = i.start();
            start.date() == day && start.hour() == hour
        })
        .collect()
}

/// Alarms with an occurrence in the `(day, hour)` slot.
pub fn alarms_for_hour(alarms: &[Alarm], day: NaiveDate, hour: u32, today: NaiveDate) -> Vec<&Alarm> {
    alarms.iter().filter(|a| a.occurs_at_hour(day, hour, today)).collect()
}

/// Alarms with an occurrence anywhere on `day`.
pub fn alarms_for_day(alarms: &[Alarm], day: NaiveDate, today: NaiveDate) -> Vec<&Alarm> {
    alarms.iter().filter(|a| a.occurs_on(day, today)).collect()
}

/// Whether `(day, hour)` is the slot containing `now`.
pub fn is_current_slot(day: NaiveDate, hour: u32, now: NaiveDateTime) -> bool {
    day == now.date() && hour == now.hour()
}

/// A bucket on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Day(NaiveDate),
    Hour(NaiveDate, u32),
}

impl Slot {
    /// Slot granularity for `view`: whole days for monthly, hours otherwise.
    pub fn for_view(view: ViewMode, day: NaiveDate, hour: u32) -> Slot {
        if view.is_hourly() {
            Slot::Hour(day, hour)
        } else {
            Slot::Day(day)
        }
    }

    pub fn day(&self) -> NaiveDate {
        match self {
            Slot::Day(d) | Slot::Hour(d, _) => *d,
        }
    }

    /// Instant a task dropped here is moved to.
    pub fn target(&self) -> NaiveDateTime {
        match self {
            Slot::Day(d) => d.and_time(NaiveTime::default()),
            Slot::Hour(d, h) => d.and_time(NaiveTime::from_hms_opt(*h, 0, 0).unwrap_or_default()),
        }
    }
}

/// Instant a task dropped onto `(day, hour)` in `view` is moved to.
pub fn drop_target(view: ViewMode, day: NaiveDate, hour: u32) -> NaiveDateTime {
    Slot::for_view(view, day, hour).target()
}

/// A single day's manifestation of an alarm.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmOccurrence<'a> {
    pub alarm: &'a Alarm,
    pub date: NaiveDate,
}

impl AlarmOccurrence<'_> {
    pub fn time(&self) -> AlarmTime {
        self.alarm.time
    }
}

/// What a slot renders.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarItem<'a> {
    Task(&'a Task),
    Alarm(AlarmOccurrence<'a>),
}

impl CalendarItem<'_> {
    pub fn title(&self) -> &str {
        match self {
            CalendarItem::Task(t) => &t.title,
            CalendarItem::Alarm(o) => &o.alarm.label,
        }
    }

    /// Only tasks can be picked up and dropped elsewhere.
    pub fn is_draggable(&self) -> bool {
        matches!(self, CalendarItem::Task(_))
    }

    /// Whether this item belongs in `slot`.
    pub fn occupies(&self, slot: Slot) -> bool {
        match (self, slot) {
            (CalendarItem::Task(t), Slot::Day(d)) => t.start.date() == d,
            (CalendarItem::Task(t), Slot::Hour(d, h)) => t.start.date() == d && t.start.hour() == h,
            (CalendarItem::Alarm(o), Slot::Day(d)) => o.date == d,
            (CalendarItem::Alarm(o), Slot::Hour(d, h)) => o.date == d && o.alarm.time.hour() == h,
        }
    }
}

/// Tasks followed by alarm occurrences for `slot`, each in insertion order.
pub fn slot_items<'a>(tasks: &'a [Task], alarms: &'a [Alarm], slot: Slot, today: NaiveDate) -> Vec<CalendarItem<'a>> {
    let (slot_tasks, slot_alarms) = match slot {
        Slot::Day(d) => (bucket_for_day(tasks, d), alarms_for_day(alarms, d, today)),
        Slot::Hour(d, h) => (bucket_for_hour(tasks, d, h), alarms_for_hour(alarms, d, h, today)),
    };
    let date = slot.day();
    slot_tasks
        .into_iter()
        .map(CalendarItem::Task)
        .chain(slot_alarms.into_iter().map(|alarm| CalendarItem::Alarm(AlarmOccurrence { alarm, date })))
        .collect()
}

/// Returns `tasks` with the start of task `id` moved to `target`.
///
/// Every other field is untouched. An unknown `id` yields a copy of the input.
pub fn reschedule_task(tasks: &[Task], id: &str, target: NaiveDateTime) -> Vec<Task> {
    tasks
        .iter()
        .map(|t| {
            if t.id == id {
                Task { start: target, ..t.clone() }
            } else {
                t.clone()
            }
        })
        .collect()
}

/// Like [`reschedule_task`] but reports an unknown `id`.
pub fn try_reschedule_task(tasks: &[Task], id: &str, target: NaiveDateTime) -> PlanResult<Vec<Task>> {
    if !tasks.iter().any(|t| t.id == id) {
        return Err(PlanError::TaskNotFound(id.to_string()));
    }
    Ok(reschedule_task(tasks, id, target))
}

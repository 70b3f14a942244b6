use std::path::Path;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::alarms::matching_alarms;
use crate::calendar::{self, is_current_slot, project_days, slot_items, CalendarItem, Projection, Slot};
use crate::config::{self, load_settings, plan_or_sample, save_settings};
use crate::error::{PlanError, PlanResult};
use crate::models::{AlarmTime, ViewMode};
use crate::overview::{area_stats, areas, today_overview};
use crate::planner::Planner;

/// Parses `YYYY-MM-DD`, defaulting to today when absent.
pub fn parse_date(input: Option<&str>) -> PlanResult<NaiveDate> {
    match input {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| PlanError::Date(s.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}

/// Parses `YYYY-MM-DDTHH:MM` (a space also works in place of `T`) or a bare
/// date, which means midnight.
pub fn parse_instant(input: &str) -> PlanResult<NaiveDateTime> {
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(at);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::default()))
        .map_err(|_| PlanError::Date(input.to_string()))
}

/// One occupied slot in an agenda listing.
#[derive(Debug, Clone, PartialEq)]
pub struct AgendaRow {
    pub date: NaiveDate,
    /// `None` for whole-day slots of the monthly view.
    pub hour: Option<u32>,
    pub title: String,
    pub is_alarm: bool,
    /// `HH:MM-HH:MM` for tasks, `HH:MM` for alarms.
    pub time: String,
    pub current: bool,
}

/// Every occupied slot of `projection`, in day then hour order.
pub fn agenda_rows(plan: &Planner, projection: &Projection, now: NaiveDateTime) -> Vec<AgendaRow> {
    let today = now.date();
    let mut rows = Vec::new();
    for day in &projection.days {
        let slots: Vec<Slot> = if projection.view.is_hourly() {
            (0..24).map(|h| Slot::Hour(day.date, h)).collect()
        } else {
            vec![Slot::Day(day.date)]
        };
        for slot in slots {
            let hour = match slot {
                Slot::Hour(_, h) => Some(h),
                Slot::Day(_) => None,
            };
            let current = hour.map(|h| is_current_slot(day.date, h, now)).unwrap_or(false);
            for item in slot_items(&plan.tasks, &plan.alarms, slot, today) {
                let time = match &item {
                    CalendarItem::Task(t) => format!("{}-{}", t.start.format("%H:%M"), t.end().format("%H:%M")),
                    CalendarItem::Alarm(o) => o.time().to_string(),
                };
                rows.push(AgendaRow {
                    date: day.date,
                    hour,
                    title: item.title().to_string(),
                    is_alarm: !item.is_draggable(),
                    time,
                    current,
                });
            }
        }
    }
    rows
}

/// Prints the days projected for `view` around `date`.
pub fn cmd_days(view: ViewMode, date: Option<String>) -> PlanResult<()> {
    let anchor = parse_date(date.as_deref())?;
    let projection = project_days(anchor, view);
    let today = Local::now().date_naive();

    println!("{} ({})", projection.label, view);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Mon").add_attribute(Attribute::Bold),
            Cell::new("Tue").add_attribute(Attribute::Bold),
            Cell::new("Wed").add_attribute(Attribute::Bold),
            Cell::new("Thu").add_attribute(Attribute::Bold),
            Cell::new("Fri").add_attribute(Attribute::Bold),
            Cell::new("Sat").add_attribute(Attribute::Bold),
            Cell::new("Sun").add_attribute(Attribute::Bold),
        ]);

    let lead = projection
        .days
        .first()
        .map(|d| d.date.weekday().num_days_from_monday() as usize)
        .unwrap_or(0);
    let mut cells: Vec<Cell> = (0..lead).map(|_| Cell::new("")).collect();
    for day in &projection.days {
        let color = if day.date == today {
            Color::Cyan
        } else if !day.in_month {
            Color::DarkGrey
        } else {
            Color::Reset
        };
        cells.push(Cell::new(day.date.format("%b %-d")).fg(color));
    }
    for week in cells.chunks(7) {
        table.add_row(week.to_vec());
    }
    println!("{table}");
    Ok(())
}

/// Prints every occupied slot of the projected range.
pub fn cmd_agenda(plan: Option<&Path>, view: ViewMode, date: Option<String>) -> PlanResult<()> {
    let anchor = parse_date(date.as_deref())?;
    let now = Local::now().naive_local();
    let planner = plan_or_sample(plan, now.date())?;
    let projection = project_days(anchor, view);
    let rows = agenda_rows(&planner, &projection, now);

    println!("{} ({})", projection.label, view);
    if rows.is_empty() {
        println!("Nothing scheduled.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Day").add_attribute(Attribute::Bold),
            Cell::new("Slot").add_attribute(Attribute::Bold),
            Cell::new("Item").add_attribute(Attribute::Bold),
            Cell::new("Time").add_attribute(Attribute::Bold),
        ]);
    for row in rows {
        let slot = row.hour.map(|h| format!("{:02}:00", h)).unwrap_or_else(|| "all day".into());
        let title = if row.is_alarm { format!("(alarm) {}", row.title) } else { row.title };
        let color = if row.current {
            Color::Cyan
        } else if row.is_alarm {
            Color::Magenta
        } else {
            Color::Reset
        };
        table.add_row(vec![
            Cell::new(row.date.format("%a %b %-d")),
            Cell::new(slot),
            Cell::new(title).fg(color),
            Cell::new(row.time),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Moves task `id` to `target` and prints the updated plan as JSON.
///
/// An unknown id leaves the plan unchanged unless `strict` is set.
pub fn cmd_reschedule(plan: &Path, id: &str, target: &str, strict: bool) -> PlanResult<()> {
    let mut planner = config::load_plan(plan)?;
    let at = parse_instant(target)?;
    planner.tasks = if strict {
        calendar::try_reschedule_task(&planner.tasks, id, at)?
    } else {
        calendar::reschedule_task(&planner.tasks, id, at)
    };
    println!("{}", serde_json::to_string_pretty(&planner)?);
    Ok(())
}

/// Lists alarms due at the current minute, or at `at` (`HH:MM`) today.
pub fn cmd_alarms(plan: Option<&Path>, at: Option<String>) -> PlanResult<()> {
    let mut now = Local::now().naive_local();
    if let Some(s) = at {
        let time: AlarmTime = s.parse()?;
        now = now
            .date()
            .and_time(NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or_default());
    }
    let planner = plan_or_sample(plan, now.date())?;
    let due = matching_alarms(now, &planner.alarms);
    if due.is_empty() {
        println!("No alarms due at {}.", now.format("%H:%M"));
        return Ok(());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["ID", "Time", "Label", "Sound", "Repeats"]);
    for alarm in due {
        table.add_row(vec![
            alarm.id.clone(),
            alarm.time.to_string(),
            alarm.label.clone(),
            alarm.sound.clone(),
            if alarm.recurring { "daily".into() } else { "once".into() },
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Prints today's progress and per-area statistics.
pub fn cmd_overview(plan: Option<&Path>) -> PlanResult<()> {
    let now = Local::now().naive_local();
    let planner = plan_or_sample(plan, now.date())?;
    let overview = today_overview(&planner.tasks, now);

    println!(
        "Today: {} tasks, {} done ({:.0}%)",
        overview.tasks.len(),
        overview.completed,
        overview.completion_rate
    );
    if overview.upcoming.is_empty() {
        println!("No upcoming tasks for today!");
    } else {
        println!("Upcoming:");
        for t in &overview.upcoming {
            println!("  {}  {}", t.start.format("%H:%M"), t.title);
        }
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Area", "Projects", "Tasks", "Done", "Today"]);
    for area in areas(&planner.projects) {
        let stats = area_stats(area, &planner.projects, &planner.tasks, now.date());
        table.add_row(vec![
            area.to_string(),
            stats.projects.to_string(),
            stats.total.to_string(),
            stats.completed.to_string(),
            stats.active_today.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Shows settings, updating and saving them first if any value is given.
pub fn cmd_settings(dark_mode: Option<bool>, view: Option<ViewMode>) -> PlanResult<()> {
    let mut settings = load_settings();
    if dark_mode.is_some() || view.is_some() {
        if let Some(d) = dark_mode {
            settings.dark_mode = d;
        }
        if let Some(v) = view {
            settings.default_view = v;
        }
        save_settings(&settings)?;
        println!("Settings saved to {}", config::settings_path().display());
    }
    println!("dark mode:    {}", if settings.dark_mode { "on" } else { "off" });
    println!("default view: {}", settings.default_view);
    Ok(())
}

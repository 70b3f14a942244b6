use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{Project, Task};

/// Number of upcoming tasks the overview lists.
pub const UPCOMING_LIMIT: usize = 5;

/// Summary of today's tasks for the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct TodayOverview<'a> {
    pub tasks: Vec<&'a Task>,
    pub completed: usize,
    /// Percentage of today's tasks that are done, 0 when there are none.
    pub completion_rate: f64,
    /// Next unfinished tasks starting after `now`, earliest first.
    pub upcoming: Vec<&'a Task>,
}

/// Builds the overview for the day containing `now`.
pub fn today_overview(tasks: &[Task], now: NaiveDateTime) -> TodayOverview<'_> {
    let today = now.date();
    let todays: Vec<&Task> = tasks.iter().filter(|t| t.start.date() == today).collect();
    let completed = todays.iter().filter(|t| t.completed).count();
    let completion_rate = percent(completed, todays.len());

    let mut upcoming: Vec<&Task> = todays
        .iter()
        .copied()
        .filter(|t| !t.completed && t.start > now)
        .collect();
    upcoming.sort_by_key(|t| t.start);
    upcoming.truncate(UPCOMING_LIMIT);

    TodayOverview { tasks: todays, completed, completion_rate, upcoming }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Task counts for a project board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub percent: f64,
}

pub fn project_progress(project_id: &str, tasks: &[Task]) -> Progress {
    let owned: Vec<&Task> = tasks.iter().filter(|t| t.project_id == project_id).collect();
    let completed = owned.iter().filter(|t| t.completed).count();
    Progress { total: owned.len(), completed, percent: percent(completed, owned.len()) }
}

/// Task counts across every project in an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaStats {
    pub projects: usize,
    pub total: usize,
    pub completed: usize,
    pub active_today: usize,
}

pub fn area_stats(area: &str, projects: &[Project], tasks: &[Task], today: NaiveDate) -> AreaStats {
    let ids: Vec<&str> = projects
        .iter()
        .filter(|p| p.area == area)
        .map(|p| p.id.as_str())
        .collect();
    let in_area: Vec<&Task> = tasks
        .iter()
        .filter(|t| ids.contains(&t.project_id.as_str()))
        .collect();
    AreaStats {
        projects: ids.len(),
        total: in_area.len(),
        completed: in_area.iter().filter(|t| t.completed).count(),
        active_today: in_area.iter().filter(|t| t.start.date() == today).count(),
    }
}

/// Distinct area names in first-seen order.
pub fn areas(projects: &[Project]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for p in projects {
        if !names.contains(&p.area.as_str()) {
            names.push(&p.area);
        }
    }
    names
}

use std::collections::HashSet;

use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::{PlanError, PlanResult, ValidationError};
use crate::models::{
    Alarm, AlarmTime, Priority, Project, ProjectCategory, Recurrence, RecurrencePattern, Task, TaskList,
};

/// Color used for tasks without a project.
pub const DEFAULT_TASK_COLOR: &str = "#6B7280";

/// Input for creating a task.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub project_id: String,
    pub start: NaiveDateTime,
    pub duration: f64,
    pub priority: Priority,
    pub color: Option<String>,
    pub list_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub recurrence: Option<RecurrencePattern>,
}

impl TaskDraft {
    /// One-hour, medium-priority task with no project.
    pub fn new(title: impl Into<String>, start: NaiveDateTime) -> Self {
        TaskDraft {
            title: title.into(),
            project_id: String::new(),
            start,
            duration: 1.0,
            priority: Priority::Medium,
            color: None,
            list_id: None,
            due_date: None,
            recurrence: None,
        }
    }
}

/// Field-wise edit of a task. `None` leaves the field alone; for optional
/// fields `Some(None)` clears them. An empty `project_id` unassigns the task.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub project_id: Option<String>,
    pub duration: Option<f64>,
    pub priority: Option<Priority>,
    pub color: Option<String>,
    pub list_id: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub recurrence: Option<Option<Recurrence>>,
}

/// Input for creating an alarm. `time` is validated on submission.
#[derive(Debug, Clone)]
pub struct AlarmDraft {
    pub time: String,
    pub label: String,
    pub sound: String,
    pub recurring: bool,
}

impl Default for AlarmDraft {
    fn default() -> Self {
        AlarmDraft {
            time: "07:00".into(),
            label: "Morning Alarm".into(),
            sound: "bell".into(),
            recurring: true,
        }
    }
}

/// Input for creating a project.
#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub name: String,
    pub color: String,
    pub category: ProjectCategory,
    pub area: String,
    pub parent_id: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Application state owned by the host. The calendar functions take slices of
/// these collections; the planner applies the resulting changes.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Planner {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub lists: Vec<TaskList>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub alarms: Vec<Alarm>,
}

/// Next free numeric id across `ids`. Non-numeric ids are ignored.
fn next_id<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let max = ids.filter_map(|id| id.parse::<u64>().ok()).max().unwrap_or(0);
    (max + 1).to_string()
}

/// Moves the entry at `source` to index `target`, shifting the rest.
fn splice_move<T>(items: &mut Vec<T>, source: usize, target: usize) {
    let moved = items.remove(source);
    items.insert(target.min(items.len()), moved);
}

/// Moves `source` to the position of `target` among the entries selected by
/// `in_group`, keeping everything else first in its original order. Leaves
/// `tasks` untouched when either id is missing from the group.
fn reorder_group<F>(tasks: &mut Vec<Task>, in_group: F, source: &str, target: &str) -> bool
where
    F: Fn(&Task) -> bool,
{
    let source_idx = tasks.iter().filter(|t| in_group(*t)).position(|t| t.id == source);
    let target_idx = tasks.iter().filter(|t| in_group(*t)).position(|t| t.id == target);
    let (Some(s), Some(t)) = (source_idx, target_idx) else {
        return false;
    };
    let (mut group, others): (Vec<Task>, Vec<Task>) = tasks.drain(..).partition(|t| in_group(t));
    splice_move(&mut group, s, t);
    *tasks = others;
    tasks.extend(group);
    true
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed data: three projects across three areas, two tasks on `today` and
    /// a recurring wake-up alarm.
    pub fn sample(today: NaiveDate) -> Self {
        let at = |h: u32| today.and_time(NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_default());
        let project = |id: &str, name: &str, color: &str, category, area: &str| Project {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            category,
            area: area.into(),
            parent_id: None,
            due_date: None,
        };
        let task = |id: &str, title: &str, project_id: &str, start, color: &str, priority| Task {
            id: id.into(),
            title: title.into(),
            project_id: project_id.into(),
            start,
            duration: 1.0,
            color: color.into(),
            priority,
            completed: false,
            list_id: None,
            due_date: None,
            recurrence: None,
        };
        Planner {
            projects: vec![
                project("1", "Learning Spanish", "#10B981", ProjectCategory::Hobby, "Education"),
                project("2", "Work Out", "#F59E0B", ProjectCategory::Personal, "Wellness"),
                project("3", "MindTrack: Otto", "#3B82F6", ProjectCategory::Work, "Development"),
            ],
            lists: Vec::new(),
            tasks: vec![
                task("1", "Spanish Vocabulary", "1", at(9), "#10B981", Priority::Medium),
                task("2", "Morning Workout", "2", at(7), "#F59E0B", Priority::High),
            ],
            alarms: AlarmTime::new(6, 30)
                .into_iter()
                .map(|time| Alarm {
                    id: "1".into(),
                    time,
                    enabled: true,
                    recurring: true,
                    label: "Morning Wake-up".into(),
                    sound: "birds".into(),
                })
                .collect(),
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn task_mut(&mut self, id: &str) -> PlanResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| PlanError::TaskNotFound(id.to_string()))
    }

    /// Validates `draft` and appends the task. Returns the new id.
    pub fn add_task(&mut self, draft: TaskDraft) -> PlanResult<String> {
        if draft.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        if !(draft.duration.is_finite() && draft.duration > 0.0) {
            return Err(ValidationError::Duration(draft.duration).into());
        }
        let project_color = if draft.project_id.is_empty() {
            None
        } else {
            let project = self
                .project(&draft.project_id)
                .ok_or_else(|| ValidationError::UnknownProject(draft.project_id.clone()))?;
            Some(project.color.clone())
        };
        let id = next_id(self.tasks.iter().map(|t| t.id.as_str()));
        let color = draft
            .color
            .or(project_color)
            .unwrap_or_else(|| DEFAULT_TASK_COLOR.to_string());
        self.tasks.push(Task {
            id: id.clone(),
            title: draft.title,
            project_id: draft.project_id,
            start: draft.start,
            duration: draft.duration,
            color,
            priority: draft.priority,
            completed: false,
            list_id: draft.list_id,
            due_date: draft.due_date,
            recurrence: draft.recurrence.map(|pattern| Recurrence { pattern, enabled: true }),
        });
        tracing::debug!(%id, "task added");
        Ok(id)
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> PlanResult<()> {
        if let Some(d) = patch.duration {
            if !(d.is_finite() && d > 0.0) {
                return Err(ValidationError::Duration(d).into());
            }
        }
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyTitle.into());
            }
        }
        if let Some(project_id) = &patch.project_id {
            if !project_id.is_empty() && self.project(project_id).is_none() {
                return Err(ValidationError::UnknownProject(project_id.clone()).into());
            }
        }
        if let Some(Some(list_id)) = &patch.list_id {
            if !self.lists.iter().any(|l| &l.id == list_id) {
                return Err(PlanError::ListNotFound(list_id.clone()));
            }
        }
        let task = self.task_mut(id)?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(d) = patch.duration {
            task.duration = d;
        }
        if let Some(p) = patch.priority {
            task.priority = p;
        }
        if let Some(c) = patch.color {
            task.color = c;
        }
        if let Some(p) = patch.project_id {
            task.project_id = p;
        }
        if let Some(l) = patch.list_id {
            task.list_id = l;
        }
        if let Some(d) = patch.due_date {
            task.due_date = d;
        }
        if let Some(r) = patch.recurrence {
            task.recurrence = r;
        }
        Ok(())
    }

    pub fn delete_task(&mut self, id: &str) -> PlanResult<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Err(PlanError::TaskNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Flips completion. Completing a task with an enabled recurrence adds
    /// the next occurrence unless it is already in the plan. Returns the new
    /// completion state.
    pub fn toggle_task(&mut self, id: &str) -> PlanResult<bool> {
        let task = self.task_mut(id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        let follow_up = match task.recurrence {
            Some(r) if completed && r.enabled => Some((task.clone(), r.pattern)),
            _ => None,
        };

        if let Some((done, pattern)) = follow_up {
            let shift = |at: NaiveDateTime| match pattern {
                RecurrencePattern::Daily => at + Duration::days(1),
                RecurrencePattern::Weekly => at + Duration::weeks(1),
                RecurrencePattern::Monthly => at.checked_add_months(Months::new(1)).unwrap_or(at),
            };
            let next_start = shift(done.start);
            let already_spawned = self
                .tasks
                .iter()
                .any(|t| {
                    t.id != done.id
                        && t.title == done.title
                        && t.project_id == done.project_id
                        && t.start == next_start
                });
            if already_spawned {
                return Ok(completed);
            }
            let next_due = done
                .due_date
                .map(|d| shift(d.and_time(NaiveTime::default())).date());
            let next = Task {
                id: next_id(self.tasks.iter().map(|t| t.id.as_str())),
                start: next_start,
                due_date: next_due,
                completed: false,
                ..done
            };
            tracing::debug!(from = %id, to = %next.id, start = %next.start, "recurring task rolled over");
            self.tasks.push(next);
        }
        Ok(completed)
    }

    /// Moves task `id` to `target`. Returns false when no such task exists.
    pub fn reschedule(&mut self, id: &str, target: NaiveDateTime) -> bool {
        match calendar::try_reschedule_task(&self.tasks, id, target) {
            Ok(tasks) => {
                self.tasks = tasks;
                tracing::debug!(%id, %target, "task rescheduled");
                true
            }
            Err(e) => {
                tracing::debug!("reschedule ignored: {}", e);
                false
            }
        }
    }

    /// Moves `source` to the position of `target` within a project.
    pub fn reorder_task(&mut self, project_id: &str, source: &str, target: &str) -> bool {
        reorder_group(&mut self.tasks, |t| t.project_id == project_id, source, target)
    }

    /// Moves `source` to the position of `target` within a list.
    pub fn reorder_in_list(&mut self, list_id: &str, source: &str, target: &str) -> bool {
        reorder_group(&mut self.tasks, |t| t.list_id.as_deref() == Some(list_id), source, target)
    }

    /// Assigns task `id` to list `list_id`. With `before`, the task is then
    /// moved to that task's position inside the list; a missing `before`
    /// leaves the order alone.
    pub fn move_task_to_list(&mut self, id: &str, list_id: &str, before: Option<&str>) -> PlanResult<()> {
        if !self.lists.iter().any(|l| l.id == list_id) {
            return Err(PlanError::ListNotFound(list_id.to_string()));
        }
        self.task_mut(id)?.list_id = Some(list_id.to_string());
        if let Some(before) = before {
            self.reorder_in_list(list_id, id, before);
        }
        Ok(())
    }

    /// Parses the alarm time and appends an enabled alarm. Returns the new id.
    pub fn add_alarm(&mut self, draft: AlarmDraft) -> PlanResult<String> {
        let time: AlarmTime = draft.time.parse()?;
        let id = next_id(self.alarms.iter().map(|a| a.id.as_str()));
        self.alarms.push(Alarm {
            id: id.clone(),
            time,
            enabled: true,
            recurring: draft.recurring,
            label: draft.label,
            sound: draft.sound,
        });
        Ok(id)
    }

    /// Flips `enabled`. Returns the new state.
    pub fn toggle_alarm(&mut self, id: &str) -> PlanResult<bool> {
        let alarm = self
            .alarms
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| PlanError::AlarmNotFound(id.to_string()))?;
        alarm.enabled = !alarm.enabled;
        Ok(alarm.enabled)
    }

    pub fn delete_alarm(&mut self, id: &str) -> PlanResult<()> {
        let before = self.alarms.len();
        self.alarms.retain(|a| a.id != id);
        if self.alarms.len() == before {
            return Err(PlanError::AlarmNotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn add_project(&mut self, draft: ProjectDraft) -> PlanResult<String> {
        if draft.name.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        if let Some(parent) = &draft.parent_id {
            if self.project(parent).is_none() {
                return Err(ValidationError::UnknownParent(parent.clone()).into());
            }
        }
        let id = next_id(self.projects.iter().map(|p| p.id.as_str()));
        self.projects.push(Project {
            id: id.clone(),
            name: draft.name,
            color: draft.color,
            category: draft.category,
            area: draft.area,
            parent_id: draft.parent_id,
            due_date: draft.due_date,
        });
        Ok(id)
    }

    pub fn rename_project(&mut self, id: &str, name: &str) -> PlanResult<()> {
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PlanError::ProjectNotFound(id.to_string()))?;
        project.name = name.to_string();
        Ok(())
    }

    /// Moves project `source` to the position of `target`. No-op when either
    /// id is missing.
    pub fn reorder_project(&mut self, source: &str, target: &str) -> bool {
        let source_idx = self.projects.iter().position(|p| p.id == source);
        let target_idx = self.projects.iter().position(|p| p.id == target);
        match (source_idx, target_idx) {
            (Some(s), Some(t)) => {
                splice_move(&mut self.projects, s, t);
                true
            }
            _ => false,
        }
    }

    /// Direct sub-projects of `id`.
    pub fn children(&self, id: &str) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| p.parent_id.as_deref() == Some(id))
            .collect()
    }

    /// `id` and every project nested below it.
    fn subtree(&self, id: &str) -> HashSet<String> {
        let mut found = HashSet::new();
        let mut pending = vec![id.to_string()];
        while let Some(current) = pending.pop() {
            if !found.insert(current.clone()) {
                continue;
            }
            pending.extend(self.children(&current).into_iter().map(|p| p.id.clone()));
        }
        found
    }

    /// Removes a project with its sub-projects, their tasks and their lists.
    pub fn delete_project(&mut self, id: &str) -> PlanResult<()> {
        if self.project(id).is_none() {
            return Err(PlanError::ProjectNotFound(id.to_string()));
        }
        let doomed = self.subtree(id);
        self.projects.retain(|p| !doomed.contains(&p.id));
        self.tasks.retain(|t| !doomed.contains(&t.project_id));
        self.lists.retain(|l| !doomed.contains(&l.project_id));
        tracing::debug!(%id, removed = doomed.len(), "project deleted");
        Ok(())
    }

    pub fn add_list(&mut self, project_id: &str, title: &str) -> PlanResult<String> {
        if self.project(project_id).is_none() {
            return Err(ValidationError::UnknownProject(project_id.to_string()).into());
        }
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        let id = next_id(self.lists.iter().map(|l| l.id.as_str()));
        self.lists.push(TaskList {
            id: id.clone(),
            title: title.to_string(),
            project_id: project_id.to_string(),
        });
        Ok(id)
    }

    pub fn rename_list(&mut self, id: &str, title: &str) -> PlanResult<()> {
        let list = self
            .lists
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| PlanError::ListNotFound(id.to_string()))?;
        list.title = title.to_string();
        Ok(())
    }

    /// Removes a list. Its tasks stay, detached from any list.
    pub fn delete_list(&mut self, id: &str) -> PlanResult<()> {
        let before = self.lists.len();
        self.lists.retain(|l| l.id != id);
        if self.lists.len() == before {
            return Err(PlanError::ListNotFound(id.to_string()));
        }
        for task in self.tasks.iter_mut() {
            if task.list_id.as_deref() == Some(id) {
                task.list_id = None;
            }
        }
        Ok(())
    }
}

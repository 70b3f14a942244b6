use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::alarms::AlarmWatch;
use crate::calendar::{self, drop_target, project_days, slot_items, CalendarItem, Projection, Slot};
use crate::config::{save_settings, Settings};
use crate::models::ViewMode;
use crate::planner::{AlarmDraft, Planner, TaskDraft};

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    AddingTask,
    AddingAlarm,
}

/// State for the multi-step "Add Task" and "Add Alarm" wizards.
#[derive(Default)]
pub struct AddState {
    pub title: String,
    pub project_id: String,
    pub time: String,
    pub step: usize,
}

pub struct App {
    pub planner: Planner,
    pub settings: Settings,
    pub view: ViewMode,
    pub anchor: NaiveDate,
    pub projection: Projection,
    /// Index into `projection.days`.
    pub cursor_day: usize,
    pub cursor_hour: u32,
    /// Index of the highlighted item inside the cursor slot.
    pub cursor_item: usize,
    /// Task picked up and waiting to be dropped.
    pub carrying: Option<String>,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    pub status: Option<String>,
    pub alarm_watch: AlarmWatch,
}

impl App {
    /// Creates a new App anchored on today.
    pub fn new(planner: Planner, settings: Settings) -> App {
        let now = Local::now().naive_local();
        let view = settings.default_view;
        let anchor = now.date();
        let mut app = App {
            planner,
            settings,
            view,
            anchor,
            projection: project_days(anchor, view),
            cursor_day: 0,
            cursor_hour: now.hour(),
            cursor_item: 0,
            carrying: None,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            status: None,
            alarm_watch: AlarmWatch::new(),
        };
        app.reproject();
        app.focus_date(anchor);
        app
    }

    fn reproject(&mut self) {
        self.projection = project_days(self.anchor, self.view);
        if self.cursor_day >= self.projection.days.len() {
            self.cursor_day = self.projection.days.len().saturating_sub(1);
        }
        self.cursor_item = 0;
    }

    fn focus_date(&mut self, date: NaiveDate) {
        if let Some(i) = self.projection.days.iter().position(|d| d.date == date) {
            self.cursor_day = i;
        }
    }

    pub fn cursor_date(&self) -> NaiveDate {
        self.projection
            .days
            .get(self.cursor_day)
            .map(|d| d.date)
            .unwrap_or(self.anchor)
    }

    pub fn cursor_slot(&self) -> Slot {
        Slot::for_view(self.view, self.cursor_date(), self.cursor_hour)
    }

    pub fn items_at(&self, slot: Slot) -> Vec<CalendarItem<'_>> {
        slot_items(&self.planner.tasks, &self.planner.alarms, slot, Local::now().date_naive())
    }

    /// Id of the highlighted task in the cursor slot, if any.
    fn selected_task_id(&self) -> Option<String> {
        let items = self.items_at(self.cursor_slot());
        match items.get(self.cursor_item) {
            Some(CalendarItem::Task(t)) => Some(t.id.clone()),
            _ => None,
        }
    }

    pub fn set_view(&mut self, view: ViewMode) {
        let date = self.cursor_date();
        self.view = view;
        self.anchor = date;
        self.reproject();
        self.focus_date(date);
    }

    pub fn previous_period(&mut self) {
        self.anchor = calendar::previous(self.anchor, self.view);
        self.reproject();
        self.focus_date(self.anchor);
    }

    pub fn next_period(&mut self) {
        self.anchor = calendar::next(self.anchor, self.view);
        self.reproject();
        self.focus_date(self.anchor);
    }

    pub fn go_to_today(&mut self) {
        let now = Local::now().naive_local();
        self.anchor = now.date();
        self.cursor_hour = now.hour();
        self.reproject();
        self.focus_date(self.anchor);
    }

    /// Moves the cursor by `delta` days, paging the view at its edges.
    pub fn move_day(&mut self, delta: i64) {
        let target = self.cursor_date() + chrono::Duration::days(delta);
        if !self.projection.days.iter().any(|d| d.date == target) {
            self.anchor = target;
            self.reproject();
        }
        self.focus_date(target);
        self.cursor_item = 0;
    }

    /// Moves the cursor up or down: hours in hourly views, weeks in monthly.
    pub fn move_vertical(&mut self, delta: i32) {
        if self.view.is_hourly() {
            self.cursor_hour = (self.cursor_hour as i32 + delta).clamp(0, 23) as u32;
            self.cursor_item = 0;
        } else {
            self.move_day(delta as i64 * 7);
        }
    }

    /// Cycles the highlighted item inside the cursor slot.
    pub fn next_item(&mut self) {
        let count = self.items_at(self.cursor_slot()).len();
        self.cursor_item = if count == 0 { 0 } else { (self.cursor_item + 1) % count };
    }

    /// Picks up the highlighted task, or drops the carried one on the cursor.
    pub fn grab_or_drop(&mut self) {
        match self.carrying.take() {
            Some(id) => {
                let target = drop_target(self.view, self.cursor_date(), self.cursor_hour);
                if self.planner.reschedule(&id, target) {
                    self.status = Some(format!("Moved to {}", target.format("%a %b %-d %H:%M")));
                } else {
                    self.status = Some("Task no longer exists".into());
                }
            }
            None => match self.selected_task_id() {
                Some(id) => {
                    let title = self.planner.task(&id).map(|t| t.title.clone()).unwrap_or_default();
                    self.status = Some(format!("Carrying '{}': move and press Enter to drop", title));
                    self.carrying = Some(id);
                }
                None => self.status = Some("No task here".into()),
            },
        }
    }

    pub fn cancel_carry(&mut self) {
        if self.carrying.take().is_some() {
            self.status = Some("Move cancelled".into());
        }
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            match self.planner.toggle_task(&id) {
                Ok(done) => self.status = Some(if done { "Completed".into() } else { "Reopened".into() }),
                Err(e) => self.status = Some(e.to_string()),
            }
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            if let Err(e) = self.planner.delete_task(&id) {
                self.status = Some(e.to_string());
            }
            self.cursor_item = 0;
        }
    }

    /// Flips dark mode and persists it.
    pub fn toggle_dark_mode(&mut self) {
        self.settings.dark_mode = !self.settings.dark_mode;
        if let Err(e) = save_settings(&self.settings) {
            tracing::warn!("failed to save settings: {}", e);
            self.status = Some(format!("Settings not saved: {}", e));
        }
    }

    /// Runs the alarm check for `now`; fired alarms land in the status line.
    pub fn tick(&mut self, now: NaiveDateTime) {
        let fired: Vec<String> = self
            .alarm_watch
            .poll(now, &self.planner.alarms)
            .iter()
            .map(|a| format!("{} {}", a.time, a.label))
            .collect();
        if !fired.is_empty() {
            self.status = Some(format!("Alarm: {}", fired.join(", ")));
        }
    }

    /// Initiates the "Add Task" wizard for the cursor slot.
    pub fn start_add_task(&mut self) {
        self.input_mode = InputMode::AddingTask;
        self.add_state = AddState {
            time: format!("{:02}:00", if self.view.is_hourly() { self.cursor_hour } else { 9 }),
            ..AddState::default()
        };
        self.input_buffer.clear();
    }

    pub fn start_add_alarm(&mut self) {
        self.input_mode = InputMode::AddingAlarm;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::AddingTask => self.handle_task_input(),
            InputMode::AddingAlarm => self.handle_alarm_input(),
            InputMode::Normal => {}
        }
    }

    fn handle_task_input(&mut self) {
        match self.add_state.step {
            0 => { // Title
                if !self.input_buffer.is_empty() {
                    self.add_state.title = self.input_buffer.clone();
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            1 => { // Project
                self.add_state.project_id = self.input_buffer.trim().to_string();
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            2 => { // Time
                if !self.input_buffer.is_empty() {
                    self.add_state.time = self.input_buffer.clone();
                }
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            3 => { // Duration
                let duration = if self.input_buffer.is_empty() {
                    1.0
                } else {
                    match self.input_buffer.parse::<f64>() {
                        Ok(h) => h,
                        Err(_) => return,
                    }
                };
                let Ok(time) = NaiveTime::parse_from_str(&self.add_state.time, "%H:%M") else {
                    self.status = Some(format!("Invalid time '{}'", self.add_state.time));
                    self.input_mode = InputMode::Normal;
                    return;
                };
                let mut draft = TaskDraft::new(self.add_state.title.clone(), self.cursor_date().and_time(time));
                draft.project_id = self.add_state.project_id.clone();
                draft.duration = duration;
                match self.planner.add_task(draft) {
                    Ok(id) => self.status = Some(format!("Task added (id = {})", id)),
                    Err(e) => self.status = Some(e.to_string()),
                }
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            _ => {}
        }
    }

    fn handle_alarm_input(&mut self) {
        match self.add_state.step {
            0 => { // Time
                if !self.input_buffer.is_empty() {
                    self.add_state.time = self.input_buffer.clone();
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            1 => { // Label
                let mut draft = AlarmDraft { time: self.add_state.time.clone(), ..AlarmDraft::default() };
                if !self.input_buffer.is_empty() {
                    draft.label = self.input_buffer.clone();
                }
                match self.planner.add_alarm(draft) {
                    Ok(id) => self.status = Some(format!("Alarm added (id = {})", id)),
                    Err(e) => self.status = Some(e.to_string()),
                }
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            _ => {}
        }
    }
}

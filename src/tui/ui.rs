use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};
use chrono::Local;
use crate::calendar::{is_current_slot, CalendarItem, Slot};
use crate::overview::today_overview;
use super::app::{App, InputMode};

/// Items shown per monthly cell before collapsing into "+N more".
const MONTH_CELL_ITEMS: usize = 3;

fn base_style(app: &App) -> Style {
    if app.settings.dark_mode {
        Style::default().fg(Color::White).bg(Color::Black)
    } else {
        Style::default()
    }
}

fn item_span<'a>(item: &CalendarItem<'a>, carrying: Option<&str>) -> Span<'a> {
    match item {
        CalendarItem::Task(t) => {
            let mut style = Style::default().fg(Color::Green);
            if t.completed {
                style = style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
            }
            if carrying == Some(t.id.as_str()) {
                style = style.add_modifier(Modifier::SLOW_BLINK);
            }
            Span::styled(format!("{} ", t.title), style)
        }
        CalendarItem::Alarm(o) => Span::styled(format!("@{} {} ", o.time(), o.alarm.label), Style::default().fg(Color::Magenta)),
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    f.render_widget(Block::default().style(base_style(app)), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Calendar
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(0)].as_ref())
        .split(chunks[0]);

    render_sidebar(f, app, body[0]);
    if app.view.is_hourly() {
        render_hour_grid(f, app, body[1]);
    } else {
        render_month_grid(f, app, body[1]);
    }

    let help_text = match app.input_mode {
        InputMode::Normal => {
            if app.carrying.is_some() {
                "Arrows/hjkl: Move | Enter: Drop here | Esc: Cancel move"
            } else {
                "q: Quit | Arrows/hjkl: Move | [ ]: Prev/Next | 1/2/3: Day/Week/Month | t: Today | Tab: Next item | Enter: Pick up | Space: Done | x: Del | a: Add task | A: Add alarm | D: Dark mode"
            }
        }
        InputMode::AddingTask | InputMode::AddingAlarm => "Enter: Next Step | Esc: Cancel",
    };
    let help_line = match &app.status {
        Some(s) => format!("{}  |  {}", s, help_text),
        None => help_text.to_string(),
    };

    let help = Paragraph::new(help_line)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    // Render Input Box if needed
    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area()); // Fixed height of 3 (border + 1 line)
        f.render_widget(Clear, area); // Clear the area first

        let title = match app.input_mode {
            InputMode::AddingTask => match app.add_state.step {
                0 => "Add Task: Enter Title".to_string(),
                1 => "Add Task: Enter Project ID (Optional)".to_string(),
                2 => format!("Add Task: Enter Start Time HH:MM (default {})", app.add_state.time),
                3 => "Add Task: Enter Duration in Hours (default 1)".to_string(),
                _ => "Add Task".to_string(),
            },
            InputMode::AddingAlarm => match app.add_state.step {
                0 => "Add Alarm: Enter Time HH:MM".to_string(),
                _ => "Add Alarm: Enter Label (Optional)".to_string(),
            },
            InputMode::Normal => String::new(),
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let now = Local::now().naive_local();
    let overview = today_overview(&app.planner.tasks, now);

    let mut lines = vec![
        Line::from(Span::styled("Today", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(format!(
            "{} tasks, {} done ({:.0}%)",
            overview.tasks.len(),
            overview.completed,
            overview.completion_rate
        )),
        Line::from(""),
        Line::from(Span::styled("Upcoming", Style::default().add_modifier(Modifier::BOLD))),
    ];
    if overview.upcoming.is_empty() {
        lines.push(Line::from("No upcoming tasks for today!"));
    }
    for t in &overview.upcoming {
        lines.push(Line::from(format!("{} {}", t.start.format("%H:%M"), t.title)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Alarms", Style::default().add_modifier(Modifier::BOLD))));
    for a in &app.planner.alarms {
        let style = if a.enabled { Style::default().fg(Color::Magenta) } else { Style::default().fg(Color::DarkGray) };
        let repeat = if a.recurring { "daily" } else { "once" };
        lines.push(Line::from(Span::styled(format!("{} {} ({})", a.time, a.label, repeat), style)));
    }

    let sidebar = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Overview"));
    f.render_widget(sidebar, area);
}

fn render_hour_grid(f: &mut Frame, app: &App, area: Rect) {
    let now = Local::now().naive_local();
    let days = &app.projection.days;

    let mut header = vec![Cell::from("Time")];
    for day in days {
        let style = if day.date == now.date() {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        header.push(Cell::from(day.date.format("%a %-d").to_string()).style(style));
    }

    let carrying = app.carrying.as_deref();
    let rows: Vec<Row> = (0..24u32)
        .map(|hour| {
            let label = match hour {
                0 => "12 AM".to_string(),
                12 => "12 PM".to_string(),
                h if h > 12 => format!("{} PM", h - 12),
                h => format!("{} AM", h),
            };
            let mut cells = vec![Cell::from(label).style(Style::default().fg(Color::Gray))];
            for (i, day) in days.iter().enumerate() {
                let slot = Slot::Hour(day.date, hour);
                let items = app.items_at(slot);
                let spans: Vec<Span> = items.iter().map(|item| item_span(item, carrying)).collect();
                let mut style = Style::default();
                if is_current_slot(day.date, hour, now) {
                    style = style.bg(Color::Blue);
                }
                if i == app.cursor_day && hour == app.cursor_hour {
                    style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                }
                cells.push(Cell::from(Line::from(spans)).style(style));
            }
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(6)];
    widths.extend(days.iter().map(|_| Constraint::Fill(1)));

    let table = Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().fg(Color::Cyan)).bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(format!("calgrid - {}", app.projection.label)));

    // Selection only drives scrolling; cursor styling is per cell.
    let mut state = TableState::default();
    state.select(Some(app.cursor_hour as usize));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_month_grid(f: &mut Frame, app: &App, area: Rect) {
    let today = Local::now().date_naive();
    let carrying = app.carrying.as_deref();
    let header = Row::new(["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let weeks = app.projection.days.len() / 7;
    let row_height = ((area.height.saturating_sub(3)) / weeks.max(1) as u16).max(2);

    let rows: Vec<Row> = app
        .projection
        .days
        .chunks(7)
        .enumerate()
        .map(|(w, week)| {
            let cells: Vec<Cell> = week
                .iter()
                .enumerate()
                .map(|(d, day)| {
                    let items = app.items_at(Slot::Day(day.date));
                    let mut lines = vec![Line::from(day.date.format("%-d").to_string())];
                    for item in items.iter().take(MONTH_CELL_ITEMS) {
                        lines.push(Line::from(item_span(item, carrying)));
                    }
                    if items.len() > MONTH_CELL_ITEMS {
                        lines.push(Line::from(format!("+{} more", items.len() - MONTH_CELL_ITEMS)));
                    }
                    let mut style = Style::default();
                    if !day.in_month {
                        style = style.fg(Color::DarkGray);
                    }
                    if day.date == today {
                        style = style.bg(Color::Blue);
                    }
                    if w * 7 + d == app.cursor_day {
                        style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                    }
                    Cell::from(lines).style(style)
                })
                .collect();
            Row::new(cells).height(row_height)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Fill(1); 7])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!("calgrid - {}", app.projection.label)));

    f.render_widget(table, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Length(r.height.saturating_sub(height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}

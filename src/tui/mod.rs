pub mod app;
pub mod ui;

use std::{io, time::Duration};
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use app::{App, InputMode};
use ui::ui;
use crate::config::Settings;
use crate::models::ViewMode;
use crate::planner::Planner;

/// How long to wait for a key before running the alarm check again.
const TICK: Duration = Duration::from_secs(1);

/// Runs the interactive calendar until the user quits. Terminal errors are
/// returned after the screen has been restored.
pub fn run_tui(planner: Planner, settings: Settings) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(planner, settings);

    // Run loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.tick(Local::now().naive_local());
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Left | KeyCode::Char('h') => app.move_day(-1),
                    KeyCode::Right | KeyCode::Char('l') => app.move_day(1),
                    KeyCode::Up | KeyCode::Char('k') => app.move_vertical(-1),
                    KeyCode::Down | KeyCode::Char('j') => app.move_vertical(1),
                    KeyCode::Char('[') => app.previous_period(),
                    KeyCode::Char(']') => app.next_period(),
                    KeyCode::Char('1') => app.set_view(ViewMode::Daily),
                    KeyCode::Char('2') => app.set_view(ViewMode::Weekly),
                    KeyCode::Char('3') => app.set_view(ViewMode::Monthly),
                    KeyCode::Char('t') => app.go_to_today(),
                    KeyCode::Tab => app.next_item(),
                    KeyCode::Enter => app.grab_or_drop(),
                    KeyCode::Esc => app.cancel_carry(),
                    KeyCode::Char(' ') => app.toggle_selected(),
                    KeyCode::Char('x') | KeyCode::Delete => app.delete_selected(),
                    KeyCode::Char('a') => app.start_add_task(),
                    KeyCode::Char('A') => app.start_add_alarm(),
                    KeyCode::Char('D') => app.toggle_dark_mode(),
                    _ => {}
                },
                InputMode::AddingTask | InputMode::AddingAlarm => match key.code {
                    KeyCode::Enter => app.handle_input(),
                    KeyCode::Esc => app.cancel_input(),
                    KeyCode::Char(c) => {
                        app.input_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        app.input_buffer.pop();
                    }
                    _ => {}
                }
            }
        }
    }
}

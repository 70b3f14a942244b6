use calgrid::calendar::project_days;
use calgrid::commands::*;
use calgrid::config::{load_plan, load_settings, save_settings, Settings};
use calgrid::error::PlanError;
use calgrid::models::ViewMode;
use calgrid::planner::Planner;
use chrono::NaiveDate;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

// Use a mutex to ensure tests run serially since they modify the environment variable
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_config<F>(test_name: &str, f: F)
where
    F: FnOnce(PathBuf),
{
    let _guard = TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

    let mut dir = env::temp_dir();
    dir.push(format!("calgrid_test_{}", test_name));
    let config_path = dir.join("settings.json");

    env::set_var("CALGRID_CONFIG", config_path.to_str().unwrap());

    // Clean up before test
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }

    // Run test
    f(config_path.clone());

    // Clean up after test
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    env::remove_var("CALGRID_CONFIG");
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 11).unwrap()
}

#[test]
fn test_settings_default_when_missing() {
    with_test_config("missing", |path| {
        assert!(!path.exists());
        assert_eq!(load_settings(), Settings::default());
        assert_eq!(load_settings().default_view, ViewMode::Weekly);
    });
}

#[test]
fn test_settings_round_trip() {
    with_test_config("round_trip", |path| {
        let settings = Settings { dark_mode: true, default_view: ViewMode::Monthly };
        save_settings(&settings).unwrap();
        assert!(path.exists());
        assert_eq!(load_settings(), settings);
    });
}

#[test]
fn test_settings_malformed_file_falls_back() {
    with_test_config("malformed", |path| {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings(), Settings::default());
    });
}

#[test]
fn test_cmd_settings_updates_file() {
    with_test_config("cmd_settings", |_path| {
        cmd_settings(Some(true), None).unwrap();
        let settings = load_settings();
        assert!(settings.dark_mode);
        assert_eq!(settings.default_view, ViewMode::Weekly);

        cmd_settings(None, Some(ViewMode::Daily)).unwrap();
        let settings = load_settings();
        assert!(settings.dark_mode);
        assert_eq!(settings.default_view, ViewMode::Daily);
    });
}

#[test]
fn test_parse_instant() {
    let expected = day().and_hms_opt(14, 0, 0).unwrap();
    assert_eq!(parse_instant("2025-06-11T14:00").unwrap(), expected);
    assert_eq!(parse_instant("2025-06-11 14:00").unwrap(), expected);
    assert_eq!(parse_instant("2025-06-11").unwrap(), day().and_hms_opt(0, 0, 0).unwrap());
    assert!(matches!(parse_instant("tomorrow"), Err(PlanError::Date(_))));
    assert!(matches!(parse_date(Some("2025-13-01")), Err(PlanError::Date(_))));
}

#[test]
fn test_agenda_rows_weekly() {
    let plan = Planner::sample(day());
    let projection = project_days(day(), ViewMode::Weekly);
    let now = day().and_hms_opt(7, 10, 0).unwrap();

    let rows = agenda_rows(&plan, &projection, now);

    // Recurring 06:30 alarm on all seven days plus the two sample tasks.
    assert_eq!(rows.len(), 9);
    let today_rows: Vec<&AgendaRow> = rows.iter().filter(|r| r.date == day()).collect();
    let titles: Vec<&str> = today_rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Morning Wake-up", "Morning Workout", "Spanish Vocabulary"]);
    assert!(today_rows[0].is_alarm);
    assert_eq!(today_rows[0].time, "06:30");
    assert_eq!(today_rows[1].time, "07:00-08:00");
    assert!(today_rows[1].current);
    assert!(!today_rows[2].current);
}

#[test]
fn test_agenda_rows_monthly_whole_day() {
    let mut plan = Planner::sample(day());
    plan.alarms.clear();
    let projection = project_days(day(), ViewMode::Monthly);
    let rows = agenda_rows(&plan, &projection, day().and_hms_opt(12, 0, 0).unwrap());
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.hour.is_none() && !r.current));
}

#[test]
fn test_plan_snapshot_and_reschedule() {
    let mut path = env::temp_dir();
    path.push("calgrid_test_plan.json");
    let plan = Planner::sample(day());
    fs::write(&path, serde_json::to_string_pretty(&plan).unwrap()).unwrap();

    let loaded = load_plan(&path).unwrap();
    assert_eq!(loaded, plan);

    cmd_reschedule(&path, "1", "2025-06-12T15:00", true).unwrap();
    cmd_reschedule(&path, "missing", "2025-06-12T15:00", false).unwrap();
    assert!(matches!(
        cmd_reschedule(&path, "missing", "2025-06-12T15:00", true),
        Err(PlanError::TaskNotFound(_))
    ));
    // The snapshot itself is never written back.
    assert_eq!(load_plan(&path).unwrap(), plan);

    fs::remove_file(&path).unwrap();
}

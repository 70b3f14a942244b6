use calgrid::overview::{area_stats, areas, project_progress, today_overview, UPCOMING_LIMIT};
use calgrid::planner::{Planner, TaskDraft};
use chrono::{NaiveDate, NaiveDateTime};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 11).unwrap()
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    today().and_hms_opt(h, m, 0).unwrap()
}

#[test]
fn test_today_overview() {
    let mut plan = Planner::sample(today());
    plan.toggle_task("2").unwrap(); // 07:00 workout done
    let mut late = TaskDraft::new("Review", at(16, 0));
    late.project_id = "3".into();
    plan.add_task(late).unwrap();
    plan.add_task(TaskDraft::new("Tomorrow", at(9, 0) + chrono::Duration::days(1))).unwrap();

    let overview = today_overview(&plan.tasks, at(8, 0));
    assert_eq!(overview.tasks.len(), 3);
    assert_eq!(overview.completed, 1);
    assert!((overview.completion_rate - 100.0 / 3.0).abs() < 1e-9);

    let upcoming: Vec<&str> = overview.upcoming.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(upcoming, vec!["Spanish Vocabulary", "Review"]);
}

#[test]
fn test_today_overview_empty_and_capped() {
    let empty = today_overview(&[], at(8, 0));
    assert_eq!(empty.completion_rate, 0.0);
    assert!(empty.upcoming.is_empty());

    let mut plan = Planner::new();
    for h in (10..18).rev() {
        plan.add_task(TaskDraft::new(format!("at {}", h), at(h, 0))).unwrap();
    }
    let overview = today_overview(&plan.tasks, at(9, 0));
    assert_eq!(overview.upcoming.len(), UPCOMING_LIMIT);
    assert_eq!(overview.upcoming[0].title, "at 10");
    assert_eq!(overview.upcoming[4].title, "at 14");
}

#[test]
fn test_project_and_area_stats() {
    let mut plan = Planner::sample(today());
    let mut extra = TaskDraft::new("Grammar", at(20, 0) + chrono::Duration::days(2));
    extra.project_id = "1".into();
    plan.add_task(extra).unwrap();
    plan.toggle_task("1").unwrap();

    let progress = project_progress("1", &plan.tasks);
    assert_eq!(progress.total, 2);
    assert_eq!(progress.completed, 1);
    assert_eq!(progress.percent, 50.0);
    assert_eq!(project_progress("3", &plan.tasks).percent, 0.0);

    assert_eq!(areas(&plan.projects), vec!["Education", "Wellness", "Development"]);
    let education = area_stats("Education", &plan.projects, &plan.tasks, today());
    assert_eq!(education.projects, 1);
    assert_eq!(education.total, 2);
    assert_eq!(education.completed, 1);
    assert_eq!(education.active_today, 1);
}

use calgrid::error::{PlanError, ValidationError};
use calgrid::models::{ProjectCategory, RecurrencePattern};
use calgrid::models::Priority;
use calgrid::planner::{AlarmDraft, Planner, ProjectDraft, TaskDraft, TaskPatch, DEFAULT_TASK_COLOR};
use chrono::{NaiveDate, NaiveDateTime};

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
}

fn sample() -> Planner {
    Planner::sample(NaiveDate::from_ymd_opt(2025, 6, 11).unwrap())
}

fn draft(title: &str, project_id: &str, start: NaiveDateTime) -> TaskDraft {
    let mut d = TaskDraft::new(title, start);
    d.project_id = project_id.into();
    d
}

#[test]
fn test_sample_plan() {
    let plan = sample();
    assert_eq!(plan.projects.len(), 3);
    assert_eq!(plan.tasks.len(), 2);
    assert_eq!(plan.alarms.len(), 1);
    assert_eq!(plan.alarms[0].time.to_string(), "06:30");
    assert!(plan.alarms[0].recurring);
}

#[test]
fn test_add_task_assigns_ids_and_project_color() {
    let mut plan = sample();
    let id = plan.add_task(draft("Verbs", "1", at(2025, 6, 12, 9))).unwrap();
    assert_eq!(id, "3");
    let task = plan.task(&id).unwrap();
    assert_eq!(task.color, "#10B981");
    assert_eq!(task.duration, 1.0);
    assert!(!task.completed);

    let loose = plan.add_task(TaskDraft::new("Loose end", at(2025, 6, 12, 10))).unwrap();
    assert_eq!(loose, "4");
    assert_eq!(plan.task(&loose).unwrap().color, DEFAULT_TASK_COLOR);
}

#[test]
fn test_add_task_validation() {
    let mut plan = sample();
    let err = plan.add_task(draft("  ", "1", at(2025, 6, 12, 9))).unwrap_err();
    assert!(matches!(err, PlanError::Validation(ValidationError::EmptyTitle)));

    let mut zero = draft("Nothing", "1", at(2025, 6, 12, 9));
    zero.duration = 0.0;
    assert!(matches!(plan.add_task(zero), Err(PlanError::Validation(ValidationError::Duration(_)))));

    let err = plan.add_task(draft("Orphan", "99", at(2025, 6, 12, 9))).unwrap_err();
    assert!(matches!(err, PlanError::Validation(ValidationError::UnknownProject(_))));
    assert_eq!(plan.tasks.len(), 2);
}

#[test]
fn test_toggle_recurring_task_rolls_over() {
    let mut plan = sample();
    let mut d = draft("Standup", "3", at(2025, 6, 11, 9));
    d.recurrence = Some(RecurrencePattern::Weekly);
    d.due_date = NaiveDate::from_ymd_opt(2025, 6, 11);
    let id = plan.add_task(d).unwrap();

    assert!(plan.toggle_task(&id).unwrap());
    assert_eq!(plan.tasks.len(), 4);

    let next = plan.tasks.last().unwrap();
    assert_ne!(next.id, id);
    assert_eq!(next.title, "Standup");
    assert_eq!(next.start, at(2025, 6, 18, 9));
    assert_eq!(next.due_date, NaiveDate::from_ymd_opt(2025, 6, 18));
    assert!(!next.completed);

    // Reopening does not spawn another occurrence.
    assert!(!plan.toggle_task(&id).unwrap());
    assert_eq!(plan.tasks.len(), 4);
}

#[test]
fn test_completing_twice_rolls_over_once() {
    let mut plan = Planner::new();
    let mut d = TaskDraft::new("Stretch", at(2025, 6, 11, 7));
    d.recurrence = Some(RecurrencePattern::Daily);
    let id = plan.add_task(d).unwrap();

    assert!(plan.toggle_task(&id).unwrap());
    assert!(!plan.toggle_task(&id).unwrap());
    assert!(plan.toggle_task(&id).unwrap());

    let starts: Vec<NaiveDateTime> = plan.tasks.iter().map(|t| t.start).collect();
    assert_eq!(starts, vec![at(2025, 6, 11, 7), at(2025, 6, 12, 7)]);
}

#[test]
fn test_monthly_recurrence_clamps() {
    let mut plan = Planner::new();
    let mut d = TaskDraft::new("Rent", at(2025, 1, 31, 8));
    d.recurrence = Some(RecurrencePattern::Monthly);
    let id = plan.add_task(d).unwrap();
    plan.toggle_task(&id).unwrap();
    assert_eq!(plan.tasks[1].start, at(2025, 2, 28, 8));
}

#[test]
fn test_update_and_delete_task() {
    let mut plan = sample();
    plan.update_task("1", TaskPatch { duration: Some(2.5), priority: Some(Priority::Low), ..TaskPatch::default() })
        .unwrap();
    let task = plan.task("1").unwrap();
    assert_eq!(task.duration, 2.5);
    assert_eq!(task.priority, Priority::Low);
    assert_eq!(task.title, "Spanish Vocabulary");

    let err = plan.update_task("1", TaskPatch { title: Some(String::new()), ..TaskPatch::default() }).unwrap_err();
    assert!(matches!(err, PlanError::Validation(ValidationError::EmptyTitle)));

    let list = plan.add_list("2", "Routines").unwrap();
    plan.update_task(
        "1",
        TaskPatch {
            project_id: Some("2".into()),
            list_id: Some(Some(list.clone())),
            due_date: Some(NaiveDate::from_ymd_opt(2025, 6, 20)),
            ..TaskPatch::default()
        },
    )
    .unwrap();
    let task = plan.task("1").unwrap();
    assert_eq!(task.project_id, "2");
    assert_eq!(task.list_id.as_deref(), Some(list.as_str()));
    assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 6, 20));

    plan.update_task("1", TaskPatch { list_id: Some(None), due_date: Some(None), ..TaskPatch::default() })
        .unwrap();
    let task = plan.task("1").unwrap();
    assert_eq!(task.list_id, None);
    assert_eq!(task.due_date, None);
    assert_eq!(task.project_id, "2");

    let err = plan.update_task("1", TaskPatch { project_id: Some("42".into()), ..TaskPatch::default() }).unwrap_err();
    assert!(matches!(err, PlanError::Validation(ValidationError::UnknownProject(_))));

    plan.delete_task("1").unwrap();
    assert!(plan.task("1").is_none());
    assert!(matches!(plan.delete_task("1"), Err(PlanError::TaskNotFound(_))));
}

#[test]
fn test_toggle_plain_task() {
    let mut plan = sample();
    assert!(plan.toggle_task("1").unwrap());
    assert_eq!(plan.tasks.len(), 2);
    assert!(matches!(plan.toggle_task("nope"), Err(PlanError::TaskNotFound(_))));
}

#[test]
fn test_reschedule_reports_noop() {
    let mut plan = sample();
    let before = plan.clone();
    assert!(!plan.reschedule("missing", at(2025, 6, 13, 8)));
    assert_eq!(plan, before);

    assert!(plan.reschedule("2", at(2025, 6, 13, 8)));
    assert_eq!(plan.task("2").unwrap().start, at(2025, 6, 13, 8));
    assert_eq!(plan.task("1"), before.task("1"));
}

#[test]
fn test_reorder_within_project() {
    let mut plan = Planner::new();
    plan.add_project(ProjectDraft { name: "A".into(), area: "Home".into(), ..ProjectDraft::default() }).unwrap();
    for title in ["one", "two", "three"] {
        plan.add_task(draft(title, "1", at(2025, 6, 11, 9))).unwrap();
    }
    plan.add_task(TaskDraft::new("other", at(2025, 6, 11, 9))).unwrap();

    assert!(plan.reorder_task("1", "3", "1"));
    let titles: Vec<&str> = plan.tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["other", "three", "one", "two"]);

    assert!(!plan.reorder_task("1", "3", "missing"));
}

#[test]
fn test_reorder_with_missing_id_keeps_order() {
    let mut plan = sample();
    let before: Vec<String> = plan.tasks.iter().map(|t| t.id.clone()).collect();

    assert!(!plan.reorder_task("1", "1", "missing"));
    assert!(!plan.reorder_task("1", "missing", "1"));
    assert!(!plan.reorder_in_list("nope", "1", "2"));

    let after: Vec<String> = plan.tasks.iter().map(|t| t.id.clone()).collect();
    assert_eq!(after, before);
}

#[test]
fn test_reorder_project() {
    let mut plan = sample();
    assert!(plan.reorder_project("3", "1"));
    let ids: Vec<&str> = plan.projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "1", "2"]);

    assert!(plan.reorder_project("3", "2"));
    let ids: Vec<&str> = plan.projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);

    assert!(!plan.reorder_project("3", "missing"));
    let ids: Vec<&str> = plan.projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[test]
fn test_move_task_to_list() {
    let mut plan = Planner::new();
    plan.add_project(ProjectDraft { name: "A".into(), area: "Home".into(), ..ProjectDraft::default() }).unwrap();
    let todo = plan.add_list("1", "Todo").unwrap();
    let done = plan.add_list("1", "Done").unwrap();
    for title in ["one", "two", "three"] {
        let mut d = draft(title, "1", at(2025, 6, 11, 9));
        d.list_id = Some(done.clone());
        plan.add_task(d).unwrap();
    }
    let mut d = draft("four", "1", at(2025, 6, 11, 9));
    d.list_id = Some(todo.clone());
    let four = plan.add_task(d).unwrap();

    plan.move_task_to_list(&four, &done, Some("2")).unwrap();
    assert_eq!(plan.task(&four).unwrap().list_id.as_deref(), Some(done.as_str()));
    let in_done: Vec<&str> = plan
        .tasks
        .iter()
        .filter(|t| t.list_id.as_deref() == Some(done.as_str()))
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(in_done, vec!["one", "four", "two", "three"]);

    // Without an anchor task only the list changes.
    plan.move_task_to_list("1", &todo, None).unwrap();
    assert_eq!(plan.task("1").unwrap().list_id.as_deref(), Some(todo.as_str()));

    assert!(matches!(plan.move_task_to_list("1", "99", None), Err(PlanError::ListNotFound(_))));
    assert!(matches!(plan.move_task_to_list("99", &todo, None), Err(PlanError::TaskNotFound(_))));
}

#[test]
fn test_lists() {
    let mut plan = sample();
    let list = plan.add_list("1", "Backlog").unwrap();
    let mut d = draft("Flashcards", "1", at(2025, 6, 12, 9));
    d.list_id = Some(list.clone());
    let id = plan.add_task(d).unwrap();

    plan.rename_list(&list, "Next up").unwrap();
    assert_eq!(plan.lists[0].title, "Next up");

    plan.delete_list(&list).unwrap();
    assert!(plan.lists.is_empty());
    assert_eq!(plan.task(&id).unwrap().list_id, None);
    assert!(matches!(plan.delete_list(&list), Err(PlanError::ListNotFound(_))));
    assert!(plan.add_list("42", "Nowhere").is_err());
}

#[test]
fn test_nested_project_delete_cascades() {
    let mut plan = sample();
    let child = plan
        .add_project(ProjectDraft {
            name: "Grammar".into(),
            color: "#000000".into(),
            category: ProjectCategory::Hobby,
            area: "Education".into(),
            parent_id: Some("1".into()),
            due_date: None,
        })
        .unwrap();
    let grandchild = plan
        .add_project(ProjectDraft { name: "Subjunctive".into(), parent_id: Some(child.clone()), ..ProjectDraft::default() })
        .unwrap();
    plan.add_task(draft("Drill", &grandchild, at(2025, 6, 12, 9))).unwrap();
    plan.add_list(&child, "Chapters").unwrap();
    assert_eq!(plan.children("1").len(), 1);

    plan.delete_project("1").unwrap();

    let ids: Vec<&str> = plan.projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "3"]);
    assert!(plan.tasks.iter().all(|t| t.project_id == "2"));
    assert!(plan.lists.is_empty());
}

#[test]
fn test_project_parent_must_exist() {
    let mut plan = sample();
    let err = plan
        .add_project(ProjectDraft { name: "Lost".into(), parent_id: Some("9".into()), ..ProjectDraft::default() })
        .unwrap_err();
    assert!(matches!(err, PlanError::Validation(ValidationError::UnknownParent(_))));
    plan.rename_project("2", "Lifting").unwrap();
    assert_eq!(plan.project("2").unwrap().name, "Lifting");
}

#[test]
fn test_alarm_lifecycle() {
    let mut plan = sample();
    let id = plan
        .add_alarm(AlarmDraft { time: "21:15".into(), label: "Wind down".into(), ..AlarmDraft::default() })
        .unwrap();
    assert_eq!(id, "2");
    assert!(plan.alarms[1].enabled);

    assert!(!plan.toggle_alarm(&id).unwrap());
    assert!(plan.toggle_alarm(&id).unwrap());
    plan.delete_alarm(&id).unwrap();
    assert_eq!(plan.alarms.len(), 1);

    let err = plan.add_alarm(AlarmDraft { time: "9:15".into(), ..AlarmDraft::default() }).unwrap_err();
    assert!(matches!(err, PlanError::Validation(ValidationError::AlarmTime(_))));
    assert_eq!(plan.alarms.len(), 1);
}

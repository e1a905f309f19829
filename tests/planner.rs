#![forbid(unsafe_code)]
use chrono::NaiveDate;
use rotaplan::{
    io,
    model::Holiday,
    planner::{PlanError, Planner},
    report::{prepare_report, TextReport},
    storage::{JsonStorage, Storage},
};
use tempfile::tempdir;

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn leave_conflict_for_same_initials() {
    let mut p = Planner::new();
    p.add_leave("ab", d(2025, 3, 3), d(2025, 3, 5)).unwrap();

    let err = p.add_leave("AB", d(2025, 3, 5), d(2025, 3, 7)).unwrap_err();
    assert!(matches!(err, PlanError::LeaveConflict { .. }));

    // Mêmes dates mais initiales différentes : pas de conflit.
    p.add_leave("CD", d(2025, 3, 5), d(2025, 3, 7)).unwrap();
    assert_eq!(p.calendar().leaves.len(), 2);
}

#[test]
fn leave_validation() {
    let mut p = Planner::new();
    assert!(matches!(
        p.add_leave("", d(2025, 3, 3), d(2025, 3, 3)),
        Err(PlanError::InvalidLeave(_))
    ));
    assert!(matches!(
        p.add_leave("ABCD", d(2025, 3, 3), d(2025, 3, 3)),
        Err(PlanError::InvalidLeave(_))
    ));
    assert!(matches!(
        p.add_leave("AB", d(2025, 3, 5), d(2025, 3, 3)),
        Err(PlanError::InvalidLeave(_))
    ));
}

#[test]
fn update_leave_excludes_itself_from_conflict_check() {
    let mut p = Planner::new();
    let id = p.add_leave("ab", d(2025, 3, 3), d(2025, 3, 5)).unwrap();

    // Étendre le même congé ne doit pas entrer en conflit avec lui-même.
    p.update_leave(&id, "ab", d(2025, 3, 3), d(2025, 3, 7)).unwrap();
    let leave = p.calendar().find_leave_by_id(&id).unwrap();
    assert_eq!(leave.end, d(2025, 3, 7));

    // La trace d'audit conserve les initiales, comme à la création.
    let last = p.calendar().audit.last().unwrap();
    assert_eq!(last.action.as_str(), "update_leave");
    assert!(last.details.contains("initials=AB"));
}

#[test]
fn search_leaves_by_initials() {
    let mut p = Planner::new();
    p.add_leave("ab", d(2025, 3, 3), d(2025, 3, 4)).unwrap();
    p.add_leave("cd", d(2025, 3, 10), d(2025, 3, 12)).unwrap();

    let found = p.leaves_for_initials("a");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].initials, "AB");
}

#[test]
fn duplicate_holiday_rejected() {
    let mut p = Planner::new();
    p.add_holiday(d(2025, 12, 25), "Noël", None).unwrap();
    let err = p.add_holiday(d(2025, 12, 25), "Christmas", None).unwrap_err();
    assert!(matches!(err, PlanError::DuplicateHoliday(_)));
}

#[test]
fn upsert_keeps_existing_id() {
    let mut p = Planner::new();
    let id = p.add_holiday(d(2025, 12, 25), "Noel", None).unwrap();

    let count = p.upsert_holidays(vec![
        Holiday::new(d(2025, 12, 25), "Noël"),
        Holiday::new(d(2026, 1, 1), "Jour de l'an"),
    ]);
    assert_eq!(count, 2);
    assert_eq!(p.calendar().holidays.len(), 2);

    let kept = p.calendar().find_holiday_by_date(d(2025, 12, 25)).unwrap();
    assert_eq!(kept.id, id);
    assert_eq!(kept.name, "Noël");
}

#[test]
fn month_view_combines_schedule_holidays_and_leaves() {
    let mut p = Planner::new();
    p.add_holiday(d(2025, 1, 6), "Férié", None).unwrap();
    p.add_leave("ab", d(2025, 1, 28), d(2025, 2, 3)).unwrap();

    let view = p.month_view(2025, 1).unwrap();
    assert_eq!(view.start, d(2025, 1, 1));
    assert_eq!(view.end, d(2025, 1, 31));
    assert!(view.entries.iter().all(|e| e.date != d(2025, 1, 6)));
    assert_eq!(view.holidays.len(), 1);
    // Congé à cheval sur février : quand même visible en janvier.
    assert_eq!(view.leaves.len(), 1);
}

#[test]
fn mutations_are_audited() {
    let mut p = Planner::new();
    let hid = p.add_holiday(d(2025, 12, 25), "Noël", None).unwrap();
    let lid = p.add_leave("ab", d(2025, 3, 3), d(2025, 3, 5)).unwrap();
    p.remove_leave(&lid).unwrap();
    p.remove_holiday(&hid).unwrap();

    let actions: Vec<&str> = p
        .calendar()
        .audit
        .iter()
        .map(|e| e.action.as_str())
        .collect();
    assert_eq!(
        actions,
        vec!["add_holiday", "add_leave", "remove_leave", "remove_holiday"]
    );
}

#[test]
fn storage_roundtrip_preserves_calendar() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("calendar.json");

    let mut p = Planner::new();
    p.add_holiday(d(2025, 12, 25), "Noël", Some("Jour férié national".into()))
        .unwrap();
    p.add_leave("ab", d(2025, 3, 3), d(2025, 3, 5)).unwrap();

    let storage = JsonStorage::open(&path).unwrap();
    storage.save(p.calendar()).unwrap();

    let loaded = storage.load().unwrap();
    assert_eq!(loaded.holidays.len(), 1);
    assert_eq!(loaded.leaves.len(), 1);
    assert_eq!(loaded.rotation, p.calendar().rotation);
    assert_eq!(loaded.audit.len(), 2);
}

#[test]
fn import_holidays_json_flat_map() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("holidays.json");
    std::fs::write(
        &path,
        r#"{"2025-01-01": "Jour de l'an", "2025-12-25": "Noël"}"#,
    )
    .unwrap();

    let holidays = io::import_holidays_json(&path).unwrap();
    assert_eq!(holidays.len(), 2);
    assert_eq!(holidays[0].date, d(2025, 1, 1));
    assert!(!holidays[0].manual);
}

#[test]
fn import_leaves_csv_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("leaves.csv");
    std::fs::write(
        &path,
        "initials,start,end\nab,2025-03-03,2025-03-05\ncd,2025-03-04,\n",
    )
    .unwrap();

    let leaves = io::import_leaves_csv(&path).unwrap();
    assert_eq!(leaves.len(), 2);
    assert_eq!(leaves[0].initials, "AB");
    assert_eq!(leaves[0].duration_days(), 3);
    // Fin absente : congé d'un seul jour.
    assert_eq!(leaves[1].start, leaves[1].end);

    let mut p = Planner::new();
    assert_eq!(p.import_leaves(leaves), 2);
    assert_eq!(p.calendar().leaves.len(), 2);
    assert!(p.detect_overlaps().is_empty());
    let last = p.calendar().audit.last().unwrap();
    assert_eq!(last.action.as_str(), "import_leaves");
}

#[test]
fn imported_overlaps_are_detected() {
    // L'import ne filtre pas : le contrôle passe par detect_overlaps.
    let dir = tempdir().unwrap();
    let path = dir.path().join("leaves.csv");
    std::fs::write(
        &path,
        "initials,start,end\nab,2025-03-03,2025-03-05\nab,2025-03-04,2025-03-06\n",
    )
    .unwrap();

    let mut p = Planner::new();
    p.import_leaves(io::import_leaves_csv(&path).unwrap());
    let overlaps = p.detect_overlaps();
    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].initials, "AB");
}

#[test]
fn exported_calendar_json_is_loadable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.json");

    let mut p = Planner::new();
    p.add_holiday(d(2025, 12, 25), "Noël", None).unwrap();
    p.add_leave("ab", d(2025, 3, 3), d(2025, 3, 5)).unwrap();
    io::export_calendar_json(&path, p.calendar()).unwrap();

    let loaded = JsonStorage::open(&path).unwrap().load().unwrap();
    assert_eq!(loaded.holidays.len(), 1);
    assert_eq!(loaded.leaves.len(), 1);
}

#[test]
fn report_renders_month_content() {
    let mut p = Planner::new();
    p.add_holiday(d(2025, 1, 6), "Férié", None).unwrap();

    let report = prepare_report(&p, 2025, 1, chrono::Utc::now(), &TextReport).unwrap();
    assert_eq!(report.year, 2025);
    assert!(report.content.contains("2025-01-01"));
    assert!(report.content.contains("Férié"));
}

use crate::calendar::store::load_calendar;
use crate::config::Strategy;
use crate::domain::cycle::{CYCLE_ORIGIN, DAY};
use crate::domain::CycleRule;
use crate::pipeline::MERGED_CALENDAR_FILE;
use crate::tests::utils::{at, sale, test_pipeline, StubSource};
use std::fs;
use std::path::Path;

fn run_merge(out: &Path, first_seen: i64, now: i64) {
    let source = StubSource::new().with_sales(
        1042,
        &[
            sale(0, 2, 5, 1, 2, 1042, first_seen),
            sale(3, 0, 11, 2, 1, 1042, CYCLE_ORIGIN + 3600),
        ],
    );
    let pipeline = test_pipeline(source, out, Strategy::Merge, CycleRule::two_phase_default());

    let report = pipeline.run(&[1042], at(now));
    assert!(report.failed.is_empty(), "{:?}", report.failed);
}

#[test]
fn rerun_with_same_data_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("1042").join(MERGED_CALENDAR_FILE);

    run_merge(dir.path(), CYCLE_ORIGIN + 3600, CYCLE_ORIGIN + 7200);
    let first = fs::read(&path).unwrap();

    // a later clock must not matter when nothing changed
    run_merge(dir.path(), CYCLE_ORIGIN + 3600, CYCLE_ORIGIN + 3 * DAY);
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn deadlines_only_move_forward() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("1042").join(MERGED_CALENDAR_FILE);
    let title = "L房 海雾村 3区6号 部队 抽选截止";

    // application phase: closes after 5 days
    run_merge(dir.path(), CYCLE_ORIGIN + 3600, CYCLE_ORIGIN + 7200);
    let cal = load_calendar(&path).unwrap();
    assert_eq!(cal.events.len(), 2);
    let event = cal.events.iter().find(|e| e.summary == title).unwrap();
    assert_eq!(event.end.map(|e| e.timestamp()), Some(CYCLE_ORIGIN + 5 * DAY));

    // seen again during publicity: end moves to the end of the cycle
    run_merge(dir.path(), CYCLE_ORIGIN + 6 * DAY, CYCLE_ORIGIN + 6 * DAY);
    let cal = load_calendar(&path).unwrap();
    assert_eq!(cal.events.len(), 2);
    let event = cal.events.iter().find(|e| e.summary == title).unwrap();
    assert_eq!(event.end.map(|e| e.timestamp()), Some(CYCLE_ORIGIN + 9 * DAY));
    let after_update = fs::read(&path).unwrap();

    // an older sighting never pulls it back
    run_merge(dir.path(), CYCLE_ORIGIN + 3600, CYCLE_ORIGIN + 7 * DAY);
    assert_eq!(fs::read(&path).unwrap(), after_update);
}

#[test]
fn merge_summary_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let source = StubSource::new().with_sales(1042, &[sale(0, 2, 5, 1, 2, 1042, CYCLE_ORIGIN)]);
    let pipeline = test_pipeline(
        source,
        dir.path(),
        Strategy::Merge,
        CycleRule::two_phase_default(),
    );

    let first = pipeline.run(&[1042], at(CYCLE_ORIGIN));
    let second = pipeline.run(&[1042], at(CYCLE_ORIGIN + DAY));

    let a = first.succeeded[0].merge.unwrap();
    let b = second.succeeded[0].merge.unwrap();
    assert_eq!((a.created, a.updated), (1, 0));
    assert_eq!((b.created, b.updated, b.unchanged), (0, 0, 1));
}

use crate::calendar::Calendar;
use crate::config::Strategy;
use crate::domain::cycle::{CYCLE_ORIGIN, DAY};
use crate::domain::{CycleRule, SizeCategory};
use crate::pipeline::{size_calendar_file, COMBINED_CALENDAR_FILE, FILTERED_FILE, PROCESSED_FILE};
use crate::tests::utils::{at, sale, test_pipeline, StubSource};
use serde_json::{json, Value};
use std::fs;

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn reference_lot_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    let mut no_timestamp = sale(1, 4, 9, 2, 1, 1042, 0);
    no_timestamp["FirstSeen"] = json!("unknown");
    no_timestamp["LastSeen"] = Value::Null;

    let source = StubSource::new().with_sales(
        1042,
        &[
            sale(0, 2, 5, 1, 2, 1042, CYCLE_ORIGIN + 3600),
            sale(1, 0, 0, 2, 1, 1042, CYCLE_ORIGIN + DAY),
            sale(2, 7, 7, 0, 3, 1042, CYCLE_ORIGIN + DAY),
            sale(2, 8, 8, 0, 0, 1042, CYCLE_ORIGIN + DAY),
            no_timestamp,
        ],
    );

    let pipeline = test_pipeline(
        source,
        dir.path(),
        Strategy::Grouped,
        CycleRule::single_phase_default(),
    );
    let report = pipeline.run(&[1042], at(CYCLE_ORIGIN + 2 * DAY));

    assert!(report.failed.is_empty());
    let summary = &report.succeeded[0];
    assert_eq!(summary.fetched, 5);
    assert_eq!(summary.kept, 3);
    assert_eq!(summary.normalized, 2);

    let server_dir = dir.path().join("1042");

    let filtered = read_json(&server_dir.join(FILTERED_FILE));
    assert_eq!(filtered.as_array().unwrap().len(), 3);

    let processed = read_json(&server_dir.join(PROCESSED_FILE));
    let processed = processed.as_array().unwrap();
    assert_eq!(processed.len(), 2);
    assert_eq!(processed[0]["Purchase_endtime"], CYCLE_ORIGIN + 9 * DAY + 5 * DAY);
    assert_eq!(processed[0]["ServerName"], "拉诺西亚");

    let large_ics =
        fs::read_to_string(server_dir.join(size_calendar_file(SizeCategory::Large))).unwrap();
    let large = Calendar::parse(&large_ics).unwrap();
    assert_eq!(large.events.len(), 1);
    assert_eq!(large.events[0].summary, "L房抽选截止");
    assert_eq!(large.events[0].start.timestamp(), CYCLE_ORIGIN + 14 * DAY);
    assert!(large.events[0]
        .description
        .starts_with("拉诺西亚 - 海雾村 - 3区 - 6号 - 部队\n"));
    assert!(large_ics.contains("DTSTART;TZID=Asia/Shanghai:20240715T230000"));

    let medium_ics = fs::read_to_string(server_dir.join("m房_抽选截止.ics")).unwrap();
    assert!(Calendar::parse(&medium_ics).unwrap().events[0]
        .description
        .contains("拉诺西亚 - 薰衣草苗圃 - 1区 - 1号 - 个人"));

    let combined = Calendar::parse(
        &fs::read_to_string(server_dir.join(COMBINED_CALENDAR_FILE)).unwrap(),
    )
    .unwrap();
    assert_eq!(combined.events.len(), 2);
}

#[test]
fn untracked_sizes_never_reach_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let source = StubSource::new().with_sales(
        1167,
        &[
            sale(3, 0, 0, 1, 1, 1167, CYCLE_ORIGIN + DAY),
            sale(4, 11, 29, 2, 0, 1167, CYCLE_ORIGIN + DAY),
            sale(4, 12, 28, 2, 3, 1167, CYCLE_ORIGIN + DAY),
        ],
    );

    let pipeline = test_pipeline(
        source,
        dir.path(),
        Strategy::Grouped,
        CycleRule::single_phase_default(),
    );
    let report = pipeline.run(&[1167], at(CYCLE_ORIGIN));
    assert_eq!(report.succeeded.len(), 1);

    for path in &report.succeeded[0].files {
        let text = fs::read_to_string(path).unwrap();
        assert!(!text.contains("穹顶皓天"), "{} leaked a filtered lot", path.display());
        assert!(!text.contains("\"Area\": 4"), "{} leaked a filtered lot", path.display());
    }
}

#[test]
fn unknown_codes_use_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let source =
        StubSource::new().with_sales(4242, &[sale(9, 0, 0, 7, 2, 4242, CYCLE_ORIGIN + DAY)]);

    let pipeline = test_pipeline(
        source,
        dir.path(),
        Strategy::Grouped,
        CycleRule::single_phase_default(),
    );
    pipeline.run(&[4242], at(CYCLE_ORIGIN));

    let processed = read_json(&dir.path().join("4242").join(PROCESSED_FILE));
    assert_eq!(processed[0]["ServerName"], "未知服务器");
    assert_eq!(processed[0]["AreaName"], "未知区域");
    assert_eq!(processed[0]["RegionTypeName"], "未知类型");
}

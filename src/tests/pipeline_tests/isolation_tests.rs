use crate::config::Strategy;
use crate::domain::cycle::{CYCLE_ORIGIN, DAY};
use crate::domain::CycleRule;
use crate::errors::PipelineError;
use crate::fetcher::FetchError;
use crate::pipeline::MERGED_CALENDAR_FILE;
use crate::tests::utils::{at, sale, test_pipeline, StubSource};
use std::fs;

#[test]
fn one_bad_server_does_not_stop_the_rest() {
    let dir = tempfile::tempdir().unwrap();

    // 1167 has no body and answers 503
    let source = StubSource::new()
        .with_body(1044, "<html>maintenance</html>")
        .with_sales(1042, &[sale(0, 2, 5, 1, 2, 1042, CYCLE_ORIGIN + 3600)]);

    let pipeline = test_pipeline(
        source,
        dir.path(),
        Strategy::Grouped,
        CycleRule::single_phase_default(),
    );
    let report = pipeline.run(&[1167, 1044, 1042], at(CYCLE_ORIGIN));

    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(report.succeeded[0].server_id, 1042);
    assert_eq!(report.failed.len(), 2);

    assert!(matches!(
        report.failed[0],
        (1167, PipelineError::Fetch(FetchError::Status { status: 503, .. }))
    ));
    assert!(matches!(
        report.failed[1],
        (1044, PipelineError::Fetch(FetchError::JsonParse(_)))
    ));

    assert!(!dir.path().join("1167").exists());
    assert!(dir.path().join("1042").join("calendar.ics").exists());
}

#[test]
fn corrupt_merge_calendar_fails_only_that_server() {
    let dir = tempfile::tempdir().unwrap();
    let bad_dir = dir.path().join("1060");
    fs::create_dir_all(&bad_dir).unwrap();
    fs::write(bad_dir.join(MERGED_CALENDAR_FILE), "garbage").unwrap();

    let source = StubSource::new()
        .with_sales(1060, &[sale(0, 0, 0, 1, 1, 1060, CYCLE_ORIGIN + DAY)])
        .with_sales(1081, &[sale(0, 0, 0, 1, 1, 1081, CYCLE_ORIGIN + DAY)]);

    let pipeline = test_pipeline(
        source,
        dir.path(),
        Strategy::Merge,
        CycleRule::two_phase_default(),
    );
    let report = pipeline.run(&[1060, 1081], at(CYCLE_ORIGIN));

    assert_eq!(report.failed.len(), 1);
    assert!(matches!(report.failed[0], (1060, PipelineError::Calendar(_))));
    assert_eq!(report.succeeded[0].server_id, 1081);

    // the broken file is left as it was
    assert_eq!(
        fs::read_to_string(bad_dir.join(MERGED_CALENDAR_FILE)).unwrap(),
        "garbage"
    );
}

//! End-to-end loop tests over the mock seams.

use std::time::Duration;

use pressmon_core::framebuffer::FrameBuffer;
use pressmon_core::mocks::{FixedSensors, ManualClock, ScriptedTransport};
use pressmon_core::monitor::{Monitor, MonitorBuilder};
use pressmon_core::render::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use pressmon_core::storage::CsvStore;
use pressmon_core::{BuildError, CHANNEL_COUNT};
use tempfile::TempDir;

type TestMonitor = Monitor<FixedSensors, ScriptedTransport, FrameBuffer, ManualClock>;

fn build_monitor(store: CsvStore, transport: ScriptedTransport) -> (TestMonitor, ManualClock) {
    let clock = ManualClock::new();
    let monitor = MonitorBuilder::new()
        .sensors(FixedSensors::ramp())
        .transport(transport)
        .display(FrameBuffer::new(DISPLAY_WIDTH, DISPLAY_HEIGHT))
        .clock(clock.clone())
        .store(store)
        .cycle_ms(100)
        .log_interval_ms(1000)
        .try_build()
        .expect("all seams supplied");
    (monitor, clock)
}

#[test]
fn first_cycle_creates_log_and_sends_live_update() {
    let dir = TempDir::new().expect("tempdir");
    let (mut monitor, _clock) = build_monitor(CsvStore::new(dir.path()), ScriptedTransport::default());

    monitor.cycle().expect("cycle");

    let logs: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(logs.len(), 1);
    let body = std::fs::read_to_string(logs[0].path()).expect("read log");
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 2, "header plus one row");
    assert_eq!(lines[1].split(',').count(), CHANNEL_COUNT + 1);

    let sent = &monitor.transport().sent;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("DATA:"));
    assert_eq!(
        sent[0].trim_start_matches("DATA:").split(',').count(),
        CHANNEL_COUNT
    );
}

#[test]
fn rows_append_only_when_interval_elapses() {
    let dir = TempDir::new().expect("tempdir");
    let (mut monitor, _clock) = build_monitor(CsvStore::new(dir.path()), ScriptedTransport::default());

    // Each cycle advances the manual clock by cycle_ms via sleep().
    // 1000 ms interval at 100 ms cycles means a row every 10 cycles.
    for _ in 0..21 {
        monitor.cycle().expect("cycle");
    }

    let logs: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(logs.len(), 1);
    let body = std::fs::read_to_string(logs[0].path()).expect("read log");
    // Row at t=0, t=1000, t=2000.
    assert_eq!(body.lines().count(), 4, "header plus three rows");
}

#[test]
fn screenshot_command_sends_ordered_frame() {
    let dir = TempDir::new().expect("tempdir");
    let transport = ScriptedTransport::with_lines(["SCREENSHOT"]);
    let (mut monitor, _clock) = build_monitor(CsvStore::new(dir.path()), transport);

    monitor.cycle().expect("cycle");

    let sent = &monitor.transport().sent;
    // Live DATA line first, then the framed snapshot.
    assert_eq!(sent[1], "SCREENSHOT_BEGIN");
    assert!(sent[2].starts_with("TIME:"));
    assert!(sent[3].starts_with("DATA:"));
    assert_eq!(sent[4], "SCREENSHOT_END");
}

#[test]
fn export_sends_stored_log_in_frame() {
    let dir = TempDir::new().expect("tempdir");
    let transport = ScriptedTransport::with_lines(["EXPORT_CSV"]);
    let (mut monitor, _clock) = build_monitor(CsvStore::new(dir.path()), transport);

    monitor.cycle().expect("cycle");

    let sent = &monitor.transport().sent;
    assert_eq!(sent[1], "CSV_EXPORT_BEGIN");
    assert_eq!(sent[2], "FILENAME:LOG00000.CSV");
    assert!(sent[3].starts_with("Timestamp,S1,"));
    // Row written this same cycle, then the end marker.
    assert_eq!(sent[4].split(',').count(), CHANNEL_COUNT + 1);
    assert_eq!(sent[5], "CSV_EXPORT_END");
}

#[test]
fn export_without_storage_reports_no_files() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("not_mounted");
    let transport = ScriptedTransport::with_lines(["EXPORT_CSV"]);
    let (mut monitor, _clock) = build_monitor(CsvStore::new(&missing), transport);

    monitor.cycle().expect("cycle");

    let sent = &monitor.transport().sent;
    // Live update still goes out; the reply is an empty export frame
    // carrying only the sentinel message.
    assert_eq!(sent[1], "CSV_EXPORT_BEGIN");
    assert_eq!(sent[2], "No CSV files found");
    assert_eq!(sent[3], "CSV_EXPORT_END");
}

#[test]
fn export_bundles_every_stored_log_in_one_frame() {
    let dir = TempDir::new().expect("tempdir");
    let store = CsvStore::new(dir.path());
    store.create_log(1).expect("seed log");
    store.create_log(2).expect("seed log");

    let transport = ScriptedTransport::with_lines(["EXPORT_CSV"]);
    let (mut monitor, _clock) = build_monitor(CsvStore::new(dir.path()), transport);

    monitor.cycle().expect("cycle");

    let sent = &monitor.transport().sent;
    assert_eq!(sent.iter().filter(|l| *l == "CSV_EXPORT_BEGIN").count(), 1);
    assert_eq!(sent.iter().filter(|l| *l == "CSV_EXPORT_END").count(), 1);
    assert_eq!(sent.last().map(String::as_str), Some("CSV_EXPORT_END"));

    // The run's own log plus both seeded logs, in name order.
    let filenames: Vec<&str> = sent
        .iter()
        .filter(|l| l.starts_with("FILENAME:"))
        .map(String::as_str)
        .collect();
    assert_eq!(
        filenames,
        [
            "FILENAME:LOG00000.CSV",
            "FILENAME:LOG00001.CSV",
            "FILENAME:LOG00002.CSV",
        ]
    );
}

#[test]
fn help_lists_all_commands() {
    let dir = TempDir::new().expect("tempdir");
    let transport = ScriptedTransport::with_lines(["HELP"]);
    let (mut monitor, _clock) = build_monitor(CsvStore::new(dir.path()), transport);

    monitor.cycle().expect("cycle");

    let sent = monitor.transport().sent.join("\n");
    assert!(sent.contains("SCREENSHOT"));
    assert!(sent.contains("EXPORT_CSV"));
    assert!(sent.contains("HELP"));
}

#[test]
fn unrecognized_input_is_silently_dropped() {
    let dir = TempDir::new().expect("tempdir");
    let transport = ScriptedTransport::with_lines(["RESET", "screenshot", ""]);
    let (mut monitor, _clock) = build_monitor(CsvStore::new(dir.path()), transport);

    monitor.cycle().expect("cycle");

    // Only the live update line goes out; no error replies.
    assert_eq!(monitor.transport().sent.len(), 1);
    assert!(monitor.transport().sent[0].starts_with("DATA:"));
}

#[test]
fn storage_failure_keeps_the_loop_running() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("not_mounted");
    let (mut monitor, _clock) =
        build_monitor(CsvStore::new(&missing), ScriptedTransport::default());

    for _ in 0..5 {
        monitor.cycle().expect("storage trouble must not abort");
    }
    assert_eq!(monitor.last_values()[1], 50);
}

#[test]
fn failed_append_keeps_the_run_in_one_file() {
    let dir = TempDir::new().expect("tempdir");
    let (mut monitor, _clock) =
        build_monitor(CsvStore::new(dir.path()), ScriptedTransport::default());

    monitor.cycle().expect("cycle");
    // Pull the file out from under the monitor so appends fail.
    std::fs::remove_file(dir.path().join("LOG00000.CSV")).expect("remove log");

    // Two more intervals' worth of cycles, every append failing.
    for _ in 0..21 {
        monitor.cycle().expect("append trouble must not abort");
    }

    // The handle is kept, so no replacement file ever appears.
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name())
        .collect();
    assert!(names.is_empty(), "unexpected new log files: {names:?}");
}

#[test]
fn failed_sample_skips_log_row_and_live_update() {
    use pressmon_core::mocks::FailingSensors;

    let dir = TempDir::new().expect("tempdir");
    let mut monitor = MonitorBuilder::new()
        .sensors(FailingSensors::at(0))
        .transport(ScriptedTransport::default())
        .display(FrameBuffer::new(DISPLAY_WIDTH, DISPLAY_HEIGHT))
        .clock(ManualClock::new())
        .store(CsvStore::new(dir.path()))
        .cycle_ms(100)
        .log_interval_ms(1000)
        .try_build()
        .expect("all seams supplied");

    monitor.cycle().expect("sample trouble must not abort");

    // No row, no live line: a logged row comes from its own cycle's
    // sample, and this cycle had none.
    assert!(monitor.transport().sent.is_empty());
    let entries = std::fs::read_dir(dir.path()).expect("read dir").count();
    assert_eq!(entries, 0, "no log file without a good sample");
}

#[test]
fn builder_default_supplies_nothing() {
    let err = MonitorBuilder::<FixedSensors, ScriptedTransport, FrameBuffer, ManualClock>::default()
        .try_build()
        .expect_err("nothing supplied");
    assert!(matches!(err, BuildError::MissingSensors));
}

#[test]
fn builder_rejects_missing_seams() {
    let err = MonitorBuilder::<FixedSensors, ScriptedTransport, FrameBuffer, ManualClock>::new()
        .try_build()
        .expect_err("nothing supplied");
    assert!(matches!(err, BuildError::MissingSensors));
}

#[test]
fn builder_rejects_interval_shorter_than_cycle() {
    let dir = TempDir::new().expect("tempdir");
    let err = MonitorBuilder::new()
        .sensors(FixedSensors::ramp())
        .transport(ScriptedTransport::default())
        .display(FrameBuffer::new(DISPLAY_WIDTH, DISPLAY_HEIGHT))
        .clock(ManualClock::new())
        .store(CsvStore::new(dir.path()))
        .cycle_ms(100)
        .log_interval_ms(50)
        .try_build()
        .expect_err("interval below cycle");
    assert!(matches!(err, BuildError::InvalidConfig(_)));
}

#[test]
fn manual_clock_sleep_advances_time() {
    use pressmon_traits::Clock;
    let clock = ManualClock::new();
    let epoch = clock.now();
    clock.sleep(Duration::from_millis(250));
    assert_eq!(clock.ms_since(epoch), 250);
}

//! Inbound line interpreter.
//!
//! The monitor interleaves live updates with framed screenshot and CSV
//! export blocks. This state machine consumes one line at a time and
//! emits an event whenever a complete unit has arrived.

use pressmon_core::protocol::{
    CSV_EXPORT_BEGIN, CSV_EXPORT_END, DATA_PREFIX, FILENAME_PREFIX, NO_FILES_MSG, SCREENSHOT_BEGIN,
    SCREENSHOT_END, TIME_PREFIX,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Main,
    Screenshot,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Bare DATA line outside any frame.
    Live(Vec<u16>),
    /// A screenshot frame completed.
    ScreenshotDone {
        timestamp: String,
        values: Vec<u16>,
    },
    /// One exported CSV file completed.
    CsvFileDone { name: String, contents: String },
    /// The monitor reported that no logs are stored.
    NoFiles,
}

fn parse_values(line: &str) -> Option<Vec<u16>> {
    let body = line.strip_prefix(DATA_PREFIX)?;
    body.split(',')
        .map(|f| f.trim().parse::<u16>().ok())
        .collect()
}

#[derive(Debug, Default)]
pub struct ViewerState {
    mode: Option<Mode>,
    shot_time: String,
    shot_values: Vec<u16>,
    file_name: Option<String>,
    file_lines: Vec<String>,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or(Mode::Main)
    }

    fn commit_file(&mut self) -> Option<Event> {
        let name = self.file_name.take()?;
        let mut contents = self.file_lines.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        self.file_lines.clear();
        Some(Event::CsvFileDone { name, contents })
    }

    /// Consume one line; returns an event when something completed.
    /// Unrecognized lines outside a CSV frame are dropped.
    pub fn feed(&mut self, line: &str) -> Option<Event> {
        let line = line.trim_end_matches(['\r', '\n']);
        match self.mode() {
            Mode::Main => match line {
                SCREENSHOT_BEGIN => {
                    self.mode = Some(Mode::Screenshot);
                    self.shot_time.clear();
                    self.shot_values.clear();
                    None
                }
                CSV_EXPORT_BEGIN => {
                    self.mode = Some(Mode::Csv);
                    self.file_name = None;
                    self.file_lines.clear();
                    None
                }
                _ => parse_values(line).map(Event::Live),
            },
            Mode::Screenshot => {
                if line == SCREENSHOT_END {
                    self.mode = Some(Mode::Main);
                    return Some(Event::ScreenshotDone {
                        timestamp: std::mem::take(&mut self.shot_time),
                        values: std::mem::take(&mut self.shot_values),
                    });
                }
                if let Some(t) = line.strip_prefix(TIME_PREFIX) {
                    self.shot_time = t.to_string();
                } else if let Some(values) = parse_values(line) {
                    self.shot_values = values;
                }
                None
            }
            Mode::Csv => {
                // One frame carries every file; a new FILENAME or the
                // end marker closes out the file in progress.
                if line == CSV_EXPORT_END {
                    self.mode = Some(Mode::Main);
                    return self.commit_file();
                }
                if let Some(name) = line.strip_prefix(FILENAME_PREFIX) {
                    let done = self.commit_file();
                    self.file_name = Some(name.to_string());
                    return done;
                }
                if self.file_name.is_some() {
                    // Everything after a FILENAME is file body.
                    self.file_lines.push(line.to_string());
                    return None;
                }
                if line == NO_FILES_MSG {
                    return Some(Event::NoFiles);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_data_outside_frames() {
        let mut state = ViewerState::new();
        let line = format!("DATA:{}", vec!["3"; 15].join(","));
        match state.feed(&line) {
            Some(Event::Live(values)) => assert_eq!(values, vec![3u16; 15]),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(state.mode(), Mode::Main);
    }

    #[test]
    fn screenshot_frame_completes() {
        let mut state = ViewerState::new();
        assert_eq!(state.feed("SCREENSHOT_BEGIN"), None);
        assert_eq!(state.mode(), Mode::Screenshot);
        assert_eq!(state.feed("TIME:09:15:00"), None);
        assert_eq!(state.feed(&format!("DATA:{}", vec!["7"; 15].join(","))), None);
        match state.feed("SCREENSHOT_END") {
            Some(Event::ScreenshotDone { timestamp, values }) => {
                assert_eq!(timestamp, "09:15:00");
                assert_eq!(values, vec![7u16; 15]);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(state.mode(), Mode::Main);
    }

    #[test]
    fn csv_frame_keeps_body_verbatim() {
        let mut state = ViewerState::new();
        state.feed("CSV_EXPORT_BEGIN");
        state.feed("FILENAME:LOG00007.CSV");
        state.feed("Timestamp,S1");
        state.feed("10:00:00,5");
        match state.feed("CSV_EXPORT_END") {
            Some(Event::CsvFileDone { name, contents }) => {
                assert_eq!(name, "LOG00007.CSV");
                assert_eq!(contents, "Timestamp,S1\n10:00:00,5\n");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn data_inside_csv_frame_is_body_not_live() {
        let mut state = ViewerState::new();
        state.feed("CSV_EXPORT_BEGIN");
        state.feed("FILENAME:LOG00003.CSV");
        let line = format!("DATA:{}", vec!["1"; 15].join(","));
        assert_eq!(state.feed(&line), None);
        match state.feed("CSV_EXPORT_END") {
            Some(Event::CsvFileDone { contents, .. }) => {
                assert!(contents.contains("DATA:"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn two_files_in_one_frame() {
        let mut state = ViewerState::new();
        assert_eq!(state.feed("CSV_EXPORT_BEGIN"), None);
        assert_eq!(state.feed("FILENAME:LOG00001.CSV"), None);
        assert_eq!(state.feed("Timestamp,S1"), None);
        match state.feed("FILENAME:LOG00002.CSV") {
            Some(Event::CsvFileDone { name, contents }) => {
                assert_eq!(name, "LOG00001.CSV");
                assert_eq!(contents, "Timestamp,S1\n");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(state.feed("Timestamp,S1"), None);
        assert_eq!(state.feed("11:00:00,9"), None);
        match state.feed("CSV_EXPORT_END") {
            Some(Event::CsvFileDone { name, contents }) => {
                assert_eq!(name, "LOG00002.CSV");
                assert_eq!(contents, "Timestamp,S1\n11:00:00,9\n");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(state.mode(), Mode::Main);
    }

    #[test]
    fn no_files_sentinel_inside_frame() {
        let mut state = ViewerState::new();
        assert_eq!(state.feed("CSV_EXPORT_BEGIN"), None);
        assert_eq!(state.feed("No CSV files found"), Some(Event::NoFiles));
        assert_eq!(state.feed("CSV_EXPORT_END"), None);
        assert_eq!(state.mode(), Mode::Main);
    }

    #[test]
    fn garbage_outside_frames_is_dropped() {
        let mut state = ViewerState::new();
        assert_eq!(state.feed("???"), None);
        assert_eq!(state.feed("DATA:not,numbers"), None);
        assert_eq!(state.mode(), Mode::Main);
    }
}

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use topbar_core::{Result, TopbarError};
use tracing::debug;

pub const PACMAN_LOG: &str = "/var/log/pacman.log";

/// Shape of the line pacman writes when `-Syu` starts.
const UPGRADE_MARKER: &str = "[2000-01-01T00:00:00+0000] [PACMAN] starting full system upgrade";

/// Everything from the closing bracket of the timestamp onwards is fixed.
const MARKER_SUFFIX_AT: usize = 25;

const SECS_PER_HOUR: i64 = 60 * 60;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;
const SECS_PER_MONTH: i64 = 30 * SECS_PER_DAY;

/// Where upgrade history is read from.
pub trait LogSource {
    /// Last-modified time, queried without reading the content.
    fn modified(&self) -> io::Result<SystemTime>;

    /// Raw content; decoding is left to the caller.
    fn read_bytes(&self) -> io::Result<Vec<u8>>;
}

/// A log file on disk.
#[derive(Debug, Clone)]
pub struct FsLog {
    path: PathBuf,
}

impl FsLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LogSource for FsLog {
    fn modified(&self) -> io::Result<SystemTime> {
        std::fs::metadata(&self.path)?.modified()
    }

    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}

/// Tracks how long ago the last full system upgrade started.
///
/// The log is only rescanned when its modification time moves forward;
/// otherwise the cached upgrade time is reused.
#[derive(Debug)]
pub struct UpdateTracker<L = FsLog> {
    log:           L,
    last_modified: Option<SystemTime>,
    last_upgrade:  DateTime<Utc>,
}

impl UpdateTracker<FsLog> {
    pub fn new() -> Result<Self> {
        Self::with_source(FsLog::new(PACMAN_LOG))
    }
}

impl<L: LogSource> UpdateTracker<L> {
    /// Fails when the log cannot even be stat'ed.
    pub fn with_source(log: L) -> Result<Self> {
        log.modified()
            .map_err(|e| TopbarError::unavailable("updates", format!("upgrade log: {e}")))?;
        Ok(Self {
            log,
            last_modified: None,
            last_upgrade: DateTime::<Utc>::default(),
        })
    }

    pub fn source(&self) -> &L {
        &self.log
    }

    /// Start of the most recent upgrade seen so far (the Unix epoch if none).
    pub fn last_upgrade(&self) -> DateTime<Utc> {
        self.last_upgrade
    }

    pub fn sample(&mut self) -> Result<String> {
        self.sample_at(Utc::now())
    }

    pub fn sample_at(&mut self, now: DateTime<Utc>) -> Result<String> {
        let modified = self.log.modified()?;
        if !self.last_modified.is_some_and(|seen| modified <= seen) {
            let bytes = self.log.read_bytes()?;
            if let Some(upgrade) = latest_upgrade(&String::from_utf8_lossy(&bytes)) {
                self.last_upgrade = upgrade;
            }
            self.last_modified = Some(modified);
            debug!("Rescanned upgrade log; last upgrade at {}", self.last_upgrade);
        }

        Ok(format_elapsed(now.signed_duration_since(self.last_upgrade)))
    }
}

/// Timestamp of the last upgrade-start line in `text`.
fn latest_upgrade(text: &str) -> Option<DateTime<Utc>> {
    text.lines()
        .rev()
        .find(|line| is_upgrade_marker(line))
        .and_then(parse_timestamp)
}

fn is_upgrade_marker(line: &str) -> bool {
    let (line, marker) = (line.as_bytes(), UPGRADE_MARKER.as_bytes());
    line.len() == marker.len() && line[MARKER_SUFFIX_AT..] == marker[MARKER_SUFFIX_AT..]
}

/// Parse the leading `[yyyy-mm-ddThh:mm:ss±zzzz]` as local wall-clock time.
/// The offset field is ignored.
fn parse_timestamp(line: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(line.get(1..20)?, "%Y-%m-%dT%H:%M:%S").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// `m:<months> d:<days> h:<hours>` with 30-day months.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    let months = secs / SECS_PER_MONTH;
    let days = secs % SECS_PER_MONTH / SECS_PER_DAY;
    let hours = secs % SECS_PER_DAY / SECS_PER_HOUR;
    format!("m:{months} d:{days} h:{hours}")
}

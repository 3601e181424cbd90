//! Durable Usage Metrics
//!
//! Cumulative validation counters plus a bounded window of recent scores,
//! persisted to `metrics.json` with an atomic replace on every write.
//!
//! Privacy-first: no wallet addresses are ever stored.
//!
//! On-disk formats:
//! - v2 (current): `{"version":2,"total":..,"sum_duration_ms":..,"recent":[{"ts","score","dur"}]}`
//! - unversioned object with `total` (earlier revision, durations already in ms)
//! - v1 legacy list: `[{"timestamp","score","duration"}]`, duration in seconds,
//!   score either a number or `{"score": n}`
//!
//! Anything older is upgraded to v2 the first time the store is opened.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{MetricsSummary, RecentEvent, RecentScore};
use crate::utils::constants::{
    METRICS_FILE_NAME, METRICS_FORMAT_VERSION, RECENT_WINDOW_CAP, SUMMARY_RECENT_COUNT,
    UPTIME_FILE_NAME,
};

/// Persisted counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsState {
    #[serde(default)]
    pub total: u64,
    /// Sum of all recorded durations (ms)
    #[serde(default, alias = "sum_duration")]
    pub sum_duration_ms: f64,
    /// Most recent events, oldest first
    #[serde(default)]
    pub recent: Vec<RecentEvent>,
}

impl MetricsState {
    fn push(&mut self, event: RecentEvent) {
        self.total += 1;
        self.sum_duration_ms += event.dur;
        self.recent.push(event);
        if self.recent.len() > RECENT_WINDOW_CAP {
            let excess = self.recent.len() - RECENT_WINDOW_CAP;
            self.recent.drain(..excess);
        }
    }

    pub fn avg_duration_ms(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.sum_duration_ms / self.total as f64
        }
    }
}

/// Which on-disk shape a state was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredFormat {
    Current,
    Unversioned,
    LegacyList,
}

#[derive(Serialize)]
struct StoredMetrics<'a> {
    version: u32,
    #[serde(flatten)]
    state: &'a MetricsState,
}

#[derive(Debug, Deserialize)]
struct LegacyEvent {
    #[serde(default, deserialize_with = "lenient_f64")]
    timestamp: Option<f64>,
    #[serde(default)]
    score: Option<LegacyScore>,
    /// Seconds
    #[serde(default, deserialize_with = "lenient_f64")]
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LegacyScore {
    Plain(f64),
    Text(String),
    Nested {
        #[serde(default, deserialize_with = "lenient_f64")]
        score: Option<f64>,
    },
    Other(serde_json::Value),
}

impl LegacyScore {
    fn value(&self) -> u8 {
        let raw = match self {
            LegacyScore::Plain(v) => *v,
            LegacyScore::Text(s) => s.trim().parse().unwrap_or(0.0),
            LegacyScore::Nested { score } => score.unwrap_or(0.0),
            LegacyScore::Other(_) => 0.0,
        };
        clamp_score(raw)
    }
}

/// Number, numeric string, or anything else (read as absent)
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Number(n)) => Some(n),
        Some(Lenient::Text(s)) => s.trim().parse().ok(),
        Some(Lenient::Other(_)) | None => None,
    })
}

fn clamp_score(raw: f64) -> u8 {
    if raw.is_finite() {
        raw.clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

fn sanitize_duration(ms: f64) -> f64 {
    if ms.is_finite() && ms > 0.0 {
        ms
    } else {
        0.0
    }
}

/// Decode any known on-disk shape into the current state
pub fn decode_metrics(raw: &str) -> AppResult<(MetricsState, StoredFormat)> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| AppError::metrics_corrupt(format!("metrics file is not JSON: {}", e)))?;

    if value.is_array() {
        let events: Vec<LegacyEvent> = serde_json::from_value(value)
            .map_err(|e| AppError::metrics_corrupt(format!("bad legacy metrics list: {}", e)))?;
        return Ok((upgrade_legacy_list(events), StoredFormat::LegacyList));
    }
    if !value.is_object() {
        return Err(AppError::metrics_corrupt("unexpected metrics shape"));
    }

    match value.get("version").cloned() {
        Some(version) if version.as_u64() == Some(METRICS_FORMAT_VERSION as u64) => {
            let state = serde_json::from_value(value)
                .map_err(|e| AppError::metrics_corrupt(format!("bad v2 metrics: {}", e)))?;
            Ok((state, StoredFormat::Current))
        }
        Some(version) => Err(AppError::metrics_corrupt(format!(
            "unsupported metrics version {}",
            version
        ))),
        None if value.get("total").is_some() => {
            let state = serde_json::from_value(value)
                .map_err(|e| AppError::metrics_corrupt(format!("bad metrics object: {}", e)))?;
            Ok((state, StoredFormat::Unversioned))
        }
        None => Err(AppError::metrics_corrupt("metrics object without total")),
    }
}

fn upgrade_legacy_list(events: Vec<LegacyEvent>) -> MetricsState {
    let now = now_unix_secs();
    let durations_ms: Vec<f64> = events
        .iter()
        .map(|e| sanitize_duration(e.duration.unwrap_or(0.0) * 1000.0))
        .collect();

    let skip = events.len().saturating_sub(RECENT_WINDOW_CAP);
    let recent = events
        .iter()
        .zip(&durations_ms)
        .skip(skip)
        .map(|(e, dur)| RecentEvent {
            ts: e.timestamp.unwrap_or(now),
            score: e.score.as_ref().map(LegacyScore::value).unwrap_or(0),
            dur: *dur,
        })
        .collect();

    MetricsState {
        total: events.len() as u64,
        sum_duration_ms: durations_ms.iter().sum(),
        recent,
    }
}

/// File-backed metrics aggregator.
///
/// Load-modify-persist runs under one lock per instance; share the
/// instance (e.g. behind `Arc`) instead of opening the same directory twice.
#[derive(Debug)]
pub struct MetricsStore {
    path: PathBuf,
    start_time: f64,
    write_lock: Mutex<()>,
}

impl MetricsStore {
    /// Open the store in `dir`, creating the directory if needed.
    ///
    /// Establishes the uptime anchor and upgrades an older on-disk format.
    pub fn open(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .map_err(|e| AppError::metrics_persist_failed("create metrics dir", e))?;

        let start_time = load_or_init_start_time(&dir.join(UPTIME_FILE_NAME));
        let store = Self {
            path: dir.join(METRICS_FILE_NAME),
            start_time,
            write_lock: Mutex::new(()),
        };
        store.upgrade_in_place();
        Ok(store)
    }

    fn upgrade_in_place(&self) {
        let _guard = self.lock();
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return,
        };
        if let Ok((state, format)) = decode_metrics(&raw) {
            if format != StoredFormat::Current {
                info!(
                    "📦 Upgrading metrics file from {:?} format (total={}, sum={:.1}ms)",
                    format, state.total, state.sum_duration_ms
                );
                if let Err(e) = self.persist(&state) {
                    warn!(code = e.code_str(), "⚠️ Metrics upgrade not persisted: {}", e);
                }
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current durable state. A corrupt file reads as the empty baseline.
    pub fn load(&self) -> AppResult<MetricsState> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(MetricsState::default()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorCode::MetricsCorruptState,
                    "read metrics file",
                    e,
                ))
            }
        };

        match decode_metrics(&raw) {
            Ok((state, _)) => Ok(state),
            Err(e) => {
                warn!(code = e.code_str(), "⚠️ Resetting metrics to empty baseline: {}", e.message);
                Ok(MetricsState::default())
            }
        }
    }

    /// Record one validation: score plus how long it took.
    pub fn record_event(&self, score: u8, duration_ms: f64) -> AppResult<()> {
        let _guard = self.lock();
        let mut state = self.load()?;
        state.push(RecentEvent {
            ts: now_unix_secs(),
            score: score.min(100),
            dur: sanitize_duration(duration_ms),
        });
        self.persist(&state)?;
        debug!("📊 Metrics recorded (total={})", state.total);
        Ok(())
    }

    /// Totals, average duration, uptime and the last few scores
    pub fn summary(&self) -> AppResult<MetricsSummary> {
        let state = self.load()?;
        let avg = state.avg_duration_ms();
        let skip = state.recent.len().saturating_sub(SUMMARY_RECENT_COUNT);

        Ok(MetricsSummary {
            status: "online".to_string(),
            uptime_sec: self.uptime_secs(),
            total: state.total,
            avg_response_ms: avg,
            last: state.recent.iter().skip(skip).map(RecentScore::from).collect(),
            total_validations: state.total,
            average_response_time: avg / 1000.0,
            error: None,
        })
    }

    /// Full recent-history window, oldest first
    pub fn recent_window(&self) -> AppResult<Vec<RecentEvent>> {
        Ok(self.load()?.recent)
    }

    /// Unix seconds of the first-ever run
    pub fn service_start_time(&self) -> f64 {
        self.start_time
    }

    pub fn uptime_secs(&self) -> u64 {
        (now_unix_secs() - self.start_time).max(0.0) as u64
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &MetricsState) -> AppResult<()> {
        let payload = serde_json::to_vec(&StoredMetrics {
            version: METRICS_FORMAT_VERSION,
            state,
        })
        .map_err(|e| AppError::metrics_persist_failed("serialize metrics", e))?;
        write_atomic(&self.path, &payload)
    }
}

/// Write to a sibling temp file, fsync, then rename over `target`
fn write_atomic(target: &Path, payload: &[u8]) -> AppResult<()> {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| METRICS_FILE_NAME.to_string());
    let tmp = target.with_file_name(format!("{}.{}.tmp", file_name, std::process::id()));

    let written = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp)?;
        file.write_all(payload)?;
        file.sync_all()?;
        fs::rename(&tmp, target)
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(AppError::metrics_persist_failed(
            format!("write {}", target.display()),
            e,
        ));
    }
    Ok(())
}

fn load_or_init_start_time(path: &Path) -> f64 {
    match fs::read_to_string(path) {
        Ok(raw) => match raw.trim().parse::<f64>() {
            Ok(start) if start.is_finite() => start,
            _ => {
                warn!("⚠️ Unreadable uptime anchor at {}, using now", path.display());
                now_unix_secs()
            }
        },
        Err(_) => {
            let now = now_unix_secs();
            if let Err(e) = write_atomic(path, now.to_string().as_bytes()) {
                warn!(code = e.code_str(), "⚠️ Uptime anchor not persisted: {}", e);
            }
            now
        }
    }
}

fn now_unix_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

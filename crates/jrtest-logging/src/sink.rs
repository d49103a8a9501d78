//! Host log sink and its global manager

use jrtest_core::LogLevel;
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Destination for log events owned by the host platform
///
/// `template` is the message as written at the call site, never
/// interpolated; `fields` carries the structured values.
pub trait HostLogSink: Send + Sync {
    fn log(&self, level: LogLevel, target: &str, template: &str, fields: &BTreeMap<String, String>);
}

static SINK_MANAGER: OnceCell<LogSinkManager> = OnceCell::new();

/// Holds the installed sink and the minimum enabled level
pub struct LogSinkManager {
    sink: RwLock<Option<Arc<dyn HostLogSink>>>,
    level: AtomicU8,
}

impl LogSinkManager {
    pub fn new() -> Self {
        Self {
            sink: RwLock::new(None),
            level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    pub fn global() -> &'static LogSinkManager {
        SINK_MANAGER.get_or_init(LogSinkManager::new)
    }

    pub fn set_sink(&self, sink: Arc<dyn HostLogSink>) {
        *self.sink.write() = Some(sink);
    }

    pub fn clear_sink(&self) {
        *self.sink.write() = None;
    }

    pub fn has_sink(&self) -> bool {
        self.sink.read().is_some()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::SeqCst))
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.level()
    }

    /// Forward to the sink if one is installed and `level` is enabled
    pub fn log(
        &self,
        level: LogLevel,
        target: &str,
        template: &str,
        fields: &BTreeMap<String, String>,
    ) {
        if !self.is_enabled(level) {
            return;
        }
        // Clone the Arc so the sink runs without the lock held
        let sink = self.sink.read().clone();
        if let Some(sink) = sink {
            sink.log(level, target, template, fields);
        }
    }
}

impl Default for LogSinkManager {
    fn default() -> Self {
        Self::new()
    }
}

/// One event as seen by a [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    pub level: LogLevel,
    pub target: String,
    pub template: String,
    pub fields: BTreeMap<String, String>,
}

/// Sink that keeps every record in memory, for tests and local runs
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<CapturedRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().clone()
    }

    /// Records whose template matches exactly
    pub fn with_template(&self, template: &str) -> Vec<CapturedRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.template == template)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl HostLogSink for MemorySink {
    fn log(
        &self,
        level: LogLevel,
        target: &str,
        template: &str,
        fields: &BTreeMap<String, String>,
    ) {
        self.records.lock().push(CapturedRecord {
            level,
            target: target.to_string(),
            template: template.to_string(),
            fields: fields.clone(),
        });
    }
}

#[cfg(test)]
#[path = "sink/sink_tests.rs"]
mod sink_tests;

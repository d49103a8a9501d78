//! Runtime log level changes

use crate::layer::level_filter;
use crate::sink::LogSinkManager;
use jrtest_core::LogLevel;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::reload;

type FilterHandle = reload::Handle<LevelFilter, tracing_subscriber::Registry>;

/// Handle to the reloadable level filter installed by [`init_logging`](crate::init_logging)
pub struct ReloadHandle {
    handle: Mutex<Option<FilterHandle>>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    pub fn global() -> &'static ReloadHandle {
        static INSTANCE: OnceCell<ReloadHandle> = OnceCell::new();
        INSTANCE.get_or_init(ReloadHandle::new)
    }

    pub fn set_handle(&self, handle: FilterHandle) {
        *self.handle.lock() = Some(handle);
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Apply `level` to the sink manager and, once installed, to the filter
    pub fn reload_level(&self, level: LogLevel) -> Result<(), String> {
        LogSinkManager::global().set_level(level);
        let guard = self.handle.lock();
        let Some(handle) = guard.as_ref() else {
            return Err("reload handle not initialized".to_string());
        };
        handle
            .reload(level_filter(level))
            .map_err(|e| format!("failed to reload filter: {}", e))
    }
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

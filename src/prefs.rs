//! Per-view display preferences
//!
//! The daily and weekly views each persist a show-all-hours toggle and an
//! inclusive start/end hour across sessions (the web client used
//! localStorage keys like `dailyView_startHour`). The store is an injected
//! interface so the resolvers and CLI handlers can be exercised without a
//! real file behind them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::slot::HourRange;

/// Name of the preferences file inside the daisy config directory.
pub const PREFS_FILE: &str = "prefs.toml";

/// Display preferences for one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPrefs {
    #[serde(default)]
    pub show_all_hours: bool,

    #[serde(default = "default_start_hour")]
    pub start_hour: u32,

    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
}

fn default_start_hour() -> u32 {
    8
}

fn default_end_hour() -> u32 {
    20
}

impl Default for ViewPrefs {
    fn default() -> Self {
        Self {
            show_all_hours: false,
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
        }
    }
}

impl ViewPrefs {
    /// The hour range these preferences resolve to.
    pub fn hour_range(&self) -> Result<HourRange> {
        if self.show_all_hours {
            Ok(HourRange::all())
        } else {
            HourRange::new(self.start_hour, self.end_hour)
        }
    }
}

/// Read/write access to per-view preferences, keyed by view name
/// (`"daily"`, `"weekly"`).
pub trait PrefStore {
    fn load(&self, view: &str) -> Result<ViewPrefs>;
    fn save(&self, view: &str, prefs: ViewPrefs) -> Result<()>;
}

/// File-backed store: one TOML table per view.
#[derive(Debug, Clone)]
pub struct FilePrefStore {
    path: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(flatten)]
    views: BTreeMap<String, ViewPrefs>,
}

impl FilePrefStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store in the default daisy config directory.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(crate::config::config_dir()?.join(PREFS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<PrefsFile> {
        if !self.path.exists() {
            return Ok(PrefsFile::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl PrefStore for FilePrefStore {
    fn load(&self, view: &str) -> Result<ViewPrefs> {
        let file = self.read_file()?;
        Ok(file.views.get(view).copied().unwrap_or_default())
    }

    fn save(&self, view: &str, prefs: ViewPrefs) -> Result<()> {
        let mut file = self.read_file()?;
        file.views.insert(view.to_string(), prefs);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(&file)?)?;
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryPrefStore {
    views: Mutex<BTreeMap<String, ViewPrefs>>,
}

impl PrefStore for MemoryPrefStore {
    fn load(&self, view: &str) -> Result<ViewPrefs> {
        let views = self
            .views
            .lock()
            .map_err(|_| crate::error::Error::OperationFailed("prefs lock poisoned".into()))?;
        Ok(views.get(view).copied().unwrap_or_default())
    }

    fn save(&self, view: &str, prefs: ViewPrefs) -> Result<()> {
        let mut views = self
            .views
            .lock()
            .map_err(|_| crate::error::Error::OperationFailed("prefs lock poisoned".into()))?;
        views.insert(view.to_string(), prefs);
        Ok(())
    }
}

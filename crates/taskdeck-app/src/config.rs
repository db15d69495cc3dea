//! Configuration loaded from `config.toml`.
//!
//! Every block and field is optional; a missing file yields the defaults.
//! Callers resolve the file location (platform config dir, `--config` flag)
//! and hand the path in.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use taskdeck_core::{SortOption, TaskStatus};
use time::Duration;

use crate::undo::{DELETE_UNDO_WINDOW, TOGGLE_UNDO_WINDOW};

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Task document location.
    #[serde(default)]
    pub store: StoreConfig,
    /// Initial projection settings.
    #[serde(default)]
    pub list: ListConfig,
    /// Undo affordance windows.
    #[serde(default)]
    pub undo: UndoConfig,
}

impl AppConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    /// Fails when the file cannot be read, is not valid TOML, or contains
    /// values that do not validate (unknown labels, non-positive windows).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.list.sort_option()?;
        self.list.filter_status()?;
        self.undo.ensure_positive_windows()
    }
}

/// `[store]` block.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    path: Option<PathBuf>,
}

impl StoreConfig {
    /// Configured task document path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// `[list]` block: initial sort and filter labels.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListConfig {
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    filter: Option<String>,
}

impl ListConfig {
    /// Initial sort option; alphabetical unless configured.
    ///
    /// # Errors
    /// Fails when the configured label is not one of `priority`, `due`,
    /// `alpha`.
    pub fn sort_option(&self) -> Result<SortOption> {
        match self.sort.as_deref() {
            Some(label) => Ok(label.parse()?),
            None => Ok(SortOption::ByAlphabetical),
        }
    }

    /// Initial status filter; none unless configured.
    ///
    /// # Errors
    /// Fails when the configured label is not `pending` or `completed`.
    pub fn filter_status(&self) -> Result<Option<TaskStatus>> {
        self.filter
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(Into::into)
    }
}

/// `[undo]` block: affordance visibility windows in whole seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct UndoConfig {
    #[serde(default = "default_delete_window")]
    delete_window_secs: i64,
    #[serde(default = "default_toggle_window")]
    toggle_window_secs: i64,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            delete_window_secs: default_delete_window(),
            toggle_window_secs: default_toggle_window(),
        }
    }
}

impl UndoConfig {
    /// Visibility window for the delete-undo affordance.
    #[must_use]
    pub const fn delete_window(&self) -> Duration {
        Duration::seconds(self.delete_window_secs)
    }

    /// Visibility window for the toggle-undo affordance.
    #[must_use]
    pub const fn toggle_window(&self) -> Duration {
        Duration::seconds(self.toggle_window_secs)
    }

    fn ensure_positive_windows(&self) -> Result<()> {
        if self.delete_window_secs <= 0 {
            bail!(
                "undo delete window must be positive, got {}",
                self.delete_window_secs
            );
        }
        if self.toggle_window_secs <= 0 {
            bail!(
                "undo toggle window must be positive, got {}",
                self.toggle_window_secs
            );
        }
        Ok(())
    }
}

const fn default_delete_window() -> i64 {
    DELETE_UNDO_WINDOW.whole_seconds()
}

const fn default_toggle_window() -> i64 {
    TOGGLE_UNDO_WINDOW.whole_seconds()
}

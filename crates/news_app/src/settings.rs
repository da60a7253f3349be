use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use news_core::{LoadQuery, DEFAULT_ORDER_BY, SECTION_ALL};
use news_logging::{news_debug, news_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::SettingsSource;

pub const SETTINGS_FILENAME: &str = "news_settings.ron";

/// Query preferences edited by the settings screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSettings {
    pub keyword: String,
    pub section: String,
    pub order_by: String,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            section: SECTION_ALL.to_string(),
            order_by: DEFAULT_ORDER_BY.to_string(),
        }
    }
}

impl SettingsSource for NewsSettings {
    fn keyword(&self) -> String {
        self.keyword.clone()
    }

    fn section(&self) -> String {
        self.section.clone()
    }

    fn order_by(&self) -> String {
        self.order_by.clone()
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}

/// RON file holding [`NewsSettings`]. Every read goes to disk, so edits made
/// by another screen are picked up by the next load cycle.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SETTINGS_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file yields the defaults.
    pub fn load(&self) -> Result<NewsSettings, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(NewsSettings::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(ron::from_str(&content)?)
    }

    /// Writes to a temp file in the same directory, then renames over the
    /// target so readers never see a partial file.
    pub fn save(&self, settings: &NewsSettings) -> Result<(), SettingsError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let content = ron::ser::to_string_pretty(settings, ron::ser::PrettyConfig::new())?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|err| SettingsError::Io(err.error))?;
        news_debug!("Saved settings to {:?}", self.path);
        Ok(())
    }

    fn current(&self) -> NewsSettings {
        self.load().unwrap_or_else(|err| {
            news_warn!(
                "Falling back to default settings, cannot read {:?}: {}",
                self.path,
                err
            );
            NewsSettings::default()
        })
    }
}

impl SettingsSource for SettingsStore {
    fn keyword(&self) -> String {
        self.current().keyword
    }

    fn section(&self) -> String {
        self.current().section
    }

    fn order_by(&self) -> String {
        self.current().order_by
    }

    fn load_query(&self) -> LoadQuery {
        let settings = self.current();
        LoadQuery::new(settings.keyword, settings.section, settings.order_by)
    }
}

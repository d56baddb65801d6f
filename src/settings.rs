use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use dirs::config_dir;
use serde::{Deserialize, Serialize};
use serde_json as json;
use tracing::warn;

use crate::error::SettingsError;

/// Engine policy chosen by the player.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Settings {
    /// Promote safe cards to the foundations after every move.
    pub auto_complete: bool,
}

#[derive(Deserialize)]
struct SettingsFile {
    auto_complete: Option<bool>,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings{
            auto_complete: true,
        }
    }
}

impl From<SettingsFile> for Settings {
    fn from(s: SettingsFile) -> Settings {
        let def = Settings::default();

        Settings{
            auto_complete: s.auto_complete.unwrap_or(def.auto_complete),
        }
    }
}

impl Settings {
    /// Default location of the settings file.
    pub fn path() -> Result<PathBuf, SettingsError> {
        let config = config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(config.join("freecell-core/settings.json"))
    }

    /// Loads settings from the default location.
    ///
    /// Falls back to defaults, with a warning, if the file cannot be read.
    pub fn load() -> Settings {
        match Settings::path().and_then(|p| Settings::load_from(&p)) {
            Ok(s) => s,
            Err(e) => {
                warn!("failed to load settings: {}", e);
                Settings::default()
            }
        }
    }

    /// Loads settings from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Settings, SettingsError> {
        let mut f = match File::open(path) {
            Ok(f) => f,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound =>
                return Ok(Settings::default()),
            Err(e) => return Err(e.into())
        };

        let mut buf = String::new();

        f.read_to_string(&mut buf)?;

        let sf: SettingsFile = json::from_str(&buf)?;

        Ok(sf.into())
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Settings::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut f = File::create(path)?;
        let mut data = json::to_string(self)?;

        data.push('\n');

        f.write_all(data.as_bytes())?;

        Ok(())
    }
}

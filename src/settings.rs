// Import necessary libraries and modules for file I/O and serialization.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;
use crate::localization::DEFAULT_LANGUAGE;
use crate::lookups::{Lookups, STANDARD_LOOKUPS, WeaponType};
use crate::sheet::{DispatchMode, SheetOptions};
use crate::ui::item_sheet::SHEET_CHROME_ROWS;

pub const SETTINGS_PATH: &str = "./data/settings.json";
pub const DEFAULT_STORE_PATH: &str = "./data/items.json";

// Application settings, persisted as JSON with camelCase keys like the store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub language: String,             // Language file used for labels.
    pub store_path: PathBuf,          // Where item records are kept.
    pub dispatch_mode: DispatchMode,  // Exclusive or legacy fall-through augmentation.
    pub editable: bool,               // Open sheets read-only when false.
    pub chrome_height: u32,           // Space reserved around the sheet body.
    pub attack_skills: BTreeMap<WeaponType, Vec<String>>, // House-rule overrides.
    pub debug_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            language: DEFAULT_LANGUAGE.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            dispatch_mode: DispatchMode::Exclusive,
            editable: true,
            chrome_height: u32::from(SHEET_CHROME_ROWS),
            attack_skills: BTreeMap::new(),
            debug_mode: false,
        }
    }
}

impl Settings {
    // Load settings from the default path, or defaults when there is no file yet.
    pub fn load() -> Result<Self, SettingsError> {
        let path = Path::new(SETTINGS_PATH);
        if !path.exists() {
            log::info!("No settings file, using defaults");
            return Ok(Self::default());
        }
        Self::load_settings_from_file(path)
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to_file(SETTINGS_PATH)
    }

    pub fn load_settings_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?; // Create the directory if it doesn't exist.
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    // The option tables with this install's attack skill overrides applied.
    pub fn lookups(&self) -> Lookups {
        STANDARD_LOOKUPS.clone().with_attack_skills(&self.attack_skills)
    }

    pub fn sheet_options(&self) -> SheetOptions {
        let options = SheetOptions::default().with_chrome_height(self.chrome_height);
        if self.editable {
            options
        } else {
            options.read_only()
        }
    }
}

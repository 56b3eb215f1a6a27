// localization.rs
use include_dir::{Dir, include_dir};
use std::collections::HashMap;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets/lang");

pub const DEFAULT_LANGUAGE: &str = "en";

// Key -> display string table. Missing keys resolve to the key itself.
#[derive(Debug, Clone, Default)]
pub struct Localizer {
    language: String,
    entries: HashMap<String, String>,
}

impl Localizer {
    // Load an embedded language file, falling back to English when it is missing or broken.
    pub fn load(language: &str) -> Self {
        match Self::embedded(language) {
            Some(entries) => Self {
                language: language.to_string(),
                entries,
            },
            None => {
                log::warn!("No usable language file for '{language}', using {DEFAULT_LANGUAGE}");
                Self {
                    language: DEFAULT_LANGUAGE.to_string(),
                    entries: Self::embedded(DEFAULT_LANGUAGE).unwrap_or_default(),
                }
            }
        }
    }

    fn embedded(language: &str) -> Option<HashMap<String, String>> {
        let file = LANG_DIR.get_file(format!("{language}.json"))?;
        let text = file.contents_utf8()?;
        match serde_json::from_str(text) {
            Ok(entries) => Some(entries),
            Err(e) => {
                log::error!("Language file {language}.json is not valid JSON: {e}");
                None
            }
        }
    }

    pub fn available_languages() -> Vec<String> {
        let mut languages: Vec<String> = LANG_DIR
            .files()
            .filter_map(|f| f.path().file_stem()?.to_str().map(String::from))
            .collect();
        languages.sort();
        languages
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn localize(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    // Skill identifiers are localized through `Skill<Name>` keys.
    pub fn skill(&self, name: &str) -> String {
        self.localize(&format!("Skill{name}"))
    }
}

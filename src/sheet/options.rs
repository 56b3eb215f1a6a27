// sheet/options.rs
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

// Height taken by the header, tab bar and footer around the sheet body.
pub const DEFAULT_CHROME_HEIGHT: u32 = 192;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum SheetTab {
    #[default]
    Description,
    Details,
}

impl SheetTab {
    pub fn next(self) -> Self {
        match self {
            SheetTab::Description => SheetTab::Details,
            SheetTab::Details => SheetTab::Description,
        }
    }

    // Localization key for the tab label.
    pub fn label_key(self) -> &'static str {
        match self {
            SheetTab::Description => "SheetDescription",
            SheetTab::Details => "SheetDetails",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetOptions {
    pub classes: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub editable: bool,
    pub chrome_height: u32,
    pub initial_tab: SheetTab,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            classes: vec!["cyberpunk".into(), "sheet".into(), "item".into()],
            width: 520,
            height: 480,
            editable: true,
            chrome_height: DEFAULT_CHROME_HEIGHT,
            initial_tab: SheetTab::Description,
        }
    }
}

impl SheetOptions {
    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn with_chrome_height(mut self, chrome_height: u32) -> Self {
        self.chrome_height = chrome_height;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

// Partial position change; unset fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionUpdate {
    pub left: Option<u32>,
    pub top: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl PositionUpdate {
    pub fn size(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn height(height: u32) -> Self {
        Self {
            height: Some(height),
            ..Self::default()
        }
    }
}

impl Position {
    pub fn apply(self, update: PositionUpdate) -> Self {
        Self {
            left: update.left.unwrap_or(self.left),
            top: update.top.unwrap_or(self.top),
            width: update.width.unwrap_or(self.width),
            height: update.height.unwrap_or(self.height),
        }
    }
}

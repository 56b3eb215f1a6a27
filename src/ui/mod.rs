// ui/mod.rs

mod draw;
pub mod item_list;
pub mod item_sheet;
pub mod keymap;
mod utils;

pub use draw::{MIN_HEIGHT, MIN_WIDTH, draw, sheet_area};
pub use utils::buffer_text;

// sheet/mod.rs

mod fields;
mod item_sheet;
mod options;
mod view;

pub use fields::{SheetField, editable_fields};
pub use item_sheet::{ActionOutcome, ItemSheet, SheetAction, SheetEvent, SheetResponse};
pub use options::{Position, PositionUpdate, SheetOptions, SheetTab};
pub use view::{DispatchMode, ItemView, ViewAdapter};

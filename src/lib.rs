pub mod actor;
pub mod app;
pub mod dice;
pub mod error;
pub mod item;
pub mod localization;
pub mod logging;
pub mod lookups;
pub mod message;
pub mod settings;
pub mod sheet;
pub mod store;
pub mod tui;
pub mod ui;

// Re-export commonly used items for easier access
pub use app::App;
pub use actor::{Actor, ActorId, Owner, SkillSource};
pub use dice::{DiceRoller, RandomRoller, SequenceRoller};
pub use error::{AppError, ItemError, SettingsError, SheetError, StoreError};
pub use item::{HumanityCost, HumanityLoss, Item, ItemData, ItemId, LossSource};
pub use localization::Localizer;
pub use lookups::Lookups;
pub use message::{Message, MessageType};
pub use settings::Settings;
pub use sheet::{
    ActionOutcome, DispatchMode, ItemSheet, ItemView, PositionUpdate, SheetAction, SheetEvent,
    SheetField, SheetOptions, ViewAdapter,
};
pub use store::RecordStore;

use crate::actor::ActorId;
use crate::item::ItemId;
use thiserror::Error;

// Enum for handling various application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("No item selected")]
    NoItemSelected,
}

// Errors raised by an item's own routines (roll, accel, field edits).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItemError {
    #[error("{0} items cannot be rolled")]
    NotRollable(&'static str),

    #[error("{0} items have no speed to change")]
    NotAVehicle(&'static str),

    #[error("{item_type} items have no {field} field")]
    NoSuchField {
        field: &'static str,
        item_type: &'static str,
    },

    #[error("'{value}' is not a valid {field}")]
    InvalidOption { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Item {item} belongs to unknown actor {actor}")]
    DanglingOwner { item: ItemId, actor: ActorId },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("The sheet is read-only")]
    ReadOnly,

    #[error(transparent)]
    Item(#[from] ItemError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

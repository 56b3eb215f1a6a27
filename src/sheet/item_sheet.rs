// sheet/item_sheet.rs
use std::sync::Arc;

use crate::actor::SkillSource;
use crate::dice::DiceRoller;
use crate::error::SheetError;
use crate::item::{HumanityLoss, ItemId, RollReport, Speed};
use crate::store::RecordStore;

use super::{
    ItemView, Position, PositionUpdate, SheetField, SheetOptions, SheetTab, ViewAdapter,
    editable_fields,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetAction {
    Roll,
    Accelerate,
    Decelerate,
    HumanityCostRoll,
    FocusNextField,
    NextOption,
    PreviousOption,
}

const ALL_ACTIONS: [SheetAction; 7] = [
    SheetAction::Roll,
    SheetAction::Accelerate,
    SheetAction::Decelerate,
    SheetAction::HumanityCostRoll,
    SheetAction::FocusNextField,
    SheetAction::NextOption,
    SheetAction::PreviousOption,
];

// A user interaction aimed at the sheet. Events bubble to the surrounding
// host unless a handler stops them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetEvent {
    pub action: SheetAction,
    propagate: bool,
}

impl SheetEvent {
    pub fn new(action: SheetAction) -> Self {
        Self {
            action,
            propagate: true,
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagate = false;
    }

    pub fn propagates(&self) -> bool {
        self.propagate
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Rolled(RollReport),
    SpeedChanged(Speed),
    HumanityLoss(HumanityLoss),
    FocusChanged(SheetField),
    FieldChanged { field: SheetField, value: String },
    // The record has nothing the action applies to.
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetResponse {
    pub render: bool,
    pub outcome: ActionOutcome,
}

impl SheetResponse {
    fn ignored() -> Self {
        Self {
            render: false,
            outcome: ActionOutcome::Ignored,
        }
    }
}

/// Item sheet bound to one record in the store.
///
/// The sheet keeps only the record id. Every call re-reads the live record
/// from the store it is handed.
#[derive(Debug, Clone)]
pub struct ItemSheet {
    item_id: ItemId,
    options: SheetOptions,
    adapter: Arc<ViewAdapter>,
    position: Position,
    body_height: u32,
    active_tab: SheetTab,
    focused: Option<SheetField>,
}

impl ItemSheet {
    pub fn new(item_id: ItemId, options: SheetOptions, adapter: Arc<ViewAdapter>) -> Self {
        let position = Position {
            width: options.width,
            height: options.height,
            ..Position::default()
        };
        let body_height = position.height.saturating_sub(options.chrome_height);
        let active_tab = options.initial_tab;
        Self {
            item_id,
            options,
            adapter,
            position,
            body_height,
            active_tab,
            focused: None,
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    pub fn is_editable(&self) -> bool {
        self.options.editable
    }

    pub fn active_tab(&self) -> SheetTab {
        self.active_tab
    }

    pub fn set_tab(&mut self, tab: SheetTab) {
        self.active_tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.active_tab = self.active_tab.next();
    }

    pub fn focused_field(&self) -> Option<SheetField> {
        self.focused
    }

    // Called before every render.
    pub fn get_data(&self, store: &RecordStore) -> Result<ItemView, SheetError> {
        let item = store.item(self.item_id)?;
        let owner = store.owner_of(self.item_id)?;
        let mut view = self
            .adapter
            .view(item, owner.as_ref().map(|o| o as &dyn SkillSource));
        view.editable = self.options.editable;
        view.active_tab = self.active_tab;
        view.focused_field = self.focused;
        Ok(view)
    }

    // Resize the sheet. The scrollable body gets whatever the chrome leaves,
    // never less than zero.
    pub fn set_position(&mut self, update: PositionUpdate) -> Position {
        self.position = self.position.apply(update);
        self.body_height = self
            .position
            .height
            .saturating_sub(self.options.chrome_height);
        log::debug!(
            "Sheet {} resized to {}x{}, body height {}",
            self.item_id,
            self.position.width,
            self.position.height,
            self.body_height
        );
        self.position
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn body_height(&self) -> u32 {
        self.body_height
    }

    // Actions the host may bind. Read-only sheets bind nothing.
    pub fn activate_listeners(&self) -> Vec<SheetAction> {
        if !self.options.editable {
            return Vec::new();
        }
        ALL_ACTIONS.to_vec()
    }

    pub fn handle(
        &mut self,
        event: &mut SheetEvent,
        store: &mut RecordStore,
        roller: &mut dyn DiceRoller,
    ) -> Result<SheetResponse, SheetError> {
        if !self.options.editable {
            return Err(SheetError::ReadOnly);
        }

        match event.action {
            SheetAction::Roll => self.roll(store, roller),
            SheetAction::Accelerate => self.accel(store, false),
            SheetAction::Decelerate => self.accel(store, true),
            SheetAction::HumanityCostRoll => {
                event.stop_propagation();
                self.roll_humanity_cost(store, roller)
            }
            SheetAction::FocusNextField => self.focus_next_field(store),
            SheetAction::NextOption => self.cycle_option(store, true),
            SheetAction::PreviousOption => self.cycle_option(store, false),
        }
    }

    fn roll(
        &self,
        store: &RecordStore,
        roller: &mut dyn DiceRoller,
    ) -> Result<SheetResponse, SheetError> {
        let item = store.item(self.item_id)?;
        let owner = store.owner_of(self.item_id)?;
        let report = item.roll(owner.as_ref().map(|o| o as &dyn SkillSource), roller)?;
        log::info!("{}", report.describe());
        Ok(SheetResponse {
            render: false,
            outcome: ActionOutcome::Rolled(report),
        })
    }

    fn accel(&self, store: &mut RecordStore, decelerate: bool) -> Result<SheetResponse, SheetError> {
        let speed = store.update_item(self.item_id, |item| item.accel(decelerate))??;
        log::debug!("Item {} speed now {}", self.item_id, speed.value);
        Ok(SheetResponse {
            render: true,
            outcome: ActionOutcome::SpeedChanged(speed),
        })
    }

    fn roll_humanity_cost(
        &self,
        store: &mut RecordStore,
        roller: &mut dyn DiceRoller,
    ) -> Result<SheetResponse, SheetError> {
        let Some(loss) = store.item(self.item_id)?.resolve_humanity_loss(roller) else {
            log::warn!("Item {} has no humanity cost to roll", self.item_id);
            return Ok(SheetResponse::ignored());
        };

        store.update_item(self.item_id, |item| item.set_humanity_loss(loss.value))?;
        log::info!("{}", loss.describe());
        Ok(SheetResponse {
            render: true,
            outcome: ActionOutcome::HumanityLoss(loss),
        })
    }

    // Move focus to the next editable field, wrapping after the last one.
    fn focus_next_field(&mut self, store: &RecordStore) -> Result<SheetResponse, SheetError> {
        let fields = editable_fields(&self.get_data(store)?);
        let next = match self
            .focused
            .and_then(|focused| fields.iter().position(|field| *field == focused))
        {
            Some(index) => fields.get((index + 1) % fields.len()),
            None => fields.first(),
        };
        let Some(&field) = next else {
            return Ok(SheetResponse::ignored());
        };
        self.focused = Some(field);
        Ok(SheetResponse {
            render: true,
            outcome: ActionOutcome::FocusChanged(field),
        })
    }

    // Step the focused field through its option list and write the choice back.
    // A value missing from the list starts from the first (or last) option.
    fn cycle_option(
        &self,
        store: &mut RecordStore,
        forward: bool,
    ) -> Result<SheetResponse, SheetError> {
        let Some(field) = self.focused else {
            return Ok(SheetResponse::ignored());
        };
        let view = self.get_data(store)?;
        let Some(options) = field.options(&view).filter(|options| !options.is_empty()) else {
            return Ok(SheetResponse::ignored());
        };

        let len = options.len();
        let current = field
            .value(&view.item.data)
            .and_then(|value| options.iter().position(|option| *option == value));
        let index = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        let value = options[index].clone();

        store.update_item(self.item_id, |item| field.set(&mut item.data, &value))??;
        log::debug!("Item {} {} set to {value}", self.item_id, field.label());
        Ok(SheetResponse {
            render: true,
            outcome: ActionOutcome::FieldChanged { field, value },
        })
    }
}

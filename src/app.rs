// /app.rs
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    dice::DiceRoller,
    error::{AppError, Result, SheetError},
    item::ItemId,
    localization::Localizer,
    message::{Message, MessageLog, MessageType},
    settings::Settings,
    sheet::{ActionOutcome, ItemSheet, ItemView, PositionUpdate, SheetAction, SheetEvent, ViewAdapter},
    store::RecordStore,
    tui::{Tui, TuiEvent},
    ui::{
        self,
        keymap::{self, Action},
    },
};

pub struct App {
    // Application state and control flow
    running: bool,
    show_help: bool,

    // --- Global information
    settings: Settings,
    store_path: PathBuf,
    adapter: Arc<ViewAdapter>,
    roller: Box<dyn DiceRoller>,

    // --- Records
    store: RecordStore,
    item_ids: Vec<ItemId>,
    sheet: Option<ItemSheet>,
    pub list_state: ListState,

    // --- UI elements
    messages: MessageLog,
    sheet_area: Rect,
}

impl App {
    pub fn new(
        settings: Settings,
        store_path: PathBuf,
        store: RecordStore,
        roller: Box<dyn DiceRoller>,
    ) -> Self {
        let lookups = Arc::new(settings.lookups());
        let localizer = Arc::new(Localizer::load(&settings.language));
        let adapter = Arc::new(ViewAdapter::new(lookups, localizer, settings.dispatch_mode));
        let item_ids = store.item_ids();

        let mut app = Self {
            running: true,
            show_help: false,
            settings,
            store_path,
            adapter,
            roller,
            store,
            item_ids,
            sheet: None,
            list_state: ListState::default(),
            messages: MessageLog::default(),
            sheet_area: Rect::default(),
        };
        app.select(0);
        app.add_message(
            format!("Loaded {} items", app.item_ids.len()),
            MessageType::System,
        );
        app
    }

    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        while self.running {
            let Some(event) = tui.next().await else {
                break;
            };
            if let TuiEvent::Render = event {
                tui.draw(|f| ui::draw(f, self))?;
            } else {
                self.on_event(event);
            }
        }
        self.persist();
        Ok(())
    }

    pub fn on_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Key(key) => self.on_key(key),
            TuiEvent::Resize(width, height) => self.on_resize(width, height),
            TuiEvent::Error => log::error!("Terminal event stream reported an error"),
            TuiEvent::Init
            | TuiEvent::Tick
            | TuiEvent::Render
            | TuiEvent::FocusGained
            | TuiEvent::FocusLost => {}
        }
    }

    // Sheet keys first. Whatever the sheet doesn't stop bubbles up to the app keys.
    pub fn on_key(&mut self, key: KeyEvent) {
        if let Some(action) = keymap::sheet_action(key) {
            if !self.dispatch_sheet_action(action) {
                return;
            }
        }
        if let Some(action) = keymap::app_action(key) {
            self.apply(action);
        }
    }

    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.sheet_area = ui::sheet_area(Rect::new(0, 0, width, height));
        self.resize_sheet();
    }

    fn resize_sheet(&mut self) {
        let area = self.sheet_area;
        if let Some(sheet) = self.sheet.as_mut() {
            sheet.set_position(PositionUpdate::size(
                u32::from(area.width),
                u32::from(area.height),
            ));
        }
    }

    // Returns whether the event should keep propagating.
    pub fn dispatch_sheet_action(&mut self, action: SheetAction) -> bool {
        let mut event = SheetEvent::new(action);
        let Some(sheet) = self.sheet.as_mut() else {
            return event.propagates();
        };
        if !sheet.activate_listeners().contains(&action) {
            return event.propagates();
        }

        match sheet.handle(&mut event, &mut self.store, self.roller.as_mut()) {
            Ok(response) => {
                match response.outcome {
                    ActionOutcome::Rolled(report) => {
                        self.add_message(report.describe(), MessageType::Roll)
                    }
                    ActionOutcome::SpeedChanged(speed) => self.add_message(
                        format!("Speed {}/{}", speed.value, speed.max),
                        MessageType::Update,
                    ),
                    ActionOutcome::HumanityLoss(loss) => {
                        self.add_message(loss.describe(), MessageType::Roll)
                    }
                    ActionOutcome::FieldChanged { field, value } => self.add_message(
                        format!("{} set to {value}", field.label()),
                        MessageType::Update,
                    ),
                    ActionOutcome::FocusChanged(_) | ActionOutcome::Ignored => {}
                }
                if response.render {
                    self.persist();
                }
            }
            Err(SheetError::Item(e)) => self.add_message(e.to_string(), MessageType::System),
            Err(e) => {
                log::error!("Sheet action {action:?} failed: {e}");
                self.add_message(e.to_string(), MessageType::Error);
            }
        }
        event.propagates()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::NextItem => self.select(self.selected().map_or(0, |i| i + 1)),
            Action::PreviousItem => self.select(self.selected().map_or(0, |i| i.saturating_sub(1))),
            Action::NextTab => {
                if let Some(sheet) = self.sheet.as_mut() {
                    sheet.next_tab();
                }
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Save => match self.save() {
                Ok(()) => self.add_message("Saved", MessageType::System),
                Err(e) => self.add_message(format!("Save failed: {e}"), MessageType::Error),
            },
        }
    }

    // Open a sheet for the item at `index`, clamped to the list.
    pub fn select(&mut self, index: usize) {
        if self.item_ids.is_empty() {
            self.sheet = None;
            self.list_state.select(None);
            return;
        }
        let index = index.min(self.item_ids.len() - 1);
        let item_id = self.item_ids[index];
        if self.sheet.as_ref().map(ItemSheet::item_id) == Some(item_id) {
            return;
        }

        let mut sheet = ItemSheet::new(item_id, self.settings.sheet_options(), self.adapter.clone());
        if let Some(previous) = &self.sheet {
            sheet.set_tab(previous.active_tab());
        }
        self.sheet = Some(sheet);
        self.list_state.select(Some(index));
        self.resize_sheet();
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn save(&mut self) -> Result<()> {
        self.store.save(&self.store_path)?;
        Ok(())
    }

    // Write pending changes, reporting failures in the message log.
    fn persist(&mut self) {
        if !self.store.is_dirty() {
            return;
        }
        if let Err(e) = self.save() {
            log::error!("Failed to save {}: {e}", self.store_path.display());
            self.add_message(format!("Save failed: {e}"), MessageType::Error);
        }
    }

    pub fn current_view(&self) -> Result<ItemView> {
        let sheet = self.sheet.as_ref().ok_or(AppError::NoItemSelected)?;
        Ok(sheet.get_data(&self.store)?)
    }

    pub fn add_message(&mut self, content: impl Into<String>, message_type: MessageType) {
        self.messages.push(Message::new(content, message_type));
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn sheet(&self) -> Option<&ItemSheet> {
        self.sheet.as_ref()
    }

    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn localizer(&self) -> &Localizer {
        self.adapter.localizer()
    }
}

// tui.rs
// Terminal session: raw mode plus a background task that turns crossterm
// input and two timers into a single stream of `TuiEvent`s.
use std::{
    ops::{Deref, DerefMut},
    time::Duration,
};

use color_eyre::eyre::Result;
use crossterm::event::EventStream;
use futures::{FutureExt, StreamExt};
use ratatui::{
    DefaultTerminal,
    crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind},
};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::interval,
};
use tokio_util::sync::CancellationToken;

use crate::ui::{MIN_HEIGHT, MIN_WIDTH};

// Sheets only change on input, so a slow tick is plenty.
const TICKS_PER_SECOND: f64 = 4.0;
const FRAMES_PER_SECOND: f64 = 30.0;
const SHUTDOWN_POLLS: u32 = 100;

#[derive(Clone, Debug)]
pub enum TuiEvent {
    Init,
    Error,
    Tick,
    Render,
    FocusGained,
    FocusLost,
    Key(KeyEvent),
    Resize(u16, u16),
}

// Only key presses count; repeats and releases are dropped.
fn translate(event: CrosstermEvent) -> Option<TuiEvent> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(TuiEvent::Key(key)),
        CrosstermEvent::Resize(width, height) => Some(TuiEvent::Resize(width, height)),
        CrosstermEvent::FocusGained => Some(TuiEvent::FocusGained),
        CrosstermEvent::FocusLost => Some(TuiEvent::FocusLost),
        _ => None,
    }
}

async fn pump_events(events: UnboundedSender<TuiEvent>, shutdown: CancellationToken) {
    let mut input = EventStream::new();
    let mut ticks = interval(Duration::from_secs_f64(1.0 / TICKS_PER_SECOND));
    let mut frames = interval(Duration::from_secs_f64(1.0 / FRAMES_PER_SECOND));

    if events.send(TuiEvent::Init).is_err() {
        return;
    }
    loop {
        let event = tokio::select! {
            _ = shutdown.cancelled() => break,
            next = input.next().fuse() => match next {
                Some(Ok(event)) => translate(event),
                Some(Err(e)) => {
                    log::warn!("Terminal input error: {e}");
                    Some(TuiEvent::Error)
                }
                None => break,
            },
            _ = ticks.tick() => Some(TuiEvent::Tick),
            _ = frames.tick() => Some(TuiEvent::Render),
        };
        // The receiver only goes away on shutdown.
        if let Some(event) = event {
            if events.send(event).is_err() {
                break;
            }
        }
    }
}

pub struct Tui {
    terminal: DefaultTerminal,
    task: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
    events: UnboundedReceiver<TuiEvent>,
    // Raw mode is on until `exit`.
    active: bool,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let (_, events) = mpsc::unbounded_channel();
        Ok(Self {
            terminal: ratatui::init(),
            task: None,
            shutdown: CancellationToken::new(),
            events,
            active: true,
        })
    }

    // Queue the current size first so the sheet is laid out before the first frame.
    pub fn enter(&mut self) -> Result<()> {
        let size = self.terminal.size()?;
        if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
            log::warn!(
                "Terminal is {}x{}, sheets need at least {MIN_WIDTH}x{MIN_HEIGHT}",
                size.width,
                size.height
            );
        }

        // Each session gets its own channel; the stream closes when the task ends.
        self.stop();
        let (sender, events) = mpsc::unbounded_channel();
        sender.send(TuiEvent::Resize(size.width, size.height))?;
        self.events = events;
        self.shutdown = CancellationToken::new();
        self.task = Some(tokio::spawn(pump_events(sender, self.shutdown.clone())));
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stop();
        ratatui::restore();
        self.active = false;
        log::info!("Sheet editor exit: {}", chrono::Local::now());
        Ok(())
    }

    // Cancel the event task, aborting it if it doesn't wind down promptly.
    fn stop(&mut self) {
        self.shutdown.cancel();
        let Some(task) = self.task.take() else {
            return;
        };
        for poll in 0..SHUTDOWN_POLLS {
            if task.is_finished() {
                return;
            }
            if poll == SHUTDOWN_POLLS / 2 {
                task.abort();
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        log::error!("Terminal event task still running after shutdown");
    }

    pub async fn next(&mut self) -> Option<TuiEvent> {
        self.events.recv().await
    }
}

impl Deref for Tui {
    type Target = DefaultTerminal;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = self.exit() {
                log::error!("Failed to restore terminal: {e}");
            }
        }
    }
}

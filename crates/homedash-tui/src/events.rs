//! Event plumbing for the Homedash widget.
//!
//! Terminal input, timer ticks, poll-cycle outcomes and editor task
//! results all arrive on one unbounded channel so the main loop stays a
//! single thread of control.

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};
use homedash_core::{Item, ItemsPayload, StatusPayload};
use tokio::sync::mpsc;

/// Application events consumed by the main loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal key press.
    Key(KeyEvent),
    /// Terminal resize.
    Resize(u16, u16),
    /// Periodic tick when no terminal event arrived.
    Tick,
    /// Poll-cycle outcome from the poller task.
    Poll(PollEvent),
    /// Result of a background editor action.
    Editor(EditorEvent),
}

/// Outcomes emitted by one poll cycle.
#[derive(Debug)]
pub enum PollEvent {
    /// A cycle started; the widget enters the loading state.
    CycleStarted,
    /// A cycle ran to completion. Either fetch may have failed
    /// individually, in which case its slot is `None` and stale data is
    /// retained.
    CycleFinished {
        /// Fresh item payload, if the items fetch succeeded.
        items: Option<ItemsPayload>,
        /// Fresh status payload, if the batch status fetch succeeded.
        statuses: Option<StatusPayload>,
    },
    /// The cycle itself failed before the fetches could be issued.
    CycleFailed(String),
}

/// Results of background actions started from the configuration editor.
#[derive(Debug)]
pub enum EditorEvent {
    /// Connection test verdict.
    TestFinished(Result<(), String>),
    /// Item list fetched for the selection picker; failures collapse to
    /// an empty list.
    ItemsFetched(Vec<Item>),
}

/// Event handler bridging crossterm input onto the app channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventHandler {
    /// Spawns the terminal reader task and returns the handler.
    #[must_use]
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => {
                            if event_tx.send(AppEvent::Key(key)).is_err() {
                                break;
                            }
                        }
                        Ok(Event::Resize(w, h)) => {
                            if event_tx.send(AppEvent::Resize(w, h)).is_err() {
                                break;
                            }
                        }
                        _ => {}
                    }
                } else if event_tx.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Next event, or `None` once all senders are gone.
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// A sender for background tasks (poller, editor actions, demo feed).
    #[must_use]
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }
}

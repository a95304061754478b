//! Event loop orchestrating session events, user input, and rendering.
//!
//! This module coordinates three main concerns:
//! - Session event consumption (message log, redraws)
//! - Keyboard input processing (commands and UI navigation)
//! - Periodic autosave of a dirty session

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use runtime::{Event, ListenerId, SaveRepository, TrackerSession};
use tokio::{
    sync::broadcast::error::RecvError,
    time::{self, Duration, Instant, Interval},
};

use crate::{input::InputHandler, presentation::terminal::Tui, state::AppState};
use client_frontend_core::{DescriptionMirror, EventConsumer, PanelOrder, SelectionMirror};

/// Event loop owning the session while the UI runs.
///
/// The roster, timeline and description panels are mirrors registered on the
/// session's bus; the loop keeps its own `Rc` to each so it can read cursors
/// and drafts when rendering or turning keys into commands.
pub struct EventLoop<C>
where
    C: EventConsumer,
{
    pub(crate) session: TrackerSession,
    pub(crate) repository: Arc<dyn SaveRepository>,
    pub(crate) input: InputHandler,
    pub(crate) consumer: C,
    pub(crate) app_state: AppState,
    pub(crate) roster: Rc<RefCell<SelectionMirror>>,
    pub(crate) timeline: Rc<RefCell<SelectionMirror>>,
    pub(crate) description: Rc<RefCell<DescriptionMirror>>,
    /// CLI UI configuration
    pub(crate) cli_config: crate::config::CliConfig,
    pub(crate) autosave: Option<Duration>,
    listeners: Vec<ListenerId>,
}

impl<C> EventLoop<C>
where
    C: EventConsumer,
{
    pub fn new(
        mut session: TrackerSession,
        repository: Arc<dyn SaveRepository>,
        consumer: C,
        slot: impl Into<String>,
        cli_config: crate::config::CliConfig,
        autosave: Option<Duration>,
    ) -> Self {
        let roster = Rc::new(RefCell::new(SelectionMirror::new(
            PanelOrder::Roster,
            session.state(),
        )));
        let timeline = Rc::new(RefCell::new(SelectionMirror::new(
            PanelOrder::Timeline,
            session.state(),
        )));
        timeline.borrow_mut().set_active(false);
        let description = Rc::new(RefCell::new(DescriptionMirror::new(session.state())));

        let listeners = vec![
            session.register_listener(roster.clone()),
            session.register_listener(timeline.clone()),
            session.register_listener(description.clone()),
        ];

        Self {
            session,
            repository,
            input: InputHandler::new(),
            consumer,
            app_state: AppState::new(slot),
            roster,
            timeline,
            description,
            cli_config,
            autosave,
            listeners,
        }
    }

    /// Runs until the user quits, then hands back the session and consumer.
    pub async fn run(mut self, terminal: &mut Tui) -> Result<(TrackerSession, C)> {
        self.render(terminal)?;

        let frame = self.cli_config.ui.frame_interval;
        let mut events = self.session.subscribe_all();
        let mut autosave = self.autosave.map(|period| {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
            interval
        });

        loop {
            tokio::select! {
                result = events.recv() => {
                    if self.handle_session_event(result, terminal)? {
                        break;
                    }
                }
                _ = time::sleep(frame) => {
                    if self.handle_input_tick(terminal)? {
                        break;
                    }
                }
                _ = next_tick(autosave.as_mut()) => {
                    self.handle_autosave_tick(terminal)?;
                }
            }
        }

        for id in self.listeners.drain(..) {
            self.session.unregister_listener(id);
        }
        Ok((self.session, self.consumer))
    }

    /// Feed a broadcast event to the consumer and redraw if needed.
    fn handle_session_event(
        &mut self,
        result: Result<Event, RecvError>,
        terminal: &mut Tui,
    ) -> Result<bool> {
        match result {
            Ok(event) => {
                let impact = self.consumer.on_event(&event, self.session.state());
                if impact.requires_redraw {
                    self.render(terminal)?;
                }
                Ok(false)
            }
            Err(RecvError::Closed) => {
                tracing::warn!("Event stream closed");
                Ok(true)
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Dropped {} stale events", skipped);
                self.render(terminal)?;
                Ok(false)
            }
        }
    }

    fn handle_autosave_tick(&mut self, terminal: &mut Tui) -> Result<()> {
        let slot = self.app_state.slot.clone();
        match self.session.save_if_dirty(self.repository.as_ref(), &slot) {
            Ok(None) => return Ok(()),
            Ok(Some(_)) => {
                tracing::debug!("autosaved to '{}'", slot);
                self.notice(format!("Autosaved to '{slot}'"));
            }
            Err(e) => {
                tracing::error!("autosave to '{}' failed: {}", slot, e);
                self.consumer
                    .message_log_mut()
                    .push_error(format!("Autosave failed: {e}"));
            }
        }
        self.render(terminal)
    }
}

async fn next_tick(interval: Option<&mut Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

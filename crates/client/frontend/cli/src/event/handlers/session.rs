//! Session handlers: commands, undo/redo and save slots.

use anyhow::{Context, Result};
use client_frontend_core::EventConsumer;
use runtime::{Command, SessionError};
use tracker_core::EntityId;

use super::super::EventLoop;
use crate::state::{Focus, SaveMenuState, SlotInfo};

impl<C> EventLoop<C>
where
    C: EventConsumer,
{
    /// Executes a command, reporting failures in the message log.
    pub(in crate::event) fn execute(&mut self, command: Command) -> bool {
        match self.session.execute(command) {
            Ok(_) => true,
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Executes a command built from the selected entity.
    pub(in crate::event) fn execute_on_selected(&mut self, build: impl FnOnce(EntityId) -> Command) {
        match self.selected() {
            Some(id) => {
                self.execute(build(id));
            }
            None => self.notice("Select a combatant first"),
        }
    }

    pub(in crate::event) fn selected(&self) -> Option<EntityId> {
        self.session.state().population.selected()
    }

    /// Moves the focused panel's cursor; the mirrors follow once the
    /// selection event comes back through the bus.
    pub(in crate::event) fn step_cursor(&mut self, delta: isize) {
        let command = match self.app_state.focus {
            Focus::Roster | Focus::Description => self.roster.borrow().step(delta),
            Focus::Timeline => self.timeline.borrow().step(delta),
        };
        if let Some(command) = command {
            self.execute(command);
        }
    }

    pub(in crate::event) fn cursor_to_end(&mut self, last: bool) {
        let command = {
            let mirror = match self.app_state.focus {
                Focus::Roster | Focus::Description => self.roster.borrow(),
                Focus::Timeline => self.timeline.borrow(),
            };
            if last { mirror.last() } else { mirror.first() }
        };
        if let Some(command) = command {
            self.execute(command);
        }
    }

    /// Only the focused list picks a replacement when the selection is removed.
    pub(in crate::event) fn sync_active_mirror(&mut self) {
        let timeline_focused = self.app_state.focus == Focus::Timeline;
        self.roster.borrow_mut().set_active(!timeline_focused);
        self.timeline.borrow_mut().set_active(timeline_focused);
    }

    /// Stores a pending description draft before the session changes under it.
    pub(in crate::event) fn commit_draft(&mut self) {
        let command = self.description.borrow().commit();
        if let Some(command) = command {
            self.execute(command);
        }
    }

    pub(in crate::event) fn undo(&mut self) {
        if let Err(e) = self.session.undo() {
            self.report(&e);
        }
    }

    pub(in crate::event) fn redo(&mut self) {
        if let Err(e) = self.session.redo() {
            self.report(&e);
        }
    }

    pub(in crate::event) fn new_session(&mut self) {
        self.commit_draft();
        self.session.reset();
    }

    /// Writes the session to `slot` and makes it the quick-save slot.
    pub(in crate::event) fn save_to(&mut self, slot: &str) -> bool {
        match self.session.save(self.repository.as_ref(), slot) {
            Ok(save) => {
                self.app_state.slot = slot.to_string();
                self.notice(format!(
                    "Saved {} combatants to '{}'",
                    save.entity_count(),
                    slot
                ));
                true
            }
            Err(e) => {
                tracing::error!("save to '{}' failed: {}", slot, e);
                self.consumer
                    .message_log_mut()
                    .push_error(format!("Save failed: {e}"));
                false
            }
        }
    }

    pub(in crate::event) fn open_save_menu(&mut self) {
        match self.slot_infos() {
            Ok(slots) => {
                let mut menu = SaveMenuState::new(slots);
                if let Some(index) = menu
                    .slots
                    .iter()
                    .position(|slot| slot.name == self.app_state.slot)
                {
                    menu.selected_index = index;
                }
                self.app_state.mode = crate::state::AppMode::SaveMenu(menu);
            }
            Err(e) => {
                self.consumer
                    .message_log_mut()
                    .push_error(format!("Could not list saves: {e:#}"));
            }
        }
    }

    pub(in crate::event) fn load_slot(&mut self, slot: &str) -> Result<()> {
        let save = self
            .repository
            .load(slot)?
            .with_context(|| format!("slot '{slot}' no longer exists"))?;
        let discarded = self.session.is_dirty();
        self.session.load(save, slot)?;
        self.app_state.slot = slot.to_string();
        if discarded {
            self.consumer
                .message_log_mut()
                .push_warning("Unsaved changes were discarded");
        }
        Ok(())
    }

    pub(in crate::event) fn delete_slot(&mut self, slot: &str) -> Result<()> {
        self.repository.delete(slot)?;
        self.notice(format!("Deleted '{slot}'"));
        let slots = self.slot_infos()?;
        if let crate::state::AppMode::SaveMenu(menu) = &mut self.app_state.mode {
            menu.replace_slots(slots);
        }
        Ok(())
    }

    fn slot_infos(&self) -> Result<Vec<SlotInfo>> {
        let names = self.repository.list_slots()?;
        Ok(names
            .into_iter()
            .filter_map(|name| match self.repository.load(&name) {
                Ok(Some(save)) => Some(SlotInfo {
                    name,
                    entities: save.entity_count(),
                    saved_at: Some(save.saved_at),
                    error: None,
                }),
                Ok(None) => None,
                Err(e) => Some(SlotInfo {
                    name,
                    entities: 0,
                    saved_at: None,
                    error: Some(e.to_string()),
                }),
            })
            .collect())
    }

    pub(in crate::event) fn notice(&mut self, text: impl Into<String>) {
        self.consumer.message_log_mut().push_text(text);
    }

    fn report(&mut self, error: &SessionError) {
        tracing::debug!("command rejected: {}", error);
        self.consumer.message_log_mut().push_warning(error.to_string());
    }
}

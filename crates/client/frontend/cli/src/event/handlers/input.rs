//! Input handling: key presses, prompts and the description editor.

use anyhow::Result;
use client_frontend_core::EventConsumer;
use crossterm::event::{self as term_event, Event as TermEvent, KeyEvent, KeyEventKind};
use runtime::Command;
use tokio::time::Duration;

use super::super::EventLoop;
use crate::{
    input::{KeyAction, PromptRequest, TextKey},
    presentation::terminal::Tui,
    state::{AppMode, Focus, PromptError, PromptKind, PromptOutcome, PromptState},
};

impl<C> EventLoop<C>
where
    C: EventConsumer,
{
    /// Poll for keyboard input and handle UI interactions.
    pub(in crate::event) fn handle_input_tick(&mut self, terminal: &mut Tui) -> Result<bool> {
        if !term_event::poll(Duration::from_millis(0))? {
            return Ok(false);
        }

        match term_event::read()? {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                self.handle_key_press(key, terminal)
            }
            TermEvent::Resize(_, _) => {
                self.render(terminal)?;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    /// Handle key press and dispatch to appropriate handler.
    pub(in crate::event) fn handle_key_press(
        &mut self,
        key: KeyEvent,
        terminal: &mut Tui,
    ) -> Result<bool> {
        let action = self
            .input
            .handle_key(key, &self.app_state.mode, self.app_state.focus);

        if let AppMode::SaveMenu(menu) = &mut self.app_state.mode
            && action != KeyAction::DeleteSlot
        {
            menu.confirm_delete = false;
        }

        match action {
            KeyAction::Quit => {
                self.commit_draft();
                self.notice("Quitting...");
                self.render(terminal)?;
                return Ok(true);
            }
            KeyAction::Undo => self.undo(),
            KeyAction::Redo => self.redo(),
            KeyAction::Save => {
                let slot = self.app_state.slot.clone();
                self.save_to(&slot);
            }
            KeyAction::OpenSaveMenu => self.open_save_menu(),
            KeyAction::NewSession => self.new_session(),
            KeyAction::ToggleHelp => self.app_state.mode = AppMode::Help,
            KeyAction::CycleFocus => {
                self.app_state.cycle_focus();
                self.sync_active_mirror();
            }
            KeyAction::MoveCursor(delta) => {
                if let AppMode::SaveMenu(menu) = &mut self.app_state.mode {
                    menu.move_selection(delta);
                } else {
                    self.step_cursor(delta);
                }
            }
            KeyAction::CursorFirst => self.cursor_to_end(false),
            KeyAction::CursorLast => self.cursor_to_end(true),
            KeyAction::Deselect => {
                self.execute(Command::Select(None));
            }
            KeyAction::Prompt(request) => self.open_prompt(request),
            KeyAction::RemoveSelected => self.execute_on_selected(Command::RemoveEntity),
            KeyAction::BeginCombat => {
                self.execute(Command::BeginCombat);
            }
            KeyAction::EndCombat => {
                self.execute(Command::EndCombat);
            }
            KeyAction::Withdraw => self.execute_on_selected(Command::Withdraw),
            KeyAction::LeaveCombat => self.execute_on_selected(Command::LeaveCombat),
            KeyAction::ClearHistory => self.execute_on_selected(Command::ClearHistory),
            KeyAction::EditDescription => {
                if self.description.borrow().entity().is_some() {
                    self.app_state.focus = Focus::Description;
                    self.sync_active_mirror();
                    self.app_state.mode = AppMode::EditDescription;
                } else {
                    self.notice("Select a combatant first");
                }
            }
            KeyAction::RevertDescription => {
                self.description.borrow_mut().revert(self.session.state());
            }
            KeyAction::Text(text) => self.handle_text(text),
            KeyAction::LoadSlot => {
                let slot = match &self.app_state.mode {
                    AppMode::SaveMenu(menu) => menu.selected().map(|slot| slot.name.clone()),
                    _ => None,
                };
                if let Some(slot) = slot {
                    match self.load_slot(&slot) {
                        Ok(()) => self.app_state.exit_to_normal(),
                        Err(e) => self
                            .consumer
                            .message_log_mut()
                            .push_error(format!("Load failed: {e:#}")),
                    }
                }
            }
            KeyAction::DeleteSlot => {
                let pending = match &mut self.app_state.mode {
                    AppMode::SaveMenu(menu) => match menu.selected() {
                        Some(slot) if menu.confirm_delete => Some(slot.name.clone()),
                        Some(_) => {
                            menu.confirm_delete = true;
                            None
                        }
                        None => None,
                    },
                    _ => None,
                };
                if let Some(slot) = pending
                    && let Err(e) = self.delete_slot(&slot)
                {
                    self.consumer
                        .message_log_mut()
                        .push_error(format!("Delete failed: {e:#}"));
                }
            }
            KeyAction::ExitModal => self.app_state.exit_to_normal(),
            KeyAction::None => return Ok(false),
        }

        self.render(terminal)?;
        Ok(false)
    }

    fn open_prompt(&mut self, request: PromptRequest) {
        let prompt = match request {
            PromptRequest::Add => PromptState::new(PromptKind::AddEntity),
            PromptRequest::SaveAs => {
                PromptState::with_input(PromptKind::SaveAs, self.app_state.slot.clone())
            }
            _ => {
                let Some(id) = self.selected() else {
                    self.notice("Select a combatant first");
                    return;
                };
                let state = self.session.state();
                let entity = state.population.get(id);
                match request {
                    PromptRequest::Rename => PromptState::with_input(
                        PromptKind::Rename(id),
                        entity.map(|e| e.name().to_string()).unwrap_or_default(),
                    ),
                    PromptRequest::Recolor => PromptState::with_input(
                        PromptKind::Recolor(id),
                        entity.map(|e| e.color().to_string()).unwrap_or_default(),
                    ),
                    PromptRequest::JoinRoll => PromptState::new(PromptKind::JoinRoll(id)),
                    PromptRequest::RollDice => PromptState::new(PromptKind::RollDice(id)),
                    PromptRequest::Act => PromptState::new(PromptKind::Act(id)),
                    PromptRequest::JoinInProgress => {
                        PromptState::new(PromptKind::JoinInProgress(id))
                    }
                    PromptRequest::SetTick => PromptState::with_input(
                        PromptKind::SetTick(id),
                        state
                            .combat
                            .positions()
                            .tick_of(id)
                            .map(|tick| tick.to_string())
                            .unwrap_or_default(),
                    ),
                    PromptRequest::Add | PromptRequest::SaveAs => return,
                }
            }
        };
        self.app_state.open_prompt(prompt);
    }

    fn handle_text(&mut self, key: TextKey) {
        match &mut self.app_state.mode {
            AppMode::Prompt(prompt) => match key {
                TextKey::Insert(c) => {
                    prompt.input.push(c);
                    prompt.error = None;
                }
                TextKey::Backspace => {
                    prompt.input.pop();
                    prompt.error = None;
                }
                TextKey::Cancel => self.app_state.exit_to_normal(),
                TextKey::Submit => {
                    let parsed = prompt.kind.parse(&prompt.input);
                    let error = self.submit_prompt(parsed);
                    match (&mut self.app_state.mode, error) {
                        (AppMode::Prompt(prompt), Some(error)) => prompt.error = Some(error),
                        (_, None) => self.app_state.exit_to_normal(),
                        _ => {}
                    }
                }
            },
            AppMode::EditDescription => match key {
                TextKey::Insert(c) => self.description.borrow_mut().push_char(c),
                TextKey::Backspace => self.description.borrow_mut().pop_char(),
                TextKey::Submit => {
                    self.commit_draft();
                    self.app_state.exit_to_normal();
                }
                TextKey::Cancel => self.app_state.exit_to_normal(),
            },
            _ => {}
        }
    }

    /// Carries out a submitted prompt; returns the error to show, if any.
    fn submit_prompt(&mut self, parsed: Result<PromptOutcome, PromptError>) -> Option<String> {
        match parsed {
            Ok(PromptOutcome::Execute(command)) => match self.session.execute(command) {
                Ok(_) => None,
                Err(e) => Some(e.to_string()),
            },
            Ok(PromptOutcome::SaveAs(slot)) => {
                if self.save_to(&slot) {
                    None
                } else {
                    Some(format!("could not save to '{slot}'"))
                }
            }
            Err(e) => Some(e.to_string()),
        }
    }
}

//! Input processing for the CLI client.
//!
//! This module owns the keyboard-to-command mapping so the rest of the
//! application can remain agnostic about concrete key bindings or the
//! specifics of `crossterm` events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::state::{AppMode, Focus};

/// Prompt the user asked for; entity-bound prompts apply to the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptRequest {
    Add,
    Rename,
    Recolor,
    JoinRoll,
    RollDice,
    Act,
    JoinInProgress,
    SetTick,
    SaveAs,
}

/// Editing keys shared by the prompt and the description editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextKey {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
}

/// High-level outcome of processing a keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    Undo,
    Redo,
    /// Quick-save to the current slot.
    Save,
    OpenSaveMenu,
    NewSession,
    ToggleHelp,
    CycleFocus,
    /// Move the focused panel's cursor by the given number of rows.
    MoveCursor(isize),
    CursorFirst,
    CursorLast,
    Deselect,
    Prompt(PromptRequest),
    RemoveSelected,
    BeginCombat,
    EndCombat,
    Withdraw,
    LeaveCombat,
    ClearHistory,
    EditDescription,
    /// Discard the pending description draft.
    RevertDescription,
    Text(TextKey),
    /// Load the highlighted save slot.
    LoadSlot,
    DeleteSlot,
    ExitModal,
    /// No meaningful command was produced.
    None,
}

/// Translates `KeyEvent`s into UI commands according to the current mode.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Converts a raw key event into a higher-level command.
    pub fn handle_key(&self, key: KeyEvent, mode: &AppMode, focus: Focus) -> KeyAction {
        match mode {
            AppMode::Normal => self.handle_normal(key, focus),
            AppMode::Prompt(_) | AppMode::EditDescription => Self::handle_text(key),
            AppMode::SaveMenu(_) => Self::handle_menu(key),
            AppMode::Help => match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => KeyAction::ExitModal,
                _ => KeyAction::None,
            },
        }
    }

    fn handle_normal(&self, key: KeyEvent, focus: Focus) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('z') => KeyAction::Undo,
                KeyCode::Char('y') => KeyAction::Redo,
                KeyCode::Char('s') => KeyAction::Save,
                KeyCode::Char('o') => KeyAction::OpenSaveMenu,
                KeyCode::Char('n') => KeyAction::NewSession,
                KeyCode::Char('c') => KeyAction::Quit,
                _ => KeyAction::None,
            };
        }

        match key.code {
            KeyCode::Tab => KeyAction::CycleFocus,
            KeyCode::Up => KeyAction::MoveCursor(-1),
            KeyCode::Down => KeyAction::MoveCursor(1),
            KeyCode::PageUp => KeyAction::MoveCursor(-10),
            KeyCode::PageDown => KeyAction::MoveCursor(10),
            KeyCode::Home => KeyAction::CursorFirst,
            KeyCode::End => KeyAction::CursorLast,
            KeyCode::Esc => KeyAction::Deselect,
            KeyCode::Delete => KeyAction::RemoveSelected,
            KeyCode::Enter if focus == Focus::Description => KeyAction::EditDescription,
            KeyCode::Enter => KeyAction::Prompt(PromptRequest::Act),
            KeyCode::Char(ch) => Self::handle_char(ch),
            _ => KeyAction::None,
        }
    }

    fn handle_char(ch: char) -> KeyAction {
        match ch {
            'q' => KeyAction::Quit,
            '?' => KeyAction::ToggleHelp,
            'k' => KeyAction::MoveCursor(-1),
            'j' => KeyAction::MoveCursor(1),
            'g' => KeyAction::CursorFirst,
            'G' => KeyAction::CursorLast,
            'u' => KeyAction::Undo,
            'U' => KeyAction::Redo,
            'a' => KeyAction::Prompt(PromptRequest::Add),
            'x' => KeyAction::RemoveSelected,
            'r' => KeyAction::Prompt(PromptRequest::Rename),
            'c' => KeyAction::Prompt(PromptRequest::Recolor),
            'd' => KeyAction::EditDescription,
            'D' => KeyAction::RevertDescription,
            'i' => KeyAction::Prompt(PromptRequest::JoinRoll),
            'R' => KeyAction::Prompt(PromptRequest::RollDice),
            'w' => KeyAction::Withdraw,
            'b' => KeyAction::BeginCombat,
            'e' => KeyAction::EndCombat,
            ' ' | '.' => KeyAction::Prompt(PromptRequest::Act),
            'n' => KeyAction::Prompt(PromptRequest::JoinInProgress),
            't' => KeyAction::Prompt(PromptRequest::SetTick),
            'l' => KeyAction::LeaveCombat,
            'H' => KeyAction::ClearHistory,
            'S' => KeyAction::Prompt(PromptRequest::SaveAs),
            'o' => KeyAction::OpenSaveMenu,
            _ => KeyAction::None,
        }
    }

    fn handle_text(key: KeyEvent) -> KeyAction {
        match key.code {
            KeyCode::Esc => KeyAction::Text(TextKey::Cancel),
            KeyCode::Enter => KeyAction::Text(TextKey::Submit),
            KeyCode::Backspace => KeyAction::Text(TextKey::Backspace),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyAction::Text(TextKey::Insert(ch))
            }
            _ => KeyAction::None,
        }
    }

    fn handle_menu(key: KeyEvent) -> KeyAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => KeyAction::MoveCursor(-1),
            KeyCode::Down | KeyCode::Char('j') => KeyAction::MoveCursor(1),
            KeyCode::Enter | KeyCode::Char('l') => KeyAction::LoadSlot,
            KeyCode::Delete | KeyCode::Char('x') => KeyAction::DeleteSlot,
            KeyCode::Esc | KeyCode::Char('q') => KeyAction::ExitModal,
            _ => KeyAction::None,
        }
    }
}

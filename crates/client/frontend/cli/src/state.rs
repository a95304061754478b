//! Application state for mode management and UI context.

use chrono::{DateTime, Utc};
use runtime::Command;
use tracker_core::{Color, EntityId, ParseColorError, Tick};

/// Top-level application mode determining input handling and UI layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppMode {
    /// Browsing the roster and timeline.
    Normal,
    /// Typing into the description panel.
    EditDescription,
    /// Single-line prompt for a command argument.
    Prompt(PromptState),
    /// Full-screen save/load menu.
    SaveMenu(SaveMenuState),
    /// Key binding overlay.
    Help,
}

impl AppMode {
    pub fn is_fullscreen(&self) -> bool {
        matches!(self, AppMode::SaveMenu(_))
    }

    pub fn is_overlay(&self) -> bool {
        matches!(self, AppMode::Prompt(_) | AppMode::Help)
    }
}

/// Panel that receives cursor movement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Roster,
    Timeline,
    Description,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Roster => Focus::Timeline,
            Focus::Timeline => Focus::Description,
            Focus::Description => Focus::Roster,
        }
    }
}

/// What a prompt asks for. Entity-bound prompts carry their target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptKind {
    AddEntity,
    Rename(EntityId),
    Recolor(EntityId),
    JoinRoll(EntityId),
    RollDice(EntityId),
    Act(EntityId),
    JoinInProgress(EntityId),
    SetTick(EntityId),
    SaveAs,
}

/// Result of submitting a prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptOutcome {
    Execute(Command),
    SaveAs(String),
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::AddEntity => "Add combatant",
            PromptKind::Rename(_) => "Rename",
            PromptKind::Recolor(_) => "Color (#rrggbb)",
            PromptKind::JoinRoll(_) => "Join battle successes",
            PromptKind::RollDice(_) => "Join battle dice pool",
            PromptKind::Act(_) => "Speed [action]",
            PromptKind::JoinInProgress(_) => "Join battle successes (late arrival)",
            PromptKind::SetTick(_) => "Move to tick",
            PromptKind::SaveAs => "Save as slot",
        }
    }

    /// Parses prompt input into what should happen next.
    pub fn parse(self, input: &str) -> Result<PromptOutcome, PromptError> {
        let input = input.trim();
        let command = match self {
            PromptKind::AddEntity => Command::AddEntity {
                name: non_empty(input, "name")?.to_string(),
                color: None,
            },
            PromptKind::Rename(entity) => Command::Rename {
                entity,
                name: non_empty(input, "name")?.to_string(),
            },
            PromptKind::Recolor(entity) => Command::Recolor {
                entity,
                color: input.parse::<Color>()?,
            },
            PromptKind::JoinRoll(entity) => Command::RecordJoinRoll {
                entity,
                successes: number(input, "successes")?,
            },
            PromptKind::RollDice(entity) => Command::RollJoinBattle {
                entity,
                dice: number(input, "dice")?,
            },
            PromptKind::Act(entity) => {
                let (speed, label) = input.split_once(' ').unwrap_or((input, ""));
                Command::Act {
                    entity,
                    speed: number(speed, "speed")?,
                    label: label.trim().to_string(),
                }
            }
            PromptKind::JoinInProgress(entity) => Command::JoinInProgress {
                entity,
                successes: number(input, "successes")?,
            },
            PromptKind::SetTick(entity) => Command::SetTick {
                entity,
                tick: Tick(number(input, "tick")?),
            },
            PromptKind::SaveAs => {
                return Ok(PromptOutcome::SaveAs(non_empty(input, "slot")?.to_string()));
            }
        };
        Ok(PromptOutcome::Execute(command))
    }
}

/// Why prompt input could not be turned into a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{what} must be a whole number, got {input:?}")]
    NotANumber { what: &'static str, input: String },

    #[error(transparent)]
    Color(#[from] ParseColorError),
}

fn non_empty<'a>(input: &'a str, what: &'static str) -> Result<&'a str, PromptError> {
    if input.is_empty() {
        Err(PromptError::Empty(what))
    } else {
        Ok(input)
    }
}

fn number<T: std::str::FromStr>(input: &str, what: &'static str) -> Result<T, PromptError> {
    input.trim().parse().map_err(|_| PromptError::NotANumber {
        what,
        input: input.to_string(),
    })
}

/// Single-line text prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptState {
    pub kind: PromptKind,
    pub input: String,
    pub error: Option<String>,
}

impl PromptState {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
            error: None,
        }
    }

    pub fn with_input(kind: PromptKind, input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::new(kind)
        }
    }
}

/// One save slot as listed by the save menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotInfo {
    pub name: String,
    pub entities: usize,
    pub saved_at: Option<DateTime<Utc>>,
    /// Set when the slot exists but could not be read.
    pub error: Option<String>,
}

/// Save/load menu state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveMenuState {
    pub slots: Vec<SlotInfo>,
    pub selected_index: usize,
    /// Delete waits for a second press.
    pub confirm_delete: bool,
}

impl SaveMenuState {
    pub fn new(slots: Vec<SlotInfo>) -> Self {
        Self {
            slots,
            ..Self::default()
        }
    }

    pub fn selected(&self) -> Option<&SlotInfo> {
        self.slots.get(self.selected_index)
    }

    pub fn move_selection(&mut self, delta: isize) {
        self.confirm_delete = false;
        if let Some(last) = self.slots.len().checked_sub(1) {
            self.selected_index = self.selected_index.saturating_add_signed(delta).min(last);
        }
    }

    /// Keeps the cursor on the same slot name after a refresh where possible.
    pub fn replace_slots(&mut self, slots: Vec<SlotInfo>) {
        let current = self.selected().map(|slot| slot.name.clone());
        self.slots = slots;
        self.selected_index = current
            .and_then(|name| self.slots.iter().position(|slot| slot.name == name))
            .unwrap_or(0)
            .min(self.slots.len().saturating_sub(1));
        self.confirm_delete = false;
    }
}

/// Mutable application state tracking current mode and focus.
#[derive(Clone, Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub focus: Focus,
    /// Slot written by quick-save.
    pub slot: String,
}

impl AppState {
    pub fn new(slot: impl Into<String>) -> Self {
        Self {
            mode: AppMode::Normal,
            focus: Focus::default(),
            slot: slot.into(),
        }
    }

    pub fn open_prompt(&mut self, prompt: PromptState) {
        self.mode = AppMode::Prompt(prompt);
    }

    /// Exits to Normal mode.
    pub fn exit_to_normal(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Returns true if currently in a modal mode requiring manual input.
    pub fn is_modal(&self) -> bool {
        !matches!(self.mode, AppMode::Normal)
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_normal() {
        let state = AppState::new("session");
        assert_eq!(state.mode, AppMode::Normal);
        assert_eq!(state.focus, Focus::Roster);
        assert!(!state.is_modal());
    }

    #[test]
    fn modes_pick_their_layer() {
        let menu = AppMode::SaveMenu(SaveMenuState::new(Vec::new()));
        assert!(menu.is_fullscreen() && !menu.is_overlay());
        assert!(AppMode::Help.is_overlay());
        assert!(AppMode::Prompt(PromptState::new(PromptKind::AddEntity)).is_overlay());
        for mode in [AppMode::Normal, AppMode::EditDescription] {
            assert!(!mode.is_fullscreen() && !mode.is_overlay());
        }
    }

    #[test]
    fn focus_cycles_through_panels() {
        let mut state = AppState::new("session");
        state.cycle_focus();
        assert_eq!(state.focus, Focus::Timeline);
        state.cycle_focus();
        state.cycle_focus();
        assert_eq!(state.focus, Focus::Roster);
    }

    #[test]
    fn act_prompt_takes_speed_and_label() {
        let entity = EntityId(2);
        assert_eq!(
            PromptKind::Act(entity).parse(" 5  heavy strike "),
            Ok(PromptOutcome::Execute(Command::Act {
                entity,
                speed: 5,
                label: "heavy strike".into(),
            }))
        );
        assert_eq!(
            PromptKind::Act(entity).parse("3"),
            Ok(PromptOutcome::Execute(Command::Act {
                entity,
                speed: 3,
                label: String::new(),
            }))
        );
        assert!(PromptKind::Act(entity).parse("fast").is_err());
    }

    #[test]
    fn prompts_reject_bad_input() {
        assert_eq!(
            PromptKind::AddEntity.parse("   "),
            Err(PromptError::Empty("name"))
        );
        assert!(matches!(
            PromptKind::Recolor(EntityId(1)).parse("red"),
            Err(PromptError::Color(_))
        ));
        let err = PromptKind::JoinRoll(EntityId(1)).parse("-1").unwrap_err();
        assert_eq!(err.to_string(), "successes must be a whole number, got \"-1\"");
        assert_eq!(
            PromptKind::SaveAs.parse(" backup "),
            Ok(PromptOutcome::SaveAs("backup".into()))
        );
        assert_eq!(
            PromptKind::SetTick(EntityId(1)).parse("12"),
            Ok(PromptOutcome::Execute(Command::SetTick {
                entity: EntityId(1),
                tick: Tick(12),
            }))
        );
    }

    #[test]
    fn save_menu_keeps_cursor_on_refresh() {
        let slot = |name: &str| SlotInfo {
            name: name.into(),
            entities: 0,
            saved_at: None,
            error: None,
        };
        let mut menu = SaveMenuState::new(vec![slot("a"), slot("b"), slot("c")]);
        menu.move_selection(1);
        menu.replace_slots(vec![slot("b"), slot("c")]);
        assert_eq!(menu.selected().map(|s| s.name.as_str()), Some("b"));

        menu.replace_slots(vec![slot("z")]);
        assert_eq!(menu.selected_index, 0);
        menu.move_selection(5);
        assert_eq!(menu.selected_index, 0);
    }
}

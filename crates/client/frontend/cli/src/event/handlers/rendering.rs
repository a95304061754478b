//! Rendering handlers.

use anyhow::Result;
use client_frontend_core::{EventConsumer, ViewModel};

use super::super::EventLoop;
use crate::presentation::{
    terminal::Tui,
    ui::{self, DraftView},
};
use crate::state::AppMode;

/// The save menu shows a few recent messages even with a short message panel.
const MIN_MESSAGES: u16 = 6;

impl<C> EventLoop<C>
where
    C: EventConsumer,
{
    /// Render the current session state.
    pub(in crate::event) fn render(&mut self, terminal: &mut Tui) -> Result<()> {
        let message_limit = self.cli_config.ui.message_panel_height.max(MIN_MESSAGES);
        let view_model = ViewModel::from_session(
            &self.session,
            self.consumer.message_log(),
            usize::from(message_limit),
        );

        let description = self.description.borrow();
        let ctx = ui::RenderContext {
            view_model: &view_model,
            app_state: &self.app_state,
            draft: DraftView {
                text: description.draft(),
                dirty: description.is_dirty(),
                editing: self.app_state.mode == AppMode::EditDescription,
            },
            message_panel_height: self.cli_config.ui.message_panel_height,
        };

        ui::render_with_view_model(terminal, &ctx)
    }
}

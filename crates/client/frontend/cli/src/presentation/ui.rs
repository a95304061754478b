//! UI rendering using the widget set and the ViewModel.
//!
//! This module provides the main render entry point that composes all widgets
//! to create the complete terminal UI.
use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::{
    presentation::{terminal::Tui, theme::RatatuiTheme, widgets},
    state::{AppMode, AppState},
};
use client_frontend_core::view_model::ViewModel;

/// Description panel contents, taken from the description mirror.
pub struct DraftView<'a> {
    pub text: &'a str,
    pub dirty: bool,
    pub editing: bool,
}

/// Rendering context containing all state and configuration needed for UI rendering.
pub struct RenderContext<'a> {
    pub view_model: &'a ViewModel,
    pub app_state: &'a AppState,
    pub draft: DraftView<'a>,
    pub message_panel_height: u16,
}

/// Render the terminal UI.
///
/// This function routes rendering based on the current app mode:
/// - **Full-screen modes**: Completely replace the tracker UI (SaveMenu)
/// - **Overlay modes**: Render the tracker with a modal on top (Prompt, Help)
/// - **Standard modes**: Render the tracker (Normal, EditDescription)
pub fn render_with_view_model(terminal: &mut Tui, ctx: &RenderContext) -> Result<()> {
    let theme = RatatuiTheme;

    terminal.draw(|frame| {
        if ctx.app_state.mode.is_fullscreen() {
            render_fullscreen_mode(frame, ctx, &theme);
            return;
        }

        render_tracker_ui(frame, ctx, &theme);

        if ctx.app_state.mode.is_overlay() {
            render_overlay_mode(frame, ctx);
        }
    })?;

    Ok(())
}

/// Full-screen modes replace the tracker view entirely.
fn render_fullscreen_mode(frame: &mut ratatui::Frame, ctx: &RenderContext, theme: &RatatuiTheme) {
    if let AppMode::SaveMenu(menu) = &ctx.app_state.mode {
        widgets::save_menu::render_fullscreen(frame, frame.area(), menu, ctx.view_model, theme);
    }
}

/// Overlays are drawn centered on top of the tracker view.
fn render_overlay_mode(frame: &mut ratatui::Frame, ctx: &RenderContext) {
    match &ctx.app_state.mode {
        AppMode::Prompt(prompt) => {
            let area = centered_rect(60, 20, frame.area());
            widgets::prompt::render(frame, area, prompt);
        }
        AppMode::Help => {
            let area = centered_rect(60, 80, frame.area());
            widgets::help::render(frame, area);
        }
        _ => {}
    }
}

/// Render the standard tracker UI (header, panels, messages, footer).
fn render_tracker_ui(frame: &mut ratatui::Frame, ctx: &RenderContext, theme: &RatatuiTheme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                        // Header
            Constraint::Min(0),                           // Panels
            Constraint::Length(ctx.message_panel_height), // Messages
            Constraint::Length(2),                        // Footer
        ])
        .split(frame.area());

    widgets::header::render(frame, chunks[0], ctx.view_model, ctx.app_state, theme);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35), // Roster
            Constraint::Percentage(30), // Timeline
            Constraint::Percentage(35), // Details
        ])
        .split(chunks[1]);

    let focus = ctx.app_state.focus;
    widgets::roster::render(frame, panels[0], ctx.view_model, focus, theme);
    widgets::timeline::render(frame, panels[1], ctx.view_model, focus, theme);
    widgets::details::render(frame, panels[2], ctx.view_model, &ctx.draft, focus, theme);

    widgets::messages::render(
        frame,
        chunks[2],
        &ctx.view_model.messages,
        ctx.message_panel_height,
        theme,
    );

    widgets::footer::render(frame, chunks[3], ctx.app_state);
}

/// Create a centered rectangle for modal overlays.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

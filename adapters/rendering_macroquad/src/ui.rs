//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

/// Outcome of rendering the notification dialog during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct NotificationUiResult {
    /// Whether the dismiss button was pressed during this frame.
    pub(crate) dismissed: bool,
}

/// Layout and text of the notification dialog for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NotificationUiContext<'a> {
    /// Top-left corner of the dialog in screen coordinates.
    pub(crate) origin: Vec2,
    /// Dialog dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour of the dialog.
    pub(crate) background: Color,
    /// Message shown to the player.
    pub(crate) message: &'a str,
}

/// Renders the blocking notification dialog.
pub(crate) fn draw_notification_ui(
    ui: &mut Ui,
    context: NotificationUiContext<'_>,
) -> NotificationUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .color_selected(Color::from_rgba(70, 70, 70, 255))
        .color_selected_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_inactive(Color::from_rgba(56, 56, 56, 200))
        .margin(RectOffset::new(0.0, 0.0, 8.0, 8.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let mut button_pressed = false;
    let _ = ui.window(hash!("notification"), context.origin, context.size, |ui| {
        ui.label(None, context.message);
        ui.label(None, "Press Enter or Space to continue.");
        button_pressed = ui.button(None, "OK");
    });

    ui.pop_skin();

    NotificationUiResult {
        dismissed: button_pressed,
    }
}

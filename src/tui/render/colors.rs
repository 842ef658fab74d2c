//! Color palette for the TUI

use karte::app::ColorRgb;
use ratatui::style::Color;

// UI Chrome
pub const BORDER: Color = Color::Rgb(100, 110, 130);
pub const SURFACE: Color = Color::Rgb(30, 32, 40);

// Text
pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 230);
pub const TEXT_DIM: Color = Color::Rgb(130, 135, 150);
pub const TEXT_MUTED: Color = Color::Rgb(90, 95, 110);

// Menu
pub const KEY: Color = Color::Rgb(100, 180, 220);
pub const MODAL: Color = Color::Rgb(200, 160, 80);

// Feedback
pub const SUCCESS: Color = Color::Rgb(120, 180, 120);
pub const FAILURE: Color = Color::Rgb(200, 100, 100);

// Modals
pub const MODAL_BG: Color = Color::Rgb(25, 27, 35);

/// Terminal colour of a layer
pub const fn layer(color: ColorRgb) -> Color {
    Color::Rgb(color.red, color.green, color.blue)
}

// StableBuddy - ui/theme.rs
//
// Colour scheme and layout constants.
// No dependencies on app state or business logic.

use egui::Color32;

/// Generate button fill.
pub const GENERATE_FILL: Color32 = Color32::from_rgb(147, 51, 234); // Purple 600

/// Download button fill.
pub const DOWNLOAD_FILL: Color32 = Color32::from_rgb(37, 99, 235); // Blue 600

pub const BUTTON_TEXT: Color32 = Color32::WHITE;

/// Image surface background and overlay colours.
pub const SURFACE_BG_DARK: Color32 = Color32::from_rgb(31, 41, 55); // Gray 800
pub const SURFACE_BG_LIGHT: Color32 = Color32::from_rgb(229, 231, 235); // Gray 200
pub const OVERLAY_BG: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 170);
pub const OVERLAY_TEXT: Color32 = Color32::from_rgb(243, 244, 246); // Gray 100
pub const ERROR_TEXT: Color32 = Color32::from_rgb(248, 113, 113); // Red 400

/// Layout constants.
pub const PROMPT_HEIGHT: f32 = 40.0;
pub const BUTTON_WIDTH: f32 = 120.0;
pub const BUTTON_HEIGHT: f32 = 40.0;
pub const OVERLAY_FONT_SIZE: f32 = 20.0;
pub const OVERLAY_PADDING: f32 = 10.0;

/// Apply dark or light visuals to the context.
pub fn apply(ctx: &egui::Context, dark_mode: bool) {
    let visuals = if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    ctx.set_visuals(visuals);
}

/// Background of the image surface for the active visuals.
pub fn surface_bg(dark_mode: bool) -> Color32 {
    if dark_mode {
        SURFACE_BG_DARK
    } else {
        SURFACE_BG_LIGHT
    }
}

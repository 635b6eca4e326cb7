// StableBuddy - ui/panels/canvas.rs
//
// The fixed-size image surface. Shows, depending on the phase:
//   Idle        empty surface (plus any download message)
//   Generating  the placeholder text only
//   Showing     the image, with any download message on top
//   Failed      the previous image (if any) with the error message on top

use crate::app::state::{AppState, Phase};
use crate::ui::theme;
use crate::util::constants;

/// Render the image surface. `texture` is the uploaded copy of
/// `state.image()`, if there is one.
pub fn render(ui: &mut egui::Ui, state: &AppState, texture: Option<&egui::TextureHandle>) {
    let size = egui::vec2(constants::IMAGE_SURFACE_SIZE, constants::IMAGE_SURFACE_SIZE);
    let (rect, _response) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(rect);

    painter.rect_filled(rect, 4.0, theme::surface_bg(state.dark_mode));

    let phase = state.phase();
    if phase != Phase::Generating {
        if let Some(texture) = texture {
            let target = fit_rect(rect, texture.size_vec2());
            egui::Image::from_texture(egui::load::SizedTexture::new(texture.id(), target.size()))
                .paint_at(ui, target);
        }
    }

    let text = state.status_text();
    if text.is_empty() {
        return;
    }

    let colour = if state.status_is_error() {
        theme::ERROR_TEXT
    } else {
        theme::OVERLAY_TEXT
    };
    let galley = painter.layout_no_wrap(
        text.to_owned(),
        egui::FontId::proportional(theme::OVERLAY_FONT_SIZE),
        colour,
    );
    let text_rect = egui::Align2::CENTER_CENTER.anchor_size(rect.center(), galley.size());
    painter.rect_filled(
        text_rect.expand(theme::OVERLAY_PADDING),
        6.0,
        theme::OVERLAY_BG,
    );
    painter.galley(text_rect.min, galley, colour);
}

/// Largest rect with the image's aspect ratio that fits centred in `bounds`.
pub fn fit_rect(bounds: egui::Rect, image_size: egui::Vec2) -> egui::Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / image_size.x).min(bounds.height() / image_size.y);
    egui::Rect::from_center_size(bounds.center(), image_size * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(512.0, 512.0))
    }

    #[test]
    fn test_square_image_fills_surface() {
        assert_eq!(fit_rect(bounds(), egui::vec2(768.0, 768.0)), bounds());
    }

    #[test]
    fn test_wide_image_is_letterboxed() {
        let r = fit_rect(bounds(), egui::vec2(1024.0, 512.0));
        assert_eq!(r.width(), 512.0);
        assert_eq!(r.height(), 256.0);
        assert_eq!(r.center(), bounds().center());
    }

    #[test]
    fn test_degenerate_size_uses_bounds() {
        assert_eq!(fit_rect(bounds(), egui::vec2(0.0, 10.0)), bounds());
    }
}

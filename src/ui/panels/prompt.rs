// StableBuddy - ui/panels/prompt.rs
//
// Prompt field plus the Generate and Download actions.
// Sets request flags on the state; the App acts on them after rendering.

use crate::app::state::AppState;
use crate::ui::theme;
use crate::util::constants;

fn action_button(label: &str, fill: egui::Color32) -> egui::Button<'static> {
    egui::Button::new(
        egui::RichText::new(label.to_owned())
            .color(theme::BUTTON_TEXT)
            .strong(),
    )
    .fill(fill)
    .min_size(egui::vec2(theme::BUTTON_WIDTH, theme::BUTTON_HEIGHT))
}

/// Render the prompt row and the action row.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let busy = state.is_generating();

    let response = ui.add_sized(
        [constants::IMAGE_SURFACE_SIZE, theme::PROMPT_HEIGHT],
        egui::TextEdit::singleline(&mut state.prompt)
            .hint_text("Describe the image to generate")
            .vertical_align(egui::Align::Center),
    );

    // Enter in the field behaves like clicking Generate.
    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) && !busy {
        state.request_generate = true;
    }

    ui.add_space(6.0);

    ui.horizontal(|ui| {
        // Centre the two buttons under the prompt field.
        let used = theme::BUTTON_WIDTH * 2.0 + ui.spacing().item_spacing.x;
        ui.add_space(((constants::IMAGE_SURFACE_SIZE - used) / 2.0).max(0.0));

        if ui
            .add_enabled(!busy, action_button("Generate", theme::GENERATE_FILL))
            .on_hover_text("Generate an image from the prompt")
            .clicked()
        {
            state.request_generate = true;
        }

        if ui
            .add_enabled(!busy, action_button("Download", theme::DOWNLOAD_FILL))
            .on_hover_text(format!("Save to {}", state.output_path().display()))
            .clicked()
        {
            state.request_download = true;
        }
    });
}

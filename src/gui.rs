// StableBuddy - gui.rs
//
// Top-level eframe::App implementation.
// Wires the panels to the view-model and drives the generation lifecycle.

use crate::app::generation::GenerationManager;
use crate::app::state::{AppState, DownloadOutcome, Phase};
use crate::ui;
use crate::util::constants;

/// The StableBuddy application.
pub struct StableBuddyApp {
    pub state: AppState,
    pub generation: GenerationManager,

    /// Uploaded copy of the current image, tagged with the state's image
    /// counter so a replaced image is re-uploaded exactly once.
    texture: Option<(u64, egui::TextureHandle)>,
}

impl StableBuddyApp {
    pub fn new(state: AppState, generation: GenerationManager) -> Self {
        Self {
            state,
            generation,
            texture: None,
        }
    }

    /// Upload the current image if it changed since the last frame.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let current = self.state.image_generation();
        if matches!(self.texture, Some((tag, _)) if tag == current) {
            return;
        }
        let Some(image) = self.state.image() else {
            self.texture = None;
            return;
        };
        let colour_image = egui::ColorImage::from_rgba_unmultiplied(
            [image.width() as usize, image.height() as usize],
            image.rgba(),
        );
        let handle = ctx.load_texture("generated_image", colour_image, egui::TextureOptions::LINEAR);
        tracing::debug!(generation = current, "Image texture uploaded");
        self.texture = Some((current, handle));
    }

    /// Act on flags the panels set this frame. Repaints so the new status
    /// text shows immediately rather than on the next input event.
    fn handle_requests(&mut self, ctx: &egui::Context) {
        if std::mem::take(&mut self.state.request_generate) {
            if self.generation.is_busy() {
                tracing::warn!("{}", constants::MSG_BUSY);
            } else if let Some(prompt) = self.state.begin_generation() {
                self.generation.start(prompt);
            }
            ctx.request_repaint();
        }

        if std::mem::take(&mut self.state.request_download) {
            ctx.request_repaint();
            match self.state.download() {
                DownloadOutcome::Saved { path, bytes } => {
                    tracing::info!(path = %path.display(), bytes, "Download complete");
                }
                DownloadOutcome::NothingToSave | DownloadOutcome::Failed => {}
            }
        }
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!(
                    "{} @ {}",
                    self.state.model.model_id, self.state.model.revision
                ))
                .small(),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if self.state.phase() == Phase::Generating {
                    ui.spinner();
                } else if let (Some(device), Some(elapsed)) =
                    (self.state.last_device, self.state.last_duration)
                {
                    ui.label(
                        egui::RichText::new(format!(
                            "{device} \u{00b7} {:.1}s",
                            elapsed.as_secs_f64()
                        ))
                        .small(),
                    );
                }
            });
        });
    }
}

impl eframe::App for StableBuddyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply the worker's result, if it has arrived.
        if let Some(outcome) = self.generation.poll() {
            self.state.finish_generation(outcome);
        }
        self.sync_texture(ctx);

        // Keep polling while a request is in flight.
        if self.generation.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(
                constants::GENERATION_POLL_INTERVAL_MS,
            ));
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .small_button("\u{24d8}")
                        .on_hover_text(format!("About {}", constants::APP_NAME))
                        .clicked()
                    {
                        self.state.show_about = true;
                    }
                });
            });
            ui::panels::prompt::render(ui, &mut self.state);
            ui.add_space(10.0);
            let texture = self.texture.as_ref().map(|(_, handle)| handle);
            ui::panels::canvas::render(ui, &self.state, texture);
        });

        ui::panels::about::render(ctx, &mut self.state);

        self.handle_requests(ctx);
    }
}

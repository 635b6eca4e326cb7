// StableBuddy - app/state.rs
//
// Application view-model. Holds the prompt, the single current image, the
// generation phase, and the status text shown over the image surface.
// Owned by the eframe::App implementation; UI panels read it and set request
// flags, the App applies those requests through the methods below.

use crate::core::model::{ComputeDevice, GeneratedImage, GenerationOutcome, ModelInfo};
use crate::platform::fs;
use crate::util::constants;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What the image surface is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing generated yet.
    Idle,
    /// A request is in flight; the surface shows the placeholder.
    Generating,
    /// The current image is displayed.
    Showing,
    /// The last request failed; any previous image stays underneath the message.
    Failed,
}

/// Result of a download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved { path: PathBuf, bytes: usize },
    NothingToSave,
    Failed,
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Current prompt text, bound to the input field.
    pub prompt: String,

    /// The one generated image held at a time.
    image: Option<GeneratedImage>,

    /// Incremented whenever `image` is replaced, so the UI knows to re-upload
    /// its texture.
    image_generation: u64,

    phase: Phase,

    /// Text drawn on the image surface (placeholder, error, or download
    /// confirmation). Empty when the image is shown unobstructed.
    status_text: String,

    /// Whether `status_text` reports a failure (drawn in the error colour).
    status_is_error: bool,

    /// Pipeline identity for the status bar.
    pub model: ModelInfo,

    /// Fixed path downloads overwrite.
    output_path: PathBuf,

    /// Device and wall-clock time of the last successful generation.
    pub last_device: Option<ComputeDevice>,
    pub last_duration: Option<Duration>,

    /// Set by the prompt panel; consumed by the App each frame.
    pub request_generate: bool,
    pub request_download: bool,

    /// Whether to show the About dialog.
    pub show_about: bool,

    /// Dark (true) or light (false) visuals.
    pub dark_mode: bool,
}

impl AppState {
    pub fn new(model: ModelInfo, output_path: PathBuf, dark_mode: bool) -> Self {
        Self {
            prompt: String::new(),
            image: None,
            image_generation: 0,
            phase: Phase::Idle,
            status_text: String::new(),
            status_is_error: false,
            model,
            output_path,
            last_device: None,
            last_duration: None,
            request_generate: false,
            request_download: false,
            show_about: false,
            dark_mode,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn image(&self) -> Option<&GeneratedImage> {
        self.image.as_ref()
    }

    pub fn image_generation(&self) -> u64 {
        self.image_generation
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn status_is_error(&self) -> bool {
        self.status_is_error
    }

    fn set_status(&mut self, text: &str, is_error: bool) {
        self.status_text = text.to_string();
        self.status_is_error = is_error;
    }

    pub fn is_generating(&self) -> bool {
        self.phase == Phase::Generating
    }

    /// Enter the generating phase and return the prompt to send.
    ///
    /// Returns `None` (and changes nothing) if a generation is already in
    /// flight. The prompt is returned verbatim; empty is allowed.
    pub fn begin_generation(&mut self) -> Option<String> {
        if self.is_generating() {
            tracing::debug!("Generate ignored: request already in flight");
            return None;
        }
        self.phase = Phase::Generating;
        self.set_status(constants::MSG_GENERATING, false);
        tracing::info!(prompt_chars = self.prompt.chars().count(), "Generation started");
        Some(self.prompt.clone())
    }

    /// Apply the worker's result.
    ///
    /// Success replaces the image and clears the status text. Failure shows
    /// the generic message and keeps the previous image; the full error goes
    /// to the log only.
    pub fn finish_generation(&mut self, outcome: GenerationOutcome) {
        match outcome {
            GenerationOutcome::Finished {
                generation,
                elapsed,
            } => {
                tracing::info!(
                    width = generation.image.width(),
                    height = generation.image.height(),
                    device = %generation.device,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Generation finished"
                );
                self.image = Some(generation.image);
                self.image_generation += 1;
                self.last_device = Some(generation.device);
                self.last_duration = Some(elapsed);
                self.phase = Phase::Showing;
                self.set_status("", false);
            }
            GenerationOutcome::Failed { error } => {
                tracing::error!(error = %error, "Generation failed");
                self.phase = Phase::Failed;
                self.set_status(constants::MSG_GENERATION_FAILED, true);
            }
        }
    }

    /// Write the current image to `output_path`, overwriting.
    ///
    /// With no image this reports absence and performs no filesystem access.
    pub fn download(&mut self) -> DownloadOutcome {
        let Some(image) = self.image.as_ref() else {
            tracing::info!("Download requested with no image");
            self.set_status(constants::MSG_NOTHING_TO_DOWNLOAD, false);
            return DownloadOutcome::NothingToSave;
        };

        match fs::write_image(&self.output_path, image) {
            Ok(bytes) => {
                self.set_status(constants::MSG_DOWNLOADED, false);
                DownloadOutcome::Saved {
                    path: self.output_path.clone(),
                    bytes,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Download failed");
                self.set_status(constants::MSG_DOWNLOAD_FAILED, true);
                DownloadOutcome::Failed
            }
        }
    }

    /// Path shown in the status bar.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

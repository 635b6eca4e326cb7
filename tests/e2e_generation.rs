// StableBuddy - tests/e2e_generation.rs
//
// End-to-end tests for the generate -> display -> download cycle.
//
// These drive the real view-model, the real background worker, and the real
// filesystem (in a temp dir). Only the model itself is replaced by an
// in-process generator.

use stablebuddy::app::generation::GenerationManager;
use stablebuddy::app::startup;
use stablebuddy::app::state::{AppState, DownloadOutcome, Phase};
use stablebuddy::core::generator::ImageGenerator;
use stablebuddy::core::model::{ComputeDevice, GeneratedImage, Generation, ModelInfo};
use stablebuddy::platform::config::AppConfig;
use stablebuddy::util::error::GenerationError;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// Helpers
// =============================================================================

const WAIT: Duration = Duration::from_secs(5);

/// Produces a 4x4 image whose colour depends on how many calls came before,
/// so consecutive generations are distinguishable. Prompts containing
/// "fail" return an error.
struct ScriptedGenerator {
    calls: Mutex<u8>,
}

impl ScriptedGenerator {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(0),
        })
    }
}

impl ImageGenerator for ScriptedGenerator {
    fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        if prompt.contains("fail") {
            return Err(GenerationError::Status {
                status: 503,
                body: "model is overloaded".to_string(),
            });
        }
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        let shade = calls.wrapping_mul(40);
        let rgba = [shade, 255 - shade, 128, 255].repeat(16);
        Ok(Generation {
            image: GeneratedImage::from_rgba(4, 4, rgba)?,
            device: ComputeDevice::Accelerator,
        })
    }
}

fn new_state(dir: &Path) -> AppState {
    AppState::new(
        ModelInfo {
            model_id: "CompVis/stable-diffusion-v1-4".to_string(),
            revision: "fp16".to_string(),
        },
        dir.join("generated_image.png"),
        true,
    )
}

/// Run one Generate click to completion, the way the App does each frame.
fn generate(state: &mut AppState, manager: &mut GenerationManager, prompt: &str) {
    state.prompt = prompt.to_string();
    let prompt = state.begin_generation().expect("idle state accepts generate");
    assert_eq!(state.phase(), Phase::Generating);
    assert_eq!(state.status_text(), "Generating...");
    assert!(manager.start(prompt));
    let outcome = manager.wait(WAIT).expect("worker delivered an outcome");
    state.finish_generation(outcome);
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn e2e_generation_then_download_writes_identical_bytes() {
    let tmp = tempfile::tempdir().unwrap();
    let mut state = new_state(tmp.path());
    let mut manager = GenerationManager::new(ScriptedGenerator::new());

    generate(&mut state, &mut manager, "a castle on a mountain");
    assert_eq!(state.phase(), Phase::Showing);
    assert_eq!(state.status_text(), "");

    let outcome = state.download();
    assert!(matches!(outcome, DownloadOutcome::Saved { .. }));
    let on_disk = std::fs::read(tmp.path().join("generated_image.png")).unwrap();
    assert_eq!(on_disk, state.image().unwrap().png_bytes());

    // The saved file decodes to the same pixels that are displayed.
    let reloaded = GeneratedImage::from_encoded(&on_disk).unwrap();
    assert_eq!(reloaded.rgba(), state.image().unwrap().rgba());
}

#[test]
fn e2e_second_generation_replaces_first() {
    let tmp = tempfile::tempdir().unwrap();
    let mut state = new_state(tmp.path());
    let mut manager = GenerationManager::new(ScriptedGenerator::new());

    generate(&mut state, &mut manager, "first");
    let first = state.image().unwrap().clone();
    state.download();

    generate(&mut state, &mut manager, "second");
    let second = state.image().unwrap().clone();
    assert_ne!(first.rgba(), second.rgba());
    assert_eq!(state.image_generation(), 2);

    state.download();
    let on_disk = std::fs::read(tmp.path().join("generated_image.png")).unwrap();
    assert_eq!(on_disk, second.png_bytes());
}

#[test]
fn e2e_failure_keeps_previous_image_and_allows_retry() {
    let tmp = tempfile::tempdir().unwrap();
    let mut state = new_state(tmp.path());
    let mut manager = GenerationManager::new(ScriptedGenerator::new());

    generate(&mut state, &mut manager, "good");
    let good = state.image().unwrap().clone();

    generate(&mut state, &mut manager, "please fail");
    assert_eq!(state.phase(), Phase::Failed);
    assert_eq!(state.status_text(), "Error generating image");
    assert!(state.status_is_error());
    assert_eq!(state.image(), Some(&good));

    generate(&mut state, &mut manager, "good again");
    assert_eq!(state.phase(), Phase::Showing);
    assert_ne!(state.image(), Some(&good));
}

#[test]
fn e2e_empty_prompt_does_not_crash() {
    let tmp = tempfile::tempdir().unwrap();
    let mut state = new_state(tmp.path());
    let mut manager = GenerationManager::new(ScriptedGenerator::new());

    generate(&mut state, &mut manager, "");
    assert_eq!(state.phase(), Phase::Showing);
}

#[test]
fn e2e_download_before_generation_reports_absence() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("generated_image.png");
    std::fs::write(&path, b"left over from a previous session").unwrap();

    let mut state = new_state(tmp.path());
    assert_eq!(state.download(), DownloadOutcome::NothingToSave);
    assert_eq!(state.status_text(), "No image to download!");
    assert_eq!(
        std::fs::read(&path).unwrap(),
        b"left over from a previous session"
    );
}

#[test]
fn e2e_repeated_download_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let mut state = new_state(tmp.path());
    let mut manager = GenerationManager::new(ScriptedGenerator::new());
    generate(&mut state, &mut manager, "lighthouse");

    state.download();
    let first = std::fs::read(tmp.path().join("generated_image.png")).unwrap();
    state.download();
    let second = std::fs::read(tmp.path().join("generated_image.png")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn e2e_startup_without_credential_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let config = AppConfig {
        output_dir: tmp.path().join("data"),
        ..AppConfig::default()
    };
    assert!(startup::prepare(&config, |_| None).is_err());
    assert!(!config.output_dir.exists());
}

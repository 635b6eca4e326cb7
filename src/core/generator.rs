// StableBuddy - core/generator.rs
//
// The single capability the UI needs from a model: prompt in, image out.
// Backends live in the platform layer; tests substitute their own.

use crate::core::model::Generation;
use crate::util::error::GenerationError;

/// Turns a text prompt into an image.
///
/// Implementations block for the full duration of inference and must be
/// safe to call from a background thread. The prompt is passed through
/// unmodified, including the empty string.
pub trait ImageGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<Generation, GenerationError>;
}

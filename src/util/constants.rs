// StableBuddy - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name (window title).
pub const APP_NAME: &str = "Stable Buddy";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "StableBuddy";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the optional configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Model
// =============================================================================

/// Pretrained pipeline fetched from the model hub.
pub const DEFAULT_MODEL_ID: &str = "CompVis/stable-diffusion-v1-4";

/// Hub revision holding the half-precision weights.
pub const DEFAULT_MODEL_REVISION: &str = "fp16";

/// Guidance scale passed with every generation request.
pub const DEFAULT_GUIDANCE_SCALE: f32 = 8.5;

/// Allowed guidance scale range for config overrides.
pub const MIN_GUIDANCE_SCALE: f32 = 1.0;
pub const MAX_GUIDANCE_SCALE: f32 = 30.0;

/// Environment variable holding the model hub credential.
pub const DEFAULT_TOKEN_ENV: &str = "AUTH_TOKEN";

/// Hub metadata API base URL. The model id and revision are appended.
pub const DEFAULT_HUB_API_URL: &str = "https://huggingface.co/api/models";

/// Hosted inference endpoint base URL. The model id is appended.
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";

/// Hub pipeline tag a usable model must carry.
pub const TEXT_TO_IMAGE_PIPELINE_TAG: &str = "text-to-image";

/// Response header naming the hardware that served an inference call.
pub const COMPUTE_TYPE_HEADER: &str = "x-compute-type";

// =============================================================================
// Output
// =============================================================================

/// Directory (relative to the working directory) created at startup.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// File the generated image is written to. Always overwritten.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "generated_image.png";

// =============================================================================
// UI
// =============================================================================

/// Initial window inner size in logical points.
pub const WINDOW_WIDTH: f32 = 532.0;
pub const WINDOW_HEIGHT: f32 = 632.0;

/// Image surface size in logical points.
pub const IMAGE_SURFACE_SIZE: f32 = 512.0;

/// User-facing status strings.
pub const MSG_GENERATING: &str = "Generating...";
pub const MSG_GENERATION_FAILED: &str = "Error generating image";
pub const MSG_DOWNLOADED: &str = "Image downloaded!";
pub const MSG_NOTHING_TO_DOWNLOAD: &str = "No image to download!";
pub const MSG_DOWNLOAD_FAILED: &str = "Error saving image";
pub const MSG_BUSY: &str = "A generation is already running.";

/// Repaint interval while a generation is in flight (ms).
pub const GENERATION_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// Logging
// =============================================================================

/// Default log level when neither RUST_LOG, --debug, nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

// StableBuddy - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for the startup sequence.
/// Errors are categorised by the subsystem that produced them. Generation
/// errors stay below this level: the view-model consumes them.
#[derive(Debug)]
pub enum StableBuddyError {
    /// Configuration or credential lookup failed.
    Config(ConfigError),

    /// The pretrained pipeline could not be loaded.
    Model(ModelError),

    /// The output directory could not be prepared.
    Output(OutputError),
}

impl fmt::Display for StableBuddyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Model(e) => write!(f, "Model error: {e}"),
            Self::Output(e) => write!(f, "Output error: {e}"),
        }
    }
}

impl std::error::Error for StableBuddyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Model(e) => Some(e),
            Self::Output(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading and the startup credential.
#[derive(Debug)]
pub enum ConfigError {
    /// The credential environment variable is unset or empty.
    MissingCredential { var: String },

    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential { var } => {
                write!(f, "{var} environment variable is not set")
            }
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for StableBuddyError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Model errors
// ---------------------------------------------------------------------------

/// Errors raised while loading the pretrained pipeline at startup.
#[derive(Debug)]
pub enum ModelError {
    /// The HTTP client could not be constructed.
    Client { source: reqwest::Error },

    /// The hub could not be reached or returned an unreadable body.
    Request {
        model_id: String,
        source: reqwest::Error,
    },

    /// The hub rejected the credential.
    Unauthorized { model_id: String, status: u16 },

    /// The model or revision does not exist.
    NotFound { model_id: String, revision: String },

    /// Any other non-success status from the hub.
    Status { model_id: String, status: u16 },

    /// The model exists but is not a text-to-image pipeline.
    WrongPipeline {
        model_id: String,
        pipeline_tag: Option<String>,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client { source } => write!(f, "Failed to build HTTP client: {source}"),
            Self::Request { model_id, source } => {
                write!(f, "Failed to fetch model '{model_id}': {source}")
            }
            Self::Unauthorized { model_id, status } => write!(
                f,
                "Model host rejected the credential for '{model_id}' (HTTP {status})"
            ),
            Self::NotFound { model_id, revision } => {
                write!(f, "Model '{model_id}' at revision '{revision}' was not found")
            }
            Self::Status { model_id, status } => {
                write!(f, "Model host returned HTTP {status} for '{model_id}'")
            }
            Self::WrongPipeline {
                model_id,
                pipeline_tag,
            } => write!(
                f,
                "Model '{model_id}' is not a text-to-image pipeline (pipeline_tag: {})",
                pipeline_tag.as_deref().unwrap_or("none")
            ),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client { source } => Some(source),
            Self::Request { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ModelError> for StableBuddyError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}

// ---------------------------------------------------------------------------
// Generation errors
// ---------------------------------------------------------------------------

/// Errors raised by a single generation call.
///
/// The UI treats every variant the same way; the variants exist so the log
/// records what actually went wrong.
#[derive(Debug)]
pub enum GenerationError {
    /// Transport failure talking to the inference endpoint.
    Request { source: reqwest::Error },

    /// The endpoint answered with a non-success status.
    Status { status: u16, body: String },

    /// The endpoint answered successfully but sent no image bytes.
    EmptyResponse,

    /// The returned bytes could not be decoded or re-encoded as an image.
    Decode { source: image::ImageError },

    /// Generation failed for a reason outside the categories above.
    Backend { message: String },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request { source } => write!(f, "Inference request failed: {source}"),
            Self::Status { status, body } => {
                write!(f, "Inference endpoint returned HTTP {status}: {body}")
            }
            Self::EmptyResponse => write!(f, "Inference endpoint returned no image"),
            Self::Decode { source } => write!(f, "Could not decode generated image: {source}"),
            Self::Backend { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request { source } => Some(source),
            Self::Decode { source } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Output errors
// ---------------------------------------------------------------------------

/// Errors related to the output directory and image file.
#[derive(Debug)]
pub enum OutputError {
    /// The output directory could not be created.
    CreateDir { path: PathBuf, source: io::Error },

    /// The image file could not be written.
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path, source } => write!(
                f,
                "Failed to create output directory '{}': {source}",
                path.display()
            ),
            Self::Write { path, source } => {
                write!(f, "Failed to write image '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
        }
    }
}

impl From<OutputError> for StableBuddyError {
    fn from(e: OutputError) -> Self {
        Self::Output(e)
    }
}

/// Convenience type alias for StableBuddy results.
pub type Result<T> = std::result::Result<T, StableBuddyError>;

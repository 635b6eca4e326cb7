// StableBuddy - platform/config.rs
//
// Platform-specific configuration directory resolution, config.toml loading
// with startup validation, and the model hub credential.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::fmt;
use std::path::{Path, PathBuf};

/// Resolved platform paths for StableBuddy configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/stablebuddy/ or %APPDATA%\StableBuddy\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// Credential
// =============================================================================

/// Model hub access token. Never printed: `Debug` is redacted and there is no
/// `Display` impl.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Validate a raw credential value looked up from `var`.
///
/// Unset and blank values are both treated as missing.
pub fn credential_from(value: Option<String>, var: &str) -> Result<Credential, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(Credential(v.trim().to_string())),
        _ => Err(ConfigError::MissingCredential {
            var: var.to_string(),
        }),
    }
}

// =============================================================================
// .env loading
// =============================================================================

/// Load `.env` from the working directory or its nearest ancestor.
///
/// Variables already present in the process environment are left alone.
/// Returns a warning when a `.env` exists but cannot be read or parsed; a
/// missing file is normal and returns `None`.
pub fn load_dotenv() -> Option<String> {
    dotenv_warning(dotenvy::dotenv())
}

/// Load a specific env file, with the same rules as `load_dotenv`.
pub fn load_dotenv_file(path: &Path) -> Option<String> {
    dotenv_warning(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

fn dotenv_warning(result: Result<PathBuf, dotenvy::Error>) -> Option<String> {
    match result {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded environment file");
            None
        }
        Err(e) if e.not_found() => None,
        Err(e) => Some(format!("Could not load .env file: {e}")),
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[model]` section.
    pub model: ModelSection,
    /// `[output]` section.
    pub output: OutputSection,
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[model]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ModelSection {
    /// Hub model id, e.g. "CompVis/stable-diffusion-v1-4".
    pub id: Option<String>,
    /// Hub revision (branch, tag, or commit).
    pub revision: Option<String>,
    /// Guidance scale sent with every request.
    pub guidance_scale: Option<f32>,
    /// Name of the environment variable holding the credential.
    pub token_env: Option<String>,
    /// Hub metadata API base URL.
    pub hub_api_url: Option<String>,
    /// Inference endpoint base URL.
    pub inference_url: Option<String>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory created at startup (relative to the working directory).
    pub dir: Option<String>,
    /// File name the image is written to inside `dir`.
    pub file_name: Option<String>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Model --
    pub model_id: String,
    pub revision: String,
    pub guidance_scale: f32,
    pub token_env: String,
    pub hub_api_url: String,
    pub inference_url: String,

    // -- Output --
    pub output_dir: PathBuf,
    pub output_file_name: String,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_id: constants::DEFAULT_MODEL_ID.to_string(),
            revision: constants::DEFAULT_MODEL_REVISION.to_string(),
            guidance_scale: constants::DEFAULT_GUIDANCE_SCALE,
            token_env: constants::DEFAULT_TOKEN_ENV.to_string(),
            hub_api_url: constants::DEFAULT_HUB_API_URL.to_string(),
            inference_url: constants::DEFAULT_INFERENCE_URL.to_string(),
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            output_file_name: constants::DEFAULT_OUTPUT_FILE_NAME.to_string(),
            dark_mode: true,
            log_level: None,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// The one file downloads are written to.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file_name)
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning
/// so the application still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let raw = match read_raw_config(&config_path) {
        Ok(raw) => raw,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            return (AppConfig::default(), vec![msg]);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    validate(raw)
}

fn read_raw_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

fn out_of_range(field: &str, value: impl ToString, expected: impl ToString) -> String {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
    .to_string()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Validate every field of a parsed config, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- Model --
    if let Some(id) = non_blank(&raw.model.id) {
        if id.contains('/') && !id.starts_with('/') && !id.ends_with('/') {
            config.model_id = id.to_string();
        } else {
            warnings.push(out_of_range("model.id", id, "\"owner/name\""));
        }
    }
    if let Some(rev) = non_blank(&raw.model.revision) {
        config.revision = rev.to_string();
    }
    if let Some(scale) = raw.model.guidance_scale {
        if (constants::MIN_GUIDANCE_SCALE..=constants::MAX_GUIDANCE_SCALE).contains(&scale) {
            config.guidance_scale = scale;
        } else {
            warnings.push(out_of_range(
                "model.guidance_scale",
                scale,
                format!(
                    "{}-{}",
                    constants::MIN_GUIDANCE_SCALE,
                    constants::MAX_GUIDANCE_SCALE
                ),
            ));
        }
    }
    if let Some(var) = non_blank(&raw.model.token_env) {
        config.token_env = var.to_string();
    }
    for (field, value, target) in [
        ("model.hub_api_url", &raw.model.hub_api_url, &mut config.hub_api_url),
        (
            "model.inference_url",
            &raw.model.inference_url,
            &mut config.inference_url,
        ),
    ] {
        if let Some(url) = non_blank(value) {
            if url.starts_with("https://") || url.starts_with("http://") {
                *target = url.trim_end_matches('/').to_string();
            } else {
                warnings.push(out_of_range(field, url, "an http(s) URL"));
            }
        }
    }

    // -- Output --
    if let Some(dir) = non_blank(&raw.output.dir) {
        config.output_dir = PathBuf::from(dir);
    }
    if let Some(name) = non_blank(&raw.output.file_name) {
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            warnings.push(out_of_range("output.file_name", name, "a bare file name"));
        } else {
            config.output_file_name = name.to_string();
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => warnings.push(out_of_range("ui.theme", other, "\"dark\" or \"light\"")),
        }
    }

    // -- Logging --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(out_of_range(
                "logging.level",
                level,
                constants::VALID_LOG_LEVELS.join(", "),
            ));
        }
    }
    if let Some(file) = non_blank(&raw.logging.file) {
        config.log_file = Some(file.to_string());
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (AppConfig, Vec<String>) {
        validate(toml::from_str(text).unwrap())
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
        assert_eq!(config, AppConfig::default());
        assert_eq!(
            config.output_path(),
            PathBuf::from("data").join("generated_image.png")
        );
        assert_eq!(config.guidance_scale, 8.5);
    }

    #[test]
    fn test_unparseable_file_warns_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[model\nid = ").unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"));
    }

    #[test]
    fn test_valid_overrides_apply() {
        let (config, warnings) = parse(
            r#"
            [model]
            id = "stabilityai/sd-turbo"
            revision = "main"
            guidance_scale = 7.0
            token_env = "HF_TOKEN"
            inference_url = "http://localhost:8080/models/"

            [output]
            dir = "out"
            file_name = "latest.png"

            [ui]
            theme = "Light"

            [logging]
            level = "DEBUG"
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.model_id, "stabilityai/sd-turbo");
        assert_eq!(config.revision, "main");
        assert_eq!(config.guidance_scale, 7.0);
        assert_eq!(config.token_env, "HF_TOKEN");
        assert_eq!(config.inference_url, "http://localhost:8080/models");
        assert_eq!(config.output_path(), PathBuf::from("out").join("latest.png"));
        assert!(!config.dark_mode);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let (config, warnings) = parse(
            r#"
            [model]
            id = "no-owner"
            guidance_scale = 99.0
            hub_api_url = "ftp://example.com"

            [output]
            file_name = "../escape.png"

            [ui]
            theme = "purple"

            [logging]
            level = "loud"
            "#,
        );
        assert_eq!(warnings.len(), 6, "{warnings:?}");
        let defaults = AppConfig::default();
        assert_eq!(config.model_id, defaults.model_id);
        assert_eq!(config.guidance_scale, defaults.guidance_scale);
        assert_eq!(config.hub_api_url, defaults.hub_api_url);
        assert_eq!(config.output_file_name, defaults.output_file_name);
        assert!(config.dark_mode);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_model_section_has_no_precision_setting() {
        // Older configs carried a precision key; it is ignored, not rejected.
        let (config, warnings) = parse(
            r#"
            [model]
            revision = "main"
            precision = "float32"
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(
            config,
            AppConfig {
                revision: "main".to_string(),
                ..AppConfig::default()
            }
        );
    }

    #[test]
    fn test_dotenv_fills_unset_and_keeps_set_vars() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".env");
        std::fs::write(
            &path,
            "STABLEBUDDY_TEST_DOTENV_UNSET=from_file\nSTABLEBUDDY_TEST_DOTENV_SET=from_file\n",
        )
        .unwrap();
        std::env::set_var("STABLEBUDDY_TEST_DOTENV_SET", "from_env");

        assert_eq!(load_dotenv_file(&path), None);
        assert_eq!(
            std::env::var("STABLEBUDDY_TEST_DOTENV_UNSET").as_deref(),
            Ok("from_file")
        );
        assert_eq!(
            std::env::var("STABLEBUDDY_TEST_DOTENV_SET").as_deref(),
            Ok("from_env")
        );
    }

    #[test]
    fn test_dotenv_missing_is_silent_and_malformed_warns() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(load_dotenv_file(&tmp.path().join(".env")), None);

        let bad = tmp.path().join("bad.env");
        std::fs::write(&bad, "STABLEBUDDY_TEST_DOTENV_BAD='unterminated\n").unwrap();
        let warning = load_dotenv_file(&bad).expect("malformed file warns");
        assert!(warning.starts_with("Could not load .env file"));
    }

    #[test]
    fn test_credential_missing_or_blank() {
        assert!(matches!(
            credential_from(None, "AUTH_TOKEN"),
            Err(ConfigError::MissingCredential { ref var }) if var == "AUTH_TOKEN"
        ));
        assert!(credential_from(Some("   ".to_string()), "AUTH_TOKEN").is_err());
    }

    #[test]
    fn test_credential_is_redacted() {
        let cred = credential_from(Some(" hf_secret ".to_string()), "AUTH_TOKEN").unwrap();
        assert_eq!(cred.expose(), "hf_secret");
        assert!(!format!("{cred:?}").contains("hf_secret"));
    }
}

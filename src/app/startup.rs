// StableBuddy - app/startup.rs
//
// Startup steps that must pass before any window is created:
//   1. the model hub credential is present,
//   2. the output directory exists,
//   3. the pinned model resolves on the hub.
// Every step returns the top-level error so main reports them one way.

use crate::platform::config::{credential_from, AppConfig, Credential};
use crate::platform::fs;
use crate::platform::hub::{HubSettings, ModelHandle};
use crate::util::error::Result;

/// Validate the credential and create the output directory.
///
/// `lookup` resolves an environment variable by name; `main` passes
/// `std::env::var`, tests pass a closure. The credential is checked first so
/// a missing token leaves the filesystem untouched.
pub fn prepare<F>(config: &AppConfig, lookup: F) -> Result<Credential>
where
    F: Fn(&str) -> Option<String>,
{
    let credential = credential_from(lookup(&config.token_env), &config.token_env)?;
    fs::ensure_output_dir(&config.output_dir)?;
    tracing::debug!(
        token_env = %config.token_env,
        output = %config.output_path().display(),
        "Startup checks passed"
    );
    Ok(credential)
}

/// Load the model named in `config`. Blocks until the hub answers.
pub fn load_model(config: &AppConfig, credential: Credential) -> Result<ModelHandle> {
    let model = ModelHandle::load(HubSettings::from(config), credential)?;
    Ok(model)
}

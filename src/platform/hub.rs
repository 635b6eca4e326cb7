// StableBuddy - platform/hub.rs
//
// Model hub backend for the `ImageGenerator` capability.
//
// Startup (`ModelHandle::load`) is a one-time blocking call that resolves the
// pinned model revision on the hub with the credential and checks it is a
// text-to-image pipeline. Each `generate` call is a single blocking POST to
// the hosted inference endpoint. The host, not this client, chooses the
// device and numeric precision; it reports the device in a response header.
//
// No retries, no timeout, no cancellation.

use crate::core::generator::ImageGenerator;
use crate::core::model::{ComputeDevice, GeneratedImage, Generation, ModelInfo};
use crate::platform::config::{AppConfig, Credential};
use crate::util::constants;
use crate::util::error::{GenerationError, ModelError};
use reqwest::blocking::Client;
use std::time::Duration;

/// Longest slice of an error response body kept in a `GenerationError`.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Model selection and endpoints, taken from the validated config.
#[derive(Debug, Clone, PartialEq)]
pub struct HubSettings {
    pub model_id: String,
    pub revision: String,
    pub guidance_scale: f32,
    pub hub_api_url: String,
    pub inference_url: String,
}

impl From<&AppConfig> for HubSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            model_id: config.model_id.clone(),
            revision: config.revision.clone(),
            guidance_scale: config.guidance_scale,
            hub_api_url: config.hub_api_url.clone(),
            inference_url: config.inference_url.clone(),
        }
    }
}

impl HubSettings {
    /// `GET` target resolving the model at the pinned revision.
    pub fn metadata_url(&self) -> String {
        format!(
            "{}/{}/revision/{}",
            self.hub_api_url, self.model_id, self.revision
        )
    }

    /// `POST` target for generation.
    pub fn generate_url(&self) -> String {
        format!("{}/{}", self.inference_url, self.model_id)
    }
}

/// Subset of the hub's model metadata that startup checks.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub pipeline_tag: Option<String>,
    /// Commit the revision resolved to.
    #[serde(default)]
    pub sha: Option<String>,
}

/// Reject models whose hub metadata names a pipeline other than text-to-image.
///
/// A missing tag is accepted: older repos and private mirrors often omit it.
pub fn check_pipeline(model_id: &str, metadata: &ModelMetadata) -> Result<(), ModelError> {
    match metadata.pipeline_tag.as_deref() {
        None | Some(constants::TEXT_TO_IMAGE_PIPELINE_TAG) => Ok(()),
        Some(other) => Err(ModelError::WrongPipeline {
            model_id: model_id.to_string(),
            pipeline_tag: Some(other.to_string()),
        }),
    }
}

/// JSON body for one inference request.
pub fn request_body(prompt: &str, guidance_scale: f32) -> serde_json::Value {
    serde_json::json!({
        "inputs": prompt,
        "parameters": { "guidance_scale": guidance_scale },
        "options": { "wait_for_model": true, "use_cache": false },
    })
}

fn truncate_body(body: &str) -> String {
    let mut out: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    if body.chars().count() > MAX_ERROR_BODY_CHARS {
        out.push_str("...");
    }
    out
}

/// A loaded, immutable handle to the pretrained pipeline.
pub struct ModelHandle {
    client: Client,
    settings: HubSettings,
    credential: Credential,
    commit: Option<String>,
}

impl ModelHandle {
    /// Resolve the pinned model on the hub. Blocks; call once at startup.
    pub fn load(settings: HubSettings, credential: Credential) -> Result<Self, ModelError> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", constants::APP_ID, constants::APP_VERSION))
            .timeout(None::<Duration>)
            .build()
            .map_err(|source| ModelError::Client { source })?;
        Self::load_with_client(client, settings, credential)
    }

    /// As `load`, with a caller-supplied HTTP client.
    pub fn load_with_client(
        client: Client,
        settings: HubSettings,
        credential: Credential,
    ) -> Result<Self, ModelError> {
        tracing::info!(
            model = %settings.model_id,
            revision = %settings.revision,
            "Loading model"
        );

        let response = client
            .get(settings.metadata_url())
            .bearer_auth(credential.expose())
            .send()
            .map_err(|source| ModelError::Request {
                model_id: settings.model_id.clone(),
                source,
            })?;

        let status = response.status();
        match status.as_u16() {
            _ if status.is_success() => {}
            401 | 403 => {
                return Err(ModelError::Unauthorized {
                    model_id: settings.model_id.clone(),
                    status: status.as_u16(),
                });
            }
            404 => {
                return Err(ModelError::NotFound {
                    model_id: settings.model_id.clone(),
                    revision: settings.revision.clone(),
                });
            }
            _ => {
                return Err(ModelError::Status {
                    model_id: settings.model_id.clone(),
                    status: status.as_u16(),
                });
            }
        }

        let metadata: ModelMetadata = response.json().map_err(|source| ModelError::Request {
            model_id: settings.model_id.clone(),
            source,
        })?;
        check_pipeline(&settings.model_id, &metadata)?;
        if metadata.pipeline_tag.is_none() {
            tracing::warn!(model = %settings.model_id, "Model has no pipeline tag; assuming text-to-image");
        }

        tracing::info!(
            model = %settings.model_id,
            commit = metadata.sha.as_deref().unwrap_or("unknown"),
            "Model ready"
        );

        Ok(Self {
            client,
            settings,
            credential,
            commit: metadata.sha,
        })
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            model_id: self.settings.model_id.clone(),
            revision: self.settings.revision.clone(),
        }
    }

    /// Commit hash the pinned revision resolved to at load time.
    pub fn commit(&self) -> Option<&str> {
        self.commit.as_deref()
    }
}

impl ImageGenerator for ModelHandle {
    fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        tracing::debug!(
            model = %self.settings.model_id,
            prompt_chars = prompt.chars().count(),
            guidance_scale = self.settings.guidance_scale,
            "Sending generation request"
        );

        let response = self
            .client
            .post(self.settings.generate_url())
            .bearer_auth(self.credential.expose())
            .header(reqwest::header::ACCEPT, "image/png")
            .json(&request_body(prompt, self.settings.guidance_scale))
            .send()
            .map_err(|source| GenerationError::Request { source })?;

        let status = response.status();
        let device = response
            .headers()
            .get(constants::COMPUTE_TYPE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(ComputeDevice::from_compute_type)
            .unwrap_or_default();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|source| GenerationError::Request { source })?;
        let image = GeneratedImage::from_encoded(&bytes)?;

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            device = %device,
            "Generation response decoded"
        );

        Ok(Generation { image, device })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> HubSettings {
        HubSettings::from(&AppConfig::default())
    }

    #[test]
    fn test_urls_pin_revision() {
        let s = settings();
        assert_eq!(
            s.metadata_url(),
            "https://huggingface.co/api/models/CompVis/stable-diffusion-v1-4/revision/fp16"
        );
        assert_eq!(
            s.generate_url(),
            "https://api-inference.huggingface.co/models/CompVis/stable-diffusion-v1-4"
        );
    }

    #[test]
    fn test_request_body_passes_prompt_through() {
        let body = request_body("", 8.5);
        assert_eq!(body["inputs"], "");
        assert_eq!(body["parameters"]["guidance_scale"], 8.5);
        assert_eq!(body["options"]["wait_for_model"], true);
    }

    #[test]
    fn test_check_pipeline() {
        let ok = ModelMetadata {
            pipeline_tag: Some("text-to-image".to_string()),
            sha: None,
        };
        assert!(check_pipeline("a/b", &ok).is_ok());
        assert!(check_pipeline("a/b", &ModelMetadata::default()).is_ok());

        let wrong = ModelMetadata {
            pipeline_tag: Some("text-generation".to_string()),
            sha: None,
        };
        assert!(matches!(
            check_pipeline("a/b", &wrong),
            Err(ModelError::WrongPipeline { .. })
        ));
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short"), "short");
        let long = "x".repeat(MAX_ERROR_BODY_CHARS + 10);
        let out = truncate_body(&long);
        assert_eq!(out.len(), MAX_ERROR_BODY_CHARS + 3);
        assert!(out.ends_with("..."));
    }
}

// StableBuddy - core/model.rs
//
// Core data model types shared across all layers: the generated image, the
// device that produced it, and the messages the generation worker sends back
// to the UI thread.

use crate::util::error::GenerationError;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::fmt;
use std::io::Cursor;
use std::time::Duration;

// =============================================================================
// Generated image
// =============================================================================

/// An image produced by the external model.
///
/// Holds both the RGBA8 pixels used for display and the PNG bytes written on
/// download, so the file on disk is byte-identical to what was generated no
/// matter how many times it is saved.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    png: Vec<u8>,
}

impl GeneratedImage {
    /// Decode whatever container the model host returned (PNG, JPEG, WebP)
    /// and normalise it to PNG.
    pub fn from_encoded(bytes: &[u8]) -> Result<Self, GenerationError> {
        if bytes.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        let decoded =
            image::load_from_memory(bytes).map_err(|source| GenerationError::Decode { source })?;
        Self::from_dynamic(decoded)
    }

    /// Build from raw RGBA8 pixels. `rgba.len()` must equal `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, GenerationError> {
        let buffer = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
            GenerationError::Backend {
                message: format!("pixel buffer does not match {width}x{height} RGBA"),
            }
        })?;
        Self::from_dynamic(DynamicImage::ImageRgba8(buffer))
    }

    fn from_dynamic(img: DynamicImage) -> Result<Self, GenerationError> {
        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();

        let mut png = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|source| GenerationError::Decode { source })?;

        Ok(Self {
            width,
            height,
            rgba: rgba.into_raw(),
            png,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA8 pixels, row-major.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// PNG-encoded bytes, exactly as written to the output file.
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }
}

// Pixel buffers are large; keep Debug output readable.
impl fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_len", &self.png.len())
            .finish()
    }
}

// =============================================================================
// Compute device
// =============================================================================

/// Hardware that served a generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComputeDevice {
    /// GPU or other accelerator.
    Accelerator,
    /// General-purpose processor fallback.
    Cpu,
    #[default]
    Unknown,
}

impl ComputeDevice {
    /// Map a host-reported compute type (e.g. "gpu", "cuda", "cpu").
    ///
    /// Hosts may append qualifiers after a `+` ("gpu+optimized"); only the
    /// base type is compared.
    pub fn from_compute_type(value: &str) -> Self {
        let base = value.split('+').next().unwrap_or(value);
        match base.trim().to_ascii_lowercase().as_str() {
            "gpu" | "cuda" | "accelerator" | "mps" => Self::Accelerator,
            "cpu" => Self::Cpu,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Accelerator => "GPU",
            Self::Cpu => "CPU",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Model description
// =============================================================================

/// Identity of the loaded pipeline, for display in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub model_id: String,
    pub revision: String,
}

// =============================================================================
// Worker messages
// =============================================================================

/// Successful result of one `ImageGenerator::generate` call.
#[derive(Debug, Clone)]
pub struct Generation {
    pub image: GeneratedImage,
    pub device: ComputeDevice,
}

/// Message sent from the generation worker to the UI thread.
#[derive(Debug)]
pub enum GenerationOutcome {
    Finished {
        generation: Generation,
        elapsed: Duration,
    },
    Failed {
        error: GenerationError,
    },
}

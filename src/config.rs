//! Process configuration.
//!
//! Everything is read once at start-up from the environment (`main` loads `.env`
//! via `dotenvy` first) and then passed down explicitly; nothing reads the
//! environment while a request is in flight.

use crate::openrouter::DEFAULT_MODEL;
use thiserror::Error;

const DEFAULT_DPI: u32 = 300;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_UPLOAD_MB: usize = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set to a non-empty value")]
    MissingCredential(&'static str),
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Which OCR backend turns page images into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrEngineKind {
    Tesseract,
    Vision,
}

impl OcrEngineKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tesseract" => Some(Self::Tesseract),
            "vision" => Some(Self::Vision),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OcrSettings {
    pub engine: OcrEngineKind,
    pub dpi: u32,
    /// Luminance cut-off for binarization; `None` keeps plain grayscale.
    pub binarize_threshold: Option<u8>,
    pub lang: String,
    pub tesseract_cmd: String,
    pub pdftoppm_cmd: String,
    pub vision_model: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub ocr: OcrSettings,
    pub bind_addr: String,
    pub max_upload_bytes: usize,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let api_key = get("OPENROUTER_API_KEY")
            .ok_or(ConfigError::MissingCredential("OPENROUTER_API_KEY"))?;
        let model = get("COMPLIANCE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let engine = match get("OCR_ENGINE") {
            Some(raw) => OcrEngineKind::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "OCR_ENGINE",
                value: raw.clone(),
                reason: "expected `tesseract` or `vision`".to_string(),
            })?,
            None => OcrEngineKind::Tesseract,
        };

        let dpi = match get("OCR_DPI") {
            Some(raw) => {
                let dpi: u32 = parse_number("OCR_DPI", &raw)?;
                if !(72..=600).contains(&dpi) {
                    return Err(ConfigError::Invalid {
                        var: "OCR_DPI",
                        value: raw,
                        reason: "must be between 72 and 600".to_string(),
                    });
                }
                dpi
            }
            None => DEFAULT_DPI,
        };

        let binarize_threshold = get("OCR_BINARIZE_THRESHOLD")
            .map(|raw| parse_number::<u8>("OCR_BINARIZE_THRESHOLD", &raw))
            .transpose()?;

        let max_upload_mb = get("MAX_UPLOAD_MB")
            .map(|raw| parse_number::<usize>("MAX_UPLOAD_MB", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);

        Ok(Self {
            api_key,
            ocr: OcrSettings {
                engine,
                dpi,
                binarize_threshold,
                lang: get("OCR_LANG").unwrap_or_else(|| "eng".to_string()),
                tesseract_cmd: get("TESSERACT_CMD").unwrap_or_else(|| "tesseract".to_string()),
                pdftoppm_cmd: get("PDFTOPPM_CMD").unwrap_or_else(|| "pdftoppm".to_string()),
                vision_model: get("OCR_VISION_MODEL").unwrap_or_else(|| model.clone()),
            },
            model,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        })
    }
}

fn parse_number<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

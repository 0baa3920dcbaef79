//! Tesseract CLI OCR engine.

use super::{encode_png, run_with_stdin, OcrEngine};
use anyhow::Result;
use image::GrayImage;

pub struct TesseractEngine {
    cmd: String,
    lang: String,
}

impl TesseractEngine {
    pub fn new(cmd: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            lang: lang.into(),
        }
    }

    /// `--psm 6`: treat the page as a single uniform block of text.
    fn args(&self) -> Vec<String> {
        vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "--psm".to_string(),
            "6".to_string(),
            "-l".to_string(),
            self.lang.clone(),
        ]
    }
}

#[async_trait::async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, page: &GrayImage) -> Result<String> {
        let png = encode_png(page)?;
        let stdout = run_with_stdin(&self.cmd, &self.args(), &png).await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

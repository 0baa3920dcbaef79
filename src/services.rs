//! Long-lived collaborators built once at start-up and passed to every request.

use crate::config::{ConfigError, OcrEngineKind, Settings};
use crate::ingest::pdftoppm::PdftoppmRenderer;
use crate::ingest::tesseract::TesseractEngine;
use crate::ingest::vision::VisionOcrEngine;
use crate::ingest::{Ingestor, OcrEngine};
use crate::llm::LlmClient;
use crate::openrouter::OpenRouterClient;
use std::sync::Arc;
use tracing::info;

pub struct Services {
    pub llm: Arc<dyn LlmClient>,
    pub ingestor: Ingestor,
}

impl Services {
    pub fn new(llm: Arc<dyn LlmClient>, ingestor: Ingestor) -> Self {
        Self { llm, ingestor }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let client = OpenRouterClient::new(&settings.api_key)?.with_model(&settings.model);
        info!("OpenRouter client initialized (model={})", client.model());

        let ocr: Box<dyn OcrEngine> = match settings.ocr.engine {
            OcrEngineKind::Tesseract => Box::new(TesseractEngine::new(
                &settings.ocr.tesseract_cmd,
                &settings.ocr.lang,
            )),
            OcrEngineKind::Vision => Box::new(VisionOcrEngine::new(
                client.clone().with_model(&settings.ocr.vision_model),
            )),
        };
        info!(
            "OCR engine: {} at {} dpi (binarize threshold: {:?})",
            ocr.name(),
            settings.ocr.dpi,
            settings.ocr.binarize_threshold
        );

        let ingestor = Ingestor::new(
            Box::new(PdftoppmRenderer::new(&settings.ocr.pdftoppm_cmd)),
            ocr,
            settings.ocr.dpi,
            settings.ocr.binarize_threshold,
        );

        Ok(Self::new(Arc::new(client), ingestor))
    }
}

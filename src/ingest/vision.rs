//! OCR through a vision-capable chat model on OpenRouter.

use super::{encode_png, OcrEngine};
use crate::openrouter::{Message, OpenRouterClient};
use anyhow::Result;
use image::GrayImage;
use tracing::debug;

const TRANSCRIBE_PROMPT: &str = "You are an OCR engine. Transcribe all text visible on the \
page image exactly as written, top to bottom, preserving line breaks. Output only the \
transcribed text with no commentary. If the page has no text, output nothing.";

pub struct VisionOcrEngine {
    client: OpenRouterClient,
}

impl VisionOcrEngine {
    pub fn new(client: OpenRouterClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl OcrEngine for VisionOcrEngine {
    fn name(&self) -> &str {
        "vision"
    }

    async fn recognize(&self, page: &GrayImage) -> Result<String> {
        let png = encode_png(page)?;
        debug!(
            "VisionOcrEngine: sending {}x{} page ({} bytes) to {}",
            page.width(),
            page.height(),
            png.len(),
            self.client.model()
        );

        let messages = vec![
            Message::system(TRANSCRIBE_PROMPT),
            Message::user_with_images("Transcribe this page.", vec![png]),
        ];
        self.client.chat(messages).await
    }
}

//! Document ingestion: PDF bytes → per-page raster images → OCR text.
//!
//! Rasterization and recognition sit behind the [`PageRenderer`] and [`OcrEngine`]
//! traits so backends (poppler + tesseract subprocesses, a vision model) can be
//! swapped without touching the page loop. A bad page is logged and skipped; only a
//! document with nothing usable at all fails the call.

pub mod pdftoppm;
pub mod tesseract;
pub mod vision;

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, ImageEncoder};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Separator placed between the text of consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read PDF: {0}")]
    DocumentRead(String),
    #[error("OCR did not extract any text from the document")]
    OcrEmpty,
}

/// Renders a single PDF page (1-indexed) to an image.
#[async_trait::async_trait]
pub trait PageRenderer: Send + Sync {
    fn name(&self) -> &str;
    async fn render_page(&self, pdf: &[u8], page_num: u32, dpi: u32) -> Result<DynamicImage>;
}

/// Recognizes the text of one preprocessed page image.
#[async_trait::async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;
    async fn recognize(&self, page: &GrayImage) -> Result<String>;
}

pub struct Ingestor {
    renderer: Box<dyn PageRenderer>,
    ocr: Box<dyn OcrEngine>,
    dpi: u32,
    binarize_threshold: Option<u8>,
}

impl Ingestor {
    pub fn new(
        renderer: Box<dyn PageRenderer>,
        ocr: Box<dyn OcrEngine>,
        dpi: u32,
        binarize_threshold: Option<u8>,
    ) -> Self {
        Self {
            renderer,
            ocr,
            dpi,
            binarize_threshold,
        }
    }

    /// Extract the text of every page, in page order.
    ///
    /// Pages are rendered and recognized one at a time so at most one raster is held
    /// in memory.
    pub async fn extract_text(&self, pdf: &[u8]) -> Result<String, IngestError> {
        let page_count = count_pages(pdf)?;
        if page_count == 0 {
            return Err(IngestError::DocumentRead("no extractable pages".to_string()));
        }

        info!(
            "Ingesting PDF: {} pages, {} bytes (renderer={}, ocr={}, dpi={})",
            page_count,
            pdf.len(),
            self.renderer.name(),
            self.ocr.name(),
            self.dpi
        );

        let mut rendered = 0usize;
        let mut segments = Vec::with_capacity(page_count as usize);

        for page_num in 1..=page_count {
            let image = match self.renderer.render_page(pdf, page_num, self.dpi).await {
                Ok(image) => image,
                Err(e) => {
                    warn!("Failed to render page {}: {:#}", page_num, e);
                    continue;
                }
            };
            rendered += 1;

            let gray = preprocess(image, self.binarize_threshold);
            match self.ocr.recognize(&gray).await {
                Ok(text) => {
                    debug!("Page {}: {} chars recognized", page_num, text.len());
                    segments.push(text);
                }
                Err(e) => {
                    warn!("OCR failed on page {}: {:#}", page_num, e);
                    segments.push(String::new());
                }
            }
        }

        if rendered == 0 {
            return Err(IngestError::DocumentRead("no extractable pages".to_string()));
        }

        join_segments(&segments)
    }
}

/// Open the PDF and count its pages.
fn count_pages(pdf: &[u8]) -> Result<u32, IngestError> {
    use lopdf::Document;
    use std::io::Cursor;

    let doc = Document::load_from(Cursor::new(pdf))
        .map_err(|e| IngestError::DocumentRead(e.to_string()))?;

    Ok(doc.get_pages().len() as u32)
}

/// Grayscale the page and, when a threshold is set, binarize it.
pub fn preprocess(image: DynamicImage, binarize_threshold: Option<u8>) -> GrayImage {
    let mut gray = image.to_luma8();
    if let Some(threshold) = binarize_threshold {
        for pixel in gray.pixels_mut() {
            pixel.0[0] = if pixel.0[0] >= threshold { 255 } else { 0 };
        }
    }
    gray
}

/// Join per-page text, dropping blank segments.
fn join_segments(segments: &[String]) -> Result<String, IngestError> {
    let text = segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR);

    if text.is_empty() {
        Err(IngestError::OcrEmpty)
    } else {
        Ok(text)
    }
}

/// Encode a grayscale page as PNG.
pub(crate) fn encode_png(page: &GrayImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(
            page.as_raw(),
            page.width(),
            page.height(),
            image::ColorType::L8,
        )
        .context("Failed to encode page as PNG")?;
    Ok(buf)
}

/// Run an external tool, feeding `input` on stdin and collecting stdout.
pub(crate) async fn run_with_stdin(program: &str, args: &[String], input: &[u8]) -> Result<Vec<u8>> {
    let mut child = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("Failed to start `{}`", program))?;

    let mut stdin = child
        .stdin
        .take()
        .with_context(|| format!("`{}` stdin unavailable", program))?;
    let input = input.to_vec();
    // Written from a separate task so a full stdout pipe cannot stall the write.
    let writer = tokio::spawn(async move {
        let result = stdin.write_all(&input).await;
        drop(stdin);
        result
    });

    let output = child
        .wait_with_output()
        .await
        .with_context(|| format!("Failed to wait for `{}`", program))?;
    let written = writer.await.context("stdin writer task panicked")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("`{}` exited with {}: {}", program, output.status, stderr.trim());
    }
    written.with_context(|| format!("Failed to write to `{}` stdin", program))?;

    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{build_pdf, FakeOcr, FakeRenderer};
    use image::Luma;

    fn ingestor(renderer: FakeRenderer, ocr: FakeOcr) -> Ingestor {
        Ingestor::new(Box::new(renderer), Box::new(ocr), 300, None)
    }

    #[tokio::test]
    async fn test_pages_joined_in_order() {
        let ocr = FakeOcr::new()
            .page(1, "  Page one text ")
            .page(2, "Page two text")
            .page(3, "Page three text");
        let text = ingestor(FakeRenderer::new(), ocr)
            .extract_text(&build_pdf(3))
            .await
            .unwrap();
        assert_eq!(text, "Page one text\n\nPage two text\n\nPage three text");
    }

    #[tokio::test]
    async fn test_blank_and_failed_pages_dropped() {
        let ocr = FakeOcr::new()
            .page(1, "first")
            .page(2, "   ")
            .fail(3)
            .page(4, "fourth");
        let text = ingestor(FakeRenderer::new(), ocr)
            .extract_text(&build_pdf(4))
            .await
            .unwrap();
        assert_eq!(text, "first\n\nfourth");
    }

    #[tokio::test]
    async fn test_render_failure_skips_page() {
        let ocr = FakeOcr::new().page(1, "one").page(2, "two").page(3, "three");
        let text = ingestor(FakeRenderer::new().fail(2), ocr)
            .extract_text(&build_pdf(3))
            .await
            .unwrap();
        assert_eq!(text, "one\n\nthree");
    }

    #[tokio::test]
    async fn test_all_pages_fail_to_render() {
        let err = ingestor(FakeRenderer::new().fail(1).fail(2), FakeOcr::new().page(1, "x"))
            .extract_text(&build_pdf(2))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::DocumentRead(_)));
    }

    #[tokio::test]
    async fn test_all_ocr_empty() {
        let ocr = FakeOcr::new().page(1, "").fail(2);
        let err = ingestor(FakeRenderer::new(), ocr)
            .extract_text(&build_pdf(2))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::OcrEmpty));
    }

    #[tokio::test]
    async fn test_zero_page_pdf() {
        let err = ingestor(FakeRenderer::new(), FakeOcr::new())
            .extract_text(&build_pdf(0))
            .await
            .unwrap_err();
        match err {
            IngestError::DocumentRead(msg) => assert_eq!(msg, "no extractable pages"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_not_a_pdf() {
        let err = ingestor(FakeRenderer::new(), FakeOcr::new())
            .extract_text(b"definitely not a pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::DocumentRead(_)));
    }

    #[test]
    fn test_preprocess_binarizes() {
        let mut rgb = image::RgbImage::new(2, 1);
        rgb.put_pixel(0, 0, image::Rgb([250, 250, 250]));
        rgb.put_pixel(1, 0, image::Rgb([40, 40, 40]));
        let image = DynamicImage::ImageRgb8(rgb);

        let gray = preprocess(image.clone(), None);
        assert_eq!(gray.get_pixel(1, 0), &Luma([40]));

        let bw = preprocess(image, Some(128));
        assert_eq!(bw.get_pixel(0, 0), &Luma([255]));
        assert_eq!(bw.get_pixel(1, 0), &Luma([0]));
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_with_stdin_passes_large_input_through() {
        let input: Vec<u8> = (0..1024 * 1024).map(|i| (i % 251) as u8).collect();
        let output = run_with_stdin("cat", &[], &input).await.unwrap();
        assert_eq!(output.len(), input.len());
        assert!(output == input);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_with_stdin_reports_exit_status() {
        let err = run_with_stdin("sh", &strings(&["-c", "echo boom >&2; exit 3"]), b"ignored")
            .await
            .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("exit status: 3"), "{message}");
        assert!(message.contains("boom"), "{message}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_with_stdin_tool_closing_stdin_early() {
        let input = vec![b'x'; 1024 * 1024];
        let err = run_with_stdin("sh", &strings(&["-c", "exec 0<&-; echo done"]), &input)
            .await
            .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("stdin"), "{message}");
    }

    #[test]
    fn test_encode_png_roundtrips_dimensions() {
        let page = GrayImage::new(7, 3);
        let png = encode_png(&page).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (7, 3));
    }
}

//! Poppler `pdftoppm` page renderer.

use super::{run_with_stdin, PageRenderer};
use anyhow::{Context, Result};
use image::DynamicImage;

pub struct PdftoppmRenderer {
    cmd: String,
}

impl PdftoppmRenderer {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    /// Arguments for one page: PDF on stdin (`-`), PNG on stdout (no output root).
    fn args(page_num: u32, dpi: u32) -> Vec<String> {
        vec![
            "-r".to_string(),
            dpi.to_string(),
            "-f".to_string(),
            page_num.to_string(),
            "-l".to_string(),
            page_num.to_string(),
            "-png".to_string(),
            "-".to_string(),
        ]
    }
}

#[async_trait::async_trait]
impl PageRenderer for PdftoppmRenderer {
    fn name(&self) -> &str {
        "pdftoppm"
    }

    async fn render_page(&self, pdf: &[u8], page_num: u32, dpi: u32) -> Result<DynamicImage> {
        let png = run_with_stdin(&self.cmd, &Self::args(page_num, dpi), pdf).await?;
        if png.is_empty() {
            anyhow::bail!("pdftoppm produced no output for page {}", page_num);
        }
        image::load_from_memory(&png)
            .with_context(|| format!("Failed to decode rendered page {}", page_num))
    }
}

//! Test doubles: a scripted model, scripted page renderer/OCR, and a PDF builder.

use crate::ingest::{Ingestor, OcrEngine, PageRenderer};
use crate::llm::LlmClient;
use crate::services::Services;
use anyhow::Result;
use image::{DynamicImage, GrayImage};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Replays canned replies in order and records every prompt it was given.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Err(anyhow::anyhow!("no scripted reply left")),
        }
    }
}

/// Renders page N as an N×1 image so [`FakeOcr`] can tell pages apart.
#[derive(Default)]
pub struct FakeRenderer {
    failing: HashSet<u32>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(mut self, page_num: u32) -> Self {
        self.failing.insert(page_num);
        self
    }
}

#[async_trait::async_trait]
impl PageRenderer for FakeRenderer {
    fn name(&self) -> &str {
        "fake"
    }

    async fn render_page(&self, _pdf: &[u8], page_num: u32, _dpi: u32) -> Result<DynamicImage> {
        if self.failing.contains(&page_num) {
            anyhow::bail!("page {} is corrupt", page_num);
        }
        Ok(DynamicImage::new_rgb8(page_num, 1))
    }
}

/// Returns scripted text per page (keyed by image width); unscripted pages are blank.
#[derive(Default)]
pub struct FakeOcr {
    pages: HashMap<u32, Result<String, String>>,
}

impl FakeOcr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page_num: u32, text: &str) -> Self {
        self.pages.insert(page_num, Ok(text.to_string()));
        self
    }

    pub fn fail(mut self, page_num: u32) -> Self {
        self.pages
            .insert(page_num, Err(format!("engine crashed on page {page_num}")));
        self
    }
}

#[async_trait::async_trait]
impl OcrEngine for FakeOcr {
    fn name(&self) -> &str {
        "fake"
    }

    async fn recognize(&self, page: &GrayImage) -> Result<String> {
        match self.pages.get(&page.width()) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(anyhow::anyhow!(message.clone())),
            None => Ok(String::new()),
        }
    }
}

/// Services backed by the scripted model and a fake OCR stack.
pub fn services(llm: Arc<ScriptedLlm>, ocr: FakeOcr) -> Services {
    let ingestor = Ingestor::new(Box::new(FakeRenderer::new()), Box::new(ocr), 300, None);
    Services::new(llm, ingestor)
}

/// Build a real PDF with `page_count` empty pages.
pub fn build_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for _ in 0..page_count {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

//! PDF chunk extraction: page text plus AI-described embedded images

use flate2::read::ZlibDecoder;
use lopdf::Document;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::providers::VisionProvider;
use crate::types::{Chunk, ChunkMetadata};

use super::splitter::RecursiveTextSplitter;

/// Fixed fallback when an image cannot be described
const IMAGE_PLACEHOLDER: &str = "Image description unavailable due to processing error.";

/// Skip tiny images (icons, bullets, decorations)
const MIN_IMAGE_DIMENSION: i64 = 50;

/// Raw content of one page before chunking
struct PageContent {
    /// Page number (1-indexed)
    page_number: u32,
    /// Extracted text, may be empty
    text: String,
    /// Decoded embedded images
    images: Vec<Vec<u8>>,
}

/// Decomposes a PDF into an ordered sequence of chunks
///
/// Page text and image descriptions are split with the same policy, so
/// every chunk obeys the configured size bound.
pub struct ChunkExtractor {
    splitter: RecursiveTextSplitter,
    vision: Arc<dyn VisionProvider>,
}

impl ChunkExtractor {
    /// Create a new extractor
    pub fn new(chunking: &ChunkingConfig, vision: Arc<dyn VisionProvider>) -> Self {
        Self {
            splitter: RecursiveTextSplitter::new(chunking.chunk_size, chunking.chunk_overlap),
            vision,
        }
    }

    /// Extract all chunks from a PDF file
    ///
    /// Fails with `Error::Extraction` when the file is missing or not a
    /// valid PDF, and `Error::EmptyDocument` when no chunk was produced.
    /// Individual image failures are logged and skipped.
    pub async fn extract(&self, path: &Path) -> Result<Vec<Chunk>> {
        let display_path = path.display().to_string();

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::extraction(&display_path, e.to_string()))?;

        // PDF parsing is CPU-bound, keep it off the async runtime
        let parse_path = display_path.clone();
        let pages = tokio::task::spawn_blocking(move || parse_pdf(&parse_path, &data))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))??;

        tracing::info!("Processing PDF {} ({} pages)", display_path, pages.len());

        let mut chunks = Vec::new();

        for page in &pages {
            let text_chunks = self.chunk_page_text(page);
            tracing::debug!(
                "Page {}: {} text chunks, {} images",
                page.page_number,
                text_chunks.len(),
                page.images.len()
            );
            chunks.extend(text_chunks);
            chunks.extend(self.chunk_page_images(page).await);
        }

        if chunks.is_empty() {
            return Err(Error::EmptyDocument(display_path));
        }

        tracing::info!("Extracted {} chunks from {}", chunks.len(), display_path);
        Ok(chunks)
    }

    /// Split one page's text into tagged chunks
    fn chunk_page_text(&self, page: &PageContent) -> Vec<Chunk> {
        self.splitter
            .split(&page.text)
            .into_iter()
            .map(|content| Chunk::new(content, ChunkMetadata::text(page.page_number)))
            .collect()
    }

    /// Describe and chunk one page's images
    ///
    /// A failed description degrades to the fixed placeholder; nothing on
    /// this path aborts the page or the document.
    async fn chunk_page_images(&self, page: &PageContent) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for (image_index, image) in page.images.iter().enumerate() {
            let description = match self.vision.describe_image(image).await {
                Ok(description) => {
                    tracing::debug!(
                        "Described image {} on page {} ({} chars)",
                        image_index,
                        page.page_number,
                        description.len()
                    );
                    description
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to describe image {} on page {}: {}",
                        image_index,
                        page.page_number,
                        e
                    );
                    IMAGE_PLACEHOLDER.to_string()
                }
            };

            let full_description =
                format!("[Image from page {}]: {}", page.page_number, description);

            let metadata = ChunkMetadata::image(page.page_number, image_index as u32);
            chunks.extend(
                self.splitter
                    .split(&full_description)
                    .into_iter()
                    .map(|content| Chunk::new(content, metadata.clone())),
            );
        }

        chunks
    }
}

/// Parse a PDF into per-page text and decoded images
fn parse_pdf(path: &str, data: &[u8]) -> Result<Vec<PageContent>> {
    let doc = Document::load_mem(data)
        .map_err(|e| Error::extraction(path, format!("Not a valid PDF: {}", e)))?;

    let page_ids: Vec<_> = doc.get_pages().into_iter().collect();
    let total_pages = page_ids.len();

    // Per-page text via pdf-extract, falling back to lopdf's extractor
    let page_texts = match pdf_extract::extract_text_from_mem_by_pages(data) {
        Ok(texts) => texts,
        Err(e) => {
            tracing::warn!("pdf-extract failed for {}: {}, using lopdf fallback", path, e);
            page_ids
                .iter()
                .map(|(page_number, _)| doc.extract_text(&[*page_number]).unwrap_or_default())
                .collect()
        }
    };

    let mut pages = Vec::with_capacity(total_pages);

    for (i, (page_number, page_id)) in page_ids.into_iter().enumerate() {
        let text = page_texts.get(i).cloned().unwrap_or_default();

        let images = match doc.get_page_images(page_id) {
            Ok(page_images) => page_images
                .iter()
                .filter_map(|img| decode_pdf_image(img, page_number))
                .collect(),
            Err(e) => {
                tracing::debug!("Failed to list images on page {}: {}", page_number, e);
                Vec::new()
            }
        };

        pages.push(PageContent {
            page_number,
            text,
            images,
        });
    }

    Ok(pages)
}

/// Decode one embedded PDF image to bytes a vision model accepts
///
/// JPEG streams pass through; FlateDecode raster data is re-encoded as
/// PNG. Unsupported filters and tiny images are skipped.
fn decode_pdf_image(pdf_image: &lopdf::xobject::PdfImage, page_number: u32) -> Option<Vec<u8>> {
    if pdf_image.width < MIN_IMAGE_DIMENSION || pdf_image.height < MIN_IMAGE_DIMENSION {
        tracing::debug!(
            "Skipping small image on page {}: {}x{}",
            page_number,
            pdf_image.width,
            pdf_image.height
        );
        return None;
    }

    let filters = pdf_image.filters.as_ref()?;

    if filters.iter().any(|f| f == "DCTDecode") {
        return Some(pdf_image.content.to_vec());
    }

    if filters.iter().any(|f| f == "FlateDecode") {
        return match decode_flate_image(pdf_image) {
            Ok(png) => Some(png),
            Err(e) => {
                tracing::debug!("Failed to decode image on page {}: {}", page_number, e);
                None
            }
        };
    }

    tracing::debug!(
        "Unsupported image filter on page {}: {:?}",
        page_number,
        filters
    );
    None
}

/// Decompress FlateDecode raster data and encode as PNG
fn decode_flate_image(pdf_image: &lopdf::xobject::PdfImage) -> std::result::Result<Vec<u8>, String> {
    let mut decoder = ZlibDecoder::new(pdf_image.content);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| format!("decompression failed: {}", e))?;

    let width = pdf_image.width as u32;
    let height = pdf_image.height as u32;
    let color_space = pdf_image.color_space.as_deref().unwrap_or("DeviceRGB");

    let img = match color_space {
        "DeviceGray" | "Gray" => image::GrayImage::from_raw(width, height, decompressed)
            .map(image::DynamicImage::ImageLuma8),
        _ => image::RgbImage::from_raw(width, height, decompressed)
            .map(image::DynamicImage::ImageRgb8),
    }
    .ok_or_else(|| format!("raw data does not match {}x{} {}", width, height, color_space))?;

    let mut png_data = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut png_data),
        image::ImageFormat::Png,
    )
    .map_err(|e| format!("PNG encoding failed: {}", e))?;

    Ok(png_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkingConfig;
    use crate::types::ChunkKind;
    use async_trait::async_trait;

    struct FixedVision;

    #[async_trait]
    impl VisionProvider for FixedVision {
        async fn describe_image(&self, _image: &[u8]) -> Result<String> {
            Ok("a revenue chart trending upward".to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingVision;

    #[async_trait]
    impl VisionProvider for FailingVision {
        async fn describe_image(&self, _image: &[u8]) -> Result<String> {
            Err(Error::llm("vision model offline"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn extractor(vision: Arc<dyn VisionProvider>) -> ChunkExtractor {
        ChunkExtractor::new(&ChunkingConfig::default(), vision)
    }

    /// One-page PDF whose only content is a JPEG image XObject
    fn write_image_pdf(path: &Path, width: i64, height: i64) {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document as PdfDocument, Object, Stream};

        let mut doc = PdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut jpeg_bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
        jpeg_bytes.extend(std::iter::repeat(0xAB).take(256));
        jpeg_bytes.extend([0xFF, 0xD9]);

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg_bytes,
        ));
        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! { "Im1" => image_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        0.into(),
                        0.into(),
                        height.into(),
                        50.into(),
                        600.into(),
                    ],
                ),
                Operation::new("Do", vec!["Im1".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id =
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[tokio::test]
    async fn embedded_image_becomes_image_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("chart.pdf");
        write_image_pdf(&file, 120, 80);

        let chunks = extractor(Arc::new(FixedVision))
            .extract(&file)
            .await
            .unwrap();

        let image_chunks: Vec<_> = chunks
            .iter()
            .filter(|c| c.metadata.kind == ChunkKind::Image)
            .collect();
        assert_eq!(image_chunks.len(), 1);

        let chunk = image_chunks[0];
        assert_eq!(chunk.metadata.page, 1);
        assert_eq!(chunk.metadata.image_index, Some(0));
        assert_eq!(chunk.metadata.source, "pdf_image");
        assert_eq!(
            chunk.content,
            "[Image from page 1]: a revenue chart trending upward"
        );
    }

    #[tokio::test]
    async fn vision_failure_degrades_to_placeholder_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("chart.pdf");
        write_image_pdf(&file, 120, 80);

        let chunks = extractor(Arc::new(FailingVision))
            .extract(&file)
            .await
            .unwrap();

        let image_chunks: Vec<_> = chunks
            .iter()
            .filter(|c| c.metadata.kind == ChunkKind::Image)
            .collect();
        assert_eq!(image_chunks.len(), 1);
        assert_eq!(
            image_chunks[0].content,
            format!("[Image from page 1]: {}", IMAGE_PLACEHOLDER)
        );
    }

    #[tokio::test]
    async fn tiny_images_are_skipped_entirely() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("icon.pdf");
        write_image_pdf(&file, 10, 10);

        // The only content is below the size threshold, so the document
        // yields nothing at all.
        let result = extractor(Arc::new(FixedVision)).extract(&file).await;
        assert!(matches!(result, Err(Error::EmptyDocument(_))));
    }
}

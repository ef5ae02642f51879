use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::layout::{paginate, PageLayout};
use crate::config::PdfConfig;
use crate::title::FALLBACK_TITLE;

const LAYER_NAME: &str = "Text";

/// MIME type of rendered documents.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF rendering failed: {0}")]
    Backend(String),
}

/// Renders plain text into a paginated PDF.
///
/// Uses the built-in Courier font, so output embeds no font data and only
/// printable ASCII is drawn; see [`super::layout::to_printable`].
pub struct PdfRenderer {
    layout: PageLayout,
    document_title: String,
}

impl PdfRenderer {
    pub fn new(config: &PdfConfig) -> Self {
        Self {
            layout: PageLayout::from(config),
            document_title: FALLBACK_TITLE.to_string(),
        }
    }

    /// Set the title stored in the document metadata
    pub fn with_title(mut self, title: &str) -> Self {
        self.document_title = title.to_string();
        self
    }

    /// Render `text` into PDF bytes. Empty text yields a single blank page.
    pub fn render(&self, text: &str) -> Result<Vec<u8>, RenderError> {
        let pages = paginate(text, &self.layout);
        let width = Mm(self.layout.page_width_mm);
        let height = Mm(self.layout.page_height_mm);

        tracing::debug!(
            "Rendering {} bytes of text onto {} page(s)",
            text.len(),
            pages.len()
        );

        let (doc, first_page, first_layer) =
            PdfDocument::new(self.document_title.clone(), width, height, LAYER_NAME);

        let font = doc
            .add_builtin_font(BuiltinFont::Courier)
            .map_err(|e| RenderError::Backend(e.to_string()))?;

        for (index, rows) in pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(width, height, LAYER_NAME)
            };
            let layer = doc.get_page(page).get_layer(layer);

            for (row, text) in rows.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                layer.use_text(
                    text.as_str(),
                    self.layout.font_size_pt,
                    Mm(self.layout.text_x_mm()),
                    Mm(self.layout.baseline_mm(row)),
                    &font,
                );
            }
        }

        doc.save_to_bytes()
            .map_err(|e| RenderError::Backend(e.to_string()))
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new(&PdfConfig::default())
    }
}

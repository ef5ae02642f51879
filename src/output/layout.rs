//! Text layout for fixed-width PDF pages.
//!
//! Rendering uses the built-in Courier font, so every glyph has the same
//! advance and wrapping can be done by character count.

use deunicode::deunicode_with_tofu;

use crate::config::PdfConfig;

/// Courier advance width as a fraction of the font size.
const COURIER_ADVANCE: f32 = 0.6;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Horizontal padding inside the text area, on each side.
pub const CELL_PADDING_MM: f32 = 1.0;

/// Page geometry in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub bottom_margin_mm: f32,
    pub font_size_pt: f32,
    pub line_height_mm: f32,
}

impl From<&PdfConfig> for PageLayout {
    fn from(config: &PdfConfig) -> Self {
        Self {
            page_width_mm: config.page_width_mm,
            page_height_mm: config.page_height_mm,
            margin_mm: config.margin_mm,
            bottom_margin_mm: config.bottom_margin_mm,
            font_size_pt: config.font_size_pt,
            line_height_mm: config.line_height_mm,
        }
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::from(&PdfConfig::default())
    }
}

impl PageLayout {
    /// Characters that fit on one row.
    pub fn chars_per_row(&self) -> usize {
        let char_width = self.font_size_pt * COURIER_ADVANCE * MM_PER_PT;
        let usable = self.page_width_mm - 2.0 * self.margin_mm - 2.0 * CELL_PADDING_MM;
        ((usable / char_width).floor() as usize).max(1)
    }

    /// Rows that fit above the bottom margin.
    pub fn rows_per_page(&self) -> usize {
        let usable = self.page_height_mm - self.margin_mm - self.bottom_margin_mm;
        ((usable / self.line_height_mm).floor() as usize).max(1)
    }

    /// Left edge of the text, in PDF coordinates.
    pub fn text_x_mm(&self) -> f32 {
        self.margin_mm + CELL_PADDING_MM
    }

    /// Baseline of row `row` (0-based), in PDF coordinates (origin bottom-left).
    ///
    /// Text sits vertically centred in its row.
    pub fn baseline_mm(&self, row: usize) -> f32 {
        let row_top = self.margin_mm + row as f32 * self.line_height_mm;
        let from_top = row_top + self.line_height_mm / 2.0 + 0.3 * self.font_size_pt * MM_PER_PT;
        self.page_height_mm - from_top
    }
}

/// Reduce a line to printable ASCII, the only range the built-in fonts cover.
///
/// Non-ASCII characters are transliterated; those without a transliteration
/// are dropped. Tabs become four spaces.
pub fn to_printable(line: &str) -> String {
    deunicode_with_tofu(line, "")
        .replace('\t', "    ")
        .chars()
        .filter(|c| (' '..='~').contains(c))
        .collect()
}

/// Word-wrap one line to `width` characters, hard-breaking longer words.
///
/// An empty line yields a single empty row.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();

    for word in line.split(' ') {
        let mut word = word;

        loop {
            let word_len = word.chars().count();
            let current_len = current.chars().count();
            let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
            if needed <= width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                break;
            }

            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                continue;
            }

            // Word alone is wider than a row
            let split = word.char_indices().nth(width).map_or(word.len(), |(i, _)| i);
            let (head, tail) = word.split_at(split);
            rows.push(head.to_string());
            word = tail;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }

    rows.into_iter().map(|row| row.trim_end().to_string()).collect()
}

/// Lay text out into pages of rows.
///
/// Lines are split on `\n` (a trailing `\r` is dropped), made printable and
/// wrapped. The result always holds at least one page.
pub fn paginate(text: &str, layout: &PageLayout) -> Vec<Vec<String>> {
    let width = layout.chars_per_row();
    let per_page = layout.rows_per_page();

    let rows: Vec<String> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .flat_map(|line| wrap_line(&to_printable(line), width))
        .collect();

    let mut pages: Vec<Vec<String>> = rows.chunks(per_page).map(|chunk| chunk.to_vec()).collect();
    if pages.is_empty() {
        pages.push(Vec::new());
    }
    pages
}

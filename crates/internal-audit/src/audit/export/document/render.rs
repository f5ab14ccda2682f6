use super::fonts::{FontChain, FontTier};
use super::{layout, Block, DocumentLayout, ItemBlock, SummaryTable, TextStyle};
use crate::audit::export::ExportError;
use crate::audit::report::AuditReport;
use printpdf::path::PaintMode;
use printpdf::{
    Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point,
    Rect, Rgb,
};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const PT_TO_MM: f32 = 0.3528;
const ITEM_INDENT: f32 = 4.0;
const ROW_HEIGHT: f32 = 8.0;
const COLUMN_WIDTHS: [f32; 2] = [100.0, 70.0];

#[derive(Debug)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub font: FontTier,
    pub pages: usize,
    pub layout: DocumentLayout,
}

/// Lays out the report and paints it onto A4 pages with the first font the
/// chain can load.
pub fn render(report: &AuditReport, fonts: &FontChain) -> Result<RenderedDocument, ExportError> {
    let layout = layout(report);
    let (doc, page, layer) = PdfDocument::new(
        layout.title.as_str(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "page 1",
    );
    let loaded = fonts.resolve(&doc)?;

    let pages = {
        let first = doc.get_page(page).get_layer(layer);
        let mut writer = PageWriter::new(&doc, first, loaded.font);
        for block in &layout.blocks {
            writer.block(block);
        }
        writer.pages
    };

    let bytes = doc
        .save_to_bytes()
        .map_err(|err| ExportError::Pdf(err.to_string()))?;

    Ok(RenderedDocument {
        bytes,
        font: loaded.tier,
        pages,
        layout,
    })
}

fn font_size(style: TextStyle) -> f32 {
    match style {
        TextStyle::Title => 18.0,
        TextStyle::Heading => 13.0,
        TextStyle::Body => 10.5,
    }
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.5
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn white() -> Color {
    Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None))
}

fn header_fill() -> Color {
    Color::Rgb(Rgb::new(0.18, 0.27, 0.38, None))
}

fn rule_grey() -> Color {
    Color::Rgb(Rgb::new(0.7, 0.7, 0.7, None))
}

fn is_wide(ch: char) -> bool {
    matches!(ch,
        '\u{1100}'..='\u{115F}'
        | '\u{2E80}'..='\u{A4CF}'
        | '\u{AC00}'..='\u{D7A3}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FE30}'..='\u{FE4F}'
        | '\u{FF00}'..='\u{FF60}'
        | '\u{FFE0}'..='\u{FFE6}')
}

fn glyph_width(ch: char, size: f32) -> f32 {
    let em = size * PT_TO_MM;
    if is_wide(ch) {
        em
    } else {
        em * 0.55
    }
}

/// Breaks text into lines that fit `max_width`, keeping explicit line breaks.
fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut width = 0.0;
        for ch in paragraph.trim_end_matches('\r').chars() {
            let advance = glyph_width(ch, size);
            if width + advance > max_width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            }
            line.push(ch);
            width += advance;
        }
        lines.push(line);
    }

    lines
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    cursor: f32,
    pages: usize,
}

impl<'a> PageWriter<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: PdfLayerReference, font: IndirectFontRef) -> Self {
        Self {
            doc,
            layer,
            font,
            cursor: PAGE_HEIGHT - MARGIN,
            pages: 1,
        }
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    /// Starts a new page unless `height` fits below the cursor. A block taller
    /// than a page is left to break line by line.
    fn reserve(&mut self, height: f32) {
        let at_top = self.cursor >= PAGE_HEIGHT - MARGIN;
        if self.cursor - height < MARGIN && !at_top {
            self.new_page();
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Text { style, text } => self.text(*style, text),
            Block::Item(item) => self.item(item),
            Block::Spacer(gap) => self.cursor -= f32::from(*gap),
            Block::Table(table) => self.table(table),
        }
    }

    fn text(&mut self, style: TextStyle, text: &str) {
        let size = font_size(style);
        let lines = wrap_text(text, size, CONTENT_WIDTH);
        let mut needed = lines.len() as f32 * line_height(size);
        if style == TextStyle::Heading {
            // keep a heading on the same page as the first block beneath it
            needed += 4.0 * line_height(font_size(TextStyle::Body));
        }
        self.reserve(needed);
        self.write_lines(&lines, size, 0.0);
    }

    fn item(&mut self, item: &ItemBlock) {
        let size = font_size(TextStyle::Body);
        let lines: Vec<String> = item
            .lines()
            .iter()
            .flat_map(|line| wrap_text(line, size, CONTENT_WIDTH - ITEM_INDENT))
            .collect();

        self.reserve(lines.len() as f32 * line_height(size) + 4.0);
        self.write_lines(&lines, size, ITEM_INDENT);

        self.cursor -= 1.5;
        self.layer.set_outline_color(rule_grey());
        self.layer.set_outline_thickness(0.3);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(self.cursor)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(self.cursor)), false),
            ],
            is_closed: false,
        });
        self.cursor -= 2.5;
    }

    fn table(&mut self, table: &SummaryTable) {
        let size = font_size(TextStyle::Body);
        self.reserve(table.row_count() as f32 * ROW_HEIGHT);
        self.layer.set_outline_color(black());
        self.layer.set_outline_thickness(0.5);

        for (index, row) in table.cells().iter().enumerate() {
            let header = index == 0;
            let top = self.cursor;
            let bottom = top - ROW_HEIGHT;
            let mut left = MARGIN;

            for (cell, width) in row.iter().zip(COLUMN_WIDTHS) {
                let rect = Rect::new(Mm(left), Mm(bottom), Mm(left + width), Mm(top));
                if header {
                    self.layer.set_fill_color(header_fill());
                    self.layer.add_rect(rect.with_mode(PaintMode::FillStroke));
                    self.layer.set_fill_color(white());
                } else {
                    self.layer.add_rect(rect.with_mode(PaintMode::Stroke));
                    self.layer.set_fill_color(black());
                }
                self.layer.use_text(
                    *cell,
                    size,
                    Mm(left + 2.0),
                    Mm(bottom + 2.5),
                    &self.font,
                );
                left += width;
            }

            self.cursor = bottom;
        }

        self.layer.set_fill_color(black());
    }

    fn write_lines(&mut self, lines: &[String], size: f32, indent: f32) {
        let height = line_height(size);
        for line in lines {
            if self.cursor - height < MARGIN {
                self.new_page();
            }
            let baseline = self.cursor - size * PT_TO_MM;
            self.layer.use_text(
                line.as_str(),
                size,
                Mm(MARGIN + indent),
                Mm(baseline),
                &self.font,
            );
            self.cursor -= height;
        }
    }
}

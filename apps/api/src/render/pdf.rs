//! PDF rendering of a `Resume` with printpdf.
//!
//! Lays the record out directly on A4 pages. By default the built-in
//! Helvetica faces are used, which only cover WinAnsi (Latin-1 plus the
//! typographic punctuation); a TrueType font loaded with `PdfFont::load`
//! covers whatever scripts that font has. Text is wrapped by an average
//! glyph width, which is close enough for proportional sans faces.

use std::path::Path;
use std::sync::Arc;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};

use tracing::warn;

use crate::render::{AccentColor, RenderError};
use crate::resume::models::Resume;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica advance width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.52;
const LINE_SPACING: f32 = 1.35;

const NAME_PT: f32 = 22.0;
const HEADING_PT: f32 = 12.5;
const ENTRY_PT: f32 = 11.0;
const BODY_PT: f32 = 10.0;
const BULLET_INDENT_MM: f32 = 5.0;

/// A TrueType font embedded in every generated PDF in place of Helvetica.
#[derive(Clone)]
pub struct PdfFont {
    bytes: Arc<Vec<u8>>,
}

impl PdfFont {
    /// Reads a `.ttf` file and checks that printpdf can embed it.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path)
            .map_err(|e| RenderError::Pdf(format!("reading font {}: {e}", path.display())))?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, RenderError> {
        PdfDocument::empty("font check")
            .add_external_font(bytes.as_slice())
            .map_err(|e| RenderError::Pdf(format!("unusable font: {e:?}")))?;
        Ok(Self {
            bytes: Arc::new(bytes),
        })
    }
}

/// Renders the resume to PDF bytes, with `font` embedded when given.
///
/// printpdf documents are not `Send`; async callers run this inside
/// `tokio::task::spawn_blocking`.
pub fn render_pdf(
    resume: &Resume,
    accent: &AccentColor,
    font: Option<&PdfFont>,
) -> Result<Vec<u8>, RenderError> {
    write_resume(resume, accent, font).map(|(bytes, _pages)| bytes)
}

fn write_resume(
    resume: &Resume,
    accent: &AccentColor,
    font: Option<&PdfFont>,
) -> Result<(Vec<u8>, usize), RenderError> {
    let title = if resume.name.is_empty() {
        "Resume".to_string()
    } else {
        format!("{} - Resume", resume.name)
    };
    let mut w = PdfWriter::new(&title, accent, font)?;

    w.text(&resume.name, NAME_PT, Style::AccentBold, 0.0);
    if !resume.email.is_empty() {
        w.text(&resume.email, BODY_PT, Style::Muted, 0.0);
    }
    w.gap(2.0);

    w.section("Profile");
    w.paragraph(&resume.profile_summary, BODY_PT, Style::Body, 0.0);

    if !resume.experience.is_empty() {
        w.section("Experience");
        for job in &resume.experience {
            w.keep_with_next(ENTRY_PT, 3);
            w.paragraph(&job.heading(), ENTRY_PT, Style::Bold, 0.0);
            if !job.duration.is_empty() {
                w.text(&job.duration, BODY_PT - 0.5, Style::Muted, 0.0);
            }
            for detail in &job.details {
                w.bullet(detail);
            }
            w.gap(1.5);
        }
    }

    if !resume.projects.is_empty() {
        w.section("Projects");
        for project in &resume.projects {
            w.keep_with_next(ENTRY_PT, 2);
            w.paragraph(&project.name, ENTRY_PT, Style::Bold, 0.0);
            for detail in &project.details {
                w.bullet(detail);
            }
            w.gap(1.5);
        }
    }

    if !resume.education.is_empty() {
        w.section("Education");
        for edu in &resume.education {
            w.paragraph(&edu.summary_line(), BODY_PT, Style::Body, 0.0);
        }
    }

    if !resume.skills.is_empty() {
        w.section("Skills");
        w.paragraph(&resume.skills.join(", "), BODY_PT, Style::Body, 0.0);
    }

    w.finish()
}

#[derive(Debug, Clone, Copy)]
enum Style {
    Body,
    Bold,
    Muted,
    AccentBold,
}

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// False while the built-in fonts are in use, whose text is WinAnsi only.
    unicode: bool,
    /// Characters the built-in fonts could not encode.
    replaced: usize,
    accent: (f32, f32, f32),
    /// Baseline of the next line, measured from the bottom edge.
    y: f32,
    pages: usize,
}

impl PdfWriter {
    fn new(title: &str, accent: &AccentColor, font: Option<&PdfFont>) -> Result<Self, RenderError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Page 1");

        let (regular, bold) = match font {
            // One face for both weights; headings stand out by size and colour.
            Some(font) => {
                let face = doc
                    .add_external_font(font.bytes.as_slice())
                    .map_err(|e| RenderError::Pdf(format!("embedding font: {e:?}")))?;
                (face.clone(), face)
            }
            None => (
                doc.add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(|e| RenderError::Pdf(format!("loading Helvetica: {e:?}")))?,
                doc.add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(|e| RenderError::Pdf(format!("loading Helvetica-Bold: {e:?}")))?,
            ),
        };
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            unicode: font.is_some(),
            replaced: 0,
            accent: accent.rgb(),
            y: PAGE_HEIGHT_MM - MARGIN_MM,
            pages: 1,
        })
    }

    fn finish(self) -> Result<(Vec<u8>, usize), RenderError> {
        if self.replaced > 0 {
            warn!(
                "{} characters have no glyph in the built-in PDF fonts; set PDF_FONT_PATH to a Unicode TTF",
                self.replaced
            );
        }
        let pages = self.pages;
        let bytes = self
            .doc
            .save_to_bytes()
            .map_err(|e| RenderError::Pdf(format!("serialising document: {e:?}")))?;
        Ok((bytes, pages))
    }

    fn color(&self, style: Style) -> Color {
        let (r, g, b) = match style {
            Style::Body | Style::Bold => (0.1, 0.1, 0.1),
            Style::Muted => (0.4, 0.4, 0.4),
            Style::AccentBold => self.accent,
        };
        Color::Rgb(Rgb::new(r, g, b, None))
    }

    fn font(&self, style: Style) -> &IndirectFontRef {
        match style {
            Style::Bold | Style::AccentBold => &self.bold,
            Style::Body | Style::Muted => &self.regular,
        }
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN_MM {
            self.new_page();
        }
    }

    /// Starts a new page now if the next `lines` lines would not fit.
    fn keep_with_next(&mut self, size_pt: f32, lines: usize) {
        self.ensure_space(line_height(size_pt) * lines as f32);
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    /// Writes a single line without wrapping.
    fn text(&mut self, text: &str, size_pt: f32, style: Style, indent_mm: f32) {
        let height = line_height(size_pt);
        self.ensure_space(height);
        self.y -= height;
        let text = if self.unicode {
            printable(text)
        } else {
            let (text, replaced) = win_ansi(text);
            self.replaced += replaced;
            text
        };
        self.layer.set_fill_color(self.color(style));
        self.layer.use_text(
            text,
            size_pt,
            Mm(MARGIN_MM + indent_mm),
            Mm(self.y),
            self.font(style),
        );
    }

    fn paragraph(&mut self, text: &str, size_pt: f32, style: Style, indent_mm: f32) {
        let width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM - indent_mm;
        for line in wrap_text(text, chars_per_line(width, size_pt)) {
            self.text(&line, size_pt, style, indent_mm);
        }
    }

    fn bullet(&mut self, text: &str) {
        let width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM - BULLET_INDENT_MM;
        for (i, line) in wrap_text(text, chars_per_line(width, BODY_PT))
            .into_iter()
            .enumerate()
        {
            if i == 0 {
                let height = line_height(BODY_PT);
                self.ensure_space(height);
                self.layer.set_fill_color(self.color(Style::Body));
                self.layer.use_text(
                    "-",
                    BODY_PT,
                    Mm(MARGIN_MM + 1.5),
                    Mm(self.y - height),
                    &self.regular,
                );
            }
            self.text(&line, BODY_PT, Style::Body, BULLET_INDENT_MM);
        }
    }

    /// Accent-coloured heading with a rule underneath.
    fn section(&mut self, title: &str) {
        self.gap(3.0);
        self.keep_with_next(HEADING_PT, 3);
        self.text(&title.to_uppercase(), HEADING_PT, Style::AccentBold, 0.0);

        let rule_y = self.y - 1.5;
        let (r, g, b) = self.accent;
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(r, g, b, None)));
        self.layer.set_outline_thickness(0.7);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_MM), Mm(rule_y)), false),
                (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), Mm(rule_y)), false),
            ],
            is_closed: false,
        });
        self.y = rule_y - 1.0;
    }
}

fn line_height(size_pt: f32) -> f32 {
    size_pt * PT_TO_MM * LINE_SPACING
}

fn chars_per_line(width_mm: f32, size_pt: f32) -> usize {
    ((width_mm / (size_pt * PT_TO_MM * AVG_GLYPH_EM)).floor() as usize).max(10)
}

/// Greedy word wrap. Words longer than a line are split hard.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Characters outside Latin-1 that WinAnsiEncoding still has (0x80-0x9F).
const WIN_ANSI_EXTRA: &str = "\u{20AC}\u{201A}\u{0192}\u{201E}\u{2026}\u{2020}\u{2021}\u{02C6}\u{2030}\
    \u{0160}\u{2039}\u{0152}\u{017D}\u{2018}\u{2019}\u{201C}\u{201D}\u{2022}\u{2013}\u{2014}\
    \u{02DC}\u{2122}\u{0161}\u{203A}\u{0153}\u{017E}\u{0178}";

/// Keeps every character the built-in fonts can encode and replaces the rest
/// with `?`. Returns the text and the number of replacements.
fn win_ansi(text: &str) -> (String, usize) {
    let mut replaced = 0;
    let out: String = printable(text)
        .chars()
        .map(|c| {
            if (' '..='~').contains(&c)
                || ('\u{A0}'..='\u{FF}').contains(&c)
                || WIN_ANSI_EXTRA.contains(c)
            {
                c
            } else {
                replaced += 1;
                '?'
            }
        })
        .collect();
    (out, replaced)
}

/// Tabs and other control characters become spaces.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

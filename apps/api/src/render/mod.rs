// Resume rendering: askama HTML templates for the preview and a printpdf
// writer for the download. Both read the same repaired `Resume`.

pub mod html;
pub mod pdf;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use html::render_html;
pub use pdf::{render_pdf, PdfFont};

pub const DEFAULT_ACCENT: &str = "#1f4e79";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Invalid accent colour '{0}': expected a hex colour like #1f4e79")]
    InvalidAccent(String),
}

/// The HTML layouts a user can pick from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateChoice {
    #[default]
    Classic,
    Modern,
    Compact,
}

impl TemplateChoice {
    pub const ALL: [TemplateChoice; 3] = [
        TemplateChoice::Classic,
        TemplateChoice::Modern,
        TemplateChoice::Compact,
    ];

    /// Value used in form fields and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateChoice::Classic => "classic",
            TemplateChoice::Modern => "modern",
            TemplateChoice::Compact => "compact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TemplateChoice::Classic => "Classic (single column, serif)",
            TemplateChoice::Modern => "Modern (sidebar, sans-serif)",
            TemplateChoice::Compact => "Compact (dense, one page)",
        }
    }
}

/// A validated `#rrggbb` colour. Only hex is accepted so the value can be
/// dropped into CSS without further escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccentColor(String);

impl AccentColor {
    pub fn parse(raw: &str) -> Result<Self, RenderError> {
        let trimmed = raw.trim();
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| RenderError::InvalidAccent(trimmed.to_string()))?;

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RenderError::InvalidAccent(trimmed.to_string()));
        }

        Ok(Self(format!("#{}", hex.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Channels scaled to 0.0 – 1.0, as printpdf expects.
    pub fn rgb(&self) -> (f32, f32, f32) {
        let channel = |i: usize| {
            u8::from_str_radix(&self.0[i..i + 2], 16).map_or(0.0, |v| f32::from(v) / 255.0)
        };
        (channel(1), channel(3), channel(5))
    }
}

impl Default for AccentColor {
    fn default() -> Self {
        Self(DEFAULT_ACCENT.to_string())
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

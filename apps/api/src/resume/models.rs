use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::render::{AccentColor, TemplateChoice, DEFAULT_ACCENT};

// ────────────────────────────────────────────────────────────────────────────
// Resume record
// ────────────────────────────────────────────────────────────────────────────

/// The structured resume produced per submission.
///
/// Built only through `repair::repair`, so every field is present and every
/// sequence has the right member type by the time a template sees it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub name: String,
    pub email: String,
    pub profile_summary: String,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub experience: Vec<Experience>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub details: Vec<String>,
}

impl Education {
    /// One-line rendering used by the PDF writer: "degree, institution (year)".
    pub fn summary_line(&self) -> String {
        let mut line = self.degree.clone();
        if !self.institution.is_empty() {
            if !line.is_empty() {
                line.push_str(", ");
            }
            line.push_str(&self.institution);
        }
        if !self.year.is_empty() {
            line.push_str(&format!(" ({})", self.year));
        }
        line
    }
}

impl Experience {
    /// "title at company", tolerating either part being blank.
    pub fn heading(&self) -> String {
        match (self.title.is_empty(), self.company.is_empty()) {
            (false, false) => format!("{} at {}", self.title, self.company),
            (false, true) => self.title.clone(),
            (true, false) => self.company.clone(),
            (true, true) => String::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Form submission
// ────────────────────────────────────────────────────────────────────────────

/// Everything the user types into the form. Free text throughout; the model
/// turns it into a `Resume`.
///
/// Absent fields deserialize as blank so `validate` can name every missing
/// one in a single message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRequest {
    pub target_role: String,
    pub name: String,
    pub email: String,
    pub education: String,
    pub skills: String,
    pub projects: String,
    pub experience: String,
    pub template: TemplateChoice,
    pub accent_color: String,
}

fn default_accent() -> String {
    DEFAULT_ACCENT.to_string()
}

impl Default for ResumeRequest {
    fn default() -> Self {
        Self {
            target_role: String::new(),
            name: String::new(),
            email: String::new(),
            education: String::new(),
            skills: String::new(),
            projects: String::new(),
            experience: String::new(),
            template: TemplateChoice::default(),
            accent_color: default_accent(),
        }
    }
}

impl ResumeRequest {
    /// Rejects blank required fields and returns the parsed accent colour.
    pub fn validate(&self) -> Result<AccentColor, AppError> {
        let required = [
            ("target_role", &self.target_role),
            ("name", &self.name),
            ("email", &self.email),
            ("education", &self.education),
            ("skills", &self.skills),
            ("projects", &self.projects),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Please fill in: {}",
                missing.join(", ")
            )));
        }

        AccentColor::parse(&self.accent_color).map_err(|e| AppError::Validation(e.to_string()))
    }

    pub fn has_experience(&self) -> bool {
        !self.experience.trim().is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline output
// ────────────────────────────────────────────────────────────────────────────

/// A finished submission: the repaired record plus both renderings.
#[derive(Debug, Clone)]
pub struct GeneratedResume {
    pub resume: Resume,
    pub html: String,
    pub pdf: Vec<u8>,
    pub filename: String,
    pub template: TemplateChoice,
    pub accent: AccentColor,
}

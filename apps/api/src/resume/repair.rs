//! Shape repair: turns loosely-structured model JSON into a `Resume`.
//!
//! This is the one place model output is trusted as dynamic JSON. Everything
//! downstream works with the typed record, so rendering cannot fail on a
//! missing key or a wrong member type.

use serde_json::{Map, Value};
use tracing::debug;

use crate::resume::models::{Education, Experience, Project, Resume};

pub const FILLER_SUMMARY: &str = "Motivated professional with a strong foundation in the areas \
    listed below, eager to contribute and grow in a challenging role.";

/// Repairs a parsed model response into a well-formed `Resume`.
///
/// Never fails: anything unusable becomes an empty value or a default.
pub fn repair(value: Value) -> Resume {
    let obj = match value {
        Value::Object(map) => map,
        other => {
            debug!("Model JSON was not an object ({}), using defaults", kind(&other));
            Map::new()
        }
    };

    let profile_summary = text_field(&obj, "profile_summary")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FILLER_SUMMARY.to_string());

    Resume {
        name: text_field(&obj, "name").unwrap_or_default(),
        email: text_field(&obj, "email").unwrap_or_default(),
        profile_summary,
        education: array_field(&obj, "education")
            .iter()
            .filter_map(repair_education)
            .collect(),
        skills: array_field(&obj, "skills")
            .iter()
            .filter_map(scalar_text)
            .filter(|s| !s.is_empty())
            .collect(),
        projects: array_field(&obj, "projects")
            .iter()
            .filter_map(repair_project)
            .collect(),
        experience: array_field(&obj, "experience")
            .iter()
            .filter_map(repair_experience)
            .collect(),
    }
}

/// Splits "B.S. in X, University Y, 2020" into degree / institution / year.
///
/// One part is a degree, two are degree and institution. With three or more
/// the last part is the year and the middle parts form the institution.
pub fn split_education(text: &str) -> Education {
    let parts: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [] => Education::default(),
        [degree] => Education {
            degree: degree.to_string(),
            ..Education::default()
        },
        [degree, institution] => Education {
            degree: degree.to_string(),
            institution: institution.to_string(),
            year: String::new(),
        },
        [degree, middle @ .., year] => Education {
            degree: degree.to_string(),
            institution: middle.join(", "),
            year: year.to_string(),
        },
    }
}

fn repair_education(entry: &Value) -> Option<Education> {
    match entry {
        Value::String(s) => {
            let edu = split_education(s);
            (!edu.degree.is_empty()).then_some(edu)
        }
        Value::Object(map) => Some(Education {
            degree: text_field(map, "degree").unwrap_or_default(),
            institution: text_field(map, "institution").unwrap_or_default(),
            year: text_field(map, "year").unwrap_or_default(),
        }),
        _ => None,
    }
}

fn repair_project(entry: &Value) -> Option<Project> {
    match entry {
        Value::String(s) if !s.trim().is_empty() => Some(Project {
            name: s.trim().to_string(),
            details: Vec::new(),
        }),
        Value::Object(map) => Some(Project {
            name: text_field(map, "name").unwrap_or_default(),
            details: details_field(map),
        }),
        _ => None,
    }
}

fn repair_experience(entry: &Value) -> Option<Experience> {
    match entry {
        Value::String(s) if !s.trim().is_empty() => Some(Experience {
            title: s.trim().to_string(),
            ..Experience::default()
        }),
        Value::Object(map) => Some(Experience {
            title: text_field(map, "title").unwrap_or_default(),
            company: text_field(map, "company").unwrap_or_default(),
            duration: text_field(map, "duration").unwrap_or_default(),
            details: details_field(map),
        }),
        _ => None,
    }
}

/// `details` as a list of strings; a lone string becomes a one-item list.
fn details_field(map: &Map<String, Value>) -> Vec<String> {
    match map.get("details") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn array_field<'a>(map: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    match map.get(key) {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(scalar_text)
}

/// Strings are trimmed; numbers and booleans are stringified.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

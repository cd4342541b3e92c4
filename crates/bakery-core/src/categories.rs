use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub slug: String,
    /// Only the first image is used.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Category {
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Derives a URL-safe slug from a display name.
///
/// Lowercases, turns each whitespace run into `-`, then drops anything
/// outside `[a-z0-9-]`. `"Birthday Cakes!"` becomes `"birthday-cakes"`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let dashed = WHITESPACE_RUN.replace_all(&lowered, "-");
    NON_SLUG_CHARS.replace_all(&dashed, "").into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
    pub slug: String,
}

impl CategoryDraft {
    /// A draft whose slug is derived from `name`.
    #[must_use]
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            slug: slugify(name),
        }
    }

    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("slug", self.slug.clone()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
}

impl CategoryPatch {
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        [
            ("name", &self.name),
            ("description", &self.description),
            ("slug", &self.slug),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key, v.clone())))
        .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.slug.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_dashes_whitespace() {
        assert_eq!(slugify("Birthday Cakes"), "birthday-cakes");
    }

    #[test]
    fn slugify_collapses_whitespace_runs() {
        assert_eq!(slugify("Tea   Time\tTreats"), "tea-time-treats");
    }

    #[test]
    fn slugify_drops_punctuation() {
        assert_eq!(slugify("Mom's Pies & Tarts!"), "moms-pies--tarts");
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("Crème Brûlée"), "crme-brle");
    }

    #[test]
    fn draft_derives_slug() {
        let draft = CategoryDraft::new("Dry Cakes", "Tea-time cakes");
        assert_eq!(draft.slug, "dry-cakes");
        assert_eq!(draft.form_fields().len(), 3);
    }

    #[test]
    fn patch_skips_absent_fields() {
        let patch = CategoryPatch {
            description: Some("New".to_string()),
            ..CategoryPatch::default()
        };
        assert_eq!(patch.form_fields(), vec![("description", "New".to_string())]);
        assert!(!patch.is_empty());
        assert!(CategoryPatch::default().is_empty());
    }

    #[test]
    fn deserializes_backend_category() {
        let json = serde_json::json!({
            "_id": "c1",
            "name": "Cake",
            "description": "All cakes",
            "slug": "cake",
            "images": ["/uploads/cake.jpg"]
        });
        let c: Category = serde_json::from_value(json).unwrap();
        assert_eq!(c.id, "c1");
        assert_eq!(c.cover_image(), Some("/uploads/cake.jpg"));
    }
}

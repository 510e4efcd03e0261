//! Save-time validation.
//!
//! Errors block the save; warnings are reported but the page still saves.
//! Unknown block types are never an issue: they are written back untouched.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use munipage_render::ImagePolicy;
use munipage_types::{Block, BlockId, PageContent, non_empty};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One problem found on a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// Offending block, if the issue is block-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockId>,
    /// Field binding (as used by `data-field`), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// User-facing message.
    pub message: String,
}

impl Issue {
    fn error(block: Option<&BlockId>, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            block: block.cloned(),
            field: field.map(str::to_string),
            message: message.into(),
        }
    }

    fn warning(block: Option<&BlockId>, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(block, field, message)
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level}: {}", self.message)?;
        if let Some(block) = &self.block {
            write!(f, " (block {}", block.short())?;
            if let Some(field) = &self.field {
                write!(f, ", {field}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Whether any issue blocks a save.
pub fn has_blocking(issues: &[Issue]) -> bool {
    issues.iter().any(Issue::is_blocking)
}

/// Validate a whole page before saving.
pub fn validate_page(page: &PageContent, images: &ImagePolicy) -> Vec<Issue> {
    let mut issues = Vec::new();
    if !page.path.starts_with('/') {
        issues.push(Issue::error(
            None,
            None,
            format!("La ruta de la página debe empezar con \"/\": {:?}", page.path),
        ));
    }
    issues.extend(validate_blocks(&page.blocks, images));
    issues
}

/// Validate a block list.
pub fn validate_blocks(blocks: &[Block], images: &ImagePolicy) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for block in blocks {
        let id = block.id();
        if !seen.insert(id) {
            issues.push(Issue::error(
                Some(id),
                None,
                "Hay dos bloques con el mismo identificador",
            ));
        }
        check_block(block, images, &mut issues);
    }
    issues
}

fn check_image(
    issues: &mut Vec<Issue>,
    images: &ImagePolicy,
    id: &BlockId,
    field: &str,
    url: Option<&str>,
) {
    let Some(url) = non_empty(url) else {
        return;
    };
    if !images.is_allowed(Some(url)) {
        issues.push(Issue::warning(
            Some(id),
            Some(field),
            format!("La imagen {url:?} no es de un origen permitido y no se mostrará"),
        ));
    }
}

fn check_pair(
    issues: &mut Vec<Issue>,
    id: &BlockId,
    field: &str,
    label: Option<&str>,
    href: Option<&str>,
) {
    if non_empty(label).is_some() != non_empty(href).is_some() {
        issues.push(Issue::warning(
            Some(id),
            Some(field),
            "El botón necesita texto y enlace; no se mostrará",
        ));
    }
}

fn check_block(block: &Block, images: &ImagePolicy, issues: &mut Vec<Issue>) {
    let id = block.id();
    match block {
        Block::Hero(b) => {
            if non_empty(Some(b.title.as_str())).is_none() {
                issues.push(Issue::error(Some(id), Some("title"), "El bloque destacado necesita un título"));
            }
            check_pair(issues, id, "ctaLabel", b.cta_label.as_deref(), b.cta_href.as_deref());
            check_image(issues, images, id, "imageUrl", b.image_url.as_deref());
        }
        Block::Cta(b) => {
            if non_empty(Some(b.title.as_str())).is_none() {
                issues.push(Issue::error(Some(id), Some("title"), "La llamada a la acción necesita un título"));
            }
            check_pair(issues, id, "label", b.label.as_deref(), b.href.as_deref());
            check_image(issues, images, id, "imageUrl", b.image_url.as_deref());
        }
        Block::Gallery(b) => {
            for (i, img) in b.images.iter().enumerate() {
                check_image(issues, images, id, &format!("images.{i}.url"), Some(img.url.as_str()));
            }
        }
        Block::Carousel(b) => {
            for (i, img) in b.images.iter().enumerate() {
                check_image(issues, images, id, &format!("images.{i}.url"), Some(img.url.as_str()));
            }
        }
        Block::CardsGrid(b) => {
            let mut cards = HashSet::new();
            for (i, card) in b.cards.iter().enumerate() {
                if !cards.insert(&card.id) {
                    issues.push(Issue::error(
                        Some(id),
                        Some(format!("cards.{i}").as_str()),
                        "Hay dos tarjetas con el mismo identificador",
                    ));
                }
                check_image(issues, images, id, &format!("cards.{i}.imageUrl"), card.image_url.as_deref());
                for (j, url) in card.modal_images.iter().enumerate() {
                    check_image(
                        issues,
                        images,
                        id,
                        &format!("cards.{i}.modalImages.{j}"),
                        Some(url.as_str()),
                    );
                }
            }
        }
        Block::RichText(_) | Block::Spacer(_) | Block::Unknown(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(blocks: serde_json::Value) -> PageContent {
        serde_json::from_value(json!({"path": "/x", "title": "X", "blocks": blocks})).unwrap()
    }

    #[test]
    fn test_clean_page() {
        let p = page(json!([
            {"id": "h", "type": "hero", "title": "Hola", "ctaLabel": "Ir", "ctaHref": "/ir"},
            {"id": "r", "type": "richText", "html": ""},
            {"id": "m", "type": "map"}
        ]));
        assert!(validate_page(&p, &ImagePolicy::default()).is_empty());
    }

    #[test]
    fn test_missing_titles_block() {
        let p = page(json!([
            {"id": "h", "type": "hero", "title": "  "},
            {"id": "c", "type": "cta"}
        ]));
        let issues = validate_page(&p, &ImagePolicy::default());
        assert_eq!(issues.len(), 2);
        assert!(has_blocking(&issues));
        assert_eq!(issues[0].field.as_deref(), Some("title"));
        assert_eq!(issues[1].block.as_ref().map(|b| b.as_str()), Some("c"));
    }

    #[test]
    fn test_half_filled_cta_warns() {
        let p = page(json!([
            {"id": "h", "type": "hero", "title": "T", "ctaLabel": "Ir"},
            {"id": "c", "type": "cta", "title": "T", "href": "/x"}
        ]));
        let issues = validate_page(&p, &ImagePolicy::default());
        assert_eq!(issues.len(), 2);
        assert!(!has_blocking(&issues));
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn test_duplicate_ids_block() {
        let p = page(json!([
            {"id": "a", "type": "spacer"},
            {"id": "a", "type": "richText", "html": "<p>x</p>"},
            {"id": "g", "type": "cards_grid", "cards": [{"id": "c", "title": "1"}, {"id": "c", "title": "2"}]}
        ]));
        let issues = validate_page(&p, &ImagePolicy::default());
        assert_eq!(issues.iter().filter(|i| i.is_blocking()).count(), 2);
    }

    #[test]
    fn test_untrusted_images_warn() {
        let p = page(json!([
            {"id": "g", "type": "gallery", "images": [
                {"url": "https://res.cloudinary.com/demo/image/upload/a.jpg"},
                {"url": "https://evil.example/b.jpg"}
            ]}
        ]));
        let issues = validate_page(&p, &ImagePolicy::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field.as_deref(), Some("images.1.url"));
        assert!(!issues[0].is_blocking());
    }

    #[test]
    fn test_relative_path_blocks() {
        let mut p = page(json!([]));
        p.path = "deportes".into();
        let issues = validate_page(&p, &ImagePolicy::default());
        assert!(has_blocking(&issues));
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue::warning(Some(&BlockId::parse("abcdefghij").unwrap()), Some("label"), "falta");
        assert_eq!(issue.to_string(), "warning: falta (block abcdefgh, label)");
    }
}

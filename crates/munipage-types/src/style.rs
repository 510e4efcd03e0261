//! Small closed vocabularies shared by the block variants.
//!
//! Every enum here follows the same shape: a serde representation that matches
//! what stored pages already contain, a case-insensitive `FromStr` via strum
//! (used by the CLI and by edit-mode `<select>` bindings), and `as_str()`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// Declared width of a block in the two-column page grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Width {
    /// Both grid columns.
    Full,
    /// One of the two grid columns (collapses to the single column on narrow viewports).
    #[default]
    Half,
}

impl Width {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Width::Full => "full",
            Width::Half => "half",
        }
    }

    /// Number of wide-viewport grid columns this width spans (out of two).
    pub fn columns(&self) -> u8 {
        match self {
            Width::Full => 2,
            Width::Half => 1,
        }
    }
}

impl std::fmt::Display for Width {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Size tier for gallery tiles and carousel slides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum SizeTier {
    #[strum(serialize = "sm", serialize = "small")]
    Sm,
    #[default]
    #[strum(serialize = "md", serialize = "medium")]
    Md,
    #[strum(serialize = "lg", serialize = "large")]
    Lg,
    Xl,
}

impl SizeTier {
    pub const ALL: [SizeTier; 4] = [SizeTier::Sm, SizeTier::Md, SizeTier::Lg, SizeTier::Xl];

    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeTier::Sm => "sm",
            SizeTier::Md => "md",
            SizeTier::Lg => "lg",
            SizeTier::Xl => "xl",
        }
    }

    /// Label shown in the edit-mode size picker.
    pub fn label(&self) -> &'static str {
        match self {
            SizeTier::Sm => "Chica",
            SizeTier::Md => "Mediana",
            SizeTier::Lg => "Grande",
            SizeTier::Xl => "Extra grande",
        }
    }
}

impl std::fmt::Display for SizeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transition used between carousel slides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum CarouselAnimation {
    #[default]
    Slide,
    Fade,
    /// Accepted for pages saved by older editors; rendered like `Slide`.
    Coverflow,
}

impl CarouselAnimation {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CarouselAnimation::Slide => "slide",
            CarouselAnimation::Fade => "fade",
            CarouselAnimation::Coverflow => "coverflow",
        }
    }
}

impl std::fmt::Display for CarouselAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Vertical padding override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum PaddingY {
    None,
    Sm,
    Md,
    Lg,
    Xl,
}

impl PaddingY {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaddingY::None => "none",
            PaddingY::Sm => "sm",
            PaddingY::Md => "md",
            PaddingY::Lg => "lg",
            PaddingY::Xl => "xl",
        }
    }
}

/// Entrance animation override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum EntranceAnimation {
    None,
    #[strum(serialize = "fade-in")]
    FadeIn,
    #[strum(serialize = "slide-up")]
    SlideUp,
}

impl EntranceAnimation {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntranceAnimation::None => "none",
            EntranceAnimation::FadeIn => "fade-in",
            EntranceAnimation::SlideUp => "slide-up",
        }
    }
}

/// Text alignment override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Color theme override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Theme {
    Light,
    Dark,
    Blue,
    Gray,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Blue => "blue",
            Theme::Gray => "gray",
        }
    }
}

/// Optional per-block style overrides.
///
/// Every field is optional; a missing field means "use the block type's
/// default". Merging onto defaults happens at render time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_y: Option<PaddingY>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<EntranceAnimation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl BlockStyles {
    /// True when no override is set.
    pub fn is_empty(&self) -> bool {
        self.padding_y.is_none()
            && self.animation.is_none()
            && self.text_align.is_none()
            && self.theme.is_none()
    }
}

/// Page-level layout used when a page has no blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum PageLayout {
    #[default]
    #[strum(serialize = "hero-text")]
    HeroText,
    #[strum(serialize = "hero-gallery")]
    HeroGallery,
    Simple,
}

impl PageLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageLayout::HeroText => "hero-text",
            PageLayout::HeroGallery => "hero-gallery",
            PageLayout::Simple => "simple",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_parse_and_columns() {
        assert_eq!(Width::from_str("FULL"), Some(Width::Full));
        assert_eq!(Width::from_str("half"), Some(Width::Half));
        assert_eq!(Width::from_str("third"), None);
        assert_eq!(Width::Full.columns(), 2);
        assert_eq!(Width::Half.columns(), 1);
    }

    #[test]
    fn test_size_tier_aliases() {
        assert_eq!(SizeTier::from_str("large"), Some(SizeTier::Lg));
        assert_eq!(SizeTier::from_str("xl"), Some(SizeTier::Xl));
    }

    #[test]
    fn test_styles_serde_camel_case() {
        let styles: BlockStyles =
            serde_json::from_str(r#"{"paddingY":"lg","textAlign":"center","animation":"fade-in"}"#)
                .unwrap();
        assert_eq!(styles.padding_y, Some(PaddingY::Lg));
        assert_eq!(styles.text_align, Some(TextAlign::Center));
        assert_eq!(styles.animation, Some(EntranceAnimation::FadeIn));
        assert_eq!(styles.theme, None);
        assert!(!styles.is_empty());
        assert!(BlockStyles::default().is_empty());
    }

    #[test]
    fn test_page_layout_serde() {
        let layout: PageLayout = serde_json::from_str("\"hero-gallery\"").unwrap();
        assert_eq!(layout, PageLayout::HeroGallery);
        assert_eq!(serde_json::to_string(&PageLayout::Simple).unwrap(), "\"simple\"");
    }
}

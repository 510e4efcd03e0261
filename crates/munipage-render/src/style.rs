//! Visual defaults per block kind, merged with stored overrides.

use munipage_types::{
    Block, BlockKind, BlockStyles, EntranceAnimation, PaddingY, TextAlign, Theme,
};

/// Fully populated style set for one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedStyles {
    pub padding_y: PaddingY,
    pub animation: EntranceAnimation,
    pub text_align: TextAlign,
    pub theme: Theme,
}

impl ResolvedStyles {
    /// Type-specific defaults.
    pub fn defaults(kind: BlockKind) -> Self {
        let base = Self {
            padding_y: PaddingY::None,
            animation: EntranceAnimation::None,
            text_align: TextAlign::Left,
            theme: Theme::Light,
        };
        match kind {
            BlockKind::Hero => Self {
                theme: Theme::Blue,
                ..base
            },
            BlockKind::Cta => Self {
                theme: Theme::Gray,
                ..base
            },
            _ => base,
        }
    }

    /// Overlay whichever override fields are set.
    pub fn merge(self, overrides: Option<&BlockStyles>) -> Self {
        let Some(o) = overrides else {
            return self;
        };
        Self {
            padding_y: o.padding_y.unwrap_or(self.padding_y),
            animation: o.animation.unwrap_or(self.animation),
            text_align: o.text_align.unwrap_or(self.text_align),
            theme: o.theme.unwrap_or(self.theme),
        }
    }

    /// Defaults for the block's kind with its stored overrides applied.
    ///
    /// Unknown blocks resolve to the plain defaults.
    pub fn for_block(block: &Block) -> Self {
        let kind = block.kind().unwrap_or(BlockKind::RichText);
        Self::defaults(kind).merge(block.styles())
    }

    /// Utility classes for the block's root element.
    pub fn classes(&self) -> String {
        [
            theme_class(self.theme),
            padding_class(self.padding_y),
            align_class(self.text_align),
            animation_class(self.animation),
        ]
        .into_iter()
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Whether text sits on a dark background.
    pub fn is_dark(&self) -> bool {
        matches!(self.theme, Theme::Dark | Theme::Blue)
    }
}

pub fn theme_class(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "",
        Theme::Dark => "bg-slate-900 text-white",
        Theme::Blue => "bg-gradient-to-br from-sky-600 to-sky-800 text-white",
        Theme::Gray => "bg-gradient-to-r from-slate-50 to-slate-100",
    }
}

pub fn padding_class(padding: PaddingY) -> &'static str {
    match padding {
        PaddingY::None => "",
        PaddingY::Sm => "py-4",
        PaddingY::Md => "py-8",
        PaddingY::Lg => "py-12",
        PaddingY::Xl => "py-16",
    }
}

pub fn align_class(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "",
        TextAlign::Center => "text-center",
        TextAlign::Right => "text-right",
    }
}

pub fn animation_class(animation: EntranceAnimation) -> &'static str {
    match animation {
        EntranceAnimation::None => "",
        EntranceAnimation::FadeIn => "animate-fade-in",
        EntranceAnimation::SlideUp => "animate-slide-up",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use munipage_types::{CtaBlock, HeroBlock};

    #[test]
    fn test_defaults_per_kind() {
        assert_eq!(ResolvedStyles::defaults(BlockKind::Hero).theme, Theme::Blue);
        assert_eq!(ResolvedStyles::defaults(BlockKind::Cta).theme, Theme::Gray);
        assert_eq!(ResolvedStyles::defaults(BlockKind::Gallery).theme, Theme::Light);
        assert_eq!(ResolvedStyles::defaults(BlockKind::RichText).classes(), "");
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let mut hero = HeroBlock::new("T");
        hero.styles = Some(BlockStyles {
            text_align: Some(TextAlign::Center),
            ..Default::default()
        });
        let resolved = ResolvedStyles::for_block(&Block::from(hero));
        assert_eq!(resolved.theme, Theme::Blue);
        assert_eq!(resolved.text_align, TextAlign::Center);
        assert_eq!(resolved.padding_y, PaddingY::None);
        assert!(resolved.classes().contains("from-sky-600"));
        assert!(resolved.classes().contains("text-center"));
    }

    #[test]
    fn test_full_override() {
        let cta: CtaBlock = serde_json::from_value(serde_json::json!({
            "id": "c",
            "title": "T",
            "styles": {"paddingY": "lg", "theme": "dark", "textAlign": "right", "animation": "slide-up"}
        }))
        .unwrap();
        let resolved = ResolvedStyles::for_block(&Block::from(cta));
        assert_eq!(
            resolved.classes(),
            "bg-slate-900 text-white py-12 text-right animate-slide-up"
        );
        assert!(resolved.is_dark());
    }

    #[test]
    fn test_empty_override_object() {
        let mut hero = HeroBlock::new("T");
        hero.styles = Some(BlockStyles::default());
        assert_eq!(
            ResolvedStyles::for_block(&Block::from(hero)),
            ResolvedStyles::defaults(BlockKind::Hero)
        );
    }
}

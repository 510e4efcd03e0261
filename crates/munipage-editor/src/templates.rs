//! Starter blocks for new pages and the "add block" menu.

use munipage_types::{
    Block, BlockId, BlockKind, Card, CardsGridBlock, CarouselAnimation, CarouselBlock, CtaBlock,
    GalleryBlock, HeroBlock, PageContent, RichTextBlock, SizeTier, SpacerBlock, Width, non_empty,
};

pub const DEFAULT_PAGE_TITLE: &str = "Nueva página";
pub const DEFAULT_BLOCK_TITLE: &str = "Nuevo bloque";
pub const DEFAULT_BODY_HTML: &str = "<p>Agrega contenido en el bloque de texto.</p>";
pub const NEW_TEXT_HTML: &str = "<p>Contenido de texto.</p>";
pub const DEFAULT_CTA_LABEL: &str = "Ver más";

/// What a fresh page (or a new block) is seeded from: the menu item's label
/// and link plus whatever page metadata already exists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageSeed {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    pub body: Option<String>,
    pub href: Option<String>,
}

impl PageSeed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Seed from an existing page's metadata, linking back to its path.
    pub fn from_page(page: &PageContent) -> Self {
        Self {
            title: page.title.clone(),
            subtitle: page.subtitle.clone(),
            image_url: page.image_url.clone(),
            body: page.body.clone(),
            href: non_empty(Some(page.path.as_str())).map(str::to_string),
        }
    }
}

fn owned(s: Option<&str>) -> Option<String> {
    non_empty(s).map(str::to_string)
}

/// The blocks a page starts with: a hero and a half-width text block.
pub fn default_blocks(seed: &PageSeed) -> Vec<Block> {
    let href = owned(seed.href.as_deref());
    let hero = HeroBlock {
        id: BlockId::new(),
        title: non_empty(Some(seed.title.as_str()))
            .unwrap_or(DEFAULT_PAGE_TITLE)
            .to_string(),
        subtitle: owned(seed.subtitle.as_deref()),
        image_url: owned(seed.image_url.as_deref()),
        cta_label: href.as_ref().map(|_| DEFAULT_CTA_LABEL.to_string()),
        cta_href: href,
        styles: None,
    };
    let text = RichTextBlock {
        width: Some(Width::Half),
        ..RichTextBlock::new(non_empty(seed.body.as_deref()).unwrap_or(DEFAULT_BODY_HTML))
    };
    vec![hero.into(), text.into()]
}

/// A new block of `kind`, as offered by the "add block" menu.
pub fn new_block(kind: BlockKind, seed: &PageSeed) -> Block {
    let title = non_empty(Some(seed.title.as_str()))
        .unwrap_or(DEFAULT_BLOCK_TITLE)
        .to_string();
    match kind {
        BlockKind::Hero => HeroBlock {
            subtitle: owned(seed.subtitle.as_deref()),
            image_url: owned(seed.image_url.as_deref()),
            ..HeroBlock::new(title)
        }
        .into(),
        BlockKind::RichText => RichTextBlock {
            width: Some(Width::Half),
            ..RichTextBlock::new(NEW_TEXT_HTML)
        }
        .into(),
        BlockKind::Gallery => GalleryBlock {
            id: BlockId::new(),
            title: None,
            images: Vec::new(),
            columns: Some(3),
            width: Some(Width::Half),
            styles: None,
        }
        .into(),
        BlockKind::Carousel => CarouselBlock {
            id: BlockId::new(),
            title: None,
            images: Vec::new(),
            animation: Some(CarouselAnimation::Slide),
            size: Some(SizeTier::Md),
            autoplay: false,
            interval: None,
            width: Some(Width::Full),
            styles: None,
        }
        .into(),
        BlockKind::CardsGrid => CardsGridBlock {
            id: BlockId::new(),
            title: None,
            columns: Some(3),
            cards: vec![Card::new("")],
            width: Some(Width::Full),
            styles: None,
        }
        .into(),
        BlockKind::Cta => CtaBlock {
            id: BlockId::new(),
            title,
            description: None,
            image_url: None,
            label: Some(DEFAULT_CTA_LABEL.to_string()),
            href: Some(seed.href.clone().unwrap_or_default()),
            width: Some(Width::Full),
            styles: None,
        }
        .into(),
        BlockKind::Spacer => SpacerBlock {
            id: BlockId::new(),
            width: Some(Width::Half),
        }
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use munipage_render::resolve_width;

    #[test]
    fn test_default_blocks_with_href() {
        let seed = PageSeed::new("Deportes").with_href("/deportes");
        let blocks = default_blocks(&seed);
        assert_eq!(blocks.len(), 2);
        let Block::Hero(hero) = &blocks[0] else {
            panic!("expected hero first");
        };
        assert_eq!(hero.title, "Deportes");
        assert_eq!(hero.cta(), Some(("Ver más", "/deportes")));
        let Block::RichText(text) = &blocks[1] else {
            panic!("expected rich text second");
        };
        assert_eq!(text.html, DEFAULT_BODY_HTML);
        assert_eq!(text.width, Some(Width::Half));
        assert_ne!(blocks[0].id(), blocks[1].id());
    }

    #[test]
    fn test_default_blocks_fallbacks() {
        let seed = PageSeed {
            body: Some("<p>Historia</p>".into()),
            subtitle: Some("  ".into()),
            ..PageSeed::default()
        };
        let blocks = default_blocks(&seed);
        let Block::Hero(hero) = &blocks[0] else {
            panic!("expected hero first");
        };
        assert_eq!(hero.title, DEFAULT_PAGE_TITLE);
        assert_eq!(hero.subtitle, None);
        assert_eq!(hero.cta_label, None);
        assert_eq!(hero.cta_href, None);
        let Block::RichText(text) = &blocks[1] else {
            panic!("expected rich text second");
        };
        assert_eq!(text.html, "<p>Historia</p>");
    }

    #[test]
    fn test_new_block_templates() {
        let seed = PageSeed::new("Cultura").with_href("/cultura");
        for kind in BlockKind::ALL {
            let block = new_block(kind, &seed);
            assert_eq!(block.kind(), Some(kind));
        }

        let widths: Vec<Width> = BlockKind::ALL
            .into_iter()
            .map(|k| resolve_width(&new_block(k, &seed)))
            .collect();
        assert_eq!(
            widths,
            vec![
                Width::Full, // hero
                Width::Half, // richText
                Width::Half, // gallery
                Width::Full, // carousel
                Width::Full, // cards_grid
                Width::Full, // cta
                Width::Half, // spacer
            ]
        );

        let Block::Cta(cta) = new_block(BlockKind::Cta, &seed) else {
            panic!("expected cta");
        };
        assert_eq!(cta.title, "Cultura");
        assert_eq!(cta.button(), Some(("Ver más", "/cultura")));

        let Block::CardsGrid(grid) = new_block(BlockKind::CardsGrid, &PageSeed::default()) else {
            panic!("expected cards grid");
        };
        assert_eq!(grid.cards.len(), 1);
        assert_eq!(grid.columns, Some(3));
    }

    #[test]
    fn test_new_blocks_get_fresh_ids() {
        let seed = PageSeed::default();
        let a = new_block(BlockKind::Spacer, &seed);
        let b = new_block(BlockKind::Spacer, &seed);
        assert_ne!(a.id(), b.id());
    }
}

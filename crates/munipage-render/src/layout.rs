//! Layout resolution: block width, grid spans, column clamps and size tiers.
//!
//! Everything here is a pure lookup. The page grid has two columns on wide
//! viewports and one on narrow ones; a `full` block spans both, a `half`
//! block one.

use munipage_types::{Block, SizeTier, Width};

/// Columns of the page grid on wide viewports.
pub const GRID_COLUMNS: u8 = 2;

/// Default and bounds for gallery column counts.
pub const GALLERY_COLUMNS: ColumnRange = ColumnRange { min: 1, max: 4, default: 3 };

/// Default and bounds for cards-grid column counts.
pub const CARDS_COLUMNS: ColumnRange = ColumnRange { min: 2, max: 4, default: 3 };

/// Resolve the effective width of a block.
///
/// - `hero` is always full, whatever was stored
/// - `spacer` defaults to half
/// - `cta` and `carousel` default to full
/// - everything else defaults to half
pub fn resolve_width(block: &Block) -> Width {
    match block {
        Block::Hero(_) => Width::Full,
        Block::Spacer(b) => b.width.unwrap_or(Width::Half),
        Block::Cta(b) => b.width.unwrap_or(Width::Full),
        Block::Carousel(b) => b.width.unwrap_or(Width::Full),
        other => other.stored_width().unwrap_or(Width::Half),
    }
}

/// Grid classes for a cell of the given width.
pub fn span_class(width: Width) -> &'static str {
    match width {
        Width::Full => "md:col-span-2",
        Width::Half => "",
    }
}

/// Inclusive range plus default for a stored column count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnRange {
    pub min: u8,
    pub max: u8,
    pub default: u8,
}

impl ColumnRange {
    /// Clamp a stored value to the nearest bound; `None` yields the default.
    pub fn clamp(&self, stored: Option<i64>) -> u8 {
        let value = stored.unwrap_or(i64::from(self.default));
        value.clamp(i64::from(self.min), i64::from(self.max)) as u8
    }

    pub fn options(&self) -> impl Iterator<Item = u8> {
        self.min..=self.max
    }
}

/// Wide-viewport grid class for an already clamped column count.
pub fn grid_cols_class(columns: u8) -> &'static str {
    match columns {
        0 | 1 => "md:grid-cols-1",
        2 => "md:grid-cols-2",
        3 => "md:grid-cols-3",
        _ => "md:grid-cols-4",
    }
}

/// Fixed spatial footprint of a gallery tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSpan {
    pub col_span: u8,
    pub row_span: u8,
    pub class: &'static str,
}

/// Gallery tile footprint by size tier. Untiered images render as `sm`.
pub fn gallery_tile(size: Option<SizeTier>) -> TileSpan {
    match size.unwrap_or(SizeTier::Sm) {
        SizeTier::Sm => TileSpan { col_span: 1, row_span: 1, class: "h-44" },
        SizeTier::Md => TileSpan { col_span: 2, row_span: 1, class: "sm:col-span-2 h-52" },
        SizeTier::Lg => TileSpan {
            col_span: 2,
            row_span: 2,
            class: "sm:col-span-2 sm:row-span-2 h-64",
        },
        SizeTier::Xl => TileSpan {
            col_span: 2,
            row_span: 2,
            class: "sm:col-span-2 sm:row-span-2 h-80",
        },
    }
}

/// Carousel slide dimensions by size tier. Defaults to `md`.
pub fn carousel_slide_class(size: Option<SizeTier>) -> &'static str {
    match size.unwrap_or_default() {
        SizeTier::Sm => "h-32 w-56",
        SizeTier::Md => "h-44 w-72",
        SizeTier::Lg => "h-64 w-96",
        SizeTier::Xl => "h-80 w-[32rem]",
    }
}

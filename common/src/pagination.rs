//! Page-number window for result navigation.

use std::fmt;

/// Pages shown on each side of the current one.
pub const NEIGHBOURS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{n}"),
            PageItem::Ellipsis => f.write_str("…"),
        }
    }
}

/// Builds the navigation list for `current` out of `total` pages.
///
/// First and last page are always present, the current page is surrounded by
/// up to [`NEIGHBOURS`] pages on each side, and an ellipsis stands in for any
/// run of hidden pages. `current` is clamped into range; zero pages yields an
/// empty list.
pub fn page_window(current: u32, total: u32) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }

    let current = current.clamp(1, total);
    let start = current.saturating_sub(NEIGHBOURS).max(1);
    let end = current.saturating_add(NEIGHBOURS).min(total);

    let mut items = Vec::with_capacity((end - start + 5) as usize);
    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total {
        if end < total - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total));
    }
    items
}

//! Display regions of the cart page.
//!
//! These stand in for the document elements the cart writes to: the list
//! container (contents replaced wholesale on every render), the summary
//! (text and visibility set per total) and the header item-count badge.

use std::cell::RefCell;
use std::rc::Rc;

use askama::Template;

use crate::cart::RenderError;

/// Whether a region is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

impl Visibility {
    /// `true` for [`Visibility::Visible`].
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Container whose full contents are replaced on each render.
#[derive(Debug, Clone, Default)]
pub struct ListRegion {
    markup: String,
}

impl ListRegion {
    /// Replace the contents.
    pub fn replace(&mut self, markup: String) {
        self.markup = markup;
    }

    /// Current markup.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// Cart total display.
#[derive(Debug, Clone, Default)]
pub struct SummaryRegion {
    text: String,
    visibility: Visibility,
}

impl SummaryRegion {
    /// Set text and visibility together.
    pub fn update(&mut self, text: String, visibility: Visibility) {
        self.text = text;
        self.visibility = visibility;
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }
}

#[derive(Debug, Default)]
struct BadgeState {
    count: u32,
}

/// Cart count badge template.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
struct CartCountTemplate {
    count: u32,
}

/// The header item-count indicator.
///
/// Shared across pages, so clones refer to the same badge. Hidden while the
/// count is zero.
#[derive(Debug, Clone, Default)]
pub struct CountBadge {
    state: Rc<RefCell<BadgeState>>,
}

impl CountBadge {
    /// Create a badge showing nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of items in the cart.
    pub fn set_count(&self, count: u32) {
        self.state.borrow_mut().count = count;
    }

    /// Current count.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.state.borrow().count
    }

    /// Hidden when the count is zero.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        if self.count() == 0 {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }

    /// Badge markup (empty when hidden).
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render(&self) -> Result<String, RenderError> {
        Ok(CartCountTemplate {
            count: self.count(),
        }
        .render()?)
    }
}

/// Everything the cart cycle writes to.
#[derive(Debug, Clone, Default)]
pub struct CartPage {
    pub list: ListRegion,
    pub summary: SummaryRegion,
    pub badge: CountBadge,
}

impl CartPage {
    /// A blank page whose header shows `badge`.
    #[must_use]
    pub fn with_badge(badge: CountBadge) -> Self {
        Self {
            badge,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_hidden_at_zero() {
        let badge = CountBadge::new();
        assert_eq!(badge.visibility(), Visibility::Hidden);
        assert!(!badge.render().unwrap().contains("cart-count"));
    }

    #[test]
    fn test_badge_clones_share_state() {
        let badge = CountBadge::new();
        let header = badge.clone();
        badge.set_count(3);

        assert_eq!(header.count(), 3);
        assert_eq!(header.visibility(), Visibility::Visible);
        assert!(header.render().unwrap().contains(">3<"));
    }

    #[test]
    fn test_list_region_replaces_contents() {
        let mut list = ListRegion::default();
        list.replace("<li>a</li>".to_string());
        list.replace("<li>b</li>".to_string());
        assert_eq!(list.markup(), "<li>b</li>");
    }
}

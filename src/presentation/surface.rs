// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use crate::client::ValidationError;
use crate::model::{Cart, LineNumber};
use crate::money::MoneyFormat;
use crate::view::CartView;

/// What the cart container currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SurfaceContent {
    #[default]
    Unbuilt,
    /// Client-side render of a [`CartView`].
    Rendered { view: CartView, markup: String },
    /// Server-rendered cart page; the host keeps the part matching `selector`.
    Fragment { markup: String, selector: String },
}

impl SurfaceContent {
    pub fn markup(&self) -> Option<&str> {
        match self {
            Self::Unbuilt => None,
            Self::Rendered { markup, .. } | Self::Fragment { markup, .. } => Some(markup),
        }
    }

    pub fn view(&self) -> Option<&CartView> {
        match self {
            Self::Rendered { view, .. } => Some(view),
            _ => None,
        }
    }
}

/// Activity marks on one rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowState {
    pub loading: bool,
    pub removed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddButtonState {
    #[default]
    Idle,
    Adding,
    Added,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlipState {
    pub flipped: bool,
    pub loading: bool,
    /// Count shown in the "view cart" link.
    pub view_cart_count: Option<u32>,
}

/// Header count and total badges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartBadge {
    pub count: u32,
    pub count_hidden: bool,
    pub total: String,
}

impl CartBadge {
    pub fn from_cart(cart: &Cart, format: &MoneyFormat) -> Self {
        Self {
            count: cart.item_count,
            count_hidden: cart.item_count == 0,
            total: format.format(cart.total_price),
        }
    }
}

/// The single cart surface: drawer, modal panel or flip container plus the badges and error
/// blocks around it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Surface {
    pub(crate) visible: bool,
    pub(crate) height_px: Option<u32>,
    pub(crate) caret_left: Option<i32>,
    pub(crate) modal_margin_left: Option<i32>,
    pub(crate) content: SurfaceContent,
    pub(crate) built: bool,
    pub(crate) render_rev: u64,
    pub(crate) rows: BTreeMap<LineNumber, RowState>,
    pub(crate) badge: CartBadge,
    pub(crate) add_button: AddButtonState,
    pub(crate) flip: FlipState,
    pub(crate) inline_error: Option<ValidationError>,
    pub(crate) alert: Option<String>,
    pub(crate) cookies_disabled: bool,
}

impl Surface {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Explicit drawer height; `None` when no height style is applied.
    pub fn height_px(&self) -> Option<u32> {
        self.height_px
    }

    pub fn caret_left(&self) -> Option<i32> {
        self.caret_left
    }

    pub fn modal_margin_left(&self) -> Option<i32> {
        self.modal_margin_left
    }

    pub fn content(&self) -> &SurfaceContent {
        &self.content
    }

    pub fn view(&self) -> Option<&CartView> {
        self.content.view()
    }

    /// A non-empty cart has been rendered at least once.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Bumped on every render.
    pub fn render_rev(&self) -> u64 {
        self.render_rev
    }

    pub fn row(&self, line: LineNumber) -> RowState {
        self.rows.get(&line).copied().unwrap_or_default()
    }

    pub fn badge(&self) -> &CartBadge {
        &self.badge
    }

    pub fn add_button(&self) -> AddButtonState {
        self.add_button
    }

    pub fn flip(&self) -> FlipState {
        self.flip
    }

    pub fn inline_error(&self) -> Option<&ValidationError> {
        self.inline_error.as_ref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn cookies_disabled(&self) -> bool {
        self.cookies_disabled
    }

    pub(crate) fn set_content(&mut self, content: SurfaceContent) {
        self.content = content;
        self.rows.clear();
        self.render_rev += 1;
    }

    pub(crate) fn mark_row(&mut self, line: LineNumber, removed: bool) {
        let row = self.rows.entry(line).or_default();
        row.loading = true;
        row.removed |= removed;
    }
}

#[cfg(test)]
mod tests {
    use super::{CartBadge, Surface, SurfaceContent};
    use crate::model::fixtures::cart_two_lines;
    use crate::model::{Cart, LineNumber};
    use crate::money::MoneyFormat;

    #[test]
    fn badge_hides_zero_count() {
        let format = MoneyFormat::default();
        let badge = CartBadge::from_cart(&Cart::empty(), &format);
        assert!(badge.count_hidden);
        assert_eq!(badge.total, "$0.00");

        let badge = CartBadge::from_cart(&cart_two_lines(), &format);
        assert_eq!(badge.count, 3);
        assert!(!badge.count_hidden);
    }

    #[test]
    fn new_content_clears_row_marks() {
        let mut surface = Surface::default();
        let line = LineNumber::new(1).unwrap();
        surface.mark_row(line, true);
        assert!(surface.row(line).removed);

        surface.set_content(SurfaceContent::Fragment {
            markup: "<form></form>".to_owned(),
            selector: "[data-cart-form]".to_owned(),
        });
        assert_eq!(surface.row(line), Default::default());
        assert_eq!(surface.render_rev(), 1);
        assert_eq!(surface.content().markup(), Some("<form></form>"));
    }
}

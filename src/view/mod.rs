// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Line-item view builder.
//!
//! [`build_view`] is a pure transform from a cart snapshot to the data a template renders: per-line
//! display position, stepper targets, thumbnail URL, name/variation split and formatted prices.
//! Markup itself is produced by a [`Template`].

pub mod text;

use serde::Serialize;

use crate::model::{Cart, LineItem, LineKey, LineNumber};
use crate::money::MoneyFormat;

pub use text::TextTemplate;

pub const EMPTY_CART_MESSAGE: &str = "Your cart is currently empty.";
pub const CONTINUE_MESSAGE: &str = "Continue browsing here.";
pub const COOKIE_MESSAGE: &str = "Enable cookies to use the shopping cart";

/// How a line title maps to a product name and a variation label.
///
/// Storefronts title lines `"<product> - <variant>"`. This is a content convention: a product name
/// that itself contains the separator is split at the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleConvention {
    TrailingSegment { separator: char },
    Whole,
}

impl Default for TitleConvention {
    fn default() -> Self {
        Self::TrailingSegment { separator: '-' }
    }
}

impl TitleConvention {
    pub fn split(self, title: &str) -> (String, String) {
        let Self::TrailingSegment { separator } = self else {
            return (title.to_owned(), String::new());
        };
        match title.rfind(separator) {
            Some(idx) if idx > 0 => {
                let name = title[..idx].trim_end();
                let variation = title[idx + separator.len_utf8()..].trim();
                (name.to_owned(), variation.to_owned())
            }
            _ => (title.to_owned(), String::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub money_format: MoneyFormat,
    pub title_convention: TitleConvention,
    /// Image size suffix (`small` → `shirt_small.jpg`).
    pub thumbnail_size: String,
    pub btn_class: Option<String>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            money_format: MoneyFormat::default(),
            title_convention: TitleConvention::default(),
            thumbnail_size: "small".to_owned(),
            btn_class: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartView {
    Empty(EmptyCartView),
    Items(ItemsView),
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    pub fn items(&self) -> &[LineView] {
        match self {
            Self::Empty(_) => &[],
            Self::Items(view) => &view.items,
        }
    }

    pub fn line(&self, line: LineNumber) -> Option<&LineView> {
        self.items().iter().find(|item| item.line == line)
    }

    pub fn has_images(&self) -> bool {
        self.items().iter().any(|item| item.img.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyCartView {
    pub message: &'static str,
    pub continue_message: &'static str,
    pub cookie_message: &'static str,
    /// Templates show `cookie_message` instead of the continue link when set.
    pub cookies_disabled: bool,
}

impl EmptyCartView {
    pub fn new(cookies_disabled: bool) -> Self {
        Self {
            message: EMPTY_CART_MESSAGE,
            continue_message: CONTINUE_MESSAGE,
            cookie_message: COOKIE_MESSAGE,
            cookies_disabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemsView {
    pub items: Vec<LineView>,
    pub total_price: String,
    pub btn_class: Option<String>,
    pub cookies_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineView {
    pub key: LineKey,
    pub line: LineNumber,
    pub url: String,
    pub img: Option<String>,
    pub name: String,
    pub variation: String,
    pub quantity: u32,
    /// Target quantity of the `+` control.
    pub item_add: u32,
    /// Target quantity of the `-` control; never below zero.
    pub item_minus: u32,
    pub item_qty: String,
    pub price: String,
}

/// Renders a [`CartView`] to markup.
pub trait Template: Send + Sync {
    fn render(&self, view: &CartView) -> String;
}

pub fn build_view(cart: &Cart, options: &ViewOptions, cookies_disabled: bool) -> CartView {
    if cart.item_count == 0 || cart.items.is_empty() {
        return CartView::Empty(EmptyCartView::new(cookies_disabled));
    }

    let items = cart
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| line_view(index, item, options))
        .collect();

    CartView::Items(ItemsView {
        items,
        total_price: options.money_format.format(cart.total_price),
        btn_class: options.btn_class.clone(),
        cookies_disabled,
    })
}

fn line_view(index: usize, item: &LineItem, options: &ViewOptions) -> LineView {
    let (name, variation) = options.title_convention.split(&item.title);
    LineView {
        key: item.key.clone(),
        line: LineNumber::from_index(index),
        url: item.url.clone(),
        img: item.image.as_deref().map(|image| thumbnail_url(image, &options.thumbnail_size)),
        name,
        variation,
        quantity: item.quantity,
        item_add: item.quantity.saturating_add(1),
        item_minus: item.quantity.saturating_sub(1),
        item_qty: format!("{} x", item.quantity),
        price: options.money_format.format(item.price),
    }
}

/// Size-variant image URL loaded scheme-relative.
///
/// `http://cdn.example.com/files/shirt.jpg?v=3` with size `small` becomes
/// `//cdn.example.com/files/shirt_small.jpg?v=3`. Only the last path segment is considered, so a
/// dot in the host name is never mistaken for an extension.
pub fn thumbnail_url(image: &str, size: &str) -> String {
    let without_scheme = image
        .strip_prefix("https:")
        .or_else(|| image.strip_prefix("http:"))
        .unwrap_or(image);

    let suffix_start = without_scheme.find(['?', '#']).unwrap_or(without_scheme.len());
    let (path, suffix) = without_scheme.split_at(suffix_start);

    let segment_start = path.rfind('/').map(|idx| idx + 1).unwrap_or(0);
    let Some(dot) = path[segment_start..].rfind('.').map(|idx| segment_start + idx) else {
        return without_scheme.to_owned();
    };

    if size.is_empty() {
        return without_scheme.to_owned();
    }
    format!("{}_{}{}{}", &path[..dot], size, &path[dot..], suffix)
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::client::{CartError, ValidationError, UNPROCESSABLE};
use crate::model::{Cart, LineItem, LineKey, VariantId};

const CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StubError {
    #[error("Cannot find variant {0}")]
    UnknownVariant(VariantId),
    #[error("All {available} {title} are in your cart.")]
    OutOfStock { title: String, available: u32 },
    #[error("Line {line} does not exist")]
    LineOutOfRange { line: u32 },
    #[error("Required parameter missing or invalid: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },
}

impl StubError {
    pub fn status(&self) -> u16 {
        match self {
            Self::UnknownVariant(_) => 404,
            Self::OutOfStock { .. } | Self::LineOutOfRange { .. } => UNPROCESSABLE,
            Self::MissingParameter(_) | Self::InvalidParameter { .. } => 400,
        }
    }

    /// The storefront's error body for this failure.
    pub fn to_validation(&self) -> ValidationError {
        let message = match self {
            Self::UnknownVariant(_) => "Not Found",
            Self::OutOfStock { .. } | Self::LineOutOfRange { .. } => "Cart Error",
            Self::MissingParameter(_) | Self::InvalidParameter { .. } => "Parameter Missing",
        };
        ValidationError::new(self.status(), message, self.to_string())
    }
}

impl From<StubError> for CartError {
    fn from(err: StubError) -> Self {
        CartError::Validation(err.to_validation())
    }
}

/// A purchasable variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub id: VariantId,
    pub title: String,
    pub price: i64,
    pub image: Option<String>,
    pub url: String,
    /// `None` means unlimited.
    pub stock: Option<u32>,
}

impl Variant {
    pub fn new(id: u64, title: &str, price: i64) -> Self {
        let handle: String = title
            .split(" - ")
            .next()
            .unwrap_or(title)
            .to_ascii_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        Self {
            id: VariantId(id),
            title: title.to_owned(),
            price,
            image: Some(format!("http://cdn.example.com/s/files/{handle}.jpg?v=1")),
            url: format!("/products/{handle}?variant={id}"),
            stock: None,
        }
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredLine {
    variant: VariantId,
    quantity: u32,
    properties: Option<BTreeMap<String, String>>,
}

/// In-memory storefront cart behind the fixed `/cart*.js` contract.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StubStore {
    catalog: Vec<Variant>,
    lines: Vec<StoredLine>,
    note: Option<String>,
}

impl StubStore {
    pub fn with_catalog(catalog: Vec<Variant>) -> Self {
        Self { catalog, ..Self::default() }
    }

    pub fn demo() -> Self {
        Self::with_catalog(vec![
            Variant::new(101, "Linen Shirt - Blue / M", 1250),
            Variant::new(102, "Linen Shirt - Sand / L", 1250),
            Variant::new(202, "Canvas Tote", 1999).with_stock(3),
            Variant::new(303, "Enamel Mug", 1450).with_stock(1),
        ])
    }

    pub fn variant_ids(&self) -> Vec<VariantId> {
        self.catalog.iter().map(|variant| variant.id).collect()
    }

    pub fn variant(&self, id: VariantId) -> Option<&Variant> {
        self.catalog.iter().find(|variant| variant.id == id)
    }

    /// `/cart/add.js` with the serialized form fields.
    pub fn add(&mut self, fields: &[(String, String)]) -> Result<LineItem, StubError> {
        let mut id = None;
        let mut quantity = 1;
        let mut properties = BTreeMap::new();
        for (name, value) in fields {
            match name.as_str() {
                "id" => id = Some(parse_param("id", value)?),
                "quantity" => quantity = parse_param("quantity", value)?,
                _ => {
                    let property = name.strip_prefix("properties[").and_then(|n| n.strip_suffix(']'));
                    if let Some(property) = property.filter(|_| !value.is_empty()) {
                        properties.insert(property.to_owned(), value.clone());
                    }
                }
            }
        }
        let id = VariantId(id.ok_or(StubError::MissingParameter("id"))?.unsigned_abs());
        let quantity = u32::try_from(quantity.max(1))
            .map_err(|_| StubError::InvalidParameter { name: "quantity", value: quantity.to_string() })?;
        let properties = (!properties.is_empty()).then_some(properties);

        let variant = self.variant(id).ok_or(StubError::UnknownVariant(id))?.clone();
        let in_cart: u32 = self.lines.iter().filter(|l| l.variant == id).map(|l| l.quantity).sum();
        if let Some(stock) = variant.stock {
            if in_cart.saturating_add(quantity) > stock {
                return Err(StubError::OutOfStock { title: variant.title, available: stock });
            }
        }

        self.check_cart_count(None, quantity)?;

        let index = match self
            .lines
            .iter()
            .position(|line| line.variant == id && line.properties == properties)
        {
            Some(index) => {
                self.lines[index].quantity += quantity;
                index
            }
            None => {
                self.lines.push(StoredLine { variant: id, quantity, properties });
                self.lines.len() - 1
            }
        };

        tracing::debug!(variant = %id, quantity, "stub add");
        self.line_item(&self.lines[index]).ok_or(StubError::UnknownVariant(id))
    }

    /// `/cart/change.js`. Quantity zero removes the line; quantities above stock are clamped.
    pub fn change(&mut self, line: u32, quantity: u32) -> Result<Cart, StubError> {
        let index = usize::try_from(line)
            .ok()
            .and_then(|line| line.checked_sub(1))
            .filter(|index| *index < self.lines.len())
            .ok_or(StubError::LineOutOfRange { line })?;

        if quantity == 0 {
            self.lines.remove(index);
        } else {
            let variant = self.lines[index].variant;
            let others: u32 = self
                .lines
                .iter()
                .enumerate()
                .filter(|(i, l)| *i != index && l.variant == variant)
                .map(|(_, l)| l.quantity)
                .sum();
            let limit = self
                .variant(variant)
                .and_then(|v| v.stock)
                .map(|stock| stock.saturating_sub(others))
                .unwrap_or(u32::MAX);
            let quantity = quantity.min(limit);
            self.check_cart_count(Some(index), quantity)?;
            self.lines[index].quantity = quantity;
            if self.lines[index].quantity == 0 {
                self.lines.remove(index);
            }
        }
        tracing::debug!(line, quantity, "stub change");
        Ok(self.cart())
    }

    /// The cart's item count has to stay representable once `line` holds `quantity`, or once
    /// `quantity` more units are added (`None`).
    fn check_cart_count(&self, line: Option<usize>, quantity: u32) -> Result<(), StubError> {
        let others: u64 = self
            .lines
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != line)
            .map(|(_, stored)| u64::from(stored.quantity))
            .sum();
        if others + u64::from(quantity) > u64::from(u32::MAX) {
            return Err(StubError::InvalidParameter { name: "quantity", value: quantity.to_string() });
        }
        Ok(())
    }

    pub fn update_note(&mut self, note: &str) -> Cart {
        self.note = Some(note.to_owned());
        self.cart()
    }

    pub fn cart(&self) -> Cart {
        let items: Vec<LineItem> = self.lines.iter().filter_map(|line| self.line_item(line)).collect();
        Cart {
            token: Some("stub-cart".to_owned()),
            note: self.note.clone(),
            total_price: items
                .iter()
                .fold(0i64, |total, item| total.saturating_add(item.line_price)),
            item_count: items.iter().map(|item| item.quantity).sum(),
            requires_shipping: !items.is_empty(),
            items,
            currency: Some(CURRENCY.to_owned()),
        }
    }

    /// Cart page markup as a theme's `/cart` template would render it.
    pub fn cart_page(&self) -> String {
        let cart = self.cart();
        let mut out = String::from("<main class=\"cart-page\">\n<h1>Your cart</h1>\n");
        if cart.items.is_empty() {
            out.push_str("<p>Your cart is currently empty.</p>\n</main>");
            return out;
        }
        out.push_str("<form action=\"/cart\" method=\"post\" class=\"cart-form\" data-cart-form>\n");
        for (index, item) in cart.items.iter().enumerate() {
            let line = index + 1;
            out.push_str(&format!(
                "<div class=\"cart-row\" data-line=\"{line}\"><a href=\"{}\">{}</a> \
                 <input type=\"number\" name=\"updates[]\" value=\"{}\" min=\"0\" data-line=\"{line}\"> \
                 <a href=\"/cart/change?line={line}&amp;quantity=0\">Remove</a></div>\n",
                escape_html(&item.url),
                escape_html(&item.title),
                item.quantity
            ));
        }
        out.push_str(&format!(
            "<textarea name=\"note\">{}</textarea>\n<p class=\"cart-subtotal\">{}</p>\n</form>\n</main>",
            escape_html(cart.note.as_deref().unwrap_or_default()),
            cart.total_price
        ));
        out
    }

    fn line_item(&self, line: &StoredLine) -> Option<LineItem> {
        let variant = self.variant(line.variant)?;
        let key = LineKey::new(line_key(line)).ok()?;
        Some(LineItem {
            key,
            variant_id: variant.id,
            title: variant.title.clone(),
            quantity: line.quantity,
            price: variant.price,
            line_price: variant.price.saturating_mul(i64::from(line.quantity)),
            image: variant.image.clone(),
            url: variant.url.clone(),
            properties: line.properties.clone(),
        })
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn line_key(line: &StoredLine) -> String {
    let mut hasher = DefaultHasher::new();
    line.properties.hash(&mut hasher);
    format!("{}:{:08x}", line.variant, hasher.finish() as u32)
}

fn parse_param(name: &'static str, value: &str) -> Result<i64, StubError> {
    let parsed = value
        .trim()
        .parse::<i64>()
        .map_err(|_| StubError::InvalidParameter { name, value: value.to_owned() })?;
    if parsed < 0 {
        return Err(StubError::InvalidParameter { name, value: value.to_owned() });
    }
    Ok(parsed)
}

/// Parses a `line`/`quantity` request parameter.
pub(crate) fn parse_count(name: &'static str, value: Option<&str>) -> Result<u32, StubError> {
    let value = value.ok_or(StubError::MissingParameter(name))?;
    let parsed = parse_param(name, value)?;
    u32::try_from(parsed).map_err(|_| StubError::InvalidParameter { name, value: value.to_owned() })
}

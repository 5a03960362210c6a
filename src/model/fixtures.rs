// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::cart::{Cart, LineItem};
use super::ids::{LineKey, VariantId};

fn key(value: &str) -> LineKey {
    LineKey::new(value).expect("line key")
}

pub(crate) fn line_item(variant: u64, title: &str, quantity: u32, price: i64) -> LineItem {
    LineItem {
        key: key(&format!("{variant}:k")),
        variant_id: VariantId(variant),
        title: title.to_owned(),
        quantity,
        price,
        line_price: price * i64::from(quantity),
        image: Some(format!("http://cdn.example.com/files/{variant}.jpg")),
        url: format!("/products/p-{variant}?variant={variant}"),
        properties: None,
    }
}

pub(crate) fn cart_of(items: Vec<LineItem>) -> Cart {
    Cart {
        total_price: items.iter().map(|item| item.line_price).sum(),
        item_count: items.iter().map(|item| item.quantity).sum(),
        items,
        ..Cart::empty()
    }
}

pub(crate) fn cart_two_lines() -> Cart {
    cart_of(vec![
        line_item(101, "Linen Shirt - Blue / M", 2, 1250),
        line_item(202, "Canvas Tote", 1, 1999),
    ])
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Shared deterministic benchmark carts (no RNG).

use ajaxcart::model::{Cart, LineItem, LineKey, VariantId};

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Empty,
    Small,
    Medium,
    LargeLongTitles,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::LargeLongTitles => "large_long_titles",
        }
    }

    fn lines(self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Small => 3,
            Self::Medium => 25,
            Self::LargeLongTitles => 200,
        }
    }
}

pub fn cart(case: Case) -> Cart {
    let long = matches!(case, Case::LargeLongTitles);
    let items: Vec<LineItem> = (0..case.lines()).map(|idx| line(idx, long)).collect();
    let item_count = items.iter().map(|item| item.quantity).sum();
    let total_price = items.iter().map(|item| item.line_price).sum();
    Cart { items, item_count, total_price, ..Cart::empty() }
}

fn line(idx: usize, long: bool) -> LineItem {
    let id = 40_000 + idx as u64;
    let quantity = (idx % 4) as u32 + 1;
    let price = 995 + (idx as i64 * 137) % 9000;
    let title = if long {
        format!("Heavyweight Garment-Dyed Organic Cotton Overshirt No. {idx} - Washed Olive / XXL")
    } else {
        format!("Shirt {idx} - Blue / M")
    };
    // Every third line has no image so both row shapes are exercised.
    let image = (idx % 3 != 0).then(|| format!("https://cdn.example.com/s/files/1/{id}.jpg?v=17"));

    LineItem {
        key: LineKey::new(format!("{id}:{idx:04x}")).expect("fixture line key"),
        variant_id: VariantId(id),
        title,
        quantity,
        price,
        line_price: price * i64::from(quantity),
        image,
        url: format!("/products/item-{idx}?variant={id}"),
        properties: None,
    }
}

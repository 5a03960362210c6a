// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::{LineKey, LineNumber, VariantId};

/// Server-owned cart snapshot as returned by `/cart.js`, `/cart/change.js` and `/cart/update.js`.
///
/// The client never computes `item_count` or `total_price`; it only displays what the server
/// sent. Unknown fields in the payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    pub total_price: i64,
    pub item_count: u32,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub requires_shipping: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Cart {
    pub fn empty() -> Self {
        Self {
            token: None,
            note: None,
            total_price: 0,
            item_count: 0,
            items: Vec::new(),
            requires_shipping: false,
            currency: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// `item_count == 0` iff there are no lines.
    pub fn is_consistent(&self) -> bool {
        (self.item_count == 0) == self.items.is_empty()
    }

    pub fn line(&self, line: LineNumber) -> Option<&LineItem> {
        self.items.get(line.index())
    }

    pub fn line_of_key(&self, key: &LineKey) -> Option<LineNumber> {
        self.items.iter().position(|item| &item.key == key).map(LineNumber::from_index)
    }
}

/// One line of the cart. Never cached across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub key: LineKey,
    pub variant_id: VariantId,
    pub title: String,
    pub quantity: u32,
    /// Per-unit price in minor units.
    pub price: i64,
    #[serde(default)]
    pub line_price: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
}

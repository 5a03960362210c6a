// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cart data model.
//!
//! A cart is a server-owned snapshot: ordered line items plus aggregate count and total.

pub mod cart;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;

pub use cart::{Cart, LineItem};
pub use ids::{Id, IdError, LineKey, LineNumber, VariantId};

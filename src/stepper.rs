// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Quantity stepper widgets.
//!
//! Both variants share validation: field text that is not a non-negative integer counts as
//! [`FALLBACK_QUANTITY`], and decrementing never goes below the stepper's minimum. A cart-bound
//! stepper with a line identity asks the synchronizer for a change; every other stepper only
//! rewrites its own field.

use crate::model::LineNumber;

/// Replacement for unparseable field text, regardless of where the stepper lives.
pub const FALLBACK_QUANTITY: u32 = 1;
pub const CART_ROW_MIN: u32 = 0;
pub const PRODUCT_PAGE_MIN: u32 = 1;

/// Parses field text as a quantity.
///
/// Accepts decimal integers with surrounding whitespace, including the integral decimal forms
/// `"3."` and `"3.0"`. Whole numbers beyond `u32::MAX` saturate to it. Negative, fractional,
/// non-finite and empty input is rejected.
pub fn parse_qty(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let whole = whole.strip_prefix('+').unwrap_or(whole);
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !fraction.bytes().all(|b| b == b'0') {
        return None;
    }
    Some(whole.parse::<u32>().unwrap_or(u32::MAX))
}

/// [`parse_qty`] with the fallback applied.
pub fn validate_qty(raw: &str) -> u32 {
    parse_qty(raw).unwrap_or(FALLBACK_QUANTITY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Increment,
    Decrement,
}

pub fn step(current: u32, direction: StepDirection, min: u32) -> u32 {
    match direction {
        StepDirection::Increment => current.saturating_add(1),
        StepDirection::Decrement if current <= min => min,
        StepDirection::Decrement => current - 1,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperKind {
    /// Form-bound field (product page, or any page before the item is in the cart).
    Standalone { min: u32 },
    /// Field inside the cart surface. Without a line it behaves as standalone with a zero minimum.
    CartBound { line: Option<LineNumber> },
}

impl StepperKind {
    pub fn standalone(product_page: bool) -> Self {
        let min = if product_page { PRODUCT_PAGE_MIN } else { CART_ROW_MIN };
        Self::Standalone { min }
    }

    pub fn min(self) -> u32 {
        match self {
            Self::Standalone { min } => min,
            Self::CartBound { .. } => CART_ROW_MIN,
        }
    }

    pub fn line(self) -> Option<LineNumber> {
        match self {
            Self::Standalone { .. } => None,
            Self::CartBound { line } => line,
        }
    }
}

/// What a stepper interaction resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperAction {
    /// Rewrite the field; no request.
    SetLocal(u32),
    /// Ask the synchronizer to set `line` to `quantity`.
    Change { line: LineNumber, quantity: u32 },
}

impl StepperAction {
    pub fn quantity(self) -> u32 {
        match self {
            Self::SetLocal(quantity) | Self::Change { quantity, .. } => quantity,
        }
    }
}

/// `+`/`-` click with the field's current text.
pub fn click(kind: StepperKind, raw: &str, direction: StepDirection) -> StepperAction {
    let quantity = step(validate_qty(raw), direction, kind.min());
    match kind.line() {
        Some(line) => StepperAction::Change { line, quantity },
        None => StepperAction::SetLocal(quantity),
    }
}

/// Committed edit of the field text.
///
/// Invalid text resets the field to [`FALLBACK_QUANTITY`] without a request; standalone fields
/// keep what the shopper typed.
pub fn input_changed(kind: StepperKind, raw: &str) -> Option<StepperAction> {
    let Some(quantity) = parse_qty(raw) else {
        return Some(StepperAction::SetLocal(FALLBACK_QUANTITY));
    };
    kind.line().map(|line| StepperAction::Change { line, quantity })
}

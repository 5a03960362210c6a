// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Money display formatting.
//!
//! Amounts are integer minor units (cents). A format template carries exactly one
//! `{{ placeholder }}` that decides precision and delimiters, e.g. `${{amount}}` or
//! `{{amount_with_comma_separator}} €`.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

pub const DEFAULT_MONEY_FORMAT: &str = "${{amount}}";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder regex is valid"))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyFormatError {
    #[error("money format '{0}' has no {{{{amount}}}} placeholder")]
    MissingPlaceholder(String),
    #[error("unknown money placeholder '{0}'")]
    UnknownPlaceholder(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Amount,
    AmountNoDecimals,
    AmountWithCommaSeparator,
    AmountNoDecimalsWithCommaSeparator,
}

impl Placeholder {
    pub fn name(self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::AmountNoDecimals => "amount_no_decimals",
            Self::AmountWithCommaSeparator => "amount_with_comma_separator",
            Self::AmountNoDecimalsWithCommaSeparator => "amount_no_decimals_with_comma_separator",
        }
    }

    fn precision(self) -> u32 {
        match self {
            Self::Amount | Self::AmountWithCommaSeparator => 2,
            Self::AmountNoDecimals | Self::AmountNoDecimalsWithCommaSeparator => 0,
        }
    }

    /// `(thousands, decimal)` delimiters.
    fn delimiters(self) -> (char, char) {
        match self {
            Self::Amount | Self::AmountNoDecimals => (',', '.'),
            Self::AmountWithCommaSeparator | Self::AmountNoDecimalsWithCommaSeparator => ('.', ','),
        }
    }
}

impl FromStr for Placeholder {
    type Err = MoneyFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amount" => Ok(Self::Amount),
            "amount_no_decimals" => Ok(Self::AmountNoDecimals),
            "amount_with_comma_separator" => Ok(Self::AmountWithCommaSeparator),
            "amount_no_decimals_with_comma_separator" => {
                Ok(Self::AmountNoDecimalsWithCommaSeparator)
            }
            other => Err(MoneyFormatError::UnknownPlaceholder(other.to_owned())),
        }
    }
}

/// A parsed money format template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    template: String,
    placeholder: Placeholder,
    span: (usize, usize),
}

impl MoneyFormat {
    pub fn parse(template: impl Into<String>) -> Result<Self, MoneyFormatError> {
        let template = template.into();
        let (placeholder, span) = {
            let captures = placeholder_regex()
                .captures(&template)
                .ok_or_else(|| MoneyFormatError::MissingPlaceholder(template.clone()))?;
            let whole = captures.get(0).expect("capture 0 always present");
            let name = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            (name.parse::<Placeholder>()?, (whole.start(), whole.end()))
        };
        Ok(Self { template, placeholder, span })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn placeholder(&self) -> Placeholder {
        self.placeholder
    }

    pub fn format(&self, cents: i64) -> String {
        let amount = format_amount(cents, self.placeholder);
        let (start, end) = self.span;
        let mut out = String::with_capacity(self.template.len() + amount.len());
        out.push_str(&self.template[..start]);
        out.push_str(&amount);
        out.push_str(&self.template[end..]);
        out
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::parse(DEFAULT_MONEY_FORMAT).expect("default money format is valid")
    }
}

impl fmt::Display for MoneyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl FromStr for MoneyFormat {
    type Err = MoneyFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.to_owned())
    }
}

/// Formats `cents` with `template`, e.g. `format_money(123456, "${{amount}}") == "$1,234.56"`.
pub fn format_money(cents: i64, template: &str) -> Result<String, MoneyFormatError> {
    Ok(MoneyFormat::parse(template)?.format(cents))
}

fn format_amount(cents: i64, placeholder: Placeholder) -> String {
    let (thousands, decimal) = placeholder.delimiters();
    let negative = cents < 0;
    let abs = cents.unsigned_abs();

    // Round half up on the minor units when dropping the decimals.
    let (whole, fraction) = match placeholder.precision() {
        0 => ((abs + 50) / 100, None),
        _ => (abs / 100, Some(abs % 100)),
    };

    let mut buf = itoa::Buffer::new();
    let digits = buf.format(whole);

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    if negative && (whole > 0 || fraction.is_some_and(|f| f > 0)) {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(thousands);
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push(decimal);
        if fraction < 10 {
            out.push('0');
        }
        out.push_str(buf.format(fraction));
    }
    out
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{CartView, LineView, Template};

const DEFAULT_NAME_WIDTH: usize = 28;

/// Plain-text cart listing, one line per item followed by the subtotal.
///
/// Used by the demo binary and tests; storefront themes supply their own [`Template`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextTemplate {
    name_width: usize,
}

impl Default for TextTemplate {
    fn default() -> Self {
        Self { name_width: DEFAULT_NAME_WIDTH }
    }
}

impl TextTemplate {
    pub fn with_name_width(name_width: usize) -> Self {
        Self { name_width }
    }

    fn render_line(&self, line: &LineView) -> String {
        let label = if line.variation.is_empty() {
            line.name.clone()
        } else {
            format!("{} ({})", line.name, line.variation)
        };
        let label = truncate_with_ellipsis(&label, self.name_width);
        let pad = self.name_width.saturating_sub(text_len(&label));
        format!(
            "{:>2}. {}{}  {:>5} {:>10}  [-> {} | +> {}]",
            line.line.get(),
            label,
            " ".repeat(pad),
            line.item_qty,
            line.price,
            line.item_minus,
            line.item_add
        )
    }
}

impl Template for TextTemplate {
    fn render(&self, view: &CartView) -> String {
        match view {
            CartView::Empty(empty) => {
                let follow_up =
                    if empty.cookies_disabled { empty.cookie_message } else { empty.continue_message };
                format!("{}\n{}", empty.message, follow_up)
            }
            CartView::Items(items) => {
                let mut lines: Vec<String> =
                    items.items.iter().map(|line| self.render_line(line)).collect();
                lines.push(format!("Subtotal: {}", items.total_price));
                lines.join("\n")
            }
        }
    }
}

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    let len = text_len(text);
    if len <= max_len {
        return text.to_owned();
    }

    if max_len == 1 {
        return "…".to_owned();
    }

    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::{text_len, truncate_with_ellipsis, TextTemplate};
    use crate::model::fixtures::cart_two_lines;
    use crate::model::Cart;
    use crate::view::{build_view, Template, ViewOptions, CONTINUE_MESSAGE, EMPTY_CART_MESSAGE};

    #[test]
    fn truncate_with_ellipsis_handles_small_widths() {
        assert_eq!(truncate_with_ellipsis("hello", 0), "");
        assert_eq!(truncate_with_ellipsis("hello", 1), "…");
        assert_eq!(truncate_with_ellipsis("h", 1), "h");
        assert_eq!(truncate_with_ellipsis("hello", 2), "h…");
    }

    #[test]
    fn truncate_with_ellipsis_counts_chars_not_bytes() {
        assert_eq!(text_len("αβγ"), 3);
        assert_eq!(truncate_with_ellipsis("αβγ", 2), "α…");
    }

    #[test]
    fn renders_one_row_per_line_and_subtotal() {
        let view = build_view(&cart_two_lines(), &ViewOptions::default(), false);
        let out = TextTemplate::default().render(&view);
        let rows: Vec<&str> = out.lines().collect();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with(" 1. Linen Shirt (Blue / M)"));
        assert!(rows[0].contains("2 x"));
        assert!(rows[0].ends_with("[-> 1 | +> 3]"));
        assert!(rows[1].starts_with(" 2. Canvas Tote"));
        assert_eq!(rows[2], "Subtotal: $44.99");
    }

    #[test]
    fn long_names_are_truncated() {
        let view = build_view(&cart_two_lines(), &ViewOptions::default(), false);
        let out = TextTemplate::with_name_width(8).render(&view);
        assert!(out.lines().next().unwrap().starts_with(" 1. Linen S…"));
    }

    #[test]
    fn empty_cart_mentions_cookies_only_when_disabled() {
        let template = TextTemplate::default();
        let out = template.render(&build_view(&Cart::empty(), &ViewOptions::default(), false));
        assert_eq!(out, format!("{EMPTY_CART_MESSAGE}\n{CONTINUE_MESSAGE}"));

        let out = template.render(&build_view(&Cart::empty(), &ViewOptions::default(), true));
        assert!(out.ends_with("Enable cookies to use the shopping cart"));
    }
}

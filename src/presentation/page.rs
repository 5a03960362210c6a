// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::LineNumber;

use super::SurfaceContent;

/// Horizontal placement of an element in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub width: u32,
}

impl Bounds {
    pub fn center(self) -> i32 {
        self.left.saturating_add(i32::try_from(self.width / 2).unwrap_or(i32::MAX))
    }
}

/// Measurements and side effects the host document provides.
pub trait Page: Send + 'static {
    /// Outer height of the cart container once `content` is in place.
    fn cart_content_height(&self, content: &SurfaceContent) -> u32;
    fn toggle_button_bounds(&self) -> Option<Bounds>;
    fn modal_panel_width(&self) -> u32;
    fn scroll_offset(&self) -> u32;
    fn scroll_to_top(&mut self);
    /// Probed once at startup.
    fn cookies_enabled(&self) -> bool;
    /// Select the text of a quantity field (`None`: a field outside any cart line).
    fn select_quantity_text(&mut self, line: Option<LineNumber>);
}

/// In-memory [`Page`] whose content height is a fixed height per rendered text line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessPage {
    pub line_height: u32,
    pub toggle_button: Option<Bounds>,
    pub modal_width: u32,
    pub scroll: u32,
    pub cookies: bool,
    scroll_resets: usize,
    selections: Vec<Option<LineNumber>>,
}

impl Default for HeadlessPage {
    fn default() -> Self {
        Self {
            line_height: 24,
            toggle_button: Some(Bounds { left: 900, width: 80 }),
            modal_width: 640,
            scroll: 0,
            cookies: true,
            scroll_resets: 0,
            selections: Vec::new(),
        }
    }
}

impl HeadlessPage {
    pub fn without_cookies() -> Self {
        Self { cookies: false, ..Self::default() }
    }

    /// A page already scrolled `scroll` pixels down.
    pub fn scrolled(scroll: u32) -> Self {
        Self { scroll, ..Self::default() }
    }

    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets
    }

    pub fn selections(&self) -> &[Option<LineNumber>] {
        &self.selections
    }
}

impl Page for HeadlessPage {
    fn cart_content_height(&self, content: &SurfaceContent) -> u32 {
        let lines = content.markup().map(|markup| markup.lines().count()).unwrap_or(0);
        u32::try_from(lines).unwrap_or(u32::MAX).saturating_mul(self.line_height)
    }

    fn toggle_button_bounds(&self) -> Option<Bounds> {
        self.toggle_button
    }

    fn modal_panel_width(&self) -> u32 {
        self.modal_width
    }

    fn scroll_offset(&self) -> u32 {
        self.scroll
    }

    fn scroll_to_top(&mut self) {
        self.scroll = 0;
        self.scroll_resets += 1;
    }

    fn cookies_enabled(&self) -> bool {
        self.cookies
    }

    fn select_quantity_text(&mut self, line: Option<LineNumber>) {
        self.selections.push(line);
    }
}

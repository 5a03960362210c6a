// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Presentation controller.
//!
//! Owns the open/closed state of the single cart surface for the configured mode: sizing and
//! caret placement for the drawer, centering for the modal, the flip button's faces, and the
//! visibility callback. Visibility is read from the surface itself, never from a separate flag.

mod page;
mod surface;

use crate::config::{CartConfig, PresentationMode, ToggleCallback, ToggleEvent};

pub use page::{Bounds, HeadlessPage, Page};
pub use surface::{AddButtonState, CartBadge, FlipState, RowState, Surface, SurfaceContent};

/// Follow-up an open request needs after the surface was revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenPlan {
    /// Nothing to fetch.
    Ready,
    /// Fetch the cart and rebuild the content only.
    Rebuild,
    /// Fetch the cart and run the full update (badges, build, reveal).
    Update,
}

#[derive(Clone)]
pub struct PresentationController {
    mode: PresentationMode,
    on_toggle: Option<ToggleCallback>,
}

impl std::fmt::Debug for PresentationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationController")
            .field("mode", &self.mode)
            .field("on_toggle", &self.on_toggle.is_some())
            .finish()
    }
}

impl PresentationController {
    pub fn new(config: &CartConfig) -> Self {
        Self { mode: config.mode.clone(), on_toggle: config.on_toggle().cloned() }
    }

    pub fn mode(&self) -> &PresentationMode {
        &self.mode
    }

    /// Startup: cookie probe and initial caret placement.
    pub fn setup<P: Page>(&self, surface: &mut Surface, page: &P) {
        surface.cookies_disabled = !page.cookies_enabled();
        if self.mode.uses_drawer() {
            self.position_caret(surface, page);
        }
    }

    pub fn position_caret<P: Page>(&self, surface: &mut Surface, page: &P) {
        if let Some(bounds) = page.toggle_button_bounds() {
            surface.caret_left = Some(bounds.center());
        }
    }

    pub fn size_drawer<P: Page>(&self, surface: &mut Surface, page: &P) {
        surface.height_px = Some(page.cart_content_height(&surface.content));
    }

    pub fn collapse_drawer(&self, surface: &mut Surface) {
        surface.height_px = Some(0);
    }

    pub fn reveal_drawer<P: Page>(&self, surface: &mut Surface, page: &mut P) {
        surface.visible = true;
        scroll_top(page);
        self.notify(true);
    }

    /// Clears the explicit height along with the visibility.
    pub fn hide_drawer<P: Page>(&self, surface: &mut Surface, page: &mut P) {
        surface.height_px = None;
        surface.visible = false;
        scroll_top(page);
        self.notify(false);
    }

    /// Centers the modal panel and shows it.
    ///
    /// `resizing` recenters without reporting a toggle, but only when the panel was already
    /// showing; a hidden panel that becomes visible always reports one.
    pub fn size_modal<P: Page>(&self, surface: &mut Surface, page: &mut P, resizing: bool) {
        let was_visible = surface.visible;
        let half = i32::try_from(page.modal_panel_width() / 2).unwrap_or(i32::MAX);
        surface.modal_margin_left = Some(-half);
        surface.visible = true;
        scroll_top(page);
        if !resizing || !was_visible {
            self.notify(true);
        }
    }

    pub fn hide_modal(&self, surface: &mut Surface) {
        surface.visible = false;
        self.notify(false);
    }

    /// Closes the surface in whatever mode it is shown.
    pub fn hide<P: Page>(&self, surface: &mut Surface, page: &mut P) {
        match self.mode {
            PresentationMode::Modal => self.hide_modal(surface),
            PresentationMode::Drawer { .. } | PresentationMode::Flip { .. } => {
                self.hide_drawer(surface, page)
            }
            PresentationMode::Page => {}
        }
    }

    /// Opens the surface.
    ///
    /// `toggle` is set when the shopper asked for it (toggle button, "view cart" link) rather than
    /// an add completing. Drawers are revealed right away and filled once the returned plan ran;
    /// an unbuilt modal stays hidden until its content is sized.
    pub fn open<P: Page>(&self, surface: &mut Surface, page: &mut P, toggle: bool) -> OpenPlan {
        match self.mode {
            PresentationMode::Page => OpenPlan::Ready,
            PresentationMode::Modal => {
                if !surface.built && toggle {
                    OpenPlan::Update
                } else {
                    self.size_modal(surface, page, false);
                    OpenPlan::Ready
                }
            }
            PresentationMode::Flip { .. } => {
                self.reveal_drawer(surface, page);
                OpenPlan::Rebuild
            }
            PresentationMode::Drawer { .. } => {
                let plan = if !surface.built && toggle {
                    OpenPlan::Update
                } else {
                    if surface.built && toggle {
                        self.size_drawer(surface, page);
                    }
                    OpenPlan::Ready
                };
                self.reveal_drawer(surface, page);
                plan
            }
        }
    }

    /// Sizing after the content was replaced.
    pub fn after_build<P: Page>(&self, surface: &mut Surface, page: &mut P, empty: bool) {
        match self.mode {
            PresentationMode::Modal => self.size_modal(surface, page, empty),
            PresentationMode::Drawer { .. } | PresentationMode::Flip { .. } => {
                self.size_drawer(surface, page);
                if empty && !surface.visible && surface.built {
                    self.collapse_drawer(surface);
                }
            }
            PresentationMode::Page => {}
        }
        if !empty {
            surface.built = true;
        }
    }

    /// All cart images finished loading. A rendered cart without thumbnails has nothing to wait
    /// for and was sized when it was built.
    pub fn images_loaded<P: Page>(&self, surface: &mut Surface, page: &mut P) -> bool {
        if matches!(surface.content, SurfaceContent::Unbuilt) {
            return false;
        }
        if surface.content.view().is_some_and(|view| !view.has_images()) {
            return false;
        }
        match self.mode {
            PresentationMode::Modal => {
                let resizing = surface.visible;
                self.size_modal(surface, page, resizing);
                true
            }
            PresentationMode::Drawer { .. } | PresentationMode::Flip { .. } => {
                self.size_drawer(surface, page);
                true
            }
            PresentationMode::Page => false,
        }
    }

    /// Debounced window resize. Only a visible drawer follows the toggle button.
    pub fn resize_settled<P: Page>(&self, surface: &mut Surface, page: &P) -> bool {
        if !self.mode.uses_drawer() || !surface.visible {
            return false;
        }
        self.position_caret(surface, page);
        self.size_drawer(surface, page);
        true
    }

    /// Immediate window resize or orientation change. Only a visible modal recenters.
    pub fn resize_immediate<P: Page>(&self, surface: &mut Surface, page: &mut P) -> bool {
        if !self.mode.is_modal() || !surface.visible {
            return false;
        }
        self.size_modal(surface, page, true);
        true
    }

    pub fn begin_flip(&self, surface: &mut Surface) {
        if self.mode.is_flip() {
            surface.flip.loading = true;
        }
    }

    pub fn complete_flip(&self, surface: &mut Surface) {
        if self.mode.is_flip() {
            surface.flip.loading = false;
            surface.flip.flipped = true;
        }
    }

    pub fn abort_flip(&self, surface: &mut Surface) {
        if self.mode.is_flip() {
            surface.flip.loading = false;
        }
    }

    /// A variant-selecting control changed; the button shows its add-to-cart face again.
    pub fn revert_flip(&self, surface: &mut Surface) -> bool {
        if !self.mode.is_flip() {
            return false;
        }
        surface.flip.flipped = false;
        true
    }

    /// Scrolls the page back to the top if it is scrolled.
    pub fn scroll_top<P: Page>(&self, page: &mut P) {
        scroll_top(page);
    }

    fn notify(&self, is_visible: bool) {
        tracing::debug!(is_visible, "cart surface toggled");
        if let Some(on_toggle) = &self.on_toggle {
            on_toggle(ToggleEvent { is_visible });
        }
    }
}

fn scroll_top<P: Page>(page: &mut P) {
    if page.scroll_offset() > 0 {
        page.scroll_to_top();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rstest::{fixture, rstest};

    use super::{Bounds, HeadlessPage, OpenPlan, PresentationController, Surface, SurfaceContent};
    use crate::config::{CartConfig, CartSettings, ToggleEvent};

    fn controller(method: &str) -> (PresentationController, Arc<Mutex<Vec<bool>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let config = CartSettings { method: method.to_owned(), ..CartSettings::default() }
            .validate()
            .expect("settings")
            .with_toggle_callback(Arc::new(move |event: ToggleEvent| {
                sink.lock().unwrap().push(event.is_visible)
            }));
        (PresentationController::new(&config), events)
    }

    fn rendered(lines: usize) -> SurfaceContent {
        SurfaceContent::Fragment {
            markup: vec!["row"; lines].join("\n"),
            selector: "[data-cart-form]".to_owned(),
        }
    }

    #[fixture]
    fn page() -> HeadlessPage {
        HeadlessPage::scrolled(300)
    }

    #[rstest]
    fn setup_probes_cookies_and_places_caret(page: HeadlessPage) {
        let (drawer, _) = controller("drawer");
        let mut surface = Surface::default();
        drawer.setup(&mut surface, &page);
        assert_eq!(surface.caret_left(), Some(940));
        assert!(!surface.cookies_disabled());

        let mut surface = Surface::default();
        drawer.setup(&mut surface, &HeadlessPage::without_cookies());
        assert!(surface.cookies_disabled());
    }

    #[rstest]
    fn first_drawer_open_reveals_and_asks_for_update(mut page: HeadlessPage) {
        let (drawer, events) = controller("drawer");
        let mut surface = Surface::default();

        assert_eq!(drawer.open(&mut surface, &mut page, true), OpenPlan::Update);
        assert!(surface.is_visible());
        assert_eq!(page.scroll_resets(), 1);
        assert_eq!(*events.lock().unwrap(), vec![true]);
    }

    #[rstest]
    fn later_drawer_open_only_resizes(mut page: HeadlessPage) {
        let (drawer, _) = controller("drawer");
        let mut surface = Surface::default();
        surface.set_content(rendered(3));
        drawer.after_build(&mut surface, &mut page, false);
        drawer.hide_drawer(&mut surface, &mut page);
        assert_eq!(surface.height_px(), None);

        assert_eq!(drawer.open(&mut surface, &mut page, true), OpenPlan::Ready);
        assert_eq!(surface.height_px(), Some(72));
    }

    #[rstest]
    fn flip_open_always_rebuilds(mut page: HeadlessPage) {
        let (flip, _) = controller("flip");
        let mut surface = Surface { built: true, ..Surface::default() };
        assert_eq!(flip.open(&mut surface, &mut page, true), OpenPlan::Rebuild);
        assert!(surface.is_visible());
    }

    #[rstest]
    fn unbuilt_modal_waits_for_content(mut page: HeadlessPage) {
        let (modal, events) = controller("modal");
        let mut surface = Surface::default();

        assert_eq!(modal.open(&mut surface, &mut page, true), OpenPlan::Update);
        assert!(!surface.is_visible());

        surface.set_content(rendered(2));
        modal.after_build(&mut surface, &mut page, false);
        assert!(surface.is_visible());
        assert_eq!(surface.modal_margin_left(), Some(-320));
        assert_eq!(*events.lock().unwrap(), vec![true]);
    }

    #[rstest]
    fn modal_recenters_only_while_visible(mut page: HeadlessPage) {
        let (modal, events) = controller("modal");
        let mut surface = Surface::default();
        assert!(!modal.resize_immediate(&mut surface, &mut page));

        modal.size_modal(&mut surface, &mut page, false);
        page.modal_width = 500;
        assert!(modal.resize_immediate(&mut surface, &mut page));
        assert_eq!(surface.modal_margin_left(), Some(-250));
        assert_eq!(*events.lock().unwrap(), vec![true]);
    }

    #[rstest]
    fn empty_modal_build_still_reports_showing(mut page: HeadlessPage) {
        let (modal, events) = controller("modal");
        let mut surface = Surface::default();
        assert_eq!(modal.open(&mut surface, &mut page, true), OpenPlan::Update);

        surface.set_content(rendered(2));
        modal.after_build(&mut surface, &mut page, true);
        assert!(surface.is_visible());
        assert_eq!(*events.lock().unwrap(), vec![true]);

        surface.set_content(rendered(2));
        modal.after_build(&mut surface, &mut page, true);
        assert_eq!(*events.lock().unwrap(), vec![true]);
    }

    #[rstest]
    fn empty_build_collapses_hidden_drawer(mut page: HeadlessPage) {
        let (drawer, _) = controller("drawer");
        let mut surface = Surface::default();
        surface.set_content(rendered(4));
        drawer.after_build(&mut surface, &mut page, false);
        drawer.hide_drawer(&mut surface, &mut page);

        surface.set_content(rendered(2));
        drawer.after_build(&mut surface, &mut page, true);
        assert_eq!(surface.height_px(), Some(0));
        assert!(surface.is_built());
    }

    #[rstest]
    fn empty_build_keeps_visible_drawer_sized(mut page: HeadlessPage) {
        let (drawer, _) = controller("drawer");
        let mut surface = Surface { visible: true, built: true, ..Surface::default() };
        surface.set_content(rendered(2));
        drawer.after_build(&mut surface, &mut page, true);
        assert_eq!(surface.height_px(), Some(48));
    }

    #[rstest]
    fn settled_resize_follows_toggle_button(mut page: HeadlessPage) {
        let (drawer, _) = controller("drawer");
        let mut surface = Surface::default();
        assert!(!drawer.resize_settled(&mut surface, &page));

        drawer.reveal_drawer(&mut surface, &mut page);
        page.toggle_button = Some(Bounds { left: 100, width: 40 });
        assert!(drawer.resize_settled(&mut surface, &page));
        assert_eq!(surface.caret_left(), Some(120));
    }

    #[test]
    fn flip_faces_only_change_in_flip_mode() {
        let (flip, _) = controller("flip");
        let mut surface = Surface::default();
        flip.begin_flip(&mut surface);
        assert!(surface.flip().loading);
        flip.complete_flip(&mut surface);
        assert!(surface.flip().flipped && !surface.flip().loading);
        assert!(flip.revert_flip(&mut surface));
        assert!(!surface.flip().flipped);

        let (drawer, _) = controller("drawer");
        let mut surface = Surface::default();
        drawer.begin_flip(&mut surface);
        assert!(!surface.flip().loading);
        assert!(!drawer.revert_flip(&mut surface));
    }

    #[test]
    fn default_config_builds_a_drawer_controller() {
        let controller = PresentationController::new(&CartConfig::default());
        assert!(controller.mode().uses_drawer());
    }
}

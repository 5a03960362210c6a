// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cart synchronizer.
//!
//! Consumes [`UiEvent`]s and keeps the cart surface in step with the remote cart. The only mutual
//! exclusion is the busy flag: it is checked and set under the state lock before a mutating
//! handler first suspends, and events that find it set are dropped. Every mutation re-derives the
//! surface from the next server snapshot; nothing is counted locally.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::{AddItemRequest, CartApi, CartClient, CartError};
use crate::config::{CartConfig, CartSource, PresentationMode};
use crate::model::{Cart, LineNumber};
use crate::presentation::{
    AddButtonState, CartBadge, OpenPlan, Page, PresentationController, Surface, SurfaceContent,
};
use crate::stepper::{self, StepDirection, StepperAction, StepperKind};
use crate::view::{build_view, Template, TextTemplate};

/// Named interactions raised by the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    AddFormSubmitted(AddItemRequest),
    /// The cart page form (update/checkout) is about to submit.
    CartFormSubmitted,
    ToggleClicked,
    /// The flip container's "view cart" link.
    ViewCartClicked,
    CloseClicked,
    OverlayClicked,
    EscapePressed,
    /// A standalone `kind`'s minimum is replaced by the one `product_page` selects.
    StepperClicked { kind: StepperKind, direction: StepDirection, value: String },
    QuantityChanged { kind: StepperKind, value: String },
    QuantityFocused { line: Option<LineNumber> },
    /// Remove link; without a line the link navigates normally.
    RemoveClicked { line: Option<LineNumber> },
    NoteChanged(String),
    WindowResized,
    OrientationChanged,
    /// A checkbox, radio or select inside the add-to-cart form.
    VariantControlChanged,
    ImagesLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Busy,
    CookiesDisabled,
    NotVisible,
    NotApplicable,
}

/// What the host should do after an event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Handled,
    /// Write this value into the quantity field.
    SetQuantity(u32),
    Ignored(IgnoreReason),
    /// Let the browser perform the default action.
    Passthrough,
    /// The request failed; the error was already reported on the surface.
    Failed(CartError),
}

struct SyncState<P> {
    busy: bool,
    surface: Surface,
    page: P,
    resize_generation: u64,
}

impl<P> SyncState<P> {
    fn mutation_blocked(&self) -> Option<IgnoreReason> {
        if self.busy {
            Some(IgnoreReason::Busy)
        } else if self.surface.cookies_disabled {
            Some(IgnoreReason::CookiesDisabled)
        } else {
            None
        }
    }
}

fn lock<P>(state: &Mutex<SyncState<P>>) -> MutexGuard<'_, SyncState<P>> {
    state.lock().expect("cart state lock poisoned")
}

struct Inner<A, P> {
    client: CartClient<A>,
    config: CartConfig,
    controller: PresentationController,
    template: Arc<dyn Template>,
    state: Arc<Mutex<SyncState<P>>>,
}

pub struct CartSynchronizer<A, P> {
    inner: Arc<Inner<A, P>>,
}

impl<A, P> Clone for CartSynchronizer<A, P> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<A, P> CartSynchronizer<A, P>
where
    A: CartApi + 'static,
    P: Page,
{
    pub fn new(api: A, page: P, config: CartConfig) -> Self {
        Self::with_template(api, page, config, Arc::new(TextTemplate::default()))
    }

    pub fn with_template(
        api: A,
        page: P,
        config: CartConfig,
        template: Arc<dyn Template>,
    ) -> Self {
        let controller = PresentationController::new(&config);
        let mut surface = Surface::default();
        controller.setup(&mut surface, &page);
        if surface.cookies_disabled {
            tracing::info!("cookies disabled; cart mutations are off");
        }

        let state =
            Arc::new(Mutex::new(SyncState { busy: false, surface, page, resize_generation: 0 }));
        let sink = Arc::clone(&state);
        let client = CartClient::new(api).with_error_handler(Arc::new(move |err: &CartError| {
            tracing::warn!(error = %err, "cart request failed");
            lock(&sink).surface.alert = Some(err.to_string());
        }));

        Self { inner: Arc::new(Inner { client, config, controller, template, state }) }
    }

    pub fn config(&self) -> &CartConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &CartClient<A> {
        &self.inner.client
    }

    pub fn is_busy(&self) -> bool {
        self.lock().busy
    }

    /// Snapshot of the cart surface.
    pub fn surface(&self) -> Surface {
        self.lock().surface.clone()
    }

    /// Access to the host page, e.g. to update measurements before a resize event.
    pub fn with_page<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut self.lock().page)
    }

    pub async fn handle(&self, event: UiEvent) -> EventOutcome {
        tracing::trace!(?event, "ui event");
        match event {
            UiEvent::AddFormSubmitted(request) => self.add(request).await,
            UiEvent::CartFormSubmitted => self.cart_form_submitted(),
            UiEvent::ToggleClicked => self.toggle().await,
            UiEvent::ViewCartClicked => self.view_cart().await,
            UiEvent::CloseClicked | UiEvent::OverlayClicked => self.close_modal(),
            UiEvent::EscapePressed => self.escape(),
            UiEvent::StepperClicked { kind, direction, value } => {
                self.stepper_clicked(kind, direction, &value).await
            }
            UiEvent::QuantityChanged { kind, value } => self.quantity_changed(kind, &value).await,
            UiEvent::QuantityFocused { line } => self.quantity_focused(line).await,
            UiEvent::RemoveClicked { line: Some(line) } if self.inner.config.ajax_enabled() => {
                self.change_quantity(line, 0).await
            }
            UiEvent::RemoveClicked { .. } => EventOutcome::Passthrough,
            UiEvent::NoteChanged(note) => self.note_changed(&note).await,
            UiEvent::WindowResized => self.window_resized(),
            UiEvent::OrientationChanged => self.orientation_changed(),
            UiEvent::VariantControlChanged => self.variant_control_changed(),
            UiEvent::ImagesLoaded => self.images_loaded(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SyncState<P>> {
        lock(&self.inner.state)
    }

    fn finish(&self) {
        self.lock().busy = false;
        tracing::debug!("cart idle");
    }

    async fn add(&self, request: AddItemRequest) -> EventOutcome {
        if !self.inner.config.ajax_enabled() {
            return EventOutcome::Passthrough;
        }
        {
            let mut state = self.lock();
            if let Some(reason) = state.mutation_blocked() {
                tracing::trace!(?reason, "add dropped");
                return EventOutcome::Ignored(reason);
            }
            state.busy = true;
            state.surface.alert = None;
            state.surface.inline_error = None;
            state.surface.add_button = AddButtonState::Adding;
            self.inner.controller.begin_flip(&mut state.surface);
        }
        tracing::debug!("cart busy: adding item");

        let result = self
            .inner
            .client
            .add_item_with(&request, &|err: &CartError| self.report_add_error(err))
            .await;

        let outcome = match result {
            Ok(item) => {
                tracing::debug!(variant = %item.variant_id, quantity = item.quantity, "item added");
                self.lock().surface.add_button = AddButtonState::Added;
                if self.inner.config.mode.is_flip() {
                    let ((), outcome) =
                        tokio::join!(self.flip_after_delay(), self.fetch_and_update());
                    outcome
                } else {
                    self.fetch_and_update().await
                }
            }
            Err(err) => {
                let mut state = self.lock();
                state.surface.add_button = AddButtonState::Idle;
                self.inner.controller.abort_flip(&mut state.surface);
                EventOutcome::Failed(err)
            }
        };

        self.finish();
        outcome
    }

    /// Quantity failures go next to the form; everything else is an alert.
    fn report_add_error(&self, err: &CartError) {
        tracing::warn!(error = %err, "add to cart failed");
        let mut state = self.lock();
        match err.validation() {
            Some(validation) if validation.is_unprocessable() => {
                state.surface.inline_error = Some(validation.clone());
            }
            _ => state.surface.alert = Some(err.to_string()),
        }
    }

    async fn flip_after_delay(&self) {
        tokio::time::sleep(self.inner.config.timings.flip).await;
        self.inner.controller.complete_flip(&mut self.lock().surface);
    }

    async fn fetch_and_update(&self) -> EventOutcome {
        match self.inner.client.get_cart().await {
            Ok(cart) => {
                self.cart_updated(&cart).await;
                EventOutcome::Handled
            }
            Err(err) => EventOutcome::Failed(err),
        }
    }

    /// Badges, then a rebuild; a drawer is revealed if it is not open yet.
    async fn cart_updated(&self, cart: &Cart) {
        {
            let mut state = self.lock();
            state.surface.badge = CartBadge::from_cart(cart, &self.inner.config.view.money_format);
            if self.inner.config.mode.is_flip() {
                state.surface.flip.view_cart_count = Some(cart.item_count);
                return;
            }
        }

        self.build(cart).await;

        if matches!(self.inner.config.mode, PresentationMode::Drawer { .. }) {
            let mut guard = self.lock();
            let state = &mut *guard;
            if state.surface.visible {
                self.inner.controller.scroll_top(&mut state.page);
            } else {
                self.inner.controller.open(&mut state.surface, &mut state.page, false);
            }
        }
    }

    async fn rebuild(&self) -> EventOutcome {
        match self.inner.client.get_cart().await {
            Ok(cart) => {
                self.build(&cart).await;
                EventOutcome::Handled
            }
            Err(err) => EventOutcome::Failed(err),
        }
    }

    /// Replaces the surface content with `cart` and sizes it.
    async fn build(&self, cart: &Cart) {
        let empty = cart.item_count == 0 || cart.items.is_empty();
        let content = match &self.inner.config.source {
            CartSource::ServerFragment { cart_url, form_selector } if !empty => {
                match self.inner.client.fetch_cart_fragment(cart_url).await {
                    Ok(markup) => {
                        SurfaceContent::Fragment { markup, selector: form_selector.clone() }
                    }
                    Err(_) => return,
                }
            }
            _ => {
                let cookies_disabled = self.lock().surface.cookies_disabled;
                let view = build_view(cart, &self.inner.config.view, cookies_disabled);
                let markup = self.inner.template.render(&view);
                SurfaceContent::Rendered { view, markup }
            }
        };

        let mut guard = self.lock();
        let state = &mut *guard;
        state.surface.set_content(content);
        self.inner.controller.after_build(&mut state.surface, &mut state.page, empty);
        tracing::debug!(items = cart.items.len(), rev = state.surface.render_rev, "cart rendered");
    }

    /// Marks the row, waits for the row animation, sends the change, then re-renders from a fresh
    /// snapshot once the settle delay passed.
    async fn change_quantity(&self, line: LineNumber, quantity: u32) -> EventOutcome {
        {
            let mut state = self.lock();
            if let Some(reason) = state.mutation_blocked() {
                tracing::trace!(?reason, %line, quantity, "quantity change dropped");
                return EventOutcome::Ignored(reason);
            }
            state.busy = true;
            state.surface.alert = None;
            state.surface.mark_row(line, quantity == 0);
        }
        tracing::debug!(%line, quantity, "cart busy: changing quantity");

        tokio::time::sleep(self.inner.config.timings.row_animation).await;
        let outcome = match self.inner.client.change_item(line, quantity).await {
            Ok(cart) => {
                let mut guard = self.lock();
                let state = &mut *guard;
                state.surface.badge =
                    CartBadge::from_cart(&cart, &self.inner.config.view.money_format);
                if cart.item_count == 0 && self.inner.config.mode.uses_drawer() {
                    self.inner.controller.hide_drawer(&mut state.surface, &mut state.page);
                }
                EventOutcome::Handled
            }
            Err(err) => EventOutcome::Failed(err),
        };

        tokio::time::sleep(self.inner.config.timings.settle).await;
        self.finish();
        // A failed refresh was already reported; the change outcome stands.
        let _ = self.rebuild().await;
        outcome
    }

    fn cart_form_submitted(&self) -> EventOutcome {
        if self.lock().busy {
            EventOutcome::Ignored(IgnoreReason::Busy)
        } else {
            EventOutcome::Passthrough
        }
    }

    async fn toggle(&self) -> EventOutcome {
        if !self.inner.config.ajax_enabled() {
            return EventOutcome::Passthrough;
        }
        let plan = {
            let mut guard = self.lock();
            let state = &mut *guard;
            if state.surface.visible {
                self.inner.controller.hide(&mut state.surface, &mut state.page);
                return EventOutcome::Handled;
            }
            self.inner.controller.open(&mut state.surface, &mut state.page, true)
        };
        self.run_plan(plan).await
    }

    async fn view_cart(&self) -> EventOutcome {
        if !self.inner.config.ajax_enabled() || !self.inner.config.mode.is_flip() {
            return EventOutcome::Ignored(IgnoreReason::NotApplicable);
        }
        let plan = {
            let mut guard = self.lock();
            let state = &mut *guard;
            self.inner.controller.open(&mut state.surface, &mut state.page, true)
        };
        self.run_plan(plan).await
    }

    async fn run_plan(&self, plan: OpenPlan) -> EventOutcome {
        match plan {
            OpenPlan::Ready => EventOutcome::Handled,
            OpenPlan::Rebuild => self.rebuild().await,
            OpenPlan::Update => self.fetch_and_update().await,
        }
    }

    fn close_modal(&self) -> EventOutcome {
        if !self.inner.config.ajax_enabled() || !self.inner.config.mode.is_modal() {
            return EventOutcome::Ignored(IgnoreReason::NotApplicable);
        }
        self.inner.controller.hide_modal(&mut self.lock().surface);
        EventOutcome::Handled
    }

    fn escape(&self) -> EventOutcome {
        if !self.inner.config.ajax_enabled() {
            return EventOutcome::Passthrough;
        }
        let mut guard = self.lock();
        let state = &mut *guard;
        if !state.surface.visible {
            return EventOutcome::Ignored(IgnoreReason::NotVisible);
        }
        self.inner.controller.hide(&mut state.surface, &mut state.page);
        EventOutcome::Handled
    }

    async fn stepper_clicked(
        &self,
        kind: StepperKind,
        direction: StepDirection,
        value: &str,
    ) -> EventOutcome {
        if let Some(outcome) = self.stepper_guard(kind) {
            return outcome;
        }
        let kind = self.resolve_stepper(kind);
        self.apply_stepper(Some(stepper::click(kind, value, direction))).await
    }

    async fn quantity_changed(&self, kind: StepperKind, value: &str) -> EventOutcome {
        if let Some(outcome) = self.stepper_guard(kind) {
            return outcome;
        }
        let kind = self.resolve_stepper(kind);
        self.apply_stepper(stepper::input_changed(kind, value)).await
    }

    /// Standalone steppers take their minimum from the configured page kind.
    fn resolve_stepper(&self, kind: StepperKind) -> StepperKind {
        match kind {
            StepperKind::Standalone { .. } => {
                StepperKind::standalone(self.inner.config.product_page)
            }
            StepperKind::CartBound { .. } => kind,
        }
    }

    /// Standalone steppers need quantity selectors enabled; cart steppers are inert while busy.
    fn stepper_guard(&self, kind: StepperKind) -> Option<EventOutcome> {
        match kind {
            StepperKind::Standalone { .. } if !self.inner.config.enable_qty_selectors => {
                Some(EventOutcome::Passthrough)
            }
            StepperKind::Standalone { .. } => None,
            StepperKind::CartBound { .. } => {
                self.lock().busy.then_some(EventOutcome::Ignored(IgnoreReason::Busy))
            }
        }
    }

    async fn apply_stepper(&self, action: Option<StepperAction>) -> EventOutcome {
        match action {
            None => EventOutcome::Handled,
            Some(StepperAction::SetLocal(quantity)) => EventOutcome::SetQuantity(quantity),
            Some(StepperAction::Change { .. }) if !self.inner.config.ajax_enabled() => {
                EventOutcome::Passthrough
            }
            Some(StepperAction::Change { line, quantity }) => {
                self.change_quantity(line, quantity).await
            }
        }
    }

    async fn quantity_focused(&self, line: Option<LineNumber>) -> EventOutcome {
        tokio::time::sleep(self.inner.config.timings.focus_select).await;
        self.lock().page.select_quantity_text(line);
        EventOutcome::Handled
    }

    /// Saved on every change; not held back by an in-flight mutation.
    async fn note_changed(&self, note: &str) -> EventOutcome {
        if self.lock().surface.cookies_disabled {
            return EventOutcome::Ignored(IgnoreReason::CookiesDisabled);
        }
        match self.inner.client.update_note(note).await {
            Ok(_) => EventOutcome::Handled,
            Err(err) => EventOutcome::Failed(err),
        }
    }

    fn window_resized(&self) -> EventOutcome {
        if !self.inner.config.ajax_enabled() {
            return EventOutcome::Passthrough;
        }
        if self.inner.config.mode.is_modal() {
            return self.orientation_changed();
        }

        let generation = {
            let mut state = self.lock();
            state.resize_generation += 1;
            state.resize_generation
        };
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.config.timings.resize_debounce).await;
            let mut guard = lock(&inner.state);
            if guard.resize_generation != generation {
                return;
            }
            let state = &mut *guard;
            if inner.controller.resize_settled(&mut state.surface, &state.page) {
                tracing::trace!(generation, "drawer resized");
            }
        });
        EventOutcome::Handled
    }

    fn orientation_changed(&self) -> EventOutcome {
        if !self.inner.config.mode.is_modal() {
            return EventOutcome::Ignored(IgnoreReason::NotApplicable);
        }
        let mut guard = self.lock();
        let state = &mut *guard;
        if self.inner.controller.resize_immediate(&mut state.surface, &mut state.page) {
            EventOutcome::Handled
        } else {
            EventOutcome::Ignored(IgnoreReason::NotVisible)
        }
    }

    fn variant_control_changed(&self) -> EventOutcome {
        if self.inner.controller.revert_flip(&mut self.lock().surface) {
            EventOutcome::Handled
        } else {
            EventOutcome::Ignored(IgnoreReason::NotApplicable)
        }
    }

    fn images_loaded(&self) -> EventOutcome {
        if !self.inner.config.ajax_enabled() {
            return EventOutcome::Ignored(IgnoreReason::NotApplicable);
        }
        let mut guard = self.lock();
        let state = &mut *guard;
        if self.inner.controller.images_loaded(&mut state.surface, &mut state.page) {
            EventOutcome::Handled
        } else {
            EventOutcome::Ignored(IgnoreReason::NotApplicable)
        }
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};

use ajaxcart::config::{CartSettings, Timings};
use ajaxcart::model::{LineNumber, VariantId};
use ajaxcart::presentation::HeadlessPage;
use ajaxcart::stub::{self, SharedStore, StubStore};
use ajaxcart::{AddItemRequest, CartApi, CartError, CartSynchronizer, EventOutcome, HttpCartApi, UiEvent};

struct StubServer {
    base_url: String,
    store: SharedStore,
    task: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl StubServer {
    async fn start() -> Self {
        let store: SharedStore = Arc::new(Mutex::new(StubStore::demo()));
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.expect("bind stub");
        let addr = listener.local_addr().expect("local addr");
        let task = tokio::spawn(stub::serve(listener, Arc::clone(&store)));
        Self { base_url: format!("http://{addr}"), store, task }
    }

    fn api(&self) -> HttpCartApi {
        HttpCartApi::new(&self.base_url)
    }

    fn item_count(&self) -> u32 {
        self.store.lock().expect("store lock").cart().item_count
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn line(n: u32) -> LineNumber {
    LineNumber::new(n).expect("line number")
}

#[tokio::test]
async fn add_change_and_note_round_trip_over_http() {
    let server = StubServer::start().await;
    let api = server.api();

    let empty = api.get_cart().await.expect("get cart");
    assert!(empty.is_empty());
    assert_eq!(empty.currency.as_deref(), Some("USD"));

    let added = api.add_item(&AddItemRequest::variant(VariantId(101), 2)).await.expect("add");
    assert_eq!(added.variant_id, VariantId(101));
    assert_eq!(added.quantity, 2);
    assert_eq!(added.line_price, 2500);

    let engraved = AddItemRequest::form([
        ("id", "101"),
        ("quantity", "1"),
        ("properties[Engraving]", "AB"),
    ]);
    api.add_item(&engraved).await.expect("add with properties");

    let cart = api.change_item(line(1), 5).await.expect("change");
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.items[0].quantity, 5);
    assert_eq!(cart.item_count, 6);
    assert_eq!(cart.total_price, 7500);

    let cart = api.change_item(line(2), 0).await.expect("remove");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(server.item_count(), 5);

    let cart = api.update_note("gift wrap please").await.expect("note");
    assert_eq!(cart.note.as_deref(), Some("gift wrap please"));
}

#[tokio::test]
async fn storefront_error_bodies_become_validation_errors() {
    let server = StubServer::start().await;
    let api = server.api();

    api.add_item(&AddItemRequest::variant(VariantId(303), 1)).await.expect("first mug");
    let err = api.add_item(&AddItemRequest::variant(VariantId(303), 1)).await.unwrap_err();
    let validation = err.validation().expect("validation error");
    assert!(validation.is_unprocessable());
    assert_eq!(validation.message, "Cart Error");
    assert_eq!(validation.description, "All 1 Enamel Mug are in your cart.");

    let err = api.add_item(&AddItemRequest::variant(VariantId(999), 1)).await.unwrap_err();
    assert_eq!(err.validation().map(|v| v.status), Some(404));

    let err = api.change_item(line(7), 1).await.unwrap_err();
    assert_eq!(err.validation().map(|v| v.status), Some(422));
}

#[tokio::test]
async fn oversized_quantities_are_rejected_and_the_store_keeps_serving() {
    let server = StubServer::start().await;
    let api = server.api();

    api.add_item(&AddItemRequest::variant(VariantId(101), u32::MAX)).await.expect("first add");
    let err = api.add_item(&AddItemRequest::variant(VariantId(101), u32::MAX)).await.unwrap_err();
    assert_eq!(err.validation().map(|v| v.status), Some(400));

    let cart = api.get_cart().await.expect("store still serves");
    assert_eq!(cart.item_count, u32::MAX);
}

#[tokio::test]
async fn cart_page_fragment_is_fetched_as_html() {
    let server = StubServer::start().await;
    let api = server.api();
    api.add_item(&AddItemRequest::variant(VariantId(202), 1)).await.expect("add tote");

    let page = api.fetch_cart_fragment("/cart").await.expect("cart page");
    assert!(page.contains("data-cart-form"));
    assert!(page.contains("Canvas Tote"));
}

#[tokio::test]
async fn unreachable_storefront_is_a_transport_error() {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = HttpCartApi::new(format!("http://{addr}")).get_cart().await.unwrap_err();
    assert!(matches!(err, CartError::Transport(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn synchronizer_drives_the_drawer_against_the_http_stub() {
    let server = StubServer::start().await;
    let config = CartSettings::default().validate().expect("config").with_timings(Timings::immediate());
    let sync = CartSynchronizer::new(server.api(), HeadlessPage::default(), config);

    let outcome = sync
        .handle(UiEvent::AddFormSubmitted(AddItemRequest::variant(VariantId(101), 1)))
        .await;
    assert_eq!(outcome, EventOutcome::Handled);

    let surface = sync.surface();
    assert!(surface.is_visible());
    assert_eq!(surface.badge().count, 1);
    assert_eq!(surface.view().map(|view| view.items().len()), Some(1));

    let outcome = sync.handle(UiEvent::RemoveClicked { line: Some(line(1)) }).await;
    assert_eq!(outcome, EventOutcome::Handled);
    assert_eq!(server.item_count(), 0);

    let surface = sync.surface();
    assert!(!surface.is_visible());
    assert!(surface.badge().count_hidden);
}

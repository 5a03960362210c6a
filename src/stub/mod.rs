// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-memory storefront.
//!
//! [`StubStore`] implements the remote cart contract; [`router`] serves it over HTTP and
//! [`LocalCartApi`] calls it in-process, optionally with simulated latency.

mod server;
mod store;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::client::{AddItemRequest, CartApi, CartError};
use crate::model::{Cart, LineItem, LineNumber};

pub use server::{router, serve};
pub use store::{StubError, StubStore, Variant};

pub type SharedStore = Arc<Mutex<StubStore>>;

pub(crate) fn lock_store(store: &Mutex<StubStore>) -> MutexGuard<'_, StubStore> {
    store.lock().expect("stub store lock poisoned")
}

#[derive(Debug, Clone)]
pub struct LocalCartApi {
    store: SharedStore,
    latency: Duration,
}

impl LocalCartApi {
    pub fn new(store: StubStore) -> Self {
        Self::shared(Arc::new(Mutex::new(store)))
    }

    pub fn shared(store: SharedStore) -> Self {
        Self { store, latency: Duration::ZERO }
    }

    /// Every call waits `latency` before touching the store.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl CartApi for LocalCartApi {
    async fn get_cart(&self) -> Result<Cart, CartError> {
        self.delay().await;
        let cart = lock_store(&self.store).cart();
        Ok(cart)
    }

    async fn add_item(&self, request: &AddItemRequest) -> Result<LineItem, CartError> {
        self.delay().await;
        let result = lock_store(&self.store).add(&request.to_pairs());
        Ok(result?)
    }

    async fn change_item(&self, line: LineNumber, quantity: u32) -> Result<Cart, CartError> {
        self.delay().await;
        let result = lock_store(&self.store).change(line.get(), quantity);
        Ok(result?)
    }

    async fn update_note(&self, note: &str) -> Result<Cart, CartError> {
        self.delay().await;
        let cart = lock_store(&self.store).update_note(note);
        Ok(cart)
    }

    async fn fetch_cart_fragment(&self, _cart_url: &str) -> Result<String, CartError> {
        self.delay().await;
        let page = lock_store(&self.store).cart_page();
        Ok(page)
    }
}

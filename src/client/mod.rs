// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Request layer for the remote cart resource.
//!
//! [`CartApi`] is the transport seam (HTTP via [`HttpCartApi`], in-process via
//! [`crate::stub::LocalCartApi`]). [`CartClient`] wraps any transport and routes every failure to
//! one configurable error handler, which a caller may override for a single call.

mod error;
mod http;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::model::{Cart, LineItem, LineNumber, VariantId};

pub use error::{CartError, ValidationError, UNPROCESSABLE};
pub(crate) use error::error_from_response;
pub use http::HttpCartApi;

/// What `/cart/add.js` receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddItemRequest {
    Variant { id: VariantId, quantity: u32 },
    /// Every field of the serialized add-to-cart form, in document order. Carries custom
    /// line-item properties (`properties[Engraving]`) alongside `id` and `quantity`.
    Form(Vec<(String, String)>),
}

impl AddItemRequest {
    /// `quantity` of zero is sent as one, like the storefront's own helper.
    pub fn variant(id: VariantId, quantity: u32) -> Self {
        Self::Variant { id, quantity: quantity.max(1) }
    }

    pub fn form<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Form-encoded body pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        match self {
            Self::Variant { id, quantity } => {
                vec![("quantity".to_owned(), quantity.to_string()), ("id".to_owned(), id.to_string())]
            }
            Self::Form(fields) => fields.clone(),
        }
    }
}

/// Transport for the fixed storefront cart contract.
pub trait CartApi: Send + Sync {
    /// `GET /cart.js`
    fn get_cart(&self) -> impl Future<Output = Result<Cart, CartError>> + Send;

    /// `POST /cart/add.js`
    fn add_item(
        &self,
        request: &AddItemRequest,
    ) -> impl Future<Output = Result<LineItem, CartError>> + Send;

    /// `POST /cart/change.js` (`quantity == 0` removes the line)
    fn change_item(
        &self,
        line: LineNumber,
        quantity: u32,
    ) -> impl Future<Output = Result<Cart, CartError>> + Send;

    /// `POST /cart/update.js`
    fn update_note(&self, note: &str) -> impl Future<Output = Result<Cart, CartError>> + Send;

    /// Server-rendered cart page markup, for hosts that render the cart from the theme template.
    fn fetch_cart_fragment(
        &self,
        cart_url: &str,
    ) -> impl Future<Output = Result<String, CartError>> + Send;
}

pub type ErrorHandler = Arc<dyn Fn(&CartError) + Send + Sync>;

/// Default handler: alert-level log line.
pub fn log_error_handler() -> ErrorHandler {
    Arc::new(|err: &CartError| {
        tracing::warn!(error = %err, "cart request failed");
    })
}

pub struct CartClient<A> {
    api: A,
    on_error: ErrorHandler,
}

impl<A> fmt::Debug for CartClient<A>
where
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartClient").field("api", &self.api).finish_non_exhaustive()
    }
}

impl<A: CartApi> CartClient<A> {
    pub fn new(api: A) -> Self {
        Self { api, on_error: log_error_handler() }
    }

    pub fn with_error_handler(mut self, on_error: ErrorHandler) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn get_cart(&self) -> Result<Cart, CartError> {
        let result = self.api.get_cart().await.and_then(consistent);
        self.route(result, None)
    }

    pub async fn add_item(&self, request: &AddItemRequest) -> Result<LineItem, CartError> {
        let result = self.api.add_item(request).await;
        self.route(result, None)
    }

    /// Like [`Self::add_item`], but failures go to `on_error` instead of the client handler.
    pub async fn add_item_with(
        &self,
        request: &AddItemRequest,
        on_error: &(dyn Fn(&CartError) + Send + Sync),
    ) -> Result<LineItem, CartError> {
        let result = self.api.add_item(request).await;
        self.route(result, Some(on_error))
    }

    pub async fn change_item(&self, line: LineNumber, quantity: u32) -> Result<Cart, CartError> {
        let result = self.api.change_item(line, quantity).await.and_then(consistent);
        self.route(result, None)
    }

    pub async fn update_note(&self, note: &str) -> Result<Cart, CartError> {
        let result = self.api.update_note(note).await.and_then(consistent);
        self.route(result, None)
    }

    pub async fn fetch_cart_fragment(&self, cart_url: &str) -> Result<String, CartError> {
        let result = self.api.fetch_cart_fragment(cart_url).await;
        self.route(result, None)
    }

    fn route<T>(
        &self,
        result: Result<T, CartError>,
        on_error: Option<&(dyn Fn(&CartError) + Send + Sync)>,
    ) -> Result<T, CartError> {
        if let Err(err) = &result {
            match on_error {
                Some(handler) => handler(err),
                None => (self.on_error)(err),
            }
        }
        result
    }
}

/// Rejects a snapshot whose `item_count` disagrees with its lines.
fn consistent(cart: Cart) -> Result<Cart, CartError> {
    if cart.is_consistent() {
        Ok(cart)
    } else {
        Err(CartError::Decode(format!(
            "item_count {} with {} line items",
            cart.item_count,
            cart.items.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{AddItemRequest, CartApi, CartClient, CartError};
    use crate::model::{Cart, LineItem, LineNumber, VariantId};
    use crate::stub::{LocalCartApi, StubStore};

    /// Answers every snapshot request with a count of two and no lines.
    struct MismatchedCount;

    impl CartApi for MismatchedCount {
        async fn get_cart(&self) -> Result<Cart, CartError> {
            Ok(Cart { item_count: 2, ..Cart::empty() })
        }

        async fn add_item(&self, _request: &AddItemRequest) -> Result<LineItem, CartError> {
            Err(CartError::Transport("unused".into()))
        }

        async fn change_item(&self, _line: LineNumber, _quantity: u32) -> Result<Cart, CartError> {
            self.get_cart().await
        }

        async fn update_note(&self, _note: &str) -> Result<Cart, CartError> {
            self.get_cart().await
        }

        async fn fetch_cart_fragment(&self, _cart_url: &str) -> Result<String, CartError> {
            Ok(String::new())
        }
    }

    fn client_with_log() -> (CartClient<LocalCartApi>, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let client = CartClient::new(LocalCartApi::new(StubStore::demo())).with_error_handler(
            Arc::new(move |err: &CartError| sink.lock().unwrap().push(err.to_string())),
        );
        (client, log)
    }

    #[test]
    fn variant_request_serializes_quantity_and_id() {
        let request = AddItemRequest::variant(VariantId(7), 0);
        assert_eq!(
            request.to_pairs(),
            vec![("quantity".to_owned(), "1".to_owned()), ("id".to_owned(), "7".to_owned())]
        );
    }

    #[test]
    fn form_request_keeps_every_field() {
        let request = AddItemRequest::form([
            ("id", "7"),
            ("quantity", "2"),
            ("properties[Engraving]", "J.D."),
        ]);
        assert_eq!(request.to_pairs().len(), 3);
        assert_eq!(request.to_pairs()[2].0, "properties[Engraving]");
    }

    #[tokio::test]
    async fn failures_go_to_the_client_handler() {
        let (client, log) = client_with_log();
        let line = LineNumber::new(9).unwrap();

        let result = client.change_item(line, 1).await;

        assert!(matches!(result, Err(CartError::Validation(_))));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn per_call_override_replaces_the_client_handler() {
        let (client, log) = client_with_log();
        let overridden = Mutex::new(Vec::new());

        let result = client
            .add_item_with(&AddItemRequest::variant(VariantId(999_999), 1), &|err: &CartError| {
                overridden.lock().unwrap().push(err.to_string());
            })
            .await;

        assert!(result.is_err());
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(overridden.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_then_get_reflects_the_requested_quantity() {
        let (client, _log) = client_with_log();
        let variant = StubStore::demo().variant_ids()[0];

        let line = client.add_item(&AddItemRequest::variant(variant, 2)).await.unwrap();
        let cart = client.get_cart().await.unwrap();

        assert_eq!(line.quantity, 2);
        assert_eq!(cart.item_count, 2);
        assert_eq!(cart.items[0].variant_id, variant);
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn inconsistent_snapshots_are_decode_errors() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let client = CartClient::new(MismatchedCount).with_error_handler(Arc::new(
            move |err: &CartError| sink.lock().unwrap().push(err.to_string()),
        ));

        assert!(matches!(client.get_cart().await, Err(CartError::Decode(_))));
        let line = LineNumber::new(1).unwrap();
        assert!(matches!(client.change_item(line, 1).await, Err(CartError::Decode(_))));
        assert!(matches!(client.update_note("hi").await, Err(CartError::Decode(_))));
        assert_eq!(log.lock().unwrap().len(), 3);
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::{error_from_response, AddItemRequest, CartApi, CartError};
use crate::model::{Cart, LineItem, LineNumber};

/// [`CartApi`] over HTTP against a storefront origin (e.g. `https://shop.example.com`).
#[derive(Debug, Clone)]
pub struct HttpCartApi {
    http: Client,
    base_url: String,
}

impl HttpCartApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        format!("{}{}", self.base_url, path)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<T, CartError> {
        tracing::debug!(endpoint, "cart request");
        let response = request.header(ACCEPT, "application/json").send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let body = response.text().await.unwrap_or_default();
        let err = error_from_response(status.as_u16(), &body);
        tracing::debug!(endpoint, status = status.as_u16(), error = %err, "cart request rejected");
        Err(err)
    }
}

impl CartApi for HttpCartApi {
    async fn get_cart(&self) -> Result<Cart, CartError> {
        self.send_json("/cart.js", self.http.get(self.url("/cart.js"))).await
    }

    async fn add_item(&self, request: &AddItemRequest) -> Result<LineItem, CartError> {
        let body = request.to_pairs();
        self.send_json("/cart/add.js", self.http.post(self.url("/cart/add.js")).form(&body)).await
    }

    async fn change_item(&self, line: LineNumber, quantity: u32) -> Result<Cart, CartError> {
        let body = [("quantity", quantity.to_string()), ("line", line.to_string())];
        self.send_json("/cart/change.js", self.http.post(self.url("/cart/change.js")).form(&body))
            .await
    }

    async fn update_note(&self, note: &str) -> Result<Cart, CartError> {
        let body = [("note", note)];
        self.send_json("/cart/update.js", self.http.post(self.url("/cart/update.js")).form(&body))
            .await
    }

    async fn fetch_cart_fragment(&self, cart_url: &str) -> Result<String, CartError> {
        tracing::debug!(cart_url, "cart fragment request");
        let response = self.http.get(self.url(cart_url)).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(error_from_response(status.as_u16(), &body))
        }
    }
}

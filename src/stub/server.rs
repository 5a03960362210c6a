// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;

use super::store::parse_count;
use super::{lock_store, SharedStore, StubError};
use crate::model::{Cart, LineItem};

impl IntoResponse for StubError {
    fn into_response(self) -> Response {
        let status = match self.status() {
            404 => StatusCode::NOT_FOUND,
            422 => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(self.to_validation())).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ChangeForm {
    line: Option<String>,
    quantity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateForm {
    #[serde(default)]
    note: String,
}

/// The storefront cart endpoints over `store`.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/cart.js", get(get_cart))
        .route("/cart/add.js", post(add_item))
        .route("/cart/change.js", post(change_item))
        .route("/cart/update.js", post(update_note))
        .route("/cart", get(cart_page))
        .with_state(store)
}

/// Serves [`router`] on `listener` until the task is dropped.
pub async fn serve(listener: TcpListener, store: SharedStore) -> std::io::Result<()> {
    axum::serve(listener, router(store)).await
}

async fn get_cart(State(store): State<SharedStore>) -> Json<Cart> {
    Json(lock_store(&store).cart())
}

async fn add_item(
    State(store): State<SharedStore>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Json<LineItem>, StubError> {
    let result = lock_store(&store).add(&fields);
    if let Err(err) = &result {
        tracing::debug!(error = %err, "add rejected");
    }
    result.map(Json)
}

async fn change_item(
    State(store): State<SharedStore>,
    Form(form): Form<ChangeForm>,
) -> Result<Json<Cart>, StubError> {
    let line = parse_count("line", form.line.as_deref())?;
    let quantity = parse_count("quantity", form.quantity.as_deref())?;
    let cart = lock_store(&store).change(line, quantity)?;
    Ok(Json(cart))
}

async fn update_note(State(store): State<SharedStore>, Form(form): Form<UpdateForm>) -> Json<Cart> {
    Json(lock_store(&store).update_note(&form.note))
}

async fn cart_page(State(store): State<SharedStore>) -> Html<String> {
    Html(lock_store(&store).cart_page())
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use crate::model::VariantId;
    use crate::stub::StubError;

    #[test]
    fn stub_errors_map_to_storefront_statuses() {
        assert_eq!(StubError::UnknownVariant(VariantId(1)).into_response().status(), 404);
        assert_eq!(
            StubError::OutOfStock { title: "Mug".into(), available: 1 }.into_response().status(),
            422
        );
        assert_eq!(StubError::MissingParameter("line").into_response().status(), 400);
    }
}

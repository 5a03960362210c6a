// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Ajaxcart: headless ajax cart for storefront themes.
//!
//! A [`sync::CartSynchronizer`] consumes named UI events, talks to the storefront cart through a
//! [`client::CartApi`], and keeps one [`presentation::Surface`] (drawer, modal or flip button) in
//! step with the server. The host page is reached only through [`presentation::Page`].

pub mod client;
pub mod config;
pub mod model;
pub mod money;
pub mod presentation;
pub mod stepper;
pub mod stub;
pub mod sync;
pub mod view;

pub use client::{AddItemRequest, CartApi, CartClient, CartError, HttpCartApi};
pub use config::{CartConfig, CartSettings, PresentationMode};
pub use sync::{CartSynchronizer, EventOutcome, UiEvent};

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cart configuration.
//!
//! Themes emit a flat settings document ([`CartSettings`], camelCase JSON). It is validated once
//! into a [`CartConfig`] whose presentation mode, cart source and money format are tagged types;
//! nothing is reconfigured after initialization.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{MoneyFormat, MoneyFormatError, DEFAULT_MONEY_FORMAT};
use crate::view::{TitleConvention, ViewOptions};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown cart method '{0}' (expected drawer, modal, flip or page)")]
    UnknownMethod(String),
    #[error(transparent)]
    MoneyFormat(#[from] MoneyFormatError),
    #[error("useCartTemplate requires a cartUrl")]
    MissingCartUrl,
    #[error("{field} must not be empty")]
    EmptySelector { field: &'static str },
    #[error("invalid settings document: {0}")]
    Document(String),
}

/// Settings as a theme writes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CartSettings {
    pub method: String,
    pub form_selector: String,
    pub cart_form_selector: String,
    pub add_to_cart_selector: String,
    pub cart_count_selector: Option<String>,
    pub cart_cost_selector: Option<String>,
    pub toggle_cart_button: Option<String>,
    pub btn_class: Option<String>,
    pub wrapper_class: Option<String>,
    pub use_cart_template: bool,
    pub cart_url: Option<String>,
    pub money_format: String,
    pub disable_ajax_cart: bool,
    pub enable_qty_selectors: bool,
    pub prepend_drawer_to: String,
    /// Rendered on a product template: standalone steppers stop at 1 instead of 0.
    pub product_page: bool,
    /// Split line titles at the last `-` into name and variation.
    pub split_variant_title: bool,
    pub thumbnail_size: String,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            method: "drawer".to_owned(),
            form_selector: "[data-product-form]".to_owned(),
            cart_form_selector: "[data-cart-form]".to_owned(),
            add_to_cart_selector: r#"input[type="submit"]"#.to_owned(),
            cart_count_selector: None,
            cart_cost_selector: None,
            toggle_cart_button: None,
            btn_class: None,
            wrapper_class: None,
            use_cart_template: false,
            cart_url: None,
            money_format: DEFAULT_MONEY_FORMAT.to_owned(),
            disable_ajax_cart: false,
            enable_qty_selectors: true,
            prepend_drawer_to: "body".to_owned(),
            product_page: false,
            split_variant_title: true,
            thumbnail_size: "small".to_owned(),
        }
    }
}

impl CartSettings {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|err| ConfigError::Document(err.to_string()))
    }

    pub fn validate(self) -> Result<CartConfig, ConfigError> {
        let mode = match self.method.trim().to_ascii_lowercase().as_str() {
            "drawer" => PresentationMode::Drawer { prepend_to: self.prepend_drawer_to.clone() },
            "flip" => PresentationMode::Flip { prepend_to: self.prepend_drawer_to.clone() },
            "modal" => PresentationMode::Modal,
            "page" => PresentationMode::Page,
            _ => return Err(ConfigError::UnknownMethod(self.method)),
        };

        for (field, value) in [
            ("formSelector", &self.form_selector),
            ("addToCartSelector", &self.add_to_cart_selector),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptySelector { field });
            }
        }

        let source = if self.use_cart_template {
            let cart_url = self.cart_url.clone().ok_or(ConfigError::MissingCartUrl)?;
            CartSource::ServerFragment { cart_url, form_selector: self.cart_form_selector.clone() }
        } else {
            CartSource::ClientTemplate
        };

        let money_format = MoneyFormat::parse(self.money_format)?;
        let title_convention = if self.split_variant_title {
            TitleConvention::default()
        } else {
            TitleConvention::Whole
        };

        Ok(CartConfig {
            mode,
            selectors: Selectors {
                form: self.form_selector,
                cart_form: self.cart_form_selector,
                add_to_cart: self.add_to_cart_selector,
                cart_count: self.cart_count_selector,
                cart_cost: self.cart_cost_selector,
                toggle_button: self.toggle_cart_button,
                wrapper_class: self.wrapper_class,
            },
            source,
            view: ViewOptions {
                money_format,
                title_convention,
                thumbnail_size: self.thumbnail_size,
                btn_class: self.btn_class,
            },
            enable_qty_selectors: self.enable_qty_selectors,
            disable_ajax_cart: self.disable_ajax_cart,
            product_page: self.product_page,
            timings: Timings::default(),
            on_toggle: None,
        })
    }
}

/// How the cart surface is presented. Fixed for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationMode {
    /// Slide-in panel inserted at the start of `prepend_to`.
    Drawer { prepend_to: String },
    /// Overlay plus centered panel.
    Modal,
    /// The add-to-cart button flips to a checkout shortcut; "view cart" opens a drawer.
    Flip { prepend_to: String },
    /// No ajax handling; forms submit normally.
    Page,
}

impl PresentationMode {
    pub fn uses_drawer(&self) -> bool {
        matches!(self, Self::Drawer { .. } | Self::Flip { .. })
    }

    pub fn is_modal(&self) -> bool {
        matches!(self, Self::Modal)
    }

    pub fn is_flip(&self) -> bool {
        matches!(self, Self::Flip { .. })
    }

    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page)
    }
}

/// Page hooks the host binds events to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    pub form: String,
    pub cart_form: String,
    pub add_to_cart: String,
    pub cart_count: Option<String>,
    pub cart_cost: Option<String>,
    pub toggle_button: Option<String>,
    pub wrapper_class: Option<String>,
}

/// Where cart markup comes from after each mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartSource {
    /// Render [`crate::view::CartView`] with a [`crate::view::Template`].
    ClientTemplate,
    /// Load the theme's cart page and keep the part matching `form_selector`.
    ServerFragment { cart_url: String, form_selector: String },
}

/// Delays applied around server round-trips and resize handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Wait after a change response before re-fetching, so removed content does not flash.
    pub settle: Duration,
    /// Wait after marking a row loading/removed before sending the change.
    pub row_animation: Duration,
    /// Wait after a successful add before flipping the button.
    pub flip: Duration,
    pub resize_debounce: Duration,
    pub focus_select: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(150),
            row_animation: Duration::from_millis(250),
            flip: Duration::from_millis(600),
            resize_debounce: Duration::from_millis(500),
            focus_select: Duration::from_millis(50),
        }
    }
}

impl Timings {
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            row_animation: Duration::ZERO,
            flip: Duration::ZERO,
            resize_debounce: Duration::ZERO,
            focus_select: Duration::ZERO,
        }
    }
}

/// Payload of the visibility callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleEvent {
    pub is_visible: bool,
}

pub type ToggleCallback = Arc<dyn Fn(ToggleEvent) + Send + Sync>;

#[derive(Clone)]
pub struct CartConfig {
    pub mode: PresentationMode,
    pub selectors: Selectors,
    pub source: CartSource,
    pub view: ViewOptions,
    pub enable_qty_selectors: bool,
    pub disable_ajax_cart: bool,
    pub product_page: bool,
    pub timings: Timings,
    on_toggle: Option<ToggleCallback>,
}

impl CartConfig {
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_toggle_callback(mut self, on_toggle: ToggleCallback) -> Self {
        self.on_toggle = Some(on_toggle);
        self
    }

    pub fn on_toggle(&self) -> Option<&ToggleCallback> {
        self.on_toggle.as_ref()
    }

    /// Add-to-cart submissions are intercepted.
    pub fn ajax_enabled(&self) -> bool {
        !self.disable_ajax_cart && !self.mode.is_page()
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        CartSettings::default().validate().expect("default cart settings are valid")
    }
}

impl fmt::Debug for CartConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartConfig")
            .field("mode", &self.mode)
            .field("selectors", &self.selectors)
            .field("source", &self.source)
            .field("view", &self.view)
            .field("enable_qty_selectors", &self.enable_qty_selectors)
            .field("disable_ajax_cart", &self.disable_ajax_cart)
            .field("product_page", &self.product_page)
            .field("timings", &self.timings)
            .field("on_toggle", &self.on_toggle.is_some())
            .finish()
    }
}

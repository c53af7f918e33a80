//! # quote-wasm
//!
//! WebAssembly bindings for door-quote.
//!
//! The configurator page prices selections locally with the same engine
//! the server uses:
//! - Item totals with quantity and discount
//! - Project totals
//! - Amount formatting
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { compute_item_total, format_amount } from 'door-quote-wasm';
//!
//! await init();
//!
//! const total = compute_item_total({
//!   leaf: { id: 'l1_ral_base', name: 'MDF leaf', price: 34003, category: 'leaf' },
//!   frame: { id: 'f1_mdf_wrap', name: 'MDF wrap frame', price: 18022, category: 'frame' },
//!   quantity: 2,
//!   discount_value: '10',
//! });
//!
//! console.log(format_amount(total, 'rub'));
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use quote_core::{CatalogItem, Currency, DiscountType, DoorConfiguration};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Item-total input as sent from the page
#[derive(Debug, Default, Deserialize)]
pub struct ItemInput {
    #[serde(default)]
    pub leaf: Option<CatalogItem>,
    #[serde(default)]
    pub frame: Option<CatalogItem>,
    #[serde(default)]
    pub options: Vec<CatalogItem>,
    #[serde(default)]
    pub hardware: Vec<CatalogItem>,
    #[serde(default)]
    pub accessories: Vec<CatalogItem>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub discount_value: Option<String>,
    #[serde(default)]
    pub discount_type: Option<DiscountType>,
}

fn default_quantity() -> u32 {
    1
}

impl ItemInput {
    pub fn total(&self) -> i64 {
        quote_core::compute_item_total(
            self.leaf.as_ref(),
            self.frame.as_ref(),
            &self.options,
            &self.hardware,
            &self.accessories,
            self.quantity.max(1),
            self.discount_value.as_deref(),
            self.discount_type,
        )
    }
}

/// Parse a lowercase ISO 4217 code
pub fn parse_currency(code: &str) -> Option<Currency> {
    match code.trim().to_ascii_lowercase().as_str() {
        "rub" => Some(Currency::RUB),
        "eur" => Some(Currency::EUR),
        "usd" => Some(Currency::USD),
        _ => None,
    }
}

/// Final payable amount for one configuration
#[wasm_bindgen]
pub fn compute_item_total(input: JsValue) -> Result<i64, JsValue> {
    let input: ItemInput = serde_wasm_bindgen::from_value(input)
        .map_err(|e| JsValue::from_str(&format!("Invalid item: {}", e)))?;
    Ok(input.total())
}

/// Sum of item totals over a list of configurations
#[wasm_bindgen]
pub fn compute_project_total(configurations: JsValue) -> Result<i64, JsValue> {
    let configurations: Vec<DoorConfiguration> = serde_wasm_bindgen::from_value(configurations)
        .map_err(|e| JsValue::from_str(&format!("Invalid configurations: {}", e)))?;
    Ok(quote_core::compute_project_total(&configurations))
}

/// Format an amount in the smallest unit, e.g. `113 050 ₽`
#[wasm_bindgen]
pub fn format_amount(amount: i64, currency: &str) -> Result<String, JsValue> {
    parse_currency(currency)
        .map(|c| c.format_amount(amount))
        .ok_or_else(|| JsValue::from_str(&format!("Unknown currency: {}", currency)))
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

//! # Pricing Engine
//!
//! Pure price calculation for door configurations and projects.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  unit_price = leaf + frame + Σ options + Σ hardware + Σ acc  │
//! │  raw_total  = unit_price × quantity                          │
//! │  total      = max(0, raw_total − discount)   (if v > 0)      │
//! │  result     = round(total)                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these functions fail. A discount value that does not parse to a
//! finite number above zero means "no discount".

use crate::catalog::CatalogItem;
use crate::configuration::DoorConfiguration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a discount value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Percentage of the pre-discount total
    #[default]
    Percent,
    /// Absolute amount in the smallest currency unit
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percent => "percent",
            DiscountType::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discount attached to a configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub value: f64,
    #[serde(rename = "type", default)]
    pub kind: DiscountType,
}

impl Discount {
    pub fn percent(value: f64) -> Self {
        Self {
            value,
            kind: DiscountType::Percent,
        }
    }

    pub fn fixed(value: f64) -> Self {
        Self {
            value,
            kind: DiscountType::Fixed,
        }
    }

    /// Only finite values above zero reduce a total.
    /// An explicit zero is stored but priced like no discount.
    pub fn is_effective(&self) -> bool {
        self.value.is_finite() && self.value > 0.0
    }
}

/// Parse a user-entered discount value.
///
/// Surrounding whitespace is ignored, a decimal comma is read as a decimal
/// point and the longest numeric prefix wins, so `"10%"` reads as 10 and
/// `"7,5"` as 7.5. Returns `None` when no prefix is numeric or the number
/// is not finite (`"inf"`, `"NaN"`, `"1e999"`).
pub fn parse_discount_value(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    let mut end = normalized.len();
    while end > 0 {
        if normalized.is_char_boundary(end) {
            if let Ok(value) = normalized[..end].parse::<f64>() {
                return value.is_finite().then_some(value);
            }
        }
        end -= 1;
    }
    None
}

/// Sum of the unit prices of every selected part
pub fn unit_price(
    leaf: Option<&CatalogItem>,
    frame: Option<&CatalogItem>,
    options: &[CatalogItem],
    hardware: &[CatalogItem],
    accessories: &[CatalogItem],
) -> i64 {
    leaf.into_iter()
        .chain(frame)
        .chain(options)
        .chain(hardware)
        .chain(accessories)
        .fold(0_i64, |acc, item| acc.saturating_add(item.price))
}

/// Final payable amount for `quantity` units of one configuration.
///
/// `discount_type` defaults to percent when a value is given without one.
/// `quantity` is expected to be at least 1; it is not checked here.
#[allow(clippy::too_many_arguments)]
pub fn compute_item_total(
    leaf: Option<&CatalogItem>,
    frame: Option<&CatalogItem>,
    options: &[CatalogItem],
    hardware: &[CatalogItem],
    accessories: &[CatalogItem],
    quantity: u32,
    discount_value: Option<&str>,
    discount_type: Option<DiscountType>,
) -> i64 {
    let raw_total = unit_price(leaf, frame, options, hardware, accessories)
        .saturating_mul(i64::from(quantity));
    let discount = discount_value
        .and_then(parse_discount_value)
        .map(|value| Discount {
            value,
            kind: discount_type.unwrap_or_default(),
        });
    discounted_total(raw_total, discount)
}

/// Sum of [`compute_item_total`] over every configuration
pub fn compute_project_total(configurations: &[DoorConfiguration]) -> i64 {
    configurations
        .iter()
        .fold(0_i64, |acc, config| acc.saturating_add(config.total()))
}

/// Apply an optional discount to a raw total and round half-up.
pub(crate) fn discounted_total(raw_total: i64, discount: Option<Discount>) -> i64 {
    let raw_total = raw_total.max(0);
    let discount = match discount {
        Some(d) if d.is_effective() => d,
        _ => return raw_total,
    };

    let raw = raw_total as f64;
    let total = match discount.kind {
        DiscountType::Fixed => (raw - discount.value).max(0.0),
        DiscountType::Percent => (raw - raw * (discount.value / 100.0)).max(0.0),
    };
    // Non-negative here, so round() is half-up
    total.round() as i64
}

/// VAT rate in basis points (2000 = 20%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatRate(u32);

impl VatRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        VatRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Rate as a percentage (for display only)
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// VAT on `amount`, rounded half-up
    pub fn vat_on(&self, amount: i64) -> i64 {
        let amount = i128::from(amount.max(0));
        let vat = (amount * i128::from(self.0) + 5_000) / 10_000;
        i64::try_from(vat).unwrap_or(i64::MAX)
    }
}

impl Default for VatRate {
    fn default() -> Self {
        VatRate::from_bps(2000)
    }
}

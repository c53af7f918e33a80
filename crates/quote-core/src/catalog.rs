//! # Catalog Types
//!
//! Door catalog for door-quote: leaves and frames per door type, plus flat
//! option, hardware and accessory lists. Loaded from `config/catalog.toml`.
//!
//! The catalog is an explicit, versioned value. Every price edit bumps the
//! version and reports a [`PriceChange`] so callers can push the new price
//! into selections that embed a copy of the item.

use crate::error::{QuoteError, QuoteResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    RUB,
    EUR,
    USD,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::RUB => "rub",
            Currency::EUR => "eur",
            Currency::USD => "usd",
        }
    }

    /// Display symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::RUB => "₽",
            Currency::EUR => "€",
            Currency::USD => "$",
        }
    }

    /// Number of decimal places held by the smallest unit.
    /// Catalog prices in roubles are whole roubles.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::RUB => 0,
            _ => 2,
        }
    }

    /// Format an amount in the smallest unit, e.g. `113 050 ₽`
    pub fn format_amount(&self, amount: i64) -> String {
        let divisor = 10_i64.pow(self.decimal_places());
        let sign = if amount < 0 { "-" } else { "" };
        let abs = amount.unsigned_abs();
        let major = group_thousands(abs / divisor as u64);
        if self.decimal_places() == 0 {
            format!("{}{} {}", sign, major, self.symbol())
        } else {
            let minor = abs % divisor as u64;
            format!(
                "{}{}.{:0width$} {}",
                sign,
                major,
                minor,
                self.symbol(),
                width = self.decimal_places() as usize
            )
        }
    }

    /// Format a possibly fractional amount in the smallest unit without
    /// rounding it, e.g. `1 500.5 ₽`. Whole amounts format like
    /// [`Currency::format_amount`].
    pub fn format_fractional(&self, amount: f64) -> String {
        if amount.fract() == 0.0 && amount.abs() < i64::MAX as f64 {
            return self.format_amount(amount as i64);
        }

        let major = amount / 10_f64.powi(self.decimal_places() as i32);
        let sign = if major < 0.0 { "-" } else { "" };
        let digits = major.abs().to_string();
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
        let whole = whole
            .parse::<u64>()
            .map(group_thousands)
            .unwrap_or_else(|_| whole.to_string());
        if fraction.is_empty() {
            format!("{}{} {}", sign, whole, self.symbol())
        } else {
            format!("{}{}.{} {}", sign, whole, fraction, self.symbol())
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Door block type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorType {
    /// Single leaf (1.0)
    #[default]
    Single,
    /// One-and-a-half leaves (1.5)
    OneHalf,
    /// Double leaf (2.0)
    Double,
}

impl DoorType {
    /// Canonical display and grouping order
    pub const ALL: [DoorType; 3] = [DoorType::Single, DoorType::OneHalf, DoorType::Double];

    pub fn as_str(&self) -> &'static str {
        match self {
            DoorType::Single => "single",
            DoorType::OneHalf => "one_half",
            DoorType::Double => "double",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DoorType::Single => "Single door (1.0)",
            DoorType::OneHalf => "One-and-a-half door (1.5)",
            DoorType::Double => "Double door (2.0)",
        }
    }
}

impl fmt::Display for DoorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Leaf,
    Frame,
    Option,
    Hardware,
    Accessory,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Leaf => "leaf",
            Category::Frame => "frame",
            Category::Option => "option",
            Category::Hardware => "hardware",
            Category::Accessory => "accessory",
        }
    }

    /// Leaves and frames are listed per door type
    pub fn is_per_door_type(&self) -> bool {
        matches!(self, Category::Leaf | Category::Frame)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An independently priced catalog unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique item identifier (e.g., "l1_ral_base")
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price in the smallest currency unit
    pub price: i64,

    /// Category
    pub category: Category,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Door types this item fits; `None` means all of them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatible_with: Option<Vec<DoorType>>,
}

impl CatalogItem {
    /// Create a new catalog item
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: i64,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category,
            description: None,
            image_url: None,
            compatible_with: None,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Builder: restrict to the given door types
    pub fn compatible_with(mut self, door_types: impl Into<Vec<DoorType>>) -> Self {
        self.compatible_with = Some(door_types.into());
        self
    }

    pub fn is_compatible_with(&self, door_type: DoorType) -> bool {
        self.compatible_with
            .as_ref()
            .map(|types| types.contains(&door_type))
            .unwrap_or(true)
    }
}

/// One value per door type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerDoorType<T> {
    #[serde(default)]
    pub single: T,
    #[serde(default)]
    pub one_half: T,
    #[serde(default)]
    pub double: T,
}

impl<T> PerDoorType<T> {
    pub fn get(&self, door_type: DoorType) -> &T {
        match door_type {
            DoorType::Single => &self.single,
            DoorType::OneHalf => &self.one_half,
            DoorType::Double => &self.double,
        }
    }

    pub fn get_mut(&mut self, door_type: DoorType) -> &mut T {
        match door_type {
            DoorType::Single => &mut self.single,
            DoorType::OneHalf => &mut self.one_half,
            DoorType::Double => &mut self.double,
        }
    }

    /// Values in canonical door-type order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        [&self.single, &self.one_half, &self.double].into_iter()
    }
}

/// Direction of a bulk price adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustOperation {
    Increase,
    Decrease,
}

/// Unit of a bulk price adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustUnit {
    #[default]
    Percent,
    Fixed,
}

/// Bulk price adjustment: `new = max(0, round(current ± delta))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceAdjustment {
    pub operation: AdjustOperation,
    #[serde(default)]
    pub unit: AdjustUnit,
    pub value: f64,
}

impl PriceAdjustment {
    pub fn increase_percent(value: f64) -> Self {
        Self {
            operation: AdjustOperation::Increase,
            unit: AdjustUnit::Percent,
            value,
        }
    }

    pub fn decrease_percent(value: f64) -> Self {
        Self {
            operation: AdjustOperation::Decrease,
            unit: AdjustUnit::Percent,
            value,
        }
    }

    pub fn increase_fixed(value: f64) -> Self {
        Self {
            operation: AdjustOperation::Increase,
            unit: AdjustUnit::Fixed,
            value,
        }
    }

    pub fn decrease_fixed(value: f64) -> Self {
        Self {
            operation: AdjustOperation::Decrease,
            unit: AdjustUnit::Fixed,
            value,
        }
    }

    /// The adjustment value must be a finite number above zero
    pub fn validate(&self) -> QuoteResult<()> {
        if self.value.is_finite() && self.value > 0.0 {
            Ok(())
        } else {
            Err(QuoteError::InvalidRequest(format!(
                "adjustment value must be positive, got {}",
                self.value
            )))
        }
    }

    /// Apply to a single price
    pub fn apply(&self, current: i64) -> i64 {
        let current_f = current as f64;
        let mut change = match self.unit {
            AdjustUnit::Percent => current_f * (self.value / 100.0),
            AdjustUnit::Fixed => self.value,
        };
        if self.operation == AdjustOperation::Decrease {
            change = -change;
        }
        (current_f + change).round().max(0.0) as i64
    }
}

/// Record of one catalog price edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceChange {
    pub item_id: String,
    pub old_price: i64,
    pub new_price: i64,
}

/// The product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Bumped on every price edit
    #[serde(default)]
    pub version: u64,

    #[serde(default)]
    pub currency: Currency,

    #[serde(default)]
    pub leaves: PerDoorType<Vec<CatalogItem>>,

    #[serde(default)]
    pub frames: PerDoorType<Vec<CatalogItem>>,

    #[serde(default)]
    pub options: Vec<CatalogItem>,

    #[serde(default)]
    pub hardware: Vec<CatalogItem>,

    #[serde(default)]
    pub accessories: Vec<CatalogItem>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a leaf for a door type
    pub fn with_leaf(mut self, door_type: DoorType, item: CatalogItem) -> Self {
        self.leaves.get_mut(door_type).push(item);
        self
    }

    /// Builder: add a frame for a door type
    pub fn with_frame(mut self, door_type: DoorType, item: CatalogItem) -> Self {
        self.frames.get_mut(door_type).push(item);
        self
    }

    /// Builder: add an option, hardware piece or accessory
    pub fn with_item(mut self, item: CatalogItem) -> Self {
        match item.category {
            Category::Option => self.options.push(item),
            Category::Hardware => self.hardware.push(item),
            Category::Accessory => self.accessories.push(item),
            // Leaves and frames need a door type; default to single
            Category::Leaf => self.leaves.single.push(item),
            Category::Frame => self.frames.single.push(item),
        }
        self
    }

    /// Load and validate a catalog from a TOML string
    pub fn from_toml(toml_str: &str) -> QuoteResult<Self> {
        let catalog: Catalog = toml::from_str(toml_str)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check ids are unique, prices non-negative and categories match
    /// the collection each item is listed in.
    pub fn validate(&self) -> QuoteResult<()> {
        let mut seen = HashSet::new();
        for (expected, item) in self.categorized() {
            if item.category != expected {
                return Err(QuoteError::CatalogParse(format!(
                    "item {} is listed under {} but has category {}",
                    item.id, expected, item.category
                )));
            }
            if item.price < 0 {
                return Err(QuoteError::CatalogParse(format!(
                    "item {} has negative price {}",
                    item.id, item.price
                )));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(QuoteError::CatalogParse(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
        }
        Ok(())
    }

    fn categorized(&self) -> impl Iterator<Item = (Category, &CatalogItem)> {
        let leaves = self.leaves.values().flatten().map(|i| (Category::Leaf, i));
        let frames = self.frames.values().flatten().map(|i| (Category::Frame, i));
        let options = self.options.iter().map(|i| (Category::Option, i));
        let hardware = self.hardware.iter().map(|i| (Category::Hardware, i));
        let accessories = self.accessories.iter().map(|i| (Category::Accessory, i));
        leaves
            .chain(frames)
            .chain(options)
            .chain(hardware)
            .chain(accessories)
    }

    /// Every item in the catalog
    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.categorized().map(|(_, item)| item)
    }

    /// Number of items across all collections
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find an item by ID in any collection
    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.iter().find(|item| item.id == id)
    }

    /// Build a one-shot id → item index
    pub fn index(&self) -> CatalogIndex<'_> {
        let mut by_id = HashMap::new();
        for item in self.iter() {
            by_id.entry(item.id.as_str()).or_insert(item);
        }
        CatalogIndex { by_id }
    }

    pub fn leaves_for(&self, door_type: DoorType) -> &[CatalogItem] {
        self.leaves.get(door_type)
    }

    pub fn frames_for(&self, door_type: DoorType) -> &[CatalogItem] {
        self.frames.get(door_type)
    }

    pub fn options_for(&self, door_type: DoorType) -> impl Iterator<Item = &CatalogItem> {
        self.options
            .iter()
            .filter(move |i| i.is_compatible_with(door_type))
    }

    pub fn hardware_for(&self, door_type: DoorType) -> impl Iterator<Item = &CatalogItem> {
        self.hardware
            .iter()
            .filter(move |i| i.is_compatible_with(door_type))
    }

    pub fn accessories_for(&self, door_type: DoorType) -> impl Iterator<Item = &CatalogItem> {
        self.accessories
            .iter()
            .filter(move |i| i.is_compatible_with(door_type))
    }

    /// Items of one price-editor view
    pub fn items(&self, category: Category, door_type: Option<DoorType>) -> QuoteResult<&[CatalogItem]> {
        match category {
            Category::Leaf => Ok(self.leaves.get(require_door_type(category, door_type)?).as_slice()),
            Category::Frame => Ok(self.frames.get(require_door_type(category, door_type)?).as_slice()),
            Category::Option => Ok(self.options.as_slice()),
            Category::Hardware => Ok(self.hardware.as_slice()),
            Category::Accessory => Ok(self.accessories.as_slice()),
        }
    }

    fn items_mut(
        &mut self,
        category: Category,
        door_type: Option<DoorType>,
    ) -> QuoteResult<&mut Vec<CatalogItem>> {
        match category {
            Category::Leaf => Ok(self.leaves.get_mut(require_door_type(category, door_type)?)),
            Category::Frame => Ok(self.frames.get_mut(require_door_type(category, door_type)?)),
            Category::Option => Ok(&mut self.options),
            Category::Hardware => Ok(&mut self.hardware),
            Category::Accessory => Ok(&mut self.accessories),
        }
    }

    /// Set the price of a single item.
    ///
    /// Leaves and frames are looked up within `door_type` only.
    pub fn set_price(
        &mut self,
        category: Category,
        door_type: Option<DoorType>,
        item_id: &str,
        price: i64,
    ) -> QuoteResult<PriceChange> {
        if price < 0 {
            return Err(QuoteError::InvalidPrice {
                message: format!("price for {} must not be negative", item_id),
            });
        }

        let item = self
            .items_mut(category, door_type)?
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| QuoteError::ItemNotFound {
                item_id: item_id.to_string(),
            })?;

        let change = PriceChange {
            item_id: item.id.clone(),
            old_price: item.price,
            new_price: price,
        };
        item.price = price;
        self.version += 1;

        debug!(
            item_id = %change.item_id,
            old = change.old_price,
            new = change.new_price,
            version = self.version,
            "catalog price updated"
        );
        Ok(change)
    }

    /// Apply a bulk adjustment to the selected ids of one editor view.
    ///
    /// Ids that are not in the view are ignored. The version is bumped
    /// only when at least one item changed.
    pub fn adjust_prices(
        &mut self,
        category: Category,
        door_type: Option<DoorType>,
        item_ids: &HashSet<String>,
        adjustment: &PriceAdjustment,
    ) -> QuoteResult<Vec<PriceChange>> {
        adjustment.validate()?;
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut changes = Vec::new();
        for item in self.items_mut(category, door_type)?.iter_mut() {
            if !item_ids.contains(&item.id) {
                continue;
            }
            let new_price = adjustment.apply(item.price);
            changes.push(PriceChange {
                item_id: item.id.clone(),
                old_price: item.price,
                new_price,
            });
            item.price = new_price;
        }

        if !changes.is_empty() {
            self.version += 1;
            debug!(
                category = %category,
                changed = changes.len(),
                version = self.version,
                "bulk price adjustment applied"
            );
        }
        Ok(changes)
    }
}

fn require_door_type(category: Category, door_type: Option<DoorType>) -> QuoteResult<DoorType> {
    door_type.ok_or_else(|| {
        QuoteError::InvalidRequest(format!("door type is required for category {}", category))
    })
}

/// Id → item lookup over every catalog collection
#[derive(Debug, Clone)]
pub struct CatalogIndex<'a> {
    by_id: HashMap<&'a str, &'a CatalogItem>,
}

impl<'a> CatalogIndex<'a> {
    pub fn get(&self, id: &str) -> Option<&'a CatalogItem> {
        self.by_id.get(id).copied()
    }

    /// Current catalog copy of `item`, or `item` itself when the id is gone
    pub fn resolve(&self, item: &CatalogItem) -> CatalogItem {
        self.get(&item.id).cloned().unwrap_or_else(|| item.clone())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Overwrite the price of every item in `items` named by `changes`
pub(crate) fn apply_changes_to(items: &mut [CatalogItem], changes: &[PriceChange]) {
    for item in items.iter_mut() {
        if let Some(change) = changes.iter().find(|c| c.item_id == item.id) {
            item.price = change.new_price;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 3
currency = "rub"

[[leaves.single]]
id = "l1_ral_base"
name = "MDF leaf (RAL paint)"
price = 34003
category = "leaf"

[[leaves.double]]
id = "l2_metal"
name = "Metal leaf 2.0"
price = 59347
category = "leaf"

[[frames.single]]
id = "f1_mdf_wrap"
name = "MDF wrap frame"
price = 18022
category = "frame"

[[options]]
id = "opt_glass_25"
name = "Glazing 25%"
price = 4500
category = "option"

[[options]]
id = "opt_double_only"
name = "Astragal"
price = 3000
category = "option"
compatible_with = ["double"]

[[hardware]]
id = "hw_handle_ss"
name = "Lever handle (stainless)"
price = 2500
category = "hardware"
"#;

    fn sample() -> Catalog {
        Catalog::from_toml(SAMPLE).unwrap()
    }

    #[test]
    fn test_load_from_toml() {
        let catalog = sample();
        assert_eq!(catalog.version, 3);
        assert_eq!(catalog.currency, Currency::RUB);
        assert_eq!(catalog.leaves_for(DoorType::Single).len(), 1);
        assert!(catalog.leaves_for(DoorType::OneHalf).is_empty());
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.get("l2_metal").unwrap().price, 59347);
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_validate_rejects_misfiled_item() {
        let bad = r#"
[[options]]
id = "x"
name = "Wrong"
price = 1
category = "hardware"
"#;
        assert!(matches!(
            Catalog::from_toml(bad),
            Err(QuoteError::CatalogParse(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let catalog = Catalog::new()
            .with_item(CatalogItem::new("a", "A", 1, Category::Option))
            .with_item(CatalogItem::new("a", "A again", 2, Category::Hardware));
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_compatibility_filter() {
        let catalog = sample();
        let single: Vec<_> = catalog.options_for(DoorType::Single).map(|i| i.id.as_str()).collect();
        let double: Vec<_> = catalog.options_for(DoorType::Double).map(|i| i.id.as_str()).collect();
        assert_eq!(single, vec!["opt_glass_25"]);
        assert_eq!(double, vec!["opt_glass_25", "opt_double_only"]);
    }

    #[test]
    fn test_editor_views() {
        let catalog = sample();
        let ids = |items: &[CatalogItem]| -> Vec<String> { items.iter().map(|i| i.id.clone()).collect() };

        let leaves = catalog.items(Category::Leaf, Some(DoorType::Double)).unwrap();
        assert_eq!(ids(leaves), vec!["l2_metal"]);
        assert!(catalog
            .items(Category::Frame, Some(DoorType::Double))
            .unwrap()
            .is_empty());

        // Shared collections list every item regardless of door type
        let options = catalog.items(Category::Option, Some(DoorType::Single)).unwrap();
        assert_eq!(ids(options), vec!["opt_glass_25", "opt_double_only"]);
        assert_eq!(catalog.items(Category::Hardware, None).unwrap().len(), 1);
        assert!(catalog.items(Category::Accessory, None).unwrap().is_empty());

        for category in [Category::Leaf, Category::Frame] {
            assert!(matches!(
                catalog.items(category, None),
                Err(QuoteError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_set_price_bumps_version() {
        let mut catalog = sample();
        let change = catalog
            .set_price(Category::Leaf, Some(DoorType::Single), "l1_ral_base", 35000)
            .unwrap();
        assert_eq!(change.old_price, 34003);
        assert_eq!(change.new_price, 35000);
        assert_eq!(catalog.version, 4);
        assert_eq!(catalog.get("l1_ral_base").unwrap().price, 35000);
    }

    #[test]
    fn test_set_price_scoped_to_door_type() {
        let mut catalog = sample();
        let err = catalog
            .set_price(Category::Leaf, Some(DoorType::Double), "l1_ral_base", 1)
            .unwrap_err();
        assert!(matches!(err, QuoteError::ItemNotFound { .. }));

        let err = catalog
            .set_price(Category::Leaf, None, "l1_ral_base", 1)
            .unwrap_err();
        assert!(matches!(err, QuoteError::InvalidRequest(_)));

        let err = catalog
            .set_price(Category::Option, None, "opt_glass_25", -1)
            .unwrap_err();
        assert!(matches!(err, QuoteError::InvalidPrice { .. }));
        assert_eq!(catalog.version, 3);
    }

    #[test]
    fn test_adjustment_math() {
        assert_eq!(PriceAdjustment::increase_percent(10.0).apply(34003), 37403);
        assert_eq!(PriceAdjustment::decrease_percent(10.0).apply(34003), 30603);
        assert_eq!(PriceAdjustment::increase_fixed(500.0).apply(4500), 5000);
        assert_eq!(PriceAdjustment::decrease_fixed(10_000.0).apply(4500), 0);
        assert!(PriceAdjustment::increase_percent(0.0).validate().is_err());
        assert!(PriceAdjustment::increase_percent(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_bulk_adjust_selected_only() {
        let mut catalog = sample();
        let ids: HashSet<String> = ["opt_glass_25".to_string()].into_iter().collect();
        let changes = catalog
            .adjust_prices(
                Category::Option,
                None,
                &ids,
                &PriceAdjustment::increase_percent(10.0),
            )
            .unwrap();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].new_price, 4950);
        assert_eq!(catalog.get("opt_double_only").unwrap().price, 3000);
        assert_eq!(catalog.version, 4);

        let none = catalog
            .adjust_prices(
                Category::Option,
                None,
                &HashSet::new(),
                &PriceAdjustment::increase_percent(10.0),
            )
            .unwrap();
        assert!(none.is_empty());
        assert_eq!(catalog.version, 4);
    }

    #[test]
    fn test_index_resolves_and_falls_back() {
        let catalog = sample();
        let index = catalog.index();
        assert_eq!(index.len(), 6);

        let stale = CatalogItem::new("hw_handle_ss", "Old handle", 100, Category::Hardware);
        assert_eq!(index.resolve(&stale).price, 2500);

        let retired = CatalogItem::new("retired", "Retired", 777, Category::Option);
        assert_eq!(index.resolve(&retired), retired);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(Currency::RUB.format_amount(113050), "113 050 ₽");
        assert_eq!(Currency::RUB.format_amount(999), "999 ₽");
        assert_eq!(Currency::RUB.format_amount(1_000_000), "1 000 000 ₽");
        assert_eq!(Currency::EUR.format_amount(123456), "1 234.56 €");
        assert_eq!(Currency::USD.format_amount(-505), "-5.05 $");
    }

    #[test]
    fn test_format_fractional() {
        assert_eq!(Currency::RUB.format_fractional(1500.5), "1 500.5 ₽");
        assert_eq!(Currency::RUB.format_fractional(5000.0), "5 000 ₽");
        assert_eq!(Currency::RUB.format_fractional(0.25), "0.25 ₽");
        assert_eq!(Currency::EUR.format_fractional(123456.0), "1 234.56 €");
    }
}

//! # Door Configurations
//!
//! `DoorConfiguration` is one priced line of a project. `Selection` is the
//! configuration being assembled (or edited) before it is committed.

use crate::catalog::{apply_changes_to, CatalogIndex, CatalogItem, DoorType, PriceChange};
use crate::error::{QuoteError, QuoteResult};
use crate::pricing::{self, parse_discount_value, Discount, DiscountType};
use crate::template::DoorTemplate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_quantity() -> u32 {
    1
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// One door assembly within a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorConfiguration {
    /// Unique id within the project
    pub id: String,

    pub door_type: DoorType,

    pub leaf: Option<CatalogItem>,

    pub frame: Option<CatalogItem>,

    #[serde(default)]
    pub options: Vec<CatalogItem>,

    #[serde(default)]
    pub hardware: Vec<CatalogItem>,

    #[serde(default)]
    pub accessories: Vec<CatalogItem>,

    /// Number of identical doors (at least 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
}

impl DoorConfiguration {
    /// Create an empty configuration with a generated id
    pub fn new(door_type: DoorType) -> Self {
        Self {
            id: new_id(),
            door_type,
            leaf: None,
            frame: None,
            options: Vec::new(),
            hardware: Vec::new(),
            accessories: Vec::new(),
            quantity: 1,
            discount: None,
        }
    }

    /// Builder: set leaf
    pub fn with_leaf(mut self, leaf: CatalogItem) -> Self {
        self.leaf = Some(leaf);
        self
    }

    /// Builder: set frame
    pub fn with_frame(mut self, frame: CatalogItem) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Builder: set options
    pub fn with_options(mut self, options: Vec<CatalogItem>) -> Self {
        self.options = options;
        self
    }

    /// Builder: set hardware
    pub fn with_hardware(mut self, hardware: Vec<CatalogItem>) -> Self {
        self.hardware = hardware;
        self
    }

    /// Builder: set accessories
    pub fn with_accessories(mut self, accessories: Vec<CatalogItem>) -> Self {
        self.accessories = accessories;
        self
    }

    /// Builder: set quantity
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Builder: set discount
    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Both leaf and frame are selected
    pub fn is_complete(&self) -> bool {
        self.leaf.is_some() && self.frame.is_some()
    }

    /// Price of one door
    pub fn unit_price(&self) -> i64 {
        pricing::unit_price(
            self.leaf.as_ref(),
            self.frame.as_ref(),
            &self.options,
            &self.hardware,
            &self.accessories,
        )
    }

    /// Final payable amount for the whole line
    pub fn total(&self) -> i64 {
        let raw_total = self.unit_price().saturating_mul(i64::from(self.quantity));
        pricing::discounted_total(raw_total, self.discount)
    }

    /// Options, hardware and accessories in that order
    pub fn extras(&self) -> impl Iterator<Item = &CatalogItem> {
        self.options
            .iter()
            .chain(&self.hardware)
            .chain(&self.accessories)
    }

    /// Copy with a fresh id
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(),
            ..self.clone()
        }
    }

    /// Push catalog price edits into the embedded items
    pub fn apply_price_changes(&mut self, changes: &[PriceChange]) {
        apply_changes_to(self.leaf.as_mut_slice(), changes);
        apply_changes_to(self.frame.as_mut_slice(), changes);
        apply_changes_to(&mut self.options, changes);
        apply_changes_to(&mut self.hardware, changes);
        apply_changes_to(&mut self.accessories, changes);
    }

    /// Replace every embedded item with its current catalog copy.
    /// Returns how many embedded prices changed.
    pub fn refresh_from(&mut self, index: &CatalogIndex<'_>) -> usize {
        let mut changed = 0;
        let mut refresh = |item: &mut CatalogItem| {
            let fresh = index.resolve(item);
            if fresh.price != item.price {
                changed += 1;
            }
            *item = fresh;
        };

        self.leaf.iter_mut().for_each(&mut refresh);
        self.frame.iter_mut().for_each(&mut refresh);
        self.options.iter_mut().for_each(&mut refresh);
        self.hardware.iter_mut().for_each(&mut refresh);
        self.accessories.iter_mut().for_each(&mut refresh);
        changed
    }
}

/// The configuration being assembled before it joins a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub door_type: DoorType,

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

    /// Discount as typed by the user; empty means none
    #[serde(default)]
    pub discount_value: String,

    #[serde(default)]
    pub discount_type: DiscountType,

    /// Id of the project line being edited, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editing_id: Option<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(DoorType::default())
    }
}

impl Selection {
    pub fn new(door_type: DoorType) -> Self {
        Self {
            door_type,
            leaf: None,
            frame: None,
            options: Vec::new(),
            hardware: Vec::new(),
            accessories: Vec::new(),
            quantity: 1,
            discount_value: String::new(),
            discount_type: DiscountType::Percent,
            editing_id: None,
        }
    }

    /// Start editing an existing project line
    pub fn editing(config: &DoorConfiguration) -> Self {
        let (discount_value, discount_type) = match config.discount {
            Some(d) => (d.value.to_string(), d.kind),
            None => (String::new(), DiscountType::Percent),
        };
        Self {
            door_type: config.door_type,
            leaf: config.leaf.clone(),
            frame: config.frame.clone(),
            options: config.options.clone(),
            hardware: config.hardware.clone(),
            accessories: config.accessories.clone(),
            quantity: config.quantity.max(1),
            discount_value,
            discount_type,
            editing_id: Some(config.id.clone()),
        }
    }

    /// Replace the selection with a project line for editing
    pub fn load_for_edit(&mut self, config: &DoorConfiguration) {
        *self = Self::editing(config);
    }

    /// Replace the selection with a template's parts
    pub fn load_template(&mut self, template: &DoorTemplate) {
        *self = template.to_selection();
    }

    /// Switch door type. Leaves and frames differ per type, so every slot,
    /// the discount and the edit target are reset.
    pub fn change_door_type(&mut self, door_type: DoorType) {
        let quantity = self.quantity;
        *self = Self::new(door_type);
        self.quantity = quantity;
    }

    pub fn select_leaf(&mut self, leaf: CatalogItem) {
        self.leaf = Some(leaf);
    }

    pub fn select_frame(&mut self, frame: CatalogItem) {
        self.frame = Some(frame);
    }

    pub fn clear_leaf(&mut self) {
        self.leaf = None;
    }

    pub fn clear_frame(&mut self) {
        self.frame = None;
    }

    /// Add the option, or remove it when already selected.
    /// Returns true when the item is selected afterwards.
    pub fn toggle_option(&mut self, item: CatalogItem) -> bool {
        toggle(&mut self.options, item)
    }

    pub fn toggle_hardware(&mut self, item: CatalogItem) -> bool {
        toggle(&mut self.hardware, item)
    }

    pub fn toggle_accessory(&mut self, item: CatalogItem) -> bool {
        toggle(&mut self.accessories, item)
    }

    /// Set quantity, never below 1
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    pub fn set_discount(&mut self, value: impl Into<String>, kind: DiscountType) {
        self.discount_value = value.into();
        self.discount_type = kind;
    }

    pub fn is_complete(&self) -> bool {
        self.leaf.is_some() && self.frame.is_some()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Price of one door with the current selection
    pub fn unit_cost(&self) -> i64 {
        pricing::unit_price(
            self.leaf.as_ref(),
            self.frame.as_ref(),
            &self.options,
            &self.hardware,
            &self.accessories,
        )
    }

    /// Live total, valid for incomplete selections too
    pub fn total(&self) -> i64 {
        pricing::compute_item_total(
            self.leaf.as_ref(),
            self.frame.as_ref(),
            &self.options,
            &self.hardware,
            &self.accessories,
            self.quantity,
            Some(self.discount_value.as_str()),
            Some(self.discount_type),
        )
    }

    /// Discount to store on commit: `None` for an empty or unreadable value
    pub fn discount(&self) -> Option<Discount> {
        if self.discount_value.is_empty() {
            return None;
        }
        parse_discount_value(&self.discount_value).map(|value| Discount {
            value,
            kind: self.discount_type,
        })
    }

    /// Reset every slot, quantity, discount and edit target.
    /// The door type is kept.
    pub fn clear(&mut self) {
        *self = Self::new(self.door_type);
    }

    /// Drop the edit target if it is `config_id`
    pub fn forget(&mut self, config_id: &str) {
        if self.editing_id.as_deref() == Some(config_id) {
            self.clear();
        }
    }

    /// Build a project line from this selection
    pub fn to_configuration(&self, id: String) -> QuoteResult<DoorConfiguration> {
        let leaf = self
            .leaf
            .clone()
            .ok_or(QuoteError::IncompleteConfiguration { missing: "leaf" })?;
        let frame = self
            .frame
            .clone()
            .ok_or(QuoteError::IncompleteConfiguration { missing: "frame" })?;

        Ok(DoorConfiguration {
            id,
            door_type: self.door_type,
            leaf: Some(leaf),
            frame: Some(frame),
            options: self.options.clone(),
            hardware: self.hardware.clone(),
            accessories: self.accessories.clone(),
            quantity: self.quantity.max(1),
            discount: self.discount(),
        })
    }

    /// Push catalog price edits into the selected items
    pub fn apply_price_changes(&mut self, changes: &[PriceChange]) {
        apply_changes_to(self.leaf.as_mut_slice(), changes);
        apply_changes_to(self.frame.as_mut_slice(), changes);
        apply_changes_to(&mut self.options, changes);
        apply_changes_to(&mut self.hardware, changes);
        apply_changes_to(&mut self.accessories, changes);
    }
}

fn toggle(list: &mut Vec<CatalogItem>, item: CatalogItem) -> bool {
    if let Some(pos) = list.iter().position(|i| i.id == item.id) {
        list.remove(pos);
        false
    } else {
        list.push(item);
        true
    }
}

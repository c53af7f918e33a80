//! # Projects
//!
//! A project is an ordered list of door configurations for one customer
//! quote, plus its metadata. It can be archived as a [`SavedProject`]
//! snapshot and restored later.

use crate::catalog::{Catalog, DoorType};
use crate::configuration::{new_id, DoorConfiguration, Selection};
use crate::error::{QuoteError, QuoteResult};
use crate::pricing::compute_project_total;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// Placeholder used for blank customer or manager names in snapshots
pub const NOT_SPECIFIED: &str = "Not specified";

/// Working project (the order being assembled)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub customer: String,

    #[serde(default)]
    pub manager: String,

    #[serde(default)]
    pub comments: String,

    #[serde(default)]
    pub items: Vec<DoorConfiguration>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set project name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: set customer
    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = customer.into();
        self
    }

    /// Builder: set manager
    pub fn with_manager(mut self, manager: impl Into<String>) -> Self {
        self.manager = manager.into();
        self
    }

    /// Builder: set comments
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    /// Builder: append a configuration
    pub fn with_item(mut self, item: DoorConfiguration) -> Self {
        self.items.push(item);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total number of doors across all lines
    pub fn door_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, i| acc.saturating_add(i.quantity))
    }

    pub fn get(&self, id: &str) -> Option<&DoorConfiguration> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Project total after per-line discounts
    pub fn total(&self) -> i64 {
        compute_project_total(&self.items)
    }

    /// Commit the selection.
    ///
    /// When the selection edits an existing line, that line is replaced in
    /// place and the selection is cleared. Otherwise a new line with a fresh
    /// id is appended and the selection is left as is. Returns the line id.
    pub fn commit(&mut self, selection: &mut Selection) -> QuoteResult<String> {
        match selection.editing_id.clone() {
            Some(id) => {
                let pos = self
                    .items
                    .iter()
                    .position(|i| i.id == id)
                    .ok_or_else(|| QuoteError::ConfigurationNotFound {
                        config_id: id.clone(),
                    })?;
                self.items[pos] = selection.to_configuration(id.clone())?;
                selection.clear();
                debug!(config_id = %id, "configuration updated");
                Ok(id)
            }
            None => {
                let config = selection.to_configuration(new_id())?;
                let id = config.id.clone();
                self.items.push(config);
                debug!(config_id = %id, "configuration added");
                Ok(id)
            }
        }
    }

    /// Append a copy of a line under a fresh id
    pub fn duplicate(&mut self, id: &str) -> QuoteResult<String> {
        let copy = self
            .get(id)
            .map(DoorConfiguration::duplicate)
            .ok_or_else(|| QuoteError::ConfigurationNotFound {
                config_id: id.to_string(),
            })?;
        let new_id = copy.id.clone();
        self.items.push(copy);
        Ok(new_id)
    }

    pub fn remove(&mut self, id: &str) -> QuoteResult<DoorConfiguration> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| QuoteError::ConfigurationNotFound {
                config_id: id.to_string(),
            })?;
        Ok(self.items.remove(pos))
    }

    /// Load a line into the selection for editing
    pub fn edit(&self, id: &str, selection: &mut Selection) -> QuoteResult<()> {
        let config = self.get(id).ok_or_else(|| QuoteError::ConfigurationNotFound {
            config_id: id.to_string(),
        })?;
        selection.load_for_edit(config);
        Ok(())
    }

    /// Remove a line. An edit of that line in `selection` is cancelled.
    pub fn remove_editing(
        &mut self,
        id: &str,
        selection: &mut Selection,
    ) -> QuoteResult<DoorConfiguration> {
        let removed = self.remove(id)?;
        selection.forget(id);
        Ok(removed)
    }

    /// Re-resolve every embedded item against the live catalog.
    /// Items whose id left the catalog keep their embedded copy.
    /// Returns how many embedded prices changed.
    pub fn recalculate(&mut self, catalog: &Catalog) -> usize {
        let index = catalog.index();
        let changed = self
            .items
            .iter_mut()
            .map(|item| item.refresh_from(&index))
            .sum();
        debug!(
            catalog_version = catalog.version,
            changed, "project prices recalculated"
        );
        changed
    }

    /// Lines grouped by door type (canonical order, empty groups omitted),
    /// each group sorted by `sort` when given.
    pub fn grouped(&self, sort: Option<SortConfig>) -> Vec<ProjectGroup<'_>> {
        DoorType::ALL
            .iter()
            .filter_map(|&door_type| {
                let mut items: Vec<&DoorConfiguration> = self
                    .items
                    .iter()
                    .filter(|i| i.door_type == door_type)
                    .collect();
                if items.is_empty() {
                    return None;
                }
                if let Some(sort) = sort {
                    items.sort_by(|a, b| sort.compare(a, b));
                }
                Some(ProjectGroup { door_type, items })
            })
            .collect()
    }

    /// Archive snapshot taken at `now`.
    ///
    /// Blank names fall back to `Project DD.MM.YYYY`, using the date in
    /// `now`'s own time zone. Blank customer and manager fall back to
    /// [`NOT_SPECIFIED`]. Timestamps are stored in UTC.
    pub fn snapshot<Tz>(&self, now: DateTime<Tz>) -> QuoteResult<SavedProject>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if self.is_empty() {
            return Err(QuoteError::EmptyProject);
        }

        let name = match self.name.trim() {
            "" => format!("Project {}", now.format("%d.%m.%Y")),
            trimmed => trimmed.to_string(),
        };

        let now = now.with_timezone(&Utc);
        Ok(SavedProject {
            id: new_id(),
            created_at: now,
            updated_at: now,
            name,
            customer: or_not_specified(&self.customer),
            manager: or_not_specified(&self.manager),
            comments: self.comments.clone(),
            items: self.items.clone(),
            total_amount: self.total(),
        })
    }
}

fn or_not_specified(value: &str) -> String {
    if value.trim().is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        value.to_string()
    }
}

/// Order table column to sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Leaf name, case-insensitive
    Name,
    Quantity,
    /// Line total after discount
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Order table sort state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }

    /// Next state after clicking `key`: the same key while ascending flips
    /// to descending, anything else starts ascending.
    pub fn request(current: Option<SortConfig>, key: SortKey) -> SortConfig {
        match current {
            Some(c) if c.key == key && c.direction == SortDirection::Asc => Self::descending(key),
            _ => Self::ascending(key),
        }
    }

    pub fn compare(&self, a: &DoorConfiguration, b: &DoorConfiguration) -> Ordering {
        let ord = match self.key {
            SortKey::Name => leaf_name(a).cmp(&leaf_name(b)),
            SortKey::Quantity => a.quantity.cmp(&b.quantity),
            SortKey::Price => a.total().cmp(&b.total()),
        };
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

fn leaf_name(config: &DoorConfiguration) -> String {
    config
        .leaf
        .as_ref()
        .map(|l| l.name.to_lowercase())
        .unwrap_or_default()
}

/// Lines of one door type in the order table
#[derive(Debug, Clone, Serialize)]
pub struct ProjectGroup<'a> {
    pub door_type: DoorType,
    pub items: Vec<&'a DoorConfiguration>,
}

impl ProjectGroup<'_> {
    pub fn label(&self) -> &'static str {
        self.door_type.label()
    }

    pub fn total(&self) -> i64 {
        self.items
            .iter()
            .fold(0_i64, |acc, i| acc.saturating_add(i.total()))
    }
}

/// Archived project snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedProject {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub customer: String,
    pub manager: String,
    #[serde(default)]
    pub comments: String,
    pub items: Vec<DoorConfiguration>,
    /// Project total at the time of saving
    pub total_amount: i64,
}

impl SavedProject {
    /// Working copy of the archived project
    pub fn restore(&self) -> Project {
        Project {
            name: self.name.clone(),
            customer: self.customer.clone(),
            manager: self.manager.clone(),
            comments: self.comments.clone(),
            items: self.items.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogItem, Category};
    use crate::pricing::{Discount, DiscountType};
    use chrono::FixedOffset;

    fn item(id: &str, name: &str, price: i64, category: Category) -> CatalogItem {
        CatalogItem::new(id, name, price, category)
    }

    fn selection(leaf_name: &str, leaf_price: i64, door_type: DoorType) -> Selection {
        let mut s = Selection::new(door_type);
        s.select_leaf(item(&format!("leaf-{}", leaf_name), leaf_name, leaf_price, Category::Leaf));
        s.select_frame(item("f1_mdf_wrap", "MDF wrap frame", 18022, Category::Frame));
        s
    }

    fn reference_project() -> Project {
        let first = DoorConfiguration::new(DoorType::Single)
            .with_leaf(item("l1_ral_base", "MDF leaf", 34003, Category::Leaf))
            .with_frame(item("f1_mdf_wrap", "MDF wrap frame", 18022, Category::Frame))
            .with_options(vec![item("opt_glass_25", "Glazing 25%", 4500, Category::Option)])
            .with_quantity(2)
            .with_discount(Discount::percent(10.0));
        let second = DoorConfiguration::new(DoorType::Double)
            .with_leaf(item("l2_metal", "Metal leaf 2.0", 59347, Category::Leaf));

        Project::new()
            .with_name("Clinic, building B")
            .with_item(first)
            .with_item(second)
    }

    #[test]
    fn test_project_total() {
        assert_eq!(Project::new().total(), 0);
        let project = reference_project();
        assert_eq!(project.total(), 161092);
        assert_eq!(project.total(), project.total());
        assert_eq!(project.door_count(), 3);
    }

    #[test]
    fn test_commit_appends_and_keeps_selection() {
        let mut project = Project::new();
        let mut s = selection("Oak", 30000, DoorType::Single);

        let first = project.commit(&mut s).unwrap();
        let second = project.commit(&mut s).unwrap();
        assert_ne!(first, second);
        assert_eq!(project.len(), 2);
        assert!(s.leaf.is_some());
    }

    #[test]
    fn test_commit_requires_leaf_and_frame() {
        let mut project = Project::new();
        let mut s = Selection::new(DoorType::Single);
        assert!(matches!(
            project.commit(&mut s),
            Err(QuoteError::IncompleteConfiguration { missing: "leaf" })
        ));
        assert!(project.is_empty());
    }

    #[test]
    fn test_commit_edit_replaces_in_place() {
        let mut project = Project::new();
        let mut s = selection("Oak", 30000, DoorType::Single);
        let id = project.commit(&mut s).unwrap();
        project.commit(&mut selection("Ash", 20000, DoorType::Single)).unwrap();

        let mut edit = Selection::editing(project.get(&id).unwrap());
        edit.set_quantity(4);
        edit.set_discount("5", DiscountType::Percent);
        let edited = project.commit(&mut edit).unwrap();

        assert_eq!(edited, id);
        assert_eq!(project.len(), 2);
        assert_eq!(project.items[0].id, id);
        assert_eq!(project.items[0].quantity, 4);
        assert_eq!(project.items[0].discount, Some(Discount::percent(5.0)));
        assert!(!edit.is_editing());
        assert!(edit.leaf.is_none());
    }

    #[test]
    fn test_commit_edit_of_removed_line() {
        let mut project = Project::new();
        let mut s = selection("Oak", 30000, DoorType::Single);
        let id = project.commit(&mut s).unwrap();

        let mut edit = Selection::editing(project.get(&id).unwrap());
        project.remove(&id).unwrap();
        assert!(matches!(
            project.commit(&mut edit),
            Err(QuoteError::ConfigurationNotFound { .. })
        ));
    }

    #[test]
    fn test_edit_loads_line_into_selection() {
        let project = reference_project();
        let id = project.items[0].id.clone();
        let mut s = selection("Ash", 20000, DoorType::Double);

        project.edit(&id, &mut s).unwrap();
        assert_eq!(s.editing_id.as_deref(), Some(id.as_str()));
        assert_eq!(s.door_type, DoorType::Single);
        assert_eq!(s.quantity, 2);
        assert_eq!(s.total(), 101745);

        assert!(matches!(
            project.edit("missing", &mut s),
            Err(QuoteError::ConfigurationNotFound { .. })
        ));
    }

    #[test]
    fn test_remove_cancels_edit_of_that_line() {
        let mut project = reference_project();
        let edited = project.items[0].id.clone();
        let other = project.items[1].id.clone();
        let mut s = Selection::new(DoorType::Single);
        project.edit(&edited, &mut s).unwrap();

        // Removing another line leaves the edit alone
        project.remove_editing(&other, &mut s).unwrap();
        assert!(s.is_editing());

        project.remove_editing(&edited, &mut s).unwrap();
        assert!(project.is_empty());
        assert!(!s.is_editing());
        assert!(s.leaf.is_none());
        assert_eq!(s.door_type, DoorType::Single);
    }

    #[test]
    fn test_totals_saturate_on_huge_lines() {
        let huge = |quantity: u32, price: i64| {
            DoorConfiguration::new(DoorType::Single)
                .with_leaf(item("l1_huge", "Huge", price, Category::Leaf))
                .with_quantity(quantity)
        };

        let project = Project::new()
            .with_item(huge(3_000_000_000, 1))
            .with_item(huge(3_000_000_000, 1));
        assert_eq!(project.door_count(), u32::MAX);

        let project = Project::new()
            .with_item(huge(4, i64::MAX / 2))
            .with_item(huge(4, i64::MAX / 2));
        assert_eq!(project.total(), i64::MAX);
        assert_eq!(project.grouped(None)[0].total(), i64::MAX);
    }

    #[test]
    fn test_duplicate_and_remove() {
        let mut project = reference_project();
        let original = project.items[0].id.clone();
        let copy = project.duplicate(&original).unwrap();

        assert_eq!(project.len(), 3);
        assert_ne!(copy, original);
        assert_eq!(project.get(&copy).unwrap().total(), 101745);

        project.remove(&original).unwrap();
        assert!(project.get(&original).is_none());
        assert!(project.remove("missing").is_err());
    }

    #[test]
    fn test_recalculate_against_catalog() {
        let mut catalog = Catalog::new()
            .with_leaf(DoorType::Single, item("l1_ral_base", "MDF leaf", 34003, Category::Leaf))
            .with_frame(DoorType::Single, item("f1_mdf_wrap", "MDF wrap frame", 18022, Category::Frame))
            .with_item(item("opt_glass_25", "Glazing 25%", 4500, Category::Option));
        catalog
            .set_price(Category::Option, None, "opt_glass_25", 5500)
            .unwrap();

        let mut project = reference_project();
        let changed = project.recalculate(&catalog);

        assert_eq!(changed, 1);
        assert_eq!(project.items[0].options[0].price, 5500);
        // l2_metal is not in this catalog and keeps its embedded price
        assert_eq!(project.items[1].leaf.as_ref().unwrap().price, 59347);
    }

    #[test]
    fn test_grouped_in_canonical_order() {
        let mut project = Project::new();
        project.commit(&mut selection("Double", 1, DoorType::Double)).unwrap();
        project.commit(&mut selection("Single", 1, DoorType::Single)).unwrap();

        let groups = project.grouped(None);
        let types: Vec<_> = groups.iter().map(|g| g.door_type).collect();
        assert_eq!(types, vec![DoorType::Single, DoorType::Double]);
        assert_eq!(groups[0].label(), "Single door (1.0)");
    }

    #[test]
    fn test_grouped_sorting() {
        let mut project = Project::new();
        let mut cheap = selection("beech", 10000, DoorType::Single);
        cheap.set_quantity(5);
        project.commit(&mut cheap).unwrap();
        project.commit(&mut selection("Ash", 50000, DoorType::Single)).unwrap();
        project.commit(&mut selection("cedar", 30000, DoorType::Single)).unwrap();

        let names = |sort: SortConfig| -> Vec<String> {
            project.grouped(Some(sort))[0]
                .items
                .iter()
                .map(|i| i.leaf.as_ref().unwrap().name.clone())
                .collect()
        };

        assert_eq!(names(SortConfig::ascending(SortKey::Name)), vec!["Ash", "beech", "cedar"]);
        assert_eq!(names(SortConfig::descending(SortKey::Quantity))[0], "beech");
        // beech: 28022 * 5 = 140110, Ash: 68022, cedar: 48022
        assert_eq!(
            names(SortConfig::descending(SortKey::Price)),
            vec!["beech", "Ash", "cedar"]
        );

        // Unsorted keeps insertion order
        let unsorted: Vec<_> = project.grouped(None)[0]
            .items
            .iter()
            .map(|i| i.leaf.as_ref().unwrap().name.clone())
            .collect();
        assert_eq!(unsorted, vec!["beech", "Ash", "cedar"]);
    }

    #[test]
    fn test_sort_request_toggles() {
        let first = SortConfig::request(None, SortKey::Price);
        assert_eq!(first, SortConfig::ascending(SortKey::Price));
        let second = SortConfig::request(Some(first), SortKey::Price);
        assert_eq!(second, SortConfig::descending(SortKey::Price));
        let third = SortConfig::request(Some(second), SortKey::Price);
        assert_eq!(third, SortConfig::ascending(SortKey::Price));
        let other = SortConfig::request(Some(first), SortKey::Name);
        assert_eq!(other, SortConfig::ascending(SortKey::Name));
    }

    #[test]
    fn test_snapshot_defaults() {
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        assert!(matches!(
            Project::new().snapshot(now),
            Err(QuoteError::EmptyProject)
        ));

        let mut project = reference_project().with_customer("  ");
        project.name = "   ".into();
        let saved = project.snapshot(now).unwrap();

        assert_eq!(saved.name, "Project 09.03.2026");
        assert_eq!(saved.customer, NOT_SPECIFIED);
        assert_eq!(saved.manager, NOT_SPECIFIED);
        assert_eq!(saved.total_amount, 161092);
        assert_eq!(saved.created_at, now);

        let restored = saved.restore();
        assert_eq!(restored.items, project.items);
        assert_eq!(restored.name, "Project 09.03.2026");
    }

    #[test]
    fn test_snapshot_name_uses_local_date() {
        // 01:30 on 10 March in UTC+3 is still 9 March in UTC
        let moscow = FixedOffset::east_opt(3 * 3600).unwrap();
        let now = moscow.with_ymd_and_hms(2026, 3, 10, 1, 30, 0).unwrap();

        let saved = reference_project().with_name("").snapshot(now).unwrap();
        assert_eq!(saved.name, "Project 10.03.2026");
        assert_eq!(
            saved.created_at,
            Utc.with_ymd_and_hms(2026, 3, 9, 22, 30, 0).unwrap()
        );
    }
}

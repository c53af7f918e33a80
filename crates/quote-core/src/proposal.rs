//! # Commercial Proposal
//!
//! Render-ready data for the customer proposal document. Layout and PDF
//! generation live outside this crate; this module only decides what goes
//! on the page.

use crate::catalog::{Currency, DoorType};
use crate::configuration::DoorConfiguration;
use crate::pricing::{DiscountType, VatRate};
use crate::project::Project;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const UNSPECIFIED: &str = "not specified";
const UNTITLED: &str = "untitled";

/// One table row of the proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalRow {
    pub title: String,
    /// Frame name
    pub details: String,
    /// Options, hardware and accessories
    pub extras: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_note: Option<String>,
    pub quantity: u32,
    pub total: i64,
}

impl ProposalRow {
    fn from_configuration(config: &DoorConfiguration, currency: Currency) -> Self {
        let discount_note = config
            .discount
            .filter(|d| d.is_effective())
            .map(|d| match d.kind {
                DiscountType::Percent => format!("Discount: {}%", d.value),
                DiscountType::Fixed => {
                    format!("Discount: {}", currency.format_fractional(d.value))
                }
            });

        Self {
            title: config
                .leaf
                .as_ref()
                .map(|l| l.name.clone())
                .unwrap_or_else(|| "Leaf not selected".to_string()),
            details: config
                .frame
                .as_ref()
                .map(|f| f.name.clone())
                .unwrap_or_else(|| "Frame not selected".to_string()),
            extras: config.extras().map(|i| i.name.clone()).collect(),
            discount_note,
            quantity: config.quantity,
            total: config.total(),
        }
    }
}

/// Rows of one door type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalSection {
    pub door_type: DoorType,
    pub label: String,
    pub rows: Vec<ProposalRow>,
}

/// Everything the proposal document shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub project_name: String,
    pub customer: String,
    pub manager: String,
    #[serde(default)]
    pub comments: String,
    /// DD.MM.YYYY
    pub date: String,
    pub currency: Currency,
    pub sections: Vec<ProposalSection>,
    pub subtotal: i64,
    pub vat_bps: u32,
    pub vat_amount: i64,
    pub total_with_vat: i64,
    pub file_name: String,
}

impl Proposal {
    pub fn build(project: &Project, vat_rate: VatRate, date: NaiveDate, currency: Currency) -> Self {
        let sections = project
            .grouped(None)
            .into_iter()
            .map(|group| ProposalSection {
                door_type: group.door_type,
                label: group.label().to_string(),
                rows: group
                    .items
                    .iter()
                    .map(|c| ProposalRow::from_configuration(c, currency))
                    .collect(),
            })
            .collect();

        let subtotal = project.total();
        let vat_amount = vat_rate.vat_on(subtotal);

        let file_stem = match project.name.trim() {
            "" => "Project",
            name => name,
        };

        Self {
            project_name: or_default(&project.name, UNTITLED),
            customer: or_default(&project.customer, UNSPECIFIED),
            manager: or_default(&project.manager, UNSPECIFIED),
            comments: project.comments.clone(),
            date: date.format("%d.%m.%Y").to_string(),
            currency,
            sections,
            subtotal,
            vat_bps: vat_rate.bps(),
            vat_amount,
            total_with_vat: subtotal.saturating_add(vat_amount),
            file_name: format!("proposal_{}.pdf", file_stem),
        }
    }

    /// Number of rows across all sections
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }
}

fn or_default(value: &str, fallback: &str) -> String {
    match value.trim() {
        "" => fallback.to_string(),
        trimmed => trimmed.to_string(),
    }
}

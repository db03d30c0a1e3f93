//! Column layouts per tariff group and account role.
//!
//! The destination columns are domain rules fixed by the workbook template:
//! generator balance always lands in column P and beneficiary balance in
//! column Q, meter data exists only on low-voltage tabs, and the Group A
//! technical summary keeps consumption and demand segment columns of its
//! own. Layouts are data so the populator has a single code path.

use crate::models::{AccountRole, TariffGroup};

/// Resolved column letters for one (tariff group, role) combination.
/// `None` means the field has no destination on that tab.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnLayout {
    pub prior_reading_date: Option<&'static str>,
    pub current_reading_date: Option<&'static str>,
    pub generation: Option<&'static str>,
    pub credit_received: Option<&'static str>,
    pub consumption: Option<&'static str>,
    pub invoice_total: Option<&'static str>,
    pub balance: Option<&'static str>,
    pub meter: Option<&'static str>,
    pub prior_meter_reading: Option<&'static str>,
    pub current_meter_reading: Option<&'static str>,
}

/// Resolve the base column map for an account. Computed once per account
/// before any of its records are written.
pub fn resolve(group: TariffGroup, role: AccountRole) -> ColumnLayout {
    match (group, role) {
        (TariffGroup::B, AccountRole::Generator) => ColumnLayout {
            prior_reading_date: Some("B"),
            current_reading_date: Some("C"),
            generation: Some("I"),
            credit_received: Some("J"),
            consumption: Some("K"),
            invoice_total: Some("N"),
            balance: Some("P"),
            meter: Some("R"),
            prior_meter_reading: Some("S"),
            current_meter_reading: Some("T"),
        },
        (TariffGroup::B, AccountRole::Beneficiary) => ColumnLayout {
            prior_reading_date: Some("B"),
            current_reading_date: Some("C"),
            generation: None,
            credit_received: Some("J"),
            consumption: Some("K"),
            invoice_total: Some("N"),
            balance: Some("Q"),
            meter: Some("R"),
            prior_meter_reading: Some("S"),
            current_meter_reading: Some("T"),
        },
        (TariffGroup::A, AccountRole::Generator) => ColumnLayout {
            generation: Some("G"),
            consumption: Some("I"),
            invoice_total: Some("L"),
            balance: Some("P"),
            ..Default::default()
        },
        (TariffGroup::A, AccountRole::Beneficiary) => ColumnLayout {
            consumption: Some("F"),
            credit_received: Some("H"),
            invoice_total: Some("J"),
            balance: Some("Q"),
            ..Default::default()
        },
    }
}

/// Segment columns of the group-level "GRUPO A" technical tab:
/// consumption peak/off-peak/reserved, demand peak/off-peak/reserved.
pub const GRUPO_A_CONSUMPTION: [&str; 3] = ["B", "C", "D"];
pub const GRUPO_A_DEMAND: [&str; 3] = ["L", "M", "N"];

/// First data row of every month table.
pub const ROW_SCAN_START: u32 = 5;

/// Last scanned row of a per-account tab for the given group.
pub fn account_row_bound(group: TariffGroup) -> u32 {
    match group {
        TariffGroup::B => 39,
        TariffGroup::A => 44,
    }
}

/// Last scanned row of the "GRUPO A" technical tab.
pub const GRUPO_A_ROW_BOUND: u32 = 24;

/// First row of the cross-account summary ("RESUMO") listing.
pub const SUMMARY_START_ROW: u32 = 7;
/// Summary columns: account id and address.
pub const SUMMARY_ACCOUNT_COL: &str = "F";
pub const SUMMARY_ADDRESS_COL: &str = "G";

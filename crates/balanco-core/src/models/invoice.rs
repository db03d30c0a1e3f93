//! Invoice record models for Brazilian utility bills.

use serde::{Deserialize, Serialize};

/// Three-letter Portuguese month codes as printed on invoices, in calendar order.
pub const MONTH_CODES: [&str; 12] = [
    "JAN", "FEV", "MAR", "ABR", "MAI", "JUN", "JUL", "AGO", "SET", "OUT", "NOV", "DEZ",
];

/// Map a three-letter month code to its 1-based calendar number.
///
/// Returns `None` for anything that is not one of the twelve codes.
pub fn month_code_to_number(code: &str) -> Option<u32> {
    MONTH_CODES
        .iter()
        .position(|m| code.eq_ignore_ascii_case(m))
        .map(|i| i as u32 + 1)
}

/// One billing period extracted from a single invoice PDF.
///
/// Every numeric field defaults to zero when its source pattern is absent;
/// absence is a defined fallback, not an error. `month` may be empty when
/// the identity anchor does not match, which marks the record unplaceable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Utility account number (UC).
    pub account_id: String,
    /// Three-letter month code ("JAN".."DEZ"), empty when not found.
    pub month: String,
    /// Four-digit year, 0 when not found.
    pub year: i32,

    /// Delivery address (Group B invoices only).
    pub address: String,
    /// Previous reading date as printed (dd/mm/yyyy).
    pub prior_reading_date: String,
    /// Current reading date as printed (dd/mm/yyyy).
    pub current_reading_date: String,

    /// Meter identifier (Group B only).
    pub meter_id: String,
    /// Previous meter register value.
    pub prior_meter_reading: i64,
    /// Current meter register value.
    pub current_meter_reading: i64,

    /// Active energy consumption in kWh (Group B single-register figure).
    pub active_energy_kwh: f64,
    /// Energy injected by the generating unit in kWh.
    pub generated_energy_kwh: f64,
    /// Compensation credit received in kWh.
    pub credit_received_kwh: f64,
    /// Carried-over credit balance in kWh. For Group A this is the sum of
    /// every per-segment balance figure on the invoice.
    pub balance_kwh: f64,
    /// Invoice total in currency.
    pub invoice_total: f64,

    /// Time-of-use consumption segments (Group A only).
    pub consumption_peak: f64,
    pub consumption_offpeak: f64,
    pub consumption_reserved: f64,
    /// Time-of-use demand segments (Group A only).
    pub demand_peak: f64,
    pub demand_offpeak: f64,
    pub demand_reserved: f64,

    /// Historical months from the trailing 12-month table, in document order,
    /// excluding the record's own period.
    pub history: Vec<HistoryEntry>,
}

impl InvoiceRecord {
    /// Calendar month number of the record's own period, if placeable.
    pub fn month_number(&self) -> Option<u32> {
        month_code_to_number(&self.month)
    }

    /// Total consumption across all tariff segments (Group A records).
    pub fn segment_consumption_total(&self) -> f64 {
        self.consumption_peak + self.consumption_offpeak + self.consumption_reserved
    }
}

/// A historical month's consumption/demand snapshot, owned by its parent
/// [`InvoiceRecord`]. Group B tables carry only `consumption`; the segment
/// fields stay at their zero defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Three-letter month code.
    pub month: String,
    /// Two-digit year as printed in the history table.
    pub year: u32,

    /// Single-register consumption in kWh (Group B).
    pub consumption: f64,

    /// Segment consumption (Group A table).
    pub consumption_peak: f64,
    pub consumption_offpeak: f64,
    pub consumption_reserved: f64,
    /// Segment demand (Group A table).
    pub demand_peak: f64,
    pub demand_offpeak: f64,
    pub demand_reserved: f64,
}

impl HistoryEntry {
    /// Calendar month number of the entry.
    pub fn month_number(&self) -> Option<u32> {
        month_code_to_number(&self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_code_to_number() {
        assert_eq!(month_code_to_number("JAN"), Some(1));
        assert_eq!(month_code_to_number("dez"), Some(12));
        assert_eq!(month_code_to_number(""), None);
        assert_eq!(month_code_to_number("XYZ"), None);
    }

    #[test]
    fn test_record_defaults_are_zero() {
        let record = InvoiceRecord::default();
        assert_eq!(record.active_energy_kwh, 0.0);
        assert_eq!(record.balance_kwh, 0.0);
        assert_eq!(record.year, 0);
        assert!(record.month.is_empty());
        assert!(record.month_number().is_none());
    }

    #[test]
    fn test_segment_consumption_total() {
        let record = InvoiceRecord {
            consumption_peak: 100.0,
            consumption_offpeak: 250.5,
            consumption_reserved: 49.5,
            ..Default::default()
        };
        assert_eq!(record.segment_consumption_total(), 400.0);
    }
}

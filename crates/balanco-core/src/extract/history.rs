//! Extraction of the trailing 12-month history table.

use tracing::debug;

use crate::models::{HistoryEntry, TariffGroup};

use super::number::parse_br_number;
use super::patterns::{HISTORY_A, HISTORY_B};

/// Scan normalized invoice text for the tabular month-history block and
/// produce one entry per match, in document order.
///
/// Duplicate months in the source text produce duplicate entries; the
/// populator decides by skipping months whose target cell is already
/// populated.
pub fn extract_history(text: &str, group: TariffGroup) -> Vec<HistoryEntry> {
    let entries = match group {
        TariffGroup::B => extract_history_b(text),
        TariffGroup::A => extract_history_a(text),
    };
    debug!("Extracted {} history entries", entries.len());
    entries
}

/// Group B table: "MES/AA <kwh>" rows with a single consumption column.
fn extract_history_b(text: &str) -> Vec<HistoryEntry> {
    HISTORY_B
        .captures_iter(text)
        .map(|caps| HistoryEntry {
            month: caps[1].to_string(),
            year: caps[2].parse().unwrap_or(0),
            consumption: parse_br_number(&caps[3]),
            ..Default::default()
        })
        .collect()
}

/// Group A table: "MES/AA" followed by 7-9 numeric columns. Token positions
/// are fixed by the source table: demand P/FP/RE, consumption P/FP, a
/// reactive column that is skipped, then consumption RE.
fn extract_history_a(text: &str) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();

    for caps in HISTORY_A.captures_iter(text) {
        let values: Vec<&str> = caps[3].split_whitespace().collect();
        if values.len() < 7 {
            continue;
        }

        entries.push(HistoryEntry {
            month: caps[1].to_string(),
            year: caps[2].parse().unwrap_or(0),
            demand_peak: parse_br_number(values[0]),
            demand_offpeak: parse_br_number(values[1]),
            demand_reserved: parse_br_number(values[2]),
            consumption_peak: parse_br_number(values[3]),
            consumption_offpeak: parse_br_number(values[4]),
            consumption_reserved: parse_br_number(values[6]),
            ..Default::default()
        });
    }

    entries
}

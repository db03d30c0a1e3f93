//! Workbook population: month row lookup, field writes, history backfill,
//! summary tab.

use tracing::{debug, info, warn};

use crate::models::{AccountBatch, AccountRole, InvoiceRecord, TariffGroup};

use super::layout::{
    self, ColumnLayout, GRUPO_A_CONSUMPTION, GRUPO_A_DEMAND, GRUPO_A_ROW_BOUND, ROW_SCAN_START,
    SUMMARY_ACCOUNT_COL, SUMMARY_ADDRESS_COL, SUMMARY_START_ROW, account_row_bound,
};
use super::{CellValue, Workbook, column_index};

const GRUPO_A_TAB_FRAGMENT: &str = "GRUPO A";
const SUMMARY_TAB_FRAGMENT: &str = "RESUMO";

/// Find the row of `tab` whose column-A cell displays the given calendar
/// month, scanning rows 5..=`max_row`. First match wins.
pub fn find_row(workbook: &impl Workbook, tab: &str, month: u32, max_row: u32) -> Option<u32> {
    (ROW_SCAN_START..=max_row)
        .find(|&row| workbook.cell_value(tab, 1, row).month_number() == Some(month))
}

/// Redirect a coordinate to the anchor of its owning merged range, if any.
/// Resolution is by membership test over the tab's range list; the ranges
/// are irregular, so coordinate arithmetic is not an option.
fn anchor_of(workbook: &impl Workbook, tab: &str, col: u32, row: u32) -> (u32, u32) {
    workbook
        .merged_ranges(tab)
        .iter()
        .find(|range| range.contains(col, row))
        .map(|range| range.anchor())
        .unwrap_or((col, row))
}

/// Write a cell through merged-range anchor redirection. Last write wins.
fn write_cell(workbook: &mut impl Workbook, tab: &str, col_letter: &str, row: u32, value: CellValue) {
    let col = column_index(col_letter);
    let (col, row) = anchor_of(workbook, tab, col, row);
    workbook.set_cell(tab, col, row, value);
}

/// Write only when the (anchor-resolved) destination is still empty.
/// Protects real invoice data from being overwritten by inferred history.
fn write_cell_if_empty(
    workbook: &mut impl Workbook,
    tab: &str,
    col_letter: &str,
    row: u32,
    value: CellValue,
) {
    let col = column_index(col_letter);
    let (col, row) = anchor_of(workbook, tab, col, row);
    if workbook.cell_value(tab, col, row).is_empty() {
        workbook.set_cell(tab, col, row, value);
    }
}

fn write_field(
    workbook: &mut impl Workbook,
    tab: &str,
    col: Option<&str>,
    row: u32,
    value: CellValue,
) {
    if let Some(col) = col {
        write_cell(workbook, tab, col, row, value);
    }
}

/// Populate the prepared workbook from the account batches.
///
/// Every sub-operation degrades independently: an unplaceable record, a
/// month with no matching row, or a missing destination tab skips only
/// that write and population continues.
pub fn populate(workbook: &mut impl Workbook, batches: &[AccountBatch], group: TariffGroup) {
    let grupo_a_tab = match group {
        TariffGroup::A => workbook.find_tab_containing(GRUPO_A_TAB_FRAGMENT),
        TariffGroup::B => None,
    };

    for batch in batches {
        let tab = batch.tab_name();
        let layout = layout::resolve(group, batch.role);
        let bound = account_row_bound(group);
        let tab_exists = workbook.has_tab(&tab);

        if !tab_exists {
            warn!("Destination tab {tab} not found; per-account fields skipped");
        }

        info!(
            "Populating {} record(s) for tab {tab}",
            batch.records.len()
        );

        for record in &batch.records {
            let Some(month) = record.month_number() else {
                debug!("Record without period anchor; placement skipped");
                continue;
            };

            if tab_exists {
                match find_row(workbook, &tab, month, bound) {
                    Some(row) => {
                        write_current_period(workbook, &tab, &layout, row, record, group)
                    }
                    None => debug!("No row for month {month} in {tab}"),
                }
            }

            if let Some(ga_tab) = grupo_a_tab.as_deref() {
                if let Some(row) = find_row(workbook, ga_tab, month, GRUPO_A_ROW_BOUND) {
                    write_segments(workbook, ga_tab, row, record, false);
                }
            }

            backfill_history(workbook, &tab, tab_exists, grupo_a_tab.as_deref(), &layout, record, group, month, bound);
        }
    }

    update_summary(workbook, batches);
}

/// Current-period fields are written unconditionally; a repeated month on a
/// later invoice simply wins.
fn write_current_period(
    workbook: &mut impl Workbook,
    tab: &str,
    layout: &ColumnLayout,
    row: u32,
    record: &InvoiceRecord,
    group: TariffGroup,
) {
    let consumption = match group {
        TariffGroup::B => record.active_energy_kwh,
        TariffGroup::A => record.segment_consumption_total(),
    };

    write_field(workbook, tab, layout.prior_reading_date, row, CellValue::Text(record.prior_reading_date.clone()));
    write_field(workbook, tab, layout.current_reading_date, row, CellValue::Text(record.current_reading_date.clone()));
    write_field(workbook, tab, layout.generation, row, CellValue::Number(record.generated_energy_kwh));
    write_field(workbook, tab, layout.credit_received, row, CellValue::Number(record.credit_received_kwh));
    write_field(workbook, tab, layout.consumption, row, CellValue::Number(consumption));
    write_field(workbook, tab, layout.invoice_total, row, CellValue::Number(record.invoice_total));
    write_field(workbook, tab, layout.balance, row, CellValue::Number(record.balance_kwh));
    write_field(workbook, tab, layout.meter, row, CellValue::Text(record.meter_id.clone()));
    write_field(workbook, tab, layout.prior_meter_reading, row, CellValue::Number(record.prior_meter_reading as f64));
    write_field(workbook, tab, layout.current_meter_reading, row, CellValue::Number(record.current_meter_reading as f64));
}

/// Segment consumption/demand columns of the "GRUPO A" technical tab.
/// `guarded` writes protect already-populated months (history backfill).
fn write_segments(
    workbook: &mut impl Workbook,
    tab: &str,
    row: u32,
    record: &InvoiceRecord,
    guarded: bool,
) {
    let values = [
        (GRUPO_A_CONSUMPTION[0], record.consumption_peak),
        (GRUPO_A_CONSUMPTION[1], record.consumption_offpeak),
        (GRUPO_A_CONSUMPTION[2], record.consumption_reserved),
        (GRUPO_A_DEMAND[0], record.demand_peak),
        (GRUPO_A_DEMAND[1], record.demand_offpeak),
        (GRUPO_A_DEMAND[2], record.demand_reserved),
    ];

    for (col, value) in values {
        if guarded {
            write_cell_if_empty(workbook, tab, col, row, CellValue::Number(value));
        } else {
            write_cell(workbook, tab, col, row, CellValue::Number(value));
        }
    }
}

/// Backfill historical months from the record's history table, writing only
/// the consumption-equivalent fields and never over a non-empty cell.
#[allow(clippy::too_many_arguments)]
fn backfill_history(
    workbook: &mut impl Workbook,
    tab: &str,
    tab_exists: bool,
    grupo_a_tab: Option<&str>,
    layout: &ColumnLayout,
    record: &InvoiceRecord,
    group: TariffGroup,
    current_month: u32,
    bound: u32,
) {
    for entry in &record.history {
        let Some(month) = entry.month_number() else {
            continue;
        };
        if month == current_month {
            continue;
        }

        match group {
            TariffGroup::B => {
                if !tab_exists {
                    continue;
                }
                let Some(col) = layout.consumption else { continue };
                if let Some(row) = find_row(workbook, tab, month, bound) {
                    write_cell_if_empty(workbook, tab, col, row, CellValue::Number(entry.consumption));
                }
            }
            TariffGroup::A => {
                let Some(ga_tab) = grupo_a_tab else { continue };
                if let Some(row) = find_row(workbook, ga_tab, month, GRUPO_A_ROW_BOUND) {
                    let snapshot = InvoiceRecord {
                        consumption_peak: entry.consumption_peak,
                        consumption_offpeak: entry.consumption_offpeak,
                        consumption_reserved: entry.consumption_reserved,
                        demand_peak: entry.demand_peak,
                        demand_offpeak: entry.demand_offpeak,
                        demand_reserved: entry.demand_reserved,
                        ..Default::default()
                    };
                    write_segments(workbook, ga_tab, row, &snapshot, true);
                }
            }
        }
    }
}

/// Fill the "RESUMO" cross-account listing: one row per account from row 7,
/// generators before beneficiaries in ascending sequence order.
fn update_summary(workbook: &mut impl Workbook, batches: &[AccountBatch]) {
    let Some(tab) = workbook.find_tab_containing(SUMMARY_TAB_FRAGMENT) else {
        warn!("Summary tab not found; summary update skipped");
        return;
    };

    let mut ordered: Vec<&AccountBatch> = batches.iter().collect();
    ordered.sort_by_key(|b| {
        let role_rank = match b.role {
            AccountRole::Generator => 0,
            AccountRole::Beneficiary => 1,
        };
        (role_rank, b.sequence_index)
    });

    let mut row = SUMMARY_START_ROW;
    for batch in ordered {
        let Some(record) = batch.records.first() else {
            continue;
        };
        write_cell(workbook, &tab, SUMMARY_ACCOUNT_COL, row, CellValue::Text(record.account_id.clone()));
        write_cell(workbook, &tab, SUMMARY_ADDRESS_COL, row, CellValue::Text(record.address.clone()));
        row += 1;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::HistoryEntry;
    use crate::workbook::MemoryWorkbook;
    use crate::workbook::prepare::prepare_tabs;

    /// Template tab with month codes in column A from row 5.
    fn add_month_rows(wb: &mut MemoryWorkbook, tab: &str) {
        wb.add_tab(tab);
        for (i, code) in crate::models::MONTH_CODES.iter().enumerate() {
            wb.set_cell(tab, 1, 5 + i as u32, CellValue::Text((*code).to_string()));
        }
    }

    /// GRUPO A style tab keyed with native date values.
    fn add_date_rows(wb: &mut MemoryWorkbook, tab: &str) {
        wb.add_tab(tab);
        for month in 1..=12u32 {
            let date = NaiveDate::from_ymd_opt(2025, month, 1).unwrap();
            wb.set_cell(tab, 1, 4 + month, CellValue::Date(date));
        }
    }

    fn record(month: &str) -> InvoiceRecord {
        InvoiceRecord {
            account_id: "12345678".to_string(),
            month: month.to_string(),
            year: 2025,
            address: "RUA DAS FLORES 100".to_string(),
            active_energy_kwh: 536.0,
            generated_energy_kwh: 456.0,
            credit_received_kwh: 436.0,
            balance_kwh: 120.0,
            invoice_total: 154.04,
            ..Default::default()
        }
    }

    #[test]
    fn test_find_row_by_text_and_date() {
        let mut wb = MemoryWorkbook::new();
        add_month_rows(&mut wb, "TEXTO");
        add_date_rows(&mut wb, "DATAS");

        assert_eq!(find_row(&wb, "TEXTO", 1, 39), Some(5));
        assert_eq!(find_row(&wb, "TEXTO", 12, 39), Some(16));
        assert_eq!(find_row(&wb, "DATAS", 3, 24), Some(7));
        assert_eq!(find_row(&wb, "MISSING", 1, 39), None);
    }

    #[test]
    fn test_balance_columns_disjoint_by_role() {
        let mut wb = MemoryWorkbook::new();
        add_month_rows(&mut wb, "UC GERADORA");
        add_month_rows(&mut wb, "UC BENEF");
        prepare_tabs(&mut wb, 1, 1);

        let batches = vec![
            AccountBatch::new(AccountRole::Generator, 1, vec![record("JAN")]),
            AccountBatch::new(AccountRole::Beneficiary, 1, vec![record("JAN")]),
        ];
        populate(&mut wb, &batches, TariffGroup::B);

        let p = column_index("P");
        let q = column_index("Q");
        assert_eq!(wb.cell_value("UC GERADORA", p, 5), CellValue::Number(120.0));
        assert_eq!(wb.cell_value("UC GERADORA", q, 5), CellValue::Empty);
        assert_eq!(wb.cell_value("UC BENEF. 1", q, 5), CellValue::Number(120.0));
        assert_eq!(wb.cell_value("UC BENEF. 1", p, 5), CellValue::Empty);
    }

    #[test]
    fn test_merged_write_redirects_to_anchor() {
        let mut wb = MemoryWorkbook::new();
        add_month_rows(&mut wb, "UC GERADORA");
        // Columns B and C of row 5 are merged; B5 is the anchor.
        wb.add_merged_range("UC GERADORA", "B5:C5");

        let mut rec = record("JAN");
        rec.prior_reading_date = "21/12/2024".to_string();
        rec.current_reading_date = "21/01/2025".to_string();
        let batches = vec![AccountBatch::new(AccountRole::Generator, 1, vec![rec])];
        populate(&mut wb, &batches, TariffGroup::B);

        // The C5 write lands on the anchor B5; C5 itself stays untouched.
        assert_eq!(
            wb.cell_value("UC GERADORA", 2, 5),
            CellValue::Text("21/01/2025".to_string())
        );
        assert_eq!(wb.cell_value("UC GERADORA", 3, 5), CellValue::Empty);
    }

    #[test]
    fn test_history_backfill_never_overwrites() {
        let mut wb = MemoryWorkbook::new();
        add_month_rows(&mut wb, "UC GERADORA");
        let k = column_index("K");
        // November already holds a real invoice figure.
        wb.set_cell("UC GERADORA", k, 15, CellValue::Number(999.0));

        let mut rec = record("JAN");
        rec.history = vec![
            HistoryEntry {
                month: "NOV".to_string(),
                year: 24,
                consumption: 230.0,
                ..Default::default()
            },
            HistoryEntry {
                month: "DEZ".to_string(),
                year: 24,
                consumption: 518.0,
                ..Default::default()
            },
        ];
        let batches = vec![AccountBatch::new(AccountRole::Generator, 1, vec![rec])];
        populate(&mut wb, &batches, TariffGroup::B);

        // NOV kept its value; DEZ was empty and got backfilled.
        assert_eq!(wb.cell_value("UC GERADORA", k, 15), CellValue::Number(999.0));
        assert_eq!(wb.cell_value("UC GERADORA", k, 16), CellValue::Number(518.0));
        // JAN holds the current-period figure, not a history one.
        assert_eq!(wb.cell_value("UC GERADORA", k, 5), CellValue::Number(536.0));
    }

    #[test]
    fn test_unplaceable_record_is_skipped() {
        let mut wb = MemoryWorkbook::new();
        add_month_rows(&mut wb, "UC GERADORA");

        let batches = vec![AccountBatch::new(AccountRole::Generator, 1, vec![record("")])];
        populate(&mut wb, &batches, TariffGroup::B);

        let k = column_index("K");
        for row in 5..=16 {
            assert_eq!(wb.cell_value("UC GERADORA", k, row), CellValue::Empty);
        }
    }

    #[test]
    fn test_group_a_fills_technical_tab_and_account_tab() {
        let mut wb = MemoryWorkbook::new();
        add_month_rows(&mut wb, "UC GERADORA");
        add_date_rows(&mut wb, "DIMENSIONAMENTO GRUPO A");

        let mut rec = record("MAR");
        rec.consumption_peak = 1200.0;
        rec.consumption_offpeak = 3400.0;
        rec.consumption_reserved = 150.0;
        rec.demand_peak = 12.5;
        rec.demand_offpeak = 40.0;
        rec.demand_reserved = 0.1;
        let batches = vec![AccountBatch::new(AccountRole::Generator, 1, vec![rec])];
        populate(&mut wb, &batches, TariffGroup::A);

        // Technical tab: consumption B/C/D, demand L/M/N on the March row.
        let ga = "DIMENSIONAMENTO GRUPO A";
        assert_eq!(wb.cell_value(ga, column_index("B"), 7), CellValue::Number(1200.0));
        assert_eq!(wb.cell_value(ga, column_index("D"), 7), CellValue::Number(150.0));
        assert_eq!(wb.cell_value(ga, column_index("L"), 7), CellValue::Number(12.5));
        assert_eq!(wb.cell_value(ga, column_index("N"), 7), CellValue::Number(0.1));

        // Account tab: totalized consumption in I, balance in P.
        assert_eq!(
            wb.cell_value("UC GERADORA", column_index("I"), 7),
            CellValue::Number(4750.0)
        );
        assert_eq!(
            wb.cell_value("UC GERADORA", column_index("P"), 7),
            CellValue::Number(120.0)
        );
    }

    #[test]
    fn test_group_a_history_backfills_technical_tab_guarded() {
        let mut wb = MemoryWorkbook::new();
        add_month_rows(&mut wb, "UC GERADORA");
        add_date_rows(&mut wb, "GRUPO A");
        let b = column_index("B");
        // February consumption-peak already recorded.
        wb.set_cell("GRUPO A", b, 6, CellValue::Number(777.0));

        let mut rec = record("MAR");
        rec.history = vec![
            HistoryEntry {
                month: "FEV".to_string(),
                year: 25,
                consumption_peak: 100.0,
                demand_peak: 10.0,
                ..Default::default()
            },
            HistoryEntry {
                month: "JAN".to_string(),
                year: 25,
                consumption_peak: 200.0,
                ..Default::default()
            },
        ];
        let batches = vec![AccountBatch::new(AccountRole::Generator, 1, vec![rec])];
        populate(&mut wb, &batches, TariffGroup::A);

        assert_eq!(wb.cell_value("GRUPO A", b, 6), CellValue::Number(777.0));
        // Demand column of the same row was empty, so it is backfilled.
        assert_eq!(wb.cell_value("GRUPO A", column_index("L"), 6), CellValue::Number(10.0));
        assert_eq!(wb.cell_value("GRUPO A", b, 5), CellValue::Number(200.0));
    }

    #[test]
    fn test_summary_rows_ordered_by_role_and_index() {
        let mut wb = MemoryWorkbook::new();
        add_month_rows(&mut wb, "UC GERADORA");
        wb.add_tab("RESUMO GERAL");

        let mut benef = record("JAN");
        benef.account_id = "222".to_string();
        let mut gen2 = record("JAN");
        gen2.account_id = "111".to_string();
        let mut gen1 = record("JAN");
        gen1.account_id = "100".to_string();

        // Batches deliberately out of order.
        let batches = vec![
            AccountBatch::new(AccountRole::Beneficiary, 1, vec![benef]),
            AccountBatch::new(AccountRole::Generator, 2, vec![gen2]),
            AccountBatch::new(AccountRole::Generator, 1, vec![gen1]),
        ];
        populate(&mut wb, &batches, TariffGroup::B);

        let f = column_index("F");
        assert_eq!(wb.cell_value("RESUMO GERAL", f, 7), CellValue::Text("100".to_string()));
        assert_eq!(wb.cell_value("RESUMO GERAL", f, 8), CellValue::Text("111".to_string()));
        assert_eq!(wb.cell_value("RESUMO GERAL", f, 9), CellValue::Text("222".to_string()));
    }

    #[test]
    fn test_missing_summary_tab_degrades() {
        let mut wb = MemoryWorkbook::new();
        add_month_rows(&mut wb, "UC GERADORA");

        let batches = vec![AccountBatch::new(AccountRole::Generator, 1, vec![record("JAN")])];
        populate(&mut wb, &batches, TariffGroup::B);

        // Account fields still written even though no summary tab exists.
        assert_eq!(
            wb.cell_value("UC GERADORA", column_index("K"), 5),
            CellValue::Number(536.0)
        );
    }
}

//! Xlsx-backed workbook using `umya-spreadsheet`.
//!
//! The adapter keeps the template's styling and formulas intact: cells are
//! touched individually and tab duplication clones the whole worksheet.

use std::path::Path;

use chrono::{Duration, NaiveDate};
use umya_spreadsheet::Spreadsheet;

use crate::error::{Result, WorkbookError};

use super::{CellRange, CellValue, Workbook};

/// Serial date epoch used by xlsx files (the 1900 date system).
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// A workbook loaded from (and saved to) an xlsx byte stream.
pub struct XlsxWorkbook {
    book: Spreadsheet,
}

impl XlsxWorkbook {
    /// Fresh single-sheet workbook; mainly useful in tests.
    pub fn new() -> Self {
        Self {
            book: umya_spreadsheet::new_file(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| WorkbookError::Read(format!("{e:?}")))?;
        Ok(Self { book })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        umya_spreadsheet::writer::xlsx::write(&self.book, path)
            .map_err(|e| WorkbookError::Write(format!("{e:?}")))?;
        Ok(())
    }
}

impl Default for XlsxWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbook for XlsxWorkbook {
    fn tab_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|ws| ws.get_name().to_string())
            .collect()
    }

    fn rename_tab(&mut self, old: &str, new: &str) -> bool {
        match self.book.get_sheet_by_name_mut(old) {
            Some(ws) => {
                ws.set_name(new);
                true
            }
            None => false,
        }
    }

    fn duplicate_tab(&mut self, source: &str, new_name: &str) -> bool {
        match self.book.get_sheet_by_name(source) {
            Some(ws) => {
                let mut copy = ws.clone();
                copy.set_name(new_name);
                self.book.add_sheet(copy).is_ok()
            }
            None => false,
        }
    }

    fn cell_value(&self, tab: &str, col: u32, row: u32) -> CellValue {
        let Some(ws) = self.book.get_sheet_by_name(tab) else {
            return CellValue::Empty;
        };
        let Some(cell) = ws.get_cell((col, row)) else {
            return CellValue::Empty;
        };

        let raw = cell.get_value().to_string();
        if raw.trim().is_empty() {
            return CellValue::Empty;
        }

        if let Ok(number) = raw.parse::<f64>() {
            let is_date = if let Some(nf) = cell.get_style().get_number_format() {
                is_date_format(nf.get_format_code())
            } else {
                false
            };
            if is_date {
                if let Some(date) = excel_serial_to_date(number) {
                    return CellValue::Date(date);
                }
            }
            return CellValue::Number(number);
        }

        CellValue::Text(raw)
    }

    fn set_cell(&mut self, tab: &str, col: u32, row: u32, value: CellValue) {
        let Some(ws) = self.book.get_sheet_by_name_mut(tab) else {
            return;
        };
        let cell = ws.get_cell_mut((col, row));
        match value {
            CellValue::Empty => {
                cell.set_value_string(String::new());
            }
            CellValue::Text(s) => {
                cell.set_value_string(s);
            }
            CellValue::Number(n) => {
                cell.set_value_number(n);
            }
            CellValue::Date(d) => {
                cell.set_value_string(d.format("%d/%m/%Y").to_string());
            }
        }
    }

    fn merged_ranges(&self, tab: &str) -> Vec<CellRange> {
        self.book
            .get_sheet_by_name(tab)
            .map(|ws| {
                ws.get_merge_cells()
                    .iter()
                    .filter_map(|range| CellRange::parse(&range.get_range()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Number format codes that render a serial number as a calendar date.
fn is_date_format(code: &str) -> bool {
    let code = code.to_lowercase();
    code.contains("yy") || code.contains("dd") || code.contains("mmm")
}

fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if serial < 1.0 {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_signed(Duration::days(serial as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_format_detection() {
        assert!(is_date_format("dd/mm/yyyy"));
        assert!(is_date_format("MMM-YY"));
        assert!(!is_date_format("#,##0.00"));
        assert!(!is_date_format("General"));
    }

    #[test]
    fn test_excel_serial_to_date() {
        // 2025-01-01 is serial 45658 in the 1900 date system.
        assert_eq!(
            excel_serial_to_date(45658.0),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(excel_serial_to_date(0.0), None);
    }

    #[test]
    fn test_cells_and_duplication() {
        let mut wb = XlsxWorkbook::new();
        assert!(wb.rename_tab("Sheet1", "UC GERADORA"));

        wb.set_cell("UC GERADORA", 1, 5, CellValue::Text("JAN".to_string()));
        wb.set_cell("UC GERADORA", 11, 5, CellValue::Number(536.0));

        assert_eq!(
            wb.cell_value("UC GERADORA", 1, 5),
            CellValue::Text("JAN".to_string())
        );
        assert_eq!(wb.cell_value("UC GERADORA", 11, 5), CellValue::Number(536.0));
        assert_eq!(wb.cell_value("UC GERADORA", 2, 2), CellValue::Empty);
        assert_eq!(wb.cell_value("MISSING", 1, 1), CellValue::Empty);

        assert!(wb.duplicate_tab("UC GERADORA", "UC GERADORA 2"));
        assert_eq!(
            wb.cell_value("UC GERADORA 2", 1, 5),
            CellValue::Text("JAN".to_string())
        );
        assert!(!wb.duplicate_tab("NOPE", "X"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("balanco.xlsx");

        let mut wb = XlsxWorkbook::new();
        wb.rename_tab("Sheet1", "UC GERADORA");
        wb.set_cell("UC GERADORA", 1, 5, CellValue::Text("JAN".to_string()));
        wb.set_cell("UC GERADORA", 16, 5, CellValue::Number(120.0));
        wb.save(&path).unwrap();

        let reloaded = XlsxWorkbook::load(&path).unwrap();
        assert_eq!(reloaded.tab_names(), vec!["UC GERADORA".to_string()]);
        assert_eq!(
            reloaded.cell_value("UC GERADORA", 1, 5),
            CellValue::Text("JAN".to_string())
        );
        assert_eq!(
            reloaded.cell_value("UC GERADORA", 16, 5),
            CellValue::Number(120.0)
        );
    }
}

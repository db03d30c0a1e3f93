//! In-memory workbook implementation.
//!
//! Reference semantics for the [`Workbook`] boundary; used directly by the
//! test suite and for callers that assemble a model without touching xlsx.

use std::collections::BTreeMap;

use super::{CellRange, CellValue, Workbook};

#[derive(Debug, Clone, Default)]
struct Tab {
    cells: BTreeMap<(u32, u32), CellValue>,
    merged: Vec<CellRange>,
}

/// A plain in-memory workbook: ordered named tabs of sparse cell grids.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    tabs: Vec<(String, Tab)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty tab. Existing names are left untouched.
    pub fn add_tab(&mut self, name: &str) {
        if !self.has_tab(name) {
            self.tabs.push((name.to_string(), Tab::default()));
        }
    }

    /// Declare a merged range on a tab.
    pub fn add_merged_range(&mut self, tab: &str, reference: &str) {
        if let (Some(range), Some(t)) = (CellRange::parse(reference), self.tab_mut(tab)) {
            t.merged.push(range);
        }
    }

    fn tab(&self, name: &str) -> Option<&Tab> {
        self.tabs.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    fn tab_mut(&mut self, name: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}

impl Workbook for MemoryWorkbook {
    fn tab_names(&self) -> Vec<String> {
        self.tabs.iter().map(|(n, _)| n.clone()).collect()
    }

    fn rename_tab(&mut self, old: &str, new: &str) -> bool {
        match self.tabs.iter_mut().find(|(n, _)| n == old) {
            Some((n, _)) => {
                *n = new.to_string();
                true
            }
            None => false,
        }
    }

    fn duplicate_tab(&mut self, source: &str, new_name: &str) -> bool {
        match self.tab(source) {
            Some(tab) => {
                let copy = tab.clone();
                self.tabs.push((new_name.to_string(), copy));
                true
            }
            None => false,
        }
    }

    fn cell_value(&self, tab: &str, col: u32, row: u32) -> CellValue {
        self.tab(tab)
            .and_then(|t| t.cells.get(&(col, row)).cloned())
            .unwrap_or(CellValue::Empty)
    }

    fn set_cell(&mut self, tab: &str, col: u32, row: u32, value: CellValue) {
        if let Some(t) = self.tab_mut(tab) {
            t.cells.insert((col, row), value);
        }
    }

    fn merged_ranges(&self, tab: &str) -> Vec<CellRange> {
        self.tab(tab).map(|t| t.merged.clone()).unwrap_or_default()
    }
}

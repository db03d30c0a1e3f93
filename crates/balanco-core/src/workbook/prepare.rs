//! Workbook template preparation: per-account tab duplication.

use tracing::{debug, warn};

use super::Workbook;

const GENERATOR_MODEL_TAB: &str = "UC GERADORA";
const BENEFICIARY_MODEL_FRAGMENT: &str = "UC BENEF";

/// Duplicate the template's model tabs into per-account tabs.
///
/// The first generator reuses the "UC GERADORA" model tab unchanged;
/// generators 2..N become "UC GERADORA {i}". The beneficiary model tab
/// (any tab whose name contains "UC BENEF") is renamed to "UC BENEF. 1" and
/// duplicated for the rest; the numeric suffix is always present.
///
/// A missing model tab or a zero count leaves the workbook untouched; tab
/// creation is best-effort and never fails.
pub fn prepare_tabs(workbook: &mut impl Workbook, generator_count: u32, beneficiary_count: u32) {
    if generator_count > 0 && workbook.has_tab(GENERATOR_MODEL_TAB) {
        for i in 2..=generator_count {
            let name = format!("{GENERATOR_MODEL_TAB} {i}");
            workbook.duplicate_tab(GENERATOR_MODEL_TAB, &name);
            debug!("Created generator tab {name}");
        }
    } else if generator_count > 0 {
        warn!("Generator model tab not found; no generator tabs prepared");
    }

    if beneficiary_count > 0 {
        match workbook.find_tab_containing(BENEFICIARY_MODEL_FRAGMENT) {
            Some(model) => {
                workbook.rename_tab(&model, "UC BENEF. 1");
                for i in 2..=beneficiary_count {
                    let name = format!("UC BENEF. {i}");
                    workbook.duplicate_tab("UC BENEF. 1", &name);
                    debug!("Created beneficiary tab {name}");
                }
            }
            None => warn!("Beneficiary model tab not found; no beneficiary tabs prepared"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::MemoryWorkbook;

    fn template() -> MemoryWorkbook {
        let mut wb = MemoryWorkbook::new();
        wb.add_tab("RESUMO");
        wb.add_tab("UC GERADORA");
        wb.add_tab("UC BENEF");
        wb
    }

    #[test]
    fn test_two_generators_no_beneficiaries() {
        let mut wb = template();
        prepare_tabs(&mut wb, 2, 0);

        assert!(wb.has_tab("UC GERADORA"));
        assert!(wb.has_tab("UC GERADORA 2"));
        // The beneficiary model tab stays as-is when none are requested.
        assert!(wb.has_tab("UC BENEF"));
        assert!(!wb.has_tab("UC BENEF. 1"));
    }

    #[test]
    fn test_beneficiary_tabs_always_suffixed() {
        let mut wb = template();
        prepare_tabs(&mut wb, 1, 3);

        assert!(wb.has_tab("UC GERADORA"));
        assert!(!wb.has_tab("UC GERADORA 1"));
        assert!(wb.has_tab("UC BENEF. 1"));
        assert!(wb.has_tab("UC BENEF. 2"));
        assert!(wb.has_tab("UC BENEF. 3"));
        assert!(!wb.has_tab("UC BENEF"));
    }

    #[test]
    fn test_missing_model_tab_is_noop() {
        let mut wb = MemoryWorkbook::new();
        wb.add_tab("RESUMO");
        prepare_tabs(&mut wb, 2, 2);
        assert_eq!(wb.tab_names(), vec!["RESUMO".to_string()]);
    }

    #[test]
    fn test_zero_counts_are_noop() {
        let mut wb = template();
        prepare_tabs(&mut wb, 0, 0);
        assert_eq!(wb.tab_names().len(), 3);
    }
}

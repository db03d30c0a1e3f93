//! Invoice extraction pipeline.

use regex::Regex;
use tracing::{debug, info};

use crate::models::{InvoiceRecord, TariffGroup};

use super::history::extract_history;
use super::number::{normalize_text, parse_br_number};
use super::patterns::*;

/// Result of invoice extraction.
///
/// `warnings` lists every field that fell back to its zero/empty default
/// because the source pattern did not match. Defaulted fields are not
/// errors; the list exists for observability only.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted invoice record.
    pub record: InvoiceRecord,
    /// Names of fields that took their default value.
    pub warnings: Vec<String>,
}

/// Field extractor for one tariff group.
///
/// Extraction is a pure function of the input text: each call produces a
/// fresh record, and missing patterns yield defaults rather than errors.
pub struct InvoiceExtractor {
    group: TariffGroup,
}

impl InvoiceExtractor {
    pub fn new(group: TariffGroup) -> Self {
        Self { group }
    }

    pub fn group(&self) -> TariffGroup {
        self.group
    }

    /// Extract a record from raw page text (pages concatenated without
    /// separators). Never fails; see [`ExtractionResult::warnings`].
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let text = normalize_text(text);
        let mut record = InvoiceRecord::default();
        let mut warnings = Vec::new();

        info!(
            "Extracting {:?} invoice from {} characters of text",
            self.group,
            text.len()
        );

        // Identity anchor; all other fields are extracted independently and
        // are not cross-validated against this period.
        if let Some(caps) = IDENTITY.captures(&text) {
            record.account_id = caps[1].to_string();
            record.month = caps[2].to_string();
            record.year = caps[3].parse().unwrap_or(0);
        } else {
            warnings.push("account/period anchor not found; record is unplaceable".to_string());
        }

        if let Some(caps) = READING_DATES.captures(&text) {
            record.prior_reading_date = caps[1].to_string();
            record.current_reading_date = caps[2].to_string();
        } else {
            warnings.push("reading dates defaulted".to_string());
        }

        match self.group {
            TariffGroup::B => self.extract_group_b(&text, &mut record, &mut warnings),
            TariffGroup::A => self.extract_group_a(&text, &mut record, &mut warnings),
        }

        self.extract_compensation(&text, &mut record, &mut warnings);

        if let Some(caps) = INVOICE_TOTAL.captures(&text) {
            record.invoice_total = parse_br_number(&caps[1]);
        } else {
            warnings.push("invoice total defaulted".to_string());
        }

        record.history = extract_history(&text, self.group)
            .into_iter()
            .filter(|h| {
                // The record's own period belongs to the current-month
                // columns, not the backfill.
                !(h.month == record.month && h.year as i32 == record.year % 100)
            })
            .collect();

        debug!(
            "Extracted account {} period {}/{} with {} history entries",
            record.account_id,
            record.month,
            record.year,
            record.history.len()
        );

        ExtractionResult { record, warnings }
    }

    /// Convenience wrapper discarding the defaulted-field diagnostics.
    pub fn extract_record(&self, text: &str) -> InvoiceRecord {
        self.extract(text).record
    }

    /// Low-voltage fields: delivery address, meter block, single-register
    /// consumption.
    fn extract_group_b(&self, text: &str, record: &mut InvoiceRecord, warnings: &mut Vec<String>) {
        if let Some(idx) = text.find(ADDRESS_MARKER) {
            let rest = &text[idx + ADDRESS_MARKER.len()..];
            let end = rest.find(ADDRESS_END_MARKER).unwrap_or(rest.len());
            record.address = rest[..end].trim().to_string();
        } else {
            warnings.push("delivery address defaulted".to_string());
        }

        if let Some(caps) = METER_BLOCK.captures(text) {
            record.meter_id = caps[1].to_string();
            record.prior_meter_reading = caps[2].parse().unwrap_or(0);
            record.current_meter_reading = caps[3].parse().unwrap_or(0);
        } else {
            warnings.push("meter block defaulted".to_string());
        }

        if let Some(caps) = ACTIVE_ENERGY.captures(text) {
            record.active_energy_kwh = parse_br_number(&caps[1]);
        } else {
            warnings.push("active energy defaulted".to_string());
        }
    }

    /// High-voltage fields: six independent time-of-use segment lines.
    fn extract_group_a(&self, text: &str, record: &mut InvoiceRecord, warnings: &mut Vec<String>) {
        let segments: [(&Regex, &mut f64, &str); 6] = [
            (&CONSUMPTION_PEAK, &mut record.consumption_peak, "consumption peak"),
            (&CONSUMPTION_OFFPEAK, &mut record.consumption_offpeak, "consumption off-peak"),
            (&CONSUMPTION_RESERVED, &mut record.consumption_reserved, "consumption reserved"),
            (&DEMAND_PEAK, &mut record.demand_peak, "demand peak"),
            (&DEMAND_OFFPEAK, &mut record.demand_offpeak, "demand off-peak"),
            (&DEMAND_RESERVED, &mut record.demand_reserved, "demand reserved"),
        ];

        for (pattern, field, name) in segments {
            match pattern.captures(text) {
                Some(caps) => *field = parse_br_number(&caps[1]),
                None => warnings.push(format!("{name} defaulted")),
            }
        }
    }

    /// Generation, credit and balance from the SCEE compensation section.
    ///
    /// Generation tries the per-line pattern first and falls back to a
    /// search scoped to the SCEE block. Group B reads a single balance
    /// figure; Group A sums every currency value on the balance sub-line
    /// because high-voltage bills report one balance per tariff segment.
    fn extract_compensation(
        &self,
        text: &str,
        record: &mut InvoiceRecord,
        warnings: &mut Vec<String>,
    ) {
        if let Some(caps) = GENERATION_LINE.captures(text) {
            record.generated_energy_kwh = parse_br_number(&caps[1]);
        }

        let window = match self.group {
            TariffGroup::B => 1000,
            TariffGroup::A => 800,
        };

        if let Some(block) = scee_block(text, window) {
            if record.generated_energy_kwh == 0.0 {
                if let Some(caps) = SCEE_GENERATION.captures(block) {
                    record.generated_energy_kwh = parse_br_number(&caps[1]);
                }
            }

            if let Some(caps) = CREDIT_RECEIVED.captures(block) {
                record.credit_received_kwh = parse_br_number(&caps[1]);
            }

            match self.group {
                TariffGroup::B => {
                    if let Some(caps) = BALANCE_KWH.captures(block) {
                        record.balance_kwh = parse_br_number(&caps[1]);
                    }
                }
                TariffGroup::A => {
                    if let Some(caps) = BALANCE_LINE.captures(block) {
                        record.balance_kwh = CURRENCY_TOKEN
                            .find_iter(&caps[1])
                            .map(|m| parse_br_number(m.as_str()))
                            .sum();
                    }
                }
            }
        }

        if record.generated_energy_kwh == 0.0 {
            warnings.push("generated energy defaulted".to_string());
        }
        if record.credit_received_kwh == 0.0 {
            warnings.push("credit received defaulted".to_string());
        }
        if record.balance_kwh == 0.0 {
            warnings.push("balance defaulted".to_string());
        }
    }
}

/// Slice of `text` starting at the SCEE marker, at most `window` bytes long,
/// clamped forward to a character boundary so accented labels never split.
fn scee_block(text: &str, window: usize) -> Option<&str> {
    let start = text.find(SCEE_MARKER)?;
    let mut end = (start + window).min(text.len());
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    Some(&text[start..end])
}

//! Common regex patterns for Brazilian utility invoice extraction.
//!
//! All patterns run against whitespace-collapsed, upper-cased text (see
//! [`super::number::normalize_text`]), so token gaps use `\s+` instead of
//! anchoring on line boundaries.

use lazy_static::lazy_static;
use regex::Regex;

/// Month alternation used by every period-bearing pattern.
const MONTHS: &str = "JAN|FEV|MAR|ABR|MAI|JUN|JUL|AGO|SET|OUT|NOV|DEZ";

lazy_static! {
    // Identity anchor: "<account-id> <MES>/<yyyy>", the canonical period of
    // the whole record.
    pub static ref IDENTITY: Regex = Regex::new(
        &format!(r"(\d{{7,}})\s+({MONTHS})/(\d{{4}})")
    ).unwrap();

    // Reading-date quadruple; only the first two dates are of interest, the
    // third date is the next scheduled reading.
    pub static ref READING_DATES: Regex = Regex::new(
        r"(\d{2}/\d{2}/\d{4})\s+(\d{2}/\d{2}/\d{4})\s+\d+\s+\d{2}/\d{2}/\d{4}"
    ).unwrap();

    // Group B meter block: meter id plus the two register readings.
    pub static ref METER_BLOCK: Regex = Regex::new(
        r"(\d{7,}-\d)\s+ENERGIA ATIVA - KWH ÚNICO\s+(\d+)\s+(\d+)"
    ).unwrap();

    // Consumption / generation lines. The decimal before the capture is a
    // tariff multiplier that must be skipped; the last decimal is the value.
    pub static ref ACTIVE_ENERGY: Regex = Regex::new(
        r"ENERGIA ATIVA - KWH ÚNICO\s+\d+\s+\d+\s+[\d,]+\s+([\d,]+)"
    ).unwrap();

    pub static ref GENERATION_LINE: Regex = Regex::new(
        r"ENERGIA GERAÇÃO - KWH ÚNICO\s+\d+\s+\d+\s+[\d,]+\s+([\d,]+)"
    ).unwrap();

    // Group A time-of-use segment lines, same shape as the single-register
    // consumption line.
    pub static ref CONSUMPTION_PEAK: Regex = Regex::new(
        r"ENERGIA ATIVA - KWH PONTA\s+\d+\s+\d+\s+[\d,]+\s+([\d,]+)"
    ).unwrap();

    pub static ref CONSUMPTION_OFFPEAK: Regex = Regex::new(
        r"ENERGIA ATIVA - KWH FORA PONTA\s+\d+\s+\d+\s+[\d,]+\s+([\d,]+)"
    ).unwrap();

    pub static ref CONSUMPTION_RESERVED: Regex = Regex::new(
        r"ENERGIA ATIVA - KWH RESERVADO\s+\d+\s+\d+\s+[\d,]+\s+([\d,]+)"
    ).unwrap();

    pub static ref DEMAND_PEAK: Regex = Regex::new(
        r"DEMANDA - KW PONTA\s+\d+\s+\d+\s+[\d,]+\s+([\d,]+)"
    ).unwrap();

    pub static ref DEMAND_OFFPEAK: Regex = Regex::new(
        r"DEMANDA - KW FORA PONTA\s+\d+\s+\d+\s+[\d,]+\s+([\d,]+)"
    ).unwrap();

    pub static ref DEMAND_RESERVED: Regex = Regex::new(
        r"DEMANDA - KW RESERVADO\s+\d+\s+\d+\s+[\d,]+\s+([\d,]+)"
    ).unwrap();

    // SCEE compensation block fields.
    pub static ref SCEE_GENERATION: Regex = Regex::new(
        r"GERAÇÃO CICLO.*?UC\s+\d+\s*:\s*([\d,]+)"
    ).unwrap();

    pub static ref CREDIT_RECEIVED: Regex = Regex::new(
        r"CRÉDITO RECEBIDO.*?([\d\.]+,\d{2})"
    ).unwrap();

    pub static ref BALANCE_KWH: Regex = Regex::new(
        r"SALDO KWH\s*[:=]?\s*([\d\.]+,\d{2})"
    ).unwrap();

    // Group A balance sub-line: everything from SALDO KWH up to the next
    // section marker; the populator sums every currency value inside it.
    pub static ref BALANCE_LINE: Regex = Regex::new(
        r"SALDO KWH(.*?)(?:SALDO A EXPIRAR|TOTAL|$)"
    ).unwrap();

    // Currency-shaped token ("1.234,56" / ",50" never appears alone on the
    // invoices, but the integer part may be missing in per-segment rows).
    pub static ref CURRENCY_TOKEN: Regex = Regex::new(
        r"[\d\.]*,\d{2}"
    ).unwrap();

    pub static ref INVOICE_TOTAL: Regex = Regex::new(
        r"TOTAL\s+([\d\.]+,\d{2})"
    ).unwrap();

    // Trailing history tables.
    // Group B: "MES/AA <kwh>" rows.
    pub static ref HISTORY_B: Regex = Regex::new(
        &format!(r"({MONTHS})/(\d{{2}})\s+([\d\.]+)")
    ).unwrap();

    // Group A: "MES/AA" followed by 7-9 numeric columns
    // (demand P/FP/RE, consumption P/FP, gap, consumption RE).
    pub static ref HISTORY_A: Regex = Regex::new(
        &format!(r"({MONTHS})\s*[/\-]\s*(\d{{2}})((?:\s+[\d\.,]+){{7,9}})")
    ).unwrap();
}

/// Literal markers located by substring search rather than regex.
pub const SCEE_MARKER: &str = "INFORMAÇÕES DO SCEE";
pub const ADDRESS_MARKER: &str = "ENDEREÇO DE ENTREGA:";
pub const ADDRESS_END_MARKER: &str = "CEP:";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_anchor() {
        let caps = IDENTITY.captures("12345678 JAN/2025").unwrap();
        assert_eq!(&caps[1], "12345678");
        assert_eq!(&caps[2], "JAN");
        assert_eq!(&caps[3], "2025");
    }

    #[test]
    fn test_peak_pattern_does_not_match_offpeak_line() {
        let line = "ENERGIA ATIVA - KWH FORA PONTA 100 200 1,00 350,00";
        assert!(CONSUMPTION_PEAK.captures(line).is_none());
        assert_eq!(&CONSUMPTION_OFFPEAK.captures(line).unwrap()[1], "350,00");
    }

    #[test]
    fn test_balance_line_stops_at_section_marker() {
        let text = "SALDO KWH P 120,50 FP 0,00 SALDO A EXPIRAR 999,99";
        let caps = BALANCE_LINE.captures(text).unwrap();
        assert!(caps[1].contains("120,50"));
        assert!(!caps[1].contains("999,99"));
    }

    #[test]
    fn test_balance_line_runs_to_end_of_text() {
        let text = "SALDO KWH P 120,50 FP 30,00";
        let caps = BALANCE_LINE.captures(text).unwrap();
        assert!(caps[1].contains("30,00"));
    }
}

//! Locale normalization for invoice text and numbers.

/// Parse a Brazilian-formatted number ("1.234,56") into a float.
///
/// Strips thousands separators and converts the decimal comma. Returns
/// `0.0` on empty input or any parse failure; at this layer a malformed
/// number is indistinguishable from an absent one.
pub fn parse_br_number(value: &str) -> f64 {
    if value.is_empty() {
        return 0.0;
    }
    let normalized = value.trim().replace('.', "").replace(',', ".");
    normalized.parse().unwrap_or(0.0)
}

/// Upper-case and collapse all whitespace runs (including newlines) to
/// single spaces.
///
/// Invoice layouts vary in line wrapping; collapsing to one line makes every
/// downstream pattern tolerant of the PDF's physical line breaks.
pub fn normalize_text(text: &str) -> String {
    text.to_uppercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

//! Column type inference from a single sample value
//!
//! Candidates are tried in a fixed priority order: INTEGER, then REAL,
//! and TEXT when neither parses. Numbers must be written plainly: no
//! surrounding whitespace, no leading `+` and no redundant leading zeros, so
//! `"007"`, `"+5"` and `" 3"` are TEXT. Trailing zeros, exponents and a bare
//! decimal point (`"1.50"`, `"1e05"`, `".5"`, `"1."`) still read as REAL.

use super::ColumnType;

/// Ordered (predicate, type) pairs; the first matching predicate wins.
const CANDIDATES: &[(fn(&str) -> bool, ColumnType)] = &[
    (is_integer, ColumnType::Integer),
    (is_real, ColumnType::Real),
];

/// Infer the storage type of a column from one sample value
pub fn infer(sample: &str) -> ColumnType {
    CANDIDATES
        .iter()
        .find(|(matches, _)| matches(sample))
        .map(|(_, column_type)| *column_type)
        .unwrap_or(ColumnType::Text)
}

fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return false;
    }
    value.parse::<i64>().is_ok()
}

fn is_real(value: &str) -> bool {
    if !value
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'-' | b'+'))
    {
        return false;
    }
    if value.starts_with('+') || !value.bytes().any(|b| b.is_ascii_digit()) {
        return false;
    }

    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let mantissa = unsigned.split(['e', 'E']).next().unwrap_or_default();
    let whole = mantissa.split('.').next().unwrap_or_default();
    if whole.len() > 1 && whole.starts_with('0') {
        return false;
    }

    value.parse::<f64>().is_ok_and(f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_before_real() {
        assert_eq!(infer("42"), ColumnType::Integer);
        assert_eq!(infer("3"), ColumnType::Integer);
        assert_eq!(infer("-17"), ColumnType::Integer);
        assert_eq!(infer("0"), ColumnType::Integer);
    }

    #[test]
    fn test_real() {
        assert_eq!(infer("3.14"), ColumnType::Real);
        assert_eq!(infer("-0.5"), ColumnType::Real);
        assert_eq!(infer("0.0"), ColumnType::Real);
        assert_eq!(infer("1e5"), ColumnType::Real);
        assert_eq!(infer(".5"), ColumnType::Real);
        // Too large for i64 but still a number
        assert_eq!(infer("99999999999999999999"), ColumnType::Real);
    }

    #[test]
    fn test_text() {
        assert_eq!(infer("abc"), ColumnType::Text);
        assert_eq!(infer(""), ColumnType::Text);
        assert_eq!(infer("1,000"), ColumnType::Text);
        assert_eq!(infer("12abc"), ColumnType::Text);
        assert_eq!(infer("NaN"), ColumnType::Text);
        assert_eq!(infer("inf"), ColumnType::Text);
        assert_eq!(infer("-"), ColumnType::Text);
        assert_eq!(infer("."), ColumnType::Text);
    }

    #[test]
    fn test_lossy_numbers_are_text() {
        assert_eq!(infer("007"), ColumnType::Text);
        assert_eq!(infer("00.5"), ColumnType::Text);
        assert_eq!(infer("+5"), ColumnType::Text);
        assert_eq!(infer("+1.5"), ColumnType::Text);
        assert_eq!(infer(" 42"), ColumnType::Text);
        assert_eq!(infer("42 "), ColumnType::Text);
    }

    #[test]
    fn test_plain_number_forms() {
        assert_eq!(infer("-0"), ColumnType::Integer);
        assert_eq!(infer("1.50"), ColumnType::Real);
        assert_eq!(infer("1e05"), ColumnType::Real);
        assert_eq!(infer("1."), ColumnType::Real);
    }
}

use std::{collections::BTreeSet, fmt};

use serde::Serialize;
use thiserror::Error;

/// The portal's ROC calendar starts accepting queries at year 100.
pub const MIN_FISCAL_YEAR: u32 = 100;

const FULL_WIDTH_SEPARATORS: [char; 2] = ['、', '，'];
const RANGE_MARKER: char = '~';

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FiscalYear(u32);

impl FiscalYear {
    pub fn new(value: u32) -> Option<Self> {
        match value >= MIN_FISCAL_YEAR {
            true => Some(FiscalYear(value)),
            false => None,
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum YearSpecError {
    #[error("'{0}' is not a valid year or year range")]
    Format(String),
    #[error("range {start}~{end} ends before it starts")]
    ReversedRange { start: u32, end: u32 },
}

/// Turns a year specification such as `109、111,113~115` into an ascending,
/// duplicate-free list of fiscal years.
///
/// Tokens that are neither a number nor a range are skipped. Years below
/// [`MIN_FISCAL_YEAR`] are dropped, so an `Ok` result may be empty.
pub fn parse_years(text: &str) -> Result<Vec<FiscalYear>, YearSpecError> {
    let normalized = to_half_width(text).replace(&FULL_WIDTH_SEPARATORS[..], ",");
    let mut years = BTreeSet::new();

    for token in normalized.split(',').map(str::trim) {
        if let Some((start, end)) = token.split_once(RANGE_MARKER) {
            let start = parse_bound(start, token)?;
            let end = parse_bound(end, token)?;
            if start > end {
                return Err(YearSpecError::ReversedRange { start, end });
            }
            years.extend(start..=end);
        } else if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
            years.insert(parse_bound(token, token)?);
        }
    }

    Ok(years.into_iter().filter_map(FiscalYear::new).collect())
}

/// Maps full-width digits and the full-width tilde to their ASCII forms.
fn to_half_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            '～' => RANGE_MARKER,
            other => other,
        })
        .collect()
}

fn parse_bound(bound: &str, token: &str) -> Result<u32, YearSpecError> {
    bound
        .trim()
        .parse()
        .map_err(|_| YearSpecError::Format(token.to_string()))
}

/// Rewrites a year specification so it can be embedded in a file name.
pub fn sanitize_year_spec(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            ',' | '、' | '，' => '_',
            RANGE_MARKER | '～' => '至',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{parse_years, sanitize_year_spec, FiscalYear, YearSpecError};

    fn values(text: &str) -> Vec<u32> {
        parse_years(text)
            .unwrap()
            .into_iter()
            .map(|y| y.value())
            .collect()
    }

    #[test]
    fn parse_single_year() {
        assert_eq!(values("110"), vec![110]);
    }

    #[test]
    fn parse_full_width_list() {
        assert_eq!(values("109、111、113"), vec![109, 111, 113]);
        assert_eq!(values("113，109"), vec![109, 113]);
    }

    #[test]
    fn parse_inclusive_range() {
        assert_eq!(values("109~111"), vec![109, 110, 111]);
        assert_eq!(values(" 109 ~ 111 "), vec![109, 110, 111]);
    }

    #[test]
    fn parse_full_width_digits() {
        assert_eq!(values("１１０"), vec![110]);
        assert_eq!(values("１０９~１１１"), vec![109, 110, 111]);
        assert_eq!(values("１０９～１１０，１１３"), vec![109, 110, 113]);
    }

    #[test]
    fn parse_mixed_forms() {
        assert_eq!(values("109~111,113"), vec![109, 110, 111, 113]);
    }

    #[test]
    fn years_below_minimum_are_dropped() {
        assert!(values("50~60").is_empty());
        assert_eq!(values("99,100"), vec![100]);
    }

    #[test]
    fn output_is_sorted_and_deduplicated() {
        assert_eq!(values("112,110~112、110,111"), vec![110, 111, 112]);
    }

    #[test]
    fn unrecognised_tokens_are_ignored() {
        assert_eq!(values("abc, 110, ,11a"), vec![110]);
        assert!(values("").is_empty());
    }

    #[test]
    fn malformed_range_is_a_format_error() {
        assert_eq!(
            parse_years("109~abc"),
            Err(YearSpecError::Format("109~abc".to_string()))
        );
        assert!(matches!(
            parse_years("109~110~111"),
            Err(YearSpecError::Format(_))
        ));
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert_eq!(
            parse_years("111~109"),
            Err(YearSpecError::ReversedRange {
                start: 111,
                end: 109
            })
        );
    }

    #[test]
    fn fiscal_year_enforces_minimum() {
        assert_eq!(FiscalYear::new(99), None);
        assert_eq!(FiscalYear::new(100).map(|y| y.value()), Some(100));
    }

    #[test]
    fn sanitize_for_file_names() {
        assert_eq!(sanitize_year_spec("109~111,113"), "109至111_113");
        assert_eq!(sanitize_year_spec(" 109、111 "), "109_111");
        assert_eq!(sanitize_year_spec("109～111"), "109至111");
    }
}

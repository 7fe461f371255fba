//! Value-level rewrites of string columns.

use crate::error::Result;
use crate::utils::normalize_label;
use polars::prelude::*;
use std::collections::HashSet;

/// True for nulls and whitespace-only strings.
#[inline]
pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Replace blank values with `fill_value`. Returns the new series and the
/// number of values filled.
pub(crate) fn fill_blank(series: &Series, fill_value: &str) -> Result<(Series, usize)> {
    let str_series = series.str()?;
    let mut filled = 0;
    let values: Vec<Option<String>> = str_series
        .into_iter()
        .map(|opt_val| {
            if is_blank(opt_val) {
                filled += 1;
                Some(fill_value.to_string())
            } else {
                opt_val.map(str::to_string)
            }
        })
        .collect();

    Ok((Series::new(series.name().clone(), values), filled))
}

/// Trim and title-case every value.
pub(crate) fn normalize_labels(series: &Series) -> Result<Series> {
    let str_series = series.str()?;
    let values: Vec<Option<String>> = str_series
        .into_iter()
        .map(|opt_val| opt_val.map(normalize_label))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Replace values exactly equal to `sentinel`. Returns the new series and
/// the number of replacements.
pub(crate) fn replace_exact(
    series: &Series,
    sentinel: &str,
    replacement: &str,
) -> Result<(Series, usize)> {
    let str_series = series.str()?;
    let mut replaced = 0;
    let values: Vec<Option<&str>> = str_series
        .into_iter()
        .map(|opt_val| match opt_val {
            Some(val) if val == sentinel => {
                replaced += 1;
                Some(replacement)
            }
            other => other,
        })
        .collect();

    Ok((Series::new(series.name().clone(), values), replaced))
}

/// Distinct non-null values in order of first appearance.
pub(crate) fn distinct_values(series: &Series) -> Result<Vec<String>> {
    let str_series = series.str()?;
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();

    for val in str_series.into_iter().flatten() {
        if seen.insert(val) {
            distinct.push(val.to_string());
        }
    }

    Ok(distinct)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(series: &Series) -> Vec<Option<String>> {
        series
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some("   ")));
        assert!(!is_blank(Some("0.1")));
    }

    #[test]
    fn test_fill_blank() {
        let series = Series::new("Discount".into(), &[Some("0.1"), None, Some(" ")]);
        let (filled, count) = fill_blank(&series, "0").unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            strings(&filled),
            vec![Some("0.1".into()), Some("0".into()), Some("0".into())]
        );
    }

    #[test]
    fn test_normalize_labels() {
        let series = Series::new("Region".into(), &[Some("  north "), Some("SOUTH"), None]);
        let normalized = normalize_labels(&series).unwrap();

        assert_eq!(
            strings(&normalized),
            vec![Some("North".into()), Some("South".into()), None]
        );
    }

    #[test]
    fn test_replace_exact() {
        let series = Series::new(
            "Customer_Email".into(),
            &["a@email.com", "INVALID", "invalid", "INVALID"],
        );
        let (replaced, count) = replace_exact(&series, "INVALID", "unknown@email.com").unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            strings(&replaced),
            vec![
                Some("a@email.com".into()),
                Some("unknown@email.com".into()),
                Some("invalid".into()),
                Some("unknown@email.com".into()),
            ]
        );
    }

    #[test]
    fn test_distinct_values_keeps_first_appearance_order() {
        let series = Series::new("Region".into(), &["East", "North", "East", "west"]);
        assert_eq!(
            distinct_values(&series).unwrap(),
            vec!["East".to_string(), "North".to_string(), "west".to_string()]
        );
    }
}

use std::collections::{BTreeMap, BTreeSet};

use getset::Getters;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use super::columns::{self, CHART_CATEGORY_RULES};
use super::mapping::MappingDraft;
use super::table::{Table, Value};
use super::ConfigurationError;

/// Tried in this order; the first one present in a label splits it.
pub const SEPARATORS: [&str; 6] = [" - ", " – ", " — ", " | ", ": ", " :: "];

// 2.2.1 ÁGUA
static NUMERIC_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)*)\s+(.+)$").expect("numeric code pattern is valid"));
// A1 ÁGUA, B2.1 LUZ
static LETTER_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]\d+(?:\.\d+)*)\s+(.+)$").expect("letter code pattern is valid"));

/// Splits a compound label such as `"2.2.1 - ÁGUA"` into `("2.2.1", "ÁGUA")`.
/// Labels without a recognizable code come back as `("", label)`.
pub fn decompose(label: &str) -> (String, String) {
    let label = label.trim();

    for separator in SEPARATORS {
        if let Some((code, name)) = label.split_once(separator) {
            return (code.trim().to_string(), name.trim().to_string());
        }
    }

    for pattern in [&NUMERIC_CODE, &LETTER_CODE] {
        if let Some(captures) = pattern.captures(label) {
            return (captures[1].to_string(), captures[2].to_string());
        }
    }

    (String::new(), label.to_string())
}

pub fn decompose_value(value: &Value) -> (String, String) {
    decompose(&value.as_label().unwrap_or_default())
}

fn distinct_labels(table: &Table, column: &str, table_name: &'static str) -> Result<BTreeSet<String>, ConfigurationError> {
    let index = columns::require(table, column, table_name)?;

    Ok(table.rows().iter().filter_map(|row| row[index].as_label()).collect())
}

fn clean_names(chart: &Table, column: &str) -> Result<BTreeSet<String>, ConfigurationError> {
    let index = columns::require(chart, column, "chart")?;

    Ok(chart
        .rows()
        .iter()
        .map(|row| decompose_value(&row[index]).1)
        .collect())
}

/// Labels used by transactions that do not match any chart name exactly.
pub fn find_inconsistent(
    transactions: &Table,
    chart: &Table,
    transaction_column: &str,
    chart_column: &str,
) -> Result<BTreeSet<String>, ConfigurationError> {
    let used = distinct_labels(transactions, transaction_column, "transactions")?;
    let known = clean_names(chart, chart_column)?;

    Ok(used.difference(&known).cloned().collect())
}

/// Sorted, deduplicated chart names, without their codes.
pub fn valid_categories(chart: &Table, chart_column: &str) -> Result<Vec<String>, ConfigurationError> {
    Ok(clean_names(chart, chart_column)?
        .into_iter()
        .filter(|name| !name.trim().is_empty())
        .collect())
}

/// Proposes a replacement for `old_label`. Exact case-insensitive matches win;
/// otherwise the first candidate sharing a word (longer than 3 characters)
/// with the label, in either direction.
pub fn suggest(old_label: &str, valid_labels: &[String]) -> Option<String> {
    let old_lower = old_label.to_lowercase();

    if let Some(exact) = valid_labels.iter().find(|label| label.to_lowercase() == old_lower) {
        return Some(exact.clone());
    }

    let old_words: Vec<&str> = old_lower
        .split_whitespace()
        .filter(|word| word.chars().count() > 3)
        .collect();

    valid_labels
        .iter()
        .find(|label| {
            let lower = label.to_lowercase();
            lower.split_whitespace().any(|new_word| {
                old_words
                    .iter()
                    .any(|old_word| old_word.contains(new_word) || new_word.contains(old_word))
            })
        })
        .cloned()
}

/// The chart column holding category labels: the first header matching a
/// category keyword, else the first column whose first value is text.
pub fn locate_chart_category_column(chart: &Table) -> Result<String, ConfigurationError> {
    if let Some(column) = columns::locate(chart.columns(), CHART_CATEGORY_RULES) {
        return Ok(column.to_string());
    }

    chart
        .columns()
        .iter()
        .find(|column| {
            let first = chart
                .column(column)
                .and_then(|mut values| values.find(|value| !value.is_blank()));
            matches!(first, Some(Value::Text(text)) if text.trim().chars().count() > 2)
        })
        .cloned()
        .ok_or(ConfigurationError::CategoryColumnNotFound("chart"))
}

/// What the operator needs to build a mapping: the unmatched labels, the valid
/// targets and a suggestion per label.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct ReconciliationReport {
    chart_category_column: String,
    inconsistent: BTreeSet<String>,
    valid_categories: Vec<String>,
    suggestions: BTreeMap<String, Option<String>>,
}

impl ReconciliationReport {
    pub fn is_consistent(&self) -> bool {
        self.inconsistent.is_empty()
    }

    pub fn suggestion(&self, label: &str) -> Option<&str> {
        self.suggestions.get(label).and_then(|suggestion| suggestion.as_deref())
    }

    /// An empty draft keyed by the inconsistent labels. Suggestions are not
    /// pre-filled; the operator confirms each one.
    pub fn draft(&self) -> MappingDraft {
        MappingDraft::new(self.inconsistent.clone())
    }
}

pub fn reconcile(
    transactions: &Table,
    chart: &Table,
    transaction_column: &str,
    chart_column: Option<&str>,
) -> Result<ReconciliationReport, ConfigurationError> {
    let chart_category_column = match chart_column {
        Some(column) => column.to_string(),
        None => locate_chart_category_column(chart)?,
    };
    debug!("using chart category column, column={}", chart_category_column);

    let inconsistent = find_inconsistent(transactions, chart, transaction_column, &chart_category_column)?;
    let valid_categories = valid_categories(chart, &chart_category_column)?;
    let suggestions = inconsistent
        .iter()
        .map(|label| (label.clone(), suggest(label, &valid_categories)))
        .collect();

    info!(
        "reconciled categories, inconsistent={}, valid={}",
        inconsistent.len(),
        valid_categories.len()
    );

    Ok(ReconciliationReport {
        chart_category_column,
        inconsistent,
        valid_categories,
        suggestions,
    })
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;

//! Narrowing the dataset down to the rows matching the current filter
//! selection.

use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::types::{Dataset, InvoiceRow};

/// Inclusive amount window. A window with `min > max` is valid and
/// matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmountRange {
    pub min: f64,
    pub max: f64,
}

impl AmountRange {
    pub fn new(min: f64, max: f64) -> Self {
        AmountRange { min, max }
    }

    pub fn contains(&self, amount: f64) -> bool {
        self.min <= amount && amount <= self.max
    }

    pub fn is_empty(&self) -> bool {
        !(self.min <= self.max)
    }
}

/// The combination of controls currently chosen by the user. Empty
/// supplier or document type sets mean "no restriction".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSelection {
    pub year: i32,
    pub suppliers: BTreeSet<String>,
    pub doc_types: BTreeSet<String>,
    pub amount_range: AmountRange,
}

impl FilterSelection {
    pub fn matches(&self, row: &InvoiceRow) -> bool {
        row.invoice_date.year() == self.year
            && self.amount_range.contains(row.amount)
            && (self.suppliers.is_empty() || self.suppliers.contains(&row.supplier))
            && (self.doc_types.is_empty() || self.doc_types.contains(&row.doc_type))
    }
}

/// Rows of `dataset` matching `selection`, in dataset order.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> Vec<&'a InvoiceRow> {
    if selection.amount_range.is_empty() {
        return Vec::new();
    }
    dataset.rows.iter().filter(|row| selection.matches(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{dataset, mixed, row};
    use pretty_assertions::assert_eq;

    fn selection(year: i32, min: f64, max: f64) -> FilterSelection {
        FilterSelection {
            year,
            suppliers: BTreeSet::new(),
            doc_types: BTreeSet::new(),
            amount_range: AmountRange::new(min, max),
        }
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn amounts(rows: &[&InvoiceRow]) -> Vec<f64> {
        rows.iter().map(|r| r.amount).collect()
    }

    #[test]
    fn year_is_an_exact_match() {
        let ds = mixed();
        let subset = filter(&ds, &selection(2023, 0.0, 1e9));
        assert_eq!(amounts(&subset), vec![100.0, 500.0, 1000.0, 1000.01, 499.99]);

        let subset = filter(&ds, &selection(1999, 0.0, 1e9));
        assert!(subset.is_empty());
    }

    #[test]
    fn amount_bounds_are_inclusive() {
        let ds = mixed();
        let subset = filter(&ds, &selection(2023, 500.0, 1000.0));
        assert_eq!(amounts(&subset), vec![500.0, 1000.0]);
    }

    #[test]
    fn inverted_range_yields_nothing() {
        let ds = mixed();
        assert!(AmountRange::new(1000.0, 500.0).is_empty());
        assert!(filter(&ds, &selection(2023, 1000.0, 500.0)).is_empty());
    }

    #[test]
    fn empty_sets_do_not_restrict() {
        let ds = mixed();
        let all = filter(&ds, &selection(2023, 0.0, 1e9));

        let mut sel = selection(2023, 0.0, 1e9);
        sel.suppliers = set(&["B", "C"]);
        assert_eq!(amounts(&filter(&ds, &sel)), vec![500.0, 1000.0, 1000.01, 499.99]);

        sel.doc_types = set(&["Factura"]);
        assert_eq!(amounts(&filter(&ds, &sel)), vec![1000.0, 1000.01]);

        sel.suppliers.clear();
        sel.doc_types.clear();
        assert_eq!(filter(&ds, &sel), all);
    }

    #[test]
    fn unknown_suppliers_match_nothing() {
        let ds = dataset(vec![row("2023-01-01", "C", "Factura", 10.0)]);
        let mut sel = selection(2023, 0.0, 100.0);
        sel.suppliers = set(&["A", "B"]);
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn subset_is_drawn_from_dataset_without_duplicates() {
        let ds = mixed();
        let mut sel = selection(2023, 0.0, 1e9);
        sel.doc_types = set(&["Factura", "Aviz"]);
        let subset = filter(&ds, &sel);

        for (i, r) in subset.iter().enumerate() {
            assert!(ds.rows.iter().any(|d| std::ptr::eq(d, *r)));
            assert!(subset[i + 1..].iter().all(|o| !std::ptr::eq(*o, *r)));
        }
        assert_eq!(filter(&ds, &sel), subset);
    }
}

//! Owns the live filter selection and turns control changes into a fresh
//! view model.

use std::collections::BTreeSet;
use tracing::debug;

use crate::aggregate::aggregate;
use crate::filter::{filter, AmountRange, FilterSelection};
use crate::types::Dataset;
use crate::view::{build, ViewModel};

const AMOUNT_STEP: f64 = 1000.0;
const AMOUNT_MARK_EVERY: i64 = 5000;
const MAX_AMOUNT_MARKS: i64 = 20;

/// Choices offered by the four controls, computed once from the full dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetOptions {
    /// Distinct years, ascending.
    pub years: Vec<i32>,
    /// Distinct suppliers, first appearance order.
    pub suppliers: Vec<String>,
    pub doc_types: Vec<String>,
    pub amount_bounds: AmountRange,
    pub amount_step: f64,
    pub amount_marks: Vec<i64>,
}

impl WidgetOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        use chrono::Datelike;

        let years: BTreeSet<i32> = dataset.rows.iter().map(|r| r.invoice_date.year()).collect();
        let amount_bounds = dataset
            .rows
            .iter()
            .map(|r| r.amount)
            .fold(None, |acc: Option<AmountRange>, a| match acc {
                None => Some(AmountRange::new(a, a)),
                Some(range) => Some(AmountRange::new(range.min.min(a), range.max.max(a))),
            })
            .unwrap_or(AmountRange::new(0.0, 0.0));
        let amount_marks = amount_marks(amount_bounds.max);

        WidgetOptions {
            years: years.into_iter().collect(),
            suppliers: distinct(dataset.rows.iter().map(|r| r.supplier.as_str())),
            doc_types: distinct(dataset.rows.iter().map(|r| r.doc_type.as_str())),
            amount_bounds,
            amount_step: AMOUNT_STEP,
            amount_marks,
        }
    }

    /// Latest year, no supplier or type restriction, full amount range.
    pub fn initial_selection(&self) -> FilterSelection {
        FilterSelection {
            year: self.years.last().copied().unwrap_or_default(),
            suppliers: BTreeSet::new(),
            doc_types: BTreeSet::new(),
            amount_range: self.amount_bounds,
        }
    }
}

/// Marks on the 5000 grid from 0 up to `max`. Large maxima widen the
/// stride to a multiple of 5000 so there are never more than
/// `MAX_AMOUNT_MARKS`.
fn amount_marks(max: f64) -> Vec<i64> {
    // `as` saturates, so NaN and huge values stay in range.
    let top = max.floor() as i64;
    if top < 0 {
        return Vec::new();
    }
    let intervals = top / AMOUNT_MARK_EVERY;
    let multiple = ((intervals + MAX_AMOUNT_MARKS - 2) / (MAX_AMOUNT_MARKS - 1)).max(1);
    let stride = AMOUNT_MARK_EVERY * multiple;
    (0..=intervals / multiple).map(|k| k * stride).collect()
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values.filter(|v| seen.insert(*v)).map(str::to_string).collect()
}

/// One user interaction with a control.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEvent {
    YearChanged(i32),
    SuppliersChanged(BTreeSet<String>),
    DocTypesChanged(BTreeSet<String>),
    AmountRangeChanged { min: f64, max: f64 },
}

impl FilterEvent {
    pub fn apply(self, previous: &FilterSelection) -> FilterSelection {
        let mut next = previous.clone();
        match self {
            FilterEvent::YearChanged(year) => next.year = year,
            FilterEvent::SuppliersChanged(suppliers) => next.suppliers = suppliers,
            FilterEvent::DocTypesChanged(doc_types) => next.doc_types = doc_types,
            FilterEvent::AmountRangeChanged { min, max } => next.amount_range = AmountRange::new(min, max),
        }
        next
    }
}

/// Filter, aggregate and package in one pass.
pub fn recompute(dataset: &Dataset, selection: &FilterSelection, currency: &str) -> ViewModel {
    let subset = filter(dataset, selection);
    let totals = aggregate(&subset);
    debug!(year = selection.year, records = totals.count, "recomputed view");
    build(dataset, &subset, &totals, currency)
}

/// Apply `event` to `previous` and compute the resulting view.
pub fn dispatch(
    dataset: &Dataset,
    currency: &str,
    event: FilterEvent,
    previous: &FilterSelection,
) -> (FilterSelection, ViewModel) {
    debug!(?event, "dispatching filter event");
    let next = event.apply(previous);
    let view = recompute(dataset, &next, currency);
    (next, view)
}

/// Single owner of the live selection for one dashboard session.
pub struct Controller<'a> {
    dataset: &'a Dataset,
    currency: String,
    options: WidgetOptions,
    selection: FilterSelection,
    view: ViewModel,
}

impl<'a> Controller<'a> {
    pub fn new(dataset: &'a Dataset, currency: impl Into<String>) -> Self {
        let currency = currency.into();
        let options = WidgetOptions::from_dataset(dataset);
        let selection = options.initial_selection();
        let view = recompute(dataset, &selection, &currency);
        Controller { dataset, currency, options, selection, view }
    }

    pub fn handle(&mut self, event: FilterEvent) -> &ViewModel {
        let (selection, view) = dispatch(self.dataset, &self.currency, event, &self.selection);
        self.selection = selection;
        self.view = view;
        &self.view
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{dataset, mixed, row};
    use pretty_assertions::assert_eq;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn options_come_from_the_full_dataset() {
        let opts = WidgetOptions::from_dataset(&mixed());
        assert_eq!(opts.years, vec![2022, 2023, 2024]);
        assert_eq!(opts.suppliers, vec!["A", "B", "C"]);
        assert_eq!(opts.doc_types, vec!["Factura", "Chitanta", "Aviz"]);
        assert_eq!(opts.amount_bounds, AmountRange::new(100.0, 1500.0));
        assert_eq!(opts.amount_step, 1000.0);
        assert_eq!(opts.amount_marks, vec![0]);

        let big = dataset(vec![row("2023-01-01", "A", "F", 12_345.6)]);
        assert_eq!(WidgetOptions::from_dataset(&big).amount_marks, vec![0, 5000, 10000]);
    }

    #[test]
    fn amount_marks_stay_few_for_huge_amounts() {
        for max in [95_000.0, 100_000.0, 50_000_000.0, 1e13, 1e300] {
            let ds = dataset(vec![row("2023-01-01", "A", "F", max)]);
            let marks = WidgetOptions::from_dataset(&ds).amount_marks;
            assert!(!marks.is_empty() && marks.len() <= 20, "{max}: {} marks", marks.len());
            assert_eq!(marks[0], 0);
            assert!(marks.iter().all(|m| m % 5000 == 0));
            assert!(marks.windows(2).all(|w| w[0] < w[1]));
            assert!((*marks.last().unwrap() as f64) <= max);
        }
        // Twenty marks still fit on the plain 5000 grid.
        let ds = dataset(vec![row("2023-01-01", "A", "F", 95_000.0)]);
        assert_eq!(WidgetOptions::from_dataset(&ds).amount_marks.len(), 20);

        let ds = dataset(vec![row("2023-01-01", "A", "F", -10.0)]);
        assert!(WidgetOptions::from_dataset(&ds).amount_marks.is_empty());
    }

    #[test]
    fn starts_on_latest_year_unrestricted() {
        let ds = mixed();
        let controller = Controller::new(&ds, "lei");
        let sel = controller.selection();
        assert_eq!(sel.year, 2024);
        assert!(sel.suppliers.is_empty());
        assert!(sel.doc_types.is_empty());
        assert_eq!(sel.amount_range, AmountRange::new(100.0, 1500.0));
        assert_eq!(controller.view().statistics[0], "Total records: 1");
    }

    #[test]
    fn each_event_updates_one_control_and_recomputes() {
        let ds = mixed();
        let mut controller = Controller::new(&ds, "lei");

        let view = controller.handle(FilterEvent::YearChanged(2023));
        assert_eq!(view.statistics[0], "Total records: 5");

        let view = controller.handle(FilterEvent::SuppliersChanged(set(&["B"])));
        assert_eq!(view.statistics[0], "Total records: 2");

        let view = controller.handle(FilterEvent::SuppliersChanged(BTreeSet::new()));
        assert_eq!(view.statistics[0], "Total records: 5");

        let view = controller.handle(FilterEvent::DocTypesChanged(set(&["Aviz"])));
        assert_eq!(view.statistics[0], "Total records: 1");

        controller.handle(FilterEvent::DocTypesChanged(BTreeSet::new()));
        let view = controller.handle(FilterEvent::AmountRangeChanged { min: 500.0, max: 1000.0 });
        assert_eq!(view.statistics[1], "Total invoice amount: 1,500.00 lei");
        assert_eq!(controller.selection().year, 2023);
    }

    #[test]
    fn missing_year_and_inverted_range_publish_zero_state() {
        let ds = mixed();
        let mut controller = Controller::new(&ds, "lei");

        let view = controller.handle(FilterEvent::YearChanged(1999));
        assert_eq!(view.statistics[2], "Average invoice amount: no data");
        assert!(view.bar_series.is_empty());

        controller.handle(FilterEvent::YearChanged(2023));
        let view = controller.handle(FilterEvent::AmountRangeChanged { min: 900.0, max: 100.0 });
        assert_eq!(view.statistics[0], "Total records: 0");
        assert!(view.table.rows.is_empty());
    }

    #[test]
    fn dispatch_is_pure() {
        let ds = mixed();
        let start = WidgetOptions::from_dataset(&ds).initial_selection();
        let event = FilterEvent::DocTypesChanged(set(&["Factura"]));

        let (first_sel, first_view) = dispatch(&ds, "lei", event.clone(), &start);
        let (second_sel, second_view) = dispatch(&ds, "lei", event, &start);
        assert_eq!(first_sel, second_sel);
        assert_eq!(first_view, second_view);
        assert_eq!(first_sel.doc_types, set(&["Factura"]));
        assert!(start.doc_types.is_empty());
    }
}

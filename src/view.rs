//! Render-ready packaging of a filtered subset: statistics lines, the two
//! supplier series and the capped table.

use serde::Serialize;
use std::collections::HashMap;

use crate::aggregate::AggregateResult;
use crate::types::{Dataset, InvoiceRow};
use crate::util::{format_int, format_number};

/// Display cap for the table. Statistics and charts always cover the
/// whole subset.
pub const TABLE_ROW_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierBar {
    pub supplier: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierShare {
    pub supplier: String,
    pub amount: f64,
    /// Fraction of the summed amounts, in `0.0..=1.0` for non-negative data.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub statistics: Vec<String>,
    pub bar_series: Vec<SupplierBar>,
    pub pie_series: Vec<SupplierShare>,
    pub table: TableView,
}

pub fn build(
    dataset: &Dataset,
    subset: &[&InvoiceRow],
    aggregate: &AggregateResult,
    currency: &str,
) -> ViewModel {
    let groups = sum_by_supplier(subset);
    let grand_total: f64 = groups.iter().map(|(_, amount)| amount).sum();

    let pie_series = groups
        .iter()
        .map(|(supplier, amount)| SupplierShare {
            supplier: supplier.clone(),
            amount: *amount,
            share: if grand_total > 0.0 { amount / grand_total } else { 0.0 },
        })
        .collect();
    let bar_series = groups
        .into_iter()
        .map(|(supplier, amount)| SupplierBar { supplier, amount })
        .collect();

    ViewModel {
        statistics: statistics_lines(aggregate, currency),
        bar_series,
        pie_series,
        table: table_view(dataset, subset),
    }
}

fn statistics_lines(aggregate: &AggregateResult, currency: &str) -> Vec<String> {
    let average = match aggregate.average_amount {
        Some(avg) => format!("{} {}", format_number(avg, 2), currency),
        None => "no data".to_string(),
    };
    vec![
        format!("Total records: {}", format_int(aggregate.count)),
        format!("Total invoice amount: {} {}", format_number(aggregate.total_amount, 2), currency),
        format!("Average invoice amount: {}", average),
    ]
}

/// Per-supplier totals in order of first appearance.
fn sum_by_supplier(subset: &[&InvoiceRow]) -> Vec<(String, f64)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, f64)> = Vec::new();
    for r in subset {
        match index.get(r.supplier.as_str()) {
            Some(&i) => groups[i].1 += r.amount,
            None => {
                index.insert(&r.supplier, groups.len());
                groups.push((r.supplier.clone(), r.amount));
            }
        }
    }
    groups
}

fn table_view(dataset: &Dataset, subset: &[&InvoiceRow]) -> TableView {
    let rows = subset
        .iter()
        .take(TABLE_ROW_LIMIT)
        .map(|r| dataset.layout.iter().map(|&col| r.cell(col)).collect())
        .collect();
    TableView { headers: dataset.headers.clone(), rows }
}

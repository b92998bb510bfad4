// Terminal rendering of the dashboard: header, statistics block, the two
// supplier charts and the data table.
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::controller::WidgetOptions;
use crate::filter::FilterSelection;
use crate::util::format_number;
use crate::view::{SupplierBar, SupplierShare, TableView, ViewModel};

pub const TITLE: &str = "Invoice Analysis Dashboard";
const BAR_WIDTH: usize = 40;

pub fn render_dashboard(view: &ViewModel, selection: &FilterSelection) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n{}\n\n", TITLE, "=".repeat(TITLE.len())));
    out.push_str(&format!("Filters: {}\n\n", describe_selection(selection)));
    for line in &view.statistics {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("\nInvoice amount by supplier\n");
    out.push_str(&render_bars(&view.bar_series));
    out.push_str("\nInvoice amount distribution by supplier\n");
    out.push_str(&render_shares(&view.pie_series));
    out.push('\n');
    out.push_str(&render_table(&view.table));
    out
}

pub fn describe_selection(selection: &FilterSelection) -> String {
    let list = |set: &std::collections::BTreeSet<String>| {
        if set.is_empty() {
            "all".to_string()
        } else {
            set.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    };
    format!(
        "year {} | suppliers: {} | document types: {} | amount {} - {}",
        selection.year,
        list(&selection.suppliers),
        list(&selection.doc_types),
        format_number(selection.amount_range.min, 2),
        format_number(selection.amount_range.max, 2),
    )
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0)
}

pub fn render_bars(series: &[SupplierBar]) -> String {
    if series.is_empty() {
        return "(no data)\n".to_string();
    }
    let width = label_width(series.iter().map(|b| b.supplier.as_str()));
    let peak = series.iter().map(|b| b.amount).fold(0.0_f64, f64::max);
    series
        .iter()
        .map(|b| {
            // Negative totals draw as an empty bar.
            let len = if peak > 0.0 { (b.amount / peak * BAR_WIDTH as f64).round() as usize } else { 0 };
            format!(
                "{:<width$} | {:<bar$} {}\n",
                b.supplier,
                "#".repeat(len),
                format_number(b.amount, 2),
                width = width,
                bar = BAR_WIDTH
            )
        })
        .collect()
}

pub fn render_shares(series: &[SupplierShare]) -> String {
    if series.is_empty() {
        return "(no data)\n".to_string();
    }
    let width = label_width(series.iter().map(|s| s.supplier.as_str()));
    series
        .iter()
        .map(|s| {
            format!(
                "{:<width$} {:>6.2}%  ({})\n",
                s.supplier,
                s.share * 100.0,
                format_number(s.amount, 2),
                width = width
            )
        })
        .collect()
}

pub fn render_table(table: &TableView) -> String {
    if table.rows.is_empty() {
        return "(no rows)\n".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(table.headers.iter().cloned());
    for row in &table.rows {
        builder.push_record(row.iter().cloned());
    }
    let mut rendered = builder.build();
    rendered.with(Style::markdown());
    format!("{}\n", rendered)
}

pub fn render_menu(options: &WidgetOptions, selection: &FilterSelection) -> String {
    let marks: Vec<String> = options.amount_marks.iter().map(|m| m.to_string()).collect();
    let years: Vec<String> = options.years.iter().map(|y| y.to_string()).collect();
    format!(
        "Change a filter:\n\
         [1] Year (current {}; available {})\n\
         [2] Suppliers ({} available)\n\
         [3] Document types ({} available)\n\
         [4] Amount range ({} - {}, step {}, marks {})\n\
         [0] Exit\n",
        selection.year,
        years.join(", "),
        options.suppliers.len(),
        options.doc_types.len(),
        format_number(options.amount_bounds.min, 2),
        format_number(options.amount_bounds.max, 2),
        format_number(options.amount_step, 0),
        marks.join(" "),
    )
}

/// Numbered option list for the multi-select prompts.
pub fn render_options(options: &[String]) -> String {
    options
        .iter()
        .enumerate()
        .map(|(i, o)| format!("  {:>3}. {}\n", i + 1, o))
        .collect()
}

#[derive(Serialize)]
struct Snapshot<'a> {
    selection: &'a FilterSelection,
    view: &'a ViewModel,
}

pub fn render_json(view: &ViewModel, selection: &FilterSelection) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Snapshot { selection, view })
}

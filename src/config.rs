use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::controller::{FilterEvent, WidgetOptions};
use crate::types::ColumnNames;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(about = "Filter an invoice CSV export by year, supplier, document type and amount.")]
pub struct Args {
    /// Invoice CSV file with a header row (`-` reads standard input).
    #[arg(default_value = "bff.csv")]
    pub data: PathBuf,

    /// Header of the invoice date column.
    #[arg(long, default_value = "Data factura")]
    pub date_column: String,

    /// Header of the supplier column.
    #[arg(long, default_value = "Furnizor")]
    pub supplier_column: String,

    /// Header of the document type column.
    #[arg(long, default_value = "Tip document")]
    pub doc_type_column: String,

    /// Header of the invoice amount column.
    #[arg(long, default_value = "Suma factura (lei)")]
    pub amount_column: String,

    /// Currency unit printed after amounts.
    #[arg(long, default_value = "lei")]
    pub currency: String,

    /// Render once and exit instead of opening the interactive menu.
    #[arg(long)]
    pub once: bool,

    /// Output format for `--once`.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Start on this year instead of the latest one.
    #[arg(long)]
    pub year: Option<i32>,

    /// Restrict to a supplier (repeatable).
    #[arg(long = "supplier", value_name = "NAME")]
    pub suppliers: Vec<String>,

    /// Restrict to a document type (repeatable).
    #[arg(long = "doc-type", value_name = "TYPE")]
    pub doc_types: Vec<String>,

    /// Lower amount bound (inclusive).
    #[arg(long)]
    pub min_amount: Option<f64>,

    /// Upper amount bound (inclusive).
    #[arg(long)]
    pub max_amount: Option<f64>,
}

impl Args {
    pub fn column_names(&self) -> ColumnNames {
        ColumnNames {
            invoice_date: self.date_column.clone(),
            supplier: self.supplier_column.clone(),
            doc_type: self.doc_type_column.clone(),
            amount: self.amount_column.clone(),
        }
    }

    /// Events moving the initial selection to the one asked for on the
    /// command line.
    pub fn selection_events(&self, options: &WidgetOptions) -> Vec<FilterEvent> {
        let mut events = Vec::new();
        if let Some(year) = self.year {
            events.push(FilterEvent::YearChanged(year));
        }
        if !self.suppliers.is_empty() {
            events.push(FilterEvent::SuppliersChanged(self.suppliers.iter().cloned().collect()));
        }
        if !self.doc_types.is_empty() {
            events.push(FilterEvent::DocTypesChanged(self.doc_types.iter().cloned().collect()));
        }
        if self.min_amount.is_some() || self.max_amount.is_some() {
            events.push(FilterEvent::AmountRangeChanged {
                min: self.min_amount.unwrap_or(options.amount_bounds.min),
                max: self.max_amount.unwrap_or(options.amount_bounds.max),
            });
        }
        events
    }
}

use crate::types::{Column, ColumnNames, Dataset, InvoiceRow};
use crate::util::{parse_date_safe, parse_f64_safe};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::io;
use std::path::Path;
use thiserror::Error;

/// Everything that can go wrong while loading the invoice table. All of
/// these are fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column `{0}` in header row")]
    MissingColumn(String),
    #[error("line {line}: `{value}` in column `{column}` is not a date")]
    InvalidDate { line: u64, column: String, value: String },
    #[error("line {line}: `{value}` in column `{column}` is not an amount")]
    InvalidAmount { line: u64, column: String, value: String },
    #[error("no invoice rows found")]
    Empty,
}

pub fn load_dataset(path: &Path, names: &ColumnNames) -> Result<Dataset, LoadError> {
    let rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    read_records(rdr, names)
}

pub fn read_dataset<R: io::Read>(input: R, names: &ColumnNames) -> Result<Dataset, LoadError> {
    let rdr = ReaderBuilder::new().flexible(true).from_reader(input);
    read_records(rdr, names)
}

struct Positions {
    invoice_date: usize,
    supplier: usize,
    doc_type: usize,
    amount: usize,
    extra: Vec<usize>,
}

fn resolve_layout(
    headers: &StringRecord,
    names: &ColumnNames,
) -> Result<(Vec<String>, Vec<Column>, Positions), LoadError> {
    let headers: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };
    let invoice_date = find(&names.invoice_date)?;
    let supplier = find(&names.supplier)?;
    let doc_type = find(&names.doc_type)?;
    let amount = find(&names.amount)?;

    let mut extra = Vec::new();
    let layout: Vec<Column> = (0..headers.len())
        .map(|i| match i {
            _ if i == invoice_date => Column::InvoiceDate,
            _ if i == supplier => Column::Supplier,
            _ if i == doc_type => Column::DocType,
            _ if i == amount => Column::Amount,
            _ => {
                extra.push(i);
                Column::Extra(extra.len() - 1)
            }
        })
        .collect();

    let positions = Positions { invoice_date, supplier, doc_type, amount, extra };
    Ok((headers, layout, positions))
}

fn read_records<R: io::Read>(mut rdr: Reader<R>, names: &ColumnNames) -> Result<Dataset, LoadError> {
    let (headers, layout, pos) = resolve_layout(rdr.headers()?, names)?;

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1; the reader knows better when fields span lines.
        let line = record.position().map_or(idx as u64 + 2, |p| p.line());
        let field = |i: usize| record.get(i).unwrap_or("").trim();

        let raw_date = field(pos.invoice_date);
        let invoice_date = parse_date_safe(Some(raw_date)).ok_or_else(|| LoadError::InvalidDate {
            line,
            column: names.invoice_date.clone(),
            value: raw_date.to_string(),
        })?;
        let raw_amount = field(pos.amount);
        let amount = parse_f64_safe(Some(raw_amount)).ok_or_else(|| LoadError::InvalidAmount {
            line,
            column: names.amount.clone(),
            value: raw_amount.to_string(),
        })?;

        rows.push(InvoiceRow {
            invoice_date,
            supplier: field(pos.supplier).to_string(),
            doc_type: field(pos.doc_type).to_string(),
            amount,
            extra: pos.extra.iter().map(|&i| field(i).to_string()).collect(),
        });
    }

    let dataset = Dataset { headers, layout, rows };
    if dataset.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(dataset)
}

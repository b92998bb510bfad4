use chrono::NaiveDate;

use crate::util::format_number;

/// Header names of the four columns the dashboard interprets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub invoice_date: String,
    pub supplier: String,
    pub doc_type: String,
    pub amount: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            invoice_date: "Data factura".to_string(),
            supplier: "Furnizor".to_string(),
            doc_type: "Tip document".to_string(),
            amount: "Suma factura (lei)".to_string(),
        }
    }
}

/// Where a source column lives once a row has been loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    InvoiceDate,
    Supplier,
    DocType,
    Amount,
    /// Index into [`InvoiceRow::extra`].
    Extra(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRow {
    pub invoice_date: NaiveDate,
    pub supplier: String,
    pub doc_type: String,
    pub amount: f64,
    /// Pass-through cells, only used by the table view.
    pub extra: Vec<String>,
}

impl InvoiceRow {
    /// Display text of one cell.
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::InvoiceDate => self.invoice_date.format("%Y-%m-%d").to_string(),
            Column::Supplier => self.supplier.clone(),
            Column::DocType => self.doc_type.clone(),
            Column::Amount => format_number(self.amount, 2),
            Column::Extra(i) => self.extra.get(i).cloned().unwrap_or_default(),
        }
    }
}

/// The loaded invoice table. Rows keep their source order and are never
/// mutated after loading.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Source header names, in source order.
    pub headers: Vec<String>,
    /// Mapping of each source column to its place in [`InvoiceRow`].
    pub layout: Vec<Column>,
    pub rows: Vec<InvoiceRow>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn row(date: &str, supplier: &str, doc_type: &str, amount: f64) -> InvoiceRow {
        InvoiceRow {
            invoice_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            supplier: supplier.to_string(),
            doc_type: doc_type.to_string(),
            amount,
            extra: vec![format!("note for {supplier}")],
        }
    }

    /// Dataset with the default headers plus one pass-through `Observatii` column.
    pub fn dataset(rows: Vec<InvoiceRow>) -> Dataset {
        let names = ColumnNames::default();
        Dataset {
            headers: vec![
                names.invoice_date,
                names.supplier,
                names.doc_type,
                names.amount,
                "Observatii".to_string(),
            ],
            layout: vec![
                Column::InvoiceDate,
                Column::Supplier,
                Column::DocType,
                Column::Amount,
                Column::Extra(0),
            ],
            rows,
        }
    }

    pub fn mixed() -> Dataset {
        dataset(vec![
            row("2022-11-30", "A", "Factura", 1500.0),
            row("2023-01-10", "A", "Factura", 100.0),
            row("2023-02-11", "B", "Chitanta", 500.0),
            row("2023-03-12", "C", "Factura", 1000.0),
            row("2023-04-13", "B", "Factura", 1000.01),
            row("2023-05-14", "C", "Aviz", 499.99),
            row("2024-06-15", "A", "Factura", 250.0),
        ])
    }
}

use crate::types::InvoiceRow;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateResult {
    pub count: usize,
    pub total_amount: f64,
    /// `None` when there are no rows to average.
    pub average_amount: Option<f64>,
}

pub fn aggregate(subset: &[&InvoiceRow]) -> AggregateResult {
    let count = subset.len();
    let total_amount: f64 = subset.iter().map(|r| r.amount).sum();
    let average_amount = (count > 0).then(|| total_amount / count as f64);
    AggregateResult { count, total_amount, average_amount }
}

// Parsing of the menu answers into filter events.
use std::collections::BTreeSet;
use thiserror::Error;

use crate::controller::FilterEvent;
use crate::util::{parse_f64_safe, parse_i32_safe};

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("`{0}` is not a year")]
    Year(String),
    #[error("option {index} does not exist (choose 1-{available})")]
    NoSuchOption { index: usize, available: usize },
    #[error("expected two amounts separated by a space, e.g. `500 1000`")]
    Range,
}

pub fn parse_year(input: &str) -> Result<FilterEvent, InputError> {
    parse_i32_safe(Some(input))
        .map(FilterEvent::YearChanged)
        .ok_or_else(|| InputError::Year(input.trim().to_string()))
}

/// Comma separated names or 1-based option numbers. An empty answer clears
/// the selection. Names not among `options` are kept as typed.
pub fn parse_multi_select(input: &str, options: &[String]) -> Result<BTreeSet<String>, InputError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.parse::<usize>() {
            Ok(index) => index
                .checked_sub(1)
                .and_then(|i| options.get(i))
                .cloned()
                .ok_or(InputError::NoSuchOption { index, available: options.len() }),
            Err(_) => Ok(token.to_string()),
        })
        .collect()
}

/// `min max`. An inverted pair is accepted and simply matches nothing.
pub fn parse_range(input: &str) -> Result<FilterEvent, InputError> {
    let bounds: Vec<&str> = input.split_whitespace().collect();
    match bounds.as_slice() {
        [min, max] => match (parse_f64_safe(Some(*min)), parse_f64_safe(Some(*max))) {
            (Some(min), Some(max)) => Ok(FilterEvent::AmountRangeChanged { min, max }),
            _ => Err(InputError::Range),
        },
        _ => Err(InputError::Range),
    }
}

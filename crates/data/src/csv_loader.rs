//! CSV ingestion for aligned borrow-rate and price series.
//!
//! Two source shapes are supported: a headered file carrying borrow rate and
//! close columns (names configurable, optional ISO date column), and the
//! bare single-column price file some exports produce. Parsing is strict
//! beyond that; a malformed value fails the load with file and row context
//! rather than producing a silently shortened series.

use crate::models::{MarketRow, MarketSeries};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::StringRecord;
use std::io::Read;
use std::path::Path;

/// Column names expected in a headered market CSV.
#[derive(Debug, Clone)]
pub struct CsvColumns {
    pub borrow_rate: String,
    pub close: String,
    /// Optional column; rows without it simply carry no date.
    pub date: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            borrow_rate: "borrow_rate".to_string(),
            close: "close".to_string(),
            date: "date".to_string(),
        }
    }
}

/// Loads a headered market CSV from disk.
///
/// # Errors
/// Returns an error if the file cannot be opened, a required column is
/// missing, a value fails to parse, or the file has no data rows.
pub fn load_market_csv(path: impl AsRef<Path>, columns: &CsvColumns) -> Result<MarketSeries> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open CSV file: {}", path.display()))?;
    let series = read_market_csv(file, columns)
        .with_context(|| format!("failed to read market data from {}", path.display()))?;

    tracing::debug!(rows = series.len(), path = %path.display(), "loaded market CSV");
    Ok(series)
}

/// Parses a headered market CSV from any reader.
///
/// # Errors
/// Returns an error if a required column is missing, a value fails to
/// parse, or the input has no data rows.
pub fn read_market_csv<R: Read>(reader: R, columns: &CsvColumns) -> Result<MarketSeries> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let borrow_index = find_column(&headers, &columns.borrow_rate)?;
    let close_index = find_column(&headers, &columns.close)?;
    let date_index = headers
        .iter()
        .position(|name| name.trim() == columns.date);

    let mut rows = Vec::new();
    for (row_number, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("malformed CSV row {}", row_number + 2))?;

        let borrow_rate = parse_number(&record, borrow_index, &columns.borrow_rate, row_number)?;
        let close = parse_number(&record, close_index, &columns.close, row_number)?;
        let date = match date_index {
            Some(index) => Some(parse_date(&record, index, row_number)?),
            None => None,
        };

        rows.push(MarketRow {
            date,
            borrow_rate,
            close,
        });
    }

    anyhow::ensure!(!rows.is_empty(), "CSV contained no data rows");
    Ok(MarketSeries { rows })
}

/// Loads a bare single-column price CSV (no borrow rates).
///
/// # Errors
/// Returns an error if the file cannot be opened or a row fails to parse.
pub fn load_price_csv(path: impl AsRef<Path>) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open CSV file: {}", path.display()))?;
    read_price_csv(file).with_context(|| format!("failed to read prices from {}", path.display()))
}

/// Parses a bare single-column price CSV from any reader.
///
/// A single leading non-numeric row is treated as a header and skipped;
/// any later non-numeric value is an error.
///
/// # Errors
/// Returns an error if a data row fails to parse or no prices remain.
pub fn read_price_csv<R: Read>(reader: R) -> Result<Vec<f64>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut prices = Vec::new();
    for (row_number, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("malformed CSV row {}", row_number + 1))?;
        let field = match record.get(0) {
            Some(field) if !field.trim().is_empty() => field.trim(),
            _ => continue,
        };

        match field.parse::<f64>() {
            Ok(price) => prices.push(price),
            // Tolerate one header row at the top, nothing else.
            Err(_) if row_number == 0 => continue,
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("invalid price {field:?} at row {}", row_number + 1)
                });
            }
        }
    }

    anyhow::ensure!(!prices.is_empty(), "CSV contained no prices");
    Ok(prices)
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .with_context(|| {
            let available: Vec<&str> = headers.iter().collect();
            format!("column {name:?} not found, available columns: {available:?}")
        })
}

fn parse_number(record: &StringRecord, index: usize, column: &str, row_number: usize) -> Result<f64> {
    let field = record
        .get(index)
        .with_context(|| format!("row {} is missing column {column:?}", row_number + 2))?;
    field.trim().parse::<f64>().with_context(|| {
        format!(
            "invalid {column} value {field:?} at row {}",
            row_number + 2
        )
    })
}

fn parse_date(record: &StringRecord, index: usize, row_number: usize) -> Result<NaiveDate> {
    let field = record
        .get(index)
        .with_context(|| format!("row {} is missing its date", row_number + 2))?;
    NaiveDate::parse_from_str(field.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date {field:?} at row {}", row_number + 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================
    // Headered Market CSV Tests
    // ============================================================

    #[test]
    fn reads_market_csv_with_default_columns() {
        let csv = b"date,borrow_rate,close\n2025-01-02,3.5,101.25\n2025-01-03,4.0,99.5\n";
        let series = read_market_csv(&csv[..], &CsvColumns::default()).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.borrow_rates(), vec![3.5, 4.0]);
        assert_eq!(series.prices(), vec![101.25, 99.5]);
        assert_eq!(
            series.date_at(0),
            Some(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap())
        );
    }

    #[test]
    fn column_order_does_not_matter() {
        let csv = b"close,date,borrow_rate\n50.0,2025-06-01,12.0\n";
        let series = read_market_csv(&csv[..], &CsvColumns::default()).unwrap();

        assert_eq!(series.borrow_rates(), vec![12.0]);
        assert_eq!(series.prices(), vec![50.0]);
    }

    #[test]
    fn custom_column_names_are_honored() {
        let csv = b"fee_rate,last\n7.25,310.0\n8.0,305.5\n";
        let columns = CsvColumns {
            borrow_rate: "fee_rate".to_string(),
            close: "last".to_string(),
            date: "date".to_string(),
        };
        let series = read_market_csv(&csv[..], &columns).unwrap();

        assert_eq!(series.borrow_rates(), vec![7.25, 8.0]);
        assert_eq!(series.prices(), vec![310.0, 305.5]);
    }

    #[test]
    fn date_column_is_optional() {
        let csv = b"borrow_rate,close\n1.0,100.0\n";
        let series = read_market_csv(&csv[..], &CsvColumns::default()).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.date_at(0), None);
    }

    #[test]
    fn missing_required_column_names_it() {
        let csv = b"date,close\n2025-01-02,100.0\n";
        let err = read_market_csv(&csv[..], &CsvColumns::default()).unwrap_err();

        let message = format!("{err:#}");
        assert!(
            message.contains("\"borrow_rate\""),
            "error should name the missing column: {message}"
        );
        assert!(
            message.contains("close"),
            "error should list available columns: {message}"
        );
    }

    #[test]
    fn bad_numeric_value_reports_the_row() {
        let csv = b"borrow_rate,close\n3.5,100.0\nnot-a-number,99.0\n";
        let err = read_market_csv(&csv[..], &CsvColumns::default()).unwrap_err();

        let message = format!("{err:#}");
        assert!(
            message.contains("row 3"),
            "error should carry the 1-based file row: {message}"
        );
        assert!(message.contains("borrow_rate"), "got: {message}");
    }

    #[test]
    fn bad_date_reports_the_row() {
        let csv = b"date,borrow_rate,close\n02/01/2025,3.5,100.0\n";
        let err = read_market_csv(&csv[..], &CsvColumns::default()).unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("invalid date"), "got: {message}");
        assert!(message.contains("row 2"), "got: {message}");
    }

    #[test]
    fn empty_market_csv_is_an_error() {
        let csv = b"date,borrow_rate,close\n";
        let err = read_market_csv(&csv[..], &CsvColumns::default()).unwrap_err();

        assert!(format!("{err}").contains("no data rows"));
    }

    #[test]
    fn whitespace_around_values_is_trimmed() {
        let csv = b"borrow_rate ,close\n 3.5 , 100.0 \n";
        let series = read_market_csv(&csv[..], &CsvColumns::default()).unwrap();

        assert_eq!(series.borrow_rates(), vec![3.5]);
        assert_eq!(series.prices(), vec![100.0]);
    }

    // ============================================================
    // Bare Price CSV Tests
    // ============================================================

    #[test]
    fn reads_bare_price_column() {
        let csv = b"100.0\n101.5\n99.75\n";
        let prices = read_price_csv(&csv[..]).unwrap();

        assert_eq!(prices, vec![100.0, 101.5, 99.75]);
    }

    #[test]
    fn tolerates_a_single_header_row() {
        let csv = b"close\n100.0\n101.5\n";
        let prices = read_price_csv(&csv[..]).unwrap();

        assert_eq!(prices, vec![100.0, 101.5]);
    }

    #[test]
    fn non_numeric_value_past_the_header_is_an_error() {
        let csv = b"close\n100.0\noops\n";
        let err = read_price_csv(&csv[..]).unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("invalid price"), "got: {message}");
        assert!(message.contains("row 3"), "got: {message}");
    }

    #[test]
    fn blank_rows_are_skipped() {
        let csv = b"100.0\n\n101.0\n";
        let prices = read_price_csv(&csv[..]).unwrap();

        assert_eq!(prices, vec![100.0, 101.0]);
    }

    #[test]
    fn empty_price_csv_is_an_error() {
        let csv = b"";
        let err = read_price_csv(&csv[..]).unwrap_err();

        assert!(format!("{err}").contains("no prices"));
    }
}

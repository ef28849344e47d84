use crate::error::{Result, RevenueReportError};
use crate::schema::{ForecastRow, PriceListRow, RenewalRow, ReportInputs};
use chrono::NaiveDate;
use csv::StringRecord;
use log::debug;
use std::io::Read;

const PRICE_LIST_TABLE: &str = "price list";
const RENEWALS_TABLE: &str = "renewals";
const FORECAST_TABLE: &str = "forecast";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

impl ReportInputs {
    /// Loads all three input tables in one call. Any single table failing to
    /// load aborts the whole run; no partial inputs are returned.
    pub fn from_readers<P, R, F>(price_list: P, renewals: R, forecast: F) -> Result<Self>
    where
        P: Read,
        R: Read,
        F: Read,
    {
        Ok(Self {
            price_list: load_price_list(price_list)?,
            renewals: load_renewals(renewals)?,
            forecast: load_forecast(forecast)?,
        })
    }
}

/// Parses the price list CSV. Required columns: `Licence`, `Price`.
pub fn load_price_list<R: Read>(reader: R) -> Result<Vec<PriceListRow>> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let licence = column_index(PRICE_LIST_TABLE, &headers, "Licence")?;
    let price = column_index(PRICE_LIST_TABLE, &headers, "Price")?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(PriceListRow {
            licence: field(&record, licence).to_string(),
            price: parse_number("Price", field(&record, price))?,
        });
    }

    debug!("Loaded {} price list rows", rows.len());
    Ok(rows)
}

/// Parses the renewals CSV. Required columns: `Licence`, `renewal_date`.
pub fn load_renewals<R: Read>(reader: R) -> Result<Vec<RenewalRow>> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let licence = column_index(RENEWALS_TABLE, &headers, "Licence")?;
    let renewal_date = column_index(RENEWALS_TABLE, &headers, "renewal_date")?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(RenewalRow {
            licence: field(&record, licence).to_string(),
            renewal_date: parse_date("renewal_date", field(&record, renewal_date))?,
        });
    }

    debug!("Loaded {} renewal rows", rows.len());
    Ok(rows)
}

/// Parses the forecast CSV. Required columns: `Close Date`, `Probability`,
/// `Estimated Value`. Probability must be a percentage string ("45%");
/// Estimated Value coerces to missing on non-numeric input instead of failing.
pub fn load_forecast<R: Read>(reader: R) -> Result<Vec<ForecastRow>> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let close_date = column_index(FORECAST_TABLE, &headers, "Close Date")?;
    let probability = column_index(FORECAST_TABLE, &headers, "Probability")?;
    let estimated_value = column_index(FORECAST_TABLE, &headers, "Estimated Value")?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(ForecastRow {
            close_date: parse_date("Close Date", field(&record, close_date))?,
            probability: parse_probability(field(&record, probability))?,
            estimated_value: parse_estimated_value(field(&record, estimated_value)),
        });
    }

    debug!("Loaded {} forecast rows", rows.len());
    Ok(rows)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Resolves a required column to its index before any record is read, so a
/// missing column fails deterministically even for header-only files.
fn column_index(table: &'static str, headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        // Spreadsheet exports often lead with a UTF-8 BOM on the first header.
        .position(|header| header.trim_start_matches('\u{feff}').trim() == name)
        .ok_or_else(|| RevenueReportError::MissingColumn {
            table,
            column: name.to_string(),
        })
}

fn field<'a>(record: &'a StringRecord, index: usize) -> &'a str {
    record.get(index).unwrap_or("")
}

fn parse_date(column: &'static str, value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    Err(RevenueReportError::InvalidDate {
        column,
        value: value.to_string(),
    })
}

fn parse_number(column: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .ok()
        .filter(|number: &f64| number.is_finite())
        .ok_or_else(|| RevenueReportError::InvalidNumber {
            column,
            value: value.to_string(),
        })
}

/// Converts a percentage string to a fraction: "45%" becomes 0.45. The `%`
/// suffix is mandatory and the prefix must be numeric.
fn parse_probability(value: &str) -> Result<f64> {
    let invalid = || RevenueReportError::InvalidProbability(value.to_string());

    let percent = value.trim().strip_suffix('%').ok_or_else(invalid)?;
    let parsed: f64 = percent.trim().parse().map_err(|_| invalid())?;
    if !parsed.is_finite() {
        return Err(invalid());
    }

    Ok(parsed / 100.0)
}

/// Numeric coercion with local recovery: anything that does not parse as a
/// finite number (an empty cell, "TBD", a literal "NaN") becomes `None`
/// rather than an error.
fn parse_estimated_value(value: &str) -> Option<f64> {
    value
        .trim()
        .parse()
        .ok()
        .filter(|number: &f64| number.is_finite())
}

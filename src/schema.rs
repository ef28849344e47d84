use crate::error::RevenueReportError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Calendar month identifier used as the grouping key for every monthly
/// aggregate. Renders as `"YYYY-MM"`; the derived ordering is chronological,
/// which coincides with lexicographic order of the rendered form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Truncates a date to year-month granularity.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = RevenueReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RevenueReportError::InvalidMonthKey(s.to_string());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self { year, month })
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One price-list entry: the renewal price for a licence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceListRow {
    #[serde(rename = "Licence")]
    pub licence: String,

    #[serde(rename = "Price")]
    pub price: f64,
}

/// One renewal event for a licence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenewalRow {
    #[serde(rename = "Licence")]
    pub licence: String,

    pub renewal_date: NaiveDate,
}

/// One open opportunity from the sales forecast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastRow {
    #[serde(rename = "Close Date")]
    pub close_date: NaiveDate,

    /// Win probability as a fraction in `[0, 1]`. The CSV loader converts
    /// percentage strings ("45%" becomes 0.45) before rows reach this type.
    #[serde(rename = "Probability")]
    pub probability: f64,

    /// `None` when the source cell failed numeric coercion; such rows
    /// contribute 0 to monthly fee sums but still count as opportunities.
    #[serde(rename = "Estimated Value")]
    pub estimated_value: Option<f64>,
}

/// The three input tables of a single report run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportInputs {
    pub price_list: Vec<PriceListRow>,
    pub renewals: Vec<RenewalRow>,
    pub forecast: Vec<ForecastRow>,
}

/// A renewal joined to its price: one row per renewal whose licence matched
/// the price list. Renewals without a match never become charges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenewalCharge {
    #[serde(rename = "Licence")]
    pub licence: String,

    #[serde(rename = "Month-Year")]
    pub month_year: MonthKey,

    #[serde(rename = "Price")]
    pub price: f64,
}

/// Per-opportunity forecast detail: the raw forecast row enriched with its
/// month bucket and expected fee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastFeeRow {
    #[serde(rename = "Close Date")]
    pub close_date: NaiveDate,

    #[serde(rename = "Month-Year")]
    pub month_year: MonthKey,

    #[serde(rename = "Probability")]
    pub probability: f64,

    #[serde(rename = "Estimated Value")]
    pub estimated_value: Option<f64>,

    /// `Estimated Value * Probability`; `None` when the value was missing.
    #[serde(rename = "Forecast Fee")]
    pub forecast_fee: Option<f64>,
}

/// Renewal revenue summed per month, with a running cumulative column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyRevenueRow {
    #[serde(rename = "Month-Year")]
    pub month_year: MonthKey,

    #[serde(rename = "Price")]
    pub price: f64,

    #[serde(rename = "Cumulative Revenue")]
    pub cumulative_revenue: f64,
}

/// Expected forecast fees summed per month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastFeeByMonthRow {
    #[serde(rename = "Month-Year")]
    pub month_year: MonthKey,

    #[serde(rename = "Forecast Fee")]
    pub forecast_fee: f64,
}

/// Outer join of monthly revenue and monthly forecast fees with zero-fill,
/// plus the combined Total and its running sum. `Renewals` is the renamed
/// `Price` column and `Cumulative Renewals` the renamed `Cumulative Revenue`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombinedMonthlyRow {
    #[serde(rename = "Month-Year")]
    pub month_year: MonthKey,

    #[serde(rename = "Renewals")]
    pub renewals: f64,

    #[serde(rename = "Cumulative Renewals")]
    pub cumulative_renewals: f64,

    #[serde(rename = "Forecast Fee")]
    pub forecast_fee: f64,

    #[serde(rename = "Total")]
    pub total: f64,

    #[serde(rename = "Cumulative Total")]
    pub cumulative_total: f64,
}

impl CombinedMonthlyRow {
    /// Column order of the exported combined table.
    pub const COLUMNS: [&'static str; 6] = [
        "Month-Year",
        "Renewals",
        "Cumulative Renewals",
        "Forecast Fee",
        "Total",
        "Cumulative Total",
    ];
}

/// Per-month renewal and forecast row counts, outer-joined with zero-fill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyCountsRow {
    #[serde(rename = "Month-Year")]
    pub month_year: MonthKey,

    #[serde(rename = "Renewals Count")]
    pub renewals_count: u64,

    #[serde(rename = "Forecast Count")]
    pub forecast_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_key_from_date_truncates() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let key = MonthKey::from_date(date);
        assert_eq!(key.year(), 2024);
        assert_eq!(key.month(), 1);
        assert_eq!(key.to_string(), "2024-01");
    }

    #[test]
    fn test_month_key_ordering_is_chronological() {
        let dec_2023 = "2023-12".parse::<MonthKey>().unwrap();
        let jan_2024 = "2024-01".parse::<MonthKey>().unwrap();
        let feb_2024 = "2024-02".parse::<MonthKey>().unwrap();

        assert!(dec_2023 < jan_2024);
        assert!(jan_2024 < feb_2024);

        // Chronological and lexicographic orderings agree on rendered keys.
        assert!(dec_2023.to_string() < jan_2024.to_string());
    }

    #[test]
    fn test_month_key_parse_rejects_bad_input() {
        assert!("2024".parse::<MonthKey>().is_err());
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("2024-00".parse::<MonthKey>().is_err());
        assert!("abcd-01".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_month_key_serde_round_trip() {
        let key = "2024-03".parse::<MonthKey>().unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-03\"");

        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_row_serialization_uses_source_column_names() {
        let row = ForecastRow {
            close_date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            probability: 0.5,
            estimated_value: Some(200.0),
        };

        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"Close Date\""));
        assert!(json.contains("\"Probability\""));
        assert!(json.contains("\"Estimated Value\""));
    }

    #[test]
    fn test_combined_row_column_order() {
        assert_eq!(CombinedMonthlyRow::COLUMNS[0], "Month-Year");
        assert_eq!(CombinedMonthlyRow::COLUMNS[1], "Renewals");
        assert_eq!(CombinedMonthlyRow::COLUMNS[5], "Cumulative Total");
    }
}

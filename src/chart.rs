//! Chart view-models for the monthly report.
//!
//! These are plain data: labels, series and titles, ready for whatever
//! charting front-end the caller uses. Nothing in here draws.

use crate::schema::{CombinedMonthlyRow, MonthlyCountsRow};
use serde::Serialize;

/// Revenue goal highlighted on the cumulative chart.
pub const MILLION_TARGET: f64 = 1_000_000.0;

/// One named series of per-month values within a stacked bar chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// A stacked bar chart over month labels. Series values are index-aligned
/// with `labels`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StackedBarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub series: Vec<BarSeries>,
}

/// A single-series line chart with an optional horizontal target line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub target: Option<TargetLine>,
}

/// A labelled horizontal reference line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TargetLine {
    pub label: String,
    pub value: f64,
}

/// Monthly renewal revenue stacked with the forecast fee.
pub fn revenue_chart(combined: &[CombinedMonthlyRow]) -> StackedBarChart {
    StackedBarChart {
        title: "Stacked Monthly Renewal Revenue and Forecast Fee".to_string(),
        x_label: "Month-Year".to_string(),
        y_label: "Revenue".to_string(),
        labels: month_labels(combined),
        series: vec![
            BarSeries {
                name: "Renewal Revenue".to_string(),
                values: combined.iter().map(|row| row.renewals).collect(),
            },
            BarSeries {
                name: "Forecast Fee".to_string(),
                values: combined.iter().map(|row| row.forecast_fee).collect(),
            },
        ],
    }
}

/// Cumulative total revenue over time, with the one million target line.
pub fn cumulative_chart(combined: &[CombinedMonthlyRow]) -> LineChart {
    LineChart {
        title: "Cumulative Total Revenue Over Time".to_string(),
        x_label: "Month-Year".to_string(),
        y_label: "Cumulative Total Revenue".to_string(),
        labels: month_labels(combined),
        values: combined.iter().map(|row| row.cumulative_total).collect(),
        target: Some(TargetLine {
            label: "1 Million Target".to_string(),
            value: MILLION_TARGET,
        }),
    }
}

/// Licences renewed stacked with the forecast opportunity count.
pub fn counts_chart(counts: &[MonthlyCountsRow]) -> StackedBarChart {
    StackedBarChart {
        title: "Stacked Bar Chart of Licences Renewed and Forecast Count".to_string(),
        x_label: "Month-Year".to_string(),
        y_label: "Counts".to_string(),
        labels: counts.iter().map(|row| row.month_year.to_string()).collect(),
        series: vec![
            BarSeries {
                name: "Licences Renewed".to_string(),
                values: counts.iter().map(|row| row.renewals_count as f64).collect(),
            },
            BarSeries {
                name: "Forecast Count".to_string(),
                values: counts.iter().map(|row| row.forecast_count as f64).collect(),
            },
        ],
    }
}

fn month_labels(combined: &[CombinedMonthlyRow]) -> Vec<String> {
    combined
        .iter()
        .map(|row| row.month_year.to_string())
        .collect()
}

//! # Revenue Report Builder
//!
//! A library for turning licence renewal and sales forecast data into monthly
//! revenue reports with cumulative totals.
//!
//! ## Core Concepts
//!
//! - **Price List**: The renewal price for each licence
//! - **Renewals**: Dated renewal events, joined to the price list by licence
//! - **Forecast**: Open opportunities with a close date, win probability and estimated value
//! - **Forecast Fee**: An opportunity's expected revenue (`Estimated Value * Probability`)
//! - **Combined Table**: Monthly renewal revenue and forecast fees, outer-joined
//!   with zero-fill and carrying a running cumulative total
//!
//! ## Example
//!
//! ```rust,ignore
//! use revenue_report_builder::*;
//!
//! let price_list = "Licence,Price\nA,100\n";
//! let renewals = "Licence,renewal_date\nA,2024-01-15\n";
//! let forecast = "Close Date,Probability,Estimated Value\n2024-02-10,50%,200\n";
//!
//! let report = build_monthly_report_from_readers(
//!     price_list.as_bytes(),
//!     renewals.as_bytes(),
//!     forecast.as_bytes(),
//! )
//! .unwrap();
//!
//! println!("{}", report.to_markdown());
//!
//! let workbook = report.to_spreadsheet().unwrap();
//! std::fs::write(workbook.file_name, &workbook.bytes).unwrap();
//! ```

pub mod chart;
pub mod engine;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod report;
pub mod schema;

pub use chart::{
    counts_chart, cumulative_chart, revenue_chart, BarSeries, LineChart, StackedBarChart,
    TargetLine, MILLION_TARGET,
};
pub use engine::{
    combine_monthly, forecast_fee_by_month, forecast_fees, join_renewals_to_prices,
    monthly_counts, monthly_revenue,
};
pub use error::{Result, RevenueReportError};
pub use export::{
    combined_spreadsheet, combined_to_csv, combined_to_xlsx, SpreadsheetArtifact,
    SPREADSHEET_FILE_NAME, SPREADSHEET_MIME_TYPE,
};
pub use ingestion::*;
pub use report::{build_monthly_report, build_monthly_report_from_readers, MonthlyReport};
pub use schema::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_report_from_csv() {
        let report = build_monthly_report_from_readers(
            "Licence,Price\nA,100\n".as_bytes(),
            "Licence,renewal_date\nA,2024-01-15\n".as_bytes(),
            "Close Date,Probability,Estimated Value\n2024-02-10,50%,200\n".as_bytes(),
        )
        .unwrap();

        assert_eq!(report.monthly_revenue.len(), 1);
        assert_eq!(report.monthly_revenue[0].month_year.to_string(), "2024-01");
        assert_eq!(report.monthly_revenue[0].price, 100.0);
        assert_eq!(report.monthly_revenue[0].cumulative_revenue, 100.0);

        assert_eq!(report.forecast_fee_by_month.len(), 1);
        assert_eq!(
            report.forecast_fee_by_month[0].month_year.to_string(),
            "2024-02"
        );
        assert_eq!(report.forecast_fee_by_month[0].forecast_fee, 100.0);

        assert_eq!(report.combined.len(), 2);
        assert_eq!(report.combined[0].total, 100.0);
        assert_eq!(report.combined[0].cumulative_total, 100.0);
        assert_eq!(report.combined[1].total, 100.0);
        assert_eq!(report.combined[1].cumulative_total, 200.0);

        assert_eq!(report.counts.len(), 2);
        assert_eq!(report.counts[0].renewals_count, 1);
        assert_eq!(report.counts[1].forecast_count, 1);
    }

    #[test]
    fn test_unmatched_renewals_never_reach_the_report() {
        let report = build_monthly_report_from_readers(
            "Licence,Price\nA,100\n".as_bytes(),
            "Licence,renewal_date\nA,2024-01-15\nZZZ,2024-03-01\n".as_bytes(),
            "Close Date,Probability,Estimated Value\n".as_bytes(),
        )
        .unwrap();

        // The unmatched March renewal contributes to no table.
        assert_eq!(report.monthly_revenue.len(), 1);
        assert_eq!(report.combined.len(), 1);
        assert_eq!(report.counts.len(), 1);
        assert_eq!(report.counts[0].month_year.to_string(), "2024-01");
        assert_eq!(report.counts[0].renewals_count, 1);
    }

    #[test]
    fn test_bad_probability_aborts_the_load() {
        let result = build_monthly_report_from_readers(
            "Licence,Price\nA,100\n".as_bytes(),
            "Licence,renewal_date\nA,2024-01-15\n".as_bytes(),
            "Close Date,Probability,Estimated Value\n2024-02-10,0.5,200\n".as_bytes(),
        );

        assert!(matches!(
            result,
            Err(RevenueReportError::InvalidProbability(value)) if value == "0.5"
        ));
    }
}

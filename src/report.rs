use crate::engine::{
    combine_monthly, forecast_fee_by_month, forecast_fees, join_renewals_to_prices,
    monthly_counts, monthly_revenue,
};
use crate::error::Result;
use crate::export::{combined_spreadsheet, combined_to_csv, combined_to_xlsx, SpreadsheetArtifact};
use crate::schema::{
    CombinedMonthlyRow, ForecastFeeByMonthRow, ForecastFeeRow, MonthlyCountsRow,
    MonthlyRevenueRow, ReportInputs,
};
use log::{debug, info};
use serde::Serialize;
use std::io::Read;

/// The five finished tables of a monthly revenue and forecast report.
///
/// `forecast_fees` keeps the raw per-opportunity detail; the other four are
/// the monthly aggregates, each in chronological order.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub monthly_revenue: Vec<MonthlyRevenueRow>,
    pub forecast_fees: Vec<ForecastFeeRow>,
    pub forecast_fee_by_month: Vec<ForecastFeeByMonthRow>,
    pub combined: Vec<CombinedMonthlyRow>,
    pub counts: Vec<MonthlyCountsRow>,
}

/// Runs the full aggregation pipeline over already-loaded inputs.
///
/// This cannot fail: malformed data is rejected at load time, and the
/// aggregation itself is total.
pub fn build_monthly_report(inputs: &ReportInputs) -> MonthlyReport {
    info!(
        "Building monthly report from {} price(s), {} renewal(s), {} forecast row(s)",
        inputs.price_list.len(),
        inputs.renewals.len(),
        inputs.forecast.len()
    );

    let charges = join_renewals_to_prices(&inputs.renewals, &inputs.price_list);
    let revenue = monthly_revenue(&charges);
    let fees = forecast_fees(&inputs.forecast);
    let by_month = forecast_fee_by_month(&fees);
    let combined = combine_monthly(&revenue, &by_month);
    let counts = monthly_counts(&charges, &fees);

    debug!("Report spans {} combined month(s)", combined.len());

    MonthlyReport {
        monthly_revenue: revenue,
        forecast_fees: fees,
        forecast_fee_by_month: by_month,
        combined,
        counts,
    }
}

/// Loads the three CSV streams and builds the report in one call.
pub fn build_monthly_report_from_readers<P, R, F>(
    price_list: P,
    renewals: R,
    forecast: F,
) -> Result<MonthlyReport>
where
    P: Read,
    R: Read,
    F: Read,
{
    let inputs = ReportInputs::from_readers(price_list, renewals, forecast)?;
    Ok(build_monthly_report(&inputs))
}

impl MonthlyReport {
    /// Serializes all five tables to pretty-printed JSON, keyed by table
    /// name, with the row field names used as column names.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Renders the combined and counts tables as a markdown document.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Monthly Revenue and Forecast Fee Analysis\n");

        out.push_str("\n## Combined Monthly Data:\n\n");
        push_row(&mut out, &CombinedMonthlyRow::COLUMNS);
        push_separator(&mut out, CombinedMonthlyRow::COLUMNS.len());
        for row in &self.combined {
            push_row(
                &mut out,
                &[
                    row.month_year.to_string(),
                    format!("{:.2}", row.renewals),
                    format!("{:.2}", row.cumulative_renewals),
                    format!("{:.2}", row.forecast_fee),
                    format!("{:.2}", row.total),
                    format!("{:.2}", row.cumulative_total),
                ],
            );
        }

        out.push_str("\n## Combined Monthly Counts Data:\n\n");
        push_row(&mut out, &["Month-Year", "Renewals Count", "Forecast Count"]);
        push_separator(&mut out, 3);
        for row in &self.counts {
            push_row(
                &mut out,
                &[
                    row.month_year.to_string(),
                    row.renewals_count.to_string(),
                    row.forecast_count.to_string(),
                ],
            );
        }

        out
    }

    /// Serializes the combined table to xlsx bytes. See
    /// [`combined_to_xlsx`].
    pub fn to_xlsx(&self) -> Result<Vec<u8>> {
        combined_to_xlsx(&self.combined)
    }

    /// Serializes the combined table to CSV text. See [`combined_to_csv`].
    pub fn to_csv(&self) -> Result<String> {
        combined_to_csv(&self.combined)
    }

    /// Builds the downloadable workbook artifact for the combined table.
    pub fn to_spreadsheet(&self) -> Result<SpreadsheetArtifact> {
        combined_spreadsheet(&self.combined)
    }
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S]) {
    out.push('|');
    for cell in cells {
        out.push(' ');
        out.push_str(cell.as_ref());
        out.push_str(" |");
    }
    out.push('\n');
}

fn push_separator(out: &mut String, columns: usize) {
    out.push('|');
    for _ in 0..columns {
        out.push_str(" --- |");
    }
    out.push('\n');
}

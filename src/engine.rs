use crate::schema::{
    CombinedMonthlyRow, ForecastFeeByMonthRow, ForecastFeeRow, ForecastRow, MonthKey,
    MonthlyCountsRow, MonthlyRevenueRow, PriceListRow, RenewalCharge, RenewalRow,
};
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Joins renewal rows to the price list by licence identifier.
///
/// Renewals whose licence has no price list entry are dropped, matching the
/// behaviour of an inner join. If a licence appears more than once in the
/// price list, the last occurrence wins.
pub fn join_renewals_to_prices(
    renewals: &[RenewalRow],
    price_list: &[PriceListRow],
) -> Vec<RenewalCharge> {
    let prices: HashMap<&str, f64> = price_list
        .iter()
        .map(|row| (row.licence.as_str(), row.price))
        .collect();

    let charges: Vec<RenewalCharge> = renewals
        .iter()
        .filter_map(|renewal| {
            prices.get(renewal.licence.as_str()).map(|&price| RenewalCharge {
                licence: renewal.licence.clone(),
                month_year: MonthKey::from_date(renewal.renewal_date),
                price,
            })
        })
        .collect();

    let dropped = renewals.len() - charges.len();
    if dropped > 0 {
        debug!(
            "Dropped {} renewal(s) with no matching price list entry",
            dropped
        );
    }

    charges
}

/// Sums renewal charges per month and attaches a running cumulative total.
///
/// Months appear in chronological order regardless of input order, and only
/// months with at least one charge appear at all.
pub fn monthly_revenue(charges: &[RenewalCharge]) -> Vec<MonthlyRevenueRow> {
    let mut totals: BTreeMap<MonthKey, f64> = BTreeMap::new();
    for charge in charges {
        *totals.entry(charge.month_year).or_default() += charge.price;
    }

    let mut cumulative = 0.0;
    totals
        .into_iter()
        .map(|(month_year, price)| {
            cumulative += price;
            MonthlyRevenueRow {
                month_year,
                price,
                cumulative_revenue: cumulative,
            }
        })
        .collect()
}

/// Computes the expected fee for each forecast opportunity.
///
/// The fee is `estimated_value * probability`. Opportunities without an
/// estimated value carry no fee but keep their row, so they still count
/// towards per-month opportunity totals.
pub fn forecast_fees(forecast: &[ForecastRow]) -> Vec<ForecastFeeRow> {
    forecast
        .iter()
        .map(|row| ForecastFeeRow {
            close_date: row.close_date,
            month_year: MonthKey::from_date(row.close_date),
            probability: row.probability,
            estimated_value: row.estimated_value,
            forecast_fee: row.estimated_value.map(|value| value * row.probability),
        })
        .collect()
}

/// Sums forecast fees per close month, in chronological order.
///
/// Rows without a fee contribute zero, so a month whose every opportunity
/// lacks an estimated value still appears with a total of 0.0.
pub fn forecast_fee_by_month(fees: &[ForecastFeeRow]) -> Vec<ForecastFeeByMonthRow> {
    let mut totals: BTreeMap<MonthKey, f64> = BTreeMap::new();
    for fee in fees {
        *totals.entry(fee.month_year).or_default() += fee.forecast_fee.unwrap_or(0.0);
    }

    totals
        .into_iter()
        .map(|(month_year, forecast_fee)| ForecastFeeByMonthRow {
            month_year,
            forecast_fee,
        })
        .collect()
}

/// Outer-joins monthly renewal revenue with monthly forecast fees.
///
/// Every month present on either side appears exactly once, with the missing
/// side filled with zero. `total` is the month's renewals plus forecast fee,
/// and `cumulative_total` is the running sum of `total` across the combined
/// month range. `cumulative_renewals` is zero-filled rather than carried
/// forward into months that had no renewals.
pub fn combine_monthly(
    revenue: &[MonthlyRevenueRow],
    fees: &[ForecastFeeByMonthRow],
) -> Vec<CombinedMonthlyRow> {
    let mut rows: BTreeMap<MonthKey, CombinedMonthlyRow> = BTreeMap::new();

    for row in revenue {
        let entry = rows
            .entry(row.month_year)
            .or_insert_with(|| zeroed_row(row.month_year));
        entry.renewals = row.price;
        entry.cumulative_renewals = row.cumulative_revenue;
    }

    for row in fees {
        let entry = rows
            .entry(row.month_year)
            .or_insert_with(|| zeroed_row(row.month_year));
        entry.forecast_fee = row.forecast_fee;
    }

    let mut cumulative = 0.0;
    rows.into_values()
        .map(|mut row| {
            row.total = row.renewals + row.forecast_fee;
            cumulative += row.total;
            row.cumulative_total = cumulative;
            row
        })
        .collect()
}

fn zeroed_row(month_year: MonthKey) -> CombinedMonthlyRow {
    CombinedMonthlyRow {
        month_year,
        renewals: 0.0,
        cumulative_renewals: 0.0,
        forecast_fee: 0.0,
        total: 0.0,
        cumulative_total: 0.0,
    }
}

/// Counts renewals and forecast opportunities per month.
///
/// Uses the same outer-join-with-zero-fill shape as [`combine_monthly`]:
/// every month seen on either side appears, with the absent side at zero.
/// Renewals are counted after the price list join, so renewals dropped there
/// are not counted here either.
pub fn monthly_counts(
    charges: &[RenewalCharge],
    fees: &[ForecastFeeRow],
) -> Vec<MonthlyCountsRow> {
    let mut counts: BTreeMap<MonthKey, (u64, u64)> = BTreeMap::new();

    for charge in charges {
        counts.entry(charge.month_year).or_default().0 += 1;
    }
    for fee in fees {
        counts.entry(fee.month_year).or_default().1 += 1;
    }

    counts
        .into_iter()
        .map(|(month_year, (renewals_count, forecast_count))| MonthlyCountsRow {
            month_year,
            renewals_count,
            forecast_count,
        })
        .collect()
}

use revenue_report_builder::*;

const PRICE_LIST_CSV: &str = "\
Licence,Price
OFFICE-STD,450
OFFICE-PRO,900
CAD-SUITE,2500
ACCOUNTING,1200
PAYROLL,800
";

const RENEWALS_CSV: &str = "\
Licence,renewal_date
OFFICE-STD,2024-01-12
OFFICE-PRO,2024-01-30
CAD-SUITE,2024-02-15
PAYROLL,2024-02-27
OFFICE-STD,2024-03-08
ACCOUNTING,2024-03-21
OFFICE-PRO,2024-04-01
PAYROLL,2024-05-14
CAD-SUITE,2024-06-03
OFFICE-STD,2024-06-28
";

const FORECAST_CSV: &str = "\
Close Date,Probability,Estimated Value
2024-03-05,25%,8000
2024-04-18,60%,5000
2024-05-10,75%,TBD
2024-05-19,40%,2000
2024-07-02,90%,12000
2024-08-22,50%,3000
";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("📊 Monthly Revenue Report Demo\n");
    println!(
        "Joining {} renewals to the price list and folding in the sales forecast...\n",
        RENEWALS_CSV.lines().count() - 1
    );

    let report = build_monthly_report_from_readers(
        PRICE_LIST_CSV.as_bytes(),
        RENEWALS_CSV.as_bytes(),
        FORECAST_CSV.as_bytes(),
    )?;

    println!("{}", report.to_markdown());

    if let Some(last) = report.combined.last() {
        println!(
            "Cumulative total revenue through {}: {:.2}\n",
            last.month_year, last.cumulative_total
        );
    }

    let artifact = report.to_spreadsheet()?;
    std::fs::write(artifact.file_name, &artifact.bytes)?;
    println!(
        "✅ Wrote {} ({} bytes, {})",
        artifact.file_name,
        artifact.bytes.len(),
        artifact.mime_type
    );

    Ok(())
}

use revenue_report_builder::*;

const PRICE_LIST_CSV: &str = "\
Licence,Price
OFFICE-STD,450
OFFICE-PRO,900
CAD-SUITE,2500
";

const RENEWALS_CSV: &str = "\
Licence,renewal_date
OFFICE-STD,2024-01-12
OFFICE-PRO,2024-01-30
CAD-SUITE,2024-02-15
OFFICE-STD,2024-03-08
OFFICE-PRO,2024-04-01
";

const FORECAST_CSV: &str = "\
Close Date,Probability,Estimated Value
2024-02-20,60%,5000
2024-03-05,25%,8000
2024-05-19,40%,2000
";

fn main() {
    env_logger::init();

    println!("📈 Chart Feed Demo\n");
    println!("The library produces chart view-models; rendering is up to the caller.\n");

    let report = match build_monthly_report_from_readers(
        PRICE_LIST_CSV.as_bytes(),
        RENEWALS_CSV.as_bytes(),
        FORECAST_CSV.as_bytes(),
    ) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            return;
        }
    };

    let revenue = revenue_chart(&report.combined);
    let cumulative = cumulative_chart(&report.combined);
    let counts = counts_chart(&report.counts);

    println!("=== {} ===", revenue.title);
    match serde_json::to_string_pretty(&revenue) {
        Ok(json) => println!("{}\n", json),
        Err(e) => eprintln!("❌ Error: {}", e),
    }

    println!("=== {} ===", cumulative.title);
    for (label, value) in cumulative.labels.iter().zip(&cumulative.values) {
        println!("  {}: {:>12.2}", label, value);
    }
    if let Some(target) = &cumulative.target {
        println!("  target line: {} at {:.0}", target.label, target.value);
    }
    println!();

    println!("=== {} ===", counts.title);
    for (i, label) in counts.labels.iter().enumerate() {
        println!(
            "  {}: {} renewed, {} forecast",
            label, counts.series[0].values[i], counts.series[1].values[i]
        );
    }
}

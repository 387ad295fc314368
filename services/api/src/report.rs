use clap::Args;
use district_atlas::catalog::{Catalog, DistrictQuery, DistrictSummary, SpendingSummary};
use district_atlas::config::AppConfig;
use district_atlas::error::AppError;
use district_atlas::telemetry;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct SummaryArgs {
    /// District dataset to summarize (defaults to APP_DATA_PATH)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Print an aligned text table instead of JSON
    #[arg(long)]
    pub(crate) text: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// District dataset to search (defaults to APP_DATA_PATH)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Case-insensitive substring matched against district and campus names
    #[arg(long)]
    pub(crate) q: Option<String>,
    /// Minimum per-pupil spending
    #[arg(long)]
    pub(crate) min_spend: Option<f64>,
    /// Maximum total debt
    #[arg(long)]
    pub(crate) max_debt: Option<f64>,
    /// Print an aligned text table instead of JSON
    #[arg(long)]
    pub(crate) text: bool,
}

pub(crate) fn run_summary(args: SummaryArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.data)?;
    println!("{}", summary_output(&catalog.summary(), args.text)?);
    Ok(())
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.data)?;
    let query = DistrictQuery {
        q: args.q.filter(|q| !q.is_empty()),
        min_spend: args.min_spend,
        max_debt: args.max_debt,
    };
    println!("{}", search_output(&catalog.search(&query), args.text)?);
    Ok(())
}

/// Logs go to stderr so stdout stays parseable JSON.
fn load_catalog(data: Option<PathBuf>) -> Result<Catalog, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let path = data.unwrap_or(config.data.dataset_path);
    Ok(Catalog::load(path)?)
}

pub(crate) fn summary_output(summary: &SpendingSummary, text: bool) -> Result<String, AppError> {
    if text {
        Ok(render_summary(summary))
    } else {
        Ok(serde_json::to_string_pretty(summary)?)
    }
}

pub(crate) fn search_output(rows: &[DistrictSummary], text: bool) -> Result<String, AppError> {
    if text {
        Ok(render_matches(rows))
    } else {
        Ok(serde_json::to_string_pretty(rows)?)
    }
}

pub(crate) fn render_summary(summary: &SpendingSummary) -> String {
    format!(
        "Districts:            {}\nTotal spending:       {:.2}\nAvg per-pupil spend:  {:.2}",
        summary.district_count, summary.total_spending, summary.avg_per_pupil
    )
}

pub(crate) fn render_matches(rows: &[DistrictSummary]) -> String {
    if rows.is_empty() {
        return "No matching districts".to_string();
    }
    let width = rows.iter().map(|row| row.id.len()).max().unwrap_or(0);
    let mut lines: Vec<String> = rows
        .iter()
        .map(|row| format!("{:<width$}  {}", row.id, row.name))
        .collect();
    lines.push(format!("{} match(es)", rows.len()));
    lines.join("\n")
}

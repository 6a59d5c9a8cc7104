//! Savings Planner CLI
//!
//! Projects a savings plan and lists the recommended assets for a risk profile

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{Duration, Local, NaiveDate};
use clap::Parser;

use savings_planner::export::{write_ledger_csv_to_path, write_recommendations_csv_to_path};
use savings_planner::recommend::FetchFailurePolicy;
use savings_planner::{GoalStatus, PlanReport, PlanRequest, PlanRunner, PlannerConfig};

#[derive(Debug, Parser)]
#[command(name = "savings-planner", version, about = "Project savings growth and list recommended assets")]
struct Cli {
    /// Risk profile (Conservative/Conservador, Balanced/Equilibrado, Aggressive/Agressivo)
    #[arg(short, long, default_value = "Conservative")]
    profile: String,

    /// Financial goal, e.g. "buy a house"
    #[arg(long, default_value = "")]
    goal: String,

    /// First month of the plan (defaults to today)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last month of the plan (defaults to a year from the start)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Starting capital (R$)
    #[arg(short, long, default_value_t = 0.0)]
    capital: f64,

    /// Monthly contribution (R$)
    #[arg(short = 'm', long, default_value_t = 0.0)]
    contribution: f64,

    /// Target balance (R$); 0 disables goal tracking
    #[arg(short, long, default_value_t = 0.0)]
    target: f64,

    /// CSV profile table overriding the built-in one
    #[arg(long)]
    profiles: Option<PathBuf>,

    /// Behaviour when a price lookup fails
    #[arg(long, value_enum)]
    on_fetch_failure: Option<FetchFailurePolicy>,

    /// Fetch prices concurrently
    #[arg(long)]
    parallel: bool,

    /// Skip live price lookups
    #[arg(long)]
    offline: bool,

    /// Write the ledger to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the recommendation table to this CSV file
    #[arg(long)]
    recommendations_csv: Option<PathBuf>,

    /// Print the full report as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Write the JSON report to this file
    #[arg(long)]
    json_out: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> PlannerConfig {
        let mut config = PlannerConfig::from_env();
        if let Some(path) = &self.profiles {
            config.profiles_path = Some(path.clone());
        }
        if let Some(policy) = self.on_fetch_failure {
            config.enrichment.on_failure = policy;
        }
        if self.parallel {
            config.enrichment.parallel = true;
        }
        config
    }

    fn request(&self) -> PlanRequest {
        let start_date = self.start.unwrap_or_else(|| Local::now().date_naive());
        let end_date = self.end.unwrap_or(start_date + Duration::days(365));
        PlanRequest {
            goal: self.goal.clone(),
            profile: self.profile.clone(),
            start_date,
            end_date,
            starting_capital: self.capital,
            monthly_contribution: self.contribution,
            target_balance: self.target,
        }
    }
}

fn print_report(report: &PlanReport) {
    let projection = &report.projection;

    if !report.goal.is_empty() {
        println!("Goal: {}", report.goal);
    }
    println!(
        "Period: {} months | Annual rate: {:.2}%\n",
        projection.horizon_months,
        projection.annual_rate * 100.0
    );

    println!("{:>5} {:>16} {:>16} {:>16}", "Month", "Balance", "Total Invested", "Growth");
    println!("{}", "-".repeat(56));
    for entry in &projection.ledger {
        println!(
            "{:>5} {:>16.2} {:>16.2} {:>16.2}",
            entry.period, entry.balance, entry.total_invested, entry.cumulative_growth
        );
    }

    let summary = &projection.summary;
    println!("\nSummary:");
    println!("  Final Balance: R$ {:.2}", summary.final_balance);
    println!("  Total Invested: R$ {:.2}", summary.total_invested);
    println!("  Total Growth: R$ {:.2}", summary.total_growth);

    match projection.goal {
        GoalStatus::Reached { period } => {
            println!("\nYou will reach R$ {:.2} in {} months.", report.target_balance, period)
        }
        GoalStatus::NotReached => println!("\nThe target cannot be reached within the chosen period."),
        GoalStatus::Disabled => {}
    }

    println!("\nRecommended assets (profile: {}):", report.profile);
    println!("{:<16} {:>14} {:>14}", "Asset", "1y Return", "Price");
    println!("{}", "-".repeat(46));
    for rec in &report.recommendations {
        println!("{:<16} {:>14} {:>14}", rec.asset, rec.return_display(), rec.price_display());
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.config();

    let runner = if cli.offline {
        PlanRunner::offline(&config)
    } else {
        PlanRunner::from_config(&config)
    }
    .context("failed to set up planner")?;

    let request = cli.request();
    let report = match runner.run(&request) {
        Ok(report) => report,
        Err(e) if e.is_user_error() => {
            eprintln!("Please correct your input: {e}");
            std::process::exit(2);
        }
        Err(e) => return Err(e).context("plan failed"),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(path) = &cli.csv {
        write_ledger_csv_to_path(&report.projection.ledger, path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("\nLedger written to: {}", path.display());
    }

    if let Some(path) = &cli.recommendations_csv {
        write_recommendations_csv_to_path(&report.recommendations, path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Recommendations written to: {}", path.display());
    }

    if let Some(path) = &cli.json_out {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report)?;
        println!("Report written to: {}", path.display());
    }

    Ok(())
}

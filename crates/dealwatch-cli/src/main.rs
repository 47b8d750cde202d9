use std::collections::BTreeMap;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dealwatch_core::{load_app_config, load_categories, AppConfig, Deal};
use dealwatch_pipeline::{
    HttpReplicator, NoopReplicator, Pipeline, RunOutcome, SnapshotReplicator,
};

#[derive(Debug, Parser)]
#[command(name = "dealwatch")]
#[command(about = "HKTVmall pet-food deal tracker")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape all configured categories and publish the deals snapshot.
    Run,
    /// Summarize the current snapshot without scraping anything.
    Report {
        /// How many deals to show per category.
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse first so `--help`/`--version` work regardless of the
    // environment; config problems only matter once a command runs.
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Report { top }) => report(&config, top),
        Some(Commands::Run) | None => run(config).await,
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let categories = load_categories(&config.categories_path)?.categories;

    let replicator: Box<dyn SnapshotReplicator> = match &config.replica {
        Some(replica) => Box::new(HttpReplicator::new(
            replica,
            config.request_timeout_secs,
            &config.user_agent,
        )?),
        None => Box::new(NoopReplicator),
    };

    let pipeline = Pipeline::new(&config, categories, replicator)?;
    let report = pipeline.run().await?;

    println!(
        "{}: {} deals published to {}",
        report.outcome,
        report.deals.len(),
        config.deals_path.display()
    );
    for key in &report.failed_categories {
        println!("  failed category: {key}");
    }

    if report.outcome == RunOutcome::Failed {
        anyhow::bail!("no category produced any deals");
    }
    Ok(())
}

fn report(config: &AppConfig, top: usize) -> anyhow::Result<()> {
    let bytes = std::fs::read(&config.deals_path).map_err(|e| {
        anyhow::anyhow!("cannot read snapshot {}: {e}", config.deals_path.display())
    })?;
    let deals: Vec<Deal> = serde_json::from_slice(&bytes)?;

    // Snapshot order is discount-descending already, so each per-category
    // bucket stays sorted.
    let mut by_category: BTreeMap<&str, Vec<&Deal>> = BTreeMap::new();
    for deal in &deals {
        by_category.entry(&deal.category).or_default().push(deal);
    }

    println!("{} deals in snapshot\n", deals.len());
    for (category, bucket) in &by_category {
        println!("{category} ({} deals)", bucket.len());
        for deal in bucket.iter().take(top) {
            println!(
                "  {:>6.2}% off  {:>8.2} -> {:>8.2}  {} [{}]",
                deal.discount_pct,
                deal.original_price,
                deal.sale_price,
                deal.product_name,
                deal.product_code
            );
        }
        println!();
    }
    Ok(())
}

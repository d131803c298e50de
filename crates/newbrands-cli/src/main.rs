mod report;

use std::path::PathBuf;

use clap::Parser;
use newbrands_core::{AggregationPolicy, ReportOverrides, DEFAULT_ENV_FILE};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "newbrands")]
#[command(about = "Generate static JSON/CSV data on brands new to the shop catalog")]
struct Cli {
    /// Shop whose active, visible products are counted [env: SHOP_ID, default: 4]
    #[arg(long)]
    shop_id: Option<u32>,

    /// Start of the window, YYYY-MM-DD, inclusive [default: Jan 1 this year]
    #[arg(long)]
    since: Option<String>,

    /// End of the window, YYYY-MM-DD, exclusive [default: Jan 1 next year]
    #[arg(long)]
    until: Option<String>,

    /// Minimum product count per brand [env: MIN_PRODUCTS, default: 0]
    #[arg(long)]
    min_products: Option<u32>,

    /// Output directory [default: ./docs]
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Aggregation policy: unscoped or shop-scoped [env: REPORT_POLICY, default: shop-scoped]
    #[arg(long)]
    policy: Option<AggregationPolicy>,

    /// Env file to load before reading configuration
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Resolve configuration and print the query without connecting
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn overrides(&self) -> ReportOverrides {
        ReportOverrides {
            shop_id: self.shop_id,
            since: self.since.clone(),
            until: self.until.clone(),
            min_products: self.min_products,
            policy: self.policy,
            out_dir: self.out_dir.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_loaded = newbrands_core::load_env_file(&cli.env_file)?;
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(path = %cli.env_file.display(), loaded = env_loaded, "env file");

    let today = chrono::Local::now().date_naive();
    let config = newbrands_core::load_report_config(&cli.overrides(), today)?;
    tracing::debug!(?config, "resolved configuration");

    if cli.dry_run {
        for line in report::dry_run_lines(&config) {
            println!("{line}");
        }
        return Ok(());
    }

    let summary = report::run_report(&config).await?;
    for line in report::summary_lines(&config, &summary) {
        println!("{line}");
    }

    Ok(())
}

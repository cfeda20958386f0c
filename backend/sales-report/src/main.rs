use chrono::Utc;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sales_report::{generate_sales, summarize, DEFAULT_RECORD_COUNT};

#[derive(Parser)]
#[command(name = "sales-report")]
#[command(about = "Generate random sales and print totals by category")]
struct Cli {
    /// Number of sales records to generate
    #[arg(long, default_value_t = DEFAULT_RECORD_COUNT)]
    count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let records = generate_sales(&mut rng, cli.count, Utc::now());
    tracing::debug!(count = records.len(), seed = ?cli.seed, "Generated sales records");

    print!("{}", summarize(&records));
    Ok(())
}

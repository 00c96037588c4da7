use clap::Parser;
use fx_summary::adapters::http::DEFAULT_UPSTREAM_URL;
use fx_summary::adapters::snapshot::{save_snapshot, DEFAULT_SNAPSHOT_PATH};
use fx_summary::domain::model::CurrencyPair;
use fx_summary::utils::validation::{parse_iso_date, validate_date_range, validate_url};
use fx_summary::utils::logger;
use fx_summary::HttpRateProvider;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "fetch-snapshot")]
#[command(about = "Fetch real FX data from the rate provider and save it as the fallback snapshot")]
struct Args {
    /// First date of the range (YYYY-MM-DD)
    #[arg(long, default_value = "2025-01-01")]
    start: String,

    /// Last date of the range (YYYY-MM-DD)
    #[arg(long, default_value = "2025-01-31")]
    end: String,

    #[arg(long, default_value = "EUR")]
    base: String,

    #[arg(long, default_value = "USD")]
    quote: String,

    /// Where to write the snapshot
    #[arg(short, long, default_value = DEFAULT_SNAPSHOT_PATH)]
    output: PathBuf,

    #[arg(long, default_value = DEFAULT_UPSTREAM_URL)]
    upstream_url: String,

    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let start = parse_iso_date("start", &args.start)?;
    let end = parse_iso_date("end", &args.end)?;
    validate_date_range(start, end)?;
    validate_url("upstream_url", &args.upstream_url)?;

    let pair = CurrencyPair::new(&args.base, &args.quote);
    tracing::info!(
        "📥 Fetching sample data {}..{} for {} from {}",
        start,
        end,
        pair,
        args.upstream_url
    );

    // 不使用 fallback：快照必須是真實的上游資料
    let provider =
        HttpRateProvider::new(&args.upstream_url, Duration::from_secs(args.timeout_secs))?;
    let payload = provider.fetch_range_payload(start, end, &pair).await?;
    let days = payload.rates.len();

    // 寫入前先確認內容可被 fallback 解析
    payload.clone().into_series()?;
    save_snapshot(&args.output, &payload)?;

    tracing::info!("✅ Saved {} days of FX rates to {}", days, args.output.display());
    println!("Successfully saved sample data to {}", args.output.display());
    println!("Data contains {} days of FX rates", days);

    Ok(())
}

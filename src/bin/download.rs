use clap::Parser;
use log::{info, warn};

use candle_history::{
    cli::Args,
    coinbase::{is_supported_granularity, CoinbaseClient},
    services::HistoryFetcher,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    if args.verbose {
        println!(
            "market={} granularity={} num_days={} filename={:?} delay={:?} output_dir={} credentials={:?}",
            args.market,
            args.granularity,
            args.num_days,
            args.filename,
            args.delay,
            args.output_dir.display(),
            args.credentials()
        );
    }

    let client = CoinbaseClient::new(None, args.credentials(), Some(args.base_url()));
    let fetcher = HistoryFetcher::new(client, args.fetch_config());

    let table = match &args.filename {
        Some(path) => fetcher.load_from_file(path)?,
        None => {
            if !is_supported_granularity(args.granularity) {
                warn!(
                    "Granularity {}s is not one the exchange lists; the request may be rejected",
                    args.granularity
                );
            }
            fetcher.fetch(&args.request()).await?
        }
    };

    info!("{} candles ready", table.len());
    println!("{table}");

    Ok(())
}

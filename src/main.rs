//! CryptoTrendBot
//!
//! AI-assisted crypto trend alerts over Telegram.

use clap::{Parser, Subcommand};
use cryptotrend_bot::{
    analysis::{AnalysisGateway, LlmGateway},
    bot::{CommandHandler, UpdatePoller},
    client::MarketDataClient,
    config::Config,
    notify::Notifier,
    scanner::SignalScanner,
    store::{MemorySignalStore, MemorySubscriptionStore, SubscriptionStore},
    types::{CandleSeries, Timeframe},
};
use futures_util::future::join_all;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cryptotrend-bot")]
#[command(about = "AI-assisted crypto trend alert bot for Telegram")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (searches default locations when omitted)
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot: command polling plus the scheduled signal scanner
    Run,
    /// One-off AI trend analysis for a symbol
    Analyze {
        /// Coin symbol (e.g. BTC)
        symbol: String,
    },
    /// One-off multi-timeframe analysis for a symbol
    Advanced {
        /// Coin symbol (e.g. BTC)
        symbol: String,
        /// Single timeframe instead of the configured set
        #[arg(short, long)]
        timeframe: Option<String>,
    },
    /// Show the current ticker for a symbol
    Ticker {
        /// Coin symbol (e.g. BTC)
        symbol: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    match cli.command {
        Commands::Run => run_bot(config).await,
        Commands::Analyze { symbol } => analyze(config, &symbol).await,
        Commands::Advanced { symbol, timeframe } => advanced(config, &symbol, timeframe).await,
        Commands::Ticker { symbol } => show_ticker(config, &symbol).await,
    }
}

async fn run_bot(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting CryptoTrendBot");

    let telegram = config
        .telegram
        .clone()
        .ok_or_else(|| anyhow::anyhow!("telegram must be configured to run the bot"))?;

    let market = Arc::new(MarketDataClient::from_config(&config.exchange)?);
    let gateway: Arc<dyn AnalysisGateway> = Arc::new(LlmGateway::from_config(&config.llm)?);
    let signals = Arc::new(MemorySignalStore::new());
    let subscriptions = Arc::new(MemorySubscriptionStore::new());
    let notifier = Notifier::new(telegram.bot_token.clone());

    let scanner = Arc::new(SignalScanner::new(
        market.clone(),
        gateway.clone(),
        signals,
        subscriptions.clone() as Arc<dyn SubscriptionStore>,
        Arc::new(notifier.clone()),
        &config.scanner,
        telegram.admin_chat_id,
    ));

    let interval = Duration::from_secs(config.scanner.interval_secs);
    tokio::spawn(async move { scanner.run(interval).await });

    let handler = CommandHandler::new(
        market,
        gateway,
        subscriptions,
        config.scanner.timeframes.clone(),
    );
    let poller = UpdatePoller::new(telegram.bot_token, handler, notifier)?;

    tracing::info!("Bot initialized. Polling for updates...");
    poller.run().await;

    Ok(())
}

async fn analyze(config: Config, symbol: &str) -> anyhow::Result<()> {
    let market = MarketDataClient::from_config(&config.exchange)?;
    let gateway = LlmGateway::from_config(&config.llm)?;

    let ticker = market
        .ticker(symbol)
        .await
        .ok_or_else(|| anyhow::anyhow!("could not fetch market data for {symbol}"))?;

    println!("\n🤖 Running trend analysis for {}...\n", symbol);
    let analysis = gateway.analyze_trend(symbol, &ticker).await?;

    println!("Trend: {}", analysis.trend);
    println!(
        "Confidence: {:.0}%",
        analysis.confidence * Decimal::ONE_HUNDRED
    );
    println!("Reason: {}", analysis.reason);

    Ok(())
}

async fn advanced(config: Config, symbol: &str, timeframe: Option<String>) -> anyhow::Result<()> {
    let market = MarketDataClient::from_config(&config.exchange)?;
    let gateway = LlmGateway::from_config(&config.llm)?;

    let timeframes = match timeframe {
        Some(token) => vec![token
            .parse::<Timeframe>()
            .map_err(|e| anyhow::anyhow!(e))?],
        None => config.scanner.timeframes.clone(),
    };

    let fetches = timeframes.iter().map(|tf| market.candles(symbol, *tf));
    let series: Vec<CandleSeries> = join_all(fetches).await.into_iter().flatten().collect();

    if series.is_empty() {
        anyhow::bail!("could not fetch candlestick data for {symbol}");
    }

    println!("\n🤖 Running multi-timeframe analysis for {}...\n", symbol);
    let analysis = gateway.analyze_multi_timeframe(symbol, &series).await?;

    println!("Overall Trend: {}", analysis.overall_trend);
    println!("Recommendation: {}", analysis.recommendation);
    println!(
        "Confidence: {:.0}%",
        analysis.confidence * Decimal::ONE_HUNDRED
    );
    println!("Sentiment: {}", analysis.market_sentiment);
    println!("Risk Level: {}", analysis.risk_level);
    println!("\nPrice Prediction: {}", analysis.price_prediction);
    println!("\n{}", analysis.comprehensive_analysis);
    println!("\nReasoning: {}", analysis.reasoning);

    if let Some(setup) = &analysis.trade_setup {
        println!("\nTrade Setup:");
        println!("  Entry: {}", setup.entry_price);
        println!("  Stop-Loss: {}", setup.stop_loss);
        println!("  Take-Profit: {}", setup.take_profit);
        println!("  Support: {}", setup.support_zone);
        println!("  Resistance: {}", setup.resistance_zone);
        println!("  Confirmation: {}", setup.confirmation);
    }

    Ok(())
}

async fn show_ticker(config: Config, symbol: &str) -> anyhow::Result<()> {
    let market = MarketDataClient::from_config(&config.exchange)?;

    let ticker = market
        .ticker(symbol)
        .await
        .ok_or_else(|| anyhow::anyhow!("could not fetch market data for {symbol}"))?;

    println!("\n📊 {} Ticker\n", symbol.to_uppercase());
    println!("Open:  {}", ticker.open);
    println!("High:  {}", ticker.high);
    println!("Low:   {}", ticker.low);
    println!("Close: {}", ticker.close);
    println!("Bid:   {}", ticker.bid);
    println!("Ask:   {}", ticker.ask);

    Ok(())
}

use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::Config;
use core_types::TradeSide;
use database::{DbRepository, TradeStore};
use ledger::LedgerEngine;
use market_data::HttpPriceOracle;
use portfolio::PortfolioProjector;
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// A simulated stock-trading service: quotes, buys, sells, holdings, history.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve {
        /// Override the port from config.toml.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Provision a new account.
    CreateAccount {
        #[arg(long)]
        username: String,
        /// Starting cash; defaults to the configured amount.
        #[arg(long)]
        cash: Option<Decimal>,
    },
    /// Buy shares for a user at the current market price.
    Buy {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        shares: String,
    },
    /// Sell shares a user holds, at the current market price.
    Sell {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        shares: String,
    },
    /// Print a user's current holdings and valuation.
    Portfolio {
        #[arg(long)]
        user_id: i64,
    },
    /// Print a user's trade history, newest first.
    History {
        #[arg(long)]
        user_id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = configuration::load_config()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let addr = SocketAddr::new(
                config.server.host.parse()?,
                port.unwrap_or(config.server.port),
            );
            web_server::run_server(addr, config).await
        }
        Commands::CreateAccount { username, cash } => {
            let store = connect_store().await?;
            let amount = cash.unwrap_or(config.accounts.starting_cash);
            let account = store.create_account(&username, amount).await?;
            println!(
                "Created account {} ('{}') with {} in cash",
                account.id, account.username, account.cash
            );
            Ok(())
        }
        Commands::Buy {
            user_id,
            symbol,
            shares,
        } => handle_trade(user_id, &symbol, &shares, TradeSide::Buy, &config).await,
        Commands::Sell {
            user_id,
            symbol,
            shares,
        } => handle_trade(user_id, &symbol, &shares, TradeSide::Sell, &config).await,
        Commands::Portfolio { user_id } => handle_portfolio(user_id, &config).await,
        Commands::History { user_id } => handle_history(user_id, &config).await,
    }
}

/// Records a trade through the ledger engine and prints the receipt.
async fn handle_trade(
    user_id: i64,
    symbol: &str,
    shares: &str,
    side: TradeSide,
    config: &Config,
) -> anyhow::Result<()> {
    let store = connect_store().await?;
    let oracle = Arc::new(HttpPriceOracle::new(&config.oracle)?);
    let engine = LedgerEngine::new(store, oracle);

    let receipt = match side {
        TradeSide::Buy => engine.record_purchase(user_id, symbol, shares).await?,
        TradeSide::Sell => engine.record_sale(user_id, symbol, shares).await?,
    };

    println!(
        "Recorded {} of {} x {} at {} — new balance {}",
        match side {
            TradeSide::Buy => "purchase",
            TradeSide::Sell => "sale",
        },
        receipt.transaction.shares.abs(),
        receipt.transaction.symbol,
        receipt.transaction.price,
        receipt.balance
    );
    Ok(())
}

async fn connect_store() -> anyhow::Result<Arc<DbRepository>> {
    let pool: sqlx::PgPool = database::connect().await?;
    database::run_migrations(&pool).await?;
    Ok(Arc::new(DbRepository::new(pool)))
}

fn projector(store: Arc<DbRepository>, config: &Config) -> anyhow::Result<PortfolioProjector> {
    let oracle = Arc::new(HttpPriceOracle::new(&config.oracle)?);
    Ok(PortfolioProjector::new(store, oracle))
}

/// Renders current holdings and the portfolio valuation as tables.
async fn handle_portfolio(user_id: i64, config: &Config) -> anyhow::Result<()> {
    let projector = projector(connect_store().await?, config)?;
    let holdings = projector.holdings(user_id).await?;
    let valuation = projector.total_value(user_id).await?;

    let mut table = Table::new();
    table.set_header(vec!["Symbol", "Name", "Shares", "Price", "Value"]);
    for holding in &holdings {
        table.add_row(vec![
            holding.symbol.clone(),
            holding.name.clone().unwrap_or_else(|| "-".to_string()),
            holding.shares.to_string(),
            holding
                .price
                .map(|p| p.to_string())
                .unwrap_or_else(|| "unavailable".to_string()),
            holding
                .value
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{table}");
    println!(
        "Cash: {}  Holdings: {}  Total: {}",
        valuation.cash, valuation.holdings_value, valuation.total_value
    );
    if !valuation.unpriced.is_empty() {
        println!(
            "Excluded from total (no price available): {}",
            valuation.unpriced.join(", ")
        );
    }
    Ok(())
}

/// Renders the full trade history, newest first.
async fn handle_history(user_id: i64, config: &Config) -> anyhow::Result<()> {
    let projector = projector(connect_store().await?, config)?;
    let history = projector.history(user_id).await?;

    let mut table = Table::new();
    table.set_header(vec!["Executed", "Side", "Symbol", "Shares", "Price", "Value"]);
    for transaction in &history {
        table.add_row(vec![
            transaction
                .executed_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            transaction.side().to_string(),
            transaction.symbol.clone(),
            transaction.shares.abs().to_string(),
            transaction.price.to_string(),
            transaction.gross_value().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
